//! Share token test helpers

use chrono::Duration;
use xfcanvas::backend::auth::{issue_share_token, Capability, ShareTokenKeys};
use xfcanvas::backend::projects::ProjectId;

/// Secret the test server signs and verifies share tokens with
pub const TEST_SECRET: &str = "test-secret";

pub fn test_keys() -> ShareTokenKeys {
    ShareTokenKeys::new(TEST_SECRET)
}

/// Share token valid for one hour
pub fn share_token(project_id: ProjectId, capability: Capability) -> String {
    issue_share_token(&test_keys(), project_id, 42, capability, Duration::hours(1))
        .expect("Failed to issue share token")
}

/// Share token that expired a minute ago
pub fn expired_share_token(project_id: ProjectId) -> String {
    issue_share_token(
        &test_keys(),
        project_id,
        42,
        Capability::Edit,
        Duration::seconds(-60),
    )
    .expect("Failed to issue share token")
}

/// Share token signed with a different secret
pub fn foreign_share_token(project_id: ProjectId) -> String {
    issue_share_token(
        &ShareTokenKeys::new("someone-else"),
        project_id,
        42,
        Capability::Edit,
        Duration::hours(1),
    )
    .expect("Failed to issue share token")
}
