/**
 * Access Resolution
 *
 * Decides, once per incoming collaboration connection, which project the
 * connection targets and what it may do there.
 *
 * The path segment supplied at handshake time takes one of two forms:
 * - a purely numeric string: a direct project id, always with edit access
 * - anything else: a share token, verified and decoded into its claims
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::tokens::{ShareTokenKeys, TokenError};
use crate::backend::projects::ProjectId;

/// What a connection may do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Read,
    Edit,
}

impl Capability {
    pub fn can_edit(self) -> bool {
        matches!(self, Self::Edit)
    }
}

/// Outcome of access resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGrant {
    pub project_id: ProjectId,
    pub capability: Capability,
    /// Issuer of the share token; `None` on the direct path
    pub user_id: Option<i64>,
}

/// Resolve a handshake target into a project and capability
pub fn resolve_access(target: &str, keys: &ShareTokenKeys) -> Result<AccessGrant, TokenError> {
    if let Some(project_id) = parse_project_id(target) {
        tracing::debug!("[Access] Direct access to project {}", project_id);
        return Ok(AccessGrant {
            project_id,
            capability: Capability::Edit,
            user_id: None,
        });
    }

    let claims = keys.decode(target).map_err(|e| {
        tracing::warn!("[Access] Rejected share token: {}", e);
        e
    })?;

    tracing::debug!(
        "[Access] Share token for project {} ({:?}) issued by user {}",
        claims.project_id,
        claims.capability,
        claims.user_id
    );
    Ok(AccessGrant {
        project_id: claims.project_id,
        capability: claims.capability,
        user_id: Some(claims.user_id),
    })
}

/// Digits only; signs, spaces and overflowing values are not project ids.
fn parse_project_id(target: &str) -> Option<ProjectId> {
    if target.is_empty() || !target.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    target.parse().ok()
}
