//! Collaboration channel behaviour over real websockets

use crate::common::*;
use serde_json::json;
use xfcanvas::backend::auth::Capability;
use xfcanvas::shared::{Document, Element, ElementId, RejectionKind};

fn landing_page() -> Document {
    Document::from(vec![
        Element::new(1).with_attr("name", "Frame").with_attr("width", 50),
        Element::new(2).with_parent(1).with_attr("name", "Button"),
        Element::new(3).with_parent(2).with_attr("name", "Label"),
        Element::new(4).with_attr("name", "Footer"),
    ])
}

fn ids(document: &Document) -> Vec<ElementId> {
    document.elements().iter().map(|e| e.id.clone()).collect()
}

#[tokio::test]
async fn test_snapshot_on_connect() {
    let server = spawn_server().await;
    let project = server
        .project_with(Document::from(vec![Element::new(1).with_attr("name", "Frame")]))
        .await;

    let (_ws, snapshot) = server.join(&project.id.to_string()).await;

    assert_json_eq(&snapshot, json!([{"id": 1, "name": "Frame"}]));
}

#[tokio::test]
async fn test_command_reaches_peers_but_not_sender() {
    let server = spawn_server().await;
    let project = server.project_with(landing_page()).await;
    let target = project.id.to_string();

    let (mut alice, _) = server.join(&target).await;
    let (mut bob, _) = server.join(&target).await;

    let frame = r#"update {"id": 1, "width": 120}"#;
    send_text(&mut alice, frame).await;

    assert_eq!(next_text(&mut bob).await, frame);
    assert_silent(&mut alice).await;

    let content = server.content(&project).await;
    let frame_element = content.get(&1.into()).unwrap();
    assert_eq!(frame_element.attrs.get("width"), Some(&120.into()));
}

#[tokio::test]
async fn test_update_strips_defaults() {
    let server = spawn_server().await;
    let project = server.project_with(landing_page()).await;
    let (mut ws, _) = server.join(&project.id.to_string()).await;

    send_text(&mut ws, r#"update {"id": 1, "width": 0}"#).await;
    assert_silent(&mut ws).await;

    let content = server.content(&project).await;
    let element = content.get(&1.into()).unwrap();
    assert_eq!(element.attrs.get("width"), None);
    assert_eq!(element.attrs.get("name"), Some(&"Frame".into()));
}

#[tokio::test]
async fn test_delete_cascades_to_descendants() {
    let server = spawn_server().await;
    let project = server.project_with(landing_page()).await;
    let (mut ws, _) = server.join(&project.id.to_string()).await;

    send_text(&mut ws, r#"delete {"id": 1}"#).await;
    assert_silent(&mut ws).await;

    assert_eq!(ids(&server.content(&project).await), vec![ElementId::from(4)]);
}

#[tokio::test]
async fn test_put_reorders_and_ignores_missing_anchor() {
    let server = spawn_server().await;
    let project = server.project_with(landing_page()).await;
    let (mut ws, _) = server.join(&project.id.to_string()).await;

    send_text(&mut ws, r#"put {"id": 4, "after": 1}"#).await;
    send_text(&mut ws, r#"put {"id": 2, "after": 99}"#).await;
    send_text(&mut ws, r#"put {"id": 3}"#).await;
    assert_silent(&mut ws).await;

    let expected: Vec<ElementId> = vec![3.into(), 1.into(), 4.into(), 2.into()];
    assert_eq!(ids(&server.content(&project).await), expected);
}

#[tokio::test]
async fn test_read_only_connection_cannot_edit() {
    let server = spawn_server().await;
    let project = server.project_with(landing_page()).await;

    let (mut editor, _) = server.join(&project.id.to_string()).await;
    let (mut viewer, snapshot) = server
        .join(&share_token(project.id, Capability::Read))
        .await;
    assert_eq!(assert_snapshot(&snapshot).len(), 4);

    send_text(&mut viewer, r#"create {"id": 10}"#).await;
    assert_rejection(&next_text(&mut viewer).await, RejectionKind::ReadOnly);
    assert_silent(&mut editor).await;
    assert_eq!(server.content(&project).await.len(), 4);

    // Still a listener
    let frame = r#"create {"id": 11}"#;
    send_text(&mut editor, frame).await;
    assert_eq!(next_text(&mut viewer).await, frame);
}

#[tokio::test]
async fn test_invalid_command_keeps_connection_open() {
    let server = spawn_server().await;
    let project = server.project_with(Document::new()).await;
    let target = project.id.to_string();

    let (mut alice, _) = server.join(&target).await;
    let (mut bob, _) = server.join(&target).await;

    for frame in ["explode {}", "create", r#"create {"name": "no id"}"#, "update {oops"] {
        send_text(&mut alice, frame).await;
        let rejection = assert_rejection(&next_text(&mut alice).await, RejectionKind::InvalidCommand);
        assert!(!rejection.message.is_empty());
    }
    assert_silent(&mut bob).await;

    let frame = r#"create {"id": "a1b2"}"#;
    send_text(&mut alice, frame).await;
    assert_eq!(next_text(&mut bob).await, frame);
    assert!(server.content(&project).await.contains(&"a1b2".into()));
}

#[tokio::test]
async fn test_persistence_failure_is_not_broadcast() {
    let server = spawn_server().await;
    let project = server.project_with(Document::new()).await;
    let target = project.id.to_string();

    let (mut alice, _) = server.join(&target).await;
    let (mut bob, _) = server.join(&target).await;

    server.store.set_fail_writes(true);
    send_text(&mut alice, r#"create {"id": 1}"#).await;
    let rejection = assert_rejection(&next_text(&mut alice).await, RejectionKind::PersistenceFailed);
    assert_contains(&rejection.message, "unavailable");
    assert_silent(&mut bob).await;

    server.store.set_fail_writes(false);
    let frame = r#"create {"id": 2}"#;
    send_text(&mut alice, frame).await;
    assert_eq!(next_text(&mut bob).await, frame);

    // The failed command never made it into the authoritative document
    let (_carol, snapshot) = server.join(&target).await;
    assert_eq!(ids(&assert_snapshot(&snapshot)), vec![ElementId::from(2)]);
}

#[tokio::test]
async fn test_late_joiner_sees_applied_edits() {
    let server = spawn_server().await;
    let project = server.project_with(Document::new()).await;
    let target = project.id.to_string();

    let (mut alice, _) = server.join(&target).await;
    send_text(&mut alice, r#"create {"id": 1, "name": "Frame"}"#).await;
    send_text(&mut alice, r#"create {"id": 2, "parent": 1}"#).await;
    assert_silent(&mut alice).await;

    let (_bob, snapshot) = server.join(&target).await;
    assert_json_eq(
        &snapshot,
        json!([{"id": 1, "name": "Frame"}, {"id": 2, "parent": 1}]),
    );
}

#[tokio::test]
async fn test_disconnect_unregisters() {
    let server = spawn_server().await;
    let project = server.project_with(Document::new()).await;
    let target = project.id.to_string();

    let (mut alice, _) = server.join(&target).await;
    let (bob, _) = server.join(&target).await;
    server.wait_for_connections(&project, 2).await;

    alice.close(None).await.unwrap();
    server.wait_for_connections(&project, 1).await;

    drop(bob);
    server.wait_for_connections(&project, 0).await;
    assert_eq!(server.state.collab.registry.project_count(), 0);
}

#[tokio::test]
async fn test_projects_are_isolated() {
    let server = spawn_server().await;
    let first = server.project_with(Document::new()).await;
    let second = server.project_with(Document::new()).await;

    let (mut alice, _) = server.join(&first.id.to_string()).await;
    let (mut bob, _) = server.join(&second.id.to_string()).await;

    send_text(&mut alice, r#"create {"id": 1}"#).await;
    assert_silent(&mut bob).await;
    assert!(server.content(&second).await.is_empty());
}
