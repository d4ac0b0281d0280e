use mockito::Matcher;
use serde_json::json;
use std::path::PathBuf;
use verge::api::HttpBackend;
use verge::config::Config;
use verge::editor::{EditorState, RoleEditor};
use verge::roles::Role;

fn test_config(api_url: String) -> Config {
    Config {
        api_url,
        request_timeout_seconds: 5,
        session_path: std::env::temp_dir().join("verge-test-session.json"),
        audit_log_path: PathBuf::from("."),
    }
}

#[test]
fn test_add_role_prevents_duplicates() {
    let mut editor = RoleEditor::new("1");
    editor.begin([Role::Admin]);

    assert!(!editor.add_role(Role::Admin));
    assert!(editor.add_role(Role::Collector));
    assert_eq!(editor.pending().len(), 2);
}

#[test]
fn test_remove_missing_role_is_noop() {
    let mut editor = RoleEditor::new("1");
    editor.begin([Role::Admin]);

    assert!(!editor.remove_role(&Role::Accountant));
    assert_eq!(editor.pending().len(), 1);
}

#[test]
fn test_remove_then_add_restores_pending_set() {
    let mut editor = RoleEditor::new("1");
    editor.begin([Role::Admin, Role::Collector]);
    let before = editor.pending().clone();

    assert!(editor.remove_role(&Role::Collector));
    assert!(editor.add_role(Role::Collector));

    assert_eq!(editor.pending(), &before);
}

#[test]
fn test_edits_rejected_before_begin() {
    let mut editor = RoleEditor::new("1");

    assert!(!editor.add_role(Role::Admin));
    assert!(editor.pending().is_empty());
    assert_eq!(editor.state(), &EditorState::Idle);
}

#[tokio::test]
async fn test_submit_sends_exact_pending_set() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/assign-roles")
        .match_body(Matcher::Json(json!({
            "userId": "42",
            "role": ["ADMIN", "collector"],
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let backend = HttpBackend::new(&test_config(server.url())).unwrap();

    let mut editor = RoleEditor::new("42");
    editor.begin([Role::Admin, Role::Collector]);

    let state = editor.submit(&backend).await;
    assert_eq!(state, &EditorState::Success);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_submit_sends_replacement_not_merge() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/assign-roles")
        .match_body(Matcher::Json(json!({
            "userId": "7",
            "role": ["accountant"],
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let backend = HttpBackend::new(&test_config(server.url())).unwrap();

    // Seed with what the server has, then strip everything but one role.
    let mut editor = RoleEditor::new("7");
    editor.begin([Role::Admin, Role::Accountant, Role::Collector]);
    editor.remove_role(&Role::Admin);
    editor.remove_role(&Role::Collector);

    let state = editor.submit(&backend).await;
    assert_eq!(state, &EditorState::Success);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_submit_failure_keeps_pending_and_error_text() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/assign-roles")
        .with_status(500)
        .with_body(r#"{"message":"role service unavailable"}"#)
        .create_async()
        .await;

    let backend = HttpBackend::new(&test_config(server.url())).unwrap();

    let mut editor = RoleEditor::new("42");
    editor.begin([Role::Admin]);
    editor.add_role(Role::Collector);

    let state = editor.submit(&backend).await.clone();
    match state {
        EditorState::Failed(message) => {
            assert!(message.contains("role service unavailable"));
        }
        other => panic!("expected Failed, got {:?}", other),
    }

    assert_eq!(editor.pending().len(), 2);
    assert!(editor.pending().contains(&Role::Admin));
    assert!(editor.pending().contains(&Role::Collector));

    editor.acknowledge();
    assert_eq!(editor.state(), &EditorState::Editing);
}

#[tokio::test]
async fn test_submit_ignored_outside_editing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/assign-roles")
        .expect(0)
        .create_async()
        .await;

    let backend = HttpBackend::new(&test_config(server.url())).unwrap();

    let mut editor = RoleEditor::new("42");
    let state = editor.submit(&backend).await;
    assert_eq!(state, &EditorState::Idle);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unknown_role_survives_submit_unchanged() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/assign-roles")
        .match_body(Matcher::Json(json!({
            "userId": "9",
            "role": ["ADMIN", "dispatcher"],
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let backend = HttpBackend::new(&test_config(server.url())).unwrap();

    let mut editor = RoleEditor::new("9");
    editor.begin([Role::Admin, Role::from("dispatcher")]);

    let state = editor.submit(&backend).await;
    assert_eq!(state, &EditorState::Success);

    mock.assert_async().await;
}
