use std::path::PathBuf;
use verge::api::{ApiError, Backend, HttpBackend};
use verge::config::Config;

fn test_config(api_url: String) -> Config {
    Config {
        api_url,
        request_timeout_seconds: 5,
        session_path: std::env::temp_dir().join("verge-test-session.json"),
        audit_log_path: PathBuf::from("."),
    }
}

#[tokio::test]
async fn test_list_users_parses_roles_field() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/users")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"users":[
                {"id":"1","firstName":"Amina","lastName":"Odhiambo","email":"amina@example.com","roles":["ADMIN"]},
                {"id":"2","firstName":"Brian","lastName":"Mwangi"}
            ]}"#,
        )
        .create_async()
        .await;

    let backend = HttpBackend::new(&test_config(server.url())).unwrap();
    let users = backend.list_users().await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].id, "1");
    assert_eq!(users[0].roles.as_deref(), Some(&["ADMIN".to_string()][..]));
    assert!(users[1].roles.is_none());
}

#[tokio::test]
async fn test_fetch_user_parses_role_field() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"7","firstName":"Wanjiru","lastName":"Kamau","phoneNumber":"+254700000000","role":["collector","customer_manager"]}"#,
        )
        .create_async()
        .await;

    let backend = HttpBackend::new(&test_config(server.url())).unwrap();
    let user = backend.fetch_user("7").await.unwrap();

    assert_eq!(user.id, "7");
    assert_eq!(user.phone_number.as_deref(), Some("+254700000000"));
    assert_eq!(
        user.role,
        Some(vec!["collector".to_string(), "customer_manager".to_string()])
    );
}

#[tokio::test]
async fn test_sign_in_returns_user_with_role_set() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/signin")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "phoneNumber": "+254711111111",
            "password": "hunter2",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"user":{"id":"3","firstName":"Esther","lastName":"Njeri","role":["accountant"]}}"#,
        )
        .create_async()
        .await;

    let backend = HttpBackend::new(&test_config(server.url())).unwrap();
    let user = backend.sign_in("+254711111111", "hunter2").await.unwrap();

    assert_eq!(user.id, "3");
    assert_eq!(user.role, vec!["accountant".to_string()]);
}

#[tokio::test]
async fn test_error_message_extracted_from_json_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/signin")
        .with_status(401)
        .with_body(r#"{"message":"Invalid phone number or password"}"#)
        .create_async()
        .await;

    let backend = HttpBackend::new(&test_config(server.url())).unwrap();
    let err = backend.sign_in("+254711111111", "wrong").await.unwrap_err();

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid phone number or password");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_body_without_message_field_kept_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/users")
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let backend = HttpBackend::new(&test_config(server.url())).unwrap();
    let err = backend.list_users().await.unwrap_err();

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream unavailable");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}
