//! Login, registration and session persistence

use serde_json::json;
use tempfile::TempDir;
use tokio_test::assert_err;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, ResponseTemplate,
};

use libraryhub::{
    models::{ChangePassword, Login, Register},
    services::storage::FileTokenStorage,
    AppError, SessionStore,
};

use crate::common::TestContext;

fn credentials() -> Login {
    Login {
        email: "admin@example.com".to_string(),
        password: "admin".to_string(),
    }
}

#[tokio::test]
async fn test_login_success_sets_token() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "admin@example.com", "password": "admin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc123",
            "user": {"id": 1, "email": "admin@example.com"}
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let response = ctx.services.auth.login(&credentials()).await.unwrap();
    assert_eq!(response.token, "abc123");
    assert_eq!(ctx.session().token().as_deref(), Some("abc123"));
    assert!(ctx.session().is_authenticated());

    let books = ctx.services.books.list().await.unwrap();
    assert!(books.is_empty());
}

#[tokio::test]
async fn test_login_with_plain_text_token() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Bearer eyJhbGciOiJIUzI1NiJ9.e30.sig")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&ctx.server)
        .await;

    ctx.services.auth.login(&credentials()).await.unwrap();
    assert_eq!(
        ctx.session().token().as_deref(),
        Some("eyJhbGciOiJIUzI1NiJ9.e30.sig")
    );
}

#[tokio::test]
async fn test_login_with_wrapped_token() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"token": "wrapped"}})))
        .mount(&ctx.server)
        .await;

    ctx.services.auth.login(&credentials()).await.unwrap();
    assert_eq!(ctx.session().token().as_deref(), Some("wrapped"));
}

#[tokio::test]
async fn test_login_with_unfamiliar_user_payload() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "abc123", "user": {"id": 1}})),
        )
        .mount(&ctx.server)
        .await;

    let response = ctx.services.auth.login(&credentials()).await.unwrap();
    assert_eq!(response.user, None);
    assert_eq!(ctx.session().token().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_login_malformed_response_leaves_session_alone() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&ctx.server)
        .await;

    let err = assert_err!(ctx.services.auth.login(&credentials()).await);
    assert!(matches!(err, AppError::InvalidLoginResponse));
    assert!(!ctx.session().is_authenticated());
    assert_eq!(ctx.session().token(), None);
}

#[tokio::test]
async fn test_login_malformed_response_keeps_previous_token() {
    let ctx = TestContext::new().await;
    ctx.session().set_token("previous");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&ctx.server)
        .await;

    assert_err!(ctx.services.auth.login(&credentials()).await);
    assert_eq!(ctx.session().token().as_deref(), Some("previous"));
}

#[tokio::test]
async fn test_rejected_credentials() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})))
        .mount(&ctx.server)
        .await;

    let err = assert_err!(ctx.services.auth.login(&credentials()).await);
    assert!(err.is_unauthorized());
    assert!(!ctx.session().is_authenticated());
}

#[tokio::test]
async fn test_invalid_login_never_reaches_the_server() {
    let ctx = TestContext::new().await;

    let err = assert_err!(
        ctx.services
            .auth
            .login(&Login {
                email: "not-an-email".to_string(),
                password: "abc".to_string(),
            })
            .await
    );
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(ctx.received_count().await, 0);
}

#[tokio::test]
async fn test_register_signs_in() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "email": "new@example.com",
            "password": "secret",
            "passwordConfirm": "secret"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&ctx.server)
        .await;

    ctx.services
        .auth
        .register(&Register {
            email: "new@example.com".to_string(),
            password: "secret".to_string(),
            password_confirm: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(ctx.session().token().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let ctx = TestContext::new().await;

    let err = assert_err!(
        ctx.services
            .auth
            .register(&Register {
                email: "new@example.com".to_string(),
                password: "secret".to_string(),
                password_confirm: "other1".to_string(),
            })
            .await
    );
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(ctx.received_count().await, 0);
}

#[tokio::test]
async fn test_change_password() {
    let ctx = TestContext::new().await;
    ctx.session().set_token("abc123");

    Mock::given(method("POST"))
        .and(path("/auth/change-password"))
        .and(header("authorization", "Bearer abc123"))
        .and(body_json(json!({
            "password": "old",
            "passwordNew": "newpass",
            "passwordConfirm": "newpass"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Password updated"})))
        .expect(1)
        .mount(&ctx.server)
        .await;

    ctx.services
        .auth
        .change_password(&ChangePassword {
            password: "old".to_string(),
            password_new: "newpass".to_string(),
            password_confirm: "newpass".to_string(),
        })
        .await
        .unwrap();
    assert!(ctx.session().is_authenticated());
}

#[tokio::test]
async fn test_session_survives_reload_and_401_clears_the_file() {
    let dir = TempDir::new().unwrap();
    let session_path = dir.path().join("session.json");

    {
        let ctx =
            TestContext::with_session(SessionStore::load(FileTokenStorage::new(&session_path)))
                .await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "persisted"})))
            .mount(&ctx.server)
            .await;

        ctx.services.auth.login(&credentials()).await.unwrap();
        assert!(session_path.exists());
    }

    // Simulated restart
    let ctx = TestContext::with_session(SessionStore::load(FileTokenStorage::new(&session_path))).await;
    assert_eq!(ctx.session().token().as_deref(), Some("persisted"));

    Mock::given(method("GET"))
        .and(path("/loans"))
        .and(header("authorization", "Bearer persisted"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&ctx.server)
        .await;

    assert_err!(ctx.services.loans.list().await);
    assert!(!session_path.exists());

    let reloaded = SessionStore::load(FileTokenStorage::new(&session_path));
    assert!(!reloaded.is_authenticated());
}

#[tokio::test]
async fn test_explicit_logout_clears_the_file() {
    let dir = TempDir::new().unwrap();
    let session_path = dir.path().join("session.json");

    let session = SessionStore::load(FileTokenStorage::new(&session_path));
    session.set_token("abc123");
    assert!(session_path.exists());

    let ctx = TestContext::with_session(session).await;
    ctx.services.auth.logout();
    ctx.services.auth.logout();

    assert!(!session_path.exists());
    assert!(!ctx.session().is_authenticated());
}
