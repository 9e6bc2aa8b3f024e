//! Authentication requests

use serde_json::Value;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::auth::{ChangePassword, Login, LoginResponse, Register},
    services::{gateway::ApiClient, session::SessionStore},
};

#[derive(Clone, Debug)]
pub struct AuthApi {
    client: ApiClient,
    session: SessionStore,
}

impl AuthApi {
    pub fn new(client: ApiClient, session: SessionStore) -> Self {
        Self { client, session }
    }

    /// Sign in and store the returned token
    pub async fn login(&self, credentials: &Login) -> AppResult<LoginResponse> {
        credentials.validate()?;

        let body = self
            .client
            .post::<_, Value>("/auth/login", credentials)
            .await?;
        let response = parse_login_response(body)?;

        self.store_token(&response);
        Ok(response)
    }

    /// Create an account and sign in with it
    pub async fn register(&self, request: &Register) -> AppResult<LoginResponse> {
        request.validate()?;

        let body = self
            .client
            .post::<_, Value>("/auth/register", request)
            .await?;
        let response = parse_login_response(body)?;

        self.store_token(&response);
        Ok(response)
    }

    pub async fn change_password(&self, request: &ChangePassword) -> AppResult<()> {
        request.validate()?;

        self.client
            .post::<_, Value>("/auth/change-password", request)
            .await?;
        tracing::info!("Password changed");
        Ok(())
    }

    pub fn logout(&self) {
        self.session.logout();
        tracing::info!("Signed out");
    }

    fn store_token(&self, response: &LoginResponse) {
        if response.token.is_empty() {
            tracing::warn!("Server accepted the credentials but sent an empty token");
            return;
        }
        self.session.set_token(response.token.as_str());
        tracing::info!("Signed in");
    }
}

/// Accept either a bare token string (optionally prefixed with `Bearer `) or
/// an object with a string `token` field.
pub fn parse_login_response(body: Value) -> AppResult<LoginResponse> {
    match body {
        Value::String(raw) => {
            let token = raw.strip_prefix("Bearer ").unwrap_or(raw.as_str()).trim();
            Ok(LoginResponse {
                token: token.to_string(),
                user: None,
            })
        }
        Value::Object(mut map) => {
            let Some(Value::String(token)) = map.remove("token") else {
                return Err(AppError::InvalidLoginResponse);
            };
            // The account summary is optional; a shape we do not know is dropped
            let user = map
                .remove("user")
                .and_then(|user| serde_json::from_value(user).ok());
            Ok(LoginResponse { token, user })
        }
        _ => Err(AppError::InvalidLoginResponse),
    }
}
