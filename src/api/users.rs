//! User management requests

use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{UpdateUser, User},
    services::gateway::ApiClient,
};

#[derive(Clone, Debug)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.client.get("/users").await
    }

    pub async fn get(&self, id: i64) -> AppResult<User> {
        self.client.get(&format!("/users/{}", id)).await
    }

    /// Partial update, sent as PATCH
    pub async fn update(&self, id: i64, user: &UpdateUser) -> AppResult<User> {
        user.validate()?;
        self.client.patch(&format!("/users/{}", id), user).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/users/{}", id)).await?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}
