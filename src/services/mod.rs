//! Session state and backend access

pub mod gateway;
pub mod interceptors;
pub mod notify;
pub mod session;
pub mod storage;

use std::sync::Arc;

use crate::{
    api::{AuthApi, BooksApi, LoansApi, UsersApi},
    config::AppConfig,
    error::AppResult,
};
use gateway::ApiClient;
use notify::Notifier;
use session::SessionStore;
use storage::FileTokenStorage;

/// Container for the session and the request functions built on it
#[derive(Clone, Debug)]
pub struct Services {
    pub session: SessionStore,
    pub client: ApiClient,
    pub auth: AuthApi,
    pub books: BooksApi,
    pub loans: LoansApi,
    pub users: UsersApi,
}

impl Services {
    /// Wire every service around an existing session
    pub fn new(config: &AppConfig, session: SessionStore, notifier: Arc<dyn Notifier>) -> AppResult<Self> {
        let client = ApiClient::builder(&config.api, session.clone())
            .notifier(notifier)
            .build()?;

        Ok(Self {
            auth: AuthApi::new(client.clone(), session.clone()),
            books: BooksApi::new(client.clone()),
            loans: LoansApi::new(client.clone()),
            users: UsersApi::new(client.clone()),
            client,
            session,
        })
    }

    /// Restore the persisted session from the configured path and wire everything
    pub fn from_config(config: &AppConfig, notifier: Arc<dyn Notifier>) -> AppResult<Self> {
        let session = SessionStore::load(FileTokenStorage::new(config.session_path()));
        Self::new(config, session, notifier)
    }
}
