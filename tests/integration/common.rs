use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::MockServer;

use libraryhub::{
    config::{ApiConfig, AppConfig, LoggingConfig, SessionConfig},
    services::notify::{ChannelNotifier, Notification},
    SessionStore, Services,
};

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config_for(base_url: impl Into<String>) -> AppConfig {
    AppConfig {
        api: ApiConfig::new(base_url),
        session: SessionConfig::default(),
        logging: LoggingConfig::default(),
    }
}

pub struct TestContext {
    pub server: MockServer,
    pub services: Services,
    pub notifications: UnboundedReceiver<Notification>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_session(SessionStore::in_memory()).await
    }

    pub async fn with_session(session: SessionStore) -> Self {
        init_logging();
        let server = MockServer::start().await;
        let (notifier, notifications) = ChannelNotifier::new();
        let services = Services::new(&config_for(server.uri()), session, Arc::new(notifier))
            .expect("Failed to build services");

        Self {
            server,
            services,
            notifications,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.services.session
    }

    pub async fn received_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
