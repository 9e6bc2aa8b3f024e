//! Configuration management for the LibraryHub client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use url::Url;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Root of the REST API, e.g. `https://library.example.org/api`
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Replace `{ "data": X }` bodies with `X`
    #[serde(default = "default_true")]
    pub unwrap_envelope: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// Where the token is persisted. Defaults to the user config directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Write logs to a daily rolling file in this directory instead of stderr
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from files and environment variables.
    ///
    /// The base URL is checked here so a misconfigured client never starts.
    pub fn load() -> AppResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Self::builder(&run_mode)
            .map_err(|e| AppError::Config(e.to_string()))?
            .try_deserialize::<AppConfig>()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn builder(run_mode: &str) -> Result<Config, ConfigError> {
        Config::builder()
            .set_default("api.base_url", "")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // LIBRARYHUB_API__TIMEOUT_SECS=10 -> api.timeout_secs
            .add_source(
                Environment::with_prefix("LIBRARYHUB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", env::var("API_BASE_URL").ok())?
            .build()
    }

    /// Reject configurations the client cannot run with
    pub fn validate(&self) -> AppResult<()> {
        self.api.parsed_base_url()?;
        if self.api.timeout_secs == 0 {
            return Err(AppError::Config("api.timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Location of the persisted session file
    pub fn session_path(&self) -> PathBuf {
        self.session.path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("libraryhub")
                .join("session.json")
        })
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parse the base URL, failing on anything that is not an absolute http(s) URL.
    ///
    /// A trailing slash is added so relative resource paths join under it.
    pub fn parsed_base_url(&self) -> AppResult<Url> {
        let raw = self.base_url.trim();
        if raw.is_empty() {
            return Err(AppError::Config(
                "api.base_url is not set (use API_BASE_URL or LIBRARYHUB_API__BASE_URL)".to_string(),
            ));
        }

        let mut url = Url::parse(raw)
            .map_err(|e| AppError::Config(format!("Invalid api.base_url '{}': {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
            unwrap_envelope: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}
