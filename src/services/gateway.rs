//! API gateway client: every backend call goes through here

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Request};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::interceptors::{
    BearerAuth, LogoutOnUnauthorized, NotifyOnError, RequestInterceptor, ResponseInterceptor,
    UnwrapEnvelope,
};
use super::notify::{Notifier, TracingNotifier};
use super::session::SessionStore;
use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
};

/// HTTP client bound to one base URL, with the interceptor chain applied to
/// every call. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    request_chain: Arc<[Arc<dyn RequestInterceptor>]>,
    response_chain: Arc<[Arc<dyn ResponseInterceptor>]>,
}

impl ApiClient {
    pub fn builder(config: &ApiConfig, session: SessionStore) -> ApiClientBuilder {
        ApiClientBuilder::new(config, session)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a resource path such as `/books/3` against the base URL
    pub fn url(&self, path: &str) -> AppResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send one request through the interceptor chain and return the
    /// normalized body. Fire-once: nothing is retried.
    pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> AppResult<Value> {
        let url = self.url(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let mut request = builder.build()?;

        for interceptor in self.request_chain.iter() {
            interceptor.on_request(&mut request)?;
        }

        let outcome = self.dispatch(request).await;

        self.response_chain
            .iter()
            .fold(outcome, |outcome, interceptor| interceptor.on_response(outcome))
    }

    async fn dispatch(&self, request: Request) -> AppResult<Value> {
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(
            %method,
            %url,
            authenticated = request.headers().contains_key(reqwest::header::AUTHORIZATION),
            "Dispatching request"
        );

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::debug!(%method, %url, "Request failed before a response: {}", e);
            AppError::Transport(e)
        })?;

        let status = response.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "Response received");

        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(parse_body(&bytes));
        }

        // The status line decides the outcome even if the error body is cut short
        let body = match response.bytes().await {
            Ok(bytes) => parse_body(&bytes),
            Err(e) => {
                tracing::debug!(%method, %url, "Failed to read error body: {}", e);
                Value::Null
            }
        };
        Err(AppError::http(status, body))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let body = self.send(Method::GET, path, None).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::POST, path, Some(serde_json::to_value(body)?)).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::PUT, path, Some(serde_json::to_value(body)?)).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::PATCH, path, Some(serde_json::to_value(body)?)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// DELETE a resource, returning whatever body the server sent (often `null`)
    pub async fn delete(&self, path: &str) -> AppResult<Value> {
        self.send(Method::DELETE, path, None).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("request_interceptors", &self.request_chain.len())
            .field("response_interceptors", &self.response_chain.len())
            .finish()
    }
}

/// Empty bodies become `null`, non-JSON bodies (e.g. a bare `text/plain`
/// token) become a JSON string.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

pub struct ApiClientBuilder {
    config: ApiConfig,
    timeout: Duration,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
    extra_request: Vec<Arc<dyn RequestInterceptor>>,
    extra_response: Vec<Arc<dyn ResponseInterceptor>>,
}

impl ApiClientBuilder {
    pub fn new(config: &ApiConfig, session: SessionStore) -> Self {
        Self {
            config: config.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            session,
            notifier: Arc::new(TracingNotifier),
            extra_request: Vec::new(),
            extra_response: Vec::new(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Run after the built-in request interceptors
    pub fn request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.extra_request.push(interceptor);
        self
    }

    /// Run after the built-in response interceptors
    pub fn response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.extra_response.push(interceptor);
        self
    }

    pub fn build(self) -> AppResult<ApiClient> {
        let base_url = self.config.parsed_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()?;

        let mut request_chain: Vec<Arc<dyn RequestInterceptor>> =
            vec![Arc::new(BearerAuth::new(self.session.clone()))];
        request_chain.extend(self.extra_request);

        let mut response_chain: Vec<Arc<dyn ResponseInterceptor>> = Vec::new();
        if self.config.unwrap_envelope {
            response_chain.push(Arc::new(UnwrapEnvelope));
        }
        response_chain.push(Arc::new(LogoutOnUnauthorized::new(self.session)));
        response_chain.push(Arc::new(NotifyOnError::new(self.notifier)));
        response_chain.extend(self.extra_response);

        tracing::debug!("API client configured for {}", base_url);

        Ok(ApiClient {
            http,
            base_url,
            request_chain: request_chain.into(),
            response_chain: response_chain.into(),
        })
    }
}
