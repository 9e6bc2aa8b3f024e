//! Request and response interceptors applied by the gateway.
//!
//! The gateway runs every request interceptor in order before dispatch, then
//! folds the outcome (`Ok(body)` or `Err(error)`) through every response
//! interceptor in order. An interceptor never retries or swallows an error.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;
use serde_json::Value;
use std::sync::Arc;

use super::notify::{Notification, Notifier};
use super::session::SessionStore;
use crate::error::{AppError, AppResult};

pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, request: &mut Request) -> AppResult<()>;
}

pub trait ResponseInterceptor: Send + Sync {
    fn on_response(&self, outcome: AppResult<Value>) -> AppResult<Value>;
}

/// Attach `Authorization: Bearer <token>` when the session holds a token
#[derive(Clone)]
pub struct BearerAuth {
    session: SessionStore,
}

impl BearerAuth {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

impl RequestInterceptor for BearerAuth {
    fn on_request(&self, request: &mut Request) -> AppResult<()> {
        let Some(token) = self.session.bearer_token() else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::InvalidToken)?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Replace a `{ "data": X }` body with `X`.
///
/// Only objects whose `data` member is truthy are unwrapped, and only one
/// level deep. `null`, `false`, `0` and `""` leave the body as is, as does
/// anything that is not an object.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if is_truthy(&data) => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UnwrapEnvelope;

impl ResponseInterceptor for UnwrapEnvelope {
    fn on_response(&self, outcome: AppResult<Value>) -> AppResult<Value> {
        outcome.map(unwrap_envelope)
    }
}

/// Drop the session when the server answers 401
#[derive(Clone)]
pub struct LogoutOnUnauthorized {
    session: SessionStore,
}

impl LogoutOnUnauthorized {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

impl ResponseInterceptor for LogoutOnUnauthorized {
    fn on_response(&self, outcome: AppResult<Value>) -> AppResult<Value> {
        if let Err(e) = &outcome {
            if e.is_unauthorized() && self.session.clear() {
                tracing::info!("Server rejected the session token, signed out");
            }
        }
        outcome
    }
}

/// Report 400/403/404/5xx failures to a notifier
#[derive(Clone)]
pub struct NotifyOnError {
    notifier: Arc<dyn Notifier>,
}

impl NotifyOnError {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

impl ResponseInterceptor for NotifyOnError {
    fn on_response(&self, outcome: AppResult<Value>) -> AppResult<Value> {
        if let Err(e) = &outcome {
            if let Some(notification) = Notification::from_error(e)
                .filter(|n| n.category.is_notified())
            {
                self.notifier.notify(&notification);
            }
        }
        outcome
    }
}
