//! Normalized fault representation, sanitization, and fault guards.
//!
//! Error-like values are lifted into [`Fault`] and reduced to a safe,
//! bounded subset of fields before logging. Authorization failures (the
//! remote providers return transient 401s constantly while polling) are
//! collapsed into a one-line notice instead of a full dump.

use crate::error::Error;
use crate::telemetry::summary::{summarize, summarize_bytes};
use serde_json::{Map, Value};
use std::future::Future;
use tracing::{Instrument, error, error_span, warn};

/// Provider error code that marks an authorization failure.
pub const AUTH_ERROR_CODE: i64 = 31001;

/// Normalized view of an error-like value.
#[derive(Debug, Clone, Default)]
pub struct Fault {
    pub name: String,
    pub message: String,
    pub code: Option<i64>,
    pub status: Option<u16>,
    pub status_code: Option<u16>,
    pub response: Option<FaultResponse>,
    pub request: Option<FaultRequest>,
}

/// The remote response attached to a fault, if any.
#[derive(Debug, Clone, Default)]
pub struct FaultResponse {
    pub status: Option<u16>,
    pub data: Option<Payload>,
    pub headers: Option<Value>,
}

/// A response body: structured, or raw bytes.
#[derive(Debug, Clone)]
pub enum Payload {
    Value(Value),
    Bytes(Vec<u8>),
}

/// The request that produced a fault. Only the fields safe to log;
/// headers and auth material never make it in here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultRequest {
    pub url: Option<String>,
    pub method: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl Fault {
    /// Lift an error-like value (an object with a string `message`)
    /// into a normalized fault. Returns `None` for anything else.
    pub fn from_value(value: &Value) -> Option<Self> {
        let entries = value.as_object()?;
        let message = entries.get("message")?.as_str()?.to_string();
        let name = entries
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Error")
            .to_string();

        let response = entries
            .get("response")
            .and_then(Value::as_object)
            .map(|response| FaultResponse {
                status: response.get("status").and_then(as_u16),
                data: response.get("data").cloned().map(Payload::Value),
                headers: response.get("headers").cloned(),
            });

        let request = entries
            .get("config")
            .and_then(Value::as_object)
            .map(|request| FaultRequest {
                url: request
                    .get("url")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                method: request
                    .get("method")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                timeout_ms: request.get("timeout").and_then(Value::as_u64),
            });

        Some(Self {
            name,
            message,
            code: entries.get("code").and_then(Value::as_i64),
            status: entries.get("status").and_then(as_u16),
            status_code: entries.get("statusCode").and_then(as_u16),
            response,
            request,
        })
    }

    /// Is this an authorization failure (HTTP 401 or the provider
    /// auth error code)?
    pub fn is_auth(&self) -> bool {
        self.status == Some(401)
            || self.status_code == Some(401)
            || self.code == Some(AUTH_ERROR_CODE)
            || self
                .response
                .as_ref()
                .is_some_and(|response| response.status == Some(401))
    }
}

impl From<Error> for Fault {
    fn from(err: Error) -> Self {
        Self {
            name: "Error".to_string(),
            message: err.to_string(),
            ..Self::default()
        }
    }
}

fn as_u16(value: &Value) -> Option<u16> {
    value.as_u64().and_then(|n| u16::try_from(n).ok())
}

/// Reduce a fault to its safe, bounded projection.
///
/// Every field in the result is a primitive or has passed through the
/// summarizer; request headers and raw response bodies never appear.
pub fn sanitize(fault: &Fault) -> Value {
    let mut out = Map::new();
    out.insert("name".to_string(), Value::String(fault.name.clone()));
    out.insert(
        "message".to_string(),
        summarize(&Value::String(fault.message.clone())),
    );
    if let Some(code) = fault.code {
        out.insert("code".to_string(), Value::from(code));
    }
    if let Some(status) = fault.status {
        out.insert("status".to_string(), Value::from(status));
    }
    if let Some(status_code) = fault.status_code {
        out.insert("statusCode".to_string(), Value::from(status_code));
    }

    if let Some(ref response) = fault.response {
        let mut safe = Map::new();
        if let Some(status) = response.status {
            safe.insert("status".to_string(), Value::from(status));
        }
        if let Some(ref data) = response.data {
            let summarized = match data {
                Payload::Value(value) => summarize(value),
                Payload::Bytes(bytes) => summarize_bytes(bytes),
            };
            safe.insert("data".to_string(), summarized);
        }
        if let Some(ref headers) = response.headers {
            safe.insert("headers".to_string(), summarize(headers));
        }
        out.insert("response".to_string(), Value::Object(safe));
    }

    if let Some(ref request) = fault.request {
        let mut safe = Map::new();
        if let Some(ref url) = request.url {
            safe.insert("url".to_string(), summarize(&Value::String(url.clone())));
        }
        if let Some(ref method) = request.method {
            safe.insert("method".to_string(), Value::String(method.clone()));
        }
        if let Some(timeout) = request.timeout_ms {
            safe.insert("timeout".to_string(), Value::from(timeout));
        }
        out.insert("config".to_string(), Value::Object(safe));
    }

    Value::Object(out)
}

/// Sanitize an arbitrary value: error-like input goes through
/// [`sanitize`], everything else through the summarizer.
pub fn sanitize_value(value: &Value) -> Value {
    match Fault::from_value(value) {
        Some(fault) => sanitize(&fault),
        None => summarize(value),
    }
}

/// Log a failed asynchronous operation.
///
/// Auth failures collapse into a one-line notice; everything else is
/// logged in full through the sanitizer.
pub fn report_rejection(fault: &Fault) {
    if fault.is_auth() {
        warn!(status = 401, "Unauthorized request skipped");
    } else {
        error!(fault = %sanitize(fault), "unhandled rejection");
    }
}

/// Log an uncaught synchronous fault. Same policy as
/// [`report_rejection`] with its own notice text. Logging only; the
/// caller still decides whether the process dies.
pub fn report_uncaught(fault: &Fault) {
    if fault.is_auth() {
        warn!(status = 401, "Unauthorized exception skipped");
    } else {
        error!(fault = %sanitize(fault), "uncaught fault");
    }
}

/// Install a process-wide panic hook that routes panic payloads through
/// the sanitizing log pipeline. The hook logs; the process still
/// unwinds afterwards.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = info.payload();
        if let Some(fault) = payload.downcast_ref::<Fault>() {
            report_uncaught(fault);
            return;
        }
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "opaque panic payload".to_string());
        let location = info
            .location()
            .map(|location| location.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        error!(message = %summarize(&serde_json::Value::String(message)), %location, "uncaught panic");
    }));
}

/// Spawn a task whose failure is reported instead of dropped.
///
/// An `Err` outcome here is the counterpart of an unhandled rejection:
/// it goes through [`report_rejection`] and the task ends cleanly.
pub fn supervise<F, E>(name: &'static str, future: F) -> tokio::task::JoinHandle<()>
where
    F: Future<Output = std::result::Result<(), E>> + Send + 'static,
    E: Into<Fault>,
{
    tokio::spawn(
        async move {
            if let Err(err) = future.await {
                report_rejection(&err.into());
            }
        }
        .instrument(error_span!("supervised", task = name)),
    )
}
