use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOperation {
    List,
    Create,
    Update,
    Delete,
}

impl RemoteOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteOperation::List => "list",
            RemoteOperation::Create => "create",
            RemoteOperation::Update => "update",
            RemoteOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single failure kind for calls against the appointment service:
/// network errors, non-success statuses and malformed bodies alike.
#[derive(Debug, Clone, Error)]
#[error("remote {operation} failed: {reason}")]
pub struct RemoteError {
    pub operation: RemoteOperation,
    pub reason: String,
}

impl RemoteError {
    pub fn new(operation: RemoteOperation, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }

    pub fn from_http(operation: RemoteOperation, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else if err.is_decode() {
            format!("malformed response: {err}")
        } else {
            err.to_string()
        };
        Self::new(operation, reason)
    }
}
