use serde::{Deserialize, Serialize};

/// Error body the appointment service may attach to a non-success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, alias = "error")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Best-effort decode of a response body; empty or non-JSON bodies yield `None`.
    pub fn from_body(body: &str) -> Option<Self> {
        let parsed: Self = serde_json::from_str(body).ok()?;
        (!parsed.message.trim().is_empty()).then_some(parsed)
    }
}
