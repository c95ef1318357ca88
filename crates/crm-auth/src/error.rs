use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated; run `crm auth login`")]
    NotAuthenticated,

    /// The backend answered 401. Triggers the forced logout.
    #[error("unauthorized: {}", or_default(.detail.as_deref(), "credentials rejected"))]
    Unauthorized { detail: Option<String> },

    /// Any other non-success status, with the server's `detail` when present.
    #[error("HTTP {status}: {}", or_default(.detail.as_deref(), "request failed"))]
    Http { status: u16, detail: Option<String> },

    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("session store error: {0}")]
    Storage(String),

    /// A request could not be prepared (body encoding, header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("token format error: {0}")]
    TokenFormat(String),
}

fn or_default<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.unwrap_or(fallback)
}

impl AuthError {
    /// Build the error for a non-success response.
    #[must_use]
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let detail = parse_detail(body);
        if status == 401 {
            Self::Unauthorized { detail }
        } else {
            Self::Http { status, detail }
        }
    }

    /// Server-provided message suitable for showing to the user.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Extract `detail` from an error body.
///
/// FastAPI sends either `{"detail": "message"}` or, for validation failures,
/// `{"detail": [{"loc": [...], "msg": "..."}]}`. The latter is joined.
fn parse_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        Value::Array(items) => {
            let messages = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
