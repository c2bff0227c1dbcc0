//! Failure taxonomy for remote content and publishing operations.

/// Uniform failure carrier for every sync operation.
///
/// Each variant carries only the fields relevant to it; `status()` and `code()`
/// project it onto the HTTP-style shape rendered by the request surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrationError {
    /// A credential or repository target is not configured.
    #[error("{message}")]
    Configuration { code: &'static str, message: String },

    /// The remote store reported 404.
    #[error("{message}")]
    NotFound {
        message: String,
        code: Option<String>,
    },

    /// The remote store rejected the credential (401/403).
    #[error("{message}")]
    Authorization {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// The caller's expected revision is stale.
    #[error("Revision conflict on {path}: expected {expected}, found {live}")]
    Conflict {
        path: String,
        expected: String,
        live: String,
    },

    /// The remote store returned content in an encoding we cannot decode.
    #[error("Unsupported encoding: {encoding}")]
    Encoding { encoding: String },

    /// Any other non-success reported by a remote store.
    #[error("{message}")]
    Remote {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success response whose body could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl IntegrationError {
    /// Build a configuration error for a missing setting.
    pub fn missing_config(code: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            code,
            message: message.into(),
        }
    }

    /// HTTP-style status for this failure.
    pub fn status(&self) -> u16 {
        match self {
            Self::Configuration { .. } => 500,
            Self::NotFound { .. } => 404,
            Self::Authorization { status, .. } => *status,
            Self::Conflict { .. } => 409,
            Self::Encoding { .. } => 422,
            Self::Remote { status, .. } => *status,
            Self::Transport(_) | Self::MalformedResponse(_) => 500,
        }
    }

    /// Machine-readable code, when one applies.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Configuration { code, .. } => Some(code),
            Self::NotFound { code, .. }
            | Self::Authorization { code, .. }
            | Self::Remote { code, .. } => code.as_deref(),
            Self::Conflict { .. } => Some("REVISION_MISMATCH"),
            Self::Encoding { .. } => Some("UNSUPPORTED_ENCODING"),
            Self::Transport(_) => Some("TRANSPORT_ERROR"),
            Self::MalformedResponse(_) => Some("MALFORMED_RESPONSE"),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Classify a non-success remote response.
///
/// `message` and `code` come from the remote body when it carried them;
/// `fallback` is used as the message otherwise. A missing status maps to 500.
pub fn classify_remote_failure(
    status: Option<u16>,
    message: Option<String>,
    code: Option<String>,
    fallback: &str,
) -> IntegrationError {
    let message = message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());

    match status.unwrap_or(500) {
        404 => IntegrationError::NotFound { message, code },
        status @ (401 | 403) => IntegrationError::Authorization {
            status,
            message,
            code,
        },
        status => IntegrationError::Remote {
            status,
            message,
            code,
        },
    }
}

pub type Result<T> = std::result::Result<T, IntegrationError>;
