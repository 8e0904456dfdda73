//! Client error types

use reqwest::StatusCode;
use shared::error::ErrorCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::session::StorageError;

/// Notice shown when the backend gives no usable `detail`
pub const GENERIC_NOTICE: &str = "Erro ao processar a solicitação. Tente novamente.";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered 401; the session has already been cleared
    #[error("Authentication required")]
    Unauthorized,

    /// Error body returned by the backend (`{"detail": ..., "code": ...}`)
    #[error("API error ({status}): {detail}")]
    Api {
        status: StatusCode,
        code: Option<ErrorCode>,
        detail: String,
    },

    /// Permission denied (no parseable body)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (no parseable body)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (no parseable body)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error (no parseable body)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted session could not be written or removed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// HTTP status of a failed response, when there was one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Api { status, .. } => Some(*status),
            Self::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Validation(_) => Some(StatusCode::BAD_REQUEST),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Backend error code, when the body carried one
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// User-facing notice: the backend's `detail` if present, else a generic message
    pub fn notice(&self) -> String {
        match self {
            Self::Api { detail, .. } if !detail.trim().is_empty() => detail.clone(),
            Self::Unauthorized => "Sessão expirada. Faça login novamente.".to_string(),
            _ => GENERIC_NOTICE.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_prefers_backend_detail() {
        let err = ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            code: Some(ErrorCode::SessionFull),
            detail: "Horário lotado".into(),
        };
        assert_eq!(err.notice(), "Horário lotado");
        assert_eq!(err.code(), Some(ErrorCode::SessionFull));
    }

    #[test]
    fn test_notice_falls_back_to_generic() {
        let err = ClientError::Internal("<html>bad gateway</html>".into());
        assert_eq!(err.notice(), GENERIC_NOTICE);

        let blank = ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            code: None,
            detail: "  ".into(),
        };
        assert_eq!(blank.notice(), GENERIC_NOTICE);
    }

    #[test]
    fn test_status_mapping() {
        assert!(ClientError::NotFound("x".into()).is_not_found());
        assert!(ClientError::Unauthorized.is_unauthorized());
        assert_eq!(
            ClientError::Validation("x".into()).status(),
            Some(StatusCode::BAD_REQUEST)
        );
        assert_eq!(ClientError::InvalidResponse("x".into()).status(), None);
    }
}
