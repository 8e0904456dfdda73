//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::StudentNotFound
            | Self::SessionNotFound
            | Self::NotEnrolled
            | Self::PaymentNotFound
            | Self::InstructorNotFound
            | Self::PlanNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::AdminRequired
            | Self::AccountDisabled => StatusCode::FORBIDDEN,

            // 503 Service Unavailable
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::StorageError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request: duplicates, capacity, validation, self-deletion.
            // The backend reports enrollment conflicts as 400, not 409.
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::SessionNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::NotEnrolled.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_forbidden_status() {
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::AccountDisabled.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_enrollment_conflicts_are_bad_request() {
        assert_eq!(ErrorCode::SessionFull.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::AlreadyEnrolled.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::StudentInactive.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::SessionHasEnrollments.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::CannotDeleteSelf.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
