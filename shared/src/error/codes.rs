//! Unified error codes for AquaFlow
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Student errors
//! - 4xxx: Schedule / enrollment errors
//! - 5xxx: Payment errors
//! - 6xxx: Instructor errors
//! - 7xxx: Plan errors
//! - 8xxx: User account errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes travel as plain `u16` values in the `code` field of error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Cannot delete own account
    CannotDeleteSelf = 2005,

    // ==================== 3xxx: Student ====================
    /// Student not found
    StudentNotFound = 3001,
    /// Student is inactive
    StudentInactive = 3002,

    // ==================== 4xxx: Schedule ====================
    /// Schedule session not found
    SessionNotFound = 4001,
    /// Session is at maximum capacity
    SessionFull = 4002,
    /// Student already enrolled in the session
    AlreadyEnrolled = 4003,
    /// Student is not enrolled in the session
    NotEnrolled = 4004,
    /// Session still has enrolled students
    SessionHasEnrollments = 4005,
    /// Capacity would drop below the enrolled count
    CapacityBelowEnrolled = 4006,

    // ==================== 5xxx: Payment ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Invalid payment method
    PaymentInvalidMethod = 5003,
    /// Invalid reference month
    InvalidReferenceMonth = 5006,

    // ==================== 6xxx: Instructor ====================
    /// Instructor not found
    InstructorNotFound = 6001,
    /// Instructor email or CPF already registered
    InstructorAlreadyExists = 6002,

    // ==================== 7xxx: Plan ====================
    /// Plan not found
    PlanNotFound = 7001,

    // ==================== 8xxx: User ====================
    /// User account not found
    UserNotFound = 8001,
    /// Username or email already registered
    UserAlreadyExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage error
    StorageError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::CannotDeleteSelf => "Cannot delete your own account",

            // Student
            ErrorCode::StudentNotFound => "Student not found",
            ErrorCode::StudentInactive => "Student is inactive",

            // Schedule
            ErrorCode::SessionNotFound => "Schedule session not found",
            ErrorCode::SessionFull => "Schedule session is at maximum capacity",
            ErrorCode::AlreadyEnrolled => "Student is already enrolled in this session",
            ErrorCode::NotEnrolled => "Student is not enrolled in this session",
            ErrorCode::SessionHasEnrollments => "Schedule session still has enrolled students",
            ErrorCode::CapacityBelowEnrolled => "Capacity is below the enrolled count",

            // Payment
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::InvalidReferenceMonth => "Reference month must be YYYY-MM",

            // Instructor
            ErrorCode::InstructorNotFound => "Instructor not found",
            ErrorCode::InstructorAlreadyExists => "Instructor email or CPF already registered",

            // Plan
            ErrorCode::PlanNotFound => "Plan not found",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserAlreadyExists => "Username or email already registered",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a numeric value does not name a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2005 => Ok(ErrorCode::CannotDeleteSelf),

            // Student
            3001 => Ok(ErrorCode::StudentNotFound),
            3002 => Ok(ErrorCode::StudentInactive),

            // Schedule
            4001 => Ok(ErrorCode::SessionNotFound),
            4002 => Ok(ErrorCode::SessionFull),
            4003 => Ok(ErrorCode::AlreadyEnrolled),
            4004 => Ok(ErrorCode::NotEnrolled),
            4005 => Ok(ErrorCode::SessionHasEnrollments),
            4006 => Ok(ErrorCode::CapacityBelowEnrolled),

            // Payment
            5001 => Ok(ErrorCode::PaymentNotFound),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),
            5006 => Ok(ErrorCode::InvalidReferenceMonth),

            // Instructor
            6001 => Ok(ErrorCode::InstructorNotFound),
            6002 => Ok(ErrorCode::InstructorAlreadyExists),

            // Plan
            7001 => Ok(ErrorCode::PlanNotFound),

            // User
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UserAlreadyExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
