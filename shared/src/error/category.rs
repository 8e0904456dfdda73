//! Error categories, one per thousand-block of codes

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Area of the system an [`ErrorCode`] belongs to
///
/// The thousands digit of the code picks the category:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Student errors
/// - 4xxx: Schedule errors
/// - 5xxx: Payment errors
/// - 6xxx: Instructor errors
/// - 7xxx: Plan errors
/// - 8xxx: User errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Student errors (3xxx)
    Student,
    /// Schedule and enrollment errors (4xxx)
    Schedule,
    /// Payment errors (5xxx)
    Payment,
    /// Instructor errors (6xxx)
    Instructor,
    /// Plan errors (7xxx)
    Plan,
    /// User account errors (8xxx)
    User,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Category of a raw code; anything past 9xxx counts as system
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Student,
            4000..5000 => Self::Schedule,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Instructor,
            7000..8000 => Self::Plan,
            8000..9000 => Self::User,
            _ => Self::System,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Student => "student",
            Self::Schedule => "schedule",
            Self::Payment => "payment",
            Self::Instructor => "instructor",
            Self::Plan => "plan",
            Self::User => "user",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Student);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Schedule);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Payment);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Instructor);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Plan);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::User);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::SessionFull.category(), ErrorCategory::Schedule);
        assert_eq!(ErrorCode::StudentInactive.category(), ErrorCategory::Student);
        assert_eq!(ErrorCode::InternalError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Schedule).unwrap();
        assert_eq!(json, "\"schedule\"");
        let category: ErrorCategory = serde_json::from_str("\"auth\"").unwrap();
        assert_eq!(category, ErrorCategory::Auth);
    }
}
