//! Client-related types shared between server and client
//!
//! Request/response types used in API communication that do not belong to a
//! single model.

use serde::{Deserialize, Serialize};

use crate::models::{Role, Specialty, User};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// =============================================================================
// Generic responses
// =============================================================================

/// `{"message": ..., "id": ...}` returned by deletes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
    #[serde(default, alias = "user_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

// =============================================================================
// Enrollment DTOs
// =============================================================================

/// Result of `POST /horarios/{id}/alunos/{aluno_id}` and its `DELETE`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentReceipt {
    pub message: String,
    #[serde(rename = "horario_id")]
    pub session_id: i64,
    #[serde(rename = "aluno_id")]
    pub student_id: i64,
    /// Only present on admission
    #[serde(rename = "matricula_id", default, skip_serializing_if = "Option::is_none")]
    pub enrollment_id: Option<i64>,
}

// =============================================================================
// List filters
// =============================================================================

/// Query for `GET /professores`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstructorFilter {
    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<Specialty>,
}

/// Query for `GET /planos`; the backend lists active plans unless told otherwise
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanFilter {
    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Query for `GET /users`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UserFilter {
    pub const DEFAULT_LIMIT: usize = 50;
    pub const MAX_LIMIT: usize = 100;

    /// Effective page size, clamped to 1..=100
    pub fn page_size(&self) -> usize {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// Query for `GET /alunos/contratos-expirando`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExpiringQuery {
    #[serde(rename = "dias", default = "default_expiring_days")]
    pub days: u32,
}

impl Default for ExpiringQuery {
    fn default() -> Self {
        Self {
            days: default_expiring_days(),
        }
    }
}

fn default_expiring_days() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_defaults_token_type() {
        let json = r#"{
            "access_token": "abc", "expires_in": 86400,
            "user": {"id": 1, "email": "a@b.c", "username": "admin", "full_name": "Admin",
                     "role": "admin", "is_active": true, "created_at": "2024-01-01T00:00:00"}
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.token_type, "bearer");
        assert!(token.user.is_admin());
    }

    #[test]
    fn test_receipt_wire_names() {
        let json = r#"{"message":"ok","horario_id":3,"aluno_id":7,"matricula_id":11}"#;
        let receipt: EnrollmentReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.session_id, 3);
        assert_eq!(receipt.enrollment_id, Some(11));

        let removal = r#"{"message":"ok","horario_id":3,"aluno_id":7}"#;
        let receipt: EnrollmentReceipt = serde_json::from_str(removal).unwrap();
        assert!(receipt.enrollment_id.is_none());
    }

    #[test]
    fn test_deleted_response_accepts_user_id() {
        let json = r#"{"message":"Usuário desativado com sucesso","user_id":4}"#;
        let deleted: DeletedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(deleted.id, Some(4));

        let bare: DeletedResponse = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert!(bare.id.is_none());
    }

    #[test]
    fn test_user_filter_page_size() {
        assert_eq!(UserFilter::default().page_size(), 50);
        let big = UserFilter {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(big.page_size(), 100);
    }

    #[test]
    fn test_expiring_query_default() {
        let q: ExpiringQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.days, 30);
    }
}
