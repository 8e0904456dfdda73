//! Authentication
//!
//! - [`JwtService`] - access token issuing and validation
//! - [`CurrentUser`] - the authenticated caller, injected by [`require_auth`]
//! - [`require_staff`] / [`require_admin`] - role gates layered per router

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

use shared::models::{Role, User};

pub use jwt::{Claims, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_staff};
pub use password::{hash_password, verify_password};

/// Authenticated caller, resolved from the token and the user table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub is_superuser: bool,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.is_superuser
    }

    /// Admin or receptionist
    pub fn is_staff(&self) -> bool {
        self.role.is_staff() || self.is_superuser
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            is_superuser: user.is_superuser,
        }
    }
}
