//! Users and credentials

use shared::client::UserFilter;
use shared::models::{Role, User, UserCreate, UserUpdate};
use shared::{AppError, AppResult, ErrorCode};

use super::{Store, now};

/// A user and their argon2 password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

fn user_not_found() -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, "Usuário não encontrado")
}

impl Store {
    /// Create the initial superuser
    pub fn seed_admin(&mut self, email: &str, password_hash: String) -> &User {
        let created_at = now();
        let record = self.users.insert_with(|id| UserRecord {
            user: User {
                id,
                email: email.to_string(),
                username: "admin".to_string(),
                full_name: "Administrador".to_string(),
                role: Role::Admin,
                is_active: true,
                is_superuser: true,
                created_at,
                updated_at: None,
                last_login: None,
            },
            password_hash,
        });
        &record.user
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.get(id).map(|r| &r.user)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|r| r.user.email.eq_ignore_ascii_case(email))
    }

    /// Stamp `last_login` and return the updated user
    pub fn record_login(&mut self, id: i64) -> AppResult<User> {
        let record = self.users.get_mut(id).ok_or_else(user_not_found)?;
        record.user.last_login = Some(now());
        Ok(record.user.clone())
    }

    /// Newest first, then `skip`/`limit`
    pub fn list_users(&self, filter: &UserFilter) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .values()
            .map(|r| &r.user)
            .filter(|u| filter.role.is_none_or(|role| u.role == role))
            .filter(|u| filter.is_active.is_none_or(|active| u.is_active == active))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        users
            .into_iter()
            .skip(filter.skip.unwrap_or(0))
            .take(filter.page_size())
            .collect()
    }

    fn check_user_unique(&self, email: Option<&str>, username: Option<&str>, except: Option<i64>) -> AppResult<()> {
        let others = || self.users.values().filter(|r| Some(r.user.id) != except);
        if let Some(email) = email
            && others().any(|r| r.user.email.eq_ignore_ascii_case(email))
        {
            return Err(AppError::with_message(ErrorCode::UserAlreadyExists, "Email já cadastrado"));
        }
        if let Some(username) = username
            && others().any(|r| r.user.username == username)
        {
            return Err(AppError::with_message(
                ErrorCode::UserAlreadyExists,
                "Username já cadastrado",
            ));
        }
        Ok(())
    }

    /// Admins are created as superusers
    pub fn create_user(&mut self, payload: UserCreate, password_hash: String) -> AppResult<User> {
        self.check_user_unique(Some(&payload.email), Some(&payload.username), None)?;
        let created_at = now();
        let record = self.users.insert_with(|id| UserRecord {
            user: User {
                id,
                email: payload.email,
                username: payload.username,
                full_name: payload.full_name,
                role: payload.role,
                is_active: true,
                is_superuser: payload.role == Role::Admin,
                created_at,
                updated_at: None,
                last_login: None,
            },
            password_hash,
        });
        Ok(record.user.clone())
    }

    /// `password_hash` replaces the stored hash when the payload carried a password
    pub fn update_user(
        &mut self,
        id: i64,
        payload: UserUpdate,
        password_hash: Option<String>,
    ) -> AppResult<User> {
        if !self.users.contains(id) {
            return Err(user_not_found());
        }
        self.check_user_unique(payload.email.as_deref(), payload.username.as_deref(), Some(id))?;

        let record = self.users.get_mut(id).ok_or_else(user_not_found)?;
        let user = &mut record.user;
        if let Some(email) = payload.email {
            user.email = email;
        }
        if let Some(username) = payload.username {
            user.username = username;
        }
        if let Some(full_name) = payload.full_name {
            user.full_name = full_name;
        }
        if let Some(role) = payload.role {
            user.role = role;
            user.is_superuser = role == Role::Admin;
        }
        if let Some(is_active) = payload.is_active {
            user.is_active = is_active;
        }
        if let Some(is_superuser) = payload.is_superuser {
            user.is_superuser = is_superuser;
        }
        if let Some(hash) = password_hash {
            record.password_hash = hash;
        }
        record.user.updated_at = Some(now());
        Ok(record.user.clone())
    }

    /// Soft delete; nobody can deactivate themselves
    pub fn deactivate_user(&mut self, id: i64, actor_id: i64) -> AppResult<()> {
        let record = self.users.get_mut(id).ok_or_else(user_not_found)?;
        if id == actor_id {
            return Err(AppError::with_message(
                ErrorCode::CannotDeleteSelf,
                "Você não pode desativar sua própria conta",
            ));
        }
        record.user.is_active = false;
        record.user.updated_at = Some(now());
        Ok(())
    }

    pub fn activate_user(&mut self, id: i64) -> AppResult<User> {
        let record = self.users.get_mut(id).ok_or_else(user_not_found)?;
        record.user.is_active = true;
        record.user.updated_at = Some(now());
        Ok(record.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        let mut store = Store::new();
        store.seed_admin("admin@aquaflow.com", "hash".into());
        store
    }

    fn payload(email: &str, username: &str) -> UserCreate {
        UserCreate {
            email: email.into(),
            username: username.into(),
            full_name: "Recepção".into(),
            role: Role::Receptionist,
            password: "segredo123".into(),
        }
    }

    #[test]
    fn test_duplicate_email_and_username() {
        let mut store = store();
        store.create_user(payload("r@aquaflow.com", "recepcao"), "h".into()).unwrap();

        let err = store
            .create_user(payload("R@aquaflow.com", "outra"), "h".into())
            .unwrap_err();
        assert_eq!(err.message, "Email já cadastrado");

        let err = store
            .create_user(payload("novo@aquaflow.com", "recepcao"), "h".into())
            .unwrap_err();
        assert_eq!(err.message, "Username já cadastrado");
    }

    #[test]
    fn test_cannot_deactivate_self() {
        let mut store = store();
        let err = store.deactivate_user(1, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::CannotDeleteSelf);

        let user = store.create_user(payload("r@aquaflow.com", "recepcao"), "h".into()).unwrap();
        store.deactivate_user(user.id, 1).unwrap();
        assert!(!store.user(user.id).unwrap().is_active);
        assert!(store.activate_user(user.id).unwrap().is_active);
    }

    #[test]
    fn test_list_filters_and_pages() {
        let mut store = store();
        for i in 0..3 {
            store
                .create_user(payload(&format!("u{i}@aquaflow.com"), &format!("user{i}")), "h".into())
                .unwrap();
        }
        let staff = store.list_users(&UserFilter {
            role: Some(Role::Receptionist),
            ..Default::default()
        });
        assert_eq!(staff.len(), 3);
        // newest first
        assert_eq!(staff[0].username, "user2");

        let page = store.list_users(&UserFilter {
            skip: Some(1),
            limit: Some(2),
            ..Default::default()
        });
        assert_eq!(page.len(), 2);
    }
}
