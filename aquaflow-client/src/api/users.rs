//! Users API (`/users`, admin only)

use shared::client::{DeletedResponse, UserFilter};
use shared::models::{User, UserCreate, UserUpdate};

use crate::ClientResult;
use crate::http::HttpClient;

pub struct UsersApi<'a, C> {
    http: &'a C,
}

impl<'a, C: HttpClient> UsersApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &UserFilter) -> ClientResult<Vec<User>> {
        self.http.get_with_query("/users", filter).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<User> {
        self.http.get(&format!("/users/{id}")).await
    }

    pub async fn create(&self, payload: &UserCreate) -> ClientResult<User> {
        self.http.post("/users", payload).await
    }

    pub async fn update(&self, id: i64, payload: &UserUpdate) -> ClientResult<User> {
        self.http.put(&format!("/users/{id}"), payload).await
    }

    /// Soft delete; the backend refuses to deactivate the caller's own account
    pub async fn deactivate(&self, id: i64) -> ClientResult<DeletedResponse> {
        self.http.delete(&format!("/users/{id}")).await
    }

    pub async fn activate(&self, id: i64) -> ClientResult<User> {
        self.http.post_empty(&format!("/users/{id}/activate")).await
    }
}
