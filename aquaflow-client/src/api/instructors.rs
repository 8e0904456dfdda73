//! Instructors API (`/professores`)

use shared::client::{DeletedResponse, InstructorFilter};
use shared::models::{Instructor, InstructorCreate, InstructorUpdate};

use crate::ClientResult;
use crate::http::HttpClient;

pub struct InstructorsApi<'a, C> {
    http: &'a C,
}

impl<'a, C: HttpClient> InstructorsApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &InstructorFilter) -> ClientResult<Vec<Instructor>> {
        self.http.get_with_query("/professores", filter).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Instructor> {
        self.http.get(&format!("/professores/{id}")).await
    }

    pub async fn create(&self, payload: &InstructorCreate) -> ClientResult<Instructor> {
        self.http.post("/professores", payload).await
    }

    pub async fn update(&self, id: i64, payload: &InstructorUpdate) -> ClientResult<Instructor> {
        self.http.put(&format!("/professores/{id}"), payload).await
    }

    /// Soft delete (marks inactive)
    pub async fn delete(&self, id: i64) -> ClientResult<DeletedResponse> {
        self.http.delete(&format!("/professores/{id}")).await
    }
}
