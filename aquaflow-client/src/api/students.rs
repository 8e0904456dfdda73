//! Students API (`/alunos`)

use shared::client::{DeletedResponse, ExpiringQuery};
use shared::models::{Payment, Student, StudentCreate, StudentFilter, StudentUpdate};

use crate::ClientResult;
use crate::http::HttpClient;

pub struct StudentsApi<'a, C> {
    http: &'a C,
}

impl<'a, C: HttpClient> StudentsApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// `GET /alunos` - the backend returns only active students unless `ativo` is set
    pub async fn list(&self, filter: &StudentFilter) -> ClientResult<Vec<Student>> {
        self.http.get_with_query("/alunos", filter).await
    }

    /// Active students only
    pub async fn list_active(&self) -> ClientResult<Vec<Student>> {
        let filter = StudentFilter {
            active: Some(true),
            class_type: None,
        };
        self.list(&filter).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Student> {
        self.http.get(&format!("/alunos/{id}")).await
    }

    /// `POST /alunos`; a missing contract end is derived from start + duration
    pub async fn create(&self, payload: &StudentCreate) -> ClientResult<Student> {
        let mut payload = payload.clone();
        payload.derive_contract_end();
        self.http.post("/alunos", &payload).await
    }

    pub async fn update(&self, id: i64, payload: &StudentUpdate) -> ClientResult<Student> {
        self.http.put(&format!("/alunos/{id}"), payload).await
    }

    /// `DELETE /alunos/{id}` - deactivates, never hard-deletes
    pub async fn deactivate(&self, id: i64) -> ClientResult<DeletedResponse> {
        self.http.delete(&format!("/alunos/{id}")).await
    }

    /// Active students with no payment in the last 45 days
    pub async fn delinquent(&self) -> ClientResult<Vec<Student>> {
        self.http.get("/alunos/inadimplentes").await
    }

    /// Active students whose contract ends within `days`
    pub async fn expiring_contracts(&self, days: u32) -> ClientResult<Vec<Student>> {
        self.http
            .get_with_query("/alunos/contratos-expirando", &ExpiringQuery { days })
            .await
    }

    pub async fn payments(&self, id: i64) -> ClientResult<Vec<Payment>> {
        self.http.get(&format!("/alunos/{id}/pagamentos")).await
    }
}
