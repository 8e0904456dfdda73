//! Plans API (`/planos`)

use shared::client::{DeletedResponse, PlanFilter};
use shared::models::{Plan, PlanCreate, PlanUpdate};

use crate::ClientResult;
use crate::http::HttpClient;

pub struct PlansApi<'a, C> {
    http: &'a C,
}

impl<'a, C: HttpClient> PlansApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// Plans ordered by price; active only unless the filter says otherwise
    pub async fn list(&self, filter: &PlanFilter) -> ClientResult<Vec<Plan>> {
        self.http.get_with_query("/planos", filter).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Plan> {
        self.http.get(&format!("/planos/{id}")).await
    }

    pub async fn create(&self, payload: &PlanCreate) -> ClientResult<Plan> {
        self.http.post("/planos", payload).await
    }

    pub async fn update(&self, id: i64, payload: &PlanUpdate) -> ClientResult<Plan> {
        self.http.put(&format!("/planos/{id}"), payload).await
    }

    /// Deactivates the plan
    pub async fn delete(&self, id: i64) -> ClientResult<DeletedResponse> {
        self.http.delete(&format!("/planos/{id}")).await
    }
}
