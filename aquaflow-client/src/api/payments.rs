//! Payments API (`/pagamentos`)

use shared::client::DeletedResponse;
use shared::models::{
    MonthlyReportQuery, MonthlyReportRow, Payment, PaymentCreate, PaymentFilter, PaymentUpdate,
};

use crate::ClientResult;
use crate::http::HttpClient;

pub struct PaymentsApi<'a, C> {
    http: &'a C,
}

impl<'a, C: HttpClient> PaymentsApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    pub async fn list(&self, filter: &PaymentFilter) -> ClientResult<Vec<Payment>> {
        self.http.get_with_query("/pagamentos", filter).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Payment> {
        self.http.get(&format!("/pagamentos/{id}")).await
    }

    pub async fn create(&self, payload: &PaymentCreate) -> ClientResult<Payment> {
        self.http.post("/pagamentos", payload).await
    }

    pub async fn update(&self, id: i64, payload: &PaymentUpdate) -> ClientResult<Payment> {
        self.http.put(&format!("/pagamentos/{id}"), payload).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<DeletedResponse> {
        self.http.delete(&format!("/pagamentos/{id}")).await
    }

    /// Totals grouped by reference month and payment method
    pub async fn monthly_report(
        &self,
        query: &MonthlyReportQuery,
    ) -> ClientResult<Vec<MonthlyReportRow>> {
        self.http
            .get_with_query("/pagamentos/relatorio-mensal", query)
            .await
    }
}
