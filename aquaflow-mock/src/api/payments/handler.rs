//! Payment API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use http::StatusCode;
use shared::AppResult;
use shared::models::{
    MonthlyReportQuery, MonthlyReportRow, Payment, PaymentCreate, PaymentFilter, PaymentUpdate,
};
use validator::Validate;

use crate::api::MessageResponse;
use crate::auth::CurrentUser;
use crate::state::AppState;

/// GET /pagamentos
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PaymentFilter>,
) -> AppResult<Json<Vec<Payment>>> {
    Ok(Json(state.store.read().await.list_payments(&filter)))
}

/// GET /pagamentos/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Payment>> {
    let store = state.store.read().await;
    Ok(Json(store.payment(id)?.clone()))
}

/// POST /pagamentos
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    payload.validate()?;
    let payment = state.store.write().await.create_payment(payload)?;
    tracing::info!(
        payment_id = payment.id,
        student_id = payment.student_id,
        amount = %payment.amount,
        by = current.id,
        "Payment registered"
    );
    Ok((StatusCode::CREATED, Json(payment)))
}

/// PUT /pagamentos/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentUpdate>,
) -> AppResult<Json<Payment>> {
    payload.validate()?;
    Ok(Json(state.store.write().await.update_payment(id, payload)?))
}

/// DELETE /pagamentos/:id
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.store.write().await.delete_payment(id)?;
    tracing::info!(payment_id = id, by = current.id, "Payment deleted");
    Ok(Json(MessageResponse::new("Pagamento deletado com sucesso")))
}

/// GET /pagamentos/relatorio-mensal?ano=&mes=
pub async fn monthly_report(
    State(state): State<AppState>,
    Query(query): Query<MonthlyReportQuery>,
) -> AppResult<Json<Vec<MonthlyReportRow>>> {
    Ok(Json(state.store.read().await.monthly_report(&query)))
}
