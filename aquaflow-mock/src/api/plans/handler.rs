//! Plan API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use http::StatusCode;
use shared::AppResult;
use shared::client::PlanFilter;
use shared::models::{Plan, PlanCreate, PlanUpdate};
use validator::Validate;

use crate::api::MessageResponse;
use crate::state::AppState;

/// GET /planos - active plans unless `ativo=false`
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PlanFilter>,
) -> AppResult<Json<Vec<Plan>>> {
    Ok(Json(state.store.read().await.list_plans(&filter)))
}

/// GET /planos/:id
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Plan>> {
    let store = state.store.read().await;
    Ok(Json(store.plan(id)?.clone()))
}

/// POST /planos
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PlanCreate>,
) -> AppResult<(StatusCode, Json<Plan>)> {
    payload.validate()?;
    let plan = state.store.write().await.create_plan(payload)?;
    tracing::info!(plan_id = plan.id, name = %plan.name, "Plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

/// PUT /planos/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PlanUpdate>,
) -> AppResult<Json<Plan>> {
    payload.validate()?;
    Ok(Json(state.store.write().await.update_plan(id, payload)?))
}

/// DELETE /planos/:id - soft delete
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.store.write().await.deactivate_plan(id)?;
    Ok(Json(MessageResponse::with_id("Plano desativado com sucesso", id)))
}
