//! Instructor API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::AppResult;
use shared::client::InstructorFilter;
use shared::models::{Instructor, InstructorCreate, InstructorUpdate};
use validator::Validate;

use crate::api::MessageResponse;
use crate::state::AppState;

/// GET /professores
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<InstructorFilter>,
) -> AppResult<Json<Vec<Instructor>>> {
    Ok(Json(state.store.read().await.list_instructors(&filter)))
}

/// GET /professores/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Instructor>> {
    let store = state.store.read().await;
    Ok(Json(store.instructor(id)?.clone()))
}

/// POST /professores
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<InstructorCreate>,
) -> AppResult<Json<Instructor>> {
    payload.validate()?;
    let instructor = state.store.write().await.create_instructor(payload)?;
    tracing::info!(instructor_id = instructor.id, "Instructor created");
    Ok(Json(instructor))
}

/// PUT /professores/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<InstructorUpdate>,
) -> AppResult<Json<Instructor>> {
    payload.validate()?;
    Ok(Json(state.store.write().await.update_instructor(id, payload)?))
}

/// DELETE /professores/:id - soft delete
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.store.write().await.deactivate_instructor(id)?;
    tracing::info!(instructor_id = id, "Instructor deactivated");
    Ok(Json(MessageResponse::new("Professor removido com sucesso")))
}
