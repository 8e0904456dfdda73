//! Student API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::AppResult;
use shared::client::ExpiringQuery;
use shared::models::{Payment, Student, StudentCreate, StudentFilter, StudentUpdate};
use validator::Validate;

use crate::api::MessageResponse;
use crate::auth::CurrentUser;
use crate::state::AppState;
use crate::store::today;

/// GET /alunos
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<StudentFilter>,
) -> AppResult<Json<Vec<Student>>> {
    Ok(Json(state.store.read().await.list_students(&filter)))
}

/// GET /alunos/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Student>> {
    let store = state.store.read().await;
    Ok(Json(store.student(id)?.clone()))
}

/// POST /alunos
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<StudentCreate>,
) -> AppResult<Json<Student>> {
    payload.validate()?;
    let student = state.store.write().await.create_student(payload)?;
    tracing::info!(student_id = student.id, by = current.id, "Student created");
    Ok(Json(student))
}

/// PUT /alunos/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StudentUpdate>,
) -> AppResult<Json<Student>> {
    payload.validate()?;
    Ok(Json(state.store.write().await.update_student(id, payload)?))
}

/// DELETE /alunos/:id - soft delete
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.store.write().await.deactivate_student(id)?;
    tracing::info!(student_id = id, by = current.id, "Student deactivated");
    Ok(Json(MessageResponse::with_id("Aluno desativado com sucesso", id)))
}

/// GET /alunos/inadimplentes
pub async fn delinquent(State(state): State<AppState>) -> AppResult<Json<Vec<Student>>> {
    Ok(Json(state.store.read().await.delinquent_students(today())))
}

/// GET /alunos/contratos-expirando?dias=30
pub async fn expiring(
    State(state): State<AppState>,
    Query(query): Query<ExpiringQuery>,
) -> AppResult<Json<Vec<Student>>> {
    Ok(Json(
        state
            .store
            .read()
            .await
            .expiring_contracts(query.days, today()),
    ))
}

/// GET /alunos/:id/pagamentos
pub async fn payments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Payment>>> {
    Ok(Json(state.store.read().await.student_payments(id)?))
}
