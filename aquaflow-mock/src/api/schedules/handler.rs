//! Schedule API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;
use shared::AppResult;
use shared::client::EnrollmentReceipt;
use shared::models::{
    CapacitySnapshot, ScheduleSession, SessionCreate, SessionUpdate, SessionWithRoster,
};
use validator::Validate;

use crate::api::MessageResponse;
use crate::auth::CurrentUser;
use crate::state::AppState;

/// GET /horarios
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ScheduleSession>>> {
    Ok(Json(state.store.read().await.list_sessions()))
}

/// GET /horarios/grade-completa
pub async fn full_grid(State(state): State<AppState>) -> AppResult<Json<Vec<SessionWithRoster>>> {
    Ok(Json(state.store.read().await.full_grid()))
}

/// GET /horarios/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ScheduleSession>> {
    let store = state.store.read().await;
    Ok(Json(store.session(id)?.clone()))
}

/// POST /horarios
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<SessionCreate>,
) -> AppResult<(StatusCode, Json<ScheduleSession>)> {
    payload.validate()?;
    let session = state.store.write().await.create_session(payload)?;
    tracing::info!(
        session_id = session.id,
        weekday = %session.weekday,
        start = %session.start_time,
        "Session created"
    );
    Ok((StatusCode::CREATED, Json(session)))
}

/// PUT /horarios/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SessionUpdate>,
) -> AppResult<Json<ScheduleSession>> {
    payload.validate()?;
    Ok(Json(state.store.write().await.update_session(id, payload)?))
}

/// DELETE /horarios/:id - refused while students are enrolled
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.store.write().await.delete_session(id)?;
    tracing::info!(session_id = id, "Session deleted");
    Ok(Json(MessageResponse::new("Horário deletado com sucesso")))
}

/// GET /horarios/:id/vagas
pub async fn capacity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CapacitySnapshot>> {
    Ok(Json(state.store.read().await.capacity(id)?))
}

/// POST /horarios/:id/alunos/:aluno_id
pub async fn admit(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((session_id, student_id)): Path<(i64, i64)>,
) -> AppResult<(StatusCode, Json<EnrollmentReceipt>)> {
    let enrollment = state.store.write().await.admit(session_id, student_id)?;
    tracing::info!(
        session_id,
        student_id,
        enrollment_id = enrollment.id,
        by = current.id,
        "Student enrolled"
    );
    Ok((
        StatusCode::CREATED,
        Json(EnrollmentReceipt {
            message: "Aluno adicionado ao horário com sucesso".to_string(),
            session_id,
            student_id,
            enrollment_id: Some(enrollment.id),
        }),
    ))
}

/// DELETE /horarios/:id/alunos/:aluno_id
pub async fn remove(
    State(state): State<AppState>,
    current: CurrentUser,
    Path((session_id, student_id)): Path<(i64, i64)>,
) -> AppResult<Json<EnrollmentReceipt>> {
    state
        .store
        .write()
        .await
        .remove_enrollment(session_id, student_id)?;
    tracing::info!(session_id, student_id, by = current.id, "Student removed from session");
    Ok(Json(EnrollmentReceipt {
        message: "Aluno removido do horário com sucesso".to_string(),
        session_id,
        student_id,
        enrollment_id: None,
    }))
}
