//! Schedules API (`/horarios`)

use shared::client::{DeletedResponse, EnrollmentReceipt};
use shared::models::{
    CapacitySnapshot, ScheduleSession, SessionCreate, SessionUpdate, SessionWithRoster,
};

use crate::ClientResult;
use crate::http::HttpClient;

pub struct SchedulesApi<'a, C> {
    http: &'a C,
}

impl<'a, C: HttpClient> SchedulesApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> ClientResult<Vec<ScheduleSession>> {
        self.http.get("/horarios").await
    }

    pub async fn get(&self, id: i64) -> ClientResult<ScheduleSession> {
        self.http.get(&format!("/horarios/{id}")).await
    }

    pub async fn create(&self, payload: &SessionCreate) -> ClientResult<ScheduleSession> {
        self.http.post("/horarios", payload).await
    }

    pub async fn update(&self, id: i64, payload: &SessionUpdate) -> ClientResult<ScheduleSession> {
        self.http.put(&format!("/horarios/{id}"), payload).await
    }

    /// Refused by the backend while the session has enrolled students
    pub async fn delete(&self, id: i64) -> ClientResult<DeletedResponse> {
        self.http.delete(&format!("/horarios/{id}")).await
    }

    /// `POST /horarios/{id}/alunos/{aluno_id}`
    pub async fn admit(&self, session_id: i64, student_id: i64) -> ClientResult<EnrollmentReceipt> {
        self.http
            .post_empty(&format!("/horarios/{session_id}/alunos/{student_id}"))
            .await
    }

    /// `DELETE /horarios/{id}/alunos/{aluno_id}`
    pub async fn remove(&self, session_id: i64, student_id: i64) -> ClientResult<EnrollmentReceipt> {
        self.http
            .delete(&format!("/horarios/{session_id}/alunos/{student_id}"))
            .await
    }

    /// `GET /horarios/{id}/vagas`
    pub async fn capacity(&self, session_id: i64) -> ClientResult<CapacitySnapshot> {
        self.http.get(&format!("/horarios/{session_id}/vagas")).await
    }

    /// `GET /horarios/grade-completa` - every session with its roster
    pub async fn full_grid(&self) -> ClientResult<Vec<SessionWithRoster>> {
        self.http.get("/horarios/grade-completa").await
    }
}
