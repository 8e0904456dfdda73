//! Enrollment manager
//!
//! Manages the roster of a single schedule session. Every mutation goes
//! through local guards first (selection, duplicate, capacity) and is followed
//! by a full reload; the view is never patched optimistically. A mutation the
//! backend accepted is reported as done even when the reload after it fails;
//! the previous view is kept and the failure is available from
//! [`EnrollmentManager::reload_error`].

use futures::try_join;
use shared::client::EnrollmentReceipt;
use shared::models::{CapacitySnapshot, EnrolledStudent, Occupancy, Student};
use thiserror::Error;

use crate::api::Api;
use crate::http::{HttpClient, NetworkHttpClient};
use crate::ClientError;

/// Rejection raised by the enrollment manager
#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("no student selected")]
    NoStudentSelected,

    #[error("student {student_id} is already enrolled in session {session_id}")]
    AlreadyEnrolled { session_id: i64, student_id: i64 },

    #[error("session {session_id} is full ({capacity} students)")]
    SessionFull { session_id: i64, capacity: u32 },

    #[error("student {student_id} is not enrolled in session {session_id}")]
    NotEnrolled { session_id: i64, student_id: i64 },

    #[error("enrollment data not loaded")]
    NotLoaded,

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl EnrollmentError {
    /// User-facing notice
    pub fn notice(&self) -> String {
        match self {
            Self::NoStudentSelected => "Selecione um aluno".to_string(),
            Self::AlreadyEnrolled { .. } => "Aluno já está matriculado neste horário".to_string(),
            Self::SessionFull { capacity, .. } => {
                format!("Horário já está com capacidade máxima ({capacity} alunos)")
            }
            Self::NotEnrolled { .. } => "Aluno não está matriculado neste horário".to_string(),
            Self::NotLoaded => "Erro ao carregar dados de matrícula".to_string(),
            Self::Client(e) => e.notice(),
        }
    }

    /// Whether the request never left the client
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Client(_))
    }
}

pub type EnrollmentResult<T> = Result<T, EnrollmentError>;

/// Everything the enrollment screen shows for one session
#[derive(Debug, Clone)]
pub struct EnrollmentView {
    pub capacity: CapacitySnapshot,
    pub enrolled: Vec<EnrolledStudent>,
    pub active_students: Vec<Student>,
    /// Students waiting for a seat, as counted by the session
    pub waitlist: u32,
}

impl EnrollmentView {
    /// Occupancy recounted from the roster; the backend's counters are display only
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::new(self.enrolled.len() as u32, self.capacity.capacity, self.waitlist)
    }

    pub fn is_enrolled(&self, student_id: i64) -> bool {
        self.enrolled.iter().any(|s| s.id == student_id)
    }

    /// Admission candidates: active, not enrolled, same class type
    pub fn available_students(&self) -> Vec<&Student> {
        self.active_students
            .iter()
            .filter(|s| s.active)
            .filter(|s| !self.is_enrolled(s.id))
            .filter(|s| s.class_type == self.capacity.class_type)
            .collect()
    }
}

/// Roster manager for one session
#[derive(Debug)]
pub struct EnrollmentManager<C = NetworkHttpClient> {
    api: Api<C>,
    session_id: i64,
    view: Option<EnrollmentView>,
    reload_error: Option<ClientError>,
}

impl<C: HttpClient> EnrollmentManager<C> {
    pub fn new(api: Api<C>, session_id: i64) -> Self {
        Self {
            api,
            session_id,
            view: None,
            reload_error: None,
        }
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    /// Last loaded view
    pub fn view(&self) -> Option<&EnrollmentView> {
        self.view.as_ref()
    }

    /// Why the reload after the last admit/remove failed; the view is stale while set
    pub fn reload_error(&self) -> Option<&ClientError> {
        self.reload_error.as_ref()
    }

    /// Fetch active students, the capacity snapshot and the roster
    ///
    /// All three requests must succeed; on failure the previous view is kept.
    pub async fn load(&mut self) -> EnrollmentResult<&EnrollmentView> {
        let students = self.api.students();
        let schedules = self.api.schedules();
        let (active_students, capacity, grid) = try_join!(
            students.list_active(),
            schedules.capacity(self.session_id),
            schedules.full_grid(),
        )?;

        let (enrolled, waitlist) = grid
            .into_iter()
            .find(|s| s.session.id == self.session_id)
            .map(|s| (s.students, s.session.waitlist))
            .unwrap_or_default();

        tracing::debug!(
            session_id = self.session_id,
            enrolled = enrolled.len(),
            capacity = capacity.capacity,
            "Enrollment data loaded"
        );

        self.reload_error = None;
        Ok(self.view.insert(EnrollmentView {
            capacity,
            enrolled,
            active_students,
            waitlist,
        }))
    }

    /// Admit a student, then reload
    pub async fn admit(&mut self, student_id: Option<i64>) -> EnrollmentResult<EnrollmentReceipt> {
        let view = self.view.as_ref().ok_or(EnrollmentError::NotLoaded)?;
        let student_id = student_id.ok_or(EnrollmentError::NoStudentSelected)?;

        if view.is_enrolled(student_id) {
            tracing::warn!(session_id = self.session_id, student_id, "Admit rejected: already enrolled");
            return Err(EnrollmentError::AlreadyEnrolled {
                session_id: self.session_id,
                student_id,
            });
        }

        let occupancy = view.occupancy();
        if occupancy.remaining == 0 {
            tracing::warn!(session_id = self.session_id, student_id, "Admit rejected: session full");
            return Err(EnrollmentError::SessionFull {
                session_id: self.session_id,
                capacity: occupancy.capacity,
            });
        }

        let receipt = self.api.schedules().admit(self.session_id, student_id).await?;
        tracing::info!(session_id = self.session_id, student_id, "Student admitted");

        self.reload_after_change().await;
        Ok(receipt)
    }

    /// Remove an enrolled student, then reload
    pub async fn remove(&mut self, student_id: i64) -> EnrollmentResult<EnrollmentReceipt> {
        let view = self.view.as_ref().ok_or(EnrollmentError::NotLoaded)?;
        if !view.is_enrolled(student_id) {
            return Err(EnrollmentError::NotEnrolled {
                session_id: self.session_id,
                student_id,
            });
        }

        let receipt = self.api.schedules().remove(self.session_id, student_id).await?;
        tracing::info!(session_id = self.session_id, student_id, "Student removed");

        self.reload_after_change().await;
        Ok(receipt)
    }

    async fn reload_after_change(&mut self) {
        let reloaded = self.load().await.map(|_| ());
        if let Err(e) = reloaded {
            tracing::warn!(session_id = self.session_id, error = %e, "Reload after enrollment change failed");
            self.reload_error = Some(match e {
                EnrollmentError::Client(e) => e,
                other => ClientError::InvalidResponse(other.to_string()),
            });
        }
    }

    /// Admission candidates of the loaded view
    pub fn available_students(&self) -> Vec<&Student> {
        self.view
            .as_ref()
            .map(EnrollmentView::available_students)
            .unwrap_or_default()
    }
}
