//! Schedule sessions (horarios) and enrollments (matriculas)

use chrono::NaiveDateTime;
use shared::models::{
    CapacitySnapshot, EnrolledStudent, ScheduleSession, SessionCreate, SessionUpdate,
    SessionWithRoster, occupancy_percent,
};
use shared::{AppError, AppResult, ErrorCode};

use super::students::student_not_found;
use super::{Store, now};

/// A student's seat in a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub enrolled_at: NaiveDateTime,
}

fn session_not_found() -> AppError {
    AppError::with_message(ErrorCode::SessionNotFound, "Horário não encontrado")
}

impl Store {
    /// Ordered by weekday, then start time
    pub fn list_sessions(&self) -> Vec<ScheduleSession> {
        let mut sessions: Vec<ScheduleSession> = self.sessions.values().cloned().collect();
        sessions.sort_by_key(|s| (s.weekday, s.start_time, s.id));
        sessions
    }

    pub fn session(&self, id: i64) -> AppResult<&ScheduleSession> {
        self.sessions.get(id).ok_or_else(session_not_found)
    }

    fn check_teacher(&self, teacher_id: Option<i64>) -> AppResult<()> {
        match teacher_id {
            Some(id) if !self.instructors.contains(id) => Err(AppError::with_message(
                ErrorCode::InstructorNotFound,
                "Professor não encontrado",
            )),
            _ => Ok(()),
        }
    }

    pub fn create_session(&mut self, payload: SessionCreate) -> AppResult<ScheduleSession> {
        self.check_teacher(payload.teacher_id)?;
        let session = self.sessions.insert_with(|id| ScheduleSession {
            id,
            weekday: payload.weekday,
            start_time: payload.start_time,
            end_time: payload.end_time,
            class_type: payload.class_type,
            teacher_id: payload.teacher_id,
            capacity: payload.capacity,
            waitlist: payload.waitlist,
        });
        Ok(session.clone())
    }

    /// Capacity may not drop below the current roster
    pub fn update_session(&mut self, id: i64, payload: SessionUpdate) -> AppResult<ScheduleSession> {
        self.session(id)?;
        self.check_teacher(payload.teacher_id)?;
        if let Some(capacity) = payload.capacity {
            let enrolled = self.enrolled_count(id);
            if capacity < enrolled {
                return Err(AppError::with_message(
                    ErrorCode::CapacityBelowEnrolled,
                    format!(
                        "Capacidade máxima ({capacity}) menor que o número de alunos matriculados ({enrolled})"
                    ),
                ));
            }
        }
        let session = self.sessions.get_mut(id).ok_or_else(session_not_found)?;
        if let Some(v) = payload.weekday {
            session.weekday = v;
        }
        if let Some(v) = payload.start_time {
            session.start_time = v;
        }
        if let Some(v) = payload.end_time {
            session.end_time = Some(v);
        }
        if let Some(v) = payload.class_type {
            session.class_type = v;
        }
        if let Some(v) = payload.teacher_id {
            session.teacher_id = Some(v);
        }
        if let Some(v) = payload.capacity {
            session.capacity = v;
        }
        if let Some(v) = payload.waitlist {
            session.waitlist = v;
        }
        Ok(session.clone())
    }

    /// Refused while anyone is enrolled
    pub fn delete_session(&mut self, id: i64) -> AppResult<()> {
        self.session(id)?;
        let enrolled = self.enrolled_count(id);
        if enrolled > 0 {
            return Err(AppError::with_message(
                ErrorCode::SessionHasEnrollments,
                format!(
                    "Não é possível deletar. Existem {enrolled} aluno(s) matriculado(s) neste horário."
                ),
            ));
        }
        self.sessions.remove(id);
        Ok(())
    }

    pub fn enrolled_count(&self, session_id: i64) -> u32 {
        self.enrollments
            .values()
            .filter(|e| e.session_id == session_id)
            .count() as u32
    }

    fn is_enrolled(&self, session_id: i64, student_id: i64) -> bool {
        self.enrollments
            .values()
            .any(|e| e.session_id == session_id && e.student_id == student_id)
    }

    /// Enroll a student; checks run in a fixed order and the first failure wins
    ///
    /// Called under the store's write lock, so two admissions racing for the
    /// last seat cannot both succeed.
    pub fn admit(&mut self, session_id: i64, student_id: i64) -> AppResult<Enrollment> {
        let capacity = self.session(session_id)?.capacity;
        if !self.students.contains(student_id) {
            return Err(student_not_found());
        }
        if !self.is_active_student(student_id) {
            return Err(AppError::with_message(ErrorCode::StudentInactive, "Aluno está inativo"));
        }
        if self.is_enrolled(session_id, student_id) {
            return Err(AppError::with_message(
                ErrorCode::AlreadyEnrolled,
                "Aluno já está matriculado neste horário",
            ));
        }
        if self.enrolled_count(session_id) >= capacity {
            return Err(AppError::with_message(
                ErrorCode::SessionFull,
                format!("Horário já está com capacidade máxima ({capacity} alunos)"),
            ));
        }

        let enrolled_at = now();
        let enrollment = self.enrollments.insert_with(|id| Enrollment {
            id,
            session_id,
            student_id,
            enrolled_at,
        });
        Ok(enrollment.clone())
    }

    pub fn remove_enrollment(&mut self, session_id: i64, student_id: i64) -> AppResult<()> {
        self.session(session_id)?;
        if !self.is_enrolled(session_id, student_id) {
            return Err(AppError::with_message(
                ErrorCode::NotEnrolled,
                "Aluno não está matriculado neste horário",
            ));
        }
        self.enrollments
            .retain(|_, e| !(e.session_id == session_id && e.student_id == student_id));
        Ok(())
    }

    pub fn capacity(&self, session_id: i64) -> AppResult<CapacitySnapshot> {
        let session = self.session(session_id)?;
        let enrolled = self.enrolled_count(session_id);
        Ok(CapacitySnapshot {
            session_id,
            weekday: session.weekday,
            start_time: session.start_time,
            class_type: session.class_type,
            capacity: session.capacity,
            enrolled,
            remaining: i64::from(session.capacity) - i64::from(enrolled),
            percent: occupancy_percent(enrolled, session.capacity),
        })
    }

    /// Enrolled students of a session, by name
    pub fn roster(&self, session_id: i64) -> Vec<EnrolledStudent> {
        let mut roster: Vec<EnrolledStudent> = self
            .enrollments
            .values()
            .filter(|e| e.session_id == session_id)
            .filter_map(|e| self.students.get(e.student_id))
            .map(|s| EnrolledStudent {
                id: s.id,
                full_name: s.full_name.clone(),
                whatsapp: s.whatsapp.clone(),
            })
            .collect();
        roster.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));
        roster
    }

    /// Every session with its roster, in grid order
    pub fn full_grid(&self) -> Vec<SessionWithRoster> {
        self.list_sessions()
            .into_iter()
            .map(|session| {
                let students = self.roster(session.id);
                let reported_vacancies = i64::from(session.capacity) - students.len() as i64;
                let teacher_name = session
                    .teacher_id
                    .and_then(|id| self.instructors.get(id))
                    .map(|i| i.name.clone());
                SessionWithRoster {
                    session,
                    students,
                    reported_vacancies,
                    teacher_name,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;
    use shared::models::{ClassType, StudentCreate, Weekday};

    fn seeded(capacity: u32) -> (Store, i64) {
        let mut store = Store::new();
        let session = store
            .create_session(
                SessionCreate::new(
                    Weekday::Monday,
                    NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                    ClassType::Swimming,
                )
                .with_capacity(capacity),
            )
            .unwrap();
        (store, session.id)
    }

    fn student(store: &mut Store, name: &str) -> i64 {
        store
            .create_student(StudentCreate::new(name, ClassType::Swimming, Decimal::from(150), 10))
            .unwrap()
            .id
    }

    #[test]
    fn test_admit_check_order() {
        let (mut store, session) = seeded(1);
        let ana = student(&mut store, "Ana");
        let bia = student(&mut store, "Bia");

        assert_eq!(store.admit(99, 99).unwrap_err().code, ErrorCode::SessionNotFound);
        assert_eq!(store.admit(session, 99).unwrap_err().code, ErrorCode::StudentNotFound);

        store.admit(session, ana).unwrap();
        let dup = store.admit(session, ana).unwrap_err();
        assert_eq!(dup.message, "Aluno já está matriculado neste horário");

        let full = store.admit(session, bia).unwrap_err();
        assert_eq!(full.code, ErrorCode::SessionFull);
        assert_eq!(full.message, "Horário já está com capacidade máxima (1 alunos)");

        store.deactivate_student(bia).unwrap();
        assert_eq!(store.admit(session, bia).unwrap_err().message, "Aluno está inativo");
    }

    #[test]
    fn test_capacity_and_remove() {
        let (mut store, session) = seeded(4);
        let ana = student(&mut store, "Ana");
        store.admit(session, ana).unwrap();

        let snapshot = store.capacity(session).unwrap();
        assert_eq!(snapshot.enrolled, 1);
        assert_eq!(snapshot.remaining, 3);
        assert_eq!(snapshot.percent, Decimal::from(25));

        store.remove_enrollment(session, ana).unwrap();
        let err = store.remove_enrollment(session, ana).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotEnrolled);
        assert_eq!(store.capacity(session).unwrap().enrolled, 0);
    }

    #[test]
    fn test_capacity_cannot_drop_below_roster() {
        let (mut store, session) = seeded(3);
        for name in ["Ana", "Bia", "Caio"] {
            let id = student(&mut store, name);
            store.admit(session, id).unwrap();
        }

        let err = store
            .update_session(
                session,
                SessionUpdate {
                    capacity: Some(1),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CapacityBelowEnrolled);
        assert_eq!(
            err.message,
            "Capacidade máxima (1) menor que o número de alunos matriculados (3)"
        );
        let snapshot = store.capacity(session).unwrap();
        assert_eq!(snapshot.capacity, 3);
        assert_eq!(snapshot.remaining, 0);

        let updated = store
            .update_session(
                session,
                SessionUpdate {
                    capacity: Some(3),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.capacity, 3);
    }

    #[test]
    fn test_delete_refused_with_enrollments() {
        let (mut store, session) = seeded(4);
        let ana = student(&mut store, "Ana");
        store.admit(session, ana).unwrap();

        let err = store.delete_session(session).unwrap_err();
        assert_eq!(
            err.message,
            "Não é possível deletar. Existem 1 aluno(s) matriculado(s) neste horário."
        );

        store.remove_enrollment(session, ana).unwrap();
        store.delete_session(session).unwrap();
        assert!(store.session(session).is_err());
    }

    #[test]
    fn test_grid_order_and_roster() {
        let (mut store, monday) = seeded(4);
        let sunday = store
            .create_session(SessionCreate::new(
                Weekday::Sunday,
                NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                ClassType::WaterAerobics,
            ))
            .unwrap();
        let early_monday = store
            .create_session(SessionCreate::new(
                Weekday::Monday,
                NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                ClassType::Swimming,
            ))
            .unwrap();
        let zeca = student(&mut store, "Zeca");
        let ana = student(&mut store, "Ana");
        store.admit(monday, zeca).unwrap();
        store.admit(monday, ana).unwrap();

        let grid = store.full_grid();
        let ids: Vec<_> = grid.iter().map(|s| s.session.id).collect();
        assert_eq!(ids, [early_monday.id, monday, sunday.id]);

        let names: Vec<_> = grid[1].students.iter().map(|s| s.full_name.as_str()).collect();
        assert_eq!(names, ["Ana", "Zeca"]);
        assert_eq!(grid[1].reported_vacancies, 2);
    }
}
