//! Students (alunos)

use chrono::{Days, NaiveDate};
use shared::billing;
use shared::models::{Payment, Student, StudentCreate, StudentFilter, StudentUpdate};
use shared::{AppError, AppResult, ErrorCode};

use super::{Store, now};

pub(super) fn student_not_found() -> AppError {
    AppError::with_message(ErrorCode::StudentNotFound, "Aluno não encontrado")
}

impl Store {
    /// Active students unless `ativo` says otherwise, ordered by name
    pub fn list_students(&self, filter: &StudentFilter) -> Vec<Student> {
        let active = filter.active.unwrap_or(true);
        let mut students: Vec<Student> = self
            .students
            .values()
            .filter(|s| s.active == active)
            .filter(|s| filter.class_type.is_none_or(|t| s.class_type == t))
            .cloned()
            .collect();
        sort_by_name(&mut students);
        students
    }

    pub fn student(&self, id: i64) -> AppResult<&Student> {
        self.students.get(id).ok_or_else(student_not_found)
    }

    pub fn create_student(&mut self, mut payload: StudentCreate) -> AppResult<Student> {
        payload.check_fee().map_err(AppError::validation)?;
        payload.derive_contract_end();

        let created_at = now();
        let student = self.students.insert_with(|id| Student {
            id,
            full_name: payload.full_name,
            guardian: payload.guardian,
            class_type: payload.class_type,
            monthly_fee: payload.monthly_fee,
            due_day: payload.due_day,
            contract_start: payload.contract_start,
            contract_end: payload.contract_end,
            contract_months: payload.contract_months,
            active: payload.active,
            whatsapp: payload.whatsapp,
            notes: payload.notes,
            created_at,
            updated_at: None,
        });
        Ok(student.clone())
    }

    pub fn update_student(&mut self, id: i64, payload: StudentUpdate) -> AppResult<Student> {
        if payload.monthly_fee.is_some_and(|fee| fee.is_sign_negative()) {
            return Err(AppError::validation(
                "valor_mensalidade deve ser maior ou igual a zero",
            ));
        }
        let student = self.students.get_mut(id).ok_or_else(student_not_found)?;
        if let Some(v) = payload.full_name {
            student.full_name = v;
        }
        if let Some(v) = payload.guardian {
            student.guardian = Some(v);
        }
        if let Some(v) = payload.class_type {
            student.class_type = v;
        }
        if let Some(v) = payload.monthly_fee {
            student.monthly_fee = v;
        }
        if let Some(v) = payload.due_day {
            student.due_day = v;
        }
        if let Some(v) = payload.contract_start {
            student.contract_start = Some(v);
        }
        if let Some(v) = payload.contract_end {
            student.contract_end = Some(v);
        }
        if let Some(v) = payload.contract_months {
            student.contract_months = Some(v);
        }
        if let Some(v) = payload.active {
            student.active = v;
        }
        if let Some(v) = payload.whatsapp {
            student.whatsapp = Some(v);
        }
        if let Some(v) = payload.notes {
            student.notes = Some(v);
        }
        student.updated_at = Some(now());
        Ok(student.clone())
    }

    /// Soft delete
    pub fn deactivate_student(&mut self, id: i64) -> AppResult<()> {
        let student = self.students.get_mut(id).ok_or_else(student_not_found)?;
        student.active = false;
        student.updated_at = Some(now());
        Ok(())
    }

    /// Most recent payment date of a student, any status
    pub fn last_payment_on(&self, student_id: i64) -> Option<NaiveDate> {
        self.payments
            .values()
            .filter(|p| p.student_id == student_id)
            .map(|p| p.paid_on)
            .max()
    }

    /// Active students never paid, or not paid within the delinquency window
    pub fn delinquent_students(&self, today: NaiveDate) -> Vec<Student> {
        let mut students: Vec<Student> = self
            .students
            .values()
            .filter(|s| s.active)
            .filter(|s| billing::is_delinquent(self.last_payment_on(s.id), today))
            .cloned()
            .collect();
        sort_by_name(&mut students);
        students
    }

    /// Active students whose contract ends within `days` (already ended included),
    /// soonest first
    pub fn expiring_contracts(&self, days: u32, today: NaiveDate) -> Vec<Student> {
        let Some(limit) = today.checked_add_days(Days::new(u64::from(days))) else {
            return Vec::new();
        };
        let mut students: Vec<(NaiveDate, Student)> = self
            .students
            .values()
            .filter(|s| s.active)
            .filter_map(|s| {
                let end = s.effective_contract_end()?;
                (end <= limit).then(|| (end, s.clone()))
            })
            .collect();
        students.sort_by(|(a, sa), (b, sb)| a.cmp(b).then(sa.id.cmp(&sb.id)));
        students.into_iter().map(|(_, s)| s).collect()
    }

    /// Payment history of one student, newest first
    pub fn student_payments(&self, student_id: i64) -> AppResult<Vec<Payment>> {
        self.student(student_id)?;
        let mut payments: Vec<Payment> = self
            .payments
            .values()
            .filter(|p| p.student_id == student_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.paid_on.cmp(&a.paid_on).then(b.id.cmp(&a.id)));
        Ok(payments)
    }

    pub(super) fn is_active_student(&self, id: i64) -> bool {
        self.students.get(id).is_some_and(|s| s.active)
    }
}

fn sort_by_name(students: &mut [Student]) {
    students.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));
}
