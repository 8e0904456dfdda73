//! Instructors (professores) and plans (planos)

use shared::client::{InstructorFilter, PlanFilter};
use shared::cpf::format_cpf;
use shared::models::{
    Instructor, InstructorCreate, InstructorUpdate, Plan, PlanCreate, PlanUpdate,
};
use shared::{AppError, AppResult, ErrorCode};

use super::Store;

fn instructor_not_found() -> AppError {
    AppError::with_message(ErrorCode::InstructorNotFound, "Professor não encontrado")
}

fn plan_not_found() -> AppError {
    AppError::with_message(ErrorCode::PlanNotFound, "Plano não encontrado")
}

impl Store {
    // ==================== Instructors ====================

    pub fn list_instructors(&self, filter: &InstructorFilter) -> Vec<Instructor> {
        let mut instructors: Vec<Instructor> = self
            .instructors
            .values()
            .filter(|i| filter.active.is_none_or(|active| i.is_active == active))
            .filter(|i| filter.specialty.is_none_or(|s| i.specialty == Some(s)))
            .cloned()
            .collect();
        instructors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        instructors
    }

    pub fn instructor(&self, id: i64) -> AppResult<&Instructor> {
        self.instructors.get(id).ok_or_else(instructor_not_found)
    }

    /// Email and CPF are unique across instructors; `cpf` must already be formatted
    fn check_instructor_unique(&self, email: Option<&str>, cpf: Option<&str>, except: Option<i64>) -> AppResult<()> {
        let others = || self.instructors.values().filter(|i| Some(i.id) != except);
        if let Some(email) = email
            && others().any(|i| i.email.eq_ignore_ascii_case(email))
        {
            return Err(AppError::with_message(
                ErrorCode::InstructorAlreadyExists,
                "Já existe um professor cadastrado com este email",
            ));
        }
        if let Some(cpf) = cpf
            && others().any(|i| i.cpf == cpf)
        {
            return Err(AppError::with_message(
                ErrorCode::InstructorAlreadyExists,
                "Já existe um professor cadastrado com este CPF",
            ));
        }
        Ok(())
    }

    pub fn create_instructor(&mut self, payload: InstructorCreate) -> AppResult<Instructor> {
        let payload = payload.normalized();
        self.check_instructor_unique(Some(&payload.email), Some(&payload.cpf), None)?;
        let instructor = self.instructors.insert_with(|id| Instructor {
            id,
            name: payload.name,
            email: payload.email,
            cpf: payload.cpf,
            phone: payload.phone,
            specialty: payload.specialty,
            is_active: true,
        });
        Ok(instructor.clone())
    }

    pub fn update_instructor(&mut self, id: i64, payload: InstructorUpdate) -> AppResult<Instructor> {
        self.instructor(id)?;
        let cpf = payload.cpf.as_deref().map(format_cpf);
        self.check_instructor_unique(payload.email.as_deref(), cpf.as_deref(), Some(id))?;

        let instructor = self.instructors.get_mut(id).ok_or_else(instructor_not_found)?;
        if let Some(v) = payload.name {
            instructor.name = v;
        }
        if let Some(v) = payload.email {
            instructor.email = v;
        }
        if let Some(v) = cpf {
            instructor.cpf = v;
        }
        if let Some(v) = payload.phone {
            instructor.phone = Some(v);
        }
        if let Some(v) = payload.specialty {
            instructor.specialty = Some(v);
        }
        if let Some(v) = payload.is_active {
            instructor.is_active = v;
        }
        Ok(instructor.clone())
    }

    /// Soft delete
    pub fn deactivate_instructor(&mut self, id: i64) -> AppResult<()> {
        let instructor = self.instructors.get_mut(id).ok_or_else(instructor_not_found)?;
        instructor.is_active = false;
        Ok(())
    }

    // ==================== Plans ====================

    /// Active plans unless `ativo` says otherwise, cheapest first
    pub fn list_plans(&self, filter: &PlanFilter) -> Vec<Plan> {
        let active = filter.active.unwrap_or(true);
        let mut plans: Vec<Plan> = self
            .plans
            .values()
            .filter(|p| p.active == active)
            .cloned()
            .collect();
        plans.sort_by(|a, b| a.monthly_price.cmp(&b.monthly_price).then(a.id.cmp(&b.id)));
        plans
    }

    pub fn plan(&self, id: i64) -> AppResult<&Plan> {
        self.plans.get(id).ok_or_else(plan_not_found)
    }

    pub fn create_plan(&mut self, payload: PlanCreate) -> AppResult<Plan> {
        payload.check_price().map_err(AppError::validation)?;
        let plan = self.plans.insert_with(|id| Plan {
            id,
            name: payload.name,
            description: payload.description,
            monthly_price: payload.monthly_price,
            classes_per_week: payload.classes_per_week,
            class_minutes: payload.class_minutes,
            unlimited_access: payload.unlimited_access,
            allows_makeup: payload.allows_makeup,
            grace_days: payload.grace_days,
            active: true,
        });
        Ok(plan.clone())
    }

    pub fn update_plan(&mut self, id: i64, payload: PlanUpdate) -> AppResult<Plan> {
        if payload.monthly_price.is_some_and(|v| v.is_sign_negative()) {
            return Err(AppError::validation("valor_mensal deve ser maior ou igual a zero"));
        }
        let plan = self.plans.get_mut(id).ok_or_else(plan_not_found)?;
        if let Some(v) = payload.name {
            plan.name = v;
        }
        if let Some(v) = payload.description {
            plan.description = Some(v);
        }
        if let Some(v) = payload.monthly_price {
            plan.monthly_price = v;
        }
        if let Some(v) = payload.classes_per_week {
            plan.classes_per_week = v;
        }
        if let Some(v) = payload.class_minutes {
            plan.class_minutes = v;
        }
        if let Some(v) = payload.unlimited_access {
            plan.unlimited_access = v;
        }
        if let Some(v) = payload.allows_makeup {
            plan.allows_makeup = v;
        }
        if let Some(v) = payload.grace_days {
            plan.grace_days = v;
        }
        if let Some(v) = payload.active {
            plan.active = v;
        }
        Ok(plan.clone())
    }

    /// Soft delete
    pub fn deactivate_plan(&mut self, id: i64) -> AppResult<()> {
        let plan = self.plans.get_mut(id).ok_or_else(plan_not_found)?;
        plan.active = false;
        Ok(())
    }
}
