//! Payments (pagamentos) and the monthly report

use rust_decimal::Decimal;
use shared::models::{
    MonthlyReportQuery, MonthlyReportRow, Payment, PaymentCreate, PaymentFilter, PaymentMethod,
    PaymentStatus, PaymentUpdate, ReferenceMonth,
};
use shared::{AppError, AppResult, ErrorCode};
use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::students::student_not_found;
use super::{Store, now};

fn payment_not_found() -> AppError {
    AppError::with_message(ErrorCode::PaymentNotFound, "Pagamento não encontrado")
}

impl Store {
    /// Newest payment first
    pub fn list_payments(&self, filter: &PaymentFilter) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .payments
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.paid_on.cmp(&a.paid_on).then(b.id.cmp(&a.id)));
        payments
    }

    pub fn payment(&self, id: i64) -> AppResult<&Payment> {
        self.payments.get(id).ok_or_else(payment_not_found)
    }

    pub fn create_payment(&mut self, payload: PaymentCreate) -> AppResult<Payment> {
        payload.check_amount().map_err(AppError::validation)?;
        if !self.students.contains(payload.student_id) {
            return Err(student_not_found());
        }
        let created_at = now();
        let payment = self.payments.insert_with(|id| Payment {
            id,
            student_id: payload.student_id,
            amount: payload.amount,
            paid_on: payload.paid_on,
            reference_month: payload.reference_month,
            method: payload.method,
            status: payload.status,
            notes: payload.notes,
            created_at,
        });
        Ok(payment.clone())
    }

    pub fn update_payment(&mut self, id: i64, payload: PaymentUpdate) -> AppResult<Payment> {
        if payload.amount.is_some_and(|v| v.is_sign_negative()) {
            return Err(AppError::validation("valor deve ser maior ou igual a zero"));
        }
        if payload
            .student_id
            .is_some_and(|student_id| !self.students.contains(student_id))
        {
            return Err(student_not_found());
        }
        let payment = self.payments.get_mut(id).ok_or_else(payment_not_found)?;
        if let Some(v) = payload.student_id {
            payment.student_id = v;
        }
        if let Some(v) = payload.amount {
            payment.amount = v;
        }
        if let Some(v) = payload.paid_on {
            payment.paid_on = v;
        }
        if let Some(v) = payload.reference_month {
            payment.reference_month = v;
        }
        if let Some(v) = payload.method {
            payment.method = v;
        }
        if let Some(v) = payload.status {
            payment.status = v;
        }
        if let Some(v) = payload.notes {
            payment.notes = Some(v);
        }
        Ok(payment.clone())
    }

    pub fn delete_payment(&mut self, id: i64) -> AppResult<()> {
        self.payments.remove(id).map(|_| ()).ok_or_else(payment_not_found)
    }

    /// Totals per (reference month, method), newest month first
    ///
    /// Cancelled payments are left out.
    pub fn monthly_report(&self, query: &MonthlyReportQuery) -> Vec<MonthlyReportRow> {
        let mut groups: BTreeMap<(Reverse<ReferenceMonth>, &'static str), (PaymentMethod, u32, Decimal)> =
            BTreeMap::new();
        for payment in self.payments.values() {
            if payment.status == PaymentStatus::Cancelled || !query.matches(&payment.reference_month) {
                continue;
            }
            let key = (Reverse(payment.reference_month), payment.method.as_str());
            let entry = groups.entry(key).or_insert((payment.method, 0, Decimal::ZERO));
            entry.1 += 1;
            entry.2 += payment.amount;
        }
        groups
            .into_iter()
            .map(|((Reverse(reference_month), _), (method, count, total))| MonthlyReportRow {
                reference_month,
                method,
                count,
                total,
            })
            .collect()
    }
}
