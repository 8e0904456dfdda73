//! Dashboard and financial view models
//!
//! Loaders fan out their requests concurrently and fail as a whole: if any
//! request fails, nothing is returned. The `compute` functions are pure and
//! take "today" from the caller.

use chrono::{Days, NaiveDate};
use futures::try_join;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::billing::{self, delinquency_rate, period_stats};
use shared::models::{
    Payment, PaymentFilter, PaymentStatus, ReferenceMonth, SessionWithRoster, Student,
    StudentFilter,
};

use crate::api::Api;
use crate::grid::ScheduleGrid;
use crate::http::{HttpClient, NetworkHttpClient};
use crate::ClientResult;

/// Window used for the "revenue" card
pub const REVENUE_WINDOW_DAYS: u64 = 30;

/// Default look-ahead for expiring contracts
pub const EXPIRING_WINDOW_DAYS: u32 = 30;

// ==================== Overview ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_students: usize,
    pub active_students: usize,
    pub delinquent_count: usize,
    /// Confirmed payments made in the last 30 days
    pub revenue_last_30_days: Decimal,
    pub delinquency_rate: Decimal,
    /// `100 - delinquency_rate`
    pub on_time_rate: Decimal,
    /// Average occupancy over the schedule grid
    pub average_occupancy: Decimal,
}

impl Overview {
    pub fn compute(
        students: &[Student],
        delinquent: &[Student],
        payments: &[Payment],
        sessions: Vec<SessionWithRoster>,
        today: NaiveDate,
    ) -> Self {
        let active_students = students.iter().filter(|s| s.active).count();
        let from = today
            .checked_sub_days(Days::new(REVENUE_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MIN);
        let revenue = period_stats(payments, from, today).confirmed_total;
        let rate = delinquency_rate(active_students, delinquent.len());

        Self {
            total_students: students.len(),
            active_students,
            delinquent_count: delinquent.len(),
            revenue_last_30_days: revenue,
            delinquency_rate: rate,
            on_time_rate: if active_students == 0 {
                Decimal::ZERO
            } else {
                Decimal::ONE_HUNDRED - rate
            },
            average_occupancy: ScheduleGrid::build(sessions).average_occupancy(),
        }
    }
}

// ==================== Financial summary ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub month: ReferenceMonth,
    /// All confirmed payments
    pub confirmed_total: Decimal,
    /// Confirmed payments booked against `month`
    pub month_revenue: Decimal,
    /// All pending payments
    pub pending_total: Decimal,
    pub delinquent_count: usize,
}

impl FinancialSummary {
    pub fn compute(payments: &[Payment], delinquent: &[Student], month: ReferenceMonth) -> Self {
        let mut summary = Self {
            month,
            confirmed_total: Decimal::ZERO,
            month_revenue: Decimal::ZERO,
            pending_total: Decimal::ZERO,
            delinquent_count: delinquent.len(),
        };
        for payment in payments {
            match payment.status {
                PaymentStatus::Confirmed => {
                    summary.confirmed_total += payment.amount;
                    if payment.reference_month == month {
                        summary.month_revenue += payment.amount;
                    }
                }
                PaymentStatus::Pending => summary.pending_total += payment.amount,
                PaymentStatus::Cancelled => {}
            }
        }
        summary
    }
}

// ==================== Expiring contracts ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Critical,
    Warning,
    Normal,
}

impl Urgency {
    /// `<= 7` days critical, `<= 15` warning
    pub fn from_days(days: i64) -> Self {
        match days {
            ..=7 => Self::Critical,
            8..=15 => Self::Warning,
            _ => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiringContract {
    pub student: Student,
    pub end: NaiveDate,
    /// Negative once the contract has ended
    pub days_remaining: i64,
    pub urgency: Urgency,
}

impl ExpiringContract {
    /// `None` for a student without a known contract end
    pub fn new(student: Student, today: NaiveDate) -> Option<Self> {
        let end = student.effective_contract_end()?;
        let days_remaining = (end - today).num_days();
        Some(Self {
            student,
            end,
            days_remaining,
            urgency: Urgency::from_days(days_remaining),
        })
    }

    pub fn days_label(&self) -> String {
        match self.days_remaining {
            ..=0 => "Vencido".to_string(),
            1 => "1 dia".to_string(),
            n => format!("{n} dias"),
        }
    }
}

/// Contracts ordered by end date; students without an end date are dropped
pub fn expiring_contracts(students: Vec<Student>, today: NaiveDate) -> Vec<ExpiringContract> {
    let mut contracts: Vec<_> = students
        .into_iter()
        .filter_map(|s| ExpiringContract::new(s, today))
        .collect();
    contracts.sort_by_key(|c| (c.end, c.student.id));
    contracts
}

// ==================== Search ====================

/// Case-insensitive substring match over name, guardian and phone
///
/// A term made only of digits and phone punctuation is compared against the
/// phone's digits, so "11 98765" finds "(11) 98765-4321".
/// Accents are significant: "joao" does not match "João".
pub fn matches_search(student: &Student, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    if student.full_name.to_lowercase().contains(&term) {
        return true;
    }
    if student
        .guardian
        .as_deref()
        .is_some_and(|g| g.to_lowercase().contains(&term))
    {
        return true;
    }
    let Some(phone) = student.whatsapp.as_deref() else {
        return false;
    };
    if phone.to_lowercase().contains(&term) {
        return true;
    }
    // A term typed as a phone number matches on digits alone
    if !term.chars().all(|c| c.is_ascii_digit() || "()- +".contains(c)) {
        return false;
    }
    let term_digits: String = term.chars().filter(char::is_ascii_digit).collect();
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    !term_digits.is_empty() && digits.contains(&term_digits)
}

pub fn filter_students<'a>(students: &'a [Student], term: &str) -> Vec<&'a Student> {
    students.iter().filter(|s| matches_search(s, term)).collect()
}

// ==================== Loaders ====================

/// Overview plus expiring contracts, loaded together
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub overview: Overview,
    pub expiring: Vec<ExpiringContract>,
}

#[derive(Debug, Clone)]
pub struct Dashboard<C = NetworkHttpClient> {
    api: Api<C>,
}

impl<C: HttpClient> Dashboard<C> {
    pub fn new(api: Api<C>) -> Self {
        Self { api }
    }

    pub async fn overview(&self, today: NaiveDate) -> ClientResult<Overview> {
        let students = self.api.students();
        let active = StudentFilter {
            active: Some(true),
            class_type: None,
        };
        let inactive = StudentFilter {
            active: Some(false),
            class_type: None,
        };
        let payments_api = self.api.payments();
        let schedules = self.api.schedules();
        let all_payments = PaymentFilter::default();
        let (mut all, inactive, delinquent, payments, sessions) = try_join!(
            students.list(&active),
            students.list(&inactive),
            students.delinquent(),
            payments_api.list(&all_payments),
            schedules.full_grid(),
        )?;
        all.extend(inactive);
        Ok(Overview::compute(&all, &delinquent, &payments, sessions, today))
    }

    pub async fn financial_summary(&self, month: ReferenceMonth) -> ClientResult<FinancialSummary> {
        let payments_api = self.api.payments();
        let students = self.api.students();
        let all_payments = PaymentFilter::default();
        let (payments, delinquent) = try_join!(
            payments_api.list(&all_payments),
            students.delinquent(),
        )?;
        Ok(FinancialSummary::compute(&payments, &delinquent, month))
    }

    pub async fn expiring_contracts(&self, days: u32, today: NaiveDate) -> ClientResult<Vec<ExpiringContract>> {
        let students = self.api.students().expiring_contracts(days).await?;
        Ok(expiring_contracts(students, today))
    }

    /// Everything the home screen shows; fails if any request fails
    pub async fn load(&self, today: NaiveDate) -> ClientResult<DashboardData> {
        let (overview, expiring) = try_join!(
            self.overview(today),
            self.expiring_contracts(EXPIRING_WINDOW_DAYS, today),
        )?;
        tracing::debug!(
            active = overview.active_students,
            expiring = expiring.len(),
            "Dashboard loaded"
        );
        Ok(DashboardData { overview, expiring })
    }
}

/// Days a student is past this month's due date
pub fn days_overdue(student: &Student, today: NaiveDate) -> i64 {
    billing::days_overdue(student.due_day, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use shared::models::{ClassType, PaymentMethod};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn student(id: i64, name: &str, active: bool) -> Student {
        Student {
            id,
            full_name: name.into(),
            guardian: None,
            class_type: ClassType::Swimming,
            monthly_fee: Decimal::new(15000, 2),
            due_day: 10,
            contract_start: None,
            contract_end: None,
            contract_months: None,
            active,
            whatsapp: None,
            notes: None,
            created_at: NaiveDateTime::default(),
            updated_at: None,
        }
    }

    fn payment(amount: i64, paid_on: NaiveDate, status: PaymentStatus) -> Payment {
        Payment {
            id: 1,
            student_id: 1,
            amount: Decimal::from(amount),
            paid_on,
            reference_month: ReferenceMonth::of(paid_on),
            method: PaymentMethod::Pix,
            status,
            notes: None,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_overview() {
        let today = date(2024, 6, 30);
        let students = vec![
            student(1, "Ana", true),
            student(2, "Bia", true),
            student(3, "Caio", true),
            student(4, "Duda", true),
            student(5, "Edu", false),
        ];
        let delinquent = vec![students[0].clone()];
        let payments = vec![
            payment(100, date(2024, 6, 15), PaymentStatus::Confirmed),
            payment(50, date(2024, 6, 20), PaymentStatus::Pending),
            payment(70, date(2024, 6, 21), PaymentStatus::Cancelled),
            payment(300, date(2024, 4, 1), PaymentStatus::Confirmed),
        ];

        let overview = Overview::compute(&students, &delinquent, &payments, vec![], today);
        assert_eq!(overview.total_students, 5);
        assert_eq!(overview.active_students, 4);
        assert_eq!(overview.delinquent_count, 1);
        assert_eq!(overview.revenue_last_30_days, Decimal::from(100));
        assert_eq!(overview.delinquency_rate, Decimal::from(25));
        assert_eq!(overview.on_time_rate, Decimal::from(75));
        assert_eq!(overview.average_occupancy, Decimal::ZERO);
    }

    #[test]
    fn test_overview_without_students() {
        let overview = Overview::compute(&[], &[], &[], vec![], date(2024, 1, 1));
        assert_eq!(overview.on_time_rate, Decimal::ZERO);
        assert_eq!(overview.delinquency_rate, Decimal::ZERO);
    }

    #[test]
    fn test_financial_summary() {
        let payments = vec![
            payment(100, date(2024, 6, 15), PaymentStatus::Confirmed),
            payment(80, date(2024, 5, 15), PaymentStatus::Confirmed),
            payment(50, date(2024, 6, 20), PaymentStatus::Pending),
            payment(70, date(2024, 6, 21), PaymentStatus::Cancelled),
        ];
        let month: ReferenceMonth = "2024-06".parse().unwrap();
        let summary = FinancialSummary::compute(&payments, &[], month);
        assert_eq!(summary.confirmed_total, Decimal::from(180));
        assert_eq!(summary.month_revenue, Decimal::from(100));
        assert_eq!(summary.pending_total, Decimal::from(50));
        assert_eq!(summary.delinquent_count, 0);
    }

    #[test]
    fn test_urgency_thresholds() {
        assert_eq!(Urgency::from_days(-3), Urgency::Critical);
        assert_eq!(Urgency::from_days(7), Urgency::Critical);
        assert_eq!(Urgency::from_days(8), Urgency::Warning);
        assert_eq!(Urgency::from_days(15), Urgency::Warning);
        assert_eq!(Urgency::from_days(16), Urgency::Normal);
    }

    #[test]
    fn test_expiring_contracts_sorted_with_labels() {
        let today = date(2024, 6, 1);
        let mut late = student(1, "Ana", true);
        late.contract_end = Some(date(2024, 6, 20));
        let mut ended = student(2, "Bia", true);
        ended.contract_end = Some(date(2024, 5, 30));
        let mut derived = student(3, "Caio", true);
        derived.contract_start = Some(date(2023, 6, 2));
        derived.contract_months = Some(12);
        let unknown = student(4, "Duda", true);

        let contracts = expiring_contracts(vec![late, ended, derived, unknown], today);
        let ids: Vec<i64> = contracts.iter().map(|c| c.student.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(contracts[0].days_label(), "Vencido");
        assert_eq!(contracts[1].days_label(), "1 dia");
        assert_eq!(contracts[2].days_label(), "19 dias");
        assert_eq!(contracts[2].urgency, Urgency::Normal);
    }

    #[test]
    fn test_expiring_contract_urgency_boundaries() {
        let today = date(2024, 6, 1);
        let cases = [
            (7, Urgency::Critical),
            (8, Urgency::Warning),
            (15, Urgency::Warning),
            (16, Urgency::Normal),
        ];
        for (days, expected) in cases {
            let mut s = student(1, "Ana", true);
            s.contract_end = Some(today + Days::new(days));
            let contract = ExpiringContract::new(s, today).unwrap();
            assert_eq!(contract.days_remaining, days as i64);
            assert_eq!(contract.urgency, expected, "{days} days");
        }
    }

    #[test]
    fn test_search() {
        let mut s = student(1, "João da Silva", true);
        s.guardian = Some("Marta Silva".into());
        s.whatsapp = Some("(11) 98765-4321".into());

        assert!(matches_search(&s, ""));
        assert!(matches_search(&s, "JOÃO"));
        assert!(!matches_search(&s, "joao"));
        assert!(matches_search(&s, "marta"));
        assert!(matches_search(&s, "98765-43"));
        assert!(!matches_search(&s, "12345"));

        assert!(matches_search(&s, "11 98765"));

        let list = vec![s, student(2, "Pedro", true)];
        assert_eq!(filter_students(&list, "pedro").len(), 1);
    }

    #[test]
    fn test_search_mixed_term_ignores_phone_digits() {
        let mut bia = student(1, "Bia Lima", true);
        bia.whatsapp = Some("(21) 99876-5432".into());

        assert!(!matches_search(&bia, "Maria 2"));
        assert!(!matches_search(&bia, "a2"));
        assert!(matches_search(&bia, "(21) 9987"));
        assert!(matches_search(&bia, "bia"));
    }
}
