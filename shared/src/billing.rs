//! Contract and billing date arithmetic
//!
//! Everything here is pure: callers pass "today" in, nothing reads the clock.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Payment, PaymentStatus, ReferenceMonth};

/// A student with no payment in this many days is delinquent
pub const DELINQUENCY_WINDOW_DAYS: i64 = 45;

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// End of a contract that starts on `start` and runs for `months`
///
/// Calendar-month addition; the day is clamped to the end of the target
/// month, so `2024-01-31 + 1` is `2024-02-29`.
pub fn contract_end(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(months))
}

/// The due date of `due_day` inside a given month, clamped to its last day
pub fn due_date_in_month(due_day: u8, year: i32, month: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month);
    let day = u32::from(due_day).clamp(1, last.max(1));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Days past this month's due date (0 when not yet due)
pub fn days_overdue(due_day: u8, today: NaiveDate) -> i64 {
    due_date_in_month(due_day, today.year(), today.month())
        .map(|due| (today - due).num_days().max(0))
        .unwrap_or(0)
}

/// Next due date strictly after `reference`
pub fn next_due_date(due_day: u8, reference: NaiveDate) -> Option<NaiveDate> {
    let this_month = due_date_in_month(due_day, reference.year(), reference.month())?;
    if this_month > reference {
        return Some(this_month);
    }
    let next = ReferenceMonth::of(reference).next();
    due_date_in_month(due_day, next.year(), next.month())
}

/// Reference month (`YYYY-MM`) a payment made on `date` is booked against
pub fn reference_month(date: NaiveDate) -> ReferenceMonth {
    ReferenceMonth::of(date)
}

/// Whether a student whose last payment was `last_payment` is delinquent on `today`
pub fn is_delinquent(last_payment: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_payment {
        Some(paid) => (today - paid).num_days() > DELINQUENCY_WINDOW_DAYS,
        None => true,
    }
}

/// Delinquency rate in percent, rounded to two places
pub fn delinquency_rate(total_active: usize, delinquent: usize) -> Decimal {
    percent(delinquent, total_active)
}

/// `part / whole * 100` rounded to two places, 0 for an empty whole
pub fn percent(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part as u64) * Decimal::ONE_HUNDRED / Decimal::from(whole as u64)).round_dp(2)
}

/// Payment statistics for a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_count: usize,
    pub confirmed_count: usize,
    pub pending_count: usize,
    pub confirmed_total: Decimal,
    pub pending_total: Decimal,
    pub expected_total: Decimal,
    /// Share of payments (by count) that are confirmed
    pub collection_rate: Decimal,
}

/// Aggregate payments made between `from` and `to` (inclusive)
///
/// Cancelled payments are left out entirely.
pub fn period_stats(payments: &[Payment], from: NaiveDate, to: NaiveDate) -> PeriodStats {
    let mut stats = PeriodStats {
        from,
        to,
        total_count: 0,
        confirmed_count: 0,
        pending_count: 0,
        confirmed_total: Decimal::ZERO,
        pending_total: Decimal::ZERO,
        expected_total: Decimal::ZERO,
        collection_rate: Decimal::ZERO,
    };

    for payment in payments.iter().filter(|p| p.paid_on >= from && p.paid_on <= to) {
        match payment.status {
            PaymentStatus::Confirmed => {
                stats.confirmed_count += 1;
                stats.confirmed_total += payment.amount;
            }
            PaymentStatus::Pending => {
                stats.pending_count += 1;
                stats.pending_total += payment.amount;
            }
            PaymentStatus::Cancelled => continue,
        }
        stats.total_count += 1;
    }

    stats.expected_total = stats.confirmed_total + stats.pending_total;
    stats.collection_rate = percent(stats.confirmed_count, stats.total_count);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use chrono::NaiveDateTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(id: i64, paid_on: NaiveDate, amount: i64, status: PaymentStatus) -> Payment {
        Payment {
            id,
            student_id: 1,
            amount: Decimal::new(amount, 0),
            paid_on,
            reference_month: ReferenceMonth::of(paid_on),
            method: PaymentMethod::Pix,
            status,
            notes: None,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_contract_end() {
        assert_eq!(contract_end(date(2024, 1, 15), 12), Some(date(2025, 1, 15)));
        assert_eq!(contract_end(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(contract_end(date(2023, 1, 31), 1), Some(date(2023, 2, 28)));
        assert_eq!(contract_end(date(2024, 11, 30), 3), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn test_due_date_clamps_to_month_end() {
        assert_eq!(due_date_in_month(31, 2024, 2), Some(date(2024, 2, 29)));
        assert_eq!(due_date_in_month(10, 2024, 2), Some(date(2024, 2, 10)));
    }

    #[test]
    fn test_days_overdue() {
        assert_eq!(days_overdue(10, date(2024, 3, 15)), 5);
        assert_eq!(days_overdue(10, date(2024, 3, 10)), 0);
        assert_eq!(days_overdue(20, date(2024, 3, 15)), 0);
        // due day 31 in February falls on the 29th
        assert_eq!(days_overdue(31, date(2024, 2, 29)), 0);
    }

    #[test]
    fn test_next_due_date() {
        assert_eq!(next_due_date(10, date(2024, 3, 5)), Some(date(2024, 3, 10)));
        assert_eq!(next_due_date(10, date(2024, 3, 10)), Some(date(2024, 4, 10)));
        assert_eq!(next_due_date(31, date(2024, 1, 31)), Some(date(2024, 2, 29)));
        assert_eq!(next_due_date(5, date(2024, 12, 20)), Some(date(2025, 1, 5)));
    }

    #[test]
    fn test_reference_month() {
        assert_eq!(reference_month(date(2024, 3, 9)).to_string(), "2024-03");
    }

    #[test]
    fn test_is_delinquent() {
        let today = date(2024, 6, 30);
        assert!(is_delinquent(None, today));
        assert!(!is_delinquent(Some(date(2024, 6, 1)), today));
        assert!(!is_delinquent(Some(date(2024, 5, 16)), today));
        assert!(is_delinquent(Some(date(2024, 5, 15)), today));
    }

    #[test]
    fn test_delinquency_rate() {
        assert_eq!(delinquency_rate(0, 0), Decimal::ZERO);
        assert_eq!(delinquency_rate(3, 1), Decimal::new(3333, 2));
        assert_eq!(delinquency_rate(4, 1), Decimal::new(25, 0));
    }

    #[test]
    fn test_period_stats() {
        let payments = vec![
            payment(1, date(2024, 3, 1), 100, PaymentStatus::Confirmed),
            payment(2, date(2024, 3, 10), 150, PaymentStatus::Pending),
            payment(3, date(2024, 3, 12), 80, PaymentStatus::Cancelled),
            payment(4, date(2024, 3, 20), 50, PaymentStatus::Confirmed),
            payment(5, date(2024, 4, 2), 999, PaymentStatus::Confirmed),
        ];
        let stats = period_stats(&payments, date(2024, 3, 1), date(2024, 3, 31));
        assert_eq!(stats.total_count, 3);
        assert_eq!(stats.confirmed_count, 2);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.confirmed_total, Decimal::new(150, 0));
        assert_eq!(stats.pending_total, Decimal::new(150, 0));
        assert_eq!(stats.expected_total, Decimal::new(300, 0));
        assert_eq!(stats.collection_rate, Decimal::new(6667, 2));
    }

    #[test]
    fn test_period_stats_empty() {
        let stats = period_stats(&[], date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.collection_rate, Decimal::ZERO);
    }
}
