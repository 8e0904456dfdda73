//! Payment Model (pagamento)

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "dinheiro")]
    Cash,
    #[serde(rename = "pix")]
    Pix,
    #[serde(rename = "cartao_credito")]
    CreditCard,
    #[serde(rename = "cartao_debito")]
    DebitCard,
    #[serde(rename = "transferencia")]
    BankTransfer,
}

impl PaymentMethod {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "dinheiro",
            Self::Pix => "pix",
            Self::CreditCard => "cartao_credito",
            Self::DebitCard => "cartao_debito",
            Self::BankTransfer => "transferencia",
        }
    }

    /// Display label (pt-BR)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Dinheiro",
            Self::Pix => "PIX",
            Self::CreditCard => "Cartão de Crédito",
            Self::DebitCard => "Cartão de Débito",
            Self::BankTransfer => "Transferência",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dinheiro" | "cash" => Ok(Self::Cash),
            "pix" => Ok(Self::Pix),
            "cartao_credito" | "credit" => Ok(Self::CreditCard),
            "cartao_debito" | "debit" => Ok(Self::DebitCard),
            "transferencia" | "transfer" => Ok(Self::BankTransfer),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "confirmado")]
    Confirmed,
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "cancelado")]
    Cancelled,
}

/// Month a payment refers to, `YYYY-MM` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceMonth {
    year: i32,
    month: u32,
}

impl ReferenceMonth {
    /// Build from year and 1-based month
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
            return None;
        }
        Some(Self { year, month })
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        // year and month are range-checked on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The following month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for ReferenceMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for ReferenceMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("mes_referencia deve estar no formato YYYY-MM: {s}");
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for ReferenceMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReferenceMonth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    #[serde(rename = "aluno_id")]
    pub student_id: i64,
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "data_pagamento")]
    pub paid_on: NaiveDate,
    #[serde(rename = "mes_referencia")]
    pub reference_month: ReferenceMonth,
    #[serde(rename = "forma_pagamento")]
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Payment {
    pub fn is_confirmed(&self) -> bool {
        self.status == PaymentStatus::Confirmed
    }
}

/// Create payment payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentCreate {
    #[serde(rename = "aluno_id")]
    #[validate(range(min = 1))]
    pub student_id: i64,
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "data_pagamento")]
    pub paid_on: NaiveDate,
    #[serde(rename = "mes_referencia")]
    pub reference_month: ReferenceMonth,
    #[serde(rename = "forma_pagamento")]
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PaymentCreate {
    /// Amount must not be negative
    pub fn check_amount(&self) -> Result<(), String> {
        if self.amount.is_sign_negative() {
            return Err("valor deve ser maior ou igual a zero".to_string());
        }
        Ok(())
    }
}

/// Update payment payload (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PaymentUpdate {
    #[serde(rename = "aluno_id", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub student_id: Option<i64>,
    #[serde(rename = "valor", default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(rename = "data_pagamento", default, skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
    #[serde(rename = "mes_referencia", default, skip_serializing_if = "Option::is_none")]
    pub reference_month: Option<ReferenceMonth>,
    #[serde(rename = "forma_pagamento", default, skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Query filters for `GET /pagamentos`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentFilter {
    #[serde(rename = "aluno_id", default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(rename = "mes_referencia", default, skip_serializing_if = "Option::is_none")]
    pub reference_month: Option<ReferenceMonth>,
    /// Paid on or after
    #[serde(rename = "data_inicio", default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    /// Paid on or before
    #[serde(rename = "data_fim", default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl PaymentFilter {
    pub fn for_student(student_id: i64) -> Self {
        Self {
            student_id: Some(student_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, payment: &Payment) -> bool {
        self.student_id.is_none_or(|id| payment.student_id == id)
            && self.reference_month.is_none_or(|m| payment.reference_month == m)
            && self.from.is_none_or(|d| payment.paid_on >= d)
            && self.to.is_none_or(|d| payment.paid_on <= d)
    }
}

/// Query for `GET /pagamentos/relatorio-mensal`
///
/// `mes` is only honoured together with `ano`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MonthlyReportQuery {
    #[serde(rename = "ano", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "mes", default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl MonthlyReportQuery {
    /// Report for a single month
    pub fn for_month(month: ReferenceMonth) -> Self {
        Self {
            year: Some(month.year()),
            month: Some(month.month()),
        }
    }

    /// Whether a reference month falls inside this query
    pub fn matches(&self, month: &ReferenceMonth) -> bool {
        match (self.year, self.month) {
            (Some(y), Some(m)) => month.year() == y && month.month() == m,
            (Some(y), None) => month.year() == y,
            _ => true,
        }
    }
}

/// One row of the monthly report: a (month, method) group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReportRow {
    #[serde(rename = "mes_referencia")]
    pub reference_month: ReferenceMonth,
    #[serde(rename = "forma_pagamento")]
    pub method: PaymentMethod,
    #[serde(rename = "quantidade")]
    pub count: u32,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_month_parse() {
        let month: ReferenceMonth = "2024-03".parse().unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 3);
        assert_eq!(month.to_string(), "2024-03");

        assert!("2024-13".parse::<ReferenceMonth>().is_err());
        assert!("2024-3".parse::<ReferenceMonth>().is_err());
        assert!("24-03".parse::<ReferenceMonth>().is_err());
        assert!("março".parse::<ReferenceMonth>().is_err());
    }

    #[test]
    fn test_reference_month_next_wraps_year() {
        let dec: ReferenceMonth = "2024-12".parse().unwrap();
        assert_eq!(dec.next().to_string(), "2025-01");
        assert_eq!(
            dec.first_day(),
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_payment_deserialize() {
        let json = r#"{
            "id": 9, "aluno_id": 3, "valor": "150.00",
            "data_pagamento": "2024-03-05", "mes_referencia": "2024-03",
            "forma_pagamento": "cartao_credito", "created_at": "2024-03-05T12:00:00"
        }"#;
        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.method, PaymentMethod::CreditCard);
        // status defaults to confirmed when the backend omits it
        assert!(payment.is_confirmed());
        assert_eq!(payment.reference_month, ReferenceMonth::new(2024, 3).unwrap());
    }

    #[test]
    fn test_payment_rejects_bad_reference_month() {
        let json = r#"{
            "id": 9, "aluno_id": 3, "valor": 10,
            "data_pagamento": "2024-03-05", "mes_referencia": "03/2024",
            "forma_pagamento": "pix", "created_at": "2024-03-05T12:00:00"
        }"#;
        assert!(serde_json::from_str::<Payment>(json).is_err());
    }

    #[test]
    fn test_report_query_matches() {
        let march: ReferenceMonth = "2024-03".parse().unwrap();
        let april: ReferenceMonth = "2024-04".parse().unwrap();

        assert!(MonthlyReportQuery::default().matches(&march));
        assert!(MonthlyReportQuery::for_month(march).matches(&march));
        assert!(!MonthlyReportQuery::for_month(march).matches(&april));

        let year_only = MonthlyReportQuery {
            year: Some(2024),
            month: None,
        };
        assert!(year_only.matches(&april));
        // month without year is ignored
        let month_only = MonthlyReportQuery {
            year: None,
            month: Some(1),
        };
        assert!(month_only.matches(&april));
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Pending).unwrap(),
            "\"pendente\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).unwrap(),
            "\"dinheiro\""
        );
    }
}
