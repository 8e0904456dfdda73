//! Student Model (aluno)

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::billing;

/// Contract length used when the form leaves it blank
pub const DEFAULT_CONTRACT_MONTHS: u32 = 12;

/// Kind of class a student or session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassType {
    /// Swimming
    #[serde(rename = "natacao")]
    Swimming,
    /// Water aerobics
    #[serde(rename = "hidroginastica")]
    WaterAerobics,
}

impl ClassType {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swimming => "natacao",
            Self::WaterAerobics => "hidroginastica",
        }
    }

    /// Display label (pt-BR)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Swimming => "Natação",
            Self::WaterAerobics => "Hidroginástica",
        }
    }
}

impl std::str::FromStr for ClassType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "natacao" | "swimming" => Ok(Self::Swimming),
            "hidroginastica" | "water-aerobics" => Ok(Self::WaterAerobics),
            other => Err(format!("unknown class type: {other}")),
        }
    }
}

/// Student entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    #[serde(rename = "responsavel", default)]
    pub guardian: Option<String>,
    #[serde(rename = "tipo_aula")]
    pub class_type: ClassType,
    #[serde(rename = "valor_mensalidade")]
    pub monthly_fee: Decimal,
    #[serde(rename = "dia_vencimento")]
    pub due_day: u8,
    #[serde(rename = "data_inicio_contrato", default)]
    pub contract_start: Option<NaiveDate>,
    #[serde(rename = "data_fim_contrato", default)]
    pub contract_end: Option<NaiveDate>,
    #[serde(rename = "duracao_contrato_meses", default)]
    pub contract_months: Option<u32>,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "telefone_whatsapp", default)]
    pub whatsapp: Option<String>,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Student {
    /// End of contract: the stored date, or start + duration when only those are known
    pub fn effective_contract_end(&self) -> Option<NaiveDate> {
        self.contract_end.or_else(|| {
            let start = self.contract_start?;
            billing::contract_end(start, self.contract_months.unwrap_or(DEFAULT_CONTRACT_MONTHS))
        })
    }

    /// First name, used to address the student in messages
    pub fn first_name(&self) -> &str {
        self.full_name.split_whitespace().next().unwrap_or(&self.full_name)
    }
}

/// Create student payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StudentCreate {
    #[serde(rename = "nome_completo")]
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[serde(rename = "responsavel", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub guardian: Option<String>,
    #[serde(rename = "tipo_aula")]
    pub class_type: ClassType,
    #[serde(rename = "valor_mensalidade")]
    pub monthly_fee: Decimal,
    #[serde(rename = "dia_vencimento")]
    #[validate(range(min = 1, max = 31))]
    pub due_day: u8,
    #[serde(rename = "data_inicio_contrato", default, skip_serializing_if = "Option::is_none")]
    pub contract_start: Option<NaiveDate>,
    #[serde(rename = "data_fim_contrato", default, skip_serializing_if = "Option::is_none")]
    pub contract_end: Option<NaiveDate>,
    #[serde(rename = "duracao_contrato_meses", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 60))]
    pub contract_months: Option<u32>,
    #[serde(rename = "ativo", default = "default_true")]
    pub active: bool,
    #[serde(rename = "telefone_whatsapp", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub whatsapp: Option<String>,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StudentCreate {
    /// Minimal payload; contract dates are filled in by [`Self::with_contract`]
    pub fn new(full_name: impl Into<String>, class_type: ClassType, monthly_fee: Decimal, due_day: u8) -> Self {
        Self {
            full_name: full_name.into(),
            guardian: None,
            class_type,
            monthly_fee,
            due_day,
            contract_start: None,
            contract_end: None,
            contract_months: None,
            active: true,
            whatsapp: None,
            notes: None,
        }
    }

    /// Set the contract start and duration, deriving the end date
    pub fn with_contract(mut self, start: NaiveDate, months: u32) -> Self {
        self.contract_start = Some(start);
        self.contract_months = Some(months);
        self.contract_end = billing::contract_end(start, months);
        self
    }

    /// Set the WhatsApp phone
    pub fn with_whatsapp(mut self, phone: impl Into<String>) -> Self {
        self.whatsapp = Some(phone.into());
        self
    }

    /// Set the guardian's name
    pub fn with_guardian(mut self, guardian: impl Into<String>) -> Self {
        self.guardian = Some(guardian.into());
        self
    }

    /// Fill in a missing contract end from start + duration
    pub fn derive_contract_end(&mut self) {
        if self.contract_end.is_none()
            && let Some(start) = self.contract_start
        {
            let months = self.contract_months.unwrap_or(DEFAULT_CONTRACT_MONTHS);
            self.contract_end = billing::contract_end(start, months);
        }
    }

    /// Fee must not be negative
    pub fn check_fee(&self) -> Result<(), String> {
        if self.monthly_fee.is_sign_negative() {
            return Err("valor_mensalidade deve ser maior ou igual a zero".to_string());
        }
        Ok(())
    }
}

/// Update student payload (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StudentUpdate {
    #[serde(rename = "nome_completo", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[serde(rename = "responsavel", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub guardian: Option<String>,
    #[serde(rename = "tipo_aula", default, skip_serializing_if = "Option::is_none")]
    pub class_type: Option<ClassType>,
    #[serde(rename = "valor_mensalidade", default, skip_serializing_if = "Option::is_none")]
    pub monthly_fee: Option<Decimal>,
    #[serde(rename = "dia_vencimento", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 31))]
    pub due_day: Option<u8>,
    #[serde(rename = "data_inicio_contrato", default, skip_serializing_if = "Option::is_none")]
    pub contract_start: Option<NaiveDate>,
    #[serde(rename = "data_fim_contrato", default, skip_serializing_if = "Option::is_none")]
    pub contract_end: Option<NaiveDate>,
    #[serde(rename = "duracao_contrato_meses", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 60))]
    pub contract_months: Option<u32>,
    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "telefone_whatsapp", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub whatsapp: Option<String>,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Query filters for `GET /alunos`
///
/// The backend lists only active students when `ativo` is omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentFilter {
    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "tipo_aula", default, skip_serializing_if = "Option::is_none")]
    pub class_type: Option<ClassType>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_student_wire_names() {
        let json = r#"{
            "id": 1,
            "nome_completo": "Maria Souza",
            "tipo_aula": "hidroginastica",
            "valor_mensalidade": "150.00",
            "dia_vencimento": 10,
            "data_inicio_contrato": "2024-01-15",
            "duracao_contrato_meses": 12,
            "ativo": true,
            "telefone_whatsapp": "11987654321",
            "created_at": "2024-01-15T10:00:00"
        }"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.full_name, "Maria Souza");
        assert_eq!(student.class_type, ClassType::WaterAerobics);
        assert_eq!(student.monthly_fee, Decimal::new(15000, 2));
        assert_eq!(student.first_name(), "Maria");
        assert_eq!(student.effective_contract_end(), Some(date(2025, 1, 15)));
    }

    #[test]
    fn test_fee_accepts_json_number() {
        let json = r#"{
            "id": 2, "nome_completo": "Ana", "tipo_aula": "natacao",
            "valor_mensalidade": 99.9, "dia_vencimento": 5, "ativo": false,
            "created_at": "2024-03-01T08:30:00"
        }"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.monthly_fee, Decimal::new(999, 1));
        assert!(student.effective_contract_end().is_none());
    }

    #[test]
    fn test_create_with_contract_derives_end() {
        let payload = StudentCreate::new("João", ClassType::Swimming, Decimal::new(120, 0), 10)
            .with_contract(date(2024, 1, 15), 12);
        assert_eq!(payload.contract_end, Some(date(2025, 1, 15)));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["data_fim_contrato"], "2025-01-15");
        assert_eq!(json["tipo_aula"], "natacao");
        assert!(json.get("responsavel").is_none());
    }

    #[test]
    fn test_derive_contract_end_uses_default_duration() {
        let mut payload = StudentCreate::new("João", ClassType::Swimming, Decimal::ZERO, 1);
        payload.contract_start = Some(date(2024, 3, 1));
        payload.derive_contract_end();
        assert_eq!(payload.contract_end, Some(date(2025, 3, 1)));
    }

    #[test]
    fn test_create_validation() {
        let mut payload = StudentCreate::new("", ClassType::Swimming, Decimal::ZERO, 32);
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);

        payload.full_name = "Ok".into();
        payload.due_day = 31;
        assert!(payload.validate().is_ok());

        payload.monthly_fee = Decimal::new(-1, 0);
        assert!(payload.check_fee().is_err());
    }

    #[test]
    fn test_class_type_parse() {
        assert_eq!("natacao".parse::<ClassType>().unwrap(), ClassType::Swimming);
        assert_eq!(
            "HIDROGINASTICA".parse::<ClassType>().unwrap(),
            ClassType::WaterAerobics
        );
        assert!("polo".parse::<ClassType>().is_err());
    }
}
