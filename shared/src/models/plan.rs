//! Plan Model (plano)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Membership plan entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "valor_mensal")]
    pub monthly_price: Decimal,
    #[serde(rename = "aulas_por_semana")]
    pub classes_per_week: u8,
    #[serde(rename = "duracao_aula_minutos", default = "default_class_minutes")]
    pub class_minutes: u16,
    #[serde(rename = "acesso_livre", default)]
    pub unlimited_access: bool,
    #[serde(rename = "permite_reposicao", default = "default_true")]
    pub allows_makeup: bool,
    #[serde(rename = "dias_tolerancia", default = "default_grace_days")]
    pub grace_days: u8,
    #[serde(rename = "ativo", default = "default_true")]
    pub active: bool,
}

/// Create plan payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlanCreate {
    #[serde(rename = "nome")]
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(rename = "valor_mensal")]
    pub monthly_price: Decimal,
    #[serde(rename = "aulas_por_semana")]
    #[validate(range(min = 1, max = 7))]
    pub classes_per_week: u8,
    #[serde(rename = "duracao_aula_minutos", default = "default_class_minutes")]
    #[validate(range(min = 30, max = 120))]
    pub class_minutes: u16,
    #[serde(rename = "acesso_livre", default)]
    pub unlimited_access: bool,
    #[serde(rename = "permite_reposicao", default = "default_true")]
    pub allows_makeup: bool,
    #[serde(rename = "dias_tolerancia", default = "default_grace_days")]
    #[validate(range(max = 30))]
    pub grace_days: u8,
}

impl PlanCreate {
    /// Plan with the default duration, make-up and grace settings
    pub fn new(name: impl Into<String>, monthly_price: Decimal, classes_per_week: u8) -> Self {
        Self {
            name: name.into(),
            description: None,
            monthly_price,
            classes_per_week,
            class_minutes: default_class_minutes(),
            unlimited_access: false,
            allows_makeup: true,
            grace_days: default_grace_days(),
        }
    }

    /// Price must not be negative
    pub fn check_price(&self) -> Result<(), String> {
        if self.monthly_price.is_sign_negative() {
            return Err("valor_mensal deve ser maior ou igual a zero".to_string());
        }
        Ok(())
    }
}

/// Update plan payload (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PlanUpdate {
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(rename = "valor_mensal", default, skip_serializing_if = "Option::is_none")]
    pub monthly_price: Option<Decimal>,
    #[serde(rename = "aulas_por_semana", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 7))]
    pub classes_per_week: Option<u8>,
    #[serde(rename = "duracao_aula_minutos", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 30, max = 120))]
    pub class_minutes: Option<u16>,
    #[serde(rename = "acesso_livre", default, skip_serializing_if = "Option::is_none")]
    pub unlimited_access: Option<bool>,
    #[serde(rename = "permite_reposicao", default, skip_serializing_if = "Option::is_none")]
    pub allows_makeup: Option<bool>,
    #[serde(rename = "dias_tolerancia", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 30))]
    pub grace_days: Option<u8>,
    #[serde(rename = "ativo", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

fn default_class_minutes() -> u16 {
    50
}

fn default_grace_days() -> u8 {
    5
}

fn default_true() -> bool {
    true
}
