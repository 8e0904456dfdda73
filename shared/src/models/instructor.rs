//! Instructor Model (professor)

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ClassType;
use crate::cpf;

/// What an instructor is qualified to teach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialty {
    #[serde(rename = "natacao")]
    Swimming,
    #[serde(rename = "hidroginastica")]
    WaterAerobics,
    #[serde(rename = "ambos")]
    Both,
}

impl Specialty {
    /// Whether this specialty covers sessions of `class_type`
    pub fn covers(&self, class_type: ClassType) -> bool {
        matches!(
            (self, class_type),
            (Self::Both, _)
                | (Self::Swimming, ClassType::Swimming)
                | (Self::WaterAerobics, ClassType::WaterAerobics)
        )
    }
}

/// Instructor entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    /// Always formatted `XXX.XXX.XXX-XX`
    pub cpf: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "especialidade", default)]
    pub specialty: Option<Specialty>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Create instructor payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InstructorCreate {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_cpf_digits"))]
    pub cpf: String,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<Specialty>,
}

impl InstructorCreate {
    /// Copy with the CPF in canonical `XXX.XXX.XXX-XX` form
    pub fn normalized(mut self) -> Self {
        self.cpf = cpf::format_cpf(&self.cpf);
        self
    }
}

/// Update instructor payload (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct InstructorUpdate {
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_cpf_digits"))]
    pub cpf: Option<String>,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<Specialty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

fn validate_cpf_digits(value: &str) -> Result<(), validator::ValidationError> {
    if value.chars().filter(char::is_ascii_digit).count() != 11 {
        return Err(validator::ValidationError::new("cpf_length")
            .with_message("CPF deve ter 11 dígitos".into()));
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(cpf: &str) -> InstructorCreate {
        InstructorCreate {
            name: "Carlos Lima".into(),
            email: "carlos@aquaflow.com".into(),
            cpf: cpf.into(),
            phone: None,
            specialty: Some(Specialty::Both),
        }
    }

    #[test]
    fn test_cpf_validation_and_normalization() {
        assert!(payload("123").validate().is_err());

        let ok = payload("52998224725");
        assert!(ok.validate().is_ok());
        assert_eq!(ok.normalized().cpf, "529.982.247-25");
    }

    #[test]
    fn test_email_validation() {
        let mut p = payload("52998224725");
        p.email = "not-an-email".into();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_specialty_covers() {
        assert!(Specialty::Both.covers(ClassType::WaterAerobics));
        assert!(Specialty::Swimming.covers(ClassType::Swimming));
        assert!(!Specialty::Swimming.covers(ClassType::WaterAerobics));
    }

    #[test]
    fn test_update_omits_unset_fields() {
        let update = InstructorUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"is_active": false}));
    }
}
