//! Schedule Session Model (horario)
//!
//! A recurring weekly class slot with a capacity and an enrolled set.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::ClassType;

/// Default seats per session
pub const DEFAULT_CAPACITY: u32 = 10;

/// Upper bound on seats per session
pub const MAX_CAPACITY: u32 = 50;

/// Occupancy from which a session counts as almost full (percent)
pub const ALMOST_FULL_PERCENT: u32 = 70;

// ==================== Weekday ====================

/// Day of week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "segunda")]
    Monday,
    #[serde(rename = "terca")]
    Tuesday,
    #[serde(rename = "quarta")]
    Wednesday,
    #[serde(rename = "quinta")]
    Thursday,
    #[serde(rename = "sexta")]
    Friday,
    #[serde(rename = "sabado")]
    Saturday,
    #[serde(rename = "domingo")]
    Sunday,
}

impl Weekday {
    /// All days in grid column order
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "segunda",
            Self::Tuesday => "terca",
            Self::Wednesday => "quarta",
            Self::Thursday => "quinta",
            Self::Friday => "sexta",
            Self::Saturday => "sabado",
            Self::Sunday => "domingo",
        }
    }

    /// Column header (pt-BR)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Monday => "Segunda",
            Self::Tuesday => "Terça",
            Self::Wednesday => "Quarta",
            Self::Thursday => "Quinta",
            Self::Friday => "Sexta",
            Self::Saturday => "Sábado",
            Self::Sunday => "Domingo",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown weekday: {s}"))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

// ==================== Time of day ====================

/// Serde for times of day: writes `HH:MM:SS`, reads `HH:MM:SS` or `HH:MM`
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(s: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .ok()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M:%S"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid time: {s}")))
    }

    /// Same, for optional fields
    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(t) => serializer.collect_str(&t.format("%H:%M:%S")),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(s) => super::parse(&s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid time: {s}"))),
                None => Ok(None),
            }
        }
    }
}

// ==================== Session ====================

/// Schedule session entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSession {
    pub id: i64,
    #[serde(rename = "dia_semana")]
    pub weekday: Weekday,
    #[serde(rename = "horario", with = "time_of_day")]
    pub start_time: NaiveTime,
    #[serde(rename = "hora_fim", default, with = "time_of_day::option", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(rename = "tipo_aula")]
    pub class_type: ClassType,
    #[serde(rename = "professor_id", default)]
    pub teacher_id: Option<i64>,
    #[serde(rename = "capacidade_maxima", default = "default_capacity")]
    pub capacity: u32,
    #[serde(rename = "fila_espera", default)]
    pub waitlist: u32,
}

/// Create session payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionCreate {
    #[serde(rename = "dia_semana")]
    pub weekday: Weekday,
    #[serde(rename = "horario", with = "time_of_day")]
    pub start_time: NaiveTime,
    #[serde(rename = "hora_fim", default, with = "time_of_day::option", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(rename = "tipo_aula")]
    pub class_type: ClassType,
    #[serde(rename = "professor_id", default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<i64>,
    #[serde(rename = "capacidade_maxima", default = "default_capacity")]
    #[validate(range(min = 1, max = 50))]
    pub capacity: u32,
    #[serde(rename = "fila_espera", default)]
    pub waitlist: u32,
}

impl SessionCreate {
    pub fn new(weekday: Weekday, start_time: NaiveTime, class_type: ClassType) -> Self {
        Self {
            weekday,
            start_time,
            end_time: None,
            class_type,
            teacher_id: None,
            capacity: DEFAULT_CAPACITY,
            waitlist: 0,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_teacher(mut self, teacher_id: i64) -> Self {
        self.teacher_id = Some(teacher_id);
        self
    }
}

/// Update session payload (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SessionUpdate {
    #[serde(rename = "dia_semana", default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<Weekday>,
    #[serde(rename = "horario", default, with = "time_of_day::option", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(rename = "hora_fim", default, with = "time_of_day::option", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(rename = "tipo_aula", default, skip_serializing_if = "Option::is_none")]
    pub class_type: Option<ClassType>,
    #[serde(rename = "professor_id", default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<i64>,
    #[serde(rename = "capacidade_maxima", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 50))]
    pub capacity: Option<u32>,
    #[serde(rename = "fila_espera", default, skip_serializing_if = "Option::is_none")]
    pub waitlist: Option<u32>,
}

/// Student as listed on a session roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledStudent {
    pub id: i64,
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    #[serde(rename = "telefone_whatsapp", default)]
    pub whatsapp: Option<String>,
}

/// Session with its roster, as returned by `GET /horarios/grade-completa`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionWithRoster {
    #[serde(flatten)]
    pub session: ScheduleSession,
    #[serde(rename = "alunos", default)]
    pub students: Vec<EnrolledStudent>,
    /// Summary computed by the backend; [`Self::occupancy`] recounts instead
    #[serde(rename = "vagas_disponiveis", default)]
    pub reported_vacancies: i64,
    #[serde(rename = "professor_nome", default)]
    pub teacher_name: Option<String>,
}

impl SessionWithRoster {
    pub fn enrolled_count(&self) -> u32 {
        self.students.len() as u32
    }

    pub fn is_enrolled(&self, student_id: i64) -> bool {
        self.students.iter().any(|s| s.id == student_id)
    }

    /// Occupancy derived from the roster itself
    pub fn occupancy(&self) -> Occupancy {
        Occupancy::new(self.enrolled_count(), self.session.capacity, self.session.waitlist)
    }
}

/// Capacity snapshot, as returned by `GET /horarios/{id}/vagas`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    #[serde(rename = "horario_id")]
    pub session_id: i64,
    #[serde(rename = "dia_semana")]
    pub weekday: Weekday,
    #[serde(rename = "horario", with = "time_of_day")]
    pub start_time: NaiveTime,
    #[serde(rename = "tipo_aula")]
    pub class_type: ClassType,
    #[serde(rename = "capacidade_maxima")]
    pub capacity: u32,
    #[serde(rename = "alunos_matriculados")]
    pub enrolled: u32,
    #[serde(rename = "vagas_disponiveis")]
    pub remaining: i64,
    #[serde(rename = "percentual_ocupacao")]
    pub percent: Decimal,
}

// ==================== Occupancy ====================

/// How full a session is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyLevel {
    Available,
    AlmostFull,
    Full,
}

/// Derived occupancy of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    pub enrolled: u32,
    pub capacity: u32,
    pub waitlist: u32,
    /// `capacity - enrolled`, never below zero
    pub remaining: u32,
    /// `enrolled / capacity * 100`, two decimal places
    pub percent: Decimal,
}

impl Occupancy {
    pub fn new(enrolled: u32, capacity: u32, waitlist: u32) -> Self {
        Self {
            enrolled,
            capacity,
            waitlist,
            remaining: capacity.saturating_sub(enrolled),
            percent: occupancy_percent(enrolled, capacity),
        }
    }

    pub fn is_full(&self) -> bool {
        self.remaining == 0
    }

    pub fn level(&self) -> OccupancyLevel {
        if self.enrolled >= self.capacity {
            OccupancyLevel::Full
        } else if self.percent >= Decimal::from(ALMOST_FULL_PERCENT) {
            OccupancyLevel::AlmostFull
        } else {
            OccupancyLevel::Available
        }
    }
}

/// `round(enrolled / capacity * 100, 2)`, 0 for zero capacity
pub fn occupancy_percent(enrolled: u32, capacity: u32) -> Decimal {
    if capacity == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(enrolled) * Decimal::ONE_HUNDRED / Decimal::from(capacity)).round_dp(2)
}

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_session_accepts_short_time() {
        let json = r#"{"id":1,"dia_semana":"segunda","horario":"07:00",
            "tipo_aula":"natacao","capacidade_maxima":8}"#;
        let session: ScheduleSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.start_time, t(7, 0));
        assert_eq!(session.waitlist, 0);
        assert_eq!(session.weekday, Weekday::Monday);

        let out = serde_json::to_value(&session).unwrap();
        assert_eq!(out["horario"], "07:00:00");
        assert!(out.get("hora_fim").is_none());
    }

    #[test]
    fn test_session_default_capacity() {
        let json = r#"{"id":1,"dia_semana":"sabado","horario":"09:30:00","tipo_aula":"hidroginastica"}"#;
        let session: ScheduleSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.capacity, DEFAULT_CAPACITY);
        assert_eq!(session.weekday, Weekday::Saturday);
    }

    #[test]
    fn test_roster_flattened() {
        let json = r#"{
            "id": 4, "dia_semana": "terca", "horario": "18:00:00",
            "tipo_aula": "natacao", "capacidade_maxima": 2, "fila_espera": 1,
            "alunos": [{"id": 1, "nome_completo": "Ana"}, {"id": 2, "nome_completo": "Bia", "telefone_whatsapp": "11999990000"}],
            "vagas_disponiveis": 5,
            "professor_nome": "Carlos"
        }"#;
        let roster: SessionWithRoster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.session.id, 4);
        assert!(roster.is_enrolled(2));
        assert!(!roster.is_enrolled(3));

        // the backend summary is ignored
        let occupancy = roster.occupancy();
        assert_eq!(occupancy.remaining, 0);
        assert!(occupancy.is_full());
        assert_eq!(occupancy.waitlist, 1);
    }

    #[test]
    fn test_occupancy_percent() {
        assert_eq!(occupancy_percent(1, 3), Decimal::new(3333, 2));
        assert_eq!(occupancy_percent(5, 10), Decimal::new(50, 0));
        assert_eq!(occupancy_percent(3, 0), Decimal::ZERO);
    }

    #[test]
    fn test_occupancy_levels() {
        assert_eq!(Occupancy::new(6, 10, 0).level(), OccupancyLevel::Available);
        assert_eq!(Occupancy::new(7, 10, 0).level(), OccupancyLevel::AlmostFull);
        assert_eq!(Occupancy::new(10, 10, 0).level(), OccupancyLevel::Full);
        // over capacity still reports zero remaining
        let over = Occupancy::new(12, 10, 0);
        assert_eq!(over.remaining, 0);
        assert_eq!(over.level(), OccupancyLevel::Full);
    }

    #[test]
    fn test_weekday_order_and_parse() {
        assert!(Weekday::Monday < Weekday::Sunday);
        assert_eq!("QUARTA".parse::<Weekday>().unwrap(), Weekday::Wednesday);
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
        assert!("feriado".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_create_validation() {
        let payload = SessionCreate::new(Weekday::Friday, t(6, 0), ClassType::Swimming)
            .with_capacity(51);
        assert!(payload.validate().is_err());
        assert!(payload.with_capacity(50).validate().is_ok());
    }
}
