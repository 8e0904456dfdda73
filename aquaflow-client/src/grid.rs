//! Weekly schedule grid
//!
//! Built from the full-grid response and indexed by `(weekday, start time)`.
//! Nothing is cached between renders: build a new grid from every fetch.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shared::models::{Occupancy, OccupancyLevel, SessionWithRoster, Weekday};

/// Canonical slots shown even when nothing is scheduled: 06:00..=11:00 and 14:00..=20:00
const CANONICAL_HOURS: [u32; 13] = [6, 7, 8, 9, 10, 11, 14, 15, 16, 17, 18, 19, 20];

/// Width of the percentage bar in characters
pub const BAR_WIDTH: usize = 10;

/// Two sessions that share a slot; the one with the lower id is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub kept_id: i64,
    pub dropped_id: i64,
}

/// Content of one grid cell
#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    /// Free slot; the UI offers to create a session here
    Empty { weekday: Weekday, start_time: NaiveTime },
    Occupied {
        session: &'a SessionWithRoster,
        occupancy: Occupancy,
    },
}

impl Cell<'_> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

#[derive(Debug, Default)]
pub struct ScheduleGrid {
    sessions: Vec<SessionWithRoster>,
    index: HashMap<(Weekday, NaiveTime), usize>,
    times: Vec<NaiveTime>,
    collisions: Vec<Collision>,
}

impl ScheduleGrid {
    pub fn build(sessions: Vec<SessionWithRoster>) -> Self {
        let mut index: HashMap<(Weekday, NaiveTime), usize> = HashMap::with_capacity(sessions.len());
        let mut collisions = Vec::new();

        for (pos, entry) in sessions.iter().enumerate() {
            let key = (entry.session.weekday, entry.session.start_time);
            match index.get(&key).copied() {
                None => {
                    index.insert(key, pos);
                }
                Some(existing) => {
                    let current = &sessions[existing].session;
                    let (kept, dropped) = if entry.session.id < current.id {
                        index.insert(key, pos);
                        (entry.session.id, current.id)
                    } else {
                        (current.id, entry.session.id)
                    };
                    tracing::warn!(
                        weekday = %key.0,
                        time = %key.1,
                        kept,
                        dropped,
                        "Two sessions share one grid slot"
                    );
                    collisions.push(Collision {
                        weekday: key.0,
                        start_time: key.1,
                        kept_id: kept,
                        dropped_id: dropped,
                    });
                }
            }
        }

        let times: BTreeSet<NaiveTime> = CANONICAL_HOURS
            .iter()
            .filter_map(|&h| NaiveTime::from_hms_opt(h, 0, 0))
            .chain(sessions.iter().map(|s| s.session.start_time))
            .collect();

        Self {
            sessions,
            index,
            times: times.into_iter().collect(),
            collisions,
        }
    }

    /// Row labels, sorted
    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn sessions(&self) -> &[SessionWithRoster] {
        &self.sessions
    }

    pub fn get(&self, weekday: Weekday, start_time: NaiveTime) -> Option<&SessionWithRoster> {
        self.index
            .get(&(weekday, start_time))
            .map(|&pos| &self.sessions[pos])
    }

    pub fn cell(&self, weekday: Weekday, start_time: NaiveTime) -> Cell<'_> {
        match self.get(weekday, start_time) {
            Some(session) => Cell::Occupied {
                session,
                occupancy: session.occupancy(),
            },
            None => Cell::Empty { weekday, start_time },
        }
    }

    /// Average occupancy over the sessions shown in the grid
    pub fn average_occupancy(&self) -> Decimal {
        if self.index.is_empty() {
            return Decimal::ZERO;
        }
        let sum: Decimal = self
            .index
            .values()
            .map(|&pos| self.sessions[pos].occupancy().percent)
            .sum();
        (sum / Decimal::from(self.index.len() as u64)).round_dp(2)
    }

    /// Plain-text table, one row per time slot and one column per weekday
    pub fn render(&self) -> String {
        let col = 16;
        let mut out = String::new();

        let _ = write!(out, "{:<6}", "");
        for day in Weekday::ALL {
            let _ = write!(out, "|{:^col$}", day.label());
        }
        out.push('\n');
        out.push_str(&"-".repeat(6 + (col + 1) * Weekday::ALL.len()));
        out.push('\n');

        for &time in &self.times {
            let _ = write!(out, "{:<6}", time.format("%H:%M").to_string());
            for day in Weekday::ALL {
                let text = match self.cell(day, time) {
                    Cell::Empty { .. } => "+".to_string(),
                    Cell::Occupied { occupancy, .. } => {
                        let text = format!(
                            "{}/{} {}",
                            occupancy.enrolled,
                            occupancy.capacity,
                            level_marker(occupancy.level())
                        );
                        text.trim_end().to_string()
                    }
                };
                let _ = write!(out, "|{text:^col$}");
            }
            out.push('\n');
        }
        out
    }
}

fn level_marker(level: OccupancyLevel) -> &'static str {
    match level {
        OccupancyLevel::Available => "",
        OccupancyLevel::AlmostFull => "!",
        OccupancyLevel::Full => "CHEIO",
    }
}

/// `[#####-----] 50.00%`
pub fn percent_bar(percent: Decimal) -> String {
    let clamped = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (clamped * Decimal::from(BAR_WIDTH as u64) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_WIDTH);
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent.round_dp(2)
    )
}
