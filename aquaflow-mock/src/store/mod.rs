//! In-memory data store
//!
//! One [`Table`] per entity with auto-increment ids. The store is shared
//! behind a `tokio::sync::RwLock` in [`AppState`](crate::state::AppState);
//! every mutating operation runs under the write lock, so check-then-insert
//! sequences (enrollment capacity, unique emails) are atomic.

mod catalog;
mod payments;
mod schedule;
mod students;
mod users;

use chrono::{Local, NaiveDate, NaiveDateTime};
use shared::models::{Instructor, Payment, Plan, ScheduleSession, Student, User};
use std::collections::BTreeMap;

pub use schedule::Enrollment;
pub use users::UserRecord;

/// Rows keyed by id, iterated in id order
#[derive(Debug)]
pub struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    /// Allocate the next id and store the row built from it
    pub fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.entry(id).or_insert(build(id))
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub fn remove(&mut self, id: i64) -> Option<T> {
        self.rows.remove(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn retain(&mut self, keep: impl FnMut(&i64, &mut T) -> bool) {
        self.rows.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Store {
    users: Table<UserRecord>,
    students: Table<Student>,
    payments: Table<Payment>,
    sessions: Table<ScheduleSession>,
    enrollments: Table<Enrollment>,
    instructors: Table<Instructor>,
    plans: Table<Plan>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ids_are_never_reused() {
        let mut table: Table<i64> = Table::default();
        assert_eq!(*table.insert_with(|id| id * 10), 10);
        assert_eq!(*table.insert_with(|id| id * 10), 20);
        table.remove(2);
        assert_eq!(*table.insert_with(|id| id * 10), 30);
        assert_eq!(table.len(), 2);
        assert!(!table.contains(2));
    }
}
