//! Persistence contract consumed by the assignment engine.
//!
//! Lookups return `Option` for "absent"; an `Err` always means the store
//! itself failed.

use crate::errors::AppResult;
use crate::models::{DutyRecord, OffDutyWindow, Person, PersonId, QueueClass};
use chrono::NaiveDate;

pub trait DutyStore {
    // Duty ledger
    fn get_duty(&self, date: NaiveDate) -> AppResult<Option<DutyRecord>>;
    /// Insert or replace the record for `record.date`.
    fn put_duty(&self, record: &DutyRecord) -> AppResult<()>;
    /// Stamp `completed_at` unless already set. Returns false when no record exists.
    fn complete_duty(&self, date: NaiveDate, at: &str) -> AppResult<bool>;
    fn list_duties(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DutyRecord>>;
    fn duties_for_person(&self, person: PersonId) -> AppResult<Vec<DutyRecord>>;

    // Queue counters
    fn get_queue(&self, person: PersonId, class: QueueClass) -> AppResult<u32>;
    fn add_queue(&self, person: PersonId, class: QueueClass, days: u32) -> AppResult<()>;
    /// Decrement by one, never below zero. Returns false when nothing changed.
    fn decrement_queue(&self, person: PersonId, class: QueueClass) -> AppResult<bool>;

    // Off-duty windows
    fn get_off_duty(&self, person: PersonId) -> AppResult<Option<OffDutyWindow>>;
    fn set_off_duty(&self, person: PersonId, window: OffDutyWindow) -> AppResult<()>;
    fn clear_off_duty(&self, person: PersonId) -> AppResult<()>;

    // Persons
    fn get_person(&self, id: PersonId) -> AppResult<Option<Person>>;
    fn find_person_by_name(&self, name: &str) -> AppResult<Option<Person>>;
    fn create_person(&self, name: &str, is_admin: bool) -> AppResult<PersonId>;
    fn set_person_flags(&self, id: PersonId, is_admin: bool, is_active: bool) -> AppResult<()>;
    fn list_persons(&self, include_inactive: bool) -> AppResult<Vec<Person>>;
    /// Active persons ordered by id, optionally without admins.
    fn list_eligible(&self, exclude_admins: bool) -> AppResult<Vec<Person>>;

    // Fairness accounting over completed Volunteer and Fair duties
    fn count_non_admin_duties_in_window(
        &self,
        person: PersonId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<u32>;
    fn last_non_admin_duty_in_window(
        &self,
        person: PersonId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Option<NaiveDate>>;

    /// Append an audit row; rolled back together with the surrounding unit.
    fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()>;

    /// Run `f` as one atomic, write-locked unit: committed on `Ok`, rolled back on `Err`.
    fn atomically<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Self) -> AppResult<T>;

    /// Run `f` inside a unit that is always rolled back.
    fn rehearse<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Self) -> AppResult<T>;
}
