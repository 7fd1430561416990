//! SQLite-backed implementation of the engine's persistence contract.

use crate::core::store::DutyStore;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::{DutyRecord, OffDutyWindow, Person, PersonId, QueueClass};
use chrono::NaiveDate;
use rusqlite::Connection;

pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Open (or create) the database file and bring its schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        Self::from_pool(DbPool::new(path)?)
    }

    pub fn in_memory() -> AppResult<Self> {
        Self::from_pool(DbPool::in_memory()?)
    }

    fn from_pool(pool: DbPool) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }
}

impl DutyStore for SqliteStore {
    fn get_duty(&self, date: NaiveDate) -> AppResult<Option<DutyRecord>> {
        Ok(queries::load_duty(self.conn(), date)?)
    }

    fn put_duty(&self, record: &DutyRecord) -> AppResult<()> {
        Ok(queries::upsert_duty(self.conn(), record)?)
    }

    fn complete_duty(&self, date: NaiveDate, at: &str) -> AppResult<bool> {
        Ok(queries::mark_completed(self.conn(), date, at)? > 0)
    }

    fn list_duties(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DutyRecord>> {
        Ok(queries::load_duties_in_range(self.conn(), start, end)?)
    }

    fn duties_for_person(&self, person: PersonId) -> AppResult<Vec<DutyRecord>> {
        Ok(queries::load_duties_for_person(self.conn(), person)?)
    }

    fn get_queue(&self, person: PersonId, class: QueueClass) -> AppResult<u32> {
        Ok(queries::load_queue(self.conn(), person, class)?.unwrap_or(0))
    }

    fn add_queue(&self, person: PersonId, class: QueueClass, days: u32) -> AppResult<()> {
        queries::increment_queue(self.conn(), person, class, days)?;
        Ok(())
    }

    fn decrement_queue(&self, person: PersonId, class: QueueClass) -> AppResult<bool> {
        Ok(queries::decrement_queue(self.conn(), person, class)? > 0)
    }

    fn get_off_duty(&self, person: PersonId) -> AppResult<Option<OffDutyWindow>> {
        Ok(queries::load_person(self.conn(), person)?.and_then(|p| p.off_duty))
    }

    fn set_off_duty(&self, person: PersonId, window: OffDutyWindow) -> AppResult<()> {
        queries::update_off_duty(self.conn(), person, Some(window))?;
        Ok(())
    }

    fn clear_off_duty(&self, person: PersonId) -> AppResult<()> {
        queries::update_off_duty(self.conn(), person, None)?;
        Ok(())
    }

    fn get_person(&self, id: PersonId) -> AppResult<Option<Person>> {
        Ok(queries::load_person(self.conn(), id)?)
    }

    fn find_person_by_name(&self, name: &str) -> AppResult<Option<Person>> {
        Ok(queries::load_person_by_name(self.conn(), name)?)
    }

    fn create_person(&self, name: &str, is_admin: bool) -> AppResult<PersonId> {
        Ok(queries::insert_person(self.conn(), name, is_admin)?)
    }

    fn set_person_flags(&self, id: PersonId, is_admin: bool, is_active: bool) -> AppResult<()> {
        queries::update_person_flags(self.conn(), id, is_admin, is_active)?;
        Ok(())
    }

    fn list_persons(&self, include_inactive: bool) -> AppResult<Vec<Person>> {
        Ok(queries::load_persons(self.conn(), !include_inactive, false)?)
    }

    fn list_eligible(&self, exclude_admins: bool) -> AppResult<Vec<Person>> {
        Ok(queries::load_persons(self.conn(), true, exclude_admins)?)
    }

    fn count_non_admin_duties_in_window(
        &self,
        person: PersonId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<u32> {
        Ok(queries::count_completed_non_admin(self.conn(), person, start, end)?)
    }

    fn last_non_admin_duty_in_window(
        &self,
        person: PersonId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Option<NaiveDate>> {
        Ok(queries::last_completed_non_admin(self.conn(), person, start, end)?)
    }

    fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        ttlog(self.conn(), operation, target, message)
    }

    fn atomically<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Self) -> AppResult<T>,
    {
        let conn = self.conn();

        // Already inside a unit: nest with a savepoint.
        if !conn.is_autocommit() {
            conn.execute_batch("SAVEPOINT nested_unit;")?;
            return match f(self) {
                Ok(v) => {
                    conn.execute_batch("RELEASE nested_unit;")?;
                    Ok(v)
                }
                Err(e) => {
                    conn.execute_batch("ROLLBACK TO nested_unit; RELEASE nested_unit;")?;
                    Err(e)
                }
            };
        }

        // IMMEDIATE takes the write lock up front, serialising writers per database.
        conn.execute_batch("BEGIN IMMEDIATE;")?;
        match f(self) {
            Ok(v) => {
                if let Err(e) = conn.execute_batch("COMMIT;") {
                    rollback_quietly(conn);
                    return Err(e.into());
                }
                Ok(v)
            }
            Err(e) => {
                rollback_quietly(conn);
                Err(e)
            }
        }
    }

    fn rehearse<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Self) -> AppResult<T>,
    {
        let conn = self.conn();
        conn.execute_batch("SAVEPOINT rehearsal;")?;
        let result = f(self);
        conn.execute_batch("ROLLBACK TO rehearsal; RELEASE rehearsal;")?;
        result
    }
}

/// Roll back if SQLite still has a transaction open. A failing ROLLBACK
/// never replaces the error that ended the unit.
fn rollback_quietly(conn: &Connection) {
    if !conn.is_autocommit() {
        let _ = conn.execute_batch("ROLLBACK;");
    }
}
