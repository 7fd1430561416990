//! Off-duty registry: per-person exclusion windows.
//!
//! The registry only filters; it never touches queue counters or the ledger,
//! so counters of an excluded person stay frozen until the window passes.

use crate::core::store::DutyStore;
use crate::errors::AppResult;
use crate::models::{OffDutyWindow, Person, PersonId};
use chrono::NaiveDate;

pub struct OffDutyRegistry<'a, S: DutyStore> {
    store: &'a S,
}

impl<'a, S: DutyStore> OffDutyRegistry<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fails with a validation error when `end < start`.
    pub fn set_window(
        &self,
        person: PersonId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<OffDutyWindow> {
        let window = OffDutyWindow::new(start, end)?;
        self.store.set_off_duty(person, window)?;
        Ok(window)
    }

    pub fn clear_window(&self, person: PersonId) -> AppResult<()> {
        self.store.clear_off_duty(person)
    }

    pub fn is_excluded(&self, person: PersonId, date: NaiveDate) -> AppResult<bool> {
        Ok(self
            .store
            .get_off_duty(person)?
            .is_some_and(|w| w.contains(date)))
    }

    /// Drop everyone whose window covers `date`.
    pub fn filter_available(&self, persons: Vec<Person>, date: NaiveDate) -> Vec<Person> {
        persons.into_iter().filter(|p| !p.is_off_duty(date)).collect()
    }
}
