//! Queue store: per-person counters of owed Administrative/Volunteer days.

use crate::core::off_duty::OffDutyRegistry;
use crate::core::store::DutyStore;
use crate::errors::{AppError, AppResult};
use crate::models::{Person, PersonId, QueueClass};
use chrono::NaiveDate;

pub struct QueueStore<'a, S: DutyStore> {
    store: &'a S,
}

impl<'a, S: DutyStore> QueueStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add `days` (> 0) to the counter; returns the new value.
    pub fn add_days(&self, person: PersonId, class: QueueClass, days: u32) -> AppResult<u32> {
        if days == 0 {
            return Err(AppError::Validation("days must be positive".into()));
        }
        self.store.add_queue(person, class, days)?;
        self.store.get_queue(person, class)
    }

    /// Active persons with a positive counter who are not off duty on `date`.
    pub fn draw_candidates(&self, class: QueueClass, date: NaiveDate) -> AppResult<Vec<Person>> {
        let queued: Vec<Person> = self
            .store
            .list_eligible(false)?
            .into_iter()
            .filter(|p| p.queue_days(class) > 0)
            .collect();

        Ok(OffDutyRegistry::new(self.store).filter_available(queued, date))
    }

    /// Consume one day. A counter that cannot be consumed means the draw
    /// that picked this person is out of step with the store.
    pub fn decrement(&self, person: PersonId, class: QueueClass) -> AppResult<u32> {
        if !self.store.decrement_queue(person, class)? {
            return Err(AppError::Inconsistency(format!(
                "{} queue of person {} was already empty",
                class, person
            )));
        }
        self.store.get_queue(person, class)
    }
}
