//! Fairness calculator.
//!
//! Ranks candidates by the number of completed Volunteer/Fair duties in the
//! trailing window that ends the day before the target date. Administrative
//! duties are not counted. Ties go to whoever served least recently (never
//! served sorts first), then to the lowest person id.

use crate::core::store::DutyStore;
use crate::errors::AppResult;
use crate::models::Person;
use crate::utils::date::{days_after, days_before};
use chrono::NaiveDate;
use serde::Serialize;

pub const DEFAULT_WINDOW_DAYS: u32 = 14;

#[derive(Debug, Clone, Serialize)]
pub struct FairnessScore {
    pub person: Person,
    pub completed: u32,
    pub last_assigned: Option<NaiveDate>,
}

impl FairnessScore {
    /// Ascending sort key; `None < Some(_)` puts never-assigned persons first.
    fn key(&self) -> (u32, Option<NaiveDate>, i64) {
        (self.completed, self.last_assigned, self.person.id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FairnessCalculator {
    window_days: u32,
}

impl Default for FairnessCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}

impl FairnessCalculator {
    pub fn new(window_days: u32) -> Self {
        Self { window_days }
    }

    /// Inclusive `[start, end]` lookback for `date`.
    pub fn window(&self, date: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
        let start = days_before(date, self.window_days)?;
        let end = days_before(date, 1)?;
        Ok((start, end))
    }

    /// Scores for every candidate, best first.
    pub fn scores<S: DutyStore>(
        &self,
        store: &S,
        candidates: Vec<Person>,
        date: NaiveDate,
    ) -> AppResult<Vec<FairnessScore>> {
        let (start, end) = self.window(date)?;

        let mut out = Vec::with_capacity(candidates.len());
        for person in candidates {
            let completed = store.count_non_admin_duties_in_window(person.id, start, end)?;
            let last_assigned = store.last_non_admin_duty_in_window(person.id, start, end)?;
            out.push(FairnessScore {
                person,
                completed,
                last_assigned,
            });
        }

        out.sort_by_key(FairnessScore::key);
        Ok(out)
    }

    /// Pick the fairest candidate, or `None` for an empty set.
    pub fn select<S: DutyStore>(
        &self,
        store: &S,
        candidates: Vec<Person>,
        date: NaiveDate,
    ) -> AppResult<Option<Person>> {
        if candidates.len() <= 1 {
            return Ok(candidates.into_iter().next());
        }
        Ok(self
            .scores(store, candidates, date)?
            .into_iter()
            .next()
            .map(|s| s.person))
    }

    /// Window that contains `date` as its last day, used for reporting.
    pub fn window_through(&self, date: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
        let (start, end) = self.window(days_after(date, 1)?)?;
        Ok((start, end))
    }
}
