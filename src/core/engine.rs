//! Duty assignment engine.
//!
//! Every public operation runs as one atomic unit on the store: the current
//! record for a date is read, the decision is taken and the result written
//! without another writer getting in between. Nothing is committed on an
//! error path.

use crate::core::fairness::{DEFAULT_WINDOW_DAYS, FairnessCalculator};
use crate::core::off_duty::OffDutyRegistry;
use crate::core::queue::QueueStore;
use crate::core::stats::{PersonStats, person_stats};
use crate::core::store::DutyStore;
use crate::errors::{AppError, AppResult};
use crate::models::{
    DutyRecord, OffDutyWindow, Person, PersonId, PriorityClass, QueueClass,
};
use crate::utils::date::{self, dates_between, days_after};
use chrono::{Local, NaiveDate};
use serde::Serialize;

pub const DEFAULT_RELOCATION_HORIZON_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub fairness_window_days: u32,
    pub relocation_horizon_days: u32,
    pub include_admins_in_fair_draw: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fairness_window_days: DEFAULT_WINDOW_DAYS,
            relocation_horizon_days: DEFAULT_RELOCATION_HORIZON_DAYS,
            include_admins_in_fair_draw: false,
        }
    }
}

/// Result of a volunteer claim: the claimed record plus, when an
/// administrative assignee had to make room, their new record.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimOutcome {
    pub record: DutyRecord,
    pub relocated: Option<DutyRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub assignee: Option<PersonId>,
    pub assignee_name: Option<String>,
    pub class: Option<PriorityClass>,
    /// False when the date already holds a real record.
    pub projected: bool,
}

impl ForecastEntry {
    fn from_record(rec: &DutyRecord, projected: bool) -> Self {
        Self {
            date: rec.date,
            assignee: Some(rec.assignee),
            assignee_name: Some(rec.assignee_name.clone()),
            class: Some(rec.class),
            projected,
        }
    }

    fn unassigned(date: NaiveDate) -> Self {
        Self {
            date,
            assignee: None,
            assignee_name: None,
            class: None,
            projected: true,
        }
    }
}

pub struct Engine<S: DutyStore> {
    store: S,
    settings: EngineSettings,
    today: Option<NaiveDate>,
}

impl<S: DutyStore> Engine<S> {
    pub fn new(store: S, settings: EngineSettings) -> Self {
        Self {
            store,
            settings,
            today: None,
        }
    }

    /// Pin the civil date used as "today" instead of the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(date::today)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn fairness(&self) -> FairnessCalculator {
        FairnessCalculator::new(self.settings.fairness_window_days)
    }

    // -----------------------------------------------------------------------
    // Daily cascade
    // -----------------------------------------------------------------------

    /// Return the record for `date`, drawing one if the date is still empty.
    pub fn ensure_duty(&self, date: NaiveDate) -> AppResult<DutyRecord> {
        self.store.atomically(|store| self.ensure_in(store, date))
    }

    fn ensure_in(&self, store: &S, date: NaiveDate) -> AppResult<DutyRecord> {
        if let Some(existing) = store.get_duty(date)? {
            return Ok(existing);
        }

        let fairness = self.fairness();
        let queues = QueueStore::new(store);

        for class in QueueClass::CASCADE {
            let candidates = queues.draw_candidates(class, date)?;
            if let Some(winner) = fairness.select(store, candidates, date)? {
                let record = DutyRecord::new(date, &winner, class.priority());
                store.put_duty(&record)?;
                let left = queues.decrement(winner.id, class)?;
                store.audit(
                    "ensure",
                    &record.date_str(),
                    &format!(
                        "{} assigned from the {} queue ({} left)",
                        winner.name, class, left
                    ),
                )?;
                return Ok(record);
            }
        }

        let pool = store.list_eligible(!self.settings.include_admins_in_fair_draw)?;
        let available = OffDutyRegistry::new(store).filter_available(pool, date);
        let winner = fairness
            .select(store, available, date)?
            .ok_or(AppError::NoEligibleUser(date))?;

        let record = DutyRecord::new(date, &winner, PriorityClass::Fair);
        store.put_duty(&record)?;
        store.audit(
            "ensure",
            &record.date_str(),
            &format!("{} assigned by fair draw", winner.name),
        )?;
        Ok(record)
    }

    /// Mark the duty of `date` as done. Completing twice keeps the first stamp.
    pub fn complete_duty(&self, date: NaiveDate) -> AppResult<DutyRecord> {
        self.store.atomically(|store| {
            let existing = store
                .get_duty(date)?
                .ok_or_else(|| AppError::NotFound(format!("no duty recorded for {}", date)))?;
            if existing.is_completed() {
                return Ok(existing);
            }

            store.complete_duty(date, &Local::now().to_rfc3339())?;
            let record = store.get_duty(date)?.ok_or_else(|| {
                AppError::Inconsistency(format!("duty for {} vanished while completing", date))
            })?;
            store.audit(
                "complete",
                &record.date_str(),
                &format!("{} completed the duty", record.assignee_name),
            )?;
            Ok(record)
        })
    }

    // -----------------------------------------------------------------------
    // Manual assignment
    // -----------------------------------------------------------------------

    /// Administrative override: replace whatever holds `date`. Queues are untouched.
    pub fn admin_override(&self, date: NaiveDate, person: PersonId) -> AppResult<DutyRecord> {
        self.reject_past(date)?;
        self.store.atomically(|store| {
            let person = require_active(store, person)?;
            self.override_in(store, date, &person)
        })
    }

    fn override_in(&self, store: &S, date: NaiveDate, person: &Person) -> AppResult<DutyRecord> {
        let previous = store.get_duty(date)?;
        let record = DutyRecord::new(date, person, PriorityClass::Administrative);
        write_over(store, previous.as_ref(), &record, false)?;

        let message = match &previous {
            Some(prev) => format!(
                "{} assigned by override, replacing {} ({})",
                person.name, prev.assignee_name, prev.class
            ),
            None => format!("{} assigned by override", person.name),
        };
        store.audit("override", &record.date_str(), &message)?;
        Ok(record)
    }

    /// Volunteer sign-up for one specific date. An administrative holder of
    /// the date is moved to the first free or Fair-held date after it first;
    /// if none exists within the horizon nothing changes.
    ///
    /// A claim by the person already holding the date as Volunteer or
    /// Administrative is a no-op: the existing record comes back unchanged,
    /// with its class, and nothing is relocated.
    pub fn volunteer_claim(&self, date: NaiveDate, person: PersonId) -> AppResult<ClaimOutcome> {
        self.reject_past(date)?;
        self.store.atomically(|store| {
            let claimant = require_active(store, person)?;
            let existing = store.get_duty(date)?;

            let mut relocated = None;
            let mut displaced = false;

            if let Some(rec) = &existing {
                if rec.assignee == claimant.id
                    && rec.class.rank() >= PriorityClass::Volunteer.rank()
                {
                    return Ok(ClaimOutcome {
                        record: rec.clone(),
                        relocated: None,
                    });
                }

                if rec.class == PriorityClass::Administrative {
                    // An inactive holder no longer exists for the engine; nothing to move.
                    if let Some(holder) = store.get_person(rec.assignee)?.filter(|p| p.is_active) {
                        relocated = Some(self.relocate(store, &holder, date)?);
                    }
                    displaced = true;
                }
            }

            let record = DutyRecord::new(date, &claimant, PriorityClass::Volunteer);
            write_over(store, existing.as_ref(), &record, displaced)?;
            store.audit(
                "claim",
                &record.date_str(),
                &format!("{} volunteered for the date", claimant.name),
            )?;

            Ok(ClaimOutcome { record, relocated })
        })
    }

    /// Stricter than a plain override: dates inside the holder's off-duty
    /// window and completed Fair dates are passed over.
    fn relocate(&self, store: &S, holder: &Person, from: NaiveDate) -> AppResult<DutyRecord> {
        let horizon = self.settings.relocation_horizon_days;
        let registry = OffDutyRegistry::new(store);

        for offset in 1..=horizon {
            let candidate = days_after(from, offset)?;
            if registry.is_excluded(holder.id, candidate)? {
                continue;
            }

            let free = match store.get_duty(candidate)? {
                None => true,
                Some(rec) => rec.class == PriorityClass::Fair && !rec.is_completed(),
            };
            if free {
                return self.override_in(store, candidate, holder);
            }
        }

        Err(AppError::RelocationFailed {
            date: from,
            horizon,
        })
    }

    fn reject_past(&self, date: NaiveDate) -> AppResult<()> {
        let today = self.today();
        if date < today {
            return Err(AppError::Validation(format!(
                "{} is in the past (today is {})",
                date, today
            )));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queues and off-duty
    // -----------------------------------------------------------------------

    /// Returns the counter after the addition.
    pub fn add_to_queue(&self, person: PersonId, class: QueueClass, days: u32) -> AppResult<u32> {
        self.store.atomically(|store| {
            let person = require_active(store, person)?;
            let total = QueueStore::new(store).add_days(person.id, class, days)?;
            store.audit(
                "queue",
                &person.name,
                &format!("+{} {} days (now {})", days, class, total),
            )?;
            Ok(total)
        })
    }

    pub fn set_off_duty(
        &self,
        person: PersonId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<OffDutyWindow> {
        OffDutyWindow::new(start, end)?;
        self.store.atomically(|store| {
            let person = require_active(store, person)?;
            let window = OffDutyRegistry::new(store).set_window(person.id, start, end)?;
            store.audit(
                "off_duty",
                &person.name,
                &format!("off duty from {} to {}", window.start, window.end),
            )?;
            Ok(window)
        })
    }

    pub fn clear_off_duty(&self, person: PersonId) -> AppResult<()> {
        self.store.atomically(|store| {
            let person = require_active(store, person)?;
            OffDutyRegistry::new(store).clear_window(person.id)?;
            store.audit("off_duty", &person.name, "off-duty window cleared")
        })
    }

    // -----------------------------------------------------------------------
    // Person registry
    // -----------------------------------------------------------------------

    pub fn register_person(&self, name: &str, is_admin: bool) -> AppResult<Person> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("person name cannot be empty".into()));
        }
        if name.parse::<PersonId>().is_ok() {
            return Err(AppError::Validation(format!(
                "'{}' would be mistaken for a person id",
                name
            )));
        }

        self.store.atomically(|store| {
            if store.find_person_by_name(name)?.is_some() {
                return Err(AppError::Validation(format!("{} is already registered", name)));
            }
            let id = store.create_person(name, is_admin)?;
            store.audit("register", name, if is_admin { "admin" } else { "member" })?;
            require_person(store, id)
        })
    }

    pub fn set_active(&self, person: PersonId, active: bool) -> AppResult<Person> {
        self.store.atomically(|store| {
            let p = require_person(store, person)?;
            store.set_person_flags(p.id, p.is_admin, active)?;
            store.audit(
                if active { "activate" } else { "deactivate" },
                &p.name,
                "active flag changed",
            )?;
            require_person(store, p.id)
        })
    }

    pub fn set_admin(&self, person: PersonId, admin: bool) -> AppResult<Person> {
        self.store.atomically(|store| {
            let p = require_person(store, person)?;
            store.set_person_flags(p.id, admin, p.is_active)?;
            store.audit(
                if admin { "grant_admin" } else { "revoke_admin" },
                &p.name,
                "admin flag changed",
            )?;
            require_person(store, p.id)
        })
    }

    pub fn list_persons(&self, include_inactive: bool) -> AppResult<Vec<Person>> {
        self.store.list_persons(include_inactive)
    }

    /// Look a person up by numeric id or by exact name.
    pub fn resolve_person(&self, reference: &str) -> AppResult<Person> {
        let reference = reference.trim();
        let found = match reference.parse::<PersonId>() {
            Ok(id) => self.store.get_person(id)?,
            Err(_) => self.store.find_person_by_name(reference)?,
        };
        found.ok_or_else(|| AppError::NotFound(format!("person '{}'", reference)))
    }

    // -----------------------------------------------------------------------
    // Reporting
    // -----------------------------------------------------------------------

    pub fn schedule(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DutyRecord>> {
        if end < start {
            return Err(AppError::Validation(format!(
                "range end {} is before start {}",
                end, start
            )));
        }
        self.store.list_duties(start, end)
    }

    /// Project the cascade over `days` dates from `start`, assuming every
    /// projected duty gets completed. Nothing is kept.
    pub fn forecast(&self, start: NaiveDate, days: u32) -> AppResult<Vec<ForecastEntry>> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let end = days_after(start, days - 1)?;

        self.store.rehearse(|store| {
            let mut out = Vec::new();
            for d in dates_between(start, end) {
                if let Some(existing) = store.get_duty(d)? {
                    store.complete_duty(d, &existing.created_at)?;
                    out.push(ForecastEntry::from_record(&existing, false));
                    continue;
                }

                match self.ensure_in(store, d) {
                    Ok(rec) => {
                        store.complete_duty(d, &rec.created_at)?;
                        out.push(ForecastEntry::from_record(&rec, true));
                    }
                    Err(AppError::NoEligibleUser(_)) => out.push(ForecastEntry::unassigned(d)),
                    Err(e) => return Err(e),
                }
            }
            Ok(out)
        })
    }

    pub fn person_stats(&self, person: PersonId) -> AppResult<PersonStats> {
        let person = require_person(&self.store, person)?;
        person_stats(&self.store, person, self.today(), &self.fairness())
    }
}

fn require_person<S: DutyStore>(store: &S, id: PersonId) -> AppResult<Person> {
    store
        .get_person(id)?
        .ok_or_else(|| AppError::NotFound(format!("person #{}", id)))
}

/// Inactive persons are treated as absent.
fn require_active<S: DutyStore>(store: &S, id: PersonId) -> AppResult<Person> {
    store
        .get_person(id)?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFound(format!("active person #{}", id)))
}

/// Write `record` over `previous`, enforcing the class order. `displaced`
/// lifts the order check once an administrative holder has been dealt with.
fn write_over<S: DutyStore>(
    store: &S,
    previous: Option<&DutyRecord>,
    record: &DutyRecord,
    displaced: bool,
) -> AppResult<()> {
    if let Some(prev) = previous {
        if !displaced && !record.class.can_replace(prev.class) {
            return Err(AppError::Inconsistency(format!(
                "{} duty cannot replace the {} duty on {}",
                record.class, prev.class, prev.date
            )));
        }
    }
    store.put_duty(record)
}
