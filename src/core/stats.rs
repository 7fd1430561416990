use crate::core::fairness::FairnessCalculator;
use crate::core::store::DutyStore;
use crate::errors::AppResult;
use crate::models::Person;
use crate::utils::date::current_month_bounds;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PersonStats {
    pub person: Person,
    pub total_duties: usize,
    pub duties_this_month: usize,
    pub next_duty: Option<NaiveDate>,
    /// Completed Volunteer/Fair duties in the fairness window ending today.
    pub fairness_count: u32,
}

pub fn person_stats<S: DutyStore>(
    store: &S,
    person: Person,
    today: NaiveDate,
    fairness: &FairnessCalculator,
) -> AppResult<PersonStats> {
    let duties = store.duties_for_person(person.id)?;
    let (month_start, month_end) = current_month_bounds(today);

    let duties_this_month = duties
        .iter()
        .filter(|d| d.date >= month_start && d.date <= month_end)
        .count();
    let next_duty = duties.iter().map(|d| d.date).find(|d| *d >= today);

    let (start, end) = fairness.window_through(today)?;
    let fairness_count = store.count_non_admin_duties_in_window(person.id, start, end)?;

    Ok(PersonStats {
        total_duties: duties.len(),
        duties_this_month,
        next_duty,
        fairness_count,
        person,
    })
}
