use super::person::{Person, PersonId};
use super::priority::PriorityClass;
use chrono::{Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyRecord {
    pub date: NaiveDate,               // ⇔ duties.duty_date (TEXT "YYYY-MM-DD", UNIQUE)
    pub assignee: PersonId,            // ⇔ duties.person_id
    pub assignee_name: String,         // joined from persons.name
    pub class: PriorityClass,          // ⇔ duties.priority_class
    pub created_at: String,            // ⇔ duties.created_at (ISO8601)
    pub completed_at: Option<String>,  // ⇔ duties.completed_at (ISO8601)
}

impl DutyRecord {
    /// Fresh, not yet completed assignment stamped with the current time.
    pub fn new(date: NaiveDate, person: &Person, class: PriorityClass) -> Self {
        Self {
            date,
            assignee: person.id,
            assignee_name: person.name.clone(),
            class,
            created_at: Local::now().to_rfc3339(),
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
