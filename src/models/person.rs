use super::priority::QueueClass;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::Serialize;

pub type PersonId = i64;

/// Inclusive date range during which a person is left out of every draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OffDutyWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl OffDutyWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end < start {
            return Err(AppError::Validation(format!(
                "off-duty end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub admin_queue_days: u32,     // ⇔ persons.admin_queue_days
    pub volunteer_queue_days: u32, // ⇔ persons.volunteer_queue_days
    pub off_duty: Option<OffDutyWindow>,
}

impl Person {
    pub fn queue_days(&self, class: QueueClass) -> u32 {
        match class {
            QueueClass::Administrative => self.admin_queue_days,
            QueueClass::Volunteer => self.volunteer_queue_days,
        }
    }

    pub fn is_off_duty(&self, date: NaiveDate) -> bool {
        self.off_duty.is_some_and(|w| w.contains(date))
    }
}
