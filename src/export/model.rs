// src/export/model.rs

use crate::models::DutyRecord;
use serde::Serialize;

/// Flat row written by every export format.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DutyExport {
    pub date: String,
    pub person_id: i64,
    pub person: String,
    pub class: String,
    pub created_at: String,
    pub completed_at: String,
}

impl From<&DutyRecord> for DutyExport {
    fn from(rec: &DutyRecord) -> Self {
        Self {
            date: rec.date_str(),
            person_id: rec.assignee,
            person: rec.assignee_name.clone(),
            class: rec.class.to_db_str().to_string(),
            created_at: rec.created_at.clone(),
            completed_at: rec.completed_at.clone().unwrap_or_default(),
        }
    }
}
