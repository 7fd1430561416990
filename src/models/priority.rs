use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// Where an assignment came from. Declaration order is the override order:
/// a later variant outranks an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    Fair,
    Volunteer,
    Administrative,
}

impl PriorityClass {
    pub fn rank(self) -> u8 {
        match self {
            PriorityClass::Fair => 0,
            PriorityClass::Volunteer => 1,
            PriorityClass::Administrative => 2,
        }
    }

    /// True when a write of class `self` may replace a record of class `existing`.
    pub fn can_replace(self, existing: PriorityClass) -> bool {
        self.rank() >= existing.rank()
    }

    /// Convert enum → DB string
    pub fn to_db_str(self) -> &'static str {
        match self {
            PriorityClass::Fair => "fair",
            PriorityClass::Volunteer => "volunteer",
            PriorityClass::Administrative => "admin",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "fair" => Some(PriorityClass::Fair),
            "volunteer" => Some(PriorityClass::Volunteer),
            "admin" => Some(PriorityClass::Administrative),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriorityClass::Fair => "Fair",
            PriorityClass::Volunteer => "Volunteer",
            PriorityClass::Administrative => "Administrative",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two classes backed by a per-person day counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueClass {
    Administrative,
    Volunteer,
}

impl QueueClass {
    /// Draw order used by the daily cascade.
    pub const CASCADE: [QueueClass; 2] = [QueueClass::Administrative, QueueClass::Volunteer];

    pub fn priority(self) -> PriorityClass {
        match self {
            QueueClass::Administrative => PriorityClass::Administrative,
            QueueClass::Volunteer => PriorityClass::Volunteer,
        }
    }

    /// Column holding the counter in `persons`.
    pub fn column(self) -> &'static str {
        match self {
            QueueClass::Administrative => "admin_queue_days",
            QueueClass::Volunteer => "volunteer_queue_days",
        }
    }

    /// Helper: convert input code from CLI (lowercase or uppercase)
    pub fn from_code(code: &str) -> AppResult<Self> {
        match code.trim().to_lowercase().as_str() {
            "admin" | "administrative" | "a" => Ok(QueueClass::Administrative),
            "volunteer" | "vol" | "v" => Ok(QueueClass::Volunteer),
            other => Err(AppError::InvalidClass(other.to_string())),
        }
    }
}

impl fmt::Display for QueueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.priority().label())
    }
}
