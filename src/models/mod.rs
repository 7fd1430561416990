pub mod duty;
pub mod person;
pub mod priority;

pub use duty::DutyRecord;
pub use person::{OffDutyWindow, Person, PersonId};
pub use priority::{PriorityClass, QueueClass};
