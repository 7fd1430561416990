pub mod engine;
pub mod fairness;
pub mod log;
pub mod off_duty;
pub mod queue;
pub mod stats;
pub mod store;
pub mod trigger;

pub use engine::{ClaimOutcome, Engine, EngineSettings, ForecastEntry};
pub use store::DutyStore;
