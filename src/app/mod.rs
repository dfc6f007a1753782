// ==========================================
// Price Catalog - Application layer
// ==========================================

pub mod runner;

pub use runner::{RunOutput, RunReport, Runner, StepOutcome};
