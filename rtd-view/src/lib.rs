//! View models, view state and plain-text rendering for the RTD dashboard.
//!
//! This crate provides:
//! - `table`: row view models and the three record tables
//! - `dashboard`, `report`, `prediction`, `instruments`: per-view models
//! - `state`: the process-wide `ViewState` and its `ViewMode`
//! - `text`: terminal rendering of every view model
//!
//! All view models derive `Serialize` so they can also be emitted as JSON.

pub mod dashboard;
pub mod instruments;
pub mod prediction;
pub mod report;
pub mod state;
pub mod table;
pub mod text;
