//! Domain models for growth evaluation
//!
//! This module contains the plain input values supplied per evaluation call:
//! patient context, raw measurements and the shared enum types.

pub mod age;
pub mod measurement;
pub mod patient;
pub mod types;

// Re-export commonly used types
pub use age::{AgeBreakdown, age_between};
pub use measurement::{Measurement, body_mass_index};
pub use patient::PatientContext;
pub use types::{Parameter, Sex, Unit};
