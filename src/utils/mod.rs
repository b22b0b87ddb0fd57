//! Shared utilities

pub mod logging;

pub use logging::{log_evaluation, log_operation_complete, log_operation_start, log_warning};
