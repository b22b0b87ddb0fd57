//! Logging helpers
//!
//! Only collaborator code logs: the reference loaders, the repository flow
//! and the binary. The evaluation core returns values and typed errors.

use std::path::Path;
use std::time::Duration;

/// Log the start of a file operation
///
/// # Arguments
/// * `operation` - What is being done (e.g. "Loading reference bundle")
/// * `path` - File or directory involved
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{operation} {}", path.display());
}

/// Log a completed file operation
///
/// # Arguments
/// * `operation` - Past-tense verb (e.g. "loaded")
/// * `path` - File or directory involved
/// * `items` - Number of tables or records handled
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<Duration>,
) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {operation} {items} items from {} in {duration:?}",
            path.display()
        ),
        None => log::info!("Successfully {operation} {items} items from {}", path.display()),
    }
}

/// Log a non-fatal problem, optionally tied to a path
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message}: {}", path.display()),
        None => log::warn!("{message}"),
    }
}

/// Log the outcome of one patient evaluation at debug level
///
/// # Arguments
/// * `patient_id` - Repository identifier
/// * `scores` - Number of parameter scores produced
/// * `diagnoses` - Number of findings emitted
/// * `clamped` - Number of scores whose age fell outside the table
pub fn log_evaluation(patient_id: &str, scores: usize, diagnoses: usize, clamped: usize) {
    log::debug!(
        "Evaluated patient {patient_id}: {scores} scores, {diagnoses} findings, {clamped} clamped"
    );
    if clamped > 0 {
        log::warn!(
            "Patient {patient_id}: {clamped} scores used the nearest table edge (low confidence)"
        );
    }
}
