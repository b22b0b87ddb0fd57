//! Growth metric algorithms
//!
//! This module contains the numeric core of the evaluation: table
//! interpolation, the Z-score transforms, the normal distribution, the
//! mid-parental target, bone age comparison and the diagnostic rules.
//! Nothing in here performs I/O or logging.

pub mod bone_age;
pub mod diagnostics;
pub mod interpolation;
pub mod parental;
pub mod percentile;
pub mod zscore;
