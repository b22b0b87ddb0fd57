//! Reference growth tables
//!
//! Keys, validated tables, the read-only store and the collaborators that
//! fill it (file loaders and the bundled datasets).

pub mod builtin;
pub mod key;
pub mod loader;
pub mod store;
pub mod table;

// Re-export commonly used types
pub use builtin::builtin_store;
pub use key::{AgeDomain, Population, ReferenceTableKey, TransformMode};
pub use loader::{ReferenceBundle, TableEntry};
pub use store::{ReferenceTableStore, ReferenceTableStoreBuilder};
pub use table::{AgeUnit, BandRow, LmsRow, ReferenceTable, TableRows};
