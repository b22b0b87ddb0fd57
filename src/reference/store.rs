//! Read-only reference table store
//!
//! Tables are registered through [`ReferenceTableStoreBuilder`], which checks
//! each table against its key, and are never mutated once the store is
//! built. Lookups for unregistered keys fail with a configuration error
//! rather than falling back to another population.

use rustc_hash::FxHashMap;

use crate::error::{GrowthError, Result};
use crate::models::types::{Parameter, Sex};
use crate::reference::key::{AgeDomain, Population, ReferenceTableKey};
use crate::reference::table::ReferenceTable;

/// Immutable mapping from keys to validated tables
#[derive(Debug, Clone, Default)]
pub struct ReferenceTableStore {
    tables: FxHashMap<ReferenceTableKey, ReferenceTable>,
}

impl ReferenceTableStore {
    /// Start building a store
    #[must_use]
    pub fn builder() -> ReferenceTableStoreBuilder {
        ReferenceTableStoreBuilder::default()
    }

    /// Table registered for `key`
    ///
    /// # Errors
    /// Returns [`GrowthError::Configuration`] when nothing is registered for `key`
    pub fn get(&self, key: &ReferenceTableKey) -> Result<&ReferenceTable> {
        self.tables
            .get(key)
            .ok_or(GrowthError::Configuration { key: *key })
    }

    /// Whether a table is registered for `key`
    #[must_use]
    pub fn contains(&self, key: &ReferenceTableKey) -> bool {
        self.tables.contains_key(key)
    }

    /// Registered keys in a stable order
    #[must_use]
    pub fn keys(&self) -> Vec<ReferenceTableKey> {
        let mut keys: Vec<_> = self.tables.keys().copied().collect();
        keys.sort_by_key(|key| {
            (
                key.sex as u8,
                key.parameter as u8,
                key.population as u8,
                key.age_domain as u8,
            )
        });
        keys
    }

    /// Number of registered tables
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the store holds no tables
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Whether both sexes have a table for this combination
    #[must_use]
    pub fn supports(
        &self,
        parameter: Parameter,
        population: Population,
        age_domain: AgeDomain,
    ) -> bool {
        [Sex::Male, Sex::Female].into_iter().all(|sex| {
            self.contains(&ReferenceTableKey::new(sex, parameter, population, age_domain))
        })
    }

    /// Check that every key in `required` is registered
    ///
    /// Callers that claim support for a set of combinations use this at
    /// startup so a gap surfaces before any evaluation runs.
    ///
    /// # Errors
    /// Returns a configuration error naming the first missing key
    pub fn ensure_complete<'a, I>(&self, required: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ReferenceTableKey>,
    {
        match required.into_iter().find(|key| !self.contains(key)) {
            Some(key) => Err(GrowthError::Configuration { key: *key }),
            None => Ok(()),
        }
    }
}

/// Collects tables and validates them against their keys
#[derive(Debug, Default)]
pub struct ReferenceTableStoreBuilder {
    tables: FxHashMap<ReferenceTableKey, ReferenceTable>,
}

impl ReferenceTableStoreBuilder {
    /// Register a table under `key`
    ///
    /// # Errors
    /// Returns [`GrowthError::InvalidTable`] when the table's row kind does not
    /// match the key's transform mode, when a preterm table is registered
    /// outside the infant domain, or when the key is already taken.
    pub fn insert(&mut self, key: ReferenceTableKey, table: ReferenceTable) -> Result<&mut Self> {
        if table.mode() != key.transform_mode() {
            return Err(GrowthError::invalid_table(
                table.name(),
                format!(
                    "{key} requires {:?} rows but the table holds {:?} rows",
                    key.transform_mode(),
                    table.mode()
                ),
            ));
        }
        if key.population == Population::Preterm && key.age_domain != AgeDomain::Infant {
            return Err(GrowthError::invalid_table(
                table.name(),
                format!("preterm tables only cover the infant domain, got {key}"),
            ));
        }
        if let Some(existing) = self.tables.get(&key) {
            return Err(GrowthError::invalid_table(
                table.name(),
                format!("{key} is already registered to '{}'", existing.name()),
            ));
        }

        self.tables.insert(key, table);
        Ok(self)
    }

    /// Register a table, consuming and returning the builder
    ///
    /// # Errors
    /// See [`ReferenceTableStoreBuilder::insert`]
    pub fn with_table(mut self, key: ReferenceTableKey, table: ReferenceTable) -> Result<Self> {
        self.insert(key, table)?;
        Ok(self)
    }

    /// Register every table from another builder's output
    ///
    /// # Errors
    /// See [`ReferenceTableStoreBuilder::insert`]
    pub fn extend<I>(&mut self, tables: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (ReferenceTableKey, ReferenceTable)>,
    {
        for (key, table) in tables {
            self.insert(key, table)?;
        }
        Ok(self)
    }

    /// Number of tables collected so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether nothing has been collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Freeze the collected tables
    #[must_use]
    pub fn build(self) -> ReferenceTableStore {
        log::debug!("Built reference table store with {} tables", self.tables.len());
        ReferenceTableStore {
            tables: self.tables,
        }
    }
}
