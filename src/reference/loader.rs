//! Reference table loading
//!
//! Two formats are supported:
//!
//! * JSON bundles holding any number of keyed tables:
//!
//!   ```json
//!   {"tables": [{"key": {"sex": "male", "parameter": "height",
//!                        "population": "standard", "age_domain": "infant"},
//!                "table": {"name": "who_boys_height", "age_unit": "months",
//!                          "value_unit": "cm", "kind": "lms",
//!                          "rows": [{"age": 0, "l": 1, "m": 49.88, "s": 0.0379}]}}]}
//!   ```
//!
//! * WHO-style delimited text with an age column (`Month`, `Age` or `Week`)
//!   and `L`, `M`, `S` columns, one table per file.
//!
//! Every table is validated while it is parsed, so a malformed file fails at
//! load time and never reaches an evaluation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};
use crate::reference::key::ReferenceTableKey;
use crate::reference::store::{ReferenceTableStore, ReferenceTableStoreBuilder};
use crate::reference::table::{AgeUnit, LmsRow, ReferenceTable};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// One keyed table in a bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEntry {
    /// Key the table is registered under
    pub key: ReferenceTableKey,
    /// The validated table
    pub table: ReferenceTable,
}

/// A set of keyed tables as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceBundle {
    /// Tables in file order
    pub tables: Vec<TableEntry>,
}

impl ReferenceBundle {
    /// Register every table with `builder`
    ///
    /// # Errors
    /// Propagates key conflicts and mode mismatches from the builder
    pub fn register(self, builder: &mut ReferenceTableStoreBuilder) -> Result<usize> {
        let count = self.tables.len();
        for entry in self.tables {
            log::debug!("Registering table '{}' as {}", entry.table.name(), entry.key);
            builder.insert(entry.key, entry.table)?;
        }
        Ok(count)
    }

    /// Bundle holding every table of a store, in stable key order
    #[must_use]
    pub fn from_store(store: &ReferenceTableStore) -> Self {
        let tables = store
            .keys()
            .into_iter()
            .filter_map(|key| {
                store.get(&key).ok().map(|table| TableEntry {
                    key,
                    table: table.clone(),
                })
            })
            .collect();
        Self { tables }
    }
}

/// Parse a JSON bundle from a string
pub fn parse_bundle(json: &str) -> Result<ReferenceBundle> {
    Ok(serde_json::from_str(json)?)
}

/// Load a JSON bundle from disk
pub fn load_bundle(path: &Path) -> Result<ReferenceBundle> {
    let start = Instant::now();
    log_operation_start("Loading reference bundle", path);

    let contents = fs::read_to_string(path)?;
    let bundle = parse_bundle(&contents).map_err(|e| match e {
        GrowthError::Json(json) => {
            GrowthError::invalid_table(path.display().to_string(), json.to_string())
        }
        other => other,
    })?;

    log_operation_complete("loaded", path, bundle.tables.len(), Some(start.elapsed()));
    Ok(bundle)
}

/// Build a store from one JSON bundle file
pub fn load_store(path: &Path) -> Result<ReferenceTableStore> {
    let mut builder = ReferenceTableStore::builder();
    load_bundle(path)?.register(&mut builder)?;
    Ok(builder.build())
}

/// Find JSON bundles in a directory, sorted by file name
pub fn find_bundle_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(GrowthError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory does not exist: {}", dir.display()),
        )));
    }

    let files = fs::read_dir(dir)?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                log_warning(&format!("Skipping unreadable directory entry ({e})"), Some(dir));
                None
            }
        })
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .sorted()
        .collect_vec();

    if files.is_empty() {
        log_warning("No reference bundles found in directory", Some(dir));
    }
    Ok(files)
}

/// Register every bundle found in `dir`
///
/// Files that fail to parse are skipped with a warning; key conflicts
/// between bundles are errors.
pub fn load_bundle_dir(dir: &Path, builder: &mut ReferenceTableStoreBuilder) -> Result<usize> {
    let mut total = 0;
    for path in find_bundle_files(dir)? {
        match load_bundle(&path) {
            Ok(bundle) => total += bundle.register(builder)?,
            Err(e) => log_warning(&format!("Skipping reference bundle ({e})"), Some(&path)),
        }
    }
    log_operation_complete("registered", dir, total, None);
    Ok(total)
}

/// Parse a WHO-style delimited LMS table
///
/// The delimiter (comma, semicolon, tab or whitespace) is taken from the
/// header line. Column names are matched case-insensitively; extra columns
/// such as `SD` or percentile columns are ignored.
///
/// # Arguments
/// * `name` - Table name used in error messages
/// * `text` - File contents
/// * `key` - Key the table will be registered under (fixes the value unit)
pub fn parse_who_lms(name: &str, text: &str, key: &ReferenceTableKey) -> Result<ReferenceTable> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let header = lines
        .next()
        .ok_or_else(|| GrowthError::invalid_table(name, "file is empty"))?;
    let delimiter = Delimiter::detect(header);
    let columns = delimiter.split(header).map(str::to_ascii_lowercase).collect_vec();

    let find = |wanted: &str| columns.iter().position(|column| column == wanted);
    let age_columns = [
        ("month", AgeUnit::Months),
        ("age", AgeUnit::Years),
        ("week", AgeUnit::Weeks),
    ];
    let (age_column, age_unit) = age_columns
        .into_iter()
        .find_map(|(column, unit)| find(column).map(|index| (index, unit)))
        .ok_or_else(|| GrowthError::invalid_table(name, "no Month, Age or Week column"))?;
    let [l, m, s] = ["l", "m", "s"].map(find);
    let (Some(l), Some(m), Some(s)) = (l, m, s) else {
        return Err(GrowthError::invalid_table(name, "missing one of the L, M, S columns"));
    };

    let rows = lines
        .enumerate()
        .map(|(index, line)| {
            let fields = delimiter.split(line).collect_vec();
            let number = |column: usize| -> Result<f64> {
                let field = fields.get(column).ok_or_else(|| {
                    GrowthError::invalid_table(
                        name,
                        format!("row {} has too few columns", index + 1),
                    )
                })?;
                field.parse::<f64>().map_err(|_| {
                    GrowthError::invalid_table(
                        name,
                        format!("row {}: '{field}' is not a number", index + 1),
                    )
                })
            };
            Ok(LmsRow::new(number(age_column)?, number(l)?, number(m)?, number(s)?))
        })
        .collect::<Result<Vec<_>>>()?;

    ReferenceTable::lms(name, age_unit, key.parameter.canonical_unit(), rows)
}

/// Load a WHO-style delimited LMS table from disk
pub fn load_who_lms(path: &Path, key: &ReferenceTableKey) -> Result<ReferenceTable> {
    log_operation_start("Loading LMS table", path);
    let text = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned());
    let table = parse_who_lms(&name, &text, key)?;
    log::debug!("Parsed {} rows for {key} from {}", table.len(), path.display());
    Ok(table)
}

#[derive(Debug, Clone, Copy)]
enum Delimiter {
    Char(char),
    Whitespace,
}

impl Delimiter {
    fn detect(header: &str) -> Self {
        [',', ';', '\t']
            .into_iter()
            .find(|c| header.contains(*c))
            .map_or(Self::Whitespace, Self::Char)
    }

    fn split<'a>(self, line: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self {
            Self::Char(c) => Box::new(line.split(c).map(|field| field.trim().trim_matches('"'))),
            Self::Whitespace => Box::new(line.split_whitespace()),
        }
    }
}
