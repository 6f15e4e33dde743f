//! Aggregated outcome of a generation run

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::EntityGenError;

/// Outcome of one run. Per-table failures are collected here rather than
/// aborting the run.
#[derive(Debug, Default)]
pub struct GenerationResult {
    /// Table name -> entity file, for every entity written (or that would
    /// be written in dry-run mode)
    pub entities: BTreeMap<String, PathBuf>,
    /// Table name -> repository file, likewise
    pub repositories: BTreeMap<String, PathBuf>,
    /// Files left untouched because they already existed
    pub skipped: Vec<PathBuf>,
    pub errors: Vec<EntityGenError>,
}

impl GenerationResult {
    /// A run succeeds when no error was recorded. Skipped files are not
    /// errors.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Number of files written or planned.
    pub fn generated_count(&self) -> usize {
        self.entities.len() + self.repositories.len()
    }

    pub(crate) fn failed(error: EntityGenError) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }
}
