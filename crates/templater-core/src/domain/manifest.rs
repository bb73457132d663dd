//! Manifest of files produced by one generation or extraction run.

use std::path::PathBuf;

use serde::Serialize;

/// One produced file: where it came from, where it was staged and where it
/// belongs in the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFile {
    pub template_path: PathBuf,
    pub staged_path: PathBuf,
    pub project_path: Option<PathBuf>,
}

/// Ordered list of [`ProcessedFile`]s. Entries are appended, never edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ProcessedFile>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: ProcessedFile) {
        self.entries.push(entry);
    }

    /// Append every entry of `other`, keeping order.
    pub fn extend(&mut self, other: Manifest) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[ProcessedFile] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessedFile> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ProcessedFile;
    type IntoIter = std::slice::Iter<'a, ProcessedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
