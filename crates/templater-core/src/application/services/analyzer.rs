//! Dependency Analyzer - runs the declaration matchers over files and finds
//! where referenced types are defined.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{DependencySet, declared_types},
    error::TemplaterResult,
};

/// Result of [`DependencyAnalyzer::locate_definitions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionLookup {
    pub located: BTreeMap<String, PathBuf>,
    pub unresolved: BTreeSet<String>,
}

pub struct DependencyAnalyzer {
    fs: Arc<dyn Filesystem>,
    extensions: Vec<String>,
}

impl DependencyAnalyzer {
    /// `extensions` selects which source files are searched for definitions.
    pub fn new(fs: Arc<dyn Filesystem>, extensions: Vec<String>) -> Self {
        Self { fs, extensions }
    }

    /// Referenced project types and third-party modules of one file.
    ///
    /// Files that are not valid UTF-8 have no dependencies.
    #[instrument(skip(self), fields(file = %file.display()))]
    pub fn analyze(&self, file: &Path) -> TemplaterResult<DependencySet> {
        let bytes = self.fs.read_bytes(file)?;
        let Ok(text) = std::str::from_utf8(&bytes) else {
            return Ok(DependencySet::new());
        };
        let deps = DependencySet::scan(text);
        debug!(types = deps.types.len(), frameworks = deps.frameworks.len(), "file analyzed");
        Ok(deps)
    }

    /// Map each name to the first source file under `root` declaring it.
    #[instrument(skip(self, names), fields(root = %root.display(), names = names.len()))]
    pub fn locate_definitions(
        &self,
        names: &BTreeSet<String>,
        root: &Path,
    ) -> TemplaterResult<DefinitionLookup> {
        let mut lookup = DefinitionLookup {
            located: BTreeMap::new(),
            unresolved: names.clone(),
        };
        if lookup.unresolved.is_empty() || !self.fs.is_dir(root) {
            return Ok(lookup);
        }

        for file in self.fs.walk_files(root)? {
            if !self.is_source(&file) {
                continue;
            }
            let bytes = self.fs.read_bytes(&file)?;
            let Ok(text) = std::str::from_utf8(&bytes) else {
                continue;
            };

            for declared in declared_types(text) {
                if lookup.unresolved.remove(&declared) {
                    lookup.located.insert(declared, file.clone());
                }
            }
            if lookup.unresolved.is_empty() {
                break;
            }
        }

        debug!(
            located = lookup.located.len(),
            unresolved = lookup.unresolved.len(),
            "definitions located"
        );
        Ok(lookup)
    }

    fn is_source(&self, file: &Path) -> bool {
        file.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|x| x == ext))
    }
}
