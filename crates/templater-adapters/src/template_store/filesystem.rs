//! Filesystem-based template discovery.
//!
//! # Directory layout expected
//!
//! ```text
//! Templates/
//! ├── Feature/                  ← category (no descriptor)
//! │   ├── Screen/
//! │   │   ├── template.json     ← template "Feature/Screen"
//! │   │   └── _sources/
//! │   │       └── {{name}}View.swift.tera
//! │   └── Service/
//! │       └── template.json     ← template "Feature/Service"
//! └── App/
//!     └── template.json         ← template "App"
//! ```
//!
//! The first folder along each branch that holds a `template.json` is a
//! template; its sub-folders are template content, never further templates.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use templater_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{DESCRIPTOR_FILE, TemplateDescriptor, TemplateInfo, TemplateName},
    error::TemplaterResult,
};

/// Discovers templates below a root folder.
#[derive(Debug, Clone)]
pub struct FilesystemTemplateStore {
    root: PathBuf,
}

impl FilesystemTemplateStore {
    /// The folder does not need to exist yet; [`TemplateStore::load_all`]
    /// fails if it is missing when called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[instrument(skip(self), fields(dir = %dir.display()))]
    fn load_template(&self, dir: &Path) -> TemplaterResult<TemplateInfo> {
        let descriptor_path = dir.join(DESCRIPTOR_FILE);
        let raw = std::fs::read(&descriptor_path).map_err(|e| ApplicationError::FilesystemError {
            path: descriptor_path.clone(),
            reason: format!("Failed to read descriptor: {e}"),
        })?;
        let descriptor = TemplateDescriptor::parse(&descriptor_path, &raw)?;

        let relative = dir.strip_prefix(&self.root).map_err(|_| ApplicationError::StoreError {
            reason: format!(
                "failed to relativise '{}' against '{}'",
                dir.display(),
                self.root.display()
            ),
        })?;

        Ok(TemplateInfo::new(
            TemplateName::from_relative(relative),
            dir,
            descriptor,
        ))
    }
}

impl TemplateStore for FilesystemTemplateStore {
    fn root(&self) -> PathBuf {
        self.root.clone()
    }

    /// A descriptor that fails to parse aborts discovery.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load_all(&self) -> TemplaterResult<Vec<TemplateInfo>> {
        if !self.root.is_dir() {
            return Err(ApplicationError::NotFound {
                path: self.root.clone(),
            }
            .into());
        }

        let mut templates = Vec::new();
        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e.file_name()));

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| ApplicationError::StoreError {
                reason: format!("directory walk error: {e}"),
            })?;
            if !entry.file_type().is_dir() || !entry.path().join(DESCRIPTOR_FILE).is_file() {
                continue;
            }

            let template = self.load_template(entry.path())?;
            debug!(name = %template.name, status = ?template.descriptor.status, "loaded template");
            templates.push(template);
            walker.skip_current_dir();
        }

        debug!(count = templates.len(), "finished loading templates");
        Ok(templates)
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use templater_core::{
        domain::{DomainError, TemplateStatus},
        error::TemplaterError,
    };

    // ── helpers ───────────────────────────────────────────────────────────

    /// Write template folders (name, descriptor JSON, extra files) under a TempDir.
    fn make_template_dir(templates: &[(&str, &str, &[(&str, &str)])]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, descriptor, files) in templates {
            let dir = temp.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(DESCRIPTOR_FILE), descriptor).unwrap();
            for (rel, content) in *files {
                let full = dir.join(rel);
                fs::create_dir_all(full.parent().unwrap()).unwrap();
                fs::write(full, content).unwrap();
            }
        }
        temp
    }

    const MINIMAL: &str = r#"{ "description": "test" }"#;

    // ── load_all ──────────────────────────────────────────────────────────

    #[test]
    fn missing_root_is_not_found() {
        let store = FilesystemTemplateStore::new("/absolutely/does/not/exist");
        assert!(matches!(
            store.load_all(),
            Err(TemplaterError::Application(ApplicationError::NotFound { .. }))
        ));
    }

    #[test]
    fn nested_names_mirror_folders() {
        let temp = make_template_dir(&[
            ("App", MINIMAL, &[]),
            ("Feature/Screen", MINIMAL, &[]),
            ("Feature/Service", MINIMAL, &[]),
        ]);
        let names: Vec<String> = FilesystemTemplateStore::new(temp.path())
            .load_all()
            .unwrap()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names, vec!["App", "Feature/Screen", "Feature/Service"]);
    }

    #[test]
    fn template_folders_are_leaves() {
        let temp = make_template_dir(&[
            ("Screen", MINIMAL, &[("_sources/Inner/template.json", MINIMAL)]),
        ]);
        let templates = FilesystemTemplateStore::new(temp.path()).load_all().unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].folder, temp.path().join("Screen"));
    }

    #[test]
    fn descriptor_fields_are_parsed() {
        let descriptor = r#"{
            "description": "A screen",
            "status": "passing",
            "dependencies": ["Service", "Mock <=> useMocks"],
            "preferOriginalLocation": ["AppDelegate.swift"],
            "parameters": [
                { "name": "useMocks", "type": "bool", "description": "mocks", "defaultValue": false, "alwaysAsk": false }
            ],
            "validationContext": { "name": "Login", "useMocks": true }
        }"#;
        let temp = make_template_dir(&[("Screen", descriptor, &[])]);
        let template = FilesystemTemplateStore::new(temp.path())
            .load_all()
            .unwrap()
            .remove(0);

        assert_eq!(template.descriptor.status, TemplateStatus::Passing);
        assert_eq!(template.dependencies.len(), 2);
        assert!(template.prefers_original_location("AppDelegate.swift"));
        assert_eq!(template.parameters().len(), 1);
        assert_eq!(
            template.descriptor.validation_context.bool("useMocks").unwrap(),
            Some(true)
        );
    }

    #[test]
    fn invalid_descriptor_fails_fast() {
        let temp = make_template_dir(&[("Good", MINIMAL, &[]), ("Bad", "{ not json", &[])]);
        let err = FilesystemTemplateStore::new(temp.path()).load_all().unwrap_err();
        assert!(matches!(
            err,
            TemplaterError::Domain(DomainError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn hidden_folders_are_ignored() {
        let temp = make_template_dir(&[(".git/Thing", MINIMAL, &[]), ("App", MINIMAL, &[])]);
        let templates = FilesystemTemplateStore::new(temp.path()).load_all().unwrap();
        assert_eq!(templates.len(), 1);
    }
}
