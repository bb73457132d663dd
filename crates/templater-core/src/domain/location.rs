//! Special location markers and the project roots they redirect to.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::{Context, DomainError};

/// Reserved folder names that redirect the destination root during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationMarker {
    Project,
    Sources,
    Tests,
    Location,
}

impl LocationMarker {
    pub const ALL: [LocationMarker; 4] = [
        LocationMarker::Project,
        LocationMarker::Sources,
        LocationMarker::Tests,
        LocationMarker::Location,
    ];

    pub fn folder_name(self) -> &'static str {
        match self {
            Self::Project => "_project",
            Self::Sources => "_sources",
            Self::Tests => "_tests",
            Self::Location => "_location",
        }
    }

    pub fn from_folder_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.folder_name() == name)
    }
}

impl fmt::Display for LocationMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// The absolute roots a run writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub project: PathBuf,
    pub sources: PathBuf,
    pub tests: PathBuf,
    pub location: Option<PathBuf>,
}

impl ProjectPaths {
    /// Derive the roots from `projectPath`, `projectName`, `sourcesPath`,
    /// `testsPath` and `locationPath`.
    ///
    /// Sources default to `<project>/<projectName>`, tests to
    /// `<project>/<projectName> Tests`. A relative location is taken from
    /// the project root, which itself is anchored at the working directory
    /// when relative.
    pub fn from_context(ctx: &Context) -> Result<Self, DomainError> {
        let project = anchored(Path::new(ctx.string("projectPath")?.unwrap_or(".")));

        let name = ctx.string("projectName")?;
        let project_name = || {
            name.ok_or_else(|| DomainError::ParameterMissing {
                name: "projectName".into(),
            })
        };

        let sources = match ctx.string("sourcesPath")? {
            Some(p) if !p.is_empty() => rooted(&project, p),
            _ => project.join(project_name()?),
        };
        let tests = match ctx.string("testsPath")? {
            Some(p) if !p.is_empty() => rooted(&project, p),
            _ => project.join(format!("{} Tests", project_name()?)),
        };
        let location = match ctx.string("locationPath")? {
            Some(p) if !p.is_empty() => Some(rooted(&project, p)),
            _ => None,
        };

        Ok(Self {
            project,
            sources,
            tests,
            location,
        })
    }

    /// Record the derived roots so templates and later runs can see them.
    pub fn write_back(&self, ctx: &mut Context) -> Result<(), DomainError> {
        ctx.set("projectPath", display(&self.project))?;
        ctx.set("sourcesPath", display(&self.sources))?;
        ctx.set("testsPath", display(&self.tests))?;
        if let Some(location) = &self.location {
            ctx.set("locationPath", display(location))?;
        }
        Ok(())
    }

    /// Root a marker folder redirects to.
    ///
    /// The custom location must lie inside the project root.
    pub fn root_for(&self, marker: LocationMarker) -> Result<&Path, DomainError> {
        match marker {
            LocationMarker::Project => Ok(&self.project),
            LocationMarker::Sources => Ok(&self.sources),
            LocationMarker::Tests => Ok(&self.tests),
            LocationMarker::Location => {
                let location =
                    self.location
                        .as_deref()
                        .ok_or_else(|| DomainError::ParameterMissing {
                            name: "locationPath".into(),
                        })?;
                if !location.starts_with(&self.project) {
                    return Err(DomainError::PathInconsistency {
                        location: location.to_path_buf(),
                        project: self.project.clone(),
                    });
                }
                Ok(location)
            }
        }
    }

    /// Sub-path of `root` relative to the project root, if it is inside it.
    pub fn relative_to_project<'a>(&self, root: &'a Path) -> Option<&'a Path> {
        root.strip_prefix(&self.project).ok()
    }

    /// Find the marker whose root is the longest prefix of `file`.
    ///
    /// Returns the marker and the file's path relative to that root.
    pub fn classify(&self, file: &Path) -> Result<(LocationMarker, PathBuf), DomainError> {
        let file = anchored(file);
        let candidates = [
            (LocationMarker::Location, self.location.as_deref()),
            (LocationMarker::Sources, Some(self.sources.as_path())),
            (LocationMarker::Tests, Some(self.tests.as_path())),
            (LocationMarker::Project, Some(self.project.as_path())),
        ];

        let mut best: Option<(LocationMarker, &Path)> = None;
        for (marker, root) in candidates {
            let Some(root) = root else { continue };
            if !file.starts_with(root) || file == root {
                continue;
            }
            let longer = best.is_none_or(|(_, b)| root.components().count() > b.components().count());
            if longer {
                best = Some((marker, root));
            }
        }

        match best {
            Some((marker, root)) => {
                let rel = file
                    .strip_prefix(root)
                    .map(Path::to_path_buf)
                    .map_err(|_| DomainError::InvalidProjectFilePath { path: file.clone() })?;
                Ok((marker, rel))
            }
            None => Err(DomainError::InvalidProjectFilePath { path: file }),
        }
    }
}

/// Absolute, lexically normalized form of `path`.
///
/// Only the working directory is consulted; `path` need not exist.
fn anchored(path: &Path) -> PathBuf {
    match std::path::absolute(path) {
        Ok(absolute) => normalize(&absolute),
        Err(_) => normalize(path),
    }
}

fn rooted(project: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&project.join(path))
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Lexically resolve `.` and `..` components without touching the disk.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
