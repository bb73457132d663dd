//! Copy staged output to its final destination.

use tracing::{debug, info, instrument};

use crate::{application::ports::Filesystem, domain::Manifest, error::TemplaterResult};

/// Where [`apply_manifest`] writes each staged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyTarget {
    /// The entry's project path (generation).
    Project,
    /// The entry's template path (preparation).
    Template,
}

/// Copy every staged file to its destination, returning how many were copied.
///
/// Entries without a project path are skipped for [`ApplyTarget::Project`].
#[instrument(skip(fs, manifest), fields(entries = manifest.len()))]
pub fn apply_manifest(
    fs: &dyn Filesystem,
    manifest: &Manifest,
    target: ApplyTarget,
) -> TemplaterResult<usize> {
    let mut copied = 0;
    for entry in manifest {
        let destination = match target {
            ApplyTarget::Project => match &entry.project_path {
                Some(p) => p,
                None => continue,
            },
            ApplyTarget::Template => &entry.template_path,
        };
        fs.copy_file(&entry.staged_path, destination)?;
        debug!(from = %entry.staged_path.display(), to = %destination.display(), "applied");
        copied += 1;
    }
    info!(copied, ?target, "manifest applied");
    Ok(copied)
}
