//! Rendering Engine - maps a template tree onto the staging and project trees.
//!
//! Three roots are walked in lock-step: the template folder, the staging
//! folder that receives rendered output, and the project folder the output
//! is ultimately meant for. Special marker folders (`_project`, `_sources`,
//! `_tests`, `_location`) redirect the project root and the matching staging
//! sub-folder instead of nesting a level.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TextRenderer},
        services::{ParameterService, TemplateRegistry},
    },
    domain::{
        Context, DESCRIPTOR_FILE, LocationMarker, Manifest, ParameterSet, ProcessedFile,
        ProjectPaths, TemplateInfo, TemplateName,
    },
    error::TemplaterResult,
};

/// Extension stripped from template files by default.
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "tera";

/// Date format of the derived `date` parameter.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

static FOR_LOOP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\n([ \t]*\{%-?\s*for\s[^\n]*%\})$").expect("for-loop pattern must compile")
});

/// Outcome of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Templates rendered, primary first.
    pub templates: Vec<TemplateName>,
    pub manifest: Manifest,
    pub paths: ProjectPaths,
}

/// Options for [`Generator::generate`].
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub staging_root: PathBuf,
    /// Empty the staging root first. Off when layering onto earlier output.
    pub clear_staging: bool,
}

impl GenerateOptions {
    pub fn new(staging_root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
            clear_staging: true,
        }
    }

    pub fn keep_staging(mut self) -> Self {
        self.clear_staging = false;
        self
    }
}

/// Renders templates into a staging area and builds the manifest.
pub struct Generator {
    registry: Arc<TemplateRegistry>,
    fs: Arc<dyn Filesystem>,
    renderer: Arc<dyn TextRenderer>,
    parameters: ParameterService,
    extension: String,
}

/// Per-run state shared by the recursive walk.
struct Walk<'a> {
    template: &'a TemplateInfo,
    paths: &'a ProjectPaths,
    staging_root: &'a Path,
    context: &'a Context,
    manifest: &'a mut Manifest,
}

impl Generator {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        fs: Arc<dyn Filesystem>,
        renderer: Arc<dyn TextRenderer>,
        parameters: ParameterService,
    ) -> Self {
        Self {
            registry,
            fs,
            renderer,
            parameters,
            extension: DEFAULT_TEMPLATE_EXTENSION.into(),
        }
    }

    /// Extension (without the dot) stripped from template file names.
    pub fn with_template_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Generate `template` and its selected dependencies.
    ///
    /// The primary template is rendered first, then every dependency in
    /// resolution order on top of the same staging tree. Any failure aborts
    /// the whole run.
    #[instrument(skip(self, context, options), fields(template = %template, staging = %options.staging_root.display()))]
    pub fn generate(
        &self,
        template: &TemplateName,
        context: &mut Context,
        options: &GenerateOptions,
    ) -> TemplaterResult<Generation> {
        context.set("template", template.as_str())?;
        let (order, _) = self.prepare_context(template, context)?;

        if !context.contains("date") {
            context.set("date", chrono::Local::now().format(DATE_FORMAT).to_string())?;
        }
        let paths = ProjectPaths::from_context(context)?;
        paths.write_back(context)?;

        if options.clear_staging {
            self.fs.remove_dir_contents(&options.staging_root)?;
        } else {
            self.fs.create_dir_all(&options.staging_root)?;
        }

        let mut manifest = Manifest::new();
        for name in &order {
            let info = self.registry.get(name)?;
            info!(template = %name, "rendering template");
            let mut walk = Walk {
                template: info,
                paths: &paths,
                staging_root: &options.staging_root,
                context: &*context,
                manifest: &mut manifest,
            };
            self.walk_dir(&mut walk, &info.folder, &options.staging_root, &paths.project)?;
        }

        info!(files = manifest.len(), templates = order.len(), "generation complete");
        Ok(Generation {
            templates: order,
            manifest,
            paths,
        })
    }

    /// Resolve dependencies and parameters until the dependency list is stable.
    ///
    /// Filling parameters can flip conditions, which can pull in templates
    /// declaring further parameters.
    pub fn prepare_context(
        &self,
        template: &TemplateName,
        context: &mut Context,
    ) -> TemplaterResult<(Vec<TemplateName>, ParameterSet)> {
        let limit = self.registry.discover()?.len() + 1;
        let mut order = self.registry.resolve_with_dependencies(template, context)?;

        for _ in 0..limit {
            let parameters = self.registry.parameters_for(&order)?;
            self.parameters.resolve_missing(context, &parameters)?;

            let next = self.registry.resolve_with_dependencies(template, context)?;
            if next == order {
                return Ok((order, parameters));
            }
            debug!(before = order.len(), after = next.len(), "dependency list changed, re-resolving");
            order = next;
        }

        let parameters = self.registry.parameters_for(&order)?;
        Ok((order, parameters))
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn walk_dir(
        &self,
        walk: &mut Walk<'_>,
        template_dir: &Path,
        staging_dir: &Path,
        project_dir: &Path,
    ) -> TemplaterResult<()> {
        let listing = self.fs.list_dir(template_dir)?;

        for file in &listing.files {
            let Some(file_name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if is_skipped(file_name) {
                continue;
            }
            self.render_file(walk, file, file_name, staging_dir, project_dir)?;
        }

        for dir in &listing.dirs {
            let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match LocationMarker::from_folder_name(dir_name) {
                Some(marker) => {
                    let project_root = walk.paths.root_for(marker)?.to_path_buf();
                    let staging = staged_root_for(walk.paths, walk.staging_root, &project_root);
                    debug!(%marker, project = %project_root.display(), "redirecting marker folder");
                    self.walk_dir(walk, dir, &staging, &project_root)?;
                }
                None => {
                    let rendered = self.render_name(dir_name, walk.context, dir)?;
                    self.walk_dir(
                        walk,
                        dir,
                        &staging_dir.join(&rendered),
                        &project_dir.join(&rendered),
                    )?;
                }
            }
        }

        Ok(())
    }

    fn render_file(
        &self,
        walk: &mut Walk<'_>,
        file: &Path,
        file_name: &str,
        staging_dir: &Path,
        project_dir: &Path,
    ) -> TemplaterResult<()> {
        let stem = strip_template_extension(file_name, &self.extension);
        let output_name = self.render_name(stem, walk.context, file)?;
        let staged = staging_dir.join(&output_name);
        let project = self.project_path_for(walk, &output_name, project_dir)?;

        match String::from_utf8(self.fs.read_bytes(file)?) {
            Ok(text) => {
                let mut file_context = walk.context.snapshot();
                file_context.set("fileName", output_name.as_str())?;
                let rendered = self
                    .renderer
                    .render(&normalize_loop_markers(&text), &file_context)
                    .map_err(|e| render_failure(walk.template, file, e.to_string()))?;
                self.fs.write_file(&staged, &rendered)?;
            }
            Err(binary) => {
                debug!(file = %file.display(), "binary file copied verbatim");
                self.fs.write_bytes(&staged, binary.as_bytes())?;
            }
        }

        debug!(from = %file.display(), to = %staged.display(), "file rendered");
        walk.manifest.record(ProcessedFile {
            template_path: file.to_path_buf(),
            staged_path: staged,
            project_path: Some(project),
        });
        Ok(())
    }

    fn render_name(&self, name: &str, context: &Context, source: &Path) -> TemplaterResult<String> {
        self.renderer.render(name, context).map_err(|e| {
            ApplicationError::RenderingFailed {
                template_path: source.to_path_buf(),
                reason: format!("in name: {e}"),
            }
            .into()
        })
    }

    /// Project path of an output file; original-location files are looked up
    /// under the sources root, falling back to the structural path.
    fn project_path_for(
        &self,
        walk: &Walk<'_>,
        output_name: &str,
        project_dir: &Path,
    ) -> TemplaterResult<PathBuf> {
        let implied = project_dir.join(output_name);
        if !walk.template.prefers_original_location(output_name) {
            return Ok(implied);
        }

        let sources = &walk.paths.sources;
        if self.fs.is_dir(sources) {
            let found = self
                .fs
                .walk_files(sources)?
                .into_iter()
                .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(output_name));
            if let Some(found) = found {
                debug!(file = output_name, at = %found.display(), "using original location");
                return Ok(found);
            }
        }

        warn!(
            file = output_name,
            fallback = %implied.display(),
            "no existing file for preferOriginalLocation entry, using template location"
        );
        Ok(implied)
    }
}

/// Descriptor and preview files are not part of the output.
fn is_skipped(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    file_name == DESCRIPTOR_FILE
        || file_name == ".DS_Store"
        || lower.starts_with("screenshot")
        || lower.starts_with("description")
}

fn strip_template_extension<'a>(file_name: &'a str, extension: &str) -> &'a str {
    file_name
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(file_name)
}

/// Staging folder mirroring a marker's project root.
fn staged_root_for(paths: &ProjectPaths, staging_root: &Path, project_root: &Path) -> PathBuf {
    match paths.relative_to_project(project_root) {
        Some(rel) => staging_root.join(rel),
        None => match project_root.file_name() {
            Some(name) => staging_root.join(name),
            None => staging_root.to_path_buf(),
        },
    }
}

/// Pull a line holding only a `{% for %}` tag onto the previous line so each
/// iteration does not emit an extra blank line.
pub fn normalize_loop_markers(text: &str) -> String {
    FOR_LOOP_LINE.replace_all(text, " ${1}").into_owned()
}

fn render_failure(template: &TemplateInfo, file: &Path, reason: String) -> crate::error::TemplaterError {
    let relative = file.strip_prefix(&template.folder).unwrap_or(file);
    ApplicationError::RenderingFailed {
        template_path: Path::new(template.name.as_str()).join(relative),
        reason,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_line_joins_previous_line() {
        let text = "items:\n{% for i in items %}\n- {{ i }}\n{% endfor %}\n";
        assert_eq!(
            normalize_loop_markers(text),
            "items: {% for i in items %}\n- {{ i }}\n{% endfor %}\n"
        );
    }

    #[test]
    fn inline_loops_are_left_alone() {
        let text = "a {% for i in xs %}{{ i }}{% endfor %}\nb";
        assert_eq!(normalize_loop_markers(text), text);
    }

    #[test]
    fn indented_loop_line_keeps_indent() {
        let text = "start\n    {% for i in xs %}\nx\n";
        assert_eq!(normalize_loop_markers(text), "start     {% for i in xs %}\nx\n");
    }

    #[test]
    fn skips_descriptor_and_previews() {
        assert!(is_skipped("template.json"));
        assert!(is_skipped("Screenshot 1.png"));
        assert!(is_skipped("description.md"));
        assert!(!is_skipped("{{name}}.swift.tera"));
    }

    #[test]
    fn template_extension_is_stripped_once() {
        assert_eq!(strip_template_extension("{{name}}.swift.tera", "tera"), "{{name}}.swift");
        assert_eq!(strip_template_extension("README.md", "tera"), "README.md");
        assert_eq!(strip_template_extension(".tera", "tera"), ".tera");
        assert_eq!(strip_template_extension("xtera", "tera"), "xtera");
    }

    #[test]
    fn marker_staging_mirrors_project_layout() {
        let paths = ProjectPaths {
            project: "/p".into(),
            sources: "/p/Acme".into(),
            tests: "/p/Acme Tests".into(),
            location: Some("/p/Acme/Features".into()),
        };
        let staging = Path::new("/s");
        assert_eq!(staged_root_for(&paths, staging, Path::new("/p")), PathBuf::from("/s"));
        assert_eq!(
            staged_root_for(&paths, staging, Path::new("/p/Acme/Features")),
            PathBuf::from("/s/Acme/Features")
        );
        assert_eq!(
            staged_root_for(&paths, staging, Path::new("/elsewhere/Lib")),
            PathBuf::from("/s/Lib")
        );
    }
}
