//! Reverse Extractor - turns existing project files into a new template.
//!
//! Each selected file is classified against the project roots, copied under
//! the matching marker folder of the new template, analyzed for dependencies
//! and then genericized: its header comment becomes a placeholder header and
//! literal parameter values become `{{key|capitalized}}` /
//! `{{key|decapitalized}}` expressions.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ports::Filesystem,
        services::{
            DefinitionLookup, DependencyAnalyzer, ParameterService, TemplateRegistry,
            generator::{DATE_FORMAT, DEFAULT_TEMPLATE_EXTENSION},
        },
    },
    domain::{
        Context, DESCRIPTOR_FILE, DependencySet, Manifest, ParameterSet, ProcessedFile,
        ProjectPaths, TemplateDescriptor, TemplateName, TemplateStatus, capitalize, decapitalize,
        declared_types,
    },
    error::{Context as _, TemplaterResult},
};

/// Parameters whose values are never turned into placeholders.
const IGNORED_PARAMETERS: &[&str] = &[
    "template",
    "projectPath",
    "sourcesPath",
    "testsPath",
    "locationPath",
    "fileName",
    "date",
    "deriveFromTemplate",
    "author",
    "copyright",
    "mode",
];

/// Values shorter than this are too likely to hit unrelated text.
const MIN_REPLACED_LEN: usize = 2;

const PLACEHOLDER_HEADER: &str = "//\n//  {{fileName}}\n//  {{projectName}}\n//\n//  Created by {{author}} on {{date}}.\n//  {{copyright}}\n//\n";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.*?\}\}|\{%.*?%\}").expect("placeholder pattern must compile"));

/// Input of one prepare run.
#[derive(Debug, Clone)]
pub struct PrepareRequest {
    /// Name of the template being created.
    pub template: TemplateName,
    /// Project files to extract, absolute.
    pub files: Vec<PathBuf>,
    /// Parent template whose descriptor is copied.
    pub derive_from: Option<TemplateName>,
    /// Staging folder receiving the new template tree.
    pub prepare_root: PathBuf,
}

/// Outcome of one prepare run.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareReport {
    pub manifest: Manifest,
    /// Types and modules referenced by the prepared files.
    pub dependencies: DependencySet,
    /// Where referenced types are declared, and those found nowhere.
    pub definitions: DefinitionLookup,
}

pub struct Preparator {
    registry: Arc<TemplateRegistry>,
    fs: Arc<dyn Filesystem>,
    analyzer: DependencyAnalyzer,
    parameters: ParameterService,
    extension: String,
    dependencies: DependencySet,
}

impl Preparator {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        fs: Arc<dyn Filesystem>,
        analyzer: DependencyAnalyzer,
        parameters: ParameterService,
    ) -> Self {
        Self {
            registry,
            fs,
            analyzer,
            parameters,
            extension: DEFAULT_TEMPLATE_EXTENSION.into(),
            dependencies: DependencySet::new(),
        }
    }

    /// Extension (without the dot) appended to prepared files.
    pub fn with_template_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Extract `request.files` into a new template under `request.prepare_root`.
    #[instrument(skip(self, context, request), fields(template = %request.template, files = request.files.len()))]
    pub fn prepare(
        &mut self,
        request: &PrepareRequest,
        context: &mut Context,
    ) -> TemplaterResult<PrepareReport> {
        self.dependencies.clear();

        context.set("template", request.template.as_str())?;
        context.set(
            "projectFiles",
            request
                .files
                .iter()
                .map(|f| f.to_string_lossy().into_owned())
                .collect::<Vec<_>>(),
        )?;
        if let Some(parent) = &request.derive_from {
            context.set("deriveFromTemplate", parent.as_str())?;
        }

        let parameters = self.parameter_set(request.derive_from.as_ref())?;
        self.parameters.resolve_missing(context, &parameters)?;
        if !context.contains("date") {
            context.set("date", chrono::Local::now().format(DATE_FORMAT).to_string())?;
        }

        let paths = ProjectPaths::from_context(context)?;
        paths.write_back(context)?;
        let item_name = self.parameters.get_string(context, &parameters, "name")?;

        self.fs.remove_dir_contents(&request.prepare_root)?;
        let template_root = self.registry.root().join(request.template.as_str());

        let mut manifest = Manifest::new();
        let mut declared = BTreeSet::new();
        for file in &request.files {
            let entry = self.prepare_file(
                file,
                &paths,
                context,
                &item_name,
                &request.prepare_root,
                &template_root,
                &mut declared,
            )?;
            manifest.record(entry);
        }

        manifest.record(self.write_descriptor(request, &template_root)?);

        let referenced: BTreeSet<String> =
            self.dependencies.types.difference(&declared).cloned().collect();
        let definitions = self.analyzer.locate_definitions(&referenced, &paths.sources)?;

        info!(
            files = request.files.len(),
            types = self.dependencies.types.len(),
            frameworks = self.dependencies.frameworks.len(),
            unresolved = definitions.unresolved.len(),
            "template prepared"
        );
        Ok(PrepareReport {
            manifest,
            dependencies: self.dependencies.clone(),
            definitions,
        })
    }

    /// Dependencies accumulated by the last run.
    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn parameter_set(&self, parent: Option<&TemplateName>) -> TemplaterResult<ParameterSet> {
        match parent {
            Some(parent) => self.registry.parameters_for(std::slice::from_ref(parent)),
            None => Ok(ParameterSet::builtin()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn prepare_file(
        &mut self,
        file: &Path,
        paths: &ProjectPaths,
        context: &Context,
        item_name: &str,
        prepare_root: &Path,
        template_root: &Path,
        declared: &mut BTreeSet<String>,
    ) -> TemplaterResult<ProcessedFile> {
        let (marker, relative) = paths.classify(file)?;
        let copied = prepare_root.join(marker.folder_name()).join(&relative);
        self.fs.copy_file(file, &copied)?;

        self.dependencies.union(self.analyzer.analyze(&copied)?);

        let file_name = relative
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let renamed = format!(
            "{}.{}",
            genericize_name(file_name, item_name),
            self.extension
        );
        let relative_renamed = relative.with_file_name(&renamed);
        let staged = prepare_root.join(marker.folder_name()).join(&relative_renamed);

        let bytes = self.fs.read_bytes(&copied)?;
        match String::from_utf8(bytes) {
            Ok(text) => {
                declared.extend(declared_types(&text));
                let generic = genericize_text(&replace_header(&text), context);
                self.fs.write_file(&staged, &generic)?;
                if staged != copied {
                    self.fs.remove_file(&copied)?;
                }
            }
            Err(_) => {
                debug!(file = %file.display(), "binary file kept verbatim");
                if staged != copied {
                    self.fs.rename(&copied, &staged)?;
                }
            }
        }

        debug!(from = %file.display(), %marker, to = %staged.display(), "file prepared");
        Ok(ProcessedFile {
            template_path: template_root.join(marker.folder_name()).join(relative_renamed),
            staged_path: staged,
            project_path: Some(file.to_path_buf()),
        })
    }

    fn write_descriptor(
        &self,
        request: &PrepareRequest,
        template_root: &Path,
    ) -> TemplaterResult<ProcessedFile> {
        let staged = request.prepare_root.join(DESCRIPTOR_FILE);
        if self.fs.exists(&staged) {
            self.fs.remove_file(&staged)?;
        }

        let descriptor = match &request.derive_from {
            Some(parent) => TemplateDescriptor {
                status: TemplateStatus::Draft,
                derived_from: Some(parent.to_string()),
                ..self.registry.get(parent)?.descriptor.clone()
            },
            None => TemplateDescriptor {
                description: format!("Prepared from {} file(s)", request.files.len()),
                ..Default::default()
            },
        };

        let json = descriptor.to_json().context("serializing template descriptor")?;
        self.fs.write_file(&staged, &json)?;
        Ok(ProcessedFile {
            template_path: template_root.join(DESCRIPTOR_FILE),
            staged_path: staged,
            project_path: None,
        })
    }
}

/// Replace a leading `//` comment block with the placeholder header.
fn replace_header(text: &str) -> String {
    let mut header_end = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_start().starts_with("//") {
            header_end += line.len();
        } else {
            break;
        }
    }
    if header_end == 0 {
        return text.to_owned();
    }
    format!("{PLACEHOLDER_HEADER}{}", &text[header_end..])
}

/// Replace literal parameter values with filtered placeholders.
///
/// Longer values go first so a value containing another is replaced whole.
pub fn genericize_text(text: &str, context: &Context) -> String {
    let mut values: Vec<(&str, &str)> = context
        .strings()
        .filter(|(key, value)| {
            !IGNORED_PARAMETERS.contains(key) && value.chars().count() >= MIN_REPLACED_LEN
        })
        .collect();
    values.sort_by(|(ka, va), (kb, vb)| vb.len().cmp(&va.len()).then(ka.cmp(kb)));

    let mut out = text.to_owned();
    for (key, value) in values {
        out = replace_forms(&out, key, value);
    }
    out
}

fn genericize_name(file_name: &str, item_name: &str) -> String {
    if item_name.chars().count() < MIN_REPLACED_LEN {
        return file_name.to_owned();
    }
    replace_forms(file_name, "name", item_name)
}

fn replace_forms(text: &str, key: &str, value: &str) -> String {
    let upper = capitalize(value);
    let lower = decapitalize(value);
    let out = replace_outside_placeholders(text, &upper, &format!("{{{{{key}|capitalized}}}}"));
    if lower == upper {
        return out;
    }
    replace_outside_placeholders(&out, &lower, &format!("{{{{{key}|decapitalized}}}}"))
}

/// `str::replace` that leaves existing `{{ }}` and `{% %}` segments alone.
fn replace_outside_placeholders(text: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in PLACEHOLDER.find_iter(text) {
        out.push_str(&text[last..m.start()].replace(from, to));
        out.push_str(m.as_str());
        last = m.end();
    }
    out.push_str(&text[last..].replace(from, to));
    out
}
