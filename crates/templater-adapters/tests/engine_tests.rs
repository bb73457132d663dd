//! End-to-end tests of generation, preparation and validation against a real
//! template folder on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use templater_adapters::{
    DefaultsResolver, FilesystemTemplateStore, LocalFilesystem, MemoryFilesystem, TeraRenderer,
};
use templater_core::{
    application::{ApplicationError, ValidationOutcome},
    domain::{DomainError, LocationMarker, ProcessedFile, TemplateDescriptor, TemplateStatus},
    error::TemplaterError,
    prelude::*,
};

// ── helpers ───────────────────────────────────────────────────────────────

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let ws = Self {
            temp: TempDir::new().unwrap(),
        };
        fs::create_dir_all(ws.templates()).unwrap();
        fs::create_dir_all(ws.project()).unwrap();
        ws
    }

    fn templates(&self) -> PathBuf {
        self.temp.path().join("Templates")
    }

    fn project(&self) -> PathBuf {
        self.temp.path().join("app")
    }

    fn staging(&self) -> PathBuf {
        self.temp.path().join("Generate")
    }

    /// Write a template folder with a descriptor and text files.
    fn add_template(&self, name: &str, descriptor: &str, files: &[(&str, &str)]) {
        let dir = self.templates().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("template.json"), descriptor).unwrap();
        for (rel, content) in files {
            write(&dir.join(rel), content.as_bytes());
        }
    }

    fn registry(&self) -> Arc<TemplateRegistry> {
        Arc::new(TemplateRegistry::new(Box::new(FilesystemTemplateStore::new(
            self.templates(),
        ))))
    }

    fn generator(&self) -> Generator {
        Generator::new(
            self.registry(),
            Arc::new(LocalFilesystem::new()),
            Arc::new(TeraRenderer::new()),
            ParameterService::new(Arc::new(DefaultsResolver::new())),
        )
    }

    fn preparator(&self) -> Preparator {
        let fs: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
        Preparator::new(
            self.registry(),
            fs.clone(),
            DependencyAnalyzer::new(fs, vec!["swift".into()]),
            ParameterService::new(Arc::new(DefaultsResolver::new())),
        )
    }

    fn context(&self, name: &str) -> Context {
        let mut ctx = Context::new();
        ctx.set("name", name).unwrap();
        ctx.set("projectName", "Acme").unwrap();
        ctx.set("projectPath", self.project().to_string_lossy().into_owned())
            .unwrap();
        ctx
    }

    fn generate(&self, template: &str, ctx: &mut Context) -> Result<Generation, TemplaterError> {
        self.generator()
            .generate(&template.into(), ctx, &GenerateOptions::new(self.staging()))
    }
}

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn staged(generation: &Generation) -> Vec<PathBuf> {
    generation
        .manifest
        .iter()
        .map(|e| e.staged_path.clone())
        .collect()
}

const EMPTY: &str = "{}";

// ── generation ────────────────────────────────────────────────────────────

#[test]
fn renders_file_name_and_content() {
    let ws = Workspace::new();
    ws.add_template("T", EMPTY, &[("{{name}}.txt", "Hello {{name|capitalized}}")]);

    let mut ctx = ws.context("foo");
    let generation = ws.generate("T", &mut ctx).unwrap();

    assert_eq!(generation.manifest.len(), 1);
    let entry = &generation.manifest.entries()[0];
    assert_eq!(entry.staged_path, ws.staging().join("foo.txt"));
    assert_eq!(entry.project_path, Some(ws.project().join("foo.txt")));
    assert_eq!(read(&entry.staged_path), "Hello Foo");
}

#[test]
fn supplied_date_is_kept_and_missing_date_derived() {
    let ws = Workspace::new();
    ws.add_template("T", EMPTY, &[("{{name}}.txt", "{{date}}")]);

    let mut ctx = ws.context("Dated");
    ctx.set("date", "01/02/2003").unwrap();
    let generation = ws.generate("T", &mut ctx).unwrap();
    assert_eq!(read(&generation.manifest.entries()[0].staged_path), "01/02/2003");

    let mut ctx = ws.context("Today");
    let generation = ws.generate("T", &mut ctx).unwrap();
    let derived = read(&generation.manifest.entries()[0].staged_path);
    assert_eq!(derived.len(), "dd/mm/yyyy".len());
    assert_eq!(ctx.string("date").unwrap(), Some(derived.as_str()));
}

#[test]
fn template_extension_is_stripped_and_descriptor_skipped() {
    let ws = Workspace::new();
    ws.add_template(
        "T",
        EMPTY,
        &[
            ("{{name}}View.swift.tera", "struct {{name}}View {}"),
            ("screenshot.png", "x"),
            ("Description.md", "about"),
        ],
    );

    let generation = ws.generate("T", &mut ws.context("Login")).unwrap();
    assert_eq!(staged(&generation), vec![ws.staging().join("LoginView.swift")]);
}

#[test]
fn generation_is_idempotent() {
    let ws = Workspace::new();
    ws.add_template(
        "T",
        EMPTY,
        &[
            ("_sources/{{name}}/{{name}}.swift", "// {{fileName}}\nfinal class {{name}} {}"),
            ("README.md", "{{projectName}}"),
        ],
    );

    let first = ws.generate("T", &mut ws.context("Login")).unwrap();
    let first_contents: Vec<String> = staged(&first).iter().map(|p| read(p)).collect();

    let second = ws.generate("T", &mut ws.context("Login")).unwrap();
    let second_contents: Vec<String> = staged(&second).iter().map(|p| read(p)).collect();

    assert_eq!(staged(&first), staged(&second));
    assert_eq!(first_contents, second_contents);
}

#[test]
fn staging_is_cleared_unless_kept() {
    let ws = Workspace::new();
    ws.add_template("T", EMPTY, &[("{{name}}.txt", "x")]);

    ws.generate("T", &mut ws.context("one")).unwrap();
    ws.generate("T", &mut ws.context("two")).unwrap();
    assert!(!ws.staging().join("one.txt").exists());

    let generator = ws.generator();
    generator
        .generate(
            &"T".into(),
            &mut ws.context("three"),
            &GenerateOptions::new(ws.staging()).keep_staging(),
        )
        .unwrap();
    assert!(ws.staging().join("two.txt").exists());
    assert!(ws.staging().join("three.txt").exists());
}

#[test]
fn marker_folders_redirect_roots() {
    let ws = Workspace::new();
    ws.add_template(
        "Screen",
        EMPTY,
        &[
            ("_project/Podfile", "pod"),
            ("_sources/Screens/{{name}}View.swift", "view"),
            ("_tests/{{name}}Tests.swift", "tests"),
        ],
    );

    let generation = ws.generate("Screen", &mut ws.context("Login")).unwrap();

    let project = ws.project();
    let pairs: Vec<(PathBuf, Option<PathBuf>)> = generation
        .manifest
        .iter()
        .map(|e| (e.staged_path.clone(), e.project_path.clone()))
        .collect();
    assert!(pairs.contains(&(ws.staging().join("Podfile"), Some(project.join("Podfile")))));
    assert!(pairs.contains(&(
        ws.staging().join("Acme/Screens/LoginView.swift"),
        Some(project.join("Acme/Screens/LoginView.swift"))
    )));
    assert!(pairs.contains(&(
        ws.staging().join("Acme Tests/LoginTests.swift"),
        Some(project.join("Acme Tests/LoginTests.swift"))
    )));

    for ProcessedFile {
        staged_path,
        project_path,
        ..
    } in generation.manifest.iter()
    {
        for path in [Some(staged_path), project_path.as_ref()].into_iter().flatten() {
            for marker in LocationMarker::ALL {
                assert!(
                    !path.components().any(|c| c.as_os_str() == marker.folder_name()),
                    "{} contains {marker}",
                    path.display()
                );
            }
        }
    }
}

#[test]
fn custom_location_inside_project() {
    let ws = Workspace::new();
    ws.add_template("Feature", EMPTY, &[("_location/{{name}}Model.swift", "model")]);

    let mut ctx = ws.context("Login");
    ctx.set("locationPath", "Acme/Features/Login").unwrap();
    let generation = ws.generate("Feature", &mut ctx).unwrap();

    let entry = &generation.manifest.entries()[0];
    assert_eq!(
        entry.staged_path,
        ws.staging().join("Acme/Features/Login/LoginModel.swift")
    );
    assert_eq!(
        entry.project_path,
        Some(ws.project().join("Acme/Features/Login/LoginModel.swift"))
    );
}

#[test]
fn relative_location_under_default_project_root() {
    let ws = Workspace::new();
    ws.add_template("Feature", EMPTY, &[("_location/{{name}}.swift", "final class {{name}} {}")]);

    let mut ctx = Context::new();
    ctx.set("name", "Foo").unwrap();
    ctx.set("projectName", "Acme").unwrap();
    ctx.set("locationPath", "Acme/Features").unwrap();
    let generation = ws.generate("Feature", &mut ctx).unwrap();

    let cwd = std::env::current_dir().unwrap();
    let entry = &generation.manifest.entries()[0];
    assert_eq!(entry.staged_path, ws.staging().join("Acme/Features/Foo.swift"));
    assert_eq!(
        entry.project_path,
        Some(cwd.join("Acme/Features/Foo.swift"))
    );
    assert_eq!(read(&entry.staged_path), "final class Foo {}");
}

#[test]
fn custom_location_outside_project_is_inconsistent() {
    let ws = Workspace::new();
    ws.add_template("Feature", EMPTY, &[("_location/Model.swift", "model")]);

    let mut ctx = ws.context("Login");
    ctx.set("locationPath", "/somewhere/else").unwrap();
    let err = ws.generate("Feature", &mut ctx).unwrap_err();
    assert!(matches!(
        err,
        TemplaterError::Domain(DomainError::PathInconsistency { .. })
    ));
}

#[test]
fn conditional_dependency_follows_booleans() {
    let ws = Workspace::new();
    ws.add_template(
        "T",
        r#"{
            "dependencies": ["X <=> a && b"],
            "parameters": [
                { "name": "a", "type": "bool", "description": "a", "defaultValue": false, "alwaysAsk": false },
                { "name": "b", "type": "bool", "description": "b", "defaultValue": false, "alwaysAsk": false }
            ]
        }"#,
        &[("t.txt", "t")],
    );
    ws.add_template("X", EMPTY, &[("x.txt", "x")]);

    let mut ctx = ws.context("n");
    ctx.set("a", true).unwrap();
    ctx.set("b", false).unwrap();
    let without = ws.generate("T", &mut ctx).unwrap();
    assert_eq!(without.templates, vec![TemplateName::new("T")]);
    assert!(!ws.staging().join("x.txt").exists());

    ctx.set("b", true).unwrap();
    let with = ws.generate("T", &mut ctx).unwrap();
    assert_eq!(with.templates, vec![TemplateName::new("T"), TemplateName::new("X")]);
    assert!(ws.staging().join("x.txt").exists());
}

#[test]
fn dependencies_layer_over_primary_output() {
    let ws = Workspace::new();
    ws.add_template(
        "App",
        r#"{ "dependencies": ["Base"] }"#,
        &[("shared.txt", "from app"), ("app.txt", "app")],
    );
    ws.add_template("Base", EMPTY, &[("shared.txt", "from base")]);

    let generation = ws.generate("App", &mut ws.context("n")).unwrap();

    assert_eq!(generation.manifest.len(), 3);
    assert_eq!(read(&ws.staging().join("shared.txt")), "from base");
    assert_eq!(read(&ws.staging().join("app.txt")), "app");
}

#[test]
fn dependency_parameters_are_resolved() {
    let ws = Workspace::new();
    ws.add_template("App", r#"{ "dependencies": ["Net"] }"#, &[]);
    ws.add_template(
        "Net",
        r#"{ "parameters": [
            { "name": "baseUrl", "type": "string", "description": "url", "defaultValue": "https://example.com", "alwaysAsk": false }
        ] }"#,
        &[("Config.txt", "{{baseUrl}}")],
    );

    let mut ctx = ws.context("n");
    ws.generate("App", &mut ctx).unwrap();
    assert_eq!(read(&ws.staging().join("Config.txt")), "https://example.com");
    assert_eq!(ctx.string("baseUrl").unwrap(), Some("https://example.com"));
}

#[test]
fn dependency_cycle_is_an_error() {
    let ws = Workspace::new();
    ws.add_template("A", r#"{ "dependencies": ["B"] }"#, &[]);
    ws.add_template("B", r#"{ "dependencies": ["A"] }"#, &[]);

    let err = ws.generate("A", &mut ws.context("n")).unwrap_err();
    assert!(matches!(
        err,
        TemplaterError::Domain(DomainError::CyclicDependency { .. })
    ));
}

#[test]
fn binary_files_are_copied_verbatim() {
    let ws = Workspace::new();
    ws.add_template("T", EMPTY, &[]);
    let bytes = [0x89u8, 0x50, 0x4e, 0x47, 0xff, 0xfe, 0x00, 0x7b, 0x7b];
    write(&ws.templates().join("T/{{name}}.png"), &bytes);

    ws.generate("T", &mut ws.context("icon")).unwrap();
    assert_eq!(fs::read(ws.staging().join("icon.png")).unwrap(), bytes);
}

#[test]
fn render_error_names_the_template_file() {
    let ws = Workspace::new();
    ws.add_template("T", EMPTY, &[("_sources/Broken.swift", "{{ undefinedThing }}")]);

    let err = ws.generate("T", &mut ws.context("n")).unwrap_err();
    match err {
        TemplaterError::Application(ApplicationError::RenderingFailed { template_path, .. }) => {
            assert_eq!(template_path, PathBuf::from("T/_sources/Broken.swift"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn preferred_files_keep_their_project_location() {
    let ws = Workspace::new();
    write(&ws.project().join("Acme/Support/AppDelegate.swift"), b"old");
    ws.add_template(
        "T",
        r#"{ "preferOriginalLocation": ["AppDelegate.swift", "SceneDelegate.swift"] }"#,
        &[
            ("_sources/AppDelegate.swift", "new"),
            ("_sources/SceneDelegate.swift", "scene"),
        ],
    );

    let generation = ws.generate("T", &mut ws.context("n")).unwrap();
    let project_of = |file: &str| {
        generation
            .manifest
            .iter()
            .find(|e| e.staged_path.ends_with(file))
            .and_then(|e| e.project_path.clone())
            .unwrap()
    };
    assert_eq!(
        project_of("AppDelegate.swift"),
        ws.project().join("Acme/Support/AppDelegate.swift")
    );
    // No existing file: the template layout decides.
    assert_eq!(
        project_of("SceneDelegate.swift"),
        ws.project().join("Acme/SceneDelegate.swift")
    );
}

#[test]
fn loop_lines_do_not_add_blank_lines() {
    let ws = Workspace::new();
    ws.add_template(
        "T",
        r#"{ "parameters": [
            { "name": "cases", "type": "stringArray", "description": "cases", "defaultValue": ["a", "b"], "alwaysAsk": false }
        ] }"#,
        &[("Enum.swift", "enum E {\n{% for c in cases %}\n    case {{ c }}\n{%- endfor %}\n}\n")],
    );

    ws.generate("T", &mut ws.context("n")).unwrap();
    assert_eq!(
        read(&ws.staging().join("Enum.swift")),
        "enum E { \n    case a\n    case b\n}\n"
    );
}

// ── apply ─────────────────────────────────────────────────────────────────

#[test]
fn applying_copies_to_project_paths() {
    let ws = Workspace::new();
    ws.add_template("T", EMPTY, &[("_sources/{{name}}.swift", "final class {{name}} {}")]);

    let generation = ws.generate("T", &mut ws.context("Login")).unwrap();
    let copied =
        apply_manifest(&LocalFilesystem::new(), &generation.manifest, ApplyTarget::Project).unwrap();

    assert_eq!(copied, 1);
    assert_eq!(
        read(&ws.project().join("Acme/Login.swift")),
        "final class Login {}"
    );
}

#[test]
fn applying_skips_entries_without_project_path() {
    let fs = MemoryFilesystem::new()
        .with_file("/s/template.json", "{}")
        .with_file("/s/_sources/A.swift.tera", "a");
    let mut manifest = Manifest::new();
    manifest.record(ProcessedFile {
        template_path: "/t/X/template.json".into(),
        staged_path: "/s/template.json".into(),
        project_path: None,
    });
    manifest.record(ProcessedFile {
        template_path: "/t/X/_sources/A.swift.tera".into(),
        staged_path: "/s/_sources/A.swift.tera".into(),
        project_path: Some("/p/A.swift".into()),
    });

    assert_eq!(apply_manifest(&fs, &manifest, ApplyTarget::Project).unwrap(), 1);
    assert_eq!(apply_manifest(&fs, &manifest, ApplyTarget::Template).unwrap(), 2);
    assert_eq!(fs.read_file(Path::new("/p/A.swift")).as_deref(), Some("a"));
    assert!(fs.exists(Path::new("/t/X/template.json")));
}

// ── preparation ───────────────────────────────────────────────────────────

const VIEW_MODEL: &str = "//
//  LoginViewModel.swift
//  Acme
//
//  Created by Someone on 01/02/2020.
//

import UIKit
import Alamofire

final class LoginViewModel {
    let service: AuthService
    let cache: ImageCache
    var loginTitle = \"Sign in\"
}
";

fn seed_project(ws: &Workspace) -> PathBuf {
    let file = ws.project().join("Acme/Features/LoginViewModel.swift");
    write(&file, VIEW_MODEL.as_bytes());
    write(
        &ws.project().join("Acme/Services/AuthService.swift"),
        b"import Foundation\n\nfinal class AuthService {}\n",
    );
    file
}

fn prepare_request(ws: &Workspace, files: Vec<PathBuf>) -> PrepareRequest {
    PrepareRequest {
        template: "Feature/ViewModel".into(),
        files,
        derive_from: None,
        prepare_root: ws.temp.path().join("Prepare"),
    }
}

#[test]
fn prepare_genericizes_and_reports_dependencies() {
    let ws = Workspace::new();
    let file = seed_project(&ws);
    let request = prepare_request(&ws, vec![file.clone()]);

    let report = ws
        .preparator()
        .prepare(&request, &mut ws.context("Login"))
        .unwrap();

    let staged = request
        .prepare_root
        .join("_sources/Features/{{name|capitalized}}ViewModel.swift.tera");
    let text = read(&staged);
    assert!(text.starts_with("//\n//  {{fileName}}\n//  {{projectName}}\n"));
    assert!(text.contains("final class {{name|capitalized}}ViewModel {"));
    assert!(text.contains("var {{name|decapitalized}}Title = \"Sign in\""));
    assert!(!text.contains("Acme"));

    assert_eq!(report.manifest.len(), 2);
    let entry = &report.manifest.entries()[0];
    assert_eq!(entry.staged_path, staged);
    assert_eq!(entry.project_path, Some(file));
    assert_eq!(
        entry.template_path,
        ws.templates()
            .join("Feature/ViewModel/_sources/Features/{{name|capitalized}}ViewModel.swift.tera")
    );

    assert!(report.dependencies.frameworks.contains("Alamofire"));
    assert!(!report.dependencies.frameworks.contains("UIKit"));
    assert_eq!(
        report.definitions.located.get("AuthService"),
        Some(&ws.project().join("Acme/Services/AuthService.swift"))
    );
    assert!(report.definitions.unresolved.contains("ImageCache"));
    assert!(!report.definitions.located.contains_key("LoginViewModel"));
}

#[test]
fn prepare_then_generate_round_trips() {
    let ws = Workspace::new();
    let file = seed_project(&ws);
    let request = prepare_request(&ws, vec![file]);

    let report = ws
        .preparator()
        .prepare(&request, &mut ws.context("Login"))
        .unwrap();
    apply_manifest(&LocalFilesystem::new(), &report.manifest, ApplyTarget::Template).unwrap();

    let mut ctx = ws.context("Login");
    ctx.set("author", "Someone").unwrap();
    let generation = ws.generate("Feature/ViewModel", &mut ctx).unwrap();

    let generated = read(&ws.staging().join("Acme/Features/LoginViewModel.swift"));
    let body = |text: &str| text.split_once("\n\n").map(|(_, b)| b.to_owned()).unwrap();
    assert_eq!(body(&generated), body(VIEW_MODEL));
    assert!(generated.starts_with("//\n//  LoginViewModel.swift\n//  Acme\n"));
    assert_eq!(
        generation.manifest.entries()[0].project_path,
        Some(ws.project().join("Acme/Features/LoginViewModel.swift"))
    );
}

#[test]
fn prepare_derives_descriptor_from_parent() {
    let ws = Workspace::new();
    let file = seed_project(&ws);
    ws.add_template(
        "Base",
        r#"{
            "description": "base",
            "status": "passing",
            "dependencies": ["Other"],
            "parameters": [
                { "name": "useRx", "type": "bool", "description": "rx", "defaultValue": false, "alwaysAsk": false }
            ]
        }"#,
        &[],
    );
    let mut request = prepare_request(&ws, vec![file]);
    request.derive_from = Some("Base".into());

    let mut ctx = ws.context("Login");
    ws.preparator().prepare(&request, &mut ctx).unwrap();

    let raw = fs::read(request.prepare_root.join("template.json")).unwrap();
    let descriptor = TemplateDescriptor::parse(Path::new("template.json"), &raw).unwrap();
    assert_eq!(descriptor.status, TemplateStatus::Draft);
    assert_eq!(descriptor.derived_from.as_deref(), Some("Base"));
    assert_eq!(descriptor.dependencies, vec!["Other".to_string()]);
    assert_eq!(ctx.bool("useRx").unwrap(), Some(false));
    assert_eq!(ctx.string("deriveFromTemplate").unwrap(), Some("Base"));
}

#[test]
fn prepare_rejects_files_outside_the_project() {
    let ws = Workspace::new();
    let outside = ws.temp.path().join("elsewhere/Thing.swift");
    write(&outside, b"struct Thing {}");

    let err = ws
        .preparator()
        .prepare(&prepare_request(&ws, vec![outside]), &mut ws.context("Thing"))
        .unwrap_err();
    assert!(matches!(
        err,
        TemplaterError::Domain(DomainError::InvalidProjectFilePath { .. })
    ));
}

#[test]
fn prepare_restarts_with_empty_dependency_set() {
    let ws = Workspace::new();
    let file = seed_project(&ws);
    let plain = ws.project().join("Acme/Plain.swift");
    write(&plain, b"struct Plain {}\n");

    let mut preparator = ws.preparator();
    preparator
        .prepare(&prepare_request(&ws, vec![file]), &mut ws.context("Login"))
        .unwrap();
    assert!(!preparator.dependencies().is_empty());

    let report = preparator
        .prepare(&prepare_request(&ws, vec![plain]), &mut ws.context("Plain"))
        .unwrap();
    assert!(report.dependencies.is_empty());
}

// ── validation ────────────────────────────────────────────────────────────

#[test]
fn validation_reports_each_template() {
    let ws = Workspace::new();
    ws.add_template(
        "Good",
        r#"{ "validationContext": { "name": "Login", "projectName": "Acme" } }"#,
        &[("_sources/{{name}}.swift", "final class {{name}} {}")],
    );
    ws.add_template(
        "Bad",
        r#"{ "validationContext": { "name": "Login", "projectName": "Acme" } }"#,
        &[("oops.txt", "{{ notDeclared }}")],
    );

    let generator = ws.generator();
    let root = ws.temp.path().join("Validate");
    let report = Validator::new(&generator, &root)
        .validate(None, &Context::new())
        .unwrap();

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.passed(), 1);
    assert!(!report.is_success());
    assert!(root.join("Login.swift").exists());
}

#[test]
fn validation_tries_every_switch_combination() {
    let ws = Workspace::new();
    ws.add_template(
        "Switches",
        r#"{
            "parameters": [
                { "name": "useMocks", "type": "bool", "description": "mocks", "defaultValue": false },
                { "name": "useRx", "type": "bool", "description": "rx", "defaultValue": false }
            ],
            "validationContext": { "name": "Login", "projectName": "Acme" }
        }"#,
        &[(
            "{{name}}.swift",
            "final class {{name}} {}\n{% if useMocks and not useRx %}{{ missingMock }}{% endif %}",
        )],
    );

    let generator = ws.generator();
    let report = Validator::new(&generator, ws.temp.path().join("Validate"))
        .validate(Some(&"Switches".into()), &Context::new())
        .unwrap();

    assert_eq!(report.results.len(), 4);
    assert_eq!(report.failed(), 1);
    let failed = report
        .results
        .iter()
        .find(|r| matches!(r.outcome, ValidationOutcome::Failed { .. }))
        .unwrap();
    assert_eq!(failed.switches.get("useMocks"), Some(&true));
    assert_eq!(failed.switches.get("useRx"), Some(&false));
    assert_eq!(failed.to_string(), "Switches [useMocks=true, useRx=false]");
}

#[test]
fn pinned_switches_are_not_varied() {
    let ws = Workspace::new();
    ws.add_template(
        "Pinned",
        r#"{
            "parameters": [
                { "name": "useMocks", "type": "bool", "description": "mocks", "defaultValue": false },
                { "name": "useRx", "type": "bool", "description": "rx", "defaultValue": false }
            ],
            "validationContext": { "name": "Login", "projectName": "Acme", "useRx": true }
        }"#,
        &[("{{name}}.swift", "final class {{name}} {}")],
    );

    let generator = ws.generator();
    let report = Validator::new(&generator, ws.temp.path().join("Validate"))
        .validate(Some(&"Pinned".into()), &Context::new())
        .unwrap();

    assert_eq!(report.results.len(), 2);
    assert!(report.is_success());
    assert!(report.results.iter().all(|r| !r.switches.contains_key("useRx")));
}

#[test]
fn validating_unknown_template_fails() {
    let ws = Workspace::new();
    let generator = ws.generator();
    let err = Validator::new(&generator, ws.temp.path().join("Validate"))
        .validate(Some(&"Nope".into()), &Context::new())
        .unwrap_err();
    assert!(matches!(
        err,
        TemplaterError::Domain(DomainError::TemplateNotFound { .. })
    ));
}
