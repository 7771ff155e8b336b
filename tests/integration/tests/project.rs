//! Integration tests for the full lint and fix pipeline
//!
//! Runs the built-in rules over a small multi-package fixture tree. Every
//! test works on its own copy so fixes never touch the fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use orclint_core::{LintReport, Linter, LinterConfig, RuleSelection};
use orclint_rules::builtin_registry;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;
use walkdir::WalkDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

/// Copies the fixture project into a fresh temporary directory.
fn copy_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = fixtures_dir();

    for entry in WalkDir::new(&root) {
        let entry = entry.unwrap();
        let target = temp.path().join(entry.path().strip_prefix(&root).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }

    temp
}

fn linter_for(root: &Path) -> Linter {
    let config = match LinterConfig::discover(root) {
        Some(path) => LinterConfig::from_file(path).unwrap(),
        None => LinterConfig::new(),
    };
    Linter::new(config, builtin_registry().unwrap()).unwrap()
}

fn lint(linter: &Linter, root: &Path) -> LintReport {
    linter
        .lint_paths(&[root.to_path_buf()], &RuleSelection::default())
        .unwrap()
}

/// (relative path, line, rule) of every diagnostic, in report order.
fn summarize(report: &LintReport, root: &Path) -> Vec<(String, u32, String)> {
    report
        .diagnostics
        .iter()
        .map(|d| {
            let relative = d.position.path.strip_prefix(root).unwrap();
            (
                relative.to_string_lossy().replace('\\', "/"),
                d.position.line,
                d.rule_id().to_string(),
            )
        })
        .collect()
}

fn entry(path: &str, line: u32, rule: &str) -> (String, u32, String) {
    (path.to_string(), line, rule.to_string())
}

#[test]
fn lints_every_package_in_order() {
    let project = copy_project();
    let linter = linter_for(project.path());

    let report = lint(&linter, project.path());

    assert_eq!(report.units, 2);
    assert!(report.failures.is_empty());
    assert_eq!(
        summarize(&report, project.path()),
        vec![
            entry("pkg_a/lib.rs", 2, "trailing-whitespace"),
            entry("pkg_a/lib.rs", 1, "no-todo"),
            entry("pkg_a/lib_test.rs", 2, "test-no-ignored"),
            entry("pkg_b/main.go", 5, "final-newline"),
            entry("pkg_b/main.go", 4, "no-tabs"),
        ]
    );
}

#[test]
fn fixes_safe_edits_and_leaves_the_rest() {
    let project = copy_project();
    let linter = linter_for(project.path());

    let report = lint(&linter, project.path());
    let summary = linter.fix(&report.diagnostics, false);

    assert_eq!(summary.files_modified, 2);
    assert_eq!(summary.edits_applied, 2);
    assert_eq!(summary.edits_skipped, 1);
    assert!(summary.failures.is_empty());

    assert_eq!(
        fs::read_to_string(project.path().join("pkg_b/main.go")).unwrap(),
        "package main\n\nfunc main() {\n\tprintln(\"hi\")\n}\n"
    );
    assert_eq!(
        fs::read_to_string(project.path().join("vendor/dep.rs")).unwrap(),
        "pub fn dep() {}  \n"
    );

    let after = lint(&linter, project.path());
    assert_eq!(
        summarize(&after, project.path()),
        vec![
            entry("pkg_a/lib.rs", 1, "no-todo"),
            entry("pkg_a/lib_test.rs", 2, "test-no-ignored"),
            entry("pkg_b/main.go", 4, "no-tabs"),
        ]
    );
}

#[test]
fn discovered_config_shapes_the_run() {
    let project = copy_project();
    fs::write(
        project.path().join(".orclint.jsonc"),
        r#"{
  "options": {
    "no-todo": "off",
    "no-tabs": { "severity": "error" }
  },
  // generated tests are somebody else's problem
  "exclude": ["**/lib_test.rs"]
}"#,
    )
    .unwrap();
    let linter = linter_for(project.path());

    let report = lint(&linter, project.path());

    assert_eq!(
        summarize(&report, project.path()),
        vec![
            entry("pkg_a/lib.rs", 2, "trailing-whitespace"),
            entry("pkg_b/main.go", 5, "final-newline"),
            entry("pkg_b/main.go", 4, "no-tabs"),
        ]
    );
    assert_eq!(report.diagnostics[2].diagnostic.severity.as_str(), "error");
}

#[rstest]
#[case("target/debug/build/gen-1234/out/generated.rs")]
#[case("home/.cache/go-build/ab/cgo.go")]
fn diagnostics_in_build_output_are_dropped(#[case] relative: &str) {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join(relative);
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, "fn generated() {}  ").unwrap();
    let linter = linter_for(temp.path());

    let report = linter
        .lint_paths(&[file.clone()], &RuleSelection::default())
        .unwrap();

    assert_eq!(report.units, 1);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn analysis_category_reports_nothing() {
    let project = copy_project();
    let linter = linter_for(project.path());
    let selection = RuleSelection {
        category: Some("analysis".to_string()),
        ..Default::default()
    };

    let report = linter
        .lint_paths(&[project.path().to_path_buf()], &selection)
        .unwrap();

    assert_eq!(report.units, 2);
    assert!(report.diagnostics.is_empty());
    assert!(report.failures.is_empty());
}
