//! Integration tests for CLI commands
//!
//! Tests for lint, rules and init.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::fs;

/// Helper to create a command for the orclint CLI
fn orclint_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_orclint"))
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        orclint_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        orclint_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn dry_run_requires_fix() {
        orclint_cmd()
            .args(["lint", ".", "--dry-run"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--fix"));
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn clean_tree_exits_zero() {
        let temp = TempDir::new().unwrap();
        temp.child("src/lib.rs").write_str("fn a() {}\n").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src"])
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 issues"));
    }

    #[test]
    fn remaining_diagnostics_exit_one() {
        let temp = TempDir::new().unwrap();
        temp.child("src/lib.rs").write_str("fn a() {}  \n").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("lib.rs:1:10"))
            .stdout(predicate::str::contains("[trailing-whitespace]"));
    }

    #[test]
    fn json_format_is_parseable() {
        let temp = TempDir::new().unwrap();
        temp.child("src/lib.rs").write_str("// TODO: x\nfn a() {}").unwrap();

        let output = orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src", "--format", "json"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let diagnostics = json["diagnostics"].as_array().unwrap();
        let rules: Vec<&str> = diagnostics
            .iter()
            .map(|d| d["rule_id"].as_str().unwrap())
            .collect();
        assert_eq!(rules, vec!["final-newline", "no-todo"]);
        assert_eq!(diagnostics[0]["position"]["line"], 2);
        assert_eq!(diagnostics[1]["position"]["line"], 1);
        assert_eq!(json["units"], 1);
    }

    #[test]
    fn only_rule_narrows_the_run() {
        let temp = TempDir::new().unwrap();
        temp.child("src/lib.rs").write_str("// TODO: x  \n").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src", "--only-rule", "no-todo"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("[no-todo]"))
            .stdout(predicate::str::contains("trailing-whitespace").not());
    }

    #[test]
    fn unknown_rule_is_an_error() {
        let temp = TempDir::new().unwrap();
        temp.child("src/lib.rs").write_str("fn a() {}\n").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src", "--only-rule", "no-such-rule"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Unknown rule 'no-such-rule'"));
    }

    #[test]
    fn unknown_category_lists_known_ones() {
        let temp = TempDir::new().unwrap();
        temp.child("src/lib.rs").write_str("fn a() {}\n").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src", "--category", "nope"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("maintenance"));
    }

    #[test]
    fn missing_path_is_fatal() {
        let temp = TempDir::new().unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "does-not-exist"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("does-not-exist: no such file or directory"));
    }

    #[test]
    fn unreadable_file_fails_the_run_before_any_rule() {
        let temp = TempDir::new().unwrap();
        temp.child("good/lib.rs").write_str("fn a() {}  \n").unwrap();
        temp.child("bad/lib.rs").write_binary(&[0xff, 0xfe, 0x00]).unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "."])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("1 path(s) could not be loaded"))
            .stderr(predicate::str::contains("lib.rs"))
            .stdout(predicate::str::contains("[trailing-whitespace]").not());
    }

    #[test]
    fn fix_rewrites_and_reports_what_remains() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("src/lib.rs");
        file.write_str("fn a() {}  \n// TODO: x").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src", "--fix"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Fixed 2 issues in 1 files"))
            .stdout(predicate::str::contains("[no-todo]"))
            .stdout(predicate::str::contains("found 1 issues"));

        file.assert("fn a() {}\n// TODO: x\n");
    }

    #[test]
    fn fix_everything_exits_zero() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("src/lib.rs");
        file.write_str("fn a() {}\t").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src", "--fix"])
            .assert()
            .success();

        file.assert("fn a() {}\n");
    }

    #[test]
    fn dry_run_leaves_files_alone() {
        let temp = TempDir::new().unwrap();
        let file = temp.child("src/lib.rs");
        file.write_str("fn a() {}  \n").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src", "--fix", "--dry-run"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Would fix 1 issues"));

        file.assert("fn a() {}  \n");
    }

    #[test]
    fn test_files_need_force_tests() {
        let temp = TempDir::new().unwrap();
        temp.child("src/lib_test.rs").write_str("x  \n").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src"])
            .assert()
            .success();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src", "--force-tests"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("[trailing-whitespace]"));
    }
}

mod config_handling {
    use super::*;

    #[test]
    fn discovered_config_disables_rules() {
        let temp = TempDir::new().unwrap();
        temp.child(".orclint.jsonc")
            .write_str(
                r#"{
  // no whitespace policing here
  "options": { "trailing-whitespace": "off" }
}"#,
            )
            .unwrap();
        temp.child("src/lib.rs").write_str("fn a() {}  \n").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src"])
            .assert()
            .success();
    }

    #[test]
    fn explicit_config_path_wins() {
        let temp = TempDir::new().unwrap();
        temp.child("strict.json")
            .write_str(r#"{ "options": { "max-line-length": { "max": 5 } } }"#)
            .unwrap();
        temp.child("src/lib.rs").write_str("fn a() {}\n").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["--config", "strict.json", "lint", "src"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("(max 5)"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let temp = TempDir::new().unwrap();
        temp.child(".orclint.json")
            .write_str(r#"{ "unknown_key": true }"#)
            .unwrap();
        temp.child("src/lib.rs").write_str("fn a() {}\n").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["lint", "src"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Config validation failed"));
    }
}

mod rules_command {
    use super::*;

    #[test]
    fn lists_builtin_rules() {
        orclint_cmd()
            .arg("rules")
            .assert()
            .success()
            .stdout(predicate::str::contains("trailing-whitespace [style]"))
            .stdout(predicate::str::contains("requires: line-index"));
    }

    #[test]
    fn json_listing_has_every_rule() {
        let output = orclint_cmd()
            .args(["rules", "--format", "json"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let rules: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let rules = rules.as_array().unwrap();
        assert_eq!(rules.len(), 7);
        assert!(
            rules
                .iter()
                .any(|r| r["name"] == "final-newline" && r["safe_fix"] == true)
        );
    }

    #[test]
    fn category_filter() {
        orclint_cmd()
            .args(["rules", "--category", "testing"])
            .assert()
            .success()
            .stdout(predicate::str::contains("test-no-ignored [testing]"))
            .stdout(predicate::str::contains("no-todo").not());
    }
}

mod init_command {
    use super::*;

    #[test]
    fn creates_new_config_file() {
        let temp = TempDir::new().unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .arg("init")
            .assert()
            .success()
            .stderr(predicate::str::contains("Created .orclint.jsonc"));

        let content = fs::read_to_string(temp.path().join(".orclint.jsonc")).unwrap();
        assert!(content.contains("options"));
        assert!(content.contains("max-line-length"));
    }

    #[test]
    fn fails_when_config_exists_without_force() {
        let temp = TempDir::new().unwrap();
        temp.child(".orclint.jsonc").write_str("{}").unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn overwrites_config_with_force() {
        let temp = TempDir::new().unwrap();
        let config = temp.child(".orclint.jsonc");
        config.write_str(r#"{"custom": "data"}"#).unwrap();

        orclint_cmd()
            .current_dir(temp.path())
            .args(["init", "--force"])
            .assert()
            .success();

        config.assert(predicate::str::contains("custom").not());
        config.assert(predicate::str::contains("options"));
    }
}
