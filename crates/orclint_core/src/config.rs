//! Linter configuration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use tracing::debug;

use orclint_rule::Severity;

use crate::LinterError;

const SCHEMA_JSON: &str = include_str!("../../../schemas/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Configuration file names, in lookup order.
pub const CONFIG_FILES: &[&str] = &[".orclint.jsonc", ".orclint.json"];

/// File name suffixes that mark test files unless configured otherwise.
pub const DEFAULT_TEST_SUFFIXES: &[&str] =
    &["_test.rs", "_test.go", "_test.py", ".test.ts", ".test.js"];

/// Path segments of build caches whose diagnostics are never actionable.
///
/// Matched against `/`-separated paths. Only whole cache directories are
/// listed, so projects that merely start with `go-build` stay visible.
pub const DEFAULT_NOISE_SEGMENTS: &[&str] = &[
    ".cache/go-build/",
    "/cache/go-build/",
    "target/debug/build/",
    "target/release/build/",
];

/// Extensions loaded from directories unless configured otherwise.
pub const DEFAULT_EXTENSIONS: &[&str] = &["rs", "go", "py", "ts", "js"];

/// Configuration for the linter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Rule configuration (enable/disable/severity/options).
    #[serde(default)]
    pub options: HashMap<String, RuleOption>,

    /// File patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// File extensions picked up when walking directories.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File name suffixes that mark test files.
    #[serde(default = "default_test_suffixes")]
    pub test_suffixes: Vec<String>,

    /// Whether every rule analyzes test files, not only `test-` rules.
    #[serde(default)]
    pub force_all_rules_on_tests: bool,

    /// Rules whose edits `--fix` may apply. `None` means every rule marked
    /// safe by its author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_rules: Option<Vec<String>>,

    /// Path segments whose diagnostics are dropped.
    #[serde(default = "default_noise_segments")]
    pub noise_segments: Vec<String>,

    /// Directory containing the configuration file. Exclude globs are also
    /// matched relative to it.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn default_extensions() -> Vec<String> {
    to_strings(DEFAULT_EXTENSIONS)
}

fn default_test_suffixes() -> Vec<String> {
    to_strings(DEFAULT_TEST_SUFFIXES)
}

fn default_noise_segments() -> Vec<String> {
    to_strings(DEFAULT_NOISE_SEGMENTS)
}

/// Configuration for a single rule (in options map).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RuleOption {
    /// Rule is enabled/disabled (boolean).
    Enabled(bool),
    /// Rule is enabled with severity string ("error", "warning", "info"), or "off".
    Severity(String),
    /// Rule is enabled with specific options object.
    Options(serde_json::Value),
}

impl RuleOption {
    /// Returns whether the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        match self {
            RuleOption::Enabled(enabled) => *enabled,
            RuleOption::Severity(s) => s != "off",
            RuleOption::Options(v) => {
                v.get("enabled").and_then(|e| e.as_bool()).unwrap_or(true)
                    && v.get("severity").and_then(|s| s.as_str()) != Some("off")
            }
        }
    }

    /// Returns the configured severity override, if any.
    pub fn severity(&self) -> Result<Option<Severity>, LinterError> {
        let raw = match self {
            RuleOption::Enabled(_) => None,
            RuleOption::Severity(s) => Some(s.as_str()),
            RuleOption::Options(v) => v.get("severity").and_then(|s| s.as_str()),
        };

        match raw {
            None | Some("off") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(LinterError::config),
        }
    }

    /// Gets the rule options as JSON value.
    pub fn options(&self) -> serde_json::Value {
        match self {
            RuleOption::Enabled(_) => serde_json::Value::Null,
            RuleOption::Severity(_) => serde_json::Value::Null,
            RuleOption::Options(v) => v.clone(),
        }
    }

    /// Returns the rule-level exclude globs.
    pub fn exclude(&self) -> Vec<String> {
        match self {
            RuleOption::Options(v) => v
                .get("exclude")
                .and_then(|e| e.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|i| i.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl LinterConfig {
    /// Creates a configuration with every default.
    pub fn new() -> Self {
        Self {
            options: HashMap::new(),
            exclude: Vec::new(),
            extensions: default_extensions(),
            test_suffixes: default_test_suffixes(),
            force_all_rules_on_tests: false,
            safe_rules: None,
            noise_segments: default_noise_segments(),
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.orclint.jsonc` and `.orclint.json`; comments are allowed
    /// in both.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        config.base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Some(parent.to_path_buf()),
            _ => Some(PathBuf::from(".")),
        };

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses configuration from JSON (with comments) and validates it
    /// against the embedded schema.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: serde_json::Value = serde_json::from_str(SCHEMA_JSON)
                    .map_err(|e| format!("Invalid embedded config schema: {}", e))?;
                Validator::new(&schema_json)
                    .map_err(|e| format!("Invalid config schema compilation: {}", e))
            })
            .as_ref()
            .map_err(|e| LinterError::Internal(e.clone()))?;

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(LinterError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        let config: Self = serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))?;

        for (name, option) in &config.options {
            option
                .severity()
                .map_err(|e| LinterError::config(format!("Rule '{}': {}", name, e)))?;
        }

        Ok(config)
    }

    /// Finds the nearest configuration file, searching `start` and then
    /// each of its parents.
    pub fn discover(start: impl AsRef<Path>) -> Option<PathBuf> {
        start.as_ref().ancestors().find_map(|dir| {
            CONFIG_FILES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Returns the options entry of a rule.
    pub fn rule_option(&self, name: &str) -> Option<&RuleOption> {
        self.options.get(name)
    }

    /// Returns false only for rules explicitly turned off.
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.options.get(name).is_none_or(RuleOption::is_enabled)
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}
