use crate::change_store::DEFAULT_NAMESPACE;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

const FILENAME: &str = "config.toml";

const DEFAULT_IGNORE_PATTERNS: &[&str] = &[".git", ".gititer", "target", "node_modules"];

pub const DEFAULT_INITIAL_SUGGESTION: &str = "getting started with rigorous git routines";

/// Settings read from `.gititer/config.toml`.
///
/// ```toml
/// namespace = "gititer"
/// debounce_ms = 500
/// ignore_patterns = [".git", ".gititer", "target"]
/// initial_suggestion = "chore: start"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Prefix of every persisted key.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Quiet period before file events are delivered.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Path fragments whose events are never dispatched.
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Pre-filled answer of the initial commit message prompt.
    #[serde(default = "default_initial_suggestion")]
    pub initial_suggestion: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.into()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_ignore_patterns() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect()
}

fn default_initial_suggestion() -> String {
    DEFAULT_INITIAL_SUGGESTION.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            debounce_ms: default_debounce_ms(),
            ignore_patterns: default_ignore_patterns(),
            initial_suggestion: default_initial_suggestion(),
        }
    }
}

impl Config {
    /// Loads `config.toml` from `dir`. A missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(FILENAME);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}
