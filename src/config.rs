//! Configuration management for commit-guard.
//!
//! Looks for `.commit-guard.toml` at the repository root, then
//! `~/.commit-guard/config.toml`, and falls back to built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// Project config file name, relative to the repository root.
pub const PROJECT_CONFIG_FILE: &str = ".commit-guard.toml";

/// Guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Interpreter used to run the collaborator scripts.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    #[serde(default)]
    pub docs: DocsConfig,

    #[serde(default)]
    pub pointers: PointersConfig,
}

/// Scattered documentation hook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Organizer script, relative to the repository root.
    #[serde(default = "default_organizer")]
    pub organizer: PathBuf,

    /// Organize files instead of warning.
    #[serde(default)]
    pub auto_fix: bool,
}

/// Agent pointer validator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointersConfig {
    /// Generator script, relative to the repository root.
    #[serde(default = "default_generator")]
    pub generator: PathBuf,

    /// Directories whose staged contents make the check relevant.
    #[serde(default = "default_watch_dirs")]
    pub watch_dirs: Vec<String>,

    /// Generated pointer files. Staging any of them makes the check relevant.
    #[serde(default = "default_pointer_files")]
    pub pointer_files: Vec<String>,

    /// Additional regular expressions matched against staged paths.
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

fn default_interpreter() -> String {
    "python3".to_string()
}

fn default_organizer() -> PathBuf {
    PathBuf::from("git-hooks/checks/python/organize_docs.py")
}

fn default_generator() -> PathBuf {
    PathBuf::from(".agent/scripts/generate_pointers.py")
}

fn default_watch_dirs() -> Vec<String> {
    vec![".agent/".to_string()]
}

fn default_pointer_files() -> Vec<String> {
    vec![
        "CLAUDE.md".to_string(),
        "AGENTS.md".to_string(),
        ".github/copilot-instructions.md".to_string(),
        ".windsurf/rules.md".to_string(),
    ]
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            organizer: default_organizer(),
            auto_fix: false,
        }
    }
}

impl Default for PointersConfig {
    fn default() -> Self {
        Self {
            generator: default_generator(),
            watch_dirs: default_watch_dirs(),
            pointer_files: default_pointer_files(),
            extra_patterns: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            docs: DocsConfig::default(),
            pointers: PointersConfig::default(),
        }
    }
}

impl Config {
    /// Project config path for a repository.
    pub fn project_path(repo_root: &Path) -> PathBuf {
        repo_root.join(PROJECT_CONFIG_FILE)
    }

    /// Global config path (~/.commit-guard/config.toml).
    pub fn global_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".commit-guard").join("config.toml"))
    }

    /// Load config for a repository, falling back to global then defaults.
    pub fn load(repo_root: &Path) -> Result<Self, Error> {
        let project = Self::project_path(repo_root);
        if project.is_file() {
            return Self::load_from(&project);
        }

        if let Some(global) = Self::global_path().filter(|p| p.is_file()) {
            return Self::load_from(&global);
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load config from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}
