//! Configuration file support for ccsproj.
//!
//! Two configuration file locations are consulted:
//! - Global: `<config dir>/ccsproj/config.toml` - User-wide defaults
//! - Project: `./ccsproj.toml` - Overrides for the current directory
//!
//! A file named explicitly on the command line is merged last and wins
//! over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name of the per-directory configuration.
pub const PROJECT_CONFIG_FILE: &str = "ccsproj.toml";

const DEFAULT_COMPILER: &str = "cl6x";
const DEFAULT_LINKER: &str = "cl6x -z";
const DEFAULT_ARCHIVER: &str = "ar6x";
const DEFAULT_OBJECT_EXTENSION: &str = "obj";
const DEFAULT_REQUIRED_VARIABLES: &[&str] = &["C6X_C_DIR"];
const DEFAULT_NAME_WIDTH: usize = 20;

/// ccsproj configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Makefile exporter settings
    pub makefile: MakefileConfig,
}

/// Settings for the Makefile exporter.
///
/// Every field is optional so that layered files only override what they
/// name. The accessor methods fill in the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MakefileConfig {
    /// Compiler command (`CC`)
    pub compiler: Option<String>,

    /// Linker command (`LD`)
    pub linker: Option<String>,

    /// Archiver command (`AR`)
    pub archiver: Option<String>,

    /// Extension given to object files, without the dot
    pub object_extension: Option<String>,

    /// Environment variables checked by the global `check` rule
    pub required_variables: Option<Vec<String>>,

    /// Column width of variable names in assignments
    pub name_width: Option<usize>,
}

impl MakefileConfig {
    pub fn compiler(&self) -> &str {
        self.compiler.as_deref().unwrap_or(DEFAULT_COMPILER)
    }

    pub fn linker(&self) -> &str {
        self.linker.as_deref().unwrap_or(DEFAULT_LINKER)
    }

    pub fn archiver(&self) -> &str {
        self.archiver.as_deref().unwrap_or(DEFAULT_ARCHIVER)
    }

    pub fn object_extension(&self) -> &str {
        self.object_extension
            .as_deref()
            .unwrap_or(DEFAULT_OBJECT_EXTENSION)
    }

    pub fn required_variables(&self) -> Vec<String> {
        match &self.required_variables {
            Some(vars) => vars.clone(),
            None => DEFAULT_REQUIRED_VARIABLES
                .iter()
                .map(|v| v.to_string())
                .collect(),
        }
    }

    pub fn name_width(&self) -> usize {
        self.name_width.unwrap_or(DEFAULT_NAME_WIDTH)
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: MakefileConfig) {
        if other.compiler.is_some() {
            self.compiler = other.compiler;
        }
        if other.linker.is_some() {
            self.linker = other.linker;
        }
        if other.archiver.is_some() {
            self.archiver = other.archiver;
        }
        if other.object_extension.is_some() {
            self.object_extension = other.object_extension;
        }
        if other.required_variables.is_some() {
            self.required_variables = other.required_variables;
        }
        if other.name_width.is_some() {
            self.name_width = other.name_width;
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        self.makefile.merge(other.makefile);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (./ccsproj.toml)
/// 2. Global config (<config dir>/ccsproj/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config path (`<config dir>/ccsproj/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.config_dir().join("ccsproj").join("config.toml"))
}

/// Get the project config path (`<dir>/ccsproj.toml`).
pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(PROJECT_CONFIG_FILE)
}
