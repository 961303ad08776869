//! Configuration file support for extconf.
//!
//! Two configuration file locations are read:
//! - Global: `~/.extconf/config.toml` - User-wide defaults
//! - Project: `.extconf/config.toml` next to `Extconf.toml` - Project overrides
//!
//! Project config takes precedence over global config, and the `PKG_CONFIG`
//! and `CYTHON` environment variables take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::context::{BuildEnv, CYTHON_ENV, PKG_CONFIG_ENV};

/// Default metadata query program.
pub const DEFAULT_PKG_CONFIG: &str = "pkg-config";

/// Default translator program.
pub const DEFAULT_CYTHON: &str = "cython";

/// extconf configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External tool locations
    pub tools: ToolsConfig,

    /// Translation directives
    pub translate: TranslateConfig,
}

/// External tool locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolsConfig {
    /// pkg-config program (name or path)
    pub pkg_config: Option<PathBuf>,

    /// Cython program (name or path)
    pub cython: Option<PathBuf>,
}

/// Directives passed to the translator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TranslateConfig {
    /// Python language level of the Cython source
    pub language_level: u8,

    /// Embed call signatures in docstrings
    pub embed_signature: bool,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        TranslateConfig {
            language_level: 3,
            embed_signature: true,
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

    /// Load configuration with fallback to defaults if file doesn't exist.
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
    ///
    /// Translation directives always carry a value, so a file that has a
    /// `[translate]` section replaces them wholesale.
    pub fn merge(&mut self, other: Config, other_has_translate: bool) {
        if other.tools.pkg_config.is_some() {
            self.tools.pkg_config = other.tools.pkg_config;
        }
        if other.tools.cython.is_some() {
            self.tools.cython = other.tools.cython;
        }
        if other_has_translate {
            self.translate = other.translate;
        }
    }

    /// Apply `PKG_CONFIG` / `CYTHON` overrides from the environment.
    pub fn apply_env(&mut self, env: &BuildEnv) {
        if let Some(program) = env.var(PKG_CONFIG_ENV).filter(|v| !v.is_empty()) {
            self.tools.pkg_config = Some(PathBuf::from(program));
        }
        if let Some(program) = env.var(CYTHON_ENV).filter(|v| !v.is_empty()) {
            self.tools.cython = Some(PathBuf::from(program));
        }
    }

    /// The pkg-config program to run.
    pub fn pkg_config_program(&self) -> PathBuf {
        self.tools
            .pkg_config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PKG_CONFIG))
    }

    /// The Cython program to run.
    pub fn cython_program(&self) -> PathBuf {
        self.tools
            .cython
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CYTHON))
    }
}

fn has_translate_section(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.parse::<toml::Table>().ok())
        .is_some_and(|t| t.contains_key("translate"))
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.extconf/config.toml)
/// 2. Global config (~/.extconf/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    for path in global_path.into_iter().chain(std::iter::once(project_path)) {
        if path.exists() {
            let layer = Config::load_or_default(path);
            config.merge(layer, has_translate_section(path));
        }
    }

    config
}

/// Get the global extconf config directory (~/.extconf).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".extconf"))
}
