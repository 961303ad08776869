//! Process-wide state, captured once and passed around explicitly.
//!
//! [`BuildEnv`] is a snapshot of the environment and argument list, so the
//! resolvers never read ambient process state. [`GlobalContext`] holds the
//! paths the CLI works with.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::find_manifest;

/// Environment variable overriding the pkg-config program.
pub const PKG_CONFIG_ENV: &str = "PKG_CONFIG";

/// Environment variable overriding the Cython program.
pub const CYTHON_ENV: &str = "CYTHON";

/// Snapshot of environment variables and command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct BuildEnv {
    vars: HashMap<String, String>,
    args: Vec<String>,
}

impl BuildEnv {
    /// Build a snapshot from explicit values.
    pub fn new<V, K, S, A, T>(vars: V, args: A) -> Self
    where
        V: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<String>,
        A: IntoIterator<Item = T>,
        T: Into<String>,
    {
        BuildEnv {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Capture the current process environment and arguments.
    pub fn capture() -> Self {
        let vars = std::env::vars_os().map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        });
        let args = std::env::args_os().map(|a| a.to_string_lossy().into_owned());
        Self::new(vars, args)
    }

    /// Whether a variable is set, whatever its value.
    pub fn has_var(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Value of a variable, if set.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Argument list, program name first.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Paths and output settings for one CLI invocation.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    cwd: PathBuf,
    home: Option<PathBuf>,
    verbose: bool,
    color: bool,
}

impl GlobalContext {
    /// Create a context rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a context with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            home: crate::util::config::global_config_dir(),
            verbose: false,
            color: true,
        }
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Global configuration file (`~/.extconf/config.toml`), if a home exists.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join("config.toml"))
    }

    /// Project configuration file next to the given manifest.
    pub fn project_config_path(&self, manifest_path: &Path) -> PathBuf {
        project_config_in(manifest_path.parent().unwrap_or(&self.cwd))
    }

    /// Project configuration file in the working directory, for commands
    /// that run without a manifest.
    pub fn cwd_config_path(&self) -> PathBuf {
        project_config_in(&self.cwd)
    }

    /// Locate the manifest, honouring an explicit path.
    pub fn find_manifest(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) if path.is_absolute() => Ok(path.to_path_buf()),
            Some(path) => Ok(self.cwd.join(path)),
            None => find_manifest(&self.cwd),
        }
    }
}

fn project_config_in(dir: &Path) -> PathBuf {
    dir.join(".extconf").join("config.toml")
}
