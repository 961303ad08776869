//! Extconf.toml manifest parsing and schema.
//!
//! The manifest names the extension, the system libraries it links against
//! and the macros it is compiled with.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::config::{BuildConfig, Define, FlagCategory};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Extconf.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    extension: ExtensionSection,
}

/// The `[extension]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ExtensionSection {
    /// Module name
    pub name: String,

    /// Source path without extension (defaults to the module name)
    pub source: Option<PathBuf>,

    /// pkg-config package names, queried in this order
    #[serde(default)]
    pub libraries: Vec<String>,

    /// Extra argument placed before every pkg-config query
    pub pkg_config_flag: Option<String>,

    #[serde(default)]
    pub define_macros: Vec<Define>,

    #[serde(default)]
    pub include_dirs: Vec<String>,

    #[serde(default)]
    pub library_dirs: Vec<String>,

    #[serde(default)]
    pub link_libraries: Vec<String>,

    #[serde(default)]
    pub extra_compile_args: Vec<String>,

    #[serde(default)]
    pub extra_link_args: Vec<String>,
}

/// A loaded manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub extension: ExtensionSection,
    /// Directory containing the manifest; relative paths resolve against it.
    pub manifest_dir: PathBuf,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let name = raw.extension.name.trim();
        if name.is_empty() {
            bail!("manifest at {} has an empty extension name", path.display());
        }

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        Ok(Manifest {
            extension: raw.extension,
            manifest_dir,
        })
    }

    /// Source stem relative to the manifest directory.
    pub fn source_stem(&self) -> PathBuf {
        let stem = self
            .extension
            .source
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.extension.name));
        self.manifest_dir.join(stem)
    }

    /// Configuration the library queries start from.
    pub fn base_config(&self) -> BuildConfig {
        let ext = &self.extension;
        let mut config = BuildConfig::with_macros(ext.define_macros.clone());
        config.extend(FlagCategory::IncludeDirs, ext.include_dirs.iter().cloned());
        config.extend(FlagCategory::LibraryDirs, ext.library_dirs.iter().cloned());
        config.extend(FlagCategory::Libraries, ext.link_libraries.iter().cloned());
        config.extend(
            FlagCategory::ExtraCompileArgs,
            ext.extra_compile_args.iter().cloned(),
        );
        config.extend(
            FlagCategory::ExtraLinkArgs,
            ext.extra_link_args.iter().cloned(),
        );
        config
    }
}

/// Find `Extconf.toml` in `start` or any of its ancestors.
pub fn find_manifest(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            bail!(
                "could not find `{}` in `{}` or any parent directory",
                MANIFEST_NAME,
                start.display()
            );
        }
    }
}
