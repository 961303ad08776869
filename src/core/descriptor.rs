//! Extension descriptor - the build unit handed to the packaging tool.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::config::BuildConfig;

/// Which kind of source file the descriptor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Annotated Cython source (`.pyx`), must be translated first.
    Cython,
    /// Compilable C source (`.c`).
    C,
}

impl SourceKind {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceKind::Cython => "pyx",
            SourceKind::C => "c",
        }
    }

    /// Pick the source kind from the regenerate toggle.
    pub fn for_regenerate(regenerate: bool) -> Self {
        if regenerate {
            SourceKind::Cython
        } else {
            SourceKind::C
        }
    }

    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "pyx" => Some(SourceKind::Cython),
            "c" => Some(SourceKind::C),
            _ => None,
        }
    }
}

/// A fully assembled extension module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionDescriptor {
    /// Module name, e.g. `osd`.
    pub name: String,

    /// Source file to compile.
    pub source: PathBuf,

    /// Cython source the `source` was generated from, after translation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_from: Option<PathBuf>,

    #[serde(flatten)]
    pub config: BuildConfig,
}

impl ExtensionDescriptor {
    /// Source path for a stem and kind: `src/osd` + Cython -> `src/osd.pyx`.
    pub fn source_path(stem: &Path, kind: SourceKind) -> PathBuf {
        let mut path = stem.as_os_str().to_os_string();
        path.push(".");
        path.push(kind.extension());
        PathBuf::from(path)
    }

    /// Kind of the referenced source, if its extension is recognised.
    pub fn source_kind(&self) -> Option<SourceKind> {
        SourceKind::from_path(&self.source)
    }

    /// Whether the source still needs the translation step.
    pub fn needs_translation(&self) -> bool {
        self.source_kind() == Some(SourceKind::Cython)
    }

    /// Serialize for the packaging tool.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
