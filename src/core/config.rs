//! Build configuration - the compiler/linker inputs of one extension.
//!
//! Flags are grouped by [`FlagCategory`]. Each category is an ordered list;
//! entries are only ever appended, so the order the compiler sees matches the
//! order the flags were discovered in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One class of compiler/linker input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagCategory {
    /// Include directories (-I)
    IncludeDirs,
    /// Library search directories (-L)
    LibraryDirs,
    /// Libraries to link (-l)
    Libraries,
    /// Compiler flags that are not include directories
    ExtraCompileArgs,
    /// Linker flags that are neither search directories nor libraries
    ExtraLinkArgs,
}

impl FlagCategory {
    /// All categories, in declaration order.
    pub const ALL: [FlagCategory; 5] = [
        FlagCategory::IncludeDirs,
        FlagCategory::LibraryDirs,
        FlagCategory::Libraries,
        FlagCategory::ExtraCompileArgs,
        FlagCategory::ExtraLinkArgs,
    ];

    /// Key used for this category in the emitted descriptor.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagCategory::IncludeDirs => "include_dirs",
            FlagCategory::LibraryDirs => "library_dirs",
            FlagCategory::Libraries => "libraries",
            FlagCategory::ExtraCompileArgs => "extra_compile_args",
            FlagCategory::ExtraLinkArgs => "extra_link_args",
        }
    }
}

impl fmt::Display for FlagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A preprocessor macro definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Define {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Define {
    /// Create a simple flag define: -DFOO
    pub fn flag(name: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: None,
        }
    }

    /// Create a key-value define: -DFOO=bar
    pub fn key_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Convert to compiler flag format.
    pub fn to_flag(&self) -> String {
        match &self.value {
            None => format!("-D{}", self.name),
            Some(value) => format!("-D{}={}", self.name, value),
        }
    }
}

/// Accumulated compiler/linker inputs plus caller-supplied macros.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub include_dirs: Vec<String>,
    pub library_dirs: Vec<String>,
    pub libraries: Vec<String>,
    pub extra_compile_args: Vec<String>,
    pub extra_link_args: Vec<String>,
    /// Macros are never discovered, only supplied.
    pub define_macros: Vec<Define>,
}

impl BuildConfig {
    /// Create an empty configuration carrying the given macros.
    pub fn with_macros(define_macros: Vec<Define>) -> Self {
        BuildConfig {
            define_macros,
            ..Default::default()
        }
    }

    /// Entries for one category.
    pub fn get(&self, category: FlagCategory) -> &[String] {
        match category {
            FlagCategory::IncludeDirs => &self.include_dirs,
            FlagCategory::LibraryDirs => &self.library_dirs,
            FlagCategory::Libraries => &self.libraries,
            FlagCategory::ExtraCompileArgs => &self.extra_compile_args,
            FlagCategory::ExtraLinkArgs => &self.extra_link_args,
        }
    }

    /// Append entries to one category.
    pub fn extend<I, S>(&mut self, category: FlagCategory, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = match category {
            FlagCategory::IncludeDirs => &mut self.include_dirs,
            FlagCategory::LibraryDirs => &mut self.library_dirs,
            FlagCategory::Libraries => &mut self.libraries,
            FlagCategory::ExtraCompileArgs => &mut self.extra_compile_args,
            FlagCategory::ExtraLinkArgs => &mut self.extra_link_args,
        };
        list.extend(items.into_iter().map(Into::into));
    }

    /// Add a macro definition.
    pub fn define(&mut self, define: Define) {
        self.define_macros.push(define);
    }

    /// Whether no category holds any entry (macros are not counted).
    pub fn has_no_flags(&self) -> bool {
        FlagCategory::ALL.iter().all(|c| self.get(*c).is_empty())
    }

    /// Flags a compiler invocation needs: -I, -D, then extra compile args.
    pub fn compile_flags(&self) -> Vec<String> {
        let mut flags: Vec<String> = self
            .include_dirs
            .iter()
            .map(|dir| format!("-I{}", dir))
            .collect();
        flags.extend(self.define_macros.iter().map(Define::to_flag));
        flags.extend(self.extra_compile_args.iter().cloned());
        flags
    }

    /// Flags a linker invocation needs: -L, -l, then extra link args.
    pub fn link_flags(&self) -> Vec<String> {
        let mut flags: Vec<String> = self
            .library_dirs
            .iter()
            .map(|dir| format!("-L{}", dir))
            .collect();
        flags.extend(self.libraries.iter().map(|lib| format!("-l{}", lib)));
        flags.extend(self.extra_link_args.iter().cloned());
        flags
    }
}
