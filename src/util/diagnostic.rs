//! User-facing errors and diagnostic messages.
//!
//! Fatal conditions are [`ExtError`] values. A partially resolved library is
//! not an error; it is reported as a warning [`Diagnostic`].

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// Common suggestion messages.
pub mod suggestions {
    /// Suggestion when a library is unknown to pkg-config.
    pub const INSTALL_LIBRARY: &str =
        "Install the library's development package or add its .pc directory to PKG_CONFIG_PATH";

    /// Suggestion when pkg-config itself is missing.
    pub const INSTALL_PKG_CONFIG: &str = "Install pkg-config (or pkgconf) or set PKG_CONFIG";
}

/// Fatal errors that abort the build invocation.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ExtError {
    /// Regeneration was requested but the translator cannot be run.
    #[error(
        "regeneration from Cython source was requested, but `{}` is not available",
        .program.display()
    )]
    #[diagnostic(
        code(extconf::translate::unavailable),
        help("Install Cython (`pip install cython`), set CYTHON, or drop --use-cython / USE_CYTHON")
    )]
    TranslatorUnavailable { program: PathBuf },

    /// The translator ran and failed.
    #[error("`{command}` failed with exit code {code:?}")]
    #[diagnostic(code(extconf::translate::failed))]
    TranslationFailed {
        command: String,
        code: Option<i32>,
        #[help]
        stderr: Option<String>,
    },

    /// The Cython source to translate does not exist.
    #[error("Cython source `{}` does not exist", .path.display())]
    #[diagnostic(code(extconf::translate::missing_source))]
    MissingSource { path: PathBuf },
}

/// A warning with optional context and suggestions.
///
/// Fatal conditions never go through here; they are [`ExtError`]s.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let label = if color {
            "\x1b[1;33mwarning\x1b[0m"
        } else {
            "warning"
        };

        output.push_str(&format!("{}: {}\n", label, self.message));

        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
