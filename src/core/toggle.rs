//! Build toggles.
//!
//! A toggle is switched on by the presence of an environment variable or of a
//! flag token on the command line. Toggles are resolved once per invocation.

use serde::Serialize;

/// A named boolean build switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildToggle {
    /// Regenerate the C source from the Cython source.
    Regenerate,
    /// Compile line-trace hooks into the regenerated source.
    Coverage,
}

impl BuildToggle {
    /// Both toggles, in resolution order.
    pub const ALL: [BuildToggle; 2] = [BuildToggle::Regenerate, BuildToggle::Coverage];

    /// Environment variable whose presence enables the toggle.
    pub fn env_var(&self) -> &'static str {
        match self {
            BuildToggle::Regenerate => "USE_CYTHON",
            BuildToggle::Coverage => "CYTHON_COVERAGE",
        }
    }

    /// Command-line token that enables the toggle.
    pub fn flag(&self) -> &'static str {
        match self {
            BuildToggle::Regenerate => "--use-cython",
            BuildToggle::Coverage => "--cython-coverage",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuildToggle::Regenerate => "regenerate-from-source",
            BuildToggle::Coverage => "coverage-instrumentation",
        }
    }
}

/// Resolved toggle values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Toggles {
    pub regenerate: bool,
    pub coverage: bool,
}

impl Toggles {
    pub fn get(&self, toggle: BuildToggle) -> bool {
        match toggle {
            BuildToggle::Regenerate => self.regenerate,
            BuildToggle::Coverage => self.coverage,
        }
    }

    pub(crate) fn set(&mut self, toggle: BuildToggle, value: bool) {
        match toggle {
            BuildToggle::Regenerate => self.regenerate = value,
            BuildToggle::Coverage => self.coverage = value,
        }
    }

    /// Coverage only has an effect when the source is regenerated.
    pub fn traces_lines(&self) -> bool {
        self.regenerate && self.coverage
    }
}
