//! Toggle resolution.
//!
//! Reads the build toggles from a [`BuildEnv`] snapshot and strips the toggle
//! flags from the argument list, so they never reach the CLI parser.

use crate::core::toggle::{BuildToggle, Toggles};
use crate::util::context::BuildEnv;

/// Resolve both toggles.
///
/// A toggle starts out `true` if its environment variable is set. Its flag
/// forces it `true`, and every occurrence of the flag is removed from the
/// returned arguments.
pub fn resolve_toggles(env: &BuildEnv) -> (Toggles, Vec<String>) {
    let mut toggles = Toggles::default();
    let mut remaining = env.args().to_vec();

    for toggle in BuildToggle::ALL {
        let mut enabled = env.has_var(toggle.env_var());

        let before = remaining.len();
        remaining.retain(|arg| arg != toggle.flag());
        if remaining.len() != before {
            enabled = true;
        }

        toggles.set(toggle, enabled);
    }

    tracing::debug!(
        regenerate = toggles.regenerate,
        coverage = toggles.coverage,
        "resolved build toggles"
    );

    (toggles, remaining)
}
