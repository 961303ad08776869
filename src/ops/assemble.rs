//! Descriptor assembly.

use std::path::Path;

use crate::core::config::{BuildConfig, Define};
use crate::core::descriptor::{ExtensionDescriptor, SourceKind};
use crate::core::toggle::Toggles;

/// Macro enabling Cython's line-trace hooks in the generated C code.
pub const COVERAGE_MACRO: &str = "CYTHON_TRACE_NOGIL";

/// Build the descriptor for `name`.
///
/// The source is `<source_stem>.pyx` when regenerating and `<source_stem>.c`
/// otherwise. The coverage macro is added only when the source is
/// regenerated with coverage on.
pub fn assemble(
    toggles: &Toggles,
    mut config: BuildConfig,
    name: &str,
    source_stem: &Path,
) -> ExtensionDescriptor {
    let kind = SourceKind::for_regenerate(toggles.regenerate);

    if toggles.traces_lines() {
        config.define(Define::key_value(COVERAGE_MACRO, "1"));
    }

    ExtensionDescriptor {
        name: name.to_string(),
        source: ExtensionDescriptor::source_path(source_stem, kind),
        generated_from: None,
        config,
    }
}
