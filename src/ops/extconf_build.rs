//! Full extension preparation: query libraries, assemble, translate.

use crate::builder::cython::{CompilerDirectives, CythonTranslator, Translator};
use crate::core::descriptor::ExtensionDescriptor;
use crate::core::manifest::Manifest;
use crate::core::toggle::Toggles;
use crate::ops::assemble::assemble;
use crate::ops::pkg_config::{PkgConfig, QueryFailure, Resolution};
use crate::util::config::Config;
use crate::util::diagnostic::ExtError;
use crate::util::process::ProcessExecutor;

/// Options for preparing an extension.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Run the translation step when regenerating. Off means the descriptor
    /// keeps pointing at the `.pyx` source.
    pub translate: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions { translate: true }
    }
}

/// Result of preparing an extension.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub toggles: Toggles,
    pub descriptor: ExtensionDescriptor,
    /// Set when library resolution stopped early.
    pub failure: Option<QueryFailure>,
    /// Libraries never queried because of `failure`.
    pub skipped: Vec<String>,
}

/// Query the manifest's libraries and assemble the descriptor, without
/// translating.
pub fn resolve_extension<E>(
    manifest: &Manifest,
    config: &Config,
    toggles: Toggles,
    executor: &E,
) -> BuildOutcome
where
    E: ProcessExecutor + ?Sized,
{
    let ext = &manifest.extension;

    if toggles.regenerate {
        tracing::info!("Using Cython to re-compile the {} bindings.", ext.name);
    } else {
        tracing::info!("Compiling {} bindings from C file without Cython.", ext.name);
    }

    let pkg_config = PkgConfig::new(config.pkg_config_program())
        .with_optional_flag(ext.pkg_config_flag.clone());
    let resolution = pkg_config.resolve(executor, &ext.libraries, manifest.base_config());

    let (config_out, failure, skipped) = match resolution {
        Resolution::Complete(c) => (c, None, Vec::new()),
        Resolution::Partial {
            config,
            failure,
            skipped,
        } => (config, Some(failure), skipped),
    };

    let descriptor = assemble(&toggles, config_out, &ext.name, &manifest.source_stem());

    BuildOutcome {
        toggles,
        descriptor,
        failure,
        skipped,
    }
}

/// Prepare the extension end to end.
///
/// Library resolution failures are tolerated and reported in the outcome.
/// A missing or failing translator, when regeneration was requested, is a
/// fatal [`ExtError`].
pub fn build<E>(
    manifest: &Manifest,
    config: &Config,
    toggles: Toggles,
    executor: &E,
    opts: &BuildOptions,
) -> Result<BuildOutcome, ExtError>
where
    E: ProcessExecutor + ?Sized,
{
    let mut outcome = resolve_extension(manifest, config, toggles, executor);

    if toggles.regenerate && opts.translate {
        let translator = CythonTranslator::locate(&config.cython_program(), executor)?;
        let directives = CompilerDirectives::new(&config.translate, &toggles);
        outcome.descriptor = translator.translate(outcome.descriptor, &directives)?;
    }

    Ok(outcome)
}
