//! `extconf build` command

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::BuildArgs;
use crate::commands::load_project;
use extconf::ops::{build, BuildOptions};
use extconf::util::diagnostic::emit;
use extconf::util::process::SystemExecutor;
use extconf::{BuildEnv, GlobalContext, Toggles};

pub fn execute(
    args: BuildArgs,
    ctx: &GlobalContext,
    env: &BuildEnv,
    toggles: Toggles,
    manifest_path: Option<&Path>,
) -> Result<()> {
    let (manifest, config) = load_project(ctx, env, manifest_path)?;

    let opts = BuildOptions {
        translate: !args.no_translate,
    };
    let outcome = build(&manifest, &config, toggles, &SystemExecutor, &opts)?;

    if let Some(failure) = &outcome.failure {
        emit(&failure.to_diagnostic(&outcome.skipped), ctx.color());
    }

    let json = outcome
        .descriptor
        .to_json()
        .context("failed to serialize extension descriptor")?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", json))
                .with_context(|| format!("failed to write descriptor: {}", path.display()))?;
            tracing::info!("Wrote descriptor for `{}` to {}", manifest.extension.name, path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
