//! `extconf flags` command

use std::path::Path;

use anyhow::Result;

use crate::cli::FlagsArgs;
use crate::commands::load_project;
use extconf::ops::resolve_extension;
use extconf::util::diagnostic::emit;
use extconf::util::process::SystemExecutor;
use extconf::{BuildEnv, GlobalContext, Toggles};

pub fn execute(
    args: FlagsArgs,
    ctx: &GlobalContext,
    env: &BuildEnv,
    toggles: Toggles,
    manifest_path: Option<&Path>,
) -> Result<()> {
    let (manifest, config) = load_project(ctx, env, manifest_path)?;

    let outcome = resolve_extension(&manifest, &config, toggles, &SystemExecutor);
    if let Some(failure) = &outcome.failure {
        emit(&failure.to_diagnostic(&outcome.skipped), ctx.color());
    }

    let descriptor = &outcome.descriptor;
    let name = &descriptor.name;

    if !args.link {
        println!("# Compile flags for `{}` ({}):", name, descriptor.source.display());
        for flag in descriptor.config.compile_flags() {
            println!("  {}", flag);
        }
    }

    if !args.compile && !args.link {
        println!();
    }

    if !args.compile {
        println!("# Link flags for `{}`:", name);
        for flag in descriptor.config.link_flags() {
            println!("  {}", flag);
        }
    }

    Ok(())
}
