//! Command implementations

pub mod build;
pub mod completions;
pub mod doctor;
pub mod flags;

use std::path::Path;

use anyhow::Result;

use extconf::util::config::{load_config, Config};
use extconf::{BuildEnv, GlobalContext, Manifest};

/// Load the manifest and the layered tool configuration.
pub fn load_project(
    ctx: &GlobalContext,
    env: &BuildEnv,
    manifest_path: Option<&Path>,
) -> Result<(Manifest, Config)> {
    let path = ctx.find_manifest(manifest_path)?;
    let manifest = Manifest::load(&path)?;

    let mut config = load_config(
        ctx.config_path().as_deref(),
        &ctx.project_config_path(&path),
    );
    config.apply_env(env);

    Ok((manifest, config))
}
