//! `extconf doctor` command

use std::path::Path;

use anyhow::Result;

use crate::cli::DoctorArgs;
use crate::commands::load_project;
use extconf::ops::{doctor, format_report, DoctorOptions};
use extconf::util::config::load_config;
use extconf::util::process::SystemExecutor;
use extconf::{BuildEnv, GlobalContext, Toggles};

pub fn execute(
    _args: DoctorArgs,
    ctx: &GlobalContext,
    env: &BuildEnv,
    toggles: Toggles,
    manifest_path: Option<&Path>,
) -> Result<()> {
    // Tools can be checked without a manifest; libraries need one
    let (libraries, config) = match load_project(ctx, env, manifest_path) {
        Ok((manifest, config)) => (manifest.extension.libraries, config),
        Err(e) => {
            tracing::debug!("no manifest: {:#}", e);
            let mut config = load_config(ctx.config_path().as_deref(), &ctx.cwd_config_path());
            config.apply_env(env);
            (Vec::new(), config)
        }
    };

    let options = DoctorOptions {
        toggles,
        pkg_config: config.pkg_config_program(),
        cython: config.cython_program(),
        libraries,
    };

    let report = doctor(&options, &SystemExecutor);
    print!("{}", format_report(&report, ctx.is_verbose()));

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
