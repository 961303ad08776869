//! extconf CLI - build configuration for Cython extensions

use anyhow::Result;
use clap::Parser;
use miette::Diagnostic as _;
use tracing_subscriber::EnvFilter;

use extconf::ops::resolve_toggles;
use extconf::{BuildEnv, ExtError, GlobalContext};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(help) = e.downcast_ref::<ExtError>().and_then(|ext| ext.help()) {
            eprintln!("help: {}", help);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Toggle flags are consumed before clap sees the arguments
    let env = BuildEnv::capture();
    let (toggles, args) = resolve_toggles(&env);
    let cli = Cli::parse_from(args);

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("extconf=debug")
    } else {
        EnvFilter::new("extconf=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);

    let manifest_path = cli.manifest_path.as_deref();

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &ctx, &env, toggles, manifest_path),
        Commands::Flags(args) => commands::flags::execute(args, &ctx, &env, toggles, manifest_path),
        Commands::Doctor(args) => {
            commands::doctor::execute(args, &ctx, &env, toggles, manifest_path)
        }
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
