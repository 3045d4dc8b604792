//! modcheck CLI - dependency override consistency checks

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modcheck::core::{ConfigError, ManifestError};
use modcheck::util::diagnostic::{emit, use_color};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let report_color = use_color(cli.no_color, &std::io::stdout());
    let diagnostic_color = use_color(cli.no_color, &std::io::stderr());

    if let Err(e) = run(cli, report_color) {
        report_error(e, diagnostic_color);
        std::process::exit(1);
    }
}

fn run(cli: Cli, report_color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("modcheck=debug")
    } else {
        EnvFilter::new("modcheck=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate(args) => commands::validate::execute(args, report_color),
        Commands::Modules(args) => commands::modules::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn report_error(err: anyhow::Error, color: bool) {
    let err = match err.downcast::<ManifestError>() {
        Ok(manifest_err) => {
            eprintln!("{:?}", miette::Report::new(manifest_err));
            return;
        }
        Err(err) => err,
    };

    match err.downcast_ref::<ConfigError>() {
        Some(config_err) => emit(&config_err.to_diagnostic(), color),
        None => eprintln!("error: {:#}", err),
    }
}
