//! `modcheck validate` command

use anyhow::{Context, Result};

use crate::cli::ValidateArgs;
use modcheck::ops::{discover, format_report, validate, DiscoveryOptions, Exemptions, OutputFormat};
use modcheck::util::Config;

pub fn execute(args: ValidateArgs, color: bool) -> Result<()> {
    let output_format: OutputFormat = args
        .format
        .parse()
        .with_context(|| format!("invalid output format: {}", args.format))?;

    let config = Config::load_for_root(&args.path)?;

    tracing::debug!("path: {}", args.path.display());
    tracing::debug!("direct import modules: {:?}", args.direct_import_modules);
    tracing::debug!("no dummy modules: {:?}", args.no_dummy_modules);

    let set = discover(&args.path, &DiscoveryOptions::from(&config))?;

    let exemptions = Exemptions::new(
        config
            .exemptions
            .direct_import
            .into_iter()
            .chain(args.direct_import_modules),
        config
            .exemptions
            .no_dummy
            .into_iter()
            .chain(args.no_dummy_modules),
    );

    let report = validate(&set, &exemptions)?;

    print!("{}", format_report(&report, &set, output_format, color));

    // Exit with error code if validation failed
    if !report.ok() {
        std::process::exit(1);
    }

    Ok(())
}
