//! `modcheck modules` command

use anyhow::Result;

use crate::cli::ModulesArgs;
use modcheck::ops::{discover, format_module_list, DiscoveryOptions};
use modcheck::util::Config;

pub fn execute(args: ModulesArgs) -> Result<()> {
    let config = Config::load_for_root(&args.path)?;
    let set = discover(&args.path, &DiscoveryOptions::from(&config))?;

    print!("{}", format_module_list(&set));

    Ok(())
}
