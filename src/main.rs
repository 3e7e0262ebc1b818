mod cli;
mod commands;
mod config;
mod error;
mod filename;
mod page_range;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::SplitConfig;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = SplitConfig::try_from(cli)?;

    match commands::split::run(&config) {
        Err(err) if err.is_user_error() => {
            println!("Error: {}", err);
            Ok(())
        }
        result => Ok(result?),
    }
}
