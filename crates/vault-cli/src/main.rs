use clap::Parser;

mod cli;
mod commands;
mod records;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    vault_sdk::telemetry::init(level)?;
    commands::run_command(cli, config)
}
