mod app;
mod cli;
mod effects;
mod intake;
mod logging;
mod render;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    logging::initialize(cli.log.into(), cli.verbose);
    let config = cli::AppConfig::try_from(cli)?;
    app::run_app(config)
}
