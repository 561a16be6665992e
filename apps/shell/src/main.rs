use bindery::domain::config::AppConfig;
use bindery::kernel::config::load_config;
use bindery_logger::Logger;
use bindery_shell::Cli;
use clap::Parser;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config: AppConfig = load_config(cli.config.as_deref())?;
    let _logger = Logger::from_config(env!("CARGO_PKG_NAME"), &config.logging)?;

    let stdout = std::io::stdout();
    bindery_shell::run(&cli.command, &config, &mut stdout.lock())
}
