//! fieldlog -- daily health report for field-device logs.

use clap::Parser;

use fieldlog_cli::cli::{Cli, Commands};
use fieldlog_cli::commands;
use fieldlog_cli::error::CliError;
use fieldlog_cli::logging;
use fieldlog_cli::output::OutputWriter;
use fieldlog_core::config::{FieldlogConfig, GeneralConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let writer = OutputWriter::new(cli.output);

    if let Err(e) = run(cli, &writer).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    match cli.command {
        Commands::Analyze(args) => {
            let config = FieldlogConfig::load(&cli.config).await?;
            logging::init_tracing(&config.general, cli.log_level.as_deref())?;
            tracing::info!(config = %cli.config.display(), "fieldlog starting");
            commands::analyze::execute(args, config, writer).await
        }
        Commands::Config(args) => {
            // the config file itself may be broken, so log with defaults here
            logging::warn_on_failure(
                logging::init_tracing(&GeneralConfig::default(), cli.log_level.as_deref()),
                &mut std::io::stderr(),
            );
            commands::config::execute(args, &cli.config, writer).await
        }
    }
}
