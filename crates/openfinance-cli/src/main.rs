mod cli;
mod commands;
mod error;
mod logging;
mod metadata;
mod output;
mod resources;
mod tools;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Instrument};

use crate::cli::Cli;
use crate::error::CliError;
use crate::metadata::InvocationId;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if let Err(error) = logging::init(logging::resolve_log_file(cli.log_file.as_deref()).as_deref())
    {
        eprintln!("error: {error}");
        return ExitCode::from(error.exit_code());
    }

    let id = InvocationId::new_v4();
    let span = tracing::info_span!("invocation", id = %id);
    match run(&cli).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    info!(command = ?cli.command, "starting");
    let result = commands::run(cli).await.and_then(|value| output::render(&value, cli.pretty));
    if let Err(error) = &result {
        error!(%error, exit_code = error.exit_code(), "command failed");
    }
    result
}
