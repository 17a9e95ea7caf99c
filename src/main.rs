use city_stats::cli::{init_logging, run, Cli};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

/// Exit status for rejected configuration, matching clap's usage errors.
const USAGE_EXIT_CODE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_config() => {
            error!("{}", e);
            ExitCode::from(USAGE_EXIT_CODE)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
