use crate::cli::args::Cli;
use crate::cluster::{run_rank_process, Coordinator};
use crate::error::Result;
use crate::settings::RunSettings;
use std::io::IsTerminal;
use tracing::{debug, info};

pub async fn run(cli: Cli) -> Result<()> {
    if let Some(rank) = cli.rank {
        return run_rank_process(rank);
    }

    let settings = RunSettings::load(&cli.overrides())?;
    debug!(?settings, "Resolved settings");

    let coordinator = Coordinator::new(settings)
        .with_verbosity(cli.verbose)
        .with_progress(std::io::stderr().is_terminal());
    let summary = coordinator.run().await?;

    for rank in &summary.ranks {
        debug!(
            rank = rank.rank,
            entries = rank.entries,
            dropped = rank.dropped,
            "Rank contribution"
        );
    }
    info!(
        report = %summary.output_path.display(),
        cities = summary.cities,
        readings = summary.readings,
        dropped = summary.dropped,
        "Aggregation complete"
    );

    Ok(())
}
