use crate::cluster::{Contribution, ProcessGroup, ThreadGroup, Worker};
use crate::error::Result;
use crate::processors::Reducer;
use crate::settings::{RunSettings, Transport};
use crate::utils::constants::COORDINATOR_RANK;
use crate::utils::filename::results_path;
use crate::utils::progress::ProgressReporter;
use crate::writers::ReportWriter;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Per-rank line of the run summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankSummary {
    pub rank: usize,
    pub entries: usize,
    pub dropped: u64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub cities: usize,
    pub readings: u64,
    pub dropped: u64,
    pub ranks: Vec<RankSummary>,
}

/// Rank 0: launches the group, gathers every contribution, reduces them in
/// rank order and writes the report. The global table lives only inside
/// [`Coordinator::reduce_and_report`].
pub struct Coordinator {
    settings: RunSettings,
    program: Option<PathBuf>,
    verbosity: u8,
    show_progress: bool,
}

impl Coordinator {
    pub fn new(settings: RunSettings) -> Self {
        Self {
            settings,
            program: None,
            verbosity: 0,
            show_progress: false,
        }
    }

    /// Binary launched for ranks `1..size` with the process transport.
    /// Defaults to the running executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let size = self.settings.group_size();
        if size < self.settings.workers {
            warn!(
                workers = self.settings.workers,
                processes = size,
                "Fewer ranks than partitions, partitions {}..{} will not be read",
                size,
                self.settings.workers
            );
        }
        info!(
            workers = self.settings.workers,
            processes = size,
            transport = self.settings.transport.as_str(),
            "Starting aggregation"
        );

        let progress = if self.show_progress {
            ProgressReporter::new(size as u64, "Gathering contributions...", false)
        } else {
            ProgressReporter::silent()
        };

        let contributions = match self.settings.transport {
            Transport::Process => self.gather_processes(&progress).await?,
            Transport::Thread => {
                let group = ThreadGroup::new(self.settings.clone());
                tokio::task::spawn_blocking(move || group.gather(&progress)).await??
            }
        };

        self.reduce_and_report(contributions)
    }

    async fn gather_processes(&self, progress: &ProgressReporter) -> Result<Vec<Contribution>> {
        let group = match &self.program {
            Some(program) => ProcessGroup::new(program.clone()),
            None => ProcessGroup::current()?,
        }
        .with_verbosity(self.verbosity);

        // Children start before rank 0 reads its own partition so both run concurrently
        let launched = group.spawn(&self.settings)?;
        let settings = self.settings.clone();
        let own =
            tokio::task::spawn_blocking(move || Worker::new(COORDINATOR_RANK, &settings).run())
                .await?;

        launched.gather(own, progress).await
    }

    /// Merge contributions (already in rank order) and write the sorted report.
    pub fn reduce_and_report(&self, contributions: Vec<Contribution>) -> Result<RunSummary> {
        let reducer = Reducer::new(self.settings.capacity);
        let global = reducer.reduce(contributions.iter().map(|c| c.entries.as_slice()));

        let output_path = results_path(&self.settings.output_dir, self.settings.workers);
        ReportWriter::new().write_report(&global, &output_path)?;

        Ok(RunSummary {
            output_path,
            cities: global.len(),
            readings: global.total_readings(),
            dropped: global.dropped() + contributions.iter().map(|c| c.dropped).sum::<u64>(),
            ranks: contributions
                .iter()
                .map(|c| RankSummary {
                    rank: c.rank,
                    entries: c.count,
                    dropped: c.dropped,
                })
                .collect(),
        })
    }
}
