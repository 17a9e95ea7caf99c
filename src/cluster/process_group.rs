use crate::cluster::gather::order_by_rank;
use crate::cluster::wire::{decode_frame, write_frame};
use crate::cluster::{Contribution, Worker};
use crate::error::{ProcessingError, Result};
use crate::settings::RunSettings;
use crate::utils::constants::{COORDINATOR_RANK, RANK_ENV, WORKER_SETTINGS_ENV};
use crate::utils::progress::ProgressReporter;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Launches ranks `1..size` as child processes of the same binary.
///
/// Each child learns its rank and the resolved settings from the environment,
/// runs its local phase and writes a single frame to stdout. Its log output
/// goes to the inherited stderr.
pub struct ProcessGroup {
    program: PathBuf,
    verbosity: u8,
}

impl ProcessGroup {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            verbosity: 0,
        }
    }

    /// Group that re-executes the running binary.
    pub fn current() -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Start every non-coordinator rank.
    pub fn spawn(&self, settings: &RunSettings) -> Result<LaunchedGroup> {
        let size = settings.group_size();
        let settings_json = serde_json::to_string(settings)?;
        let mut children = Vec::with_capacity(size.saturating_sub(1));

        for rank in (COORDINATOR_RANK + 1)..size {
            let mut command = Command::new(&self.program);
            command
                .arg(settings.workers.to_string())
                .env(RANK_ENV, rank.to_string())
                .env(WORKER_SETTINGS_ENV, &settings_json)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::inherit())
                .kill_on_drop(true);
            if self.verbosity > 0 {
                command.arg(format!("-{}", "v".repeat(self.verbosity as usize)));
            }

            let child = command.spawn().map_err(|e| {
                ProcessingError::Collective(format!(
                    "failed to launch rank {} ({}): {}",
                    rank,
                    self.program.display(),
                    e
                ))
            })?;
            debug!(rank, pid = child.id(), "Launched rank process");
            children.push((rank, child));
        }

        Ok(LaunchedGroup { size, children })
    }
}

/// Ranks that have been launched and not yet gathered.
pub struct LaunchedGroup {
    size: usize,
    children: Vec<(usize, Child)>,
}

impl LaunchedGroup {
    /// Wait for every child's frame and combine them with the coordinator's own
    /// contribution. Blocks until all ranks have reported; there is no timeout.
    pub async fn gather(
        self,
        own: Contribution,
        progress: &ProgressReporter,
    ) -> Result<Vec<Contribution>> {
        let mut pending = JoinSet::new();
        for (rank, child) in self.children {
            pending.spawn(async move { (rank, child.wait_with_output().await) });
        }

        let mut contributions = Vec::with_capacity(self.size);
        contributions.push(own);
        progress.increment(1);

        while let Some(joined) = pending.join_next().await {
            let (rank, output) = joined?;
            let output = output?;
            if !output.status.success() {
                return Err(ProcessingError::Collective(format!(
                    "rank {} exited with {}",
                    rank, output.status
                )));
            }

            let contribution = decode_frame(&output.stdout)?;
            if contribution.rank != rank {
                return Err(ProcessingError::Collective(format!(
                    "process for rank {} reported rank {}",
                    rank, contribution.rank
                )));
            }
            debug!(rank, entries = contribution.count, "Received contribution");
            progress.increment(1);
            contributions.push(contribution);
        }

        order_by_rank(self.size, contributions)
    }
}

/// Entry point of a launched rank process.
pub fn run_rank_process(rank: usize) -> Result<()> {
    let raw = std::env::var(WORKER_SETTINGS_ENV).map_err(|_| {
        ProcessingError::Config(format!(
            "rank {} started without {}",
            rank, WORKER_SETTINGS_ENV
        ))
    })?;
    let settings: RunSettings = serde_json::from_str(&raw)?;

    if rank == COORDINATOR_RANK || rank >= settings.group_size() {
        return Err(ProcessingError::Config(format!(
            "rank {} is not a worker rank in a group of {}",
            rank,
            settings.group_size()
        )));
    }

    let contribution = Worker::new(rank, &settings).run();
    info!(rank, entries = contribution.count, "Sending contribution");

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_frame(&mut handle, &contribution)
}
