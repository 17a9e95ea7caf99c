use crate::cluster::gather::order_by_rank;
use crate::cluster::{Contribution, Worker};
use crate::error::{ProcessingError, Result};
use crate::settings::RunSettings;
use crate::utils::progress::ProgressReporter;
use crossbeam::channel;
use std::sync::Arc;
use tracing::debug;

/// Runs every rank on its own thread of a dedicated pool and gathers the
/// contributions over a channel.
pub struct ThreadGroup {
    settings: Arc<RunSettings>,
}

impl ThreadGroup {
    pub fn new(settings: RunSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Blocks until every rank has contributed.
    pub fn gather(&self, progress: &ProgressReporter) -> Result<Vec<Contribution>> {
        let size = self.settings.group_size();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|index| format!("rank-{}", index))
            .build()
            .map_err(|e| ProcessingError::Collective(e.to_string()))?;

        let (sender, receiver) = channel::bounded(size);
        for rank in 0..size {
            let sender = sender.clone();
            let settings = Arc::clone(&self.settings);
            pool.spawn(move || {
                let contribution = Worker::new(rank, &settings).run();
                // The receiver only goes away once the gather has failed
                let _ = sender.send(contribution);
            });
        }
        drop(sender);

        let mut contributions = Vec::with_capacity(size);
        for _ in 0..size {
            let contribution: Contribution = receiver.recv().map_err(|_| {
                ProcessingError::Collective("a rank thread exited without contributing".to_string())
            })?;
            debug!(rank = contribution.rank, entries = contribution.count, "Received contribution");
            progress.increment(1);
            contributions.push(contribution);
        }

        order_by_rank(size, contributions)
    }
}
