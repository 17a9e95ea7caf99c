use crate::cluster::Contribution;
use crate::processors::LocalAggregator;
use crate::readers::{LineParser, PartitionReader};
use crate::settings::RunSettings;
use crate::utils::filename::partition_path;
use tracing::{debug, error, info};

/// The local phase of one rank: read its partition (if any) and package the
/// resulting table for the collective.
pub struct Worker<'a> {
    rank: usize,
    settings: &'a RunSettings,
}

impl<'a> Worker<'a> {
    pub fn new(rank: usize, settings: &'a RunSettings) -> Self {
        Self { rank, settings }
    }

    /// Never fails: an unreadable partition is logged here and the rank
    /// contributes an empty table so the collective still completes.
    pub fn run(&self) -> Contribution {
        if !self.settings.reads_partition(self.rank) {
            debug!(rank = self.rank, "No partition assigned, contributing empty table");
            return Contribution::empty(self.rank);
        }

        let path = partition_path(&self.settings.input_dir, self.rank);
        let reader =
            PartitionReader::with_parser(LineParser::with_max_name_len(self.settings.max_name_len))
                .with_mmap(self.settings.use_mmap);
        let mut aggregator = LocalAggregator::new(self.settings.capacity);

        match aggregator.aggregate_partition(&reader, &path) {
            Ok(()) => {
                info!(
                    rank = self.rank,
                    partition = %path.display(),
                    readings = aggregator.counts().readings,
                    cities = aggregator.table().len(),
                    "Local aggregation complete"
                );
                Contribution::from_table(self.rank, aggregator.into_table())
            }
            Err(e) => {
                error!(rank = self.rank, "{}", e);
                Contribution::empty(self.rank)
            }
        }
    }
}
