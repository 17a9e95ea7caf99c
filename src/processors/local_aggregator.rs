use crate::error::Result;
use crate::models::{AggregationTable, FoldOutcome, Reading};
use crate::readers::{LineCounts, PartitionReader};
use std::path::Path;
use tracing::{debug, warn};

/// Per-rank accumulator folding one partition into a bounded table.
pub struct LocalAggregator {
    table: AggregationTable,
    counts: LineCounts,
}

impl LocalAggregator {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: AggregationTable::new(capacity),
            counts: LineCounts::default(),
        }
    }

    /// Fold a single reading into the local table.
    pub fn fold(&mut self, reading: Reading) -> FoldOutcome {
        self.table.fold(reading)
    }

    /// Stream a whole partition through the parser and fold every valid line.
    pub fn aggregate_partition(&mut self, reader: &PartitionReader, path: &Path) -> Result<()> {
        let table = &mut self.table;
        let counts = reader.read_partition(path, |reading| {
            table.fold(reading);
        })?;

        debug!(
            partition = %path.display(),
            lines = counts.lines,
            readings = counts.readings,
            skipped = counts.skipped,
            cities = table.len(),
            "Partition aggregated"
        );
        if table.dropped() > 0 {
            warn!(
                partition = %path.display(),
                dropped = table.dropped(),
                capacity = table.capacity(),
                "City table full, readings for new cities were dropped"
            );
        }

        self.counts.lines += counts.lines;
        self.counts.readings += counts.readings;
        self.counts.skipped += counts.skipped;
        Ok(())
    }

    pub fn table(&self) -> &AggregationTable {
        &self.table
    }

    pub fn counts(&self) -> LineCounts {
        self.counts
    }

    pub fn into_table(self) -> AggregationTable {
        self.table
    }
}
