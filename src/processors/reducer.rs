use crate::models::{AggregationTable, CityStats, FoldOutcome};
use tracing::{debug, trace, warn};

/// Coordinator-side reduction of per-rank tables into one global table.
pub struct Reducer {
    capacity: usize,
}

impl Reducer {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Fold every entry of `local` into `global` as a weighted observation.
    pub fn merge(&self, global: &mut AggregationTable, local: &[CityStats]) {
        for entry in local {
            if global.fold_stats(entry) == FoldOutcome::Dropped {
                trace!(city = %entry.city_lossy(), "Global table full, city dropped");
            }
        }
    }

    /// Merge local tables in the order given. Callers pass them by ascending
    /// rank; summation order is part of the output, so it must not vary.
    pub fn reduce<'a, I>(&self, locals: I) -> AggregationTable
    where
        I: IntoIterator<Item = &'a [CityStats]>,
    {
        let mut global = AggregationTable::new(self.capacity);
        for (position, local) in locals.into_iter().enumerate() {
            self.merge(&mut global, local);
            debug!(
                position,
                entries = local.len(),
                cities = global.len(),
                "Merged local table"
            );
        }

        if global.dropped() > 0 {
            warn!(
                dropped = global.dropped(),
                capacity = global.capacity(),
                "Global city table full, entries for new cities were dropped"
            );
        }
        global
    }
}
