use crate::models::{CityStats, Reading};
use std::collections::HashMap;

/// What happened to an observation offered to an [`AggregationTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    Updated,
    Inserted,
    Dropped,
}

/// Bounded city -> stats table.
///
/// Entries are stored in insertion order with a hash index on the city name, so
/// iteration (and therefore which cities survive a full table) is reproducible
/// for identical input. A new city offered to a full table is dropped and only
/// counted in [`AggregationTable::dropped`].
#[derive(Debug, Clone)]
pub struct AggregationTable {
    index: HashMap<Vec<u8>, usize>,
    entries: Vec<CityStats>,
    capacity: usize,
    dropped: u64,
}

impl AggregationTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Fold one reading into the table.
    pub fn fold(&mut self, reading: Reading) -> FoldOutcome {
        if let Some(&slot) = self.index.get(&reading.city) {
            self.entries[slot].add_reading(reading.temperature);
            return FoldOutcome::Updated;
        }
        let entry = CityStats::new(reading.city, reading.temperature);
        self.insert_new(entry)
    }

    /// Fold an aggregated entry, combining it with an existing one for the same city.
    pub fn fold_stats(&mut self, stats: &CityStats) -> FoldOutcome {
        if let Some(&slot) = self.index.get(&stats.city) {
            self.entries[slot].merge(stats);
            return FoldOutcome::Updated;
        }
        self.insert_new(stats.clone())
    }

    fn insert_new(&mut self, entry: CityStats) -> FoldOutcome {
        if self.entries.len() >= self.capacity {
            self.dropped += 1;
            return FoldOutcome::Dropped;
        }
        self.index.insert(entry.city.clone(), self.entries.len());
        self.entries.push(entry);
        FoldOutcome::Inserted
    }

    /// Rebuild a table from entries received over the wire.
    pub fn from_entries(entries: Vec<CityStats>, capacity: usize) -> Self {
        let mut table = Self::new(capacity);
        for entry in entries {
            table.fold_stats(&entry);
        }
        table
    }

    pub fn get(&self, city: impl AsRef<[u8]>) -> Option<&CityStats> {
        self.index.get(city.as_ref()).map(|&slot| &self.entries[slot])
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CityStats] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CityStats> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Observations rejected because the table was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Total number of readings represented by the retained entries.
    pub fn total_readings(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_inserts_then_updates() {
        let mut table = AggregationTable::new(8);

        assert_eq!(table.fold(Reading::new("Oslo", 5.0)), FoldOutcome::Inserted);
        assert_eq!(table.fold(Reading::new("Oslo", -3.0)), FoldOutcome::Updated);

        let oslo = table.get("Oslo").unwrap();
        assert_eq!(oslo.count, 2);
        assert_eq!(oslo.min, -3.0);
        assert_eq!(oslo.max, 5.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_capacity_drops_new_cities_only() {
        let mut table = AggregationTable::new(2);
        table.fold(Reading::new("A", 1.0));
        table.fold(Reading::new("B", 2.0));

        assert!(table.is_full());
        assert_eq!(table.fold(Reading::new("C", 3.0)), FoldOutcome::Dropped);
        // Known cities keep aggregating on a full table
        assert_eq!(table.fold(Reading::new("A", 4.0)), FoldOutcome::Updated);

        assert!(table.get("C").is_none());
        assert_eq!(table.len(), 2);
        assert_eq!(table.dropped(), 1);
        assert_eq!(table.get("A").unwrap().count, 2);
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut table = AggregationTable::new(10);
        for city in ["Tokyo", "Abha", "Oslo", "Abha"] {
            table.fold(Reading::new(city, 0.0));
        }

        let cities: Vec<_> = table.entries().iter().map(|e| e.city_lossy()).collect();
        assert_eq!(cities, vec!["Tokyo", "Abha", "Oslo"]);
        assert_eq!(table.total_readings(), 4);
    }
}
