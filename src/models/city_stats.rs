use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Running aggregate for one city: count, bounds and the sum used for the mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityStats {
    pub city: Vec<u8>,
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

impl CityStats {
    /// Entry seeded from a single observation.
    pub fn new(city: impl Into<Vec<u8>>, temperature: f64) -> Self {
        Self {
            city: city.into(),
            count: 1,
            min: temperature,
            max: temperature,
            sum: temperature,
        }
    }

    /// Entry carrying an already aggregated summary, as received from another rank.
    pub fn from_parts(city: impl Into<Vec<u8>>, count: u64, min: f64, max: f64, sum: f64) -> Self {
        Self {
            city: city.into(),
            count,
            min,
            max,
            sum,
        }
    }

    /// Fold one temperature observation into this entry.
    pub fn add_reading(&mut self, temperature: f64) {
        if temperature < self.min {
            self.min = temperature;
        }
        if temperature > self.max {
            self.max = temperature;
        }
        self.sum += temperature;
        self.count += 1;
    }

    /// Fold another entry for the same city, treating it as one weighted observation.
    pub fn merge(&mut self, other: &CityStats) {
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
        self.sum += other.sum;
        self.count += other.count;
    }

    /// City name for log output; bytes that are not UTF-8 are replaced.
    pub fn city_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.city)
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_reading_keeps_bounds() {
        let mut stats = CityStats::new("Hamburg", 12.0);
        for t in [3.4, -7.5, 25.1, 12.0] {
            stats.add_reading(t);
            assert!(stats.min <= t && t <= stats.max);
        }

        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, -7.5);
        assert_eq!(stats.max, 25.1);
        assert!((stats.sum - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_weighted_entries() {
        let mut a = CityStats::from_parts("X", 3, 1.0, 5.0, 9.0);
        let b = CityStats::from_parts("X", 2, -1.0, 4.0, 3.0);
        a.merge(&b);

        assert_eq!(a, CityStats::from_parts("X", 5, -1.0, 5.0, 12.0));
        assert!((a.mean() - 2.4).abs() < 1e-12);
    }
}
