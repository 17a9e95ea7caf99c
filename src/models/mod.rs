pub mod city_stats;
pub mod reading;
pub mod table;

pub use city_stats::CityStats;
pub use reading::Reading;
pub use table::{AggregationTable, FoldOutcome};
