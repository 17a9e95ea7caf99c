pub mod local_aggregator;
pub mod reducer;

pub use local_aggregator::LocalAggregator;
pub use reducer::Reducer;
