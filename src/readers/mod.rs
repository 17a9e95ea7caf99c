pub mod line_parser;
pub mod partition_reader;

pub use line_parser::LineParser;
pub use partition_reader::{LineCounts, PartitionReader};
