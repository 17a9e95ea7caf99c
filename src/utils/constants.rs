/// Largest worker count / process group size a run accepts
pub const MAX_PARTITIONS: usize = 16;

/// Partition and report file names
pub const PARTITION_FILE_PREFIX: &str = "measurements-";
pub const RESULTS_FILE_PREFIX: &str = "results-";
pub const DATA_FILE_EXTENSION: &str = "txt";

/// Line format
pub const FIELD_DELIMITER: u8 = b';';
pub const DEFAULT_MAX_NAME_LEN: usize = 99;

/// Table defaults
pub const DEFAULT_TABLE_CAPACITY: usize = 10_000;

/// Processing defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Environment used to hand work to rank processes
pub const ENV_PREFIX: &str = "CITY_STATS";
pub const RANK_ENV: &str = "CITY_STATS_RANK";
pub const WORKER_SETTINGS_ENV: &str = "CITY_STATS_WORKER_SETTINGS";

/// Rank that merges contributions and writes the report
pub const COORDINATOR_RANK: usize = 0;
