use crate::utils::constants::{DATA_FILE_EXTENSION, PARTITION_FILE_PREFIX, RESULTS_FILE_PREFIX};
use std::path::{Path, PathBuf};

/// Partition read by `rank`: `{input_dir}/measurements-{rank}.txt`
pub fn partition_path(input_dir: &Path, rank: usize) -> PathBuf {
    input_dir.join(format!(
        "{}{}.{}",
        PARTITION_FILE_PREFIX, rank, DATA_FILE_EXTENSION
    ))
}

/// Report written for a run over `workers` partitions: `{output_dir}/results-{workers}.txt`
pub fn results_path(output_dir: &Path, workers: usize) -> PathBuf {
    output_dir.join(format!(
        "{}{}.{}",
        RESULTS_FILE_PREFIX, workers, DATA_FILE_EXTENSION
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_path() {
        let path = partition_path(Path::new("data"), 3);
        assert_eq!(path, PathBuf::from("data/measurements-3.txt"));
    }

    #[test]
    fn test_results_path() {
        let path = results_path(Path::new("."), 16);
        assert_eq!(path.file_name().unwrap(), "results-16.txt");
    }
}
