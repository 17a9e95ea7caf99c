use crate::settings::{SettingsOverrides, Transport};
use crate::utils::constants::RANK_ENV;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "city-stats")]
#[command(about = "Aggregate per-city temperature readings across partitions into a min/mean/max report")]
#[command(version)]
pub struct Cli {
    /// Number of partitions to read, one per worker (1-16)
    pub workers: usize,

    #[arg(
        short = 'n',
        long,
        help = "Number of ranks to launch; ranks past WORKERS stay idle [default: WORKERS]"
    )]
    pub processes: Option<usize>,

    #[arg(short, long, help = "Directory holding measurements-<rank>.txt [default: .]")]
    pub input_dir: Option<PathBuf>,

    #[arg(short, long, help = "Directory receiving results-<WORKERS>.txt [default: .]")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "Maximum number of distinct cities per table [default: 10000]")]
    pub capacity: Option<usize>,

    #[arg(long, help = "Longest accepted city name in bytes [default: 99]")]
    pub max_name_len: Option<usize>,

    #[arg(short, long, value_enum, help = "How ranks are run [default: process]")]
    pub transport: Option<Transport>,

    #[arg(long, help = "Read partitions through a memory map")]
    pub mmap: bool,

    #[arg(short, long, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase logging verbosity")]
    pub verbose: u8,

    /// Set on launched rank processes
    #[arg(long, hide = true, env = RANK_ENV)]
    pub rank: Option<usize>,
}

impl Cli {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            workers: self.workers,
            processes: self.processes,
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            capacity: self.capacity,
            max_name_len: self.max_name_len,
            transport: self.transport,
            use_mmap: self.mmap,
            config_file: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "city-stats",
            "4",
            "-n",
            "6",
            "--input-dir",
            "data",
            "--transport",
            "thread",
            "--mmap",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.workers, 4);
        assert_eq!(cli.processes, Some(6));
        assert_eq!(cli.transport, Some(Transport::Thread));
        assert_eq!(cli.verbose, 2);

        let overrides = cli.overrides();
        assert!(overrides.use_mmap);
        assert_eq!(overrides.input_dir, Some(PathBuf::from("data")));
    }

    #[test]
    fn test_worker_count_must_be_numeric() {
        assert!(Cli::try_parse_from(["city-stats"]).is_err());
        assert!(Cli::try_parse_from(["city-stats", "four"]).is_err());
        assert!(Cli::try_parse_from(["city-stats", "-3"]).is_err());
    }
}
