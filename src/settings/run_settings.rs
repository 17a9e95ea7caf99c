use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DEFAULT_MAX_NAME_LEN, DEFAULT_TABLE_CAPACITY, ENV_PREFIX};
use clap::ValueEnum;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// How ranks are launched and how their tables reach the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// One OS process per rank, tables framed over stdout pipes
    Process,
    /// One thread per rank inside the coordinator process
    Thread,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Process => "process",
            Transport::Thread => "thread",
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RunSettings {
    #[validate(range(min = 1, max = 16, message = "Number of workers must be between 1 and 16"))]
    pub workers: usize,

    #[validate(range(min = 1, max = 16, message = "Number of processes must be between 1 and 16"))]
    pub processes: Option<usize>,

    pub input_dir: PathBuf,

    pub output_dir: PathBuf,

    #[validate(range(min = 1, message = "Table capacity must be at least 1"))]
    pub capacity: usize,

    #[validate(range(min = 1, max = 4096, message = "City name limit must be between 1 and 4096 bytes"))]
    pub max_name_len: usize,

    pub transport: Transport,

    pub use_mmap: bool,
}

/// Values supplied on the command line; `None` leaves the layer below in place.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub workers: usize,
    pub processes: Option<usize>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub capacity: Option<usize>,
    pub max_name_len: Option<usize>,
    pub transport: Option<Transport>,
    pub use_mmap: bool,
    pub config_file: Option<PathBuf>,
}

impl RunSettings {
    /// Resolve settings from defaults, an optional config file, `CITY_STATS_*`
    /// environment variables and command line overrides, in that order.
    pub fn load(overrides: &SettingsOverrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("input_dir", ".")?
            .set_default("output_dir", ".")?
            .set_default("capacity", DEFAULT_TABLE_CAPACITY as i64)?
            .set_default("max_name_len", DEFAULT_MAX_NAME_LEN as i64)?
            .set_default("transport", Transport::Process.as_str())?
            .set_default("use_mmap", false)?;

        if let Some(path) = &overrides.config_file {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        let settings: RunSettings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override("workers", overrides.workers as i64)?
            .set_override_option("processes", overrides.processes.map(|p| p as i64))?
            .set_override_option("input_dir", path_value("input", &overrides.input_dir)?)?
            .set_override_option("output_dir", path_value("output", &overrides.output_dir)?)?
            .set_override_option("capacity", overrides.capacity.map(|c| c as i64))?
            .set_override_option("max_name_len", overrides.max_name_len.map(|n| n as i64))?
            .set_override_option("transport", overrides.transport.map(|t| t.as_str()))?
            .set_override_option("use_mmap", overrides.use_mmap.then_some(true))?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Number of ranks launched; ranks at or past `workers` stay idle.
    pub fn group_size(&self) -> usize {
        self.processes.unwrap_or(self.workers)
    }

    /// Whether `rank` has a partition assigned.
    pub fn reads_partition(&self, rank: usize) -> bool {
        rank < self.workers
    }
}

/// Directory overrides pass through the config layer as strings, so they must be UTF-8.
fn path_value(kind: &str, path: &Option<PathBuf>) -> Result<Option<String>> {
    path.as_ref()
        .map(|p| {
            p.to_str().map(str::to_owned).ok_or_else(|| {
                ProcessingError::Config(format!(
                    "{} directory is not valid UTF-8: {}",
                    kind,
                    p.display()
                ))
            })
        })
        .transpose()
}
