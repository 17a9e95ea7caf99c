use crate::error::{ProcessingError, Result};
use crate::models::{AggregationTable, CityStats};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Renders the global table as sorted `city=min/mean/max` lines.
///
/// Numbers are rounded half away from zero at one decimal place, so `20.25`
/// prints as `20.3` and `-0.04` as `0.0`. City names are written back exactly
/// as they appeared in the partitions.
pub struct ReportWriter;

impl ReportWriter {
    pub fn new() -> Self {
        Self
    }

    /// Entries ordered by the raw bytes of the city name.
    pub fn sorted_entries<'a>(&self, table: &'a AggregationTable) -> Vec<&'a CityStats> {
        let mut entries: Vec<&CityStats> = table.entries().iter().collect();
        entries.sort_unstable_by(|a, b| a.city.cmp(&b.city));
        entries
    }

    pub fn format_line(&self, stats: &CityStats) -> Vec<u8> {
        let mut line = stats.city.clone();
        line.extend_from_slice(
            format!(
                "={:.1}/{:.1}/{:.1}",
                round_one_decimal(stats.min),
                round_one_decimal(stats.mean()),
                round_one_decimal(stats.max)
            )
            .as_bytes(),
        );
        line
    }

    /// The complete report body, one newline-terminated line per city.
    pub fn render(&self, table: &AggregationTable) -> Vec<u8> {
        let mut report = Vec::new();
        for stats in self.sorted_entries(table) {
            report.extend_from_slice(&self.format_line(stats));
            report.push(b'\n');
        }
        report
    }

    /// Write the report to `path`, replacing any existing file only once the
    /// whole report is on disk.
    pub fn write_report(&self, table: &AggregationTable, path: &Path) -> Result<()> {
        let output_error = |source| ProcessingError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(output_error)?;
        tmp.write_all(&self.render(table)).map_err(output_error)?;
        tmp.flush().map_err(output_error)?;
        // NamedTempFile creates files as 0600
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(REPORT_MODE))
                .map_err(output_error)?;
        }
        tmp.persist(path).map_err(|e| output_error(e.error))?;

        info!(report = %path.display(), cities = table.len(), "Report written");
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
const REPORT_MODE: u32 = 0o644;

/// Magnitude from which every f64 is already a whole number.
const WHOLE_NUMBER_BOUND: f64 = 1e15;

fn round_one_decimal(value: f64) -> f64 {
    // Scaling would overflow near f64::MAX
    if value.abs() >= WHOLE_NUMBER_BOUND {
        return value;
    }
    // Adding 0.0 turns a rounded -0.0 into 0.0
    (value * 10.0).round() / 10.0 + 0.0
}
