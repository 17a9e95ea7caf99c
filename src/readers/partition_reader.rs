use crate::error::{ProcessingError, Result};
use crate::models::Reading;
use crate::readers::LineParser;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Line accounting for one partition pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub lines: u64,
    pub readings: u64,
    pub skipped: u64,
}

impl LineCounts {
    fn record(&mut self, parsed: bool) {
        self.lines += 1;
        if parsed {
            self.readings += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// Streams a partition file through a [`LineParser`], handing every valid
/// reading to a caller-supplied sink.
pub struct PartitionReader {
    parser: LineParser,
    use_mmap: bool,
}

impl PartitionReader {
    pub fn new() -> Self {
        Self {
            parser: LineParser::new(),
            use_mmap: false,
        }
    }

    pub fn with_parser(parser: LineParser) -> Self {
        Self {
            parser,
            use_mmap: false,
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read every line of `path`, calling `sink` for each parsed reading.
    pub fn read_partition<F>(&self, path: &Path, sink: F) -> Result<LineCounts>
    where
        F: FnMut(Reading),
    {
        let file = File::open(path).map_err(|source| ProcessingError::PartitionRead {
            path: path.to_path_buf(),
            source,
        })?;

        if self.use_mmap {
            self.read_mmap(path, &file, sink)
        } else {
            self.read_buffered(path, file, sink)
        }
    }

    /// Read using buffered I/O
    fn read_buffered<F>(&self, path: &Path, file: File, mut sink: F) -> Result<LineCounts>
    where
        F: FnMut(Reading),
    {
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut counts = LineCounts::default();
        let mut line = Vec::with_capacity(128);

        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(|source| ProcessingError::PartitionRead {
                    path: path.to_path_buf(),
                    source,
                })?;
            if read == 0 {
                break;
            }

            let parsed = self.parser.parse_line(strip_newline(&line));
            counts.record(parsed.is_some());
            if let Some(reading) = parsed {
                sink(reading);
            }
        }

        Ok(counts)
    }

    /// Read using memory-mapped I/O for large files
    fn read_mmap<F>(&self, path: &Path, file: &File, mut sink: F) -> Result<LineCounts>
    where
        F: FnMut(Reading),
    {
        let read_error = |source| ProcessingError::PartitionRead {
            path: path.to_path_buf(),
            source,
        };
        let mut counts = LineCounts::default();

        if file.metadata().map_err(read_error)?.len() == 0 {
            return Ok(counts);
        }
        let mmap = unsafe { Mmap::map(file) }.map_err(read_error)?;

        let data: &[u8] = &mmap;
        let data = data.strip_suffix(b"\n").unwrap_or(data);
        if data.is_empty() {
            return Ok(counts);
        }

        for line in data.split(|&b| b == b'\n') {
            let parsed = self.parser.parse_line(line);
            counts.record(parsed.is_some());
            if let Some(reading) = parsed {
                sink(reading);
            }
        }

        Ok(counts)
    }
}

impl Default for PartitionReader {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_newline(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n").unwrap_or(line)
}
