//! Contribution payloads exchanged at the collective transfer.
//!
//! A frame is a 4-byte big-endian body length followed by the JSON encoded
//! [`Contribution`]. Each rank sends exactly one frame.

use crate::error::{ProcessingError, Result};
use crate::models::{AggregationTable, CityStats};
use serde::{Deserialize, Serialize};
use std::io::Write;

const FRAME_HEADER_LEN: usize = 4;

/// One rank's share of the collective: its local table plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub rank: usize,
    pub count: usize,
    pub dropped: u64,
    pub entries: Vec<CityStats>,
}

impl Contribution {
    /// Contribution of a rank that produced nothing usable.
    pub fn empty(rank: usize) -> Self {
        Self {
            rank,
            count: 0,
            dropped: 0,
            entries: Vec::new(),
        }
    }

    pub fn from_table(rank: usize, table: AggregationTable) -> Self {
        let dropped = table.dropped();
        let entries = table.into_entries();
        Self {
            rank,
            count: entries.len(),
            dropped,
            entries,
        }
    }

    /// The declared count must describe the entry list exactly.
    pub fn validate(&self) -> Result<()> {
        if self.count != self.entries.len() {
            return Err(ProcessingError::Collective(format!(
                "rank {} declared {} entries but sent {}",
                self.rank,
                self.count,
                self.entries.len()
            )));
        }
        Ok(())
    }
}

pub fn encode_frame(contribution: &Contribution) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(contribution)?;
    let len = u32::try_from(body.len()).map_err(|_| {
        ProcessingError::Collective(format!(
            "rank {} payload of {} bytes exceeds frame limit",
            contribution.rank,
            body.len()
        ))
    })?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + body.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

pub fn write_frame<W: Write>(writer: &mut W, contribution: &Contribution) -> Result<()> {
    writer.write_all(&encode_frame(contribution)?)?;
    writer.flush()?;
    Ok(())
}

/// Decode a buffer holding exactly one frame.
pub fn decode_frame(bytes: &[u8]) -> Result<Contribution> {
    if bytes.len() < FRAME_HEADER_LEN {
        return Err(ProcessingError::Collective(format!(
            "truncated frame header: {} bytes",
            bytes.len()
        )));
    }

    let (header, body) = bytes.split_at(FRAME_HEADER_LEN);
    let mut len = [0u8; FRAME_HEADER_LEN];
    len.copy_from_slice(header);
    let expected = u32::from_be_bytes(len) as usize;
    if body.len() != expected {
        return Err(ProcessingError::Collective(format!(
            "frame declares {} body bytes, received {}",
            expected,
            body.len()
        )));
    }

    let contribution: Contribution = serde_json::from_slice(body)?;
    contribution.validate()?;
    Ok(contribution)
}
