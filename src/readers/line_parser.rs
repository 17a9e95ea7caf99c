use crate::models::Reading;
use crate::utils::constants::{DEFAULT_MAX_NAME_LEN, FIELD_DELIMITER};

/// Parses `<city>;<temperature>` lines.
///
/// Anything that does not match the grammar yields `None` so the caller can
/// skip it and keep streaming. The city is split at the first delimiter and
/// kept byte-for-byte; the temperature may carry surrounding ASCII whitespace
/// (including a trailing `\r`) but must otherwise be a finite decimal number.
#[derive(Debug, Clone, Copy)]
pub struct LineParser {
    max_name_len: usize,
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }

    pub fn with_max_name_len(max_name_len: usize) -> Self {
        Self { max_name_len }
    }

    pub fn parse_line(&self, line: &[u8]) -> Option<Reading> {
        let split = line.iter().position(|&b| b == FIELD_DELIMITER)?;
        let (name, rest) = line.split_at(split);
        let value = &rest[1..];

        if name.is_empty() || name.len() > self.max_name_len {
            return None;
        }

        let temperature = parse_temperature(value)?;

        Some(Reading::new(name, temperature))
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_temperature(field: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(field).ok()?.trim_matches(|c: char| c.is_ascii_whitespace());

    // `f64::from_str` also accepts "inf" and "NaN"; only plain decimals are readings
    if !text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
    {
        return None;
    }

    let value = text.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
