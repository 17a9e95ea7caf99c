/// A single `city;temperature` observation taken from a partition line.
///
/// The city is kept as the raw bytes found before the delimiter; partitions
/// are not required to be UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub city: Vec<u8>,
    pub temperature: f64,
}

impl Reading {
    pub fn new(city: impl Into<Vec<u8>>, temperature: f64) -> Self {
        Self {
            city: city.into(),
            temperature,
        }
    }
}
