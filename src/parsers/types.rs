use chrono::NaiveDateTime;
use serde::Serialize;

use super::error::DecodeError;

/// One sample for a sensor. `value` is `None` when the source cell was blank
/// or could not be read as a number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Reading {
    /// Seconds since the start of the capture
    pub timestamp: f64,
    pub value: Option<f64>,
}

impl Reading {
    #[inline]
    pub fn new(timestamp: f64, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }
}

/// A single measurement channel inside a group
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SensorSeries {
    pub name: String,
    pub unit: Option<String>,
    pub readings: Vec<Reading>,
}

impl SensorSeries {
    pub fn new(name: impl Into<String>, unit: Option<String>) -> Self {
        Self {
            name: name.into(),
            unit,
            readings: Vec::new(),
        }
    }

    /// Display unit, empty when the log did not declare one
    pub fn unit(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }
}

/// A named block of sensor columns
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SensorGroup {
    pub name: String,
    pub sensors: Vec<SensorSeries>,
}

impl SensorGroup {
    /// Find a sensor in this group by name
    pub fn sensor(&self, name: &str) -> Option<&SensorSeries> {
        self.sensors.iter().find(|s| s.name == name)
    }
}

/// Decoded capture: header metadata plus every sensor group, left to right
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParsedLog {
    pub captured_at: NaiveDateTime,
    pub vin: String,
    pub motor_type: String,
    pub groups: Vec<SensorGroup>,
}

impl ParsedLog {
    /// Find a group by name
    pub fn group(&self, name: &str) -> Option<&SensorGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Total number of sensors across all groups
    pub fn sensor_count(&self) -> usize {
        self.groups.iter().map(|g| g.sensors.len()).sum()
    }

    /// Total number of readings across all sensors
    pub fn reading_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.sensors.iter())
            .map(|s| s.readings.len())
            .sum()
    }
}

/// Trait for log decoders
pub trait Parseable {
    fn parse(&self, data: &[u8]) -> Result<ParsedLog, DecodeError>;
}
