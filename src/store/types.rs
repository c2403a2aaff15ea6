//! Record types for stored logs and their sensor groups.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{map::Entry, Map, Value};
use thiserror::Error;

use crate::parsers::{ParsedLog, SensorGroup};

pub type LogId = u64;
pub type GroupId = u64;

/// Default page size for list queries
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Errors returned by a [`super::LogStore`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Log {0} not found")]
    LogNotFound(LogId),

    #[error("Groups not found for log {0}")]
    GroupsNotFound(LogId),

    /// A writer panicked while holding the store lock
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Offset/limit pagination
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Page {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Apply this page to an ordered iterator
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

/// Parent record for one uploaded capture
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: LogId,
    pub name: String,
    pub description: String,
    pub captured_at: NaiveDateTime,
    pub vin: String,
    pub motor_type: String,
}

impl LogRecord {
    pub fn new(id: LogId, name: &str, log: &ParsedLog) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: format!(
                "Log for VIN {} with motor type {}",
                log.vin, log.motor_type
            ),
            captured_at: log.captured_at,
            vin: log.vin.clone(),
            motor_type: log.motor_type.clone(),
        }
    }
}

/// Child record for one sensor group of a stored log
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub log_id: LogId,
    pub name: String,
    /// Sensor name -> `[{"timestamp": .., "value": ..}, ...]`
    pub sensors: Map<String, Value>,
}

impl GroupRecord {
    pub fn new(id: GroupId, log_id: LogId, group: &SensorGroup) -> Self {
        Self {
            id,
            log_id,
            name: group.name.clone(),
            sensors: sensor_map(group),
        }
    }
}

/// A log together with all of its groups
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogWithGroups {
    #[serde(flatten)]
    pub log: LogRecord,
    pub groups: Vec<GroupRecord>,
}

/// Serialize a group's readings keyed by sensor name, in column order.
/// Sensors sharing a name have their readings appended to one entry.
pub fn sensor_map(group: &SensorGroup) -> Map<String, Value> {
    let mut map = Map::new();
    for sensor in &group.sensors {
        let readings = sensor.readings.iter().map(|r| {
            let mut reading = Map::new();
            reading.insert("timestamp".to_string(), Value::from(r.timestamp));
            reading.insert("value".to_string(), r.value.map_or(Value::Null, Value::from));
            Value::Object(reading)
        });

        match map.entry(sensor.name.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(Value::Array(readings.collect()));
            }
            Entry::Occupied(mut entry) => {
                if let Value::Array(existing) = entry.get_mut() {
                    existing.extend(readings);
                }
            }
        }
    }
    map
}
