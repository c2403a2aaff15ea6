//! VCDS diagnostic CSV log decoder
//!
//! Exported measuring-block logs have a fixed header block followed by data:
//! - Row 0: capture date split over four cells (weekday, day, month, year)
//!   and a composite "<VIN>-VCID<id>" cell
//! - Row 1: motor/ECU variant label
//! - Row 3: group markers ("Group A:", "Group 2", ...), one per column block
//! - Row 4: sensor names
//! - Row 5: sensor units
//! - Row 7 onwards: data rows with the timestamp in a fixed column
//!
//! All positions come from [`HeaderSchema`]. Header problems abort the
//! decode, problems in individual data rows or cells are absorbed.

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};

use super::encoding::recover_text;
use super::error::DecodeError;
use super::schema::{CellRef, HeaderSchema};
use super::types::{ParsedLog, Parseable, Reading, SensorGroup, SensorSeries};

type Rows = Vec<Vec<String>>;

/// Line breaks in `bytes[from..to]`, counting "\r\n" once
fn line_breaks(bytes: &[u8], from: usize, to: usize) -> usize {
    (from..to)
        .filter(|&i| match bytes[i] {
            b'\r' => true,
            b'\n' => i == 0 || bytes[i - 1] != b'\r',
            _ => false,
        })
        .count()
}

/// Parse the joined date cells. The weekday has to be a weekday name but is
/// not checked against the calendar date.
fn parse_capture_date(text: &str, fmt: &str) -> Result<NaiveDate, DecodeError> {
    let invalid = |reason: String| {
        DecodeError::Metadata(format!(
            "cannot parse capture date '{}' as '{}': {}",
            text, fmt, reason
        ))
    };

    let mut parsed = Parsed::new();
    format::parse(&mut parsed, text, StrftimeItems::new(fmt))
        .map_err(|e| invalid(e.to_string()))?;

    match (parsed.year(), parsed.month(), parsed.day()) {
        (Some(year), Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| invalid("no such calendar date".to_string())),
        _ => parsed.to_naive_date().map_err(|e| invalid(e.to_string())),
    }
}

/// Capture metadata from the fixed header cells
#[derive(Clone, Debug, PartialEq)]
struct Metadata {
    captured_at: NaiveDateTime,
    vin: String,
    motor_type: String,
}

/// Sensor column resolved during header alignment
#[derive(Clone, Debug, PartialEq)]
struct SensorSlot {
    name: String,
    unit: Option<String>,
    column: usize,
}

#[derive(Clone, Debug, PartialEq)]
struct GroupLayout {
    name: String,
    sensors: Vec<SensorSlot>,
}

/// Column lookup table built once from the header rows and only read while
/// scanning data rows.
#[derive(Clone, Debug, PartialEq)]
struct ColumnMap {
    groups: Vec<GroupLayout>,
}

impl ColumnMap {
    fn sensor_count(&self) -> usize {
        self.groups.iter().map(|g| g.sensors.len()).sum()
    }

    /// Empty output groups mirroring this layout
    fn empty_groups(&self) -> Vec<SensorGroup> {
        self.groups
            .iter()
            .map(|g| SensorGroup {
                name: g.name.clone(),
                sensors: g
                    .sensors
                    .iter()
                    .map(|s| SensorSeries::new(s.name.clone(), s.unit.clone()))
                    .collect(),
            })
            .collect()
    }
}

/// VCDS log decoder
#[derive(Clone, Debug, Default)]
pub struct Vcds {
    schema: HeaderSchema,
}

impl Vcds {
    /// Create a decoder for a custom header layout
    pub fn new(schema: HeaderSchema) -> Result<Self, DecodeError> {
        schema.validate()?;
        Ok(Self { schema })
    }

    /// Split text into rows of cells. Every physical line outside a quoted
    /// field is a row, so empty lines become empty rows.
    fn tokenize(text: &str) -> Result<Rows, DecodeError> {
        let bytes = text.as_bytes();
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows: Rows = Vec::new();
        let mut record = StringRecord::new();
        let mut consumed = 0;
        let tokenize_err =
            |e: csv::Error| DecodeError::Structure(format!("CSV tokenization failed: {}", e));
        while reader.read_record(&mut record).map_err(tokenize_err)? {
            // The reader skips empty lines in front of a record
            let end = reader.position().byte() as usize;
            let content = consumed
                + bytes[consumed..end]
                    .iter()
                    .take_while(|&&b| b == b'\r' || b == b'\n')
                    .count();
            let blank = line_breaks(bytes, consumed, content);
            rows.extend(std::iter::repeat_with(Vec::new).take(blank));

            rows.push(record.iter().map(str::to_owned).collect());
            consumed = end;
        }

        let trailing = line_breaks(bytes, consumed, bytes.len());
        rows.extend(std::iter::repeat_with(Vec::new).take(trailing));
        Ok(rows)
    }

    fn cell(rows: &[Vec<String>], at: CellRef) -> Option<&str> {
        rows.get(at.row)
            .and_then(|row| row.get(at.col))
            .map(String::as_str)
    }

    fn required_cell<'a>(
        rows: &'a [Vec<String>],
        at: CellRef,
        what: &str,
    ) -> Result<&'a str, DecodeError> {
        Self::cell(rows, at).ok_or_else(|| {
            DecodeError::Metadata(format!(
                "{} cell missing at row {}, column {}",
                what, at.row, at.col
            ))
        })
    }

    fn extract_metadata(&self, rows: &[Vec<String>]) -> Result<Metadata, DecodeError> {
        let range = self.schema.date_cells;
        let mut date_parts = Vec::with_capacity(range.len);
        for col in range.start..range.start + range.len {
            let part = Self::required_cell(rows, CellRef { row: range.row, col }, "Date")?;
            date_parts.push(part.trim());
        }
        let date_text = date_parts.join(" ");
        let date = parse_capture_date(&date_text, &self.schema.date_format)?;

        let composite = Self::required_cell(rows, self.schema.vin_cell, "VIN")?;
        let vin = composite
            .split_once(self.schema.vin_marker.as_str())
            .map(|(vin, _)| vin.trim())
            .ok_or_else(|| {
                DecodeError::Metadata(format!(
                    "VIN cell '{}' has no '{}' marker",
                    composite.trim(),
                    self.schema.vin_marker
                ))
            })?;
        let motor_type = Self::required_cell(rows, self.schema.motor_cell, "Motor type")?.trim();

        Ok(Metadata {
            captured_at: date.and_time(NaiveTime::MIN),
            vin: vin.to_string(),
            motor_type: motor_type.to_string(),
        })
    }

    /// Resolve group spans and sensor columns from the marker, name and unit rows
    fn align_header(&self, rows: &[Vec<String>]) -> Result<ColumnMap, DecodeError> {
        let header_row = move |index: usize| rows.get(index).map(Vec::as_slice).unwrap_or(&[]);
        let group_row = header_row(self.schema.group_row);
        let sensor_row = header_row(self.schema.sensor_row);
        let unit_row = header_row(self.schema.unit_row);

        let width = group_row.len().max(sensor_row.len()).max(unit_row.len());
        let non_blank = |row: &[String], col: usize| {
            row.get(col)
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
        };

        let markers: Vec<usize> = group_row
            .iter()
            .enumerate()
            .filter(|(_, cell)| self.schema.is_group_marker(cell))
            .map(|(col, _)| col)
            .collect();

        let mut groups = Vec::with_capacity(markers.len());
        for (i, &marker) in markers.iter().enumerate() {
            let end = markers.get(i + 1).copied().unwrap_or(width);
            let name = self.schema.group_name(&group_row[marker]);

            let sensors: Vec<SensorSlot> = (marker + 1..end)
                .filter_map(|column| {
                    non_blank(sensor_row, column).map(|name| SensorSlot {
                        name,
                        unit: non_blank(unit_row, column),
                        column,
                    })
                })
                .collect();

            if sensors.is_empty() {
                tracing::debug!("Dropping group '{}' at column {}: no sensors", name, marker);
                continue;
            }
            groups.push(GroupLayout { name, sensors });
        }

        if groups.is_empty() {
            return Err(DecodeError::Structure(format!(
                "no sensor groups found in header row {} (marker '{}')",
                self.schema.group_row, self.schema.group_marker
            )));
        }

        Ok(ColumnMap { groups })
    }

    fn parse_number(cell: &str) -> Option<f64> {
        cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn row_timestamp(&self, row: &[String]) -> Option<f64> {
        if row.iter().all(|c| c.trim().is_empty()) {
            return None;
        }
        row.get(self.schema.timestamp_column)
            .and_then(|c| Self::parse_number(c))
    }

    /// Append one reading per sensor for every data row with a usable timestamp
    fn accumulate(&self, rows: &[Vec<String>], map: &ColumnMap) -> (Vec<SensorGroup>, usize) {
        let mut groups = map.empty_groups();
        let mut skipped = 0;

        for row in rows.iter().skip(self.schema.data_start_row) {
            let Some(timestamp) = self.row_timestamp(row) else {
                skipped += 1;
                continue;
            };

            for (layout, group) in map.groups.iter().zip(groups.iter_mut()) {
                for (slot, series) in layout.sensors.iter().zip(group.sensors.iter_mut()) {
                    if let Some(cell) = row.get(slot.column) {
                        series
                            .readings
                            .push(Reading::new(timestamp, Self::parse_number(cell)));
                    }
                }
            }
        }

        (groups, skipped)
    }
}

impl Parseable for Vcds {
    fn parse(&self, data: &[u8]) -> Result<ParsedLog, DecodeError> {
        let (text, encoding) = recover_text(data, self.schema.fallback_encoding)?;
        tracing::debug!("Decoded {} bytes as {}", data.len(), encoding);

        let rows = Self::tokenize(&text)?;
        if rows.len() < self.schema.min_rows {
            return Err(DecodeError::Structure(format!(
                "expected at least {} rows, found {}",
                self.schema.min_rows,
                rows.len()
            )));
        }

        let meta = self.extract_metadata(&rows)?;
        let map = self.align_header(&rows)?;
        let (groups, skipped) = self.accumulate(&rows, &map);

        let data_rows = rows.len().saturating_sub(self.schema.data_start_row);
        tracing::info!(
            "Parsed VCDS log for {}: {} groups, {} sensors, {} data rows ({} skipped)",
            meta.vin,
            groups.len(),
            map.sensor_count(),
            data_rows - skipped,
            skipped
        );

        Ok(ParsedLog {
            captured_at: meta.captured_at,
            vin: meta.vin,
            motor_type: meta.motor_type,
            groups,
        })
    }
}
