//! Declarative description of the VCDS CSV header layout.
//!
//! The export layout has drifted across tool versions (metadata offsets,
//! date format, first data row). Every position the decoder reads is
//! described here so that a different export can be supported by editing
//! settings instead of code.

use serde::{Deserialize, Serialize};

use super::encoding::TextEncoding;
use super::error::DecodeError;

/// A single cell by row and column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

/// A run of consecutive cells within one row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub row: usize,
    pub start: usize,
    pub len: usize,
}

/// Row roles, fixed cells and marker literals of the export layout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSchema {
    /// Minimum number of rows a file must have
    pub min_rows: usize,
    /// Weekday, day, month and year cells
    pub date_cells: CellRange,
    /// chrono format applied to the date cells joined by single spaces
    pub date_format: String,
    /// Composite "<VIN>-VCID<rest>" cell
    pub vin_cell: CellRef,
    pub vin_marker: String,
    pub motor_cell: CellRef,
    pub group_row: usize,
    pub sensor_row: usize,
    pub unit_row: usize,
    /// Literal prefix that opens a group in the group row
    pub group_marker: String,
    /// Characters stripped from the ends of a group marker to form its name
    pub group_name_trim: Vec<char>,
    pub data_start_row: usize,
    pub timestamp_column: usize,
    /// Encoding tried when the file is not valid UTF-8; `None` disables it
    pub fallback_encoding: Option<TextEncoding>,
}

impl Default for HeaderSchema {
    fn default() -> Self {
        Self {
            min_rows: 7,
            date_cells: CellRange {
                row: 0,
                start: 0,
                len: 4,
            },
            date_format: "%A %d %B %Y".to_string(),
            vin_cell: CellRef { row: 0, col: 5 },
            vin_marker: "-VCID".to_string(),
            motor_cell: CellRef { row: 1, col: 2 },
            group_row: 3,
            sensor_row: 4,
            unit_row: 5,
            group_marker: "Group".to_string(),
            group_name_trim: vec![':'],
            data_start_row: 7,
            timestamp_column: 1,
            fallback_encoding: Some(TextEncoding::Latin1),
        }
    }
}

impl HeaderSchema {
    /// Check that the layout is self-consistent
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.group_marker.trim().is_empty() {
            return Err(DecodeError::Schema("group marker is empty".to_string()));
        }
        if self.vin_marker.is_empty() {
            return Err(DecodeError::Schema("VIN marker is empty".to_string()));
        }
        if self.date_cells.len == 0 {
            return Err(DecodeError::Schema("date cell range is empty".to_string()));
        }

        let last_header_row = self.last_header_row();
        if self.data_start_row <= last_header_row {
            return Err(DecodeError::Schema(format!(
                "data start row {} overlaps header rows (last header row {})",
                self.data_start_row, last_header_row
            )));
        }
        if self.min_rows <= last_header_row {
            return Err(DecodeError::Schema(format!(
                "minimum row count {} cannot hold header row {}",
                self.min_rows, last_header_row
            )));
        }
        Ok(())
    }

    /// Highest row index read as header or metadata
    pub fn last_header_row(&self) -> usize {
        [
            self.date_cells.row,
            self.vin_cell.row,
            self.motor_cell.row,
            self.group_row,
            self.sensor_row,
            self.unit_row,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Whether a group-row cell opens a new group
    pub fn is_group_marker(&self, cell: &str) -> bool {
        cell.trim_start().starts_with(self.group_marker.as_str())
    }

    /// Group name from its marker cell, decoration stripped
    pub fn group_name(&self, cell: &str) -> String {
        cell.trim()
            .trim_matches(|c: char| self.group_name_trim.contains(&c))
            .trim()
            .to_string()
    }
}
