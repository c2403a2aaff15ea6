pub mod encoding;
pub mod error;
pub mod schema;
pub mod types;
pub mod vcds;

use std::path::Path;

pub use encoding::TextEncoding;
pub use error::{DecodeError, DecodeErrorKind};
pub use schema::HeaderSchema;
pub use types::{ParsedLog, Parseable, Reading, SensorGroup, SensorSeries};
pub use vcds::Vcds;

/// Decode a VCDS export using the default header layout
pub fn decode(data: &[u8]) -> Result<ParsedLog, DecodeError> {
    Vcds::default().parse(data)
}

/// Whether a file name carries the `.csv` extension exports are saved with
pub fn is_csv_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
