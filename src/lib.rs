//! vcdslog - Decoder and record store for VCDS diagnostic CSV logs
//!
//! This library turns vendor-exported measuring-block logs into structured
//! time series: capture metadata plus named sensor groups with per-sensor
//! `(timestamp, value)` readings.
//!
//! ## Module Structure
//!
//! - [`parsers`] - Text recovery, header schema and the VCDS log decoder
//! - [`store`] - Storage boundary for decoded logs and an in-memory store
//! - [`settings`] - Settings persistence (header layout)

pub mod parsers;
pub mod settings;
pub mod store;
