//! Storage boundary for decoded logs.
//!
//! A [`LogStore`] receives each [`ParsedLog`] once, assigns identities to the
//! log and its groups, and serves the list/get/delete queries. The decoder
//! never depends on this module.

pub mod memory;
pub mod types;

use crate::parsers::ParsedLog;

pub use memory::MemoryStore;
pub use types::{
    sensor_map, GroupId, GroupRecord, LogId, LogRecord, LogWithGroups, Page, StoreError,
    DEFAULT_PAGE_LIMIT,
};

/// Persistence for decoded logs. Implementations own their locking.
pub trait LogStore: Send + Sync {
    /// Store a log and its groups, returning the new log id
    fn insert(&self, name: &str, log: &ParsedLog) -> Result<LogId, StoreError>;

    fn get(&self, id: LogId) -> Result<LogWithGroups, StoreError>;

    /// Logs in id order
    fn list(&self, page: Page) -> Result<Vec<LogRecord>, StoreError>;

    /// Groups of one log; an id with no groups is `GroupsNotFound`
    fn groups_for(&self, id: LogId) -> Result<Vec<GroupRecord>, StoreError>;

    /// Groups of all logs in id order
    fn list_groups(&self, page: Page) -> Result<Vec<GroupRecord>, StoreError>;

    /// Remove every log and group, returning the number of logs removed
    fn delete_all(&self) -> Result<usize, StoreError>;
}
