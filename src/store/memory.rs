use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::types::{GroupId, GroupRecord, LogId, LogRecord, LogWithGroups, Page, StoreError};
use super::LogStore;
use crate::parsers::ParsedLog;

#[derive(Debug)]
struct Tables {
    next_log_id: LogId,
    next_group_id: GroupId,
    logs: BTreeMap<LogId, LogRecord>,
    groups: BTreeMap<GroupId, GroupRecord>,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            next_log_id: 1,
            next_group_id: 1,
            logs: BTreeMap::new(),
            groups: BTreeMap::new(),
        }
    }
}

/// Process-local store. Ids start at 1 and are never reused, including
/// after [`LogStore::delete_all`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

impl LogStore for MemoryStore {
    fn insert(&self, name: &str, log: &ParsedLog) -> Result<LogId, StoreError> {
        let mut tables = self.write()?;

        let log_id = tables.next_log_id;
        tables.next_log_id += 1;
        tables.logs.insert(log_id, LogRecord::new(log_id, name, log));

        for group in &log.groups {
            let group_id = tables.next_group_id;
            tables.next_group_id += 1;
            tables
                .groups
                .insert(group_id, GroupRecord::new(group_id, log_id, group));
        }

        tracing::debug!(
            "Stored log {} ({}) with {} groups",
            log_id,
            log.vin,
            log.groups.len()
        );
        Ok(log_id)
    }

    fn get(&self, id: LogId) -> Result<LogWithGroups, StoreError> {
        let tables = self.read()?;
        let log = tables
            .logs
            .get(&id)
            .cloned()
            .ok_or(StoreError::LogNotFound(id))?;
        let groups = tables
            .groups
            .values()
            .filter(|g| g.log_id == id)
            .cloned()
            .collect();
        Ok(LogWithGroups { log, groups })
    }

    fn list(&self, page: Page) -> Result<Vec<LogRecord>, StoreError> {
        let tables = self.read()?;
        Ok(page.apply(tables.logs.values().cloned()))
    }

    fn groups_for(&self, id: LogId) -> Result<Vec<GroupRecord>, StoreError> {
        let tables = self.read()?;
        let groups: Vec<GroupRecord> = tables
            .groups
            .values()
            .filter(|g| g.log_id == id)
            .cloned()
            .collect();
        if groups.is_empty() {
            return Err(StoreError::GroupsNotFound(id));
        }
        Ok(groups)
    }

    fn list_groups(&self, page: Page) -> Result<Vec<GroupRecord>, StoreError> {
        let tables = self.read()?;
        Ok(page.apply(tables.groups.values().cloned()))
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        let mut tables = self.write()?;
        let removed = tables.logs.len();
        tables.groups.clear();
        tables.logs.clear();
        tracing::info!("Deleted {} logs", removed);
        Ok(removed)
    }
}
