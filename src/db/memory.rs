use anyhow::{anyhow, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::db::repository::KvStore;

/// In-memory store for tests. Writes can be switched to fail to exercise the
/// swallowed-write path.
#[derive(Default)]
pub struct MemoryKv {
    map: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(&str, &str)]) -> Self {
        let kv = Self::new();
        for (k, v) in entries {
            kv.map.borrow_mut().insert(k.to_string(), v.to_string());
        }
        kv
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Successful `set`/`remove` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(anyhow!("storage unavailable"));
        }
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(anyhow!("storage unavailable"));
        }
        self.map.borrow_mut().remove(key);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
