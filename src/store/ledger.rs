use anyhow::Result;

use crate::db::KvStore;
use crate::error::AppError;
use crate::models::persisted::{decode_list, encode_list};
use crate::models::{LedgerItem, LedgerKind};

/// Ordered list of ledger lines for one side of the book.
pub struct LedgerStore<'a> {
    kv: &'a dyn KvStore,
    kind: LedgerKind,
    items: Vec<LedgerItem>,
}

impl<'a> LedgerStore<'a> {
    pub fn load(kv: &'a dyn KvStore, kind: LedgerKind) -> Self {
        let items = match kv.get(kind.key()) {
            Ok(Some(raw)) => decode_list(&raw).unwrap_or_else(|e| {
                log::warn!("Could not read {} items, starting empty: {:#}", kind.key(), e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Could not load {}: {:#}", kind.key(), e);
                Vec::new()
            }
        };
        Self { kv, kind, items }
    }

    pub fn items(&self) -> &[LedgerItem] {
        &self.items
    }

    pub fn total(&self) -> f64 {
        self.items.iter().filter_map(|i| i.amount).sum()
    }

    pub fn add(&mut self, item: LedgerItem) {
        self.items.push(item);
        self.persist();
    }

    pub fn update(&mut self, index: usize, item: LedgerItem) -> Result<(), AppError> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(AppError::IndexOutOfRange { index, len })?;
        *slot = item;
        self.persist();
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<LedgerItem, AppError> {
        if index >= self.items.len() {
            return Err(AppError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let removed = self.items.remove(index);
        self.persist();
        Ok(removed)
    }

    fn persist(&self) {
        let res = encode_list(&self.items).and_then(|raw| self.kv.set(self.kind.key(), &raw));
        if let Err(e) = res {
            log::warn!("Failed to save {}: {:#}", self.kind.key(), e);
        }
    }
}
