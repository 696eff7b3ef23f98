//! Per-owner write locks.
//!
//! Reading a balance and appending the entry that depends on it must happen
//! as one unit per owner. Every write acquires the locks of all the owners it
//! touches, in `LedgerKey` order, before opening its database transaction.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::LedgerKey;

#[derive(Debug, Default)]
pub(crate) struct OwnerLocks {
    owners: Mutex<HashMap<LedgerKey, Arc<AsyncMutex<()>>>>,
}

/// Guards held for the duration of one write. Dropping it releases them.
#[derive(Debug)]
pub(crate) struct OwnerGuards {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl OwnerLocks {
    pub(crate) async fn acquire<I>(&self, keys: I) -> OwnerGuards
    where
        I: IntoIterator<Item = LedgerKey>,
    {
        let mut keys: Vec<LedgerKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let handles: Vec<Arc<AsyncMutex<()>>> = {
            let mut owners = self.owners.lock().unwrap_or_else(PoisonError::into_inner);
            // Only the map holds an idle lock.
            owners.retain(|_, lock| Arc::strong_count(lock) > 1);
            keys.into_iter()
                .map(|key| Arc::clone(owners.entry(key).or_default()))
                .collect()
        };

        let mut guards = Vec::with_capacity(handles.len());
        for handle in handles {
            guards.push(handle.lock_owned().await);
        }
        OwnerGuards { _guards: guards }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.owners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
