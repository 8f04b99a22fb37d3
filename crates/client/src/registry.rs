//! In-flight transfer registry with single and bulk cancellation.
//!
//! One entry per file name. Entries are generation-numbered so a finished
//! transfer can never evict a newer transfer registered under the same key.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Cancellation capability for one in-flight transfer.
///
/// Created by [`TransferRegistry::begin`]; the owning transfer passes the
/// token to its transport call and hands the handle back to
/// [`TransferRegistry::finish`] when the call settles.
#[derive(Debug, Clone)]
pub struct TransferHandle {
    key: String,
    generation: u64,
    cancel: CancellationToken,
}

impl TransferHandle {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// A clone of the transfer's cancellation token.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

#[derive(Debug)]
struct ActiveTransfer {
    generation: u64,
    cancel: CancellationToken,
}

/// Registry of in-flight transfers, keyed by file name.
///
/// An owned instance lives on the client — it is not ambient global state.
/// All access is serialized behind a mutex.
#[derive(Debug, Default)]
pub struct TransferRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_generation: u64,
    active: HashMap<String, ActiveTransfer>,
}

impl TransferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new in-flight transfer for `key`.
    ///
    /// Duplicate keys cancel-and-replace: a transfer already registered
    /// under `key` has its token cancelled and its entry evicted before the
    /// new one is inserted, so at most one live entry per key exists.
    pub fn begin(&self, key: &str) -> TransferHandle {
        let mut inner = self.inner.lock().unwrap();
        let generation = inner.next_generation;
        inner.next_generation += 1;

        let cancel = CancellationToken::new();
        if let Some(previous) = inner.active.insert(
            key.to_string(),
            ActiveTransfer {
                generation,
                cancel: cancel.clone(),
            },
        ) {
            previous.cancel.cancel();
            warn!(key, "replaced an in-flight transfer for the same file");
        }

        TransferHandle {
            key: key.to_string(),
            generation,
            cancel,
        }
    }

    /// Removes the handle's entry. Returns `false` when the entry was
    /// already gone or has been replaced by a newer transfer.
    pub fn finish(&self, handle: &TransferHandle) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.active.get(&handle.key) {
            Some(active) if active.generation == handle.generation => {
                inner.active.remove(&handle.key);
                true
            }
            _ => false,
        }
    }

    /// Cancels the transfer registered under `key`, removing its entry.
    /// Returns whether an entry existed.
    pub fn cancel(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.active.remove(key) {
            Some(active) => {
                active.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every registered transfer and returns how many there were.
    /// Safe to call with zero entries.
    pub fn cancel_all(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let count = inner.active.len();
        for (_, active) in inner.active.drain() {
            active.cancel.cancel();
        }
        count
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().unwrap().active.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
