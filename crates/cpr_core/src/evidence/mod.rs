use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Bookkeeping for one live blob.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BlobRecord {
    pub id: u64,
    pub len: u64,
    pub sha256: String,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: BTreeMap<u64, BlobRecord>,
}

fn lock(inner: &Mutex<RegistryInner>) -> MutexGuard<'_, RegistryInner> {
    // The map is only mutated by single insert/remove calls, so a poisoned lock still holds a
    // consistent view.
    match inner.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Session-scoped registry of evidence content.
///
/// Every blob handed out is tracked until its last handle is dropped; the drop removes the
/// record exactly once. `live()` is what a restart is checked against.
#[derive(Debug, Clone, Default)]
pub struct EvidenceRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl EvidenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, bytes: Vec<u8>) -> EvidenceBlob {
        let sha256 = hex::encode(Sha256::digest(&bytes));
        let len = bytes.len() as u64;
        let id = {
            let mut inner = lock(&self.inner);
            inner.next_id += 1;
            let id = inner.next_id;
            inner.live.insert(
                id,
                BlobRecord {
                    id,
                    len,
                    sha256: sha256.clone(),
                },
            );
            id
        };
        log::debug!("evidence blob {id} acquired ({len} bytes)");
        EvidenceBlob {
            guard: Arc::new(BlobGuard {
                id,
                sha256,
                bytes,
                registry: Arc::downgrade(&self.inner),
            }),
        }
    }

    pub fn live(&self) -> Vec<BlobRecord> {
        lock(&self.inner).live.values().cloned().collect()
    }

    pub fn live_count(&self) -> usize {
        lock(&self.inner).live.len()
    }

    pub fn is_live(&self, id: u64) -> bool {
        lock(&self.inner).live.contains_key(&id)
    }
}

struct BlobGuard {
    id: u64,
    sha256: String,
    bytes: Vec<u8>,
    registry: Weak<Mutex<RegistryInner>>,
}

impl Drop for BlobGuard {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if lock(&registry).live.remove(&self.id).is_some() {
            log::debug!("evidence blob {} released", self.id);
        } else {
            log::warn!("evidence blob {} was not registered at release", self.id);
        }
    }
}

/// Shared handle to evidence content. Cloning shares the content; the registry entry is
/// released when the last clone goes away.
#[derive(Clone)]
pub struct EvidenceBlob {
    guard: Arc<BlobGuard>,
}

impl EvidenceBlob {
    pub fn id(&self) -> u64 {
        self.guard.id
    }

    pub fn len(&self) -> u64 {
        self.guard.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.guard.bytes.is_empty()
    }

    pub fn sha256(&self) -> &str {
        &self.guard.sha256
    }

    pub fn bytes(&self) -> &[u8] {
        &self.guard.bytes
    }
}

impl PartialEq for EvidenceBlob {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.guard, &other.guard)
    }
}

impl Eq for EvidenceBlob {}

impl fmt::Debug for EvidenceBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvidenceBlob")
            .field("id", &self.guard.id)
            .field("len", &self.guard.bytes.len())
            .field("sha256", &self.guard.sha256)
            .finish()
    }
}

impl Serialize for EvidenceBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BlobRecord {
            id: self.guard.id,
            len: self.len(),
            sha256: self.guard.sha256.clone(),
        }
        .serialize(serializer)
    }
}
