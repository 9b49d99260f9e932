//! In-memory cache of parsed identity files
//!
//! One slot per resource. A slot is either empty or holds the complete
//! result of the last read that populated it. There is no expiry; a slot
//! only empties when a mutation invalidates it.
//!
//! Every invalidation bumps the slot generation. A read-through records the
//! generation before touching the file and only stores its result if the
//! generation is unchanged, so a read that overlapped a mutation can never
//! put pre-mutation content back into the cache.

use crate::directory::records::{DirectoryRecord, GroupRecord, Resource, UserRecord};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};

#[derive(Debug)]
struct SlotState<R> {
    records: Option<Arc<Vec<R>>>,
    generation: u64,
}

/// Cache slot for a single resource
#[derive(Debug)]
pub struct CacheSlot<R> {
    state: RwLock<SlotState<R>>,
    fill: Mutex<()>,
}

impl<R> CacheSlot<R> {
    fn new() -> Self {
        Self {
            state: RwLock::new(SlotState {
                records: None,
                generation: 0,
            }),
            fill: Mutex::new(()),
        }
    }

    /// Get the cached records, if present
    pub async fn get(&self) -> Option<Arc<Vec<R>>> {
        self.state.read().await.records.clone()
    }

    /// Replace the cached records unconditionally
    pub async fn set(&self, records: Arc<Vec<R>>) {
        self.state.write().await.records = Some(records);
    }

    /// Store records read at `generation`, unless invalidated since
    ///
    /// Returns whether the records were stored.
    pub async fn store_if_current(&self, generation: u64, records: Arc<Vec<R>>) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        state.records = Some(records);
        true
    }

    /// Drop the cached records
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.records = None;
        state.generation += 1;
    }

    /// Current invalidation generation
    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// Whether records are currently cached
    pub async fn is_present(&self) -> bool {
        self.state.read().await.records.is_some()
    }

    /// Hold the fill guard so only one caller reads the file at a time
    pub async fn fill_guard(&self) -> MutexGuard<'_, ()> {
        self.fill.lock().await
    }
}

/// Record types that have a slot in [`DirectoryCache`]
pub trait Cached: DirectoryRecord {
    /// Select this record type's slot
    fn slot(cache: &DirectoryCache) -> &CacheSlot<Self>;
}

impl Cached for UserRecord {
    fn slot(cache: &DirectoryCache) -> &CacheSlot<Self> {
        &cache.users
    }
}

impl Cached for GroupRecord {
    fn slot(cache: &DirectoryCache) -> &CacheSlot<Self> {
        &cache.groups
    }
}

/// Cache of the parsed account and group files
#[derive(Debug)]
pub struct DirectoryCache {
    users: CacheSlot<UserRecord>,
    groups: CacheSlot<GroupRecord>,
}

impl DirectoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            users: CacheSlot::new(),
            groups: CacheSlot::new(),
        }
    }

    /// Get the slot for a record type
    pub fn slot<R: Cached>(&self) -> &CacheSlot<R> {
        R::slot(self)
    }

    /// Get cached records of one type
    pub async fn get<R: Cached>(&self) -> Option<Arc<Vec<R>>> {
        self.slot::<R>().get().await
    }

    /// Replace cached records of one type
    pub async fn set<R: Cached>(&self, records: Vec<R>) {
        self.slot::<R>().set(Arc::new(records)).await
    }

    /// Clear one resource; idempotent
    pub async fn invalidate(&self, resource: Resource) {
        match resource {
            Resource::Users => self.users.invalidate().await,
            Resource::Groups => self.groups.invalidate().await,
        }
    }

    /// Clear every resource
    pub async fn invalidate_all(&self) {
        self.users.invalidate().await;
        self.groups.invalidate().await;
    }

    /// Whether a resource is currently cached
    pub async fn is_cached(&self, resource: Resource) -> bool {
        match resource {
            Resource::Users => self.users.is_present().await,
            Resource::Groups => self.groups.is_present().await,
        }
    }
}

impl Default for DirectoryCache {
    fn default() -> Self {
        Self::new()
    }
}
