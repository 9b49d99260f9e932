//! Identity directory: the parsed account and group files
//!
//! Combines the file reader with the cache. Lookups are read-through: a
//! miss reads the backing file once, stores the result and then scans it.
//!
//! # Concurrent misses
//!
//! | `single_flight` | Behavior |
//! |-----------------|----------|
//! | `true` | Callers that miss together share one file read |
//! | `false` | Each missing caller reads; the last completed store wins |

pub mod cache;
pub mod reader;
pub mod records;

pub use cache::{Cached, DirectoryCache};
pub use reader::{parse_group, parse_passwd, DirectoryReader};
pub use records::{DirectoryRecord, GroupRecord, Resource, UserRecord};

use crate::error::{UserError, UserResult};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Counters for cache behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Requests served from the cache
    pub hits: u64,
    /// Reads of a backing file
    pub reads: u64,
}

/// Cached view of the identity files
#[derive(Debug)]
pub struct Directory {
    reader: DirectoryReader,
    cache: DirectoryCache,
    single_flight: bool,
    hits: AtomicU64,
    reads: AtomicU64,
}

impl Directory {
    /// Create a directory over a reader, with single-flight reads enabled
    pub fn new(reader: DirectoryReader) -> Self {
        Self {
            reader,
            cache: DirectoryCache::new(),
            single_flight: true,
            hits: AtomicU64::new(0),
            reads: AtomicU64::new(0),
        }
    }

    /// Enable or disable sharing of concurrent cache-miss reads
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    /// Get the underlying cache
    pub fn cache(&self) -> &DirectoryCache {
        &self.cache
    }

    /// Get the underlying reader
    pub fn reader(&self) -> &DirectoryReader {
        &self.reader
    }

    /// Snapshot of the hit and read counters
    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats {
            hits: self.hits.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
        }
    }

    /// Get every record of one type, reading the file on a miss
    pub async fn records<R: Cached>(&self) -> UserResult<Arc<Vec<R>>> {
        if let Some(records) = self.cached::<R>().await {
            return Ok(records);
        }

        if !self.single_flight {
            return self.read_through::<R>().await;
        }

        let _guard = self.cache.slot::<R>().fill_guard().await;
        // Another caller may have filled the slot while we waited
        if let Some(records) = self.cached::<R>().await {
            return Ok(records);
        }
        self.read_through::<R>().await
    }

    /// Find the first record whose key matches, reading the file on a miss
    pub async fn find<R, K, F>(&self, key: &K, key_fn: F) -> UserResult<Option<R>>
    where
        R: Cached,
        K: PartialEq + ?Sized,
        F: Fn(&R) -> &K,
    {
        let records = self.records::<R>().await?;
        Ok(records.iter().find(|&r| key_fn(r) == key).cloned())
    }

    /// Like [`Directory::find`], but a missing record is `NotFound`
    pub async fn lookup<R, K, F>(&self, key: &K, key_fn: F) -> UserResult<R>
    where
        R: Cached,
        K: PartialEq + Display + ?Sized,
        F: Fn(&R) -> &K,
    {
        self.find(key, key_fn)
            .await?
            .ok_or_else(|| UserError::NotFound {
                resource: R::RESOURCE,
                key: key.to_string(),
            })
    }

    async fn cached<R: Cached>(&self) -> Option<Arc<Vec<R>>> {
        let records = self.cache.get::<R>().await?;
        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!("Cache hit for {}", R::RESOURCE);
        Some(records)
    }

    async fn read_through<R: Cached>(&self) -> UserResult<Arc<Vec<R>>> {
        let slot = self.cache.slot::<R>();
        let generation = slot.generation().await;

        debug!("Cache miss for {}, reading backing file", R::RESOURCE);
        self.reads.fetch_add(1, Ordering::Relaxed);
        let records = Arc::new(self.reader.read::<R>().await?);

        if !slot.store_if_current(generation, Arc::clone(&records)).await {
            debug!(
                "{} invalidated during read, not caching result",
                R::RESOURCE
            );
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use futures_util::future::join_all;
    use tempfile::TempDir;

    const PASSWD: &str = "root:x:0:0:root:/root:/bin/bash\n\
                          alice:x:1001:1001:Alice A,,,:/home/alice:/bin/bash\n\
                          alice:x:1501:1501:Shadowed:/home/alice2:/bin/sh\n";
    const GROUP: &str = "root:x:0:\ndev:x:2000:alice\n";

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("passwd"), PASSWD).unwrap();
            std::fs::write(dir.path().join("group"), GROUP).unwrap();
            Self { dir }
        }

        fn directory(&self) -> Directory {
            Directory::new(DirectoryReader::new(
                self.dir.path().join("passwd"),
                self.dir.path().join("group"),
            ))
        }

        fn write_passwd(&self, content: &str) {
            std::fs::write(self.dir.path().join("passwd"), content).unwrap();
        }
    }

    #[tokio::test]
    async fn second_read_is_cache_hit() {
        let fx = Fixture::new();
        let directory = fx.directory();

        let first = directory.records::<UserRecord>().await.unwrap();
        fx.write_passwd("bob:x:1002:1002::/home/bob:/bin/sh\n");
        let second = directory.records::<UserRecord>().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(directory.stats(), DirectoryStats { hits: 1, reads: 1 });
    }

    #[tokio::test]
    async fn invalidation_forces_reread() {
        let fx = Fixture::new();
        let directory = fx.directory();

        directory.records::<UserRecord>().await.unwrap();
        fx.write_passwd("bob:x:1002:1002::/home/bob:/bin/sh\n");
        directory.cache().invalidate(Resource::Users).await;

        let users = directory.records::<UserRecord>().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "bob");
        assert_eq!(directory.stats().reads, 2);
    }

    #[tokio::test]
    async fn lookup_first_match_wins() {
        let fx = Fixture::new();
        let directory = fx.directory();

        let alice: UserRecord = directory
            .lookup("alice", |u: &UserRecord| u.username.as_str())
            .await
            .unwrap();
        assert_eq!(alice.uid, 1001);
    }

    #[tokio::test]
    async fn lookup_by_numeric_key() {
        let fx = Fixture::new();
        let directory = fx.directory();

        let dev: GroupRecord = directory.lookup(&2000, |g: &GroupRecord| &g.gid).await.unwrap();
        assert_eq!(dev.groupname, "dev");
    }

    #[tokio::test]
    async fn lookup_missing_is_not_found() {
        let fx = Fixture::new();
        let directory = fx.directory();

        let err = directory
            .lookup("nobody", |u: &UserRecord| u.username.as_str())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("nobody"));
    }

    #[tokio::test]
    async fn read_error_leaves_cache_empty() {
        let dir = TempDir::new().unwrap();
        let directory = Directory::new(DirectoryReader::new(
            dir.path().join("missing"),
            dir.path().join("missing"),
        ));

        assert!(directory.records::<GroupRecord>().await.is_err());
        assert!(!directory.cache().is_cached(Resource::Groups).await);
    }

    #[tokio::test]
    async fn invalidation_during_read_is_not_cached() {
        let fx = Fixture::new();
        let fifo = fx.dir.path().join("passwd.fifo");
        let c_path = std::ffi::CString::new(fifo.to_str().unwrap()).unwrap();
        assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0);

        let directory = Arc::new(Directory::new(DirectoryReader::new(
            fifo.clone(),
            fx.dir.path().join("group"),
        )));
        let pending = tokio::spawn({
            let directory = Arc::clone(&directory);
            async move { directory.records::<UserRecord>().await }
        });

        // Opening the write end blocks until the read-through has opened the file
        let mut writer = tokio::task::spawn_blocking(move || {
            std::fs::OpenOptions::new().write(true).open(fifo)
        })
        .await
        .unwrap()
        .unwrap();
        directory.cache().invalidate(Resource::Users).await;
        std::io::Write::write_all(&mut writer, PASSWD.as_bytes()).unwrap();
        drop(writer);

        let users = pending.await.unwrap().unwrap();
        assert_eq!(users.len(), 3);
        assert!(!directory.cache().is_cached(Resource::Users).await);
        assert_eq!(directory.stats().reads, 1);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_read() {
        let fx = Fixture::new();
        let directory = fx.directory();

        let results = join_all((0..8).map(|_| directory.records::<UserRecord>())).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(directory.stats().reads, 1);
        assert_eq!(directory.stats().hits, 7);
    }

    #[tokio::test]
    async fn without_single_flight_all_results_agree() {
        let fx = Fixture::new();
        let directory = fx.directory().with_single_flight(false);

        let results = join_all((0..4).map(|_| directory.records::<GroupRecord>())).await;

        let first = results[0].as_ref().unwrap();
        assert!(results.iter().all(|r| r.as_ref().unwrap() == first));
        assert!(directory.cache().is_cached(Resource::Groups).await);
    }
}
