// src/cache.rs

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    fetch::{FetchError, TableSource},
    table::Table,
};

/// Default freshness window, in seconds.
pub const CACHE_DURATION_SECS: u64 = 300;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub table: Arc<Table>,
    pub fetched_at: DateTime<Utc>,
}

/// Single-slot memo in front of a [`TableSource`].
///
/// The slot is only ever refreshed while its lock is held, so callers that
/// race on an expired entry wait for the one in-flight fetch instead of
/// issuing their own. A failed refresh leaves the old entry in place but
/// does not serve it.
pub struct FreshnessCache<S> {
    source: S,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    slot: Mutex<Option<CacheEntry>>,
}

impl<S: TableSource> FreshnessCache<S> {
    pub fn new(source: S, clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            source,
            clock,
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The current table and when it was fetched, refreshing it first if
    /// the freshness window has passed.
    pub async fn get_entry(&self) -> Result<CacheEntry, FetchError> {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            let age = self.clock.now() - entry.fetched_at;
            if age < self.ttl {
                debug!(age_secs = age.num_seconds(), "serving cached table");
                return Ok(entry.clone());
            }
            debug!(age_secs = age.num_seconds(), "cached table expired");
        }

        let table = match self.source.fetch().await {
            Ok(table) => Arc::new(table),
            Err(e) => {
                warn!(error = %e, stale = slot.is_some(), "table refresh failed");
                return Err(e);
            }
        };

        let entry = CacheEntry {
            table,
            fetched_at: self.clock.now(),
        };
        info!(rows = entry.table.len(), fetched_at = %entry.fetched_at, "table cached");
        *slot = Some(entry.clone());
        Ok(entry)
    }

    pub async fn get_table(&self) -> Result<Arc<Table>, FetchError> {
        self.get_entry().await.map(|entry| entry.table)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex as StdMutex,
        },
        time::Duration,
    };

    use crate::fetch::ParseError;

    /// Clock that only moves when told to.
    pub struct ManualClock {
        now: StdMutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                now: StdMutex::new(Utc::now()),
            })
        }

        pub fn advance(&self, secs: i64) {
            let mut now = self.now.lock().unwrap();
            *now += TimeDelta::seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    /// Source that replays scripted outcomes and counts calls. Once the
    /// script runs out it keeps returning `fallback`.
    pub struct ScriptedSource {
        pub calls: AtomicUsize,
        script: StdMutex<VecDeque<Option<Table>>>,
        fallback: Option<Table>,
        delay: Duration,
    }

    impl ScriptedSource {
        pub fn always(table: Table) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script: StdMutex::new(VecDeque::new()),
                fallback: Some(table),
                delay: Duration::ZERO,
            }
        }

        pub fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script: StdMutex::new(VecDeque::new()),
                fallback: None,
                delay: Duration::ZERO,
            }
        }

        /// `None` entries in `script` produce a fetch failure.
        pub fn scripted(script: Vec<Option<Table>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script: StdMutex::new(script.into()),
                fallback: None,
                delay: Duration::ZERO,
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TableSource for ScriptedSource {
        async fn fetch(&self) -> Result<Table, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone());
            next.ok_or_else(|| {
                let utf8_err = std::str::from_utf8(b"\xff").unwrap_err();
                FetchError::Parse(ParseError::Encoding(utf8_err))
            })
        }
    }
}
