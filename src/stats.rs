//! Per-day count of completed focus sessions.
//!
//! The record lives in the key-value store under `glassFocusStats` as
//! `{"date": "YYYY-MM-DD", "count": n}`. Day rollover is lazy: `load` resets a
//! record from an earlier day, nothing runs at midnight.

use crate::persistence::{keys, KvStore};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum StatsError {
    /// `increment_focus_completed` ran before any `load`
    #[error("daily stats have not been loaded")]
    NotLoaded,

    #[error("stored daily stats are unreadable: {0}")]
    Corrupt(String),

    #[error("failed to persist daily stats: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: String,
    pub count: u32,
}

impl DailyStats {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            date: date_key(today),
            count: 0,
        }
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Read-modify-write access to the daily record
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsStore;

impl StatsStore {
    pub fn new() -> Self {
        Self
    }

    /// Load today's count, rolling the record over if it is from another day
    pub fn load(&self, store: &mut KvStore) -> Result<u32, StatsError> {
        self.load_on(store, Local::now().date_naive())
    }

    /// Load the count as of `today`.
    ///
    /// Missing, unreadable or stale records are replaced by `{today, 0}`. The
    /// resulting record is always written back.
    pub fn load_on(&self, store: &mut KvStore, today: NaiveDate) -> Result<u32, StatsError> {
        let stats = match self.read(store) {
            Ok(Some(stats)) if stats.date == date_key(today) => stats,
            Ok(Some(stale)) => {
                info!(previous = %stale.date, count = stale.count, "new day, resetting session count");
                DailyStats::fresh(today)
            }
            Ok(None) => DailyStats::fresh(today),
            Err(e) => {
                warn!(error = %e, "resetting daily stats");
                DailyStats::fresh(today)
            }
        };

        self.write(store, &stats)?;
        Ok(stats.count)
    }

    /// Add one completed focus session and return the new count.
    ///
    /// Precondition: `load` has run during initialization. No rollover happens
    /// here; a missing record is reported as `NotLoaded` rather than created.
    pub fn increment_focus_completed(&self, store: &mut KvStore) -> Result<u32, StatsError> {
        let mut stats = self.read(store)?.ok_or(StatsError::NotLoaded)?;
        stats.count = stats.count.saturating_add(1);
        self.write(store, &stats)?;
        info!(count = stats.count, "focus session completed");
        Ok(stats.count)
    }

    /// The stored record, if any
    pub fn read(&self, store: &KvStore) -> Result<Option<DailyStats>, StatsError> {
        match store.get(keys::STATS) {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| StatsError::Corrupt(e.to_string())),
        }
    }

    fn write(&self, store: &mut KvStore, stats: &DailyStats) -> Result<(), StatsError> {
        let json = serde_json::to_string(stats).map_err(|e| StatsError::Storage(e.to_string()))?;
        store
            .set(keys::STATS, &json)
            .map_err(|e| StatsError::Storage(format!("{:#}", e)))
    }
}
