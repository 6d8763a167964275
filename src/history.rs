use serde::{Deserialize, Serialize};

use crate::passages::{self, LanguageMode};
use crate::storage::{Storage, HISTORY_KEY};

pub const HISTORY_CAPACITY: usize = 100;

/// One completed session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    #[serde(rename = "date")]
    pub timestamp: String,
    pub text: String,
    #[serde(rename = "isEnglish", with = "passages::is_english")]
    pub language: LanguageMode,
    #[serde(rename = "time")]
    pub elapsed_secs: f64,
    pub apm: u32,
    pub max_streak: u32,
}

/// Completed sessions, newest first, never longer than `HISTORY_CAPACITY`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read history, falling back to an empty list on a missing or corrupt blob
    pub fn load(storage: &dyn Storage) -> Self {
        let Some(blob) = storage.load(HISTORY_KEY) else {
            return History::new();
        };
        match serde_json::from_str::<Vec<HistoryRecord>>(&blob) {
            Ok(mut records) => {
                records.truncate(HISTORY_CAPACITY);
                History { records }
            }
            Err(err) => {
                tracing::warn!(%err, "stored history is unreadable, starting empty");
                History::new()
            }
        }
    }

    pub fn save(&self, storage: &dyn Storage) {
        let blob = match serde_json::to_string(&self.records) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(%err, "failed to encode history");
                return;
            }
        };
        if let Err(err) = storage.save(HISTORY_KEY, &blob) {
            tracing::warn!(%err, "failed to save history");
        }
    }

    /// Insert at the front and evict the oldest entries past capacity
    pub fn push_front(&mut self, record: HistoryRecord) {
        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
