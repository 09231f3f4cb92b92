//! Session records
//!
//! Persisted to LocalStorage: best survival time, lifetime star balance,
//! and a bounded history of finished rounds.

use serde::{Deserialize, Serialize};

/// Maximum number of rounds kept in the history
pub const MAX_HISTORY: usize = 10;

/// One finished round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundEntry {
    /// Seconds survived
    pub survived_secs: u32,
    /// Stars collected in the round
    pub stars: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Persisted record sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Records {
    pub best_secs: u32,
    pub lifetime_stars: u64,
    pub history: Vec<RoundEntry>,
}

impl Records {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "space_portals_records";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished round in. Returns true when the best time
    /// improved. Zero-second rounds update nothing and stay out of the
    /// history.
    pub fn add_round(&mut self, survived_secs: u32, stars: u32, timestamp: f64) -> bool {
        if survived_secs == 0 {
            return false;
        }
        let improved = survived_secs > self.best_secs;
        if improved {
            self.best_secs = survived_secs;
        }

        let entry = RoundEntry {
            survived_secs,
            stars,
            timestamp,
        };
        // Insert sorted descending by survival time.
        let pos = self
            .history
            .iter()
            .position(|e| survived_secs > e.survived_secs);
        match pos {
            Some(index) => self.history.insert(index, entry),
            None => self.history.push(entry),
        }
        self.history.truncate(MAX_HISTORY);

        improved
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Longest survival in the history (if any)
    pub fn top_time(&self) -> Option<u32> {
        self.history.first().map(|e| e.survived_secs)
    }

    /// Load records from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(records) = serde_json::from_str::<Records>(&json) {
                    log::info!("Loaded records ({} rounds)", records.history.len());
                    return records;
                }
            }
        }

        log::info!("No records found, starting fresh");
        Self::new()
    }

    /// Save records to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Records saved ({} rounds)", self.history.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Current wall-clock timestamp in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
