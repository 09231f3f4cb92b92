//! Player preferences
//!
//! Persisted separately from session records in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::game::model::BallKind;

/// Persisted preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Ball variant spawned at round start
    pub selected_ball: BallKind,
    /// Variants unlocked through the store
    pub owned_balls: Vec<BallKind>,
    /// Frame-rate cap for the driver loop
    pub target_fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 0.7,
            sfx_volume: 1.0,
            selected_ball: BallKind::Comet,
            owned_balls: vec![BallKind::Comet],
            target_fps: 60,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "space_portals_settings";

    /// Clamp volumes, keep the selected variant owned, and floor the
    /// frame-rate cap. Applied after every load.
    pub fn sanitized(mut self) -> Self {
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        if !self.owned_balls.contains(&self.selected_ball) {
            self.owned_balls.push(self.selected_ball);
        }
        self.target_fps = self.target_fps.max(30);
        self
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str::<Settings>(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings.sanitized();
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
