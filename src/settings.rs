//! Game settings and preferences
//!
//! Persisted separately from the high score, as a small JSON file. A missing
//! or unreadable file silently yields defaults; only a write failure is an
//! error the host may want to surface.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // === Audio ===
    /// Background music on/off
    pub music: bool,
    /// Landing/combo/game-over cues on/off
    pub sfx: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Haptics ===
    /// Vibrate on imperfect landings and game over
    pub vibration: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music: true,
            sfx: true,
            music_volume: 0.7,
            sfx_volume: 1.0,
            vibration: true,
        }
    }
}

impl Settings {
    /// Effective music volume (0.0 when muted)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music {
            self.music_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective sound effect volume (0.0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx {
            self.sfx_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings from a JSON file, falling back to defaults if it is
    /// missing or malformed
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring malformed settings file: {err}");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating settings dir {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Settings saved");
        Ok(())
    }
}
