//! Best-score persistence
//!
//! A single integer, written back only when a run ends with a new record.
//! Stored as JSON so the format can grow fields without a migration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Best score ever achieved on this install
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// True if `score` beats the stored record
    pub fn is_beaten_by(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record `score` if it is a new best. Returns whether it was.
    pub fn record(&mut self, score: u32) -> bool {
        if self.is_beaten_by(score) {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load the record from a JSON file; missing or unreadable means zero
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(high_score) => {
                    let HighScore { best } = high_score;
                    log::info!("Loaded high score {best}");
                    high_score
                }
                Err(err) => {
                    log::warn!("Ignoring malformed high score file: {err}");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No high score yet");
                Self::default()
            }
        }
    }

    /// Save the record as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating high score dir {}", dir.display()))?;
        }
        let json = serde_json::to_string(self).context("serializing high score")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_zero() {
        assert_eq!(HighScore::default().best, 0);
    }

    #[test]
    fn test_record_only_on_strict_improvement() {
        let mut hs = HighScore::new(10);
        assert!(!hs.record(10));
        assert_eq!(hs.best, 10);
        assert!(hs.record(11));
        assert_eq!(hs.best, 11);
        assert!(!hs.record(5));
        assert_eq!(hs.best, 11);
    }

    #[test]
    fn test_missing_file_is_zero() {
        let hs = HighScore::load(Path::new("/nonexistent/highscore.json"));
        assert_eq!(hs.best, 0);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = std::env::temp_dir().join("crane-stack-highscore-test");
        let path = dir.join("highscore.json");

        let hs = HighScore::new(42);
        hs.save(&path).unwrap();
        assert_eq!(HighScore::load(&path), hs);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
