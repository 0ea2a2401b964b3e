//! Player settings and preferences
//!
//! Stored as JSON next to the scores file. Physics constants are not
//! settings; they live in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::{Progress, ScoreRecord};
use crate::sim::LevelId;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings JSON invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ball fill colour, passed through to the renderer as-is
    pub ball_colour: String,
    /// Level to start on
    pub start_level: LevelId,
    /// Shots already taken in a resumed game
    pub carried_score: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ball_colour: "White".to_string(),
            start_level: LevelId::One,
            carried_score: 0,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Resume from a saved game. Completed runs start over.
    pub fn resume_from(&mut self, record: &ScoreRecord) {
        match record.progress {
            Progress::Level(level) => {
                self.start_level = level;
                self.carried_score = record.score;
            }
            Progress::Completed => {
                self.start_level = LevelId::One;
                self.carried_score = 0;
            }
        }
    }
}
