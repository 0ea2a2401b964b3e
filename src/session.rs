//! Play session: shot counting, level progression and the cheats
//!
//! Score is the total number of shots, so lower is better.

use crate::consts::POWER_BOOST_STEP;
use crate::highscores::{Progress, ScoreRecord};
use crate::settings::Settings;
use crate::sim::LevelId;

/// What happens after the ball drops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    /// Move on to this level, ball back at the origin
    Advanced(LevelId),
    /// Last level done
    Finished { total_shots: u32 },
}

#[derive(Debug, Clone)]
pub struct Session {
    level: LevelId,
    /// Shots taken on the current level
    shots: u32,
    /// Shots from completed levels (plus any carried over from a save)
    total_shots: u32,
    max_power: f64,
    finished: bool,
}

impl Session {
    pub fn new(start_level: LevelId, carried_shots: u32) -> Self {
        Self {
            level: start_level,
            shots: 0,
            total_shots: carried_shots,
            max_power: start_level.base_max_power(),
            finished: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.start_level, settings.carried_score)
    }

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    pub fn total_shots(&self) -> u32 {
        self.total_shots
    }

    pub fn max_power(&self) -> f64 {
        self.max_power
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn record_shot(&mut self) {
        self.shots += 1;
    }

    /// Cheat: raise the power cap until the level changes
    pub fn boost_power(&mut self) {
        self.max_power += POWER_BOOST_STEP;
        log::info!("Max power boosted to {}", self.max_power);
    }

    /// Cheat: take one shot off this level's count, never below zero
    pub fn reduce_score(&mut self) {
        self.shots = self.shots.saturating_sub(1);
        log::info!("Shot count reduced to {}", self.shots);
    }

    /// Cheat: jump to the next level without banking this level's shots.
    /// The caller reloads the level with the ball back at the origin.
    pub fn skip_level(&mut self) -> LevelOutcome {
        log::info!("Skipping level {} after {} shots", self.level, self.shots);
        self.shots = 0;
        self.advance()
    }

    /// Bank this level's shots and move on
    pub fn complete_level(&mut self) -> LevelOutcome {
        self.total_shots += self.shots;
        log::info!(
            "Level {} complete in {} shots ({} total)",
            self.level,
            self.shots,
            self.total_shots
        );
        self.shots = 0;
        self.advance()
    }

    fn advance(&mut self) -> LevelOutcome {
        match self.level.next() {
            Some(next) => {
                self.level = next;
                self.max_power = next.base_max_power();
                LevelOutcome::Advanced(next)
            }
            None => {
                self.finished = true;
                LevelOutcome::Finished {
                    total_shots: self.total_shots,
                }
            }
        }
    }

    /// Record to write for a save (mid-game) or a finished run
    pub fn save_record(&self, name: &str) -> ScoreRecord {
        let progress = if self.finished {
            Progress::Completed
        } else {
            Progress::Level(self.level)
        };
        ScoreRecord {
            name: name.to_string(),
            score: self.total_shots,
            progress,
        }
    }
}
