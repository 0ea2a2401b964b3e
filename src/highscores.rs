//! Save records and the leaderboard
//!
//! Each line of the scores file is `name score level`, where `level` is the
//! level to resume on or `Completed`. Names may contain spaces; the last two
//! fields are always score and level.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::LevelId;
use crate::sim::geometry::InvalidLevel;

/// Maximum number of leaderboard entries
pub const MAX_HIGH_SCORES: usize = 10;

const COMPLETED: &str = "Completed";

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("scores file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: RecordError,
    },
}

/// Why one `name score level` line failed to parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected `name score level`")]
    MissingFields,
    #[error("missing name")]
    MissingName,
    #[error("bad score {text:?}: {source}")]
    BadScore {
        text: String,
        source: ParseIntError,
    },
    #[error("bad level {0:?}")]
    BadLevel(String),
    #[error(transparent)]
    UnknownLevel(#[from] InvalidLevel),
}

/// How far a saved run got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progress {
    /// Saved mid-game, resumes on this level
    Level(LevelId),
    Completed,
}

/// One line of the scores file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    /// Total shots
    pub score: u32,
    pub progress: Progress,
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.progress {
            Progress::Level(level) => write!(f, "{} {} {}", self.name, self.score, level),
            Progress::Completed => write!(f, "{} {} {}", self.name, self.score, COMPLETED),
        }
    }
}

impl FromStr for ScoreRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [name @ .., score, level] = fields.as_slice() else {
            return Err(RecordError::MissingFields);
        };
        if name.is_empty() {
            return Err(RecordError::MissingName);
        }

        let score = score.parse::<u32>().map_err(|source| RecordError::BadScore {
            text: score.to_string(),
            source,
        })?;
        let progress = if *level == COMPLETED {
            Progress::Completed
        } else {
            let n = level
                .parse::<u8>()
                .map_err(|_| RecordError::BadLevel(level.to_string()))?;
            Progress::Level(LevelId::try_from(n)?)
        };

        Ok(Self {
            name: name.join(" "),
            score,
            progress,
        })
    }
}

/// Parse a whole scores file. Blank lines are skipped.
pub fn parse_records(text: &str) -> Result<Vec<ScoreRecord>, ScoreError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.parse::<ScoreRecord>().map_err(|source| ScoreError::Malformed {
                line: i + 1,
                source,
            })
        })
        .collect()
}

/// Read all records; a missing file is an empty list
pub fn load_records(path: &Path) -> Result<Vec<ScoreRecord>, ScoreError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_records(&text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No scores file at {}, starting fresh", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Append one record to the scores file, creating it if needed
pub fn append_record(path: &Path, record: &ScoreRecord) -> Result<(), ScoreError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{record}")?;
    log::info!("Saved \"{}\" to {}", record, path.display());
    Ok(())
}

/// Most recent unfinished save for `name`
pub fn latest_save<'a>(records: &'a [ScoreRecord], name: &str) -> Option<&'a ScoreRecord> {
    records
        .iter()
        .rev()
        .find(|r| r.name == name && r.progress != Progress::Completed)
}

/// Completed runs, fewest shots first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    /// Build from raw records, keeping only completed runs. Ties keep file
    /// order.
    pub fn from_records(records: &[ScoreRecord]) -> Self {
        let mut entries: Vec<ScoreRecord> = records
            .iter()
            .filter(|r| r.progress == Progress::Completed)
            .cloned()
            .collect();
        entries.sort_by_key(|r| r.score);
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Check if a finished run would make the board
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score < e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score < e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best (lowest) score, if any
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}
