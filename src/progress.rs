//! Level unlock progress
//!
//! One flag per level. The first level starts unlocked and winning a level
//! unlocks the next. Persisted as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProgressError;
use crate::sim::Outcome;

/// Unlock flags for the level list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub unlocked: Vec<bool>,
}

impl LevelProgress {
    /// Fresh progress for `count` levels
    pub fn new(count: usize) -> Self {
        let mut unlocked = vec![false; count];
        if let Some(first) = unlocked.first_mut() {
            *first = true;
        }
        Self { unlocked }
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        self.unlocked.get(index).copied().unwrap_or(false)
    }

    /// Unlock a level; returns true if it was locked before
    pub fn unlock(&mut self, index: usize) -> bool {
        match self.unlocked.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                log::info!("Unlocked level {}", index + 1);
                true
            }
            _ => false,
        }
    }

    /// Apply a finished level; a win unlocks the following level
    pub fn record_outcome(&mut self, index: usize, outcome: Outcome) -> bool {
        outcome == Outcome::Won && self.unlock(index + 1)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse saved progress, resized to `count` levels
    pub fn from_json(json: &str, count: usize) -> Result<Self, serde_json::Error> {
        let mut progress: LevelProgress = serde_json::from_str(json)?;
        progress.unlocked.resize(count, false);
        if let Some(first) = progress.unlocked.first_mut() {
            *first = true;
        }
        Ok(progress)
    }

    /// Load from disk; a missing file means fresh progress
    pub fn load(path: &Path, count: usize) -> Result<Self, ProgressError> {
        if !path.exists() {
            log::info!("No progress at {}, starting fresh", path.display());
            return Ok(Self::new(count));
        }
        let json = std::fs::read_to_string(path)?;
        let progress = Self::from_json(&json, count)?;
        log::info!(
            "Loaded progress: {}/{} levels unlocked",
            progress.unlocked.iter().filter(|u| **u).count(),
            count
        );
        Ok(progress)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProgressError> {
        std::fs::write(path, self.to_json()?)?;
        log::debug!("Saved progress to {}", path.display());
        Ok(())
    }
}
