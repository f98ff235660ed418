// Pixcade
// copyright pixcade contributors 2024～2026

//! A persisted high-score scalar per game: one named integer in a JSON
//! file under the user data directory. Read once at startup, written at
//! game end only when the running score beats the stored value. Storage
//! failures log and degrade; they never surface to the game.

use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    best: u64,
}

pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    /// store for one game; files live in <data_dir>/pixcade/<game>.json
    pub fn new(game: &str) -> Self {
        let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join("pixcade").join(format!("{}.json", game)),
        }
    }

    /// store rooted at an explicit directory (config override, tests)
    pub fn with_dir(dir: PathBuf, game: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", game)),
        }
    }

    pub fn load(&self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(text) => match serde_json::from_str::<ScoreFile>(&text) {
                Ok(f) => f.best,
                Err(e) => {
                    log::warn!("unreadable score file {:?}: {}", self.path, e);
                    0
                }
            },
            Err(_) => 0,
        }
    }

    pub fn store(&self, best: u64) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("cannot create score dir {:?}: {}", parent, e);
                return;
            }
        }
        match serde_json::to_string(&ScoreFile { best }) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    log::warn!("cannot write score file {:?}: {}", self.path, e);
                }
            }
            Err(e) => log::warn!("cannot encode score: {}", e),
        }
    }

    /// write through only when score beats the stored best
    pub fn record_if_best(&self, score: u64) -> bool {
        if score > self.load() {
            self.store(score);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_store(tag: &str) -> ScoreStore {
        let dir = env::temp_dir().join(format!("pixcade-test-{}", tag));
        let _ = fs::remove_dir_all(&dir);
        ScoreStore::with_dir(dir, "t")
    }

    #[test]
    fn empty_store_reads_zero() {
        let s = temp_store("empty");
        assert_eq!(s.load(), 0);
    }

    #[test]
    fn round_trip_and_best_guard() {
        let s = temp_store("round");
        assert!(s.record_if_best(120));
        assert_eq!(s.load(), 120);
        // equal or lower never overwrites
        assert!(!s.record_if_best(120));
        assert!(!s.record_if_best(80));
        assert_eq!(s.load(), 120);
        assert!(s.record_if_best(200));
        assert_eq!(s.load(), 200);
    }
}
