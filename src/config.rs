// Pixcade
// copyright pixcade contributors 2024～2026

//! Optional cabinet configuration from a pixcade.toml next to the binary
//! or in the current directory. Missing file or bad TOML falls back to
//! defaults; configuration can never stop a game from starting.

use crate::GAME_FRAME;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const CONFIG_FILE: &str = "pixcade.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// simulation and render frame rate
    pub fps: u32,
    /// master switch for the cue player
    pub sound: bool,
    /// override for the high-score data directory
    pub data_dir: Option<PathBuf>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            fps: GAME_FRAME,
            sound: true,
            data_dir: None,
        }
    }
}

impl ArcadeConfig {
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    pub fn load_from(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match toml::from_str::<ArcadeConfig>(&text) {
                Ok(mut cfg) => {
                    if cfg.fps == 0 {
                        cfg.fps = GAME_FRAME;
                    }
                    cfg
                }
                Err(e) => {
                    log::warn!("bad {}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = ArcadeConfig::load_from("no/such/pixcade.toml");
        assert_eq!(cfg.fps, GAME_FRAME);
        assert!(cfg.sound);
        assert!(cfg.data_dir.is_none());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: ArcadeConfig = toml::from_str("sound = false").unwrap();
        assert!(!cfg.sound);
        assert_eq!(cfg.fps, GAME_FRAME);
    }
}
