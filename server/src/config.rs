//! Simulation settings loaded from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use mir_shared::{TICK_RATE, WORLD_HEIGHT, WORLD_WIDTH};

use crate::navigation::WorldBounds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Ticks per second (default: 60)
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// World size in pixels
    #[serde(default = "default_world_width")]
    pub world_width: f64,
    #[serde(default = "default_world_height")]
    pub world_height: f64,
    /// Top-up spawning stops at this many live monsters (default: 15)
    #[serde(default = "default_live_monster_threshold")]
    pub live_monster_threshold: usize,
    /// Per-tick top-up chance while under the threshold (default: 0.01)
    #[serde(default = "default_top_up_chance")]
    pub top_up_chance: f64,
    /// Share of top-ups that are bosses on maps with a boss pool (default: 0.05)
    #[serde(default = "default_boss_chance")]
    pub boss_chance: f64,
    /// Seconds between autosaves; 0 disables them (default: 60)
    #[serde(default = "default_autosave_interval")]
    pub autosave_interval_secs: u64,
    /// Directory holding the save slots
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
}

fn default_tick_rate() -> u32 {
    TICK_RATE
}

fn default_world_width() -> f64 {
    WORLD_WIDTH
}

fn default_world_height() -> f64 {
    WORLD_HEIGHT
}

fn default_live_monster_threshold() -> usize {
    15
}

fn default_top_up_chance() -> f64 {
    0.01
}

fn default_boss_chance() -> f64 {
    0.05
}

fn default_autosave_interval() -> u64 {
    60
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("saves")
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: default_tick_rate(),
            world_width: default_world_width(),
            world_height: default_world_height(),
            live_monster_threshold: default_live_monster_threshold(),
            top_up_chance: default_top_up_chance(),
            boss_chance: default_boss_chance(),
            autosave_interval_secs: default_autosave_interval(),
            save_dir: default_save_dir(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: SimConfig = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.tick_rate == 0 {
            return Err("tick_rate must be positive".to_string());
        }
        if self.world_width < 64.0 || self.world_height < 64.0 {
            return Err(format!(
                "world must be at least 64x64, got {}x{}",
                self.world_width, self.world_height
            ));
        }
        for (name, value) in [("top_up_chance", self.top_up_chance), ("boss_chance", self.boss_chance)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0 and 1, got {}", name, value));
            }
        }
        Ok(())
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds {
            width: self.world_width,
            height: self.world_height,
        }
    }
}
