//! Random top-up spawning while a map is under-populated.
//!
//! Each tick with fewer live monsters than the threshold has a small chance
//! of adding one at a random spot. On maps with a boss pool a share of those
//! spawns are bosses.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use super::zone_manager::MapDefinition;
use crate::navigation::{Vec2, WorldBounds, MONSTER_CLAMP_SIZE};

/// What the spawner wants added to the world
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub monster: String,
    pub position: Vec2,
    pub is_boss: bool,
}

#[derive(Debug, Clone)]
pub struct TopUpSpawner {
    /// Spawning only happens below this many live monsters
    pub live_threshold: usize,
    /// Per-tick chance of a spawn while below the threshold
    pub spawn_chance: f64,
    /// Chance that a spawn is drawn from the boss pool
    pub boss_chance: f64,
    bounds: WorldBounds,
}

impl TopUpSpawner {
    pub fn new(live_threshold: usize, spawn_chance: f64, boss_chance: f64, bounds: WorldBounds) -> Self {
        Self {
            live_threshold,
            spawn_chance,
            boss_chance,
            bounds,
        }
    }

    pub fn update<R: Rng + ?Sized>(&self, live: usize, map: &MapDefinition, rng: &mut R) -> Option<SpawnRequest> {
        if live >= self.live_threshold || rng.gen::<f64>() >= self.spawn_chance {
            return None;
        }

        let position = Vec2::new(
            rng.gen_range(0.0..(self.bounds.width - MONSTER_CLAMP_SIZE).max(1.0)),
            rng.gen_range(0.0..(self.bounds.height - MONSTER_CLAMP_SIZE).max(1.0)),
        );

        if !map.boss_pool.is_empty() && rng.gen::<f64>() < self.boss_chance {
            if let Some(boss) = map.boss_pool.choose(rng) {
                debug!("Top-up rolled boss {} on {}", boss, map.id);
                return Some(SpawnRequest { monster: boss.clone(), position, is_boss: true });
            }
        }

        let monster = map.top_up_pool.choose(rng)?;
        Some(SpawnRequest { monster: monster.clone(), position, is_boss: false })
    }
}
