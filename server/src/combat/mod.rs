//! Combat resolution: aggro, basic attacks, skills and rewards.

pub mod aggro;
mod attack;
mod loot;
mod skills;

pub use aggro::{AggroTable, Sighting};
pub use attack::{basic_attack, AttackOutcome};
pub use loot::{distribute_rewards, roll_drops, LevelUp, RewardSink, Rewards};
pub use skills::{cast_hotkey, cast_skill, CastError, CastOutcome};

use log::info;
use rand::Rng;

use mir_shared::{EntityId, GameEvent, LootEntry, Millis};

use crate::entities::{Monster, Player};

/// Defense subtracts flat from the raw hit; every landed hit does at least 1
pub fn damage_after_defense(raw: i32, defense: i32) -> i32 {
    (raw - defense).max(1)
}

/// Anything that can be hit
pub trait Damageable {
    fn health(&self) -> i32;
    fn defense(&self) -> i32;

    /// Apply a raw hit and return the damage actually dealt
    fn take_damage(&mut self, raw: i32, attacker: EntityId, now: Millis) -> i32;

    fn is_dead(&self) -> bool {
        self.health() <= 0
    }
}

/// Anything that pays out when killed
pub trait Lootable {
    fn drop_table(&self) -> &[LootEntry];
    fn exp_reward(&self) -> u32;
    fn gold_reward(&self) -> u32;
}

/// A monster killed by a hit, with what the killer got for it
#[derive(Debug, Clone, PartialEq)]
pub struct Kill {
    pub monster: String,
    pub rewards: Rewards,
}

/// One landed hit
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub target: EntityId,
    pub damage: i32,
    pub target_health: i32,
    pub kill: Option<Kill>,
}

impl Hit {
    pub fn events(&self, attacker: EntityId) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::Damage {
            attacker,
            target: self.target,
            damage: self.damage,
            target_health: self.target_health,
        }];
        if let Some(kill) = &self.kill {
            events.push(GameEvent::MonsterKilled {
                id: self.target,
                monster: kill.monster.clone(),
                killer: attacker,
            });
            events.extend(kill.rewards.events());
        }
        events
    }
}

/// Land a raw hit from the player on a monster; pays out if this hit killed it
pub(crate) fn strike<R: Rng + ?Sized>(
    attacker: &mut Player,
    monster: &mut Monster,
    raw: i32,
    now: Millis,
    rng: &mut R,
) -> Hit {
    let was_alive = !monster.is_dead();
    let damage = monster.take_damage(raw, attacker.id, now);

    let kill = if was_alive && monster.is_dead() {
        info!("{} killed {} #{}", attacker.name, monster.template.name, monster.id);
        let rewards = distribute_rewards(attacker, &*monster, rng);
        Some(Kill { monster: monster.template.name.clone(), rewards })
    } else {
        None
    };

    Hit {
        target: monster.id,
        damage,
        target_health: monster.health,
        kill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_damage_floor() {
        assert_eq!(damage_after_defense(5, 1000), 1);
        assert_eq!(damage_after_defense(25, 2), 23);
        assert_eq!(damage_after_defense(3, 3), 1);
    }

    proptest! {
        #[test]
        fn damage_is_never_below_one(raw in -1000i32..10_000, defense in 0i32..10_000) {
            prop_assert!(damage_after_defense(raw, defense) >= 1);
        }

        #[test]
        fn damage_above_defense_is_exact(defense in 0i32..1000, extra in 1i32..1000) {
            prop_assert_eq!(damage_after_defense(defense + extra, defense), extra);
        }
    }
}
