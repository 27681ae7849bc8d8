//! Simulation entities: the player and monsters.

mod equipment;
mod inventory;
pub mod monster;
pub mod player;

pub use equipment::{EquipError, Equipment};
pub use inventory::{Inventory, ItemStack};
pub use monster::{ActivityRegion, Candidate, Monster, MonsterAttack, MonsterState};
pub use player::{ActiveBuff, BuffKind, DerivedStats, ItemError, Player, Skill, SkillError, MAX_HOTKEY};
