//! Versioned JSON save slots.
//!
//! Cooldowns are stored as time elapsed since the cast, so they survive a
//! restart with a different clock origin.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mir_shared::{BaseStats, EntityId, EquipSlot, Millis, Profession, SAVE_SLOTS, SAVE_VERSION};

use crate::catalog::ContentCatalog;
use crate::entities::{Inventory, ItemStack, Player};
use crate::navigation::Vec2;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file not found")]
    NotFound,

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Save slot {0} does not exist")]
    InvalidSlot(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub slot: EquipSlot,
    pub item: String,
}

/// Everything needed to rebuild the player. Monsters are not saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// Unix seconds at save time
    pub saved_at: u64,
    pub name: String,
    pub profession: Profession,
    pub level: u32,
    pub experience: u32,
    pub exp_to_next: u32,
    pub gold: u32,
    pub position: (f64, f64),
    pub health: i32,
    pub base_stats: BaseStats,
    pub equipment: Vec<EquippedItem>,
    pub inventory: Vec<ItemStack>,
    pub learned_skills: Vec<String>,
    pub skill_levels: BTreeMap<String, u8>,
    /// Skill name -> milliseconds since its last cast
    pub skill_cooldowns: BTreeMap<String, Millis>,
    /// Hotkey -> skill name
    pub skill_hotkeys: BTreeMap<u8, String>,
}

/// Short description of a slot for a load menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub slot: u8,
    pub name: String,
    pub profession: Profession,
    pub level: u32,
    pub saved_at: u64,
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl SaveData {
    pub fn capture(player: &Player, now: Millis) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: unix_now(),
            name: player.name.clone(),
            profession: player.profession,
            level: player.level,
            experience: player.experience,
            exp_to_next: player.exp_to_next,
            gold: player.gold,
            position: player.position.as_tuple(),
            health: player.health,
            base_stats: player.base,
            equipment: player
                .equipment
                .iter()
                .map(|(slot, item)| EquippedItem { slot, item: item.name.clone() })
                .collect(),
            inventory: player.inventory.stacks().to_vec(),
            learned_skills: player.learned_skills.iter().cloned().collect(),
            skill_levels: player
                .skills
                .iter()
                .filter(|s| s.level > 0)
                .map(|s| (s.def.name.clone(), s.level))
                .collect(),
            skill_cooldowns: player
                .skill_cooldowns
                .iter()
                .map(|(name, &last)| (name.clone(), (now - last).max(0)))
                .collect(),
            skill_hotkeys: player
                .hotkeys()
                .filter_map(|(key, index)| player.skills.get(index).map(|s| (key, s.def.name.clone())))
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }

    /// Rebuild the player, re-anchoring cooldowns on `now`
    pub fn restore(&self, id: EntityId, catalog: &ContentCatalog, now: Millis) -> Result<Player, SaveError> {
        self.validate()?;

        let mut player = Player::new(id, &self.name, self.profession, Vec2::from_tuple(self.position), catalog);
        player.level = self.level;
        player.experience = self.experience;
        player.exp_to_next = self.exp_to_next;
        player.gold = self.gold;
        player.base = self.base_stats;

        player.learned_skills.clear();
        for skill in &mut player.skills {
            skill.level = self.skill_levels.get(&skill.def.name).copied().unwrap_or(0);
            if self.learned_skills.contains(&skill.def.name) && skill.level > 0 {
                player.learned_skills.insert(skill.def.name.clone());
            } else {
                skill.level = 0;
            }
        }

        player.clear_hotkeys();
        for (&key, name) in &self.skill_hotkeys {
            let bound = player
                .skills
                .iter()
                .position(|s| &s.def.name == name)
                .map(|index| player.set_skill_hotkey(index, key));
            if !matches!(bound, Some(Ok(()))) {
                warn!("Dropping saved hotkey {} -> {}", key, name);
            }
        }

        player.skill_cooldowns = self
            .skill_cooldowns
            .iter()
            .map(|(name, &elapsed)| (name.clone(), now - elapsed))
            .collect();

        for equipped in &self.equipment {
            match catalog.item(&equipped.item) {
                Some(item) => {
                    if let Err(e) = player.equipment.equip(item.clone(), player.profession) {
                        warn!("Could not re-equip {}: {}", equipped.item, e);
                    }
                }
                None => warn!("Saved equipment {} no longer exists", equipped.item),
            }
        }
        player.inventory = Inventory::from_stacks(self.inventory.clone());

        player.recompute_stats();
        player.health = self.health.min(player.max_health);

        debug!("Restored {} (level {})", player.name, player.level);
        Ok(player)
    }
}

pub fn slot_path(dir: &Path, slot: u8) -> Result<PathBuf, SaveError> {
    if slot == 0 || slot > SAVE_SLOTS {
        return Err(SaveError::InvalidSlot(slot));
    }
    Ok(dir.join(format!("slot_{}.json", slot)))
}

pub fn write_slot(dir: &Path, slot: u8, data: &SaveData) -> Result<(), SaveError> {
    let path = slot_path(dir, slot)?;
    std::fs::create_dir_all(dir)?;

    let file = File::create(&path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, data)?;
    Ok(())
}

pub fn read_slot(dir: &Path, slot: u8) -> Result<SaveData, SaveError> {
    let path = slot_path(dir, slot)?;
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let reader = BufReader::new(file);
    let data: SaveData = serde_json::from_reader(reader)?;

    data.validate()?;
    Ok(data)
}

/// Every readable slot, in slot order
pub fn list_saves(dir: &Path) -> Vec<SaveSummary> {
    let mut saves = Vec::new();
    for slot in 1..=SAVE_SLOTS {
        match read_slot(dir, slot) {
            Ok(data) => saves.push(SaveSummary {
                slot,
                name: data.name,
                profession: data.profession,
                level: data.level,
                saved_at: data.saved_at,
            }),
            Err(SaveError::NotFound) => {}
            Err(e) => warn!("Save slot {} is unreadable: {}", slot, e),
        }
    }
    saves
}

pub fn delete_save(dir: &Path, slot: u8) -> Result<(), SaveError> {
    let path = slot_path(dir, slot)?;
    if !path.exists() {
        return Err(SaveError::NotFound);
    }
    std::fs::remove_file(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mir_shared::Facing;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mir-save-{}-{}", tag, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        dir
    }

    fn seasoned_mage(catalog: &ContentCatalog) -> Player {
        let mut mage = Player::new(1, "Merlin", Profession::Mage, Vec2::new(300.0, 400.0), catalog);
        while mage.level < 12 {
            mage.level_up();
        }
        mage.upgrade_skill("Fireball").unwrap();
        mage.set_skill_hotkey(1, 4).unwrap();
        mage.gold = 77;
        mage.add_item("Golden Wound Potion", 3);
        mage.add_item("Wooden Staff", 1);
        mage.equip_from_inventory(1, catalog).unwrap();
        mage.skill_cooldowns.insert("Fireball".into(), 10_000);
        mage.facing = Facing::Left;
        mage.health -= 20;
        mage
    }

    #[test]
    fn test_capture_stores_elapsed_cooldowns() {
        let catalog = ContentCatalog::builtin();
        let mage = seasoned_mage(&catalog);
        let data = SaveData::capture(&mage, 10_250);

        assert_eq!(data.skill_cooldowns.get("Fireball"), Some(&250));
        assert_eq!(data.skill_levels.get("Fireball"), Some(&2));
        assert_eq!(data.skill_hotkeys.get(&4).map(String::as_str), Some("Lightning"));
        assert_eq!(data.equipment, vec![EquippedItem { slot: EquipSlot::Weapon, item: "Wooden Staff".into() }]);
    }

    #[test]
    fn test_restore_rebuilds_player_on_a_new_clock() {
        let catalog = ContentCatalog::builtin();
        let mage = seasoned_mage(&catalog);
        let data = SaveData::capture(&mage, 10_250);

        let restored = data.restore(1, &catalog, 500).unwrap();
        assert_eq!(restored.level, 12);
        assert_eq!(restored.gold, 77);
        assert_eq!(restored.position, Vec2::new(300.0, 400.0));
        assert_eq!(restored.derived_stats(), mage.derived_stats());
        assert_eq!(restored.health, mage.health);
        assert_eq!(restored.inventory, mage.inventory);
        assert_eq!(restored.learned_skills, mage.learned_skills);
        assert_eq!(restored.skill_level("Fireball"), 2);
        assert_eq!(restored.hotkeys().collect::<Vec<_>>(), mage.hotkeys().collect::<Vec<_>>());

        // 250 ms had elapsed of Fireball's 510 ms cooldown
        assert_eq!(restored.cooldown_remaining("Fireball", 500), 260);
    }

    #[test]
    fn test_slot_files() {
        let dir = temp_dir("slots");
        let catalog = ContentCatalog::builtin();
        let data = SaveData::capture(&seasoned_mage(&catalog), 0);

        assert!(matches!(read_slot(&dir, 2), Err(SaveError::NotFound)));
        write_slot(&dir, 2, &data).unwrap();
        assert_eq!(read_slot(&dir, 2).unwrap(), data);

        let saves = list_saves(&dir);
        assert_eq!(saves.len(), 1);
        assert_eq!((saves[0].slot, saves[0].level), (2, 12));

        delete_save(&dir, 2).unwrap();
        assert!(list_saves(&dir).is_empty());
        assert!(matches!(delete_save(&dir, 2), Err(SaveError::NotFound)));
        assert!(matches!(write_slot(&dir, 4, &data), Err(SaveError::InvalidSlot(4))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let dir = temp_dir("version");
        let catalog = ContentCatalog::builtin();
        let mut data = SaveData::capture(&seasoned_mage(&catalog), 0);
        data.version = SAVE_VERSION + 1;
        write_slot(&dir, 1, &data).unwrap();

        assert!(matches!(read_slot(&dir, 1), Err(SaveError::IncompatibleVersion { .. })));
        assert!(list_saves(&dir).is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
