//! The player character.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, info};
use thiserror::Error;

use mir_shared::{
    BaseStats, ConsumableEffect, EntityId, EquipSlot, Facing, GameEvent, ItemDef, ItemKind, Millis,
    Profession, SkillDef,
};

use super::equipment::{EquipError, Equipment};
use super::inventory::Inventory;
use crate::catalog::ContentCatalog;
use crate::combat::{damage_after_defense, Damageable, LevelUp, RewardSink};
use crate::navigation::{Vec2, WorldBounds, PLAYER_HEIGHT, PLAYER_WIDTH};

/// Pixels per movement step
const PLAYER_SPEED: f64 = 3.0;

/// Experience needed for level 2; each level multiplies it by EXP_GROWTH
const STARTING_EXP_TO_NEXT: u32 = 100;
const EXP_GROWTH: f64 = 1.5;

/// Basic attack ranges when no weapon decides it
const UNARMED_RANGE: f64 = 60.0;
const MAGE_ATTACK_RANGE: f64 = 150.0;
const TAOIST_ATTACK_RANGE: f64 = 100.0;

/// Hotkeys run 1..=MAX_HOTKEY
pub const MAX_HOTKEY: u8 = 8;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkillError {
    #[error("unknown skill: {0}")]
    Unknown(String),
    #[error("{0} has not been learned")]
    NotLearned(String),
    #[error("{0} is already learned")]
    AlreadyLearned(String),
    #[error("{skill} requires level {required}")]
    LevelTooLow { skill: String, required: u32 },
    #[error("{0} is already at its highest level")]
    MaxLevel(String),
    #[error("no skill at index {0}")]
    BadIndex(usize),
    #[error("hotkey {0} is out of range")]
    BadHotkey(u8),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemError {
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("no inventory stack at index {0}")]
    NoSuchStack(usize),
    #[error("{0} cannot be used")]
    NotUsable(String),
    #[error(transparent)]
    Equip(#[from] EquipError),
    #[error(transparent)]
    Skill(#[from] SkillError),
}

/// A profession skill and the level the player has it at (0 = not learned)
#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub def: SkillDef,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuffKind {
    /// Multiplies defense while active
    Shield { factor: f64 },
    /// Monsters gain no proximity threat from a stealthed player
    Stealth,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveBuff {
    pub skill: String,
    pub kind: BuffKind,
    pub expires_at: Millis,
}

/// Effective combat numbers after equipment and buffs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStats {
    pub attack: i32,
    pub defense: i32,
    pub magic: i32,
    pub range: f64,
}

/// Basic attack reach and the stat it hits with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    pub range: f64,
    pub base_damage: i32,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub name: String,
    pub profession: Profession,
    pub level: u32,
    pub experience: u32,
    pub exp_to_next: u32,
    pub gold: u32,
    /// Top-left corner of the sprite
    pub position: Vec2,
    pub facing: Facing,
    pub speed: f64,
    /// Profession base plus level growth; equipment and buffs are layered on top
    pub base: BaseStats,
    pub health: i32,
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
    pub magic: i32,
    pub equipment: Equipment,
    pub inventory: Inventory,
    /// Every skill of the profession, in definition order; indices are stable
    pub skills: Vec<Skill>,
    pub learned_skills: BTreeSet<String>,
    /// Skill name -> time of the last successful cast
    pub skill_cooldowns: HashMap<String, Millis>,
    skill_hotkeys: BTreeMap<u8, usize>,
    hotkey_skills: BTreeMap<usize, u8>,
    pub buffs: Vec<ActiveBuff>,
}

impl Player {
    /// A fresh level 1 character with its starting skills learned
    pub fn new(id: EntityId, name: &str, profession: Profession, position: Vec2, catalog: &ContentCatalog) -> Self {
        let base = BaseStats::for_profession(profession);
        let mut player = Self {
            id,
            name: name.to_string(),
            profession,
            level: 1,
            experience: 0,
            exp_to_next: STARTING_EXP_TO_NEXT,
            gold: 0,
            position,
            facing: Facing::Down,
            speed: PLAYER_SPEED,
            base,
            health: base.max_health,
            max_health: base.max_health,
            attack: base.attack,
            defense: base.defense,
            magic: base.magic,
            equipment: Equipment::new(),
            inventory: Inventory::new(),
            skills: catalog
                .skills_for(profession)
                .into_iter()
                .map(|def| Skill { def, level: 0 })
                .collect(),
            learned_skills: BTreeSet::new(),
            skill_cooldowns: HashMap::new(),
            skill_hotkeys: BTreeMap::new(),
            hotkey_skills: BTreeMap::new(),
            buffs: Vec::new(),
        };
        player.auto_learn();
        player.recompute_stats();
        player
    }

    /// Hit center; the sprite is 24x36
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0)
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Re-derive attack/defense/magic from base stats, equipment and buffs
    pub fn recompute_stats(&mut self) {
        let bonus = self.equipment.total_bonus();
        self.max_health = self.base.max_health;
        self.attack = self.base.attack + bonus.attack;
        self.magic = self.base.magic + bonus.magic;

        let defense = self.base.defense + bonus.defense;
        self.defense = match self.shield_factor() {
            Some(factor) => (defense as f64 * factor).floor() as i32,
            None => defense,
        };

        self.health = self.health.min(self.max_health);
    }

    pub fn derived_stats(&self) -> DerivedStats {
        DerivedStats {
            attack: self.attack,
            defense: self.defense,
            magic: self.magic,
            range: self.attack_profile().range,
        }
    }

    /// Warriors swing with their weapon's reach; casters use fixed ranges
    pub fn attack_profile(&self) -> AttackProfile {
        match self.profession {
            Profession::Warrior => AttackProfile {
                range: self.equipment.weapon_range().unwrap_or(UNARMED_RANGE),
                base_damage: self.attack,
            },
            Profession::Mage => AttackProfile {
                range: MAGE_ATTACK_RANGE,
                base_damage: self.magic,
            },
            Profession::Taoist => AttackProfile {
                range: TAOIST_ATTACK_RANGE,
                base_damage: (self.attack + self.magic) / 2,
            },
        }
    }

    /// Restore health up to the maximum, returning how much was actually healed
    pub fn heal(&mut self, amount: i32) -> i32 {
        if amount <= 0 || self.is_dead() {
            return 0;
        }
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    pub fn respawn(&mut self, position: Vec2) {
        self.position = position;
        self.health = self.max_health;
    }

    // =========================================================================
    // Levelling
    // =========================================================================

    pub fn level_up(&mut self) -> LevelUp {
        self.level += 1;
        self.exp_to_next = (self.exp_to_next as f64 * EXP_GROWTH) as u32;
        self.base = self.base + BaseStats::growth(self.profession);
        self.recompute_stats();
        self.health = self.max_health;

        let learned = self.auto_learn();
        info!("{} reached level {}", self.name, self.level);
        LevelUp { level: self.level, learned }
    }

    /// Learn every skill whose level requirement is now met
    fn auto_learn(&mut self) -> Vec<String> {
        let ready: Vec<usize> = self
            .skills
            .iter()
            .enumerate()
            .filter(|(_, s)| s.level == 0 && s.def.required_level <= self.level)
            .map(|(i, _)| i)
            .collect();

        ready.into_iter().map(|index| self.learn_at(index)).collect()
    }

    // =========================================================================
    // Skills
    // =========================================================================

    fn learn_at(&mut self, index: usize) -> String {
        let name = self.skills[index].def.name.clone();
        self.skills[index].level = 1;
        self.learned_skills.insert(name.clone());

        if !self.hotkey_skills.contains_key(&index) {
            if let Some(hotkey) = (1..=MAX_HOTKEY).find(|k| !self.skill_hotkeys.contains_key(k)) {
                self.skill_hotkeys.insert(hotkey, index);
                self.hotkey_skills.insert(index, hotkey);
            }
        }
        debug!("{} learned {}", self.name, name);
        name
    }

    fn skill_index(&self, name: &str) -> Result<usize, SkillError> {
        self.skills
            .iter()
            .position(|s| s.def.name == name)
            .ok_or_else(|| SkillError::Unknown(name.to_string()))
    }

    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.def.name == name)
    }

    pub fn skill_level(&self, name: &str) -> u8 {
        self.skill(name).map(|s| s.level).unwrap_or(0)
    }

    pub fn learn_skill(&mut self, name: &str) -> Result<(), SkillError> {
        let index = self.skill_index(name)?;
        if self.learned_skills.contains(name) {
            return Err(SkillError::AlreadyLearned(name.to_string()));
        }
        let required = self.skills[index].def.required_level;
        if required > self.level {
            return Err(SkillError::LevelTooLow { skill: name.to_string(), required });
        }
        self.learn_at(index);
        Ok(())
    }

    /// Raise a learned skill one level, returning the new level
    pub fn upgrade_skill(&mut self, name: &str) -> Result<u8, SkillError> {
        let index = self.skill_index(name)?;
        let skill = &mut self.skills[index];
        if skill.level == 0 {
            return Err(SkillError::NotLearned(name.to_string()));
        }
        if skill.level >= skill.def.max_level() {
            return Err(SkillError::MaxLevel(name.to_string()));
        }
        skill.level += 1;
        Ok(skill.level)
    }

    /// Bind a hotkey to a skill, keeping both directions consistent
    pub fn set_skill_hotkey(&mut self, skill_index: usize, hotkey: u8) -> Result<(), SkillError> {
        if hotkey == 0 || hotkey > MAX_HOTKEY {
            return Err(SkillError::BadHotkey(hotkey));
        }
        let skill = self.skills.get(skill_index).ok_or(SkillError::BadIndex(skill_index))?;
        if skill.level == 0 {
            return Err(SkillError::NotLearned(skill.def.name.clone()));
        }

        if let Some(old_index) = self.skill_hotkeys.remove(&hotkey) {
            self.hotkey_skills.remove(&old_index);
        }
        if let Some(old_hotkey) = self.hotkey_skills.remove(&skill_index) {
            self.skill_hotkeys.remove(&old_hotkey);
        }
        self.skill_hotkeys.insert(hotkey, skill_index);
        self.hotkey_skills.insert(skill_index, hotkey);
        Ok(())
    }

    pub fn clear_hotkeys(&mut self) {
        self.skill_hotkeys.clear();
        self.hotkey_skills.clear();
    }

    pub fn skill_for_hotkey(&self, hotkey: u8) -> Option<&Skill> {
        self.skill_hotkeys.get(&hotkey).and_then(|&index| self.skills.get(index))
    }

    pub fn hotkey_of(&self, skill_index: usize) -> Option<u8> {
        self.hotkey_skills.get(&skill_index).copied()
    }

    /// (hotkey, skill index) pairs in hotkey order
    pub fn hotkeys(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.skill_hotkeys.iter().map(|(&k, &i)| (k, i))
    }

    /// Milliseconds until a skill may be cast again (0 if ready)
    pub fn cooldown_remaining(&self, name: &str, now: Millis) -> Millis {
        let Some(skill) = self.skill(name) else {
            return 0;
        };
        match self.skill_cooldowns.get(name) {
            Some(&last) => (skill.def.cooldown_ms(skill.level) - (now - last)).max(0),
            None => 0,
        }
    }

    // =========================================================================
    // Buffs
    // =========================================================================

    pub fn apply_buff(&mut self, skill: &str, kind: BuffKind, expires_at: Millis) {
        self.buffs.retain(|b| b.skill != skill);
        self.buffs.push(ActiveBuff { skill: skill.to_string(), kind, expires_at });
        self.recompute_stats();
    }

    fn shield_factor(&self) -> Option<f64> {
        self.buffs
            .iter()
            .filter_map(|b| match b.kind {
                BuffKind::Shield { factor } => Some(factor),
                BuffKind::Stealth => None,
            })
            .reduce(f64::max)
    }

    pub fn is_stealthed(&self) -> bool {
        self.buffs.iter().any(|b| b.kind == BuffKind::Stealth)
    }

    /// Per-tick upkeep: drop expired buffs
    pub fn update(&mut self, now: Millis) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.buffs.retain(|b| {
            if now >= b.expires_at {
                events.push(GameEvent::BuffExpired { skill: b.skill.clone() });
                false
            } else {
                true
            }
        });
        if !events.is_empty() {
            self.recompute_stats();
        }
        events
    }

    // =========================================================================
    // Movement
    // =========================================================================

    pub fn move_step(&mut self, facing: Facing, bounds: &WorldBounds) {
        self.facing = facing;
        let next = self.position + Vec2::from(facing) * self.speed;
        self.position = bounds.clamp(next, PLAYER_WIDTH, PLAYER_HEIGHT);
    }

    // =========================================================================
    // Equipment and inventory
    // =========================================================================

    pub fn add_item(&mut self, name: &str, quantity: u32) {
        self.inventory.add(name, quantity);
    }

    /// Equip directly, handing back the replaced item
    pub fn equip(&mut self, item: ItemDef) -> Result<Option<ItemDef>, EquipError> {
        let previous = self.equipment.equip(item, self.profession)?;
        self.recompute_stats();
        Ok(previous)
    }

    /// Move one unit from an inventory stack into its slot; the replaced item goes back
    pub fn equip_from_inventory(
        &mut self,
        index: usize,
        catalog: &ContentCatalog,
    ) -> Result<Vec<GameEvent>, EquipError> {
        let name = self
            .inventory
            .get(index)
            .ok_or(EquipError::NoSuchStack(index))?
            .name
            .clone();
        let item = catalog
            .item(&name)
            .cloned()
            .ok_or_else(|| EquipError::UnknownItem(name.clone()))?;
        let slot = Equipment::check(&item, self.profession)?;

        self.inventory.remove(&name, 1);
        let previous = self.equip(item)?;

        let mut events = Vec::new();
        if let Some(previous) = previous {
            self.inventory.add(&previous.name, 1);
            events.push(GameEvent::Unequipped { item: previous.name, slot });
        }
        events.push(GameEvent::Equipped { item: name, slot });
        Ok(events)
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Result<ItemDef, EquipError> {
        let item = self.equipment.unequip(slot)?;
        self.inventory.add(&item.name, 1);
        self.recompute_stats();
        Ok(item)
    }

    pub fn use_item(&mut self, index: usize, catalog: &ContentCatalog) -> Result<Vec<GameEvent>, ItemError> {
        let name = self
            .inventory
            .get(index)
            .ok_or(ItemError::NoSuchStack(index))?
            .name
            .clone();
        let item = catalog
            .item(&name)
            .ok_or_else(|| ItemError::UnknownItem(name.clone()))?;

        match &item.kind {
            ItemKind::Equipment { .. } => Ok(self.equip_from_inventory(index, catalog)?),
            ItemKind::Consumable(effect) => {
                self.inventory.remove(&name, 1);
                let mut events = vec![GameEvent::ItemUsed { item: name }];
                match *effect {
                    ConsumableEffect::RestoreHealth(amount) => {
                        let healed = self.heal(amount);
                        events.push(GameEvent::Healed { amount: healed, health: self.health });
                    }
                    // No mana pool: the potion is consumed and reported only
                    ConsumableEffect::RestoreMana(_) => {}
                }
                Ok(events)
            }
            ItemKind::SkillBook { skill } => {
                let skill = skill.clone();
                self.learn_skill(&skill)?;
                self.inventory.remove(&name, 1);
                Ok(vec![GameEvent::ItemUsed { item: name }, GameEvent::SkillLearned { skill }])
            }
            ItemKind::Material => Err(ItemError::NotUsable(name)),
        }
    }
}

impl Damageable for Player {
    fn health(&self) -> i32 {
        self.health
    }

    fn defense(&self) -> i32 {
        self.defense
    }

    fn take_damage(&mut self, raw: i32, _attacker: EntityId, _now: Millis) -> i32 {
        let damage = damage_after_defense(raw, self.defense);
        self.health -= damage;
        damage
    }
}

impl RewardSink for Player {
    fn grant_experience(&mut self, exp: u32) -> Vec<LevelUp> {
        self.experience += exp;
        let mut level_ups = Vec::new();
        while self.experience >= self.exp_to_next {
            self.experience -= self.exp_to_next;
            level_ups.push(self.level_up());
        }
        level_ups
    }

    fn grant_gold(&mut self, gold: u32) {
        self.gold = self.gold.saturating_add(gold);
    }

    fn grant_item(&mut self, item: &str, quantity: u32) {
        self.add_item(item, quantity);
    }
}
