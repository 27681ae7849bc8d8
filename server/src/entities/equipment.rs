//! Worn equipment: one optional item per slot.

use thiserror::Error;

use mir_shared::{EquipSlot, ItemDef, ItemKind, Profession, StatBonus};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EquipError {
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("{0} cannot be equipped")]
    NotEquipment(String),
    #[error("{item} can only be used by a {required}")]
    WrongProfession { item: String, required: Profession },
    #[error("nothing equipped in the {} slot", .0.name())]
    EmptySlot(EquipSlot),
    #[error("no inventory stack at index {0}")]
    NoSuchStack(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Equipment {
    weapon: Option<ItemDef>,
    armor: Option<ItemDef>,
    helmet: Option<ItemDef>,
    boots: Option<ItemDef>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&ItemDef> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
            EquipSlot::Helmet => self.helmet.as_ref(),
            EquipSlot::Boots => self.boots.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<ItemDef> {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Helmet => &mut self.helmet,
            EquipSlot::Boots => &mut self.boots,
        }
    }

    /// Check that `profession` may wear `item`, returning its slot
    pub fn check(item: &ItemDef, profession: Profession) -> Result<EquipSlot, EquipError> {
        match &item.kind {
            ItemKind::Equipment { slot, required_profession, .. } => match required_profession {
                Some(required) if *required != profession => Err(EquipError::WrongProfession {
                    item: item.name.clone(),
                    required: *required,
                }),
                _ => Ok(*slot),
            },
            _ => Err(EquipError::NotEquipment(item.name.clone())),
        }
    }

    /// Put an item into its slot, handing back whatever was there
    pub fn equip(&mut self, item: ItemDef, profession: Profession) -> Result<Option<ItemDef>, EquipError> {
        let slot = Self::check(&item, profession)?;
        Ok(self.slot_mut(slot).replace(item))
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Result<ItemDef, EquipError> {
        self.slot_mut(slot).take().ok_or(EquipError::EmptySlot(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &ItemDef)> {
        EquipSlot::all()
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|item| (slot, item)))
    }

    pub fn total_bonus(&self) -> StatBonus {
        self.iter().fold(StatBonus::default(), |acc, (_, item)| acc + item.bonus())
    }

    pub fn weapon_range(&self) -> Option<f64> {
        self.weapon.as_ref().and_then(|w| w.weapon_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mir_shared::get_item_definition;

    fn item(name: &str) -> ItemDef {
        get_item_definition(name).unwrap()
    }

    #[test]
    fn test_equip_returns_previous() {
        let mut eq = Equipment::new();
        assert_eq!(eq.equip(item("Wooden Sword"), Profession::Warrior), Ok(None));

        let previous = eq.equip(item("Iron Sword"), Profession::Warrior).unwrap();
        assert_eq!(previous.map(|p| p.name), Some("Wooden Sword".to_string()));
        assert_eq!(eq.iter().count(), 1);
        assert_eq!(eq.total_bonus().attack, 10);
        assert_eq!(eq.weapon_range(), Some(60.0));
    }

    #[test]
    fn test_profession_restriction() {
        let mut eq = Equipment::new();
        let err = eq.equip(item("Wooden Staff"), Profession::Warrior).unwrap_err();
        assert!(matches!(err, EquipError::WrongProfession { required: Profession::Mage, .. }));
        assert!(eq.get(EquipSlot::Weapon).is_none());
    }

    #[test]
    fn test_non_equipment_rejected() {
        let mut eq = Equipment::new();
        assert!(matches!(
            eq.equip(item("Golden Wound Potion"), Profession::Taoist),
            Err(EquipError::NotEquipment(_))
        ));
        assert_eq!(eq.unequip(EquipSlot::Boots), Err(EquipError::EmptySlot(EquipSlot::Boots)));
    }

    #[test]
    fn test_bonuses_sum_across_slots() {
        let mut eq = Equipment::new();
        eq.equip(item("Cloth Armor"), Profession::Mage).unwrap();
        eq.equip(item("Leather Cap"), Profession::Mage).unwrap();
        eq.equip(item("Wooden Staff"), Profession::Mage).unwrap();

        let bonus = eq.total_bonus();
        assert_eq!(bonus, StatBonus { attack: 3, defense: 3, magic: 8 });
    }
}
