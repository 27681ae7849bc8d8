//! Ordered item stacks carried by the player.

use serde::{Deserialize, Serialize};

/// Item name plus count; the definition is looked up in the catalog on use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub name: String,
    pub quantity: u32,
}

/// Stacks in pickup order. Same-named items merge into one stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    stacks: Vec<ItemStack>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stacks(stacks: Vec<ItemStack>) -> Self {
        let mut inventory = Self::new();
        for stack in stacks {
            inventory.add(&stack.name, stack.quantity);
        }
        inventory
    }

    pub fn add(&mut self, name: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.stacks.iter_mut().find(|s| s.name == name) {
            Some(stack) => stack.quantity += quantity,
            None => self.stacks.push(ItemStack { name: name.to_string(), quantity }),
        }
    }

    /// Remove `quantity` of an item; false (and nothing removed) if there isn't enough
    pub fn remove(&mut self, name: &str, quantity: u32) -> bool {
        let Some(index) = self.stacks.iter().position(|s| s.name == name) else {
            return false;
        };
        if self.stacks[index].quantity < quantity {
            return false;
        }
        self.stacks[index].quantity -= quantity;
        if self.stacks[index].quantity == 0 {
            self.stacks.remove(index);
        }
        true
    }

    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.stacks.get(index)
    }

    pub fn count(&self, name: &str) -> u32 {
        self.stacks.iter().find(|s| s.name == name).map(|s| s.quantity).unwrap_or(0)
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacks_merge_by_name_and_keep_order() {
        let mut inv = Inventory::new();
        inv.add("Golden Wound Potion", 2);
        inv.add("Wolf Pelt", 1);
        inv.add("Golden Wound Potion", 3);
        inv.add("Nothing", 0);

        assert_eq!(inv.len(), 2);
        assert_eq!(inv.get(0).map(|s| s.quantity), Some(5));
        assert_eq!(inv.get(1).map(|s| s.name.as_str()), Some("Wolf Pelt"));
    }

    #[test]
    fn test_remove() {
        let mut inv = Inventory::new();
        inv.add("Wolf Pelt", 1);
        inv.add("Deer Meat", 2);

        assert!(!inv.remove("Deer Meat", 3));
        assert_eq!(inv.count("Deer Meat"), 2);

        assert!(inv.remove("Wolf Pelt", 1));
        assert_eq!(inv.count("Wolf Pelt"), 0);
        assert_eq!(inv.get(0).map(|s| s.name.as_str()), Some("Deer Meat"));
        assert!(!inv.remove("Wolf Pelt", 1));
    }
}
