//! Content lookups: items, monster templates and skills.
//!
//! One catalog is built at startup and passed to whatever needs it. The
//! built-in content can be overridden entry by entry from a JSON file.

use std::collections::HashMap;
use std::path::Path;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use mir_shared::{
    get_item_definitions, get_monster_templates, get_skill_definitions, ItemDef, MonsterTemplate,
    Profession, SkillDef,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Optional overrides; entries replace built-ins with the same name
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<ItemDef>,
    #[serde(default)]
    monsters: Vec<MonsterTemplate>,
    #[serde(default)]
    skills: Vec<SkillDef>,
}

#[derive(Debug, Clone)]
pub struct ContentCatalog {
    items: HashMap<String, ItemDef>,
    monsters: HashMap<String, MonsterTemplate>,
    /// Kept in definition order so skill indices are stable
    skills: Vec<SkillDef>,
}

impl ContentCatalog {
    pub fn builtin() -> Self {
        Self {
            items: get_item_definitions().into_iter().map(|i| (i.name.clone(), i)).collect(),
            monsters: get_monster_templates().into_iter().map(|m| (m.name.clone(), m)).collect(),
            skills: get_skill_definitions(),
        }
    }

    /// Built-in content with the file's entries merged over it
    pub fn load_from_json(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let file: CatalogFile = serde_json::from_str(&content)?;

        let mut catalog = Self::builtin();
        let counts = (file.items.len(), file.monsters.len(), file.skills.len());
        for item in file.items {
            catalog.items.insert(item.name.clone(), item);
        }
        for monster in file.monsters {
            catalog.monsters.insert(monster.name.clone(), monster);
        }
        for skill in file.skills {
            match catalog.skills.iter_mut().find(|s| s.name == skill.name) {
                Some(existing) => *existing = skill,
                None => catalog.skills.push(skill),
            }
        }

        info!(
            "Loaded catalog overrides from {:?}: {} items, {} monsters, {} skills",
            path.as_ref(),
            counts.0,
            counts.1,
            counts.2
        );
        Ok(catalog)
    }

    pub fn item(&self, name: &str) -> Option<&ItemDef> {
        self.items.get(name)
    }

    pub fn monster(&self, name: &str) -> Option<&MonsterTemplate> {
        self.monsters.get(name)
    }

    pub fn skill(&self, name: &str) -> Option<&SkillDef> {
        self.skills.iter().find(|s| s.name == name)
    }

    pub fn skills_for(&self, profession: Profession) -> Vec<SkillDef> {
        self.skills.iter().filter(|s| s.profession == profession).cloned().collect()
    }
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookups() {
        let catalog = ContentCatalog::builtin();
        assert_eq!(catalog.monster("Scarecrow").map(|m| m.max_health), Some(30));
        assert!(catalog.item("Wooden Sword").is_some());
        assert!(catalog.skill("Fireball").is_some());
        assert_eq!(catalog.skills_for(Profession::Taoist)[0].name, "Soul Fire Talisman");
    }

    #[test]
    fn test_every_drop_names_a_known_item() {
        let catalog = ContentCatalog::builtin();
        for monster in get_monster_templates() {
            for entry in &monster.drop_table {
                assert!(catalog.item(&entry.item).is_some(), "{} drops unknown {}", monster.name, entry.item);
            }
        }
    }

    #[test]
    fn test_overrides_merge_over_builtin() {
        let dir = std::env::temp_dir().join(format!("mir-catalog-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        std::fs::write(
            &path,
            r#"{
                "monsters": [{
                    "id": 1, "name": "Scarecrow", "max_health": 99, "attack": 5, "defense": 2,
                    "exp_reward": 10, "gold_reward": 5, "size": "Small"
                }]
            }"#,
        )
        .unwrap();

        let catalog = ContentCatalog::load_from_json(&path).unwrap();
        let scarecrow = catalog.monster("Scarecrow").unwrap();
        assert_eq!(scarecrow.max_health, 99);
        assert_eq!(scarecrow.aggro_range, 150.0);
        assert!(scarecrow.drop_table.is_empty());
        assert!(catalog.monster("Wolf").is_some());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bad_file_is_an_error() {
        assert!(matches!(
            ContentCatalog::load_from_json("/definitely/not/here.json"),
            Err(CatalogError::Io(_))
        ));
    }
}
