//! Command line arguments for the headless driver.

use std::path::PathBuf;

use clap::Parser;

use mir_shared::Profession;

use crate::world::MapId;

#[derive(Parser, Debug)]
#[command(name = "mir-sim")]
#[command(about = "Headless combat and monster AI simulation")]
#[command(version)]
pub struct Args {
    /// Character profession (warrior, mage, taoist)
    #[arg(short, long, default_value = "warrior")]
    pub profession: Profession,

    /// Character name for a new game
    #[arg(short, long, default_value = "Hero")]
    pub name: String,

    /// Map to load (village, forest, desert, dungeon, snowfield)
    #[arg(short, long, default_value = "village")]
    pub map: MapId,

    /// Seed for wander, loot and spawn rolls
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Stop after this many ticks (default: when the script ends, or never without one)
    #[arg(short, long)]
    pub ticks: Option<u64>,

    /// Override the configured tick rate
    #[arg(long)]
    pub tick_rate: Option<u32>,

    /// Override the configured save directory
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// Save slot used for autosaves and the final save
    #[arg(long, default_value_t = 1)]
    pub slot: u8,

    /// Resume from the save slot instead of starting a new character
    #[arg(short, long)]
    pub load: bool,

    /// File of console commands, one per tick; `#` starts a comment
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Simulation config JSON
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Content overrides JSON (items, monsters, skills)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Map spawn table overrides JSON
    #[arg(long)]
    pub maps: Option<PathBuf>,

    /// Allow admin console commands in the script
    #[arg(long)]
    pub admin: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["mir-sim"]);
        assert_eq!(args.profession, Profession::Warrior);
        assert_eq!(args.map, MapId::Village);
        assert_eq!(args.slot, 1);
        assert!(args.ticks.is_none());
        assert!(!args.load);
    }

    #[test]
    fn test_parses_profession_and_map() {
        let args = Args::parse_from(["mir-sim", "-p", "mage", "--map", "desert", "--seed", "9", "-t", "600"]);
        assert_eq!(args.profession, Profession::Mage);
        assert_eq!(args.map, MapId::Desert);
        assert_eq!(args.seed, 9);
        assert_eq!(args.ticks, Some(600));
    }
}
