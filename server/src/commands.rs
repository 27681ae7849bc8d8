//! Console command system for player and admin commands.
//!
//! Player commands decode into `Intent`s and run through the world exactly
//! like device input would. Admin commands poke the world directly.

use mir_shared::{EntityId, EquipSlot, Facing, GameEvent, Intent, Millis, SkillRef};

use crate::combat::Damageable;
use crate::entities::MAX_HOTKEY;
use crate::navigation::{Vec2, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::world::GameWorld;

/// Longest walk a single /move may request
const MAX_MOVE_STEPS: u32 = 100;

/// Highest level /level will raise the player to
const MAX_ADMIN_LEVEL: u32 = 100;

/// Result of executing a command
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command was successful
    pub success: bool,
    /// Message to display to the user
    pub message: String,
    /// Events the command produced, for the display
    pub events: Vec<GameEvent>,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            events: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            events: Vec::new(),
        }
    }

    pub fn with_events(mut self, events: Vec<GameEvent>) -> Self {
        self.events = events;
        self
    }

    /// Success unless the world rejected the action
    fn from_events(events: Vec<GameEvent>) -> Self {
        let rejection = events.iter().find_map(|e| match e {
            GameEvent::ActionRejected { reason } => Some(reason.clone()),
            GameEvent::SkillRejected { skill, reason } => Some(format!("{}: {}", skill, reason)),
            _ => None,
        });
        let result = match rejection {
            Some(reason) => Self::error(reason),
            None => Self::success(summarize(&events)),
        };
        result.with_events(events)
    }
}

fn summarize(events: &[GameEvent]) -> String {
    let lines: Vec<String> = events.iter().filter_map(describe).collect();
    if lines.is_empty() {
        "Ok".to_string()
    } else {
        lines.join("\n")
    }
}

/// One-line description of the events a player cares about
pub fn describe(event: &GameEvent) -> Option<String> {
    Some(match event {
        GameEvent::Damage { target, damage, target_health, .. } => {
            format!("Hit #{} for {} ({} left)", target, damage, target_health)
        }
        GameEvent::AttackOutOfRange { target, distance, range } => {
            format!("#{} is out of range ({:.0} > {:.0})", target, distance, range)
        }
        GameEvent::SkillCast { skill, targets } => format!("Cast {} on {} target(s)", skill, targets),
        GameEvent::SkillNoTarget { skill } => format!("{} found no target", skill),
        GameEvent::Healed { amount, health } => format!("Healed {} (health {})", amount, health),
        GameEvent::BuffApplied { skill, .. } => format!("{} is active", skill),
        GameEvent::Summoned { skill, strength } => format!("{} answered (strength {:.1})", skill, strength),
        GameEvent::MonsterKilled { monster, .. } => format!("{} was slain", monster),
        GameEvent::RewardGranted { exp, gold } => format!("Gained {} exp and {} gold", exp, gold),
        GameEvent::ItemLooted { item, quantity } => format!("Looted {} x{}", item, quantity),
        GameEvent::LevelUp { level } => format!("Reached level {}", level),
        GameEvent::SkillLearned { skill } => format!("Learned {}", skill),
        GameEvent::SkillUpgraded { skill, level } => format!("{} is now level {}", skill, level),
        GameEvent::Equipped { item, slot } => format!("Equipped {} ({})", item, slot.name()),
        GameEvent::Unequipped { item, slot } => format!("Removed {} ({})", item, slot.name()),
        GameEvent::ItemUsed { item } => format!("Used {}", item),
        GameEvent::PlayerRespawned { .. } => "You have respawned".to_string(),
        _ => return None,
    })
}

/// Parse and execute a console command
/// Returns None if it's not a command (doesn't start with /)
pub fn parse_and_execute(content: &str, is_admin: bool, world: &mut GameWorld, now: Millis) -> Option<CommandResult> {
    let content = content.trim();
    let rest = content.strip_prefix('/')?;

    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.is_empty() {
        return Some(CommandResult::error("Invalid command"));
    }

    let command = parts[0].to_lowercase();
    let args = &parts[1..];

    Some(match command.as_str() {
        // === Player commands ===
        "help" => cmd_help(is_admin),
        "status" => cmd_status(world),
        "pos" => cmd_pos(world),
        "monsters" => cmd_monsters(world),
        "inv" | "inventory" => cmd_inventory(world),
        "skills" => cmd_skills(world, now),
        "move" => cmd_move(args, world, now),
        "attack" => cmd_attack(args, world, now),
        "cast" | "skill" => cmd_cast(args, world, now),
        "equip" => cmd_equip(args, world, now),
        "unequip" => cmd_unequip(args, world, now),
        "use" => cmd_use(args, world, now),
        "learn" => cmd_learn(args, world),
        "upgrade" => cmd_upgrade(args, world),
        "hotkey" => cmd_hotkey(args, world),
        "respawn" => cmd_respawn(world),

        // === Admin-only commands ===
        "level" | "gold" | "item" | "kill" | "tp" | "spawn" if !is_admin => {
            CommandResult::error("This command requires admin privileges")
        }
        "level" => cmd_level(args, world),
        "gold" => cmd_gold(args, world),
        "item" => cmd_item(args, world),
        "kill" => cmd_kill(args, world),
        "tp" => cmd_teleport(args, world),
        "spawn" => cmd_spawn(args, world),

        _ => CommandResult::error(format!("Unknown command: /{}", command)),
    })
}

/// `#10004` or `10004`
fn parse_target(arg: &str) -> Option<EntityId> {
    arg.strip_prefix('#').unwrap_or(arg).parse().ok()
}

// =============================================================================
// Player Commands
// =============================================================================

fn cmd_help(is_admin: bool) -> CommandResult {
    let mut help = String::from("Available commands:\n");
    help.push_str("  /status - Level, stats and gold\n");
    help.push_str("  /pos - Show your current position\n");
    help.push_str("  /monsters - List monsters on the map\n");
    help.push_str("  /inv - Show inventory and equipment\n");
    help.push_str("  /skills - Show skills, levels, hotkeys and cooldowns\n");
    help.push_str("  /move <up|down|left|right> [steps] - Walk\n");
    help.push_str("  /attack [#id] - Basic attack (first monster in reach if no id)\n");
    help.push_str("  /cast <hotkey|skill name> [#id] - Cast a skill\n");
    help.push_str("  /equip <index> - Equip an inventory item\n");
    help.push_str("  /unequip <slot> - Remove equipment\n");
    help.push_str("  /use <index> - Use an inventory item\n");
    help.push_str("  /learn <skill> - Learn a skill\n");
    help.push_str("  /upgrade <skill> - Raise a skill one level\n");
    help.push_str("  /hotkey <key> <skill> - Bind a skill to a hotkey\n");
    help.push_str("  /respawn - Return to the map spawn point\n");

    if is_admin {
        help.push_str("\nAdmin commands:\n");
        help.push_str("  /level <level> - Raise your level\n");
        help.push_str("  /gold <amount> - Add (or remove) gold\n");
        help.push_str("  /item <name> [qty] - Add an item to inventory\n");
        help.push_str("  /kill <#id> - Kill a monster outright\n");
        help.push_str("  /tp <x> <y> - Teleport\n");
        help.push_str("  /spawn <monster> - Spawn a monster next to you\n");
    }

    CommandResult::success(help)
}

fn cmd_status(world: &GameWorld) -> CommandResult {
    let p = &world.player;
    let stats = p.derived_stats();
    CommandResult::success(format!(
        "{} the {} - level {} ({}/{} exp)\nHP {}/{}  ATK {}  DEF {}  MAG {}  range {:.0}\nGold {}  map {}",
        p.name,
        p.profession,
        p.level,
        p.experience,
        p.exp_to_next,
        p.health,
        p.max_health,
        stats.attack,
        stats.defense,
        stats.magic,
        stats.range,
        p.gold,
        world.map().id
    ))
}

fn cmd_pos(world: &GameWorld) -> CommandResult {
    let p = &world.player;
    CommandResult::success(format!(
        "Position: x={:.1}, y={:.1} facing {:?} (map {})",
        p.position.x,
        p.position.y,
        p.facing,
        world.map().id
    ))
}

fn cmd_monsters(world: &GameWorld) -> CommandResult {
    let origin = world.player.center();
    let mut msg = String::from("Monsters:\n");
    for m in world.monsters().filter(|m| !m.is_dead()) {
        msg.push_str(&format!(
            "  #{} {}{} hp {}/{} {:?} at {:.0}px\n",
            m.id,
            m.template.name,
            if m.is_boss() { " (boss)" } else { "" },
            m.health,
            m.max_health,
            m.state,
            origin.distance_to(m.center())
        ));
    }
    CommandResult::success(msg)
}

fn cmd_inventory(world: &GameWorld) -> CommandResult {
    let p = &world.player;
    let mut msg = String::from("Inventory:\n");
    for (index, stack) in p.inventory.stacks().iter().enumerate() {
        msg.push_str(&format!("  [{}] {} x{}\n", index, stack.name, stack.quantity));
    }
    msg.push_str("Equipment:\n");
    for slot in EquipSlot::all() {
        let item = p.equipment.get(slot).map(|i| i.name.as_str()).unwrap_or("-");
        msg.push_str(&format!("  {}: {}\n", slot.name(), item));
    }
    CommandResult::success(msg)
}

fn cmd_skills(world: &GameWorld, now: Millis) -> CommandResult {
    let p = &world.player;
    let mut msg = String::from("Skills:\n");
    for (index, skill) in p.skills.iter().enumerate() {
        if skill.level == 0 {
            msg.push_str(&format!("  {} (level {} required)\n", skill.def.name, skill.def.required_level));
            continue;
        }
        let hotkey = p.hotkey_of(index).map(|k| format!("[{}] ", k)).unwrap_or_default();
        let cooldown = p.cooldown_remaining(&skill.def.name, now);
        let range = skill.def.range(skill.level);
        msg.push_str(&format!(
            "  {}{} lv {}/{}{}{}\n",
            hotkey,
            skill.def.name,
            skill.level,
            skill.def.max_level(),
            if range > 0.0 { format!(" range {:.0}", range) } else { String::new() },
            if cooldown > 0 { format!(" ({} ms)", cooldown) } else { String::new() }
        ));
    }
    CommandResult::success(msg)
}

fn cmd_move(args: &[&str], world: &mut GameWorld, now: Millis) -> CommandResult {
    let Some(facing) = args.first().and_then(|a| a.parse::<Facing>().ok()) else {
        return CommandResult::error("Usage: /move <up|down|left|right> [steps]");
    };
    let steps: u32 = match args.get(1) {
        Some(s) => match s.parse() {
            Ok(n) if (1..=MAX_MOVE_STEPS).contains(&n) => n,
            _ => return CommandResult::error(format!("Steps must be between 1 and {}", MAX_MOVE_STEPS)),
        },
        None => 1,
    };

    let mut events = Vec::new();
    for _ in 0..steps {
        events.extend(world.apply_intent(&Intent::Move(facing), now));
    }
    let mut result = CommandResult::from_events(events);
    if result.success {
        let p = world.player.position;
        result.message = format!("Now at ({:.1}, {:.1})", p.x, p.y);
    }
    result
}

fn cmd_attack(args: &[&str], world: &mut GameWorld, now: Millis) -> CommandResult {
    let target = match args.first() {
        Some(arg) => match parse_target(arg) {
            Some(id) => Some(id),
            None => return CommandResult::error("Usage: /attack [#id]"),
        },
        None => None,
    };
    CommandResult::from_events(world.apply_intent(&Intent::BasicAttack { target }, now))
}

fn cmd_cast(args: &[&str], world: &mut GameWorld, now: Millis) -> CommandResult {
    let (target, words) = match args.split_last() {
        Some((last, rest)) if last.starts_with('#') => match parse_target(last) {
            Some(id) => (Some(id), rest),
            None => return CommandResult::error("Invalid target ID"),
        },
        _ => (None, args),
    };
    if words.is_empty() {
        return CommandResult::error("Usage: /cast <hotkey|skill name> [#id]");
    }

    let skill = match words {
        [key] => match key.parse::<u8>() {
            Ok(hotkey) => SkillRef::Hotkey(hotkey),
            Err(_) => SkillRef::Name(key.to_string()),
        },
        _ => SkillRef::Name(words.join(" ")),
    };
    CommandResult::from_events(world.apply_intent(&Intent::CastSkill { skill, target }, now))
}

fn cmd_equip(args: &[&str], world: &mut GameWorld, now: Millis) -> CommandResult {
    match args.first().and_then(|a| a.parse().ok()) {
        Some(inventory_index) => CommandResult::from_events(world.apply_intent(&Intent::Equip { inventory_index }, now)),
        None => CommandResult::error("Usage: /equip <inventory index>"),
    }
}

fn cmd_unequip(args: &[&str], world: &mut GameWorld, now: Millis) -> CommandResult {
    match args.first().map(|a| a.parse::<EquipSlot>()) {
        Some(Ok(slot)) => CommandResult::from_events(world.apply_intent(&Intent::Unequip { slot }, now)),
        Some(Err(e)) => CommandResult::error(e),
        None => CommandResult::error("Usage: /unequip <weapon|armor|helmet|boots>"),
    }
}

fn cmd_use(args: &[&str], world: &mut GameWorld, now: Millis) -> CommandResult {
    match args.first().and_then(|a| a.parse().ok()) {
        Some(inventory_index) => CommandResult::from_events(world.apply_intent(&Intent::UseItem { inventory_index }, now)),
        None => CommandResult::error("Usage: /use <inventory index>"),
    }
}

fn cmd_learn(args: &[&str], world: &mut GameWorld) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("Usage: /learn <skill name>");
    }
    let name = args.join(" ");
    match world.player.learn_skill(&name) {
        Ok(()) => CommandResult::success(format!("Learned {}", name))
            .with_events(vec![GameEvent::SkillLearned { skill: name }]),
        Err(e) => CommandResult::error(e.to_string()),
    }
}

fn cmd_upgrade(args: &[&str], world: &mut GameWorld) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("Usage: /upgrade <skill name>");
    }
    let name = args.join(" ");
    match world.player.upgrade_skill(&name) {
        Ok(level) => CommandResult::success(format!("{} is now level {}", name, level))
            .with_events(vec![GameEvent::SkillUpgraded { skill: name, level }]),
        Err(e) => CommandResult::error(e.to_string()),
    }
}

fn cmd_hotkey(args: &[&str], world: &mut GameWorld) -> CommandResult {
    let usage = format!("Usage: /hotkey <1-{}> <skill name>", MAX_HOTKEY);
    let Some((key, name)) = args.split_first() else {
        return CommandResult::error(usage);
    };
    let Ok(hotkey) = key.parse::<u8>() else {
        return CommandResult::error(usage);
    };
    if name.is_empty() {
        return CommandResult::error(usage);
    }

    let name = name.join(" ");
    let Some(index) = world.player.skills.iter().position(|s| s.def.name == name) else {
        return CommandResult::error(format!("Unknown skill: {}", name));
    };
    match world.player.set_skill_hotkey(index, hotkey) {
        Ok(()) => CommandResult::success(format!("{} bound to hotkey {}", name, hotkey)),
        Err(e) => CommandResult::error(e.to_string()),
    }
}

fn cmd_respawn(world: &mut GameWorld) -> CommandResult {
    let event = world.respawn_player();
    CommandResult::success("You have respawned").with_events(vec![event])
}

// =============================================================================
// Admin Commands
// =============================================================================

fn cmd_level(args: &[&str], world: &mut GameWorld) -> CommandResult {
    let level: u32 = match args.first().map(|a| a.parse()) {
        Some(Ok(l)) if (1..=MAX_ADMIN_LEVEL).contains(&l) => l,
        Some(_) => return CommandResult::error(format!("Level must be between 1 and {}", MAX_ADMIN_LEVEL)),
        None => return CommandResult::error("Usage: /level <level>"),
    };

    let player = &mut world.player;
    if level <= player.level {
        return CommandResult::error(format!("Already level {}", player.level));
    }

    let old_level = player.level;
    let mut events = Vec::new();
    while player.level < level {
        let up = player.level_up();
        events.push(GameEvent::LevelUp { level: up.level });
        events.extend(up.learned.into_iter().map(|skill| GameEvent::SkillLearned { skill }));
    }

    CommandResult::success(format!(
        "Level changed from {} to {}. HP={}, ATK={}, DEF={}, MAG={}",
        old_level, level, player.max_health, player.attack, player.defense, player.magic
    ))
    .with_events(events)
}

fn cmd_gold(args: &[&str], world: &mut GameWorld) -> CommandResult {
    let amount: i64 = match args.first().map(|a| a.parse()) {
        Some(Ok(a)) => a,
        Some(Err(_)) => return CommandResult::error("Invalid amount"),
        None => return CommandResult::error("Usage: /gold <amount>"),
    };

    let player = &mut world.player;
    let delta = u32::try_from(amount.unsigned_abs()).unwrap_or(u32::MAX);
    if amount >= 0 {
        player.gold = player.gold.saturating_add(delta);
    } else {
        player.gold = player.gold.saturating_sub(delta);
    }

    CommandResult::success(format!("Gold updated. You now have {} gold.", player.gold))
}

fn cmd_item(args: &[&str], world: &mut GameWorld) -> CommandResult {
    let (quantity, words) = match args.split_last().map(|(last, rest)| (last.parse::<u32>(), rest)) {
        Some((Ok(quantity), rest)) if !rest.is_empty() => (quantity, rest),
        _ => (1, args),
    };
    if words.is_empty() {
        return CommandResult::error("Usage: /item <name> [quantity]");
    }
    if quantity == 0 {
        return CommandResult::error("Quantity must be a positive number");
    }

    let name = words.join(" ");
    if world.catalog.item(&name).is_none() {
        return CommandResult::error(format!("Item {} does not exist", name));
    }
    world.player.add_item(&name, quantity);
    CommandResult::success(format!("Added {}x {} to inventory", quantity, name))
}

fn cmd_kill(args: &[&str], world: &mut GameWorld) -> CommandResult {
    let Some(target_id) = args.first().and_then(|a| parse_target(a)) else {
        return CommandResult::error("Usage: /kill <#id>");
    };

    match world.monster_mut(target_id) {
        Some(monster) if !monster.is_dead() => {
            monster.health = 0;
            CommandResult::success(format!("Killed {} #{}", monster.template.name, target_id))
        }
        _ => CommandResult::error(format!("Target {} not found", target_id)),
    }
}

fn cmd_teleport(args: &[&str], world: &mut GameWorld) -> CommandResult {
    let coords: Vec<f64> = args.iter().filter_map(|a| a.parse().ok()).collect();
    let &[x, y] = coords.as_slice() else {
        return CommandResult::error("Usage: /tp <x> <y>");
    };

    let position = world.bounds.clamp(Vec2::new(x, y), PLAYER_WIDTH, PLAYER_HEIGHT);
    world.player.position = position;
    CommandResult::success(format!("Teleported to ({:.1}, {:.1})", position.x, position.y))
}

fn cmd_spawn(args: &[&str], world: &mut GameWorld) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("Usage: /spawn <monster>");
    }
    let name = args.join(" ");
    let position = world.bounds.clamp(world.player.position + Vec2::new(100.0, 0.0), 32.0, 32.0);
    match world.spawn_monster(&name, position, None) {
        Ok(event) => CommandResult::success(format!("Spawned {}", name)).with_events(vec![event]),
        Err(e) => CommandResult::error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentCatalog;
    use crate::config::SimConfig;
    use crate::entities::Player;
    use crate::world::{MapId, ZoneManager};
    use mir_shared::{Profession, PLAYER_ID};

    fn world(profession: Profession) -> GameWorld {
        let catalog = ContentCatalog::builtin();
        let zones = ZoneManager::with_defaults();
        let spawn = zones.get_map(MapId::Village).unwrap().player_spawn;
        let player = Player::new(PLAYER_ID, "Hero", profession, spawn, &catalog);
        let config = SimConfig { top_up_chance: 0.0, ..SimConfig::default() };
        GameWorld::new(catalog, &config, &zones, MapId::Village, player, 1).unwrap().0
    }

    fn run(world: &mut GameWorld, line: &str, admin: bool) -> CommandResult {
        parse_and_execute(line, admin, world, 0).unwrap()
    }

    #[test]
    fn test_non_commands_are_ignored() {
        let mut w = world(Profession::Warrior);
        assert!(parse_and_execute("hello", false, &mut w, 0).is_none());
        assert!(!run(&mut w, "/", false).success);
        assert!(!run(&mut w, "/dance", false).success);
    }

    #[test]
    fn test_move_walks_several_steps() {
        let mut w = world(Profession::Warrior);
        let start = w.player.position;
        let result = run(&mut w, "/move right 10", false);
        assert!(result.success);
        assert_eq!(w.player.position, start + Vec2::new(30.0, 0.0));
        assert!(!run(&mut w, "/move sideways", false).success);
    }

    #[test]
    fn test_cast_by_name_and_hotkey() {
        let mut w = world(Profession::Mage);
        let by_name = run(&mut w, "/cast Lightning", false);
        assert!(!by_name.success);
        assert!(by_name.message.starts_with("Lightning"));

        let by_key = run(&mut w, "/cast 7", false);
        assert!(!by_key.success);
        assert!(matches!(&by_key.events[0], GameEvent::SkillRejected { skill, .. } if skill == "hotkey 7"));

        let spawned = run(&mut w, "/spawn Scarecrow", true);
        let GameEvent::MonsterSpawned { id, .. } = spawned.events[0] else {
            panic!("expected a spawn event, got {:?}", spawned.events);
        };
        let cast = run(&mut w, &format!("/cast Fireball #{}", id), false);
        assert!(cast.success, "{}", cast.message);
        assert!(cast.message.starts_with("Cast Fireball on 1 target(s)"));
        assert!(cast.message.contains(&format!("Hit #{}", id)));

        let skills = run(&mut w, "/skills", false).message;
        assert!(skills.contains("Fireball lv 1/3 range 150"));
    }

    #[test]
    fn test_admin_commands_need_privileges() {
        let mut w = world(Profession::Taoist);
        assert!(!run(&mut w, "/gold 100", false).success);
        assert_eq!(w.player.gold, 0);

        assert!(run(&mut w, "/gold 100", true).success);
        assert!(run(&mut w, "/gold -30", true).success);
        assert_eq!(w.player.gold, 70);
    }

    #[test]
    fn test_admin_level_learns_skills() {
        let mut w = world(Profession::Taoist);
        let result = run(&mut w, "/level 10", true);
        assert!(result.success);
        assert_eq!(w.player.level, 10);
        assert!(result.events.contains(&GameEvent::SkillLearned { skill: "Poison Cloud".into() }));
        assert!(!run(&mut w, "/level 5", true).success);
    }

    #[test]
    fn test_item_equip_and_unequip() {
        let mut w = world(Profession::Mage);
        assert!(run(&mut w, "/item Wooden Staff", true).success);
        assert!(!run(&mut w, "/item Excalibur 2", true).success);

        let index = w.player.inventory.stacks().iter().position(|s| s.name == "Wooden Staff").unwrap();
        assert!(run(&mut w, &format!("/equip {}", index), false).success);
        assert!(w.player.equipment.get(EquipSlot::Weapon).is_some());

        assert!(run(&mut w, "/unequip weapon", false).success);
        assert!(!run(&mut w, "/unequip weapon", false).success);
        assert_eq!(w.player.inventory.count("Wooden Staff"), 1);
    }

    #[test]
    fn test_admin_kill_only_hits_live_monsters() {
        let mut w = world(Profession::Warrior);
        assert!(run(&mut w, "/kill #10000", true).success);
        assert!(w.monster(10_000).unwrap().is_dead());
        assert!(!run(&mut w, "/kill #10000", true).success);
    }

    #[test]
    fn test_teleport_clamps_and_hotkey_rebinds() {
        let mut w = world(Profession::Warrior);
        assert!(run(&mut w, "/tp 5000 -20", true).success);
        assert_eq!(w.player.position, Vec2::new(2400.0 - PLAYER_WIDTH, 0.0));

        assert!(run(&mut w, "/hotkey 5 Basic Swordsmanship", false).success);
        assert_eq!(w.player.skill_for_hotkey(5).map(|s| s.def.name.as_str()), Some("Basic Swordsmanship"));
        assert!(!run(&mut w, "/hotkey 9 Basic Swordsmanship", false).success);
        assert!(!run(&mut w, "/hotkey 2 Slaying", false).success);
    }
}
