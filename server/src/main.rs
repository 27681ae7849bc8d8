//! Headless driver for the simulation.
//!
//! Runs the world at a fixed tick rate, feeding one console command per tick
//! from an optional script and logging every event.

use std::time::{Duration, Instant};

use log::{error, info, warn};

use mir_shared::{Millis, PLAYER_ID};
use mir_sim::catalog::ContentCatalog;
use mir_sim::cli;
use mir_sim::commands;
use mir_sim::config::SimConfig;
use mir_sim::display::{Display, LogDisplay};
use mir_sim::entities::Player;
use mir_sim::persistence::{self, PersistenceHandle, SaveData};
use mir_sim::world::{GameWorld, ZoneManager};

/// Script lines with comments and blanks removed
fn load_script(path: &std::path::Path) -> Result<Vec<String>, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("Failed to read script: {}", e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

async fn load_player(
    persistence: Option<&PersistenceHandle>,
    slot: u8,
    catalog: &ContentCatalog,
    now: Millis,
) -> Option<Player> {
    let persistence = persistence?;
    match persistence.load(slot).await {
        Ok(data) => match data.restore(PLAYER_ID, catalog, now) {
            Ok(player) => Some(player),
            Err(e) => {
                error!("Save slot {} could not be restored: {}", slot, e);
                None
            }
        },
        Err(e) => {
            warn!("Could not load slot {}: {}", slot, e);
            None
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::parse_args();

    let mut config = match &args.config {
        Some(path) => match SimConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                return;
            }
        },
        None => SimConfig::default(),
    };
    if let Some(rate) = args.tick_rate.filter(|&r| r > 0) {
        config.tick_rate = rate;
    }
    if let Some(dir) = &args.save_dir {
        config.save_dir = dir.clone();
    }

    let catalog = match &args.catalog {
        Some(path) => ContentCatalog::load_from_json(path).unwrap_or_else(|e| {
            error!("Failed to load catalog {}: {}", path.display(), e);
            error!("Using built-in content");
            ContentCatalog::builtin()
        }),
        None => ContentCatalog::builtin(),
    };

    let mut zones = ZoneManager::with_defaults();
    if let Some(path) = &args.maps {
        match zones.load_from_json(path) {
            Ok(count) => info!("Loaded {} map definitions from {}", count, path.display()),
            Err(e) => error!("Failed to load maps: {}", e),
        }
    }

    let script = match &args.script {
        Some(path) => match load_script(path) {
            Ok(lines) => Some(lines),
            Err(e) => {
                error!("{}", e);
                return;
            }
        },
        None => None,
    };

    // Initialize persistence (save slots on disk)
    let persistence = match persistence::init(&config.save_dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            error!("Failed to initialize persistence: {}", e);
            error!("Running without saves");
            None
        }
    };

    let clock = Instant::now();
    let clock_ms = || clock.elapsed().as_millis() as Millis;

    let loaded = if args.load {
        load_player(persistence.as_ref(), args.slot, &catalog, clock_ms()).await
    } else {
        None
    };
    let player = match loaded {
        Some(player) => {
            info!("Resumed {} (level {} {})", player.name, player.level, player.profession);
            player
        }
        None => {
            let spawn = zones.get_map(args.map).map(|m| m.player_spawn).unwrap_or_default();
            Player::new(PLAYER_ID, &args.name, args.profession, spawn, &catalog)
        }
    };

    let mut display = LogDisplay;
    let (mut world, spawn_events) = match GameWorld::new(catalog, &config, &zones, args.map, player, args.seed) {
        Ok(created) => created,
        Err(e) => {
            error!("Failed to create world: {}", e);
            return;
        }
    };
    for event in &spawn_events {
        display.report(event);
    }

    info!("Starting {} on {} at {} Hz", world.player.name, args.map, config.tick_rate);

    let tick_duration = Duration::from_secs_f64(1.0 / config.tick_rate as f64);
    let mut tick_count: u64 = 0;
    let mut script_lines = script.as_deref().unwrap_or_default().iter();

    // Timer for periodic saves
    let mut last_save = Instant::now();
    let save_interval = Duration::from_secs(config.autosave_interval_secs);

    // Main game loop
    loop {
        let tick_start = Instant::now();
        let now = clock_ms();

        if let Some(line) = script_lines.next() {
            match commands::parse_and_execute(line, args.admin, &mut world, now) {
                Some(result) => {
                    if result.success {
                        info!("{} -> {}", line, result.message);
                    } else {
                        warn!("{} -> {}", line, result.message);
                    }
                    for event in &result.events {
                        display.report(event);
                    }
                }
                None => warn!("Not a command: {}", line),
            }
        }

        for event in world.tick(now, &[]) {
            display.report(&event);
        }
        world.present(&mut display);

        // Periodic save
        if config.autosave_interval_secs > 0 && last_save.elapsed() >= save_interval {
            if let Some(persistence) = &persistence {
                persistence.save(args.slot, SaveData::capture(&world.player, now));
                info!("Periodic save queued");
            }
            last_save = Instant::now();
        }

        tick_count += 1;
        let finished = match args.ticks {
            Some(limit) => tick_count >= limit,
            None => script.is_some() && script_lines.len() == 0,
        };
        if finished {
            break;
        }

        // Sleep until next tick
        let elapsed = tick_start.elapsed();
        if elapsed < tick_duration {
            tokio::time::sleep(tick_duration - elapsed).await;
        }
    }

    info!(
        "Stopped after {} ticks: {} is level {} with {} gold",
        tick_count, world.player.name, world.player.level, world.player.gold
    );

    if let Some(persistence) = persistence {
        match persistence.save_now(args.slot, SaveData::capture(&world.player, clock_ms())).await {
            Ok(()) => info!("Final save queued"),
            Err(e) => error!("Final save failed: {}", e),
        }
        persistence.shutdown().await;
    }
}
