//! Frostfire - first-person arena shooter core
//!
//! Runs a scripted headless session in the configured level and logs the
//! outcome. Rendering and device polling belong to a host; this binary plays
//! the host's part with a fixed event script.

use std::process::ExitCode;

use frostfire::config::AppConfig;
use frostfire::demo::{default_script, DemoHost};
use frostfire_core::{Level, Session};

fn main() -> ExitCode {
    // Load configuration before logging so the configured level applies
    let loaded = AppConfig::load();
    let log_level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialize logging; RUST_LOG still wins
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
    log::info!("Starting Frostfire");

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level = Level::load_or_arena(&config.session.level_path)?;
    log::info!("Loaded level '{}' ({} solids)", level.name, level.solids.len());

    let mut session = Session::new(config.to_session_config(), &level)?;
    session.bind_default_clips();
    session.on_assets_loaded()?;

    let world = session.world();
    log::debug!(
        "Collision octree: {} triangles, {} nodes, depth {}",
        world.triangle_count(),
        world.node_count(),
        world.depth()
    );

    let mut host = DemoHost::new(session, config.input.clone(), default_script());
    let summary = host.run(config.session.demo_frames, config.session.demo_dt)?;

    if summary.debug_overlay_visible {
        let leaves = host.session().world().leaf_bounds();
        log::info!("Debug overlay: {} octree leaves", leaves.len());
    }

    log::info!(
        "Demo finished after {} frames ({:.2}s): score {} from {} shots, {} decals",
        summary.frames,
        summary.elapsed,
        summary.score,
        summary.shots,
        summary.decals
    );
    log::info!(
        "Player at {:?} (on floor: {}), action state {}, target {}",
        summary.eye_position,
        summary.on_floor,
        summary.action_state.as_deref().unwrap_or("none"),
        summary.target_state
    );

    Ok(())
}
