//! Integration tests for the session frame driver
//!
//! These tests run whole frames against the built-in arena:
//! 1. The shipped level file describes the built-in arena
//! 2. The player settles on the floor and walks
//! 3. Fire and reload clips play out and hand back to idle
//! 4. The target seeks the player and relocates when shot

use frostfire_core::{
    IntentSnapshot, Intents, Level, Session, SessionConfig, TargetState, FIRE, IDLE, RELOAD,
};

const FRAME: f32 = 1.0 / 60.0;

fn arena_session(config: SessionConfig) -> Session {
    let mut session = Session::new(config, &Level::arena()).expect("arena session should build");
    session.bind_default_clips();
    session.on_assets_loaded().expect("default clips should cover every state");
    session
}

fn seeded() -> SessionConfig {
    let mut config = SessionConfig::default();
    config.target.seed = Some(42);
    config
}

fn run(session: &mut Session, frames: usize, input: IntentSnapshot) {
    for _ in 0..frames {
        session.step(FRAME, &input).unwrap();
    }
}

// ==================== Level Tests ====================

#[test]
fn test_arena_file_matches_builtin() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../levels/arena.ron");
    let level = Level::load(path).expect("arena.ron should parse");
    assert_eq!(level, Level::arena());
}

// ==================== Movement Tests ====================

#[test]
fn test_player_settles_on_arena_floor() {
    let mut session = arena_session(seeded());
    run(&mut session, 120, IntentSnapshot::default());

    assert!(session.controller().on_floor);
    assert!(
        (session.eye_position().y - 3.35).abs() < 0.02,
        "Eye should rest one capsule above the floor, got {}",
        session.eye_position().y
    );
}

#[test]
fn test_player_walks_forward() {
    let mut session = arena_session(seeded());
    run(&mut session, 120, IntentSnapshot::default());
    let before = session.eye_position();

    run(&mut session, 60, IntentSnapshot::holding(Intents::FORWARD));
    let after = session.eye_position();

    assert!(after.z < before.z - 3.0, "Player should move down -Z, got {:?}", after);
    assert!((after.x - before.x).abs() < 0.05);
    assert!(session.controller().on_floor);
}

// ==================== Action State Tests ====================

#[test]
fn test_fire_plays_out_and_returns_to_idle() {
    let mut session = arena_session(seeded());
    assert_eq!(session.active_state(), Some(IDLE));

    session.step(FRAME, &IntentSnapshot::holding(Intents::FIRE)).unwrap();
    assert_eq!(session.active_state(), Some(FIRE));

    // Holding fire does not restart the clip
    run(&mut session, 10, IntentSnapshot::holding(Intents::FIRE));
    assert_eq!(session.active_state(), Some(FIRE));

    run(&mut session, 30, IntentSnapshot::default());
    assert_eq!(session.active_state(), Some(IDLE));
}

#[test]
fn test_reload_ignores_fire_until_done() {
    let mut session = arena_session(seeded());

    session.step(FRAME, &IntentSnapshot::holding(Intents::RELOAD)).unwrap();
    assert_eq!(session.active_state(), Some(RELOAD));

    run(&mut session, 60, IntentSnapshot::holding(Intents::FIRE));
    assert_eq!(session.active_state(), Some(RELOAD));

    run(&mut session, 60, IntentSnapshot::default());
    assert_eq!(session.active_state(), Some(IDLE));
}

// ==================== Target Tests ====================

#[test]
fn test_target_reaches_player() {
    let mut session = arena_session(seeded());
    assert_eq!(session.target().state(), TargetState::Approaching);

    run(&mut session, 420, IntentSnapshot::default());
    assert_eq!(session.target().state(), TargetState::Tagged);

    let reach = session.camera().reach_point(3.0);
    assert!((session.target().position() - reach).length() <= 0.1);
}

#[test]
fn test_shot_relocates_target() {
    let mut config = seeded();
    config.target.relocation_min = 50;
    config.target.relocation_max = 60;
    let mut session = arena_session(config);
    session.set_active(true);
    session.camera_mut().set_orientation(0.0, -0.35);

    let report = session
        .step(FRAME, &IntentSnapshot::default().with_trigger())
        .unwrap();

    assert!(report.shot.as_ref().is_some_and(|s| s.scored()));
    assert_eq!(session.score(), 1);
    let position = session.target().position();
    assert!(position.x > 49.0 && position.x < 60.0, "Target at {:?}", position);
}

#[test]
fn test_decals_are_capped() {
    let mut config = seeded();
    config.target.max_decals = 3;
    let mut session = arena_session(config);
    session.set_active(true);
    // Straight down at the floor
    session.camera_mut().set_orientation(0.0, -1.5);

    for _ in 0..5 {
        session
            .step(FRAME, &IntentSnapshot::default().with_trigger())
            .unwrap();
    }
    assert_eq!(session.decals().count(), 3);
    for decal in session.decals() {
        assert!(decal.normal.y > 0.99);
    }
}

#[test]
fn test_seeded_sessions_are_deterministic() {
    let script = |session: &mut Session| {
        session.set_active(true);
        session.camera_mut().set_orientation(0.0, -0.35);
        session
            .step(FRAME, &IntentSnapshot::default().with_trigger())
            .unwrap();
        run(session, 30, IntentSnapshot::holding(Intents::LEFT));
    };

    let mut a = arena_session(seeded());
    let mut b = arena_session(seeded());
    script(&mut a);
    script(&mut b);

    assert_eq!(a.target().position(), b.target().position());
    assert_eq!(a.eye_position(), b.eye_position());
}
