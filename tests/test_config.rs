use space_invaders::config::*;
use space_invaders::entities::Difficulty;
use space_invaders::GameError;

use tempfile::tempdir;

#[test]
fn defaults_match_arcade_layout() {
    let cfg = GameConfig::default();
    assert_eq!(cfg.screen_width, 960.0);
    assert_eq!(cfg.screen_height, 1024.0);
    assert_eq!(cfg.alien_rows * cfg.alien_cols, 55);
    assert_eq!(cfg.lives, 3);
    assert_eq!(cfg.max_lives, 5);
    assert_eq!(cfg.bonus_life_threshold, 2000);
    assert_eq!(cfg.transition_delay_ms, 2000);
}

#[test]
fn walls_centre_the_origin() {
    let cfg = GameConfig::default();
    assert_eq!(cfg.left_wall(), -480.0);
    assert_eq!(cfg.right_wall(), 480.0);
    assert_eq!(cfg.top_wall(), 512.0);
    assert_eq!(cfg.bottom_wall(), -512.0);
    assert!(cfg.ship_baseline() > cfg.bottom_wall());
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let cfg = GameConfig::from_toml_str("lives = 5\nalien_rows = 2\n").unwrap();
    assert_eq!(cfg.lives, 5);
    assert_eq!(cfg.alien_rows, 2);
    assert_eq!(cfg.alien_cols, GameConfig::default().alien_cols);
    assert_eq!(cfg.tick_ms, 20);
}

#[test]
fn empty_toml_is_default() {
    assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
}

#[test]
fn wrong_type_is_a_config_error() {
    let err = GameConfig::from_toml_str("lives = \"three\"").unwrap_err();
    assert!(matches!(err, GameError::Config(_)));
}

#[test]
fn load_reads_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("game.toml");
    std::fs::write(&path, "num_shields = 6\n").unwrap();
    let cfg = GameConfig::load(&path).unwrap();
    assert_eq!(cfg.num_shields, 6);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = GameConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, GameError::Io { .. }));
}

// ── Difficulty tables ─────────────────────────────────────────────────────────

#[test]
fn harder_tiers_start_faster_and_shoot_more() {
    let (easy_speed, easy_chance) = initial_swarm_tuning(Difficulty::Easy);
    let (med_speed, med_chance) = initial_swarm_tuning(Difficulty::Medium);
    let (hard_speed, hard_chance) = initial_swarm_tuning(Difficulty::Hard);
    assert!(easy_speed > med_speed && med_speed > hard_speed);
    assert!(easy_chance < med_chance && med_chance < hard_chance);
}

#[test]
fn level_scaling_always_speeds_up() {
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let (factor, increment) = level_scaling(difficulty);
        assert!(factor < 1.0);
        assert!(increment > 0.0);
    }
}
