//! Tunable game constants.
//!
//! Every field has a default matching the arcade layout, so a config file
//! only needs to name the values it wants to change.

use std::path::Path;

use serde::Deserialize;

use crate::collision::{DEFAULT_HIT_THRESHOLD, LASER_CLASH_THRESHOLD};
use crate::entities::Difficulty;
use crate::error::GameError;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    // ── Play field (origin at the centre, y grows upward) ───────────────────
    pub screen_width: f32,
    pub screen_height: f32,

    // ── Scheduling ──────────────────────────────────────────────────────────
    pub tick_ms: u64,
    pub transition_delay_ms: u64,
    pub bonus_animation_ms: u64,
    pub explosion_frame_ms: u64,
    pub explosion_frames: u32,

    // ── Swarm ───────────────────────────────────────────────────────────────
    pub alien_rows: usize,
    pub alien_cols: usize,
    pub alien_spacing_x: f32,
    pub alien_spacing_y: f32,
    pub alien_step_x: f32,
    pub alien_step_y: f32,
    /// Distance from a side wall at which the swarm turns around.
    pub alien_edge_margin: f32,
    pub max_enemy_lasers: usize,
    pub shoot_interval_min_ms: u64,
    pub shoot_interval_max_ms: u64,

    // ── Projectiles & collision ─────────────────────────────────────────────
    pub laser_velocity: f32,
    pub laser_hit_radius: f32,
    pub laser_clash_radius: f32,

    // ── Shields ─────────────────────────────────────────────────────────────
    pub num_shields: usize,
    pub block_size: f32,
    pub shield_hit_radius: f32,

    // ── Ships & scoring ─────────────────────────────────────────────────────
    pub lives: u32,
    pub max_lives: u32,
    pub bonus_life_threshold: u32,
    pub points_per_enemy: u32,
    pub boss_bonus_points: u32,
    pub ship_step: f32,
    pub ship_step_ms: u64,
    pub shot_cooldown_ms: u64,
    pub shoot_repeat_ms: u64,

    // ── Boss ────────────────────────────────────────────────────────────────
    pub boss_step: f32,
    pub boss_step_ms: u64,
    pub boss_interval_min_ms: u64,
    pub boss_interval_max_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            screen_width: 960.0,
            screen_height: 1024.0,

            tick_ms: 20,
            transition_delay_ms: 2000,
            bonus_animation_ms: 1000,
            explosion_frame_ms: 100,
            explosion_frames: 4,

            alien_rows: 5,
            alien_cols: 11,
            alien_spacing_x: 60.0,
            alien_spacing_y: 50.0,
            alien_step_x: 10.0,
            alien_step_y: 10.0,
            alien_edge_margin: 40.0,
            max_enemy_lasers: 1,
            shoot_interval_min_ms: 200,
            shoot_interval_max_ms: 600,

            laser_velocity: 10.0,
            laser_hit_radius: DEFAULT_HIT_THRESHOLD,
            laser_clash_radius: LASER_CLASH_THRESHOLD,

            num_shields: 4,
            block_size: 25.0,
            shield_hit_radius: 15.0,

            lives: 3,
            max_lives: 5,
            bonus_life_threshold: 2000,
            points_per_enemy: 20,
            boss_bonus_points: 300,
            ship_step: 20.0,
            ship_step_ms: 20,
            shot_cooldown_ms: 1500,
            shoot_repeat_ms: 100,

            boss_step: 5.0,
            boss_step_ms: 20,
            boss_interval_min_ms: 15_000,
            boss_interval_max_ms: 30_000,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, GameError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, GameError> {
        let contents = std::fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
        Self::from_toml_str(&contents)
    }

    pub fn left_wall(&self) -> f32 {
        -self.screen_width / 2.0
    }

    pub fn right_wall(&self) -> f32 {
        self.screen_width / 2.0
    }

    pub fn top_wall(&self) -> f32 {
        self.screen_height / 2.0
    }

    pub fn bottom_wall(&self) -> f32 {
        -self.screen_height / 2.0
    }

    pub fn ship_width(&self) -> f32 {
        self.screen_width * 0.12
    }

    pub fn ship_height(&self) -> f32 {
        self.screen_height * 0.015
    }

    /// Resting height of a freshly positioned ship.
    pub fn ship_baseline(&self) -> f32 {
        self.bottom_wall() + self.screen_height * 0.15
    }
}

// ── Difficulty tables ────────────────────────────────────────────────────────

/// Starting `(movement_speed, shooting_chance)` for a fresh turn.
pub fn initial_swarm_tuning(difficulty: Difficulty) -> (f32, f64) {
    match difficulty {
        Difficulty::Easy => (0.3, 0.05),
        Difficulty::Medium => (0.2, 0.08),
        Difficulty::Hard => (0.12, 0.12),
    }
}

/// Per-level `(speed_factor, shot_increment)`.
pub fn level_scaling(difficulty: Difficulty) -> (f32, f64) {
    match difficulty {
        Difficulty::Easy => (0.95, 0.001),
        Difficulty::Medium => (0.9, 0.002),
        Difficulty::Hard => (0.85, 0.003),
    }
}

pub const MIN_MOVEMENT_SPEED: f32 = 0.05;
pub const MAX_SHOOTING_CHANCE: f64 = 0.2;
