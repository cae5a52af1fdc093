//! The alien swarm: grid layout, lock-step movement and random fire.
//!
//! Movement and shooting each run on their own self-rescheduling timer.  Both
//! timers carry the generation they were armed with; `cancel_timers` bumps
//! both generations so callbacks already in the queue fall through.

use glam::Vec2;
use rand::Rng;

use crate::config::{
    initial_swarm_tuning, level_scaling, GameConfig, MAX_SHOOTING_CHANCE, MIN_MOVEMENT_SPEED,
};
use crate::entities::{Alien, AlienTier, Difficulty, Heading, Projectile};
use crate::scheduler::{Generation, Scheduler, Task};

#[derive(Clone, Debug)]
pub struct Swarm {
    pub aliens: Vec<Alien>,
    pub lasers: Vec<Projectile>,
    /// +1 marching right, -1 marching left.
    pub direction: i32,
    pub step_x: f32,
    pub step_y: f32,
    /// Seconds between movement steps.
    pub movement_speed: f32,
    /// Probability that a shooting cycle actually fires.
    pub shooting_chance: f64,
    running: bool,
    movement_generation: Generation,
    shooting_generation: Generation,
    layout: Layout,
}

#[derive(Clone, Debug)]
struct Layout {
    rows: usize,
    cols: usize,
    spacing_x: f32,
    spacing_y: f32,
    top: f32,
    left_bound: f32,
    right_bound: f32,
    bottom: f32,
    max_lasers: usize,
    laser_velocity: f32,
    shoot_interval_ms: (u64, u64),
}

impl Swarm {
    pub fn new(config: &GameConfig) -> Self {
        Swarm {
            aliens: Vec::new(),
            lasers: Vec::new(),
            direction: 1,
            step_x: config.alien_step_x,
            step_y: config.alien_step_y,
            movement_speed: 0.08,
            shooting_chance: 0.8,
            running: false,
            movement_generation: Generation::default(),
            shooting_generation: Generation::default(),
            layout: Layout {
                rows: config.alien_rows,
                cols: config.alien_cols,
                spacing_x: config.alien_spacing_x,
                spacing_y: config.alien_spacing_y,
                top: config.top_wall() - 100.0,
                left_bound: config.left_wall() + config.alien_edge_margin,
                right_bound: config.right_wall() - config.alien_edge_margin,
                bottom: config.bottom_wall(),
                max_lasers: config.max_enemy_lasers,
                laser_velocity: config.laser_velocity,
                shoot_interval_ms: (config.shoot_interval_min_ms, config.shoot_interval_max_ms),
            },
        }
    }

    // ── Layout ───────────────────────────────────────────────────────────────

    /// Append a fresh grid centred horizontally below the top wall.
    /// Row 0 is the top row.
    pub fn generate_grid(&mut self) {
        let l = &self.layout;
        let start_x = (-(l.cols.saturating_sub(1) as f32 * l.spacing_x) / 2.0).floor();
        for row in (0..l.rows).rev() {
            let tier = AlienTier::for_row(row);
            for col in 0..l.cols {
                let x = start_x + col as f32 * l.spacing_x;
                let y = l.top - row as f32 * l.spacing_y;
                self.aliens.push(Alien::new(Vec2::new(x, y), tier));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.aliens.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn movement_generation(&self) -> Generation {
        self.movement_generation
    }

    pub fn shooting_generation(&self) -> Generation {
        self.shooting_generation
    }

    pub fn movement_interval_ms(&self) -> u64 {
        (self.movement_speed * 1000.0).round().max(1.0) as u64
    }

    // ── Difficulty ───────────────────────────────────────────────────────────

    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        let (speed, chance) = initial_swarm_tuning(difficulty);
        self.movement_speed = speed;
        self.shooting_chance = chance;
    }

    /// One level's worth of speed-up, clamped to the fastest cadence and the
    /// highest shot chance.
    pub fn escalate(&mut self, difficulty: Difficulty) {
        let (speed_factor, shot_increment) = level_scaling(difficulty);
        self.movement_speed = (self.movement_speed * speed_factor).max(MIN_MOVEMENT_SPEED);
        self.shooting_chance = (self.shooting_chance + shot_increment).min(MAX_SHOOTING_CHANCE);
    }

    // ── Timers ───────────────────────────────────────────────────────────────

    /// Mark the swarm running and arm both loops under fresh generations.
    pub fn start(&mut self, scheduler: &mut Scheduler) {
        self.movement_generation.bump();
        self.shooting_generation.bump();
        self.running = true;
        scheduler.after(
            0,
            Task::SwarmMove {
                generation: self.movement_generation,
            },
        );
        scheduler.after(
            0,
            Task::SwarmShoot {
                generation: self.shooting_generation,
            },
        );
    }

    /// Stop both loops.  Aliens and lasers stay where they are.
    pub fn cancel_timers(&mut self) {
        self.running = false;
        self.movement_generation.bump();
        self.shooting_generation.bump();
    }

    /// Cancel, clear and lay out a fresh grid without starting the loops.
    pub fn regenerate(&mut self) {
        self.cancel_timers();
        self.clear_all();
        self.direction = 1;
        self.generate_grid();
    }

    /// Cancel, clear, regenerate and start again.
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        self.regenerate();
        self.start(scheduler);
    }

    /// Movement timer callback.  Returns whether the swarm moved.
    pub fn on_move_timer(&mut self, generation: Generation, scheduler: &mut Scheduler) -> bool {
        if !self.running || generation != self.movement_generation {
            return false;
        }
        let moved = self.move_step();
        scheduler.after(self.movement_interval_ms(), Task::SwarmMove { generation });
        moved
    }

    /// Shooting timer callback.  Returns whether a laser was fired.
    pub fn on_shoot_timer(
        &mut self,
        generation: Generation,
        scheduler: &mut Scheduler,
        rng: &mut impl Rng,
    ) -> bool {
        if !self.running || generation != self.shooting_generation {
            return false;
        }
        let fired = self.try_shoot(rng);
        let (lo, hi) = self.layout.shoot_interval_ms;
        let interval = rng.gen_range(lo..=hi.max(lo)).max(1);
        scheduler.after(interval, Task::SwarmShoot { generation });
        fired
    }

    /// Paused counterpart of [`Swarm::on_move_timer`]: keep the cadence
    /// without stepping.  Stale generations still fall through.
    pub fn hold_move(&mut self, generation: Generation, scheduler: &mut Scheduler) -> bool {
        if !self.running || generation != self.movement_generation {
            return false;
        }
        scheduler.after(self.movement_interval_ms(), Task::SwarmMove { generation });
        true
    }

    /// Paused counterpart of [`Swarm::on_shoot_timer`]: draw the next
    /// interval without rolling for a shot.
    pub fn hold_shoot(
        &mut self,
        generation: Generation,
        scheduler: &mut Scheduler,
        rng: &mut impl Rng,
    ) -> bool {
        if !self.running || generation != self.shooting_generation {
            return false;
        }
        let (lo, hi) = self.layout.shoot_interval_ms;
        let interval = rng.gen_range(lo..=hi.max(lo)).max(1);
        scheduler.after(interval, Task::SwarmShoot { generation });
        true
    }

    // ── Motion & fire ────────────────────────────────────────────────────────

    /// Shift every alien sideways; if any of them crossed a side bound, the
    /// whole swarm turns around and drops one row.  Returns whether anything
    /// moved.
    pub fn move_step(&mut self) -> bool {
        if self.aliens.is_empty() {
            return false;
        }

        let dx = self.step_x * self.direction as f32;
        let mut should_descend = false;
        for alien in &mut self.aliens {
            alien.position.x += dx;
            if alien.position.x > self.layout.right_bound || alien.position.x < self.layout.left_bound
            {
                should_descend = true;
            }
        }

        if should_descend {
            self.direction = -self.direction;
            for alien in &mut self.aliens {
                alien.position.y -= self.step_y;
            }
        }
        true
    }

    /// Roll for a shot from a random alien, respecting the laser cap.
    pub fn try_shoot(&mut self, rng: &mut impl Rng) -> bool {
        let in_flight = self.lasers.iter().filter(|l| l.active).count();
        if in_flight >= self.layout.max_lasers || self.aliens.is_empty() {
            return false;
        }
        if !rng.gen_bool(self.shooting_chance.clamp(0.0, 1.0)) {
            return false;
        }
        let shooter = &self.aliens[rng.gen_range(0..self.aliens.len())];
        self.lasers.push(Projectile::new(shooter.position, Heading::Down));
        true
    }

    pub fn update_lasers(&mut self) {
        let top = f32::INFINITY;
        for laser in &mut self.lasers {
            laser.advance(self.layout.laser_velocity, top, self.layout.bottom);
        }
        self.lasers.retain(|l| l.active);
    }

    /// Remove the alien at `index` and hand it back, marked dead.
    pub fn handle_hit(&mut self, index: usize) -> Option<Alien> {
        if index >= self.aliens.len() {
            return None;
        }
        let mut alien = self.aliens.remove(index);
        alien.alive = false;
        alien.visible = false;
        Some(alien)
    }

    /// Remove several aliens at once; indices may come in any order.
    pub fn remove_hits(&mut self, indices: &[usize]) -> Vec<Alien> {
        let mut dead = Vec::with_capacity(indices.len());
        let mut kept = Vec::with_capacity(self.aliens.len());
        for (i, mut alien) in std::mem::take(&mut self.aliens).into_iter().enumerate() {
            if indices.contains(&i) {
                alien.alive = false;
                alien.visible = false;
                dead.push(alien);
            } else {
                kept.push(alien);
            }
        }
        self.aliens = kept;
        dead
    }

    pub fn clear_lasers(&mut self) {
        self.lasers.clear();
    }

    pub fn clear_aliens(&mut self) {
        self.aliens.clear();
    }

    pub fn clear_all(&mut self) {
        self.clear_aliens();
        self.clear_lasers();
    }
}
