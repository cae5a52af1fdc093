//! The authoritative game state and its turn / level state machine.
//!
//! `GameState` owns every component plus the scheduler.  The host calls
//! [`GameState::advance`] with the current clock and forwards input through
//! the `on_*` handlers; everything else happens inside scheduled tasks.
//!
//! Per tick the order is fixed: projectiles move, then collisions resolve,
//! then wave-clear is evaluated.  A laser that left the field this tick is
//! already inactive by the time collisions look at it.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::boss::Boss;
use crate::collision;
use crate::config::GameConfig;
use crate::entities::{
    BonusLife, Difficulty, Entity, Explosion, HorizontalMove, Phase, PlayerId, Ship,
};
use crate::events::{GameEvent, Music, Sound};
use crate::scheduler::{Generation, Scheduler, Task};
use crate::shields::ShieldSystem;
use crate::swarm::Swarm;

/// Centre-screen message shown while the simulation is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    Level(u32),
    PlayerTurn(PlayerId),
    Paused,
}

pub struct GameState {
    pub config: GameConfig,
    pub phase: Phase,
    pub paused: bool,
    pub difficulty: Option<Difficulty>,
    pub level: u32,
    pub active: PlayerId,
    pub ships: [Ship; 2],
    pub swarm: Swarm,
    pub shields: ShieldSystem,
    pub boss: Boss,
    pub high_score: u32,
    pub banner: Option<Banner>,
    pub bonus_life: Option<BonusLife>,
    pub explosions: Vec<Explosion>,
    surface_available: bool,
    scheduler: Scheduler,
    rng: StdRng,
    /// Bumped on game over / restart; guards the transition delays.
    session: Generation,
    shoot_generation: Generation,
    bonus_generation: Generation,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(config: GameConfig, high_score: u32) -> Self {
        Self::with_rng(config, high_score, StdRng::from_entropy())
    }

    /// Same as [`GameState::new`] but with a reproducible RNG.
    pub fn with_seed(config: GameConfig, high_score: u32, seed: u64) -> Self {
        Self::with_rng(config, high_score, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, high_score: u32, mut rng: StdRng) -> Self {
        let spawn = spawn_point(&config);
        let ships = [
            Ship::new(PlayerId::Player1, spawn, config.lives),
            Ship::new(PlayerId::Player2, spawn, config.lives),
        ];
        let mut swarm = Swarm::new(&config);
        swarm.generate_grid();
        let mut shields = ShieldSystem::new(&config);
        shields.generate(&mut rng);
        let boss = Boss::new(&config);

        let mut game = GameState {
            phase: Phase::Menu,
            paused: false,
            difficulty: None,
            level: 1,
            active: PlayerId::Player1,
            ships,
            swarm,
            shields,
            boss,
            high_score,
            banner: None,
            bonus_life: None,
            explosions: Vec::new(),
            surface_available: true,
            scheduler: Scheduler::new(),
            rng,
            session: Generation::default(),
            shoot_generation: Generation::default(),
            bonus_generation: Generation::default(),
            events: Vec::new(),
            config,
        };
        game.ships[PlayerId::Player2.index()].hide();

        game.scheduler.after(game.config.tick_ms.max(1), Task::Tick);
        game.scheduler.after(game.config.ship_step_ms.max(1), Task::ShipStep);
        game.schedule_boss_appearance();
        game
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn active_ship(&self) -> &Ship {
        &self.ships[self.active.index()]
    }

    pub fn active_ship_mut(&mut self) -> &mut Ship {
        &mut self.ships[self.active.index()]
    }

    pub fn ship(&self, player: PlayerId) -> &Ship {
        &self.ships[player.index()]
    }

    /// True while the tick body, ship control and boss flight should run.
    pub fn is_simulating(&self) -> bool {
        self.phase == Phase::Playing && !self.paused
    }

    /// Tell the core whether frames can be shown.  While unavailable the
    /// tick keeps its cadence but does no work.
    pub fn set_surface_available(&mut self, available: bool) {
        self.surface_available = available;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    // ── Clock ────────────────────────────────────────────────────────────────

    /// Run every task due at or before `now_ms`, in order.
    pub fn advance(&mut self, now_ms: u64) {
        while let Some(task) = self.scheduler.pop_due(now_ms) {
            self.dispatch(task);
        }
        self.scheduler.settle(now_ms);
    }

    /// Advance the clock by `delta_ms` from where it is now.
    pub fn advance_by(&mut self, delta_ms: u64) {
        let target = self.now_ms() + delta_ms;
        self.advance(target);
    }

    fn dispatch(&mut self, task: Task) {
        match task {
            Task::Tick => {
                self.tick();
                self.scheduler.after(self.config.tick_ms.max(1), Task::Tick);
            }
            Task::ShipStep => {
                if self.is_simulating() {
                    self.step_ship();
                }
                self.scheduler.after(self.config.ship_step_ms.max(1), Task::ShipStep);
            }
            Task::ShootRepeat { generation } => {
                if generation != self.shoot_generation {
                    return;
                }
                self.fire();
                self.scheduler.after(self.config.shoot_repeat_ms.max(1), task);
            }
            Task::SwarmMove { generation } => {
                if self.paused {
                    self.swarm.hold_move(generation, &mut self.scheduler);
                } else {
                    self.swarm.on_move_timer(generation, &mut self.scheduler);
                }
            }
            Task::SwarmShoot { generation } => {
                if self.paused {
                    self.swarm
                        .hold_shoot(generation, &mut self.scheduler, &mut self.rng);
                } else {
                    self.swarm
                        .on_shoot_timer(generation, &mut self.scheduler, &mut self.rng);
                }
            }
            Task::BossMove { generation } => {
                if self.is_simulating() {
                    self.boss.on_move_timer(generation, &mut self.scheduler);
                } else if self.boss.is_active() && generation == self.boss.generation() {
                    // Hold position until play resumes.
                    self.scheduler.after(self.config.boss_step_ms.max(1), task);
                }
            }
            Task::BossAppearance => {
                if self.is_simulating() && self.boss.appear(&mut self.scheduler, &mut self.rng) {
                    self.sound(Sound::Boss);
                }
                self.schedule_boss_appearance();
            }
            Task::ResumeLevel { session } => {
                if session == self.session {
                    self.resume_level();
                }
            }
            Task::StartSecondTurn { session } => {
                if session == self.session {
                    self.start_second_turn();
                }
            }
            Task::ClearBonusLife { generation } => {
                if generation == self.bonus_generation {
                    self.bonus_life = None;
                }
            }
        }
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// One pass of the update loop.  Does nothing while paused, between
    /// turns or levels, or without a surface.  Rescheduling is the caller's
    /// job so a skipped body never stops the clock.
    pub fn tick(&mut self) {
        let now = self.now_ms();
        let (frame_ms, frames) = (self.config.explosion_frame_ms, self.config.explosion_frames);
        self.explosions.retain(|e| e.frame(now, frame_ms) < frames);

        if !self.is_simulating() || !self.surface_available {
            return;
        }

        // 1. Motion
        let (velocity, top, bottom) = (
            self.config.laser_velocity,
            self.config.top_wall(),
            self.config.bottom_wall(),
        );
        self.ships[self.active.index()].update_lasers(velocity, top, bottom);
        self.swarm.update_lasers();

        // 2. Collisions
        self.check_player_hit();
        if self.phase != Phase::Playing {
            return;
        }
        self.check_enemy_hit();
        let idx = self.active.index();
        self.shields.check_collision(&mut self.ships[idx].lasers);
        self.shields.check_collision(&mut self.swarm.lasers);
        self.shields.check_collision_with_aliens(&self.swarm.aliens);
        self.check_laser_collisions();
        self.check_boss_hit();

        // 3. Wave clear
        if self.swarm.is_empty() && self.phase == Phase::Playing {
            self.begin_level_transition();
        }
    }

    fn check_player_hit(&mut self) {
        let idx = self.active.index();
        let threshold = self.config.ship_width() / 4.0;
        let hits = collision::lasers_vs_targets(
            &self.swarm.lasers,
            std::slice::from_ref(&self.ships[idx]),
            threshold,
        );
        if let Some(&(laser, _)) = hits.first() {
            self.swarm.lasers[laser].deactivate();
            self.ship_hit();
        }
    }

    fn check_enemy_hit(&mut self) {
        let idx = self.active.index();
        let hits = collision::lasers_vs_targets(
            &self.ships[idx].lasers,
            &self.swarm.aliens,
            self.config.laser_hit_radius,
        );
        if hits.is_empty() {
            return;
        }

        let mut targets = Vec::with_capacity(hits.len());
        for &(laser, alien) in &hits {
            self.ships[idx].lasers[laser].deactivate();
            targets.push(alien);
        }
        for alien in self.swarm.remove_hits(&targets) {
            self.explode(alien.position);
            self.sound(Sound::Explosion);
            self.award_points(self.config.points_per_enemy);
        }
    }

    fn check_laser_collisions(&mut self) {
        let idx = self.active.index();
        let hits = collision::laser_vs_laser_within(
            &self.ships[idx].lasers,
            &self.swarm.lasers,
            self.config.laser_clash_radius,
        );
        for (p, e) in hits {
            let midpoint = (self.ships[idx].lasers[p].position + self.swarm.lasers[e].position) / 2.0;
            self.ships[idx].lasers[p].deactivate();
            self.swarm.lasers[e].deactivate();
            self.sound(Sound::Explosion);
            self.explode(midpoint);
        }
    }

    fn check_boss_hit(&mut self) {
        if !self.boss.is_active() {
            return;
        }
        let idx = self.active.index();
        let hits = collision::lasers_vs_targets(
            &self.ships[idx].lasers,
            std::slice::from_ref(&self.boss),
            self.config.laser_hit_radius,
        );
        for (laser, _) in hits {
            self.ships[idx].lasers[laser].deactivate();
            self.sound(Sound::Explosion);

            let mut destroyed_at = None;
            self.boss.handle_hit(|at| destroyed_at = Some(at));
            if let Some(at) = destroyed_at {
                self.explode(at);
                self.award_points(self.config.boss_bonus_points);
            }
        }
    }

    // ── Scoring ──────────────────────────────────────────────────────────────

    /// Credit the active player, raise the high score if beaten and check
    /// for a bonus life.
    pub fn award_points(&mut self, points: u32) {
        let ship = &mut self.ships[self.active.index()];
        ship.score += points;
        ship.points_since_last_life += points;
        let score = ship.score;

        if score > self.high_score {
            self.high_score = score;
            self.events.push(GameEvent::HighScore(score));
        }
        self.check_bonus_life();
    }

    fn check_bonus_life(&mut self) {
        let (threshold, cap) = (self.config.bonus_life_threshold, self.config.max_lives);
        let ship = &mut self.ships[self.active.index()];
        if ship.points_since_last_life < threshold || ship.lives >= cap {
            return;
        }
        ship.lives += 1;
        ship.points_since_last_life = 0;
        let marker = BonusLife {
            player: ship.player,
            position: ship.position + Vec2::new(0.0, 60.0),
        };
        tracing::debug!(player = marker.player.number(), lives = ship.lives, "bonus life");

        self.bonus_life = Some(marker);
        self.bonus_generation.bump();
        self.scheduler.after(
            self.config.bonus_animation_ms,
            Task::ClearBonusLife {
                generation: self.bonus_generation,
            },
        );
        self.sound(Sound::Bonus);
    }

    // ── Turn / level machine ─────────────────────────────────────────────────

    fn ship_hit(&mut self) {
        let spawn = spawn_point(&self.config);
        let ship = &mut self.ships[self.active.index()];
        let wreck = ship.position;
        ship.lives = ship.lives.saturating_sub(1);
        ship.reset_position(spawn);
        let lives = ship.lives;

        self.explode(wreck);
        self.sound(Sound::Hit);
        if lives == 0 {
            self.switch_player();
        }
    }

    fn begin_level_transition(&mut self) {
        self.swarm.cancel_timers();
        self.level += 1;
        self.phase = Phase::LevelTransition;
        self.banner = Some(Banner::Level(self.level));
        self.sound(Sound::NextLevel);
        tracing::info!(level = self.level, player = self.active.number(), "wave cleared");
        self.scheduler.after(
            self.config.transition_delay_ms,
            Task::ResumeLevel {
                session: self.session,
            },
        );
    }

    fn resume_level(&mut self) {
        if self.phase != Phase::LevelTransition {
            return;
        }
        self.banner = None;
        if let Some(difficulty) = self.difficulty {
            self.swarm.escalate(difficulty);
            tracing::debug!(
                movement_speed = self.swarm.movement_speed,
                shooting_chance = self.swarm.shooting_chance,
                "difficulty raised"
            );
        }
        let spawn = spawn_point(&self.config);
        self.active_ship_mut().reset_position(spawn);
        self.swarm.reset(&mut self.scheduler);
        self.shields.reset(&mut self.rng);
        self.phase = Phase::Playing;
    }

    /// The active ship is out of lives: hand over to player 2, or end the
    /// game if player 2 was already playing.
    fn switch_player(&mut self) {
        self.swarm.cancel_timers();
        self.swarm.clear_all();
        self.shields.clear();
        self.boss.disappear();
        self.shoot_generation.bump();

        let ship = self.active_ship_mut();
        ship.hide();
        ship.clear_lasers();
        ship.stop_moving();

        match self.active {
            PlayerId::Player1 => {
                self.active = PlayerId::Player2;
                let spawn = spawn_point(&self.config);
                let next = self.active_ship_mut();
                next.reset_position(spawn);
                next.stop_moving();
                next.show();

                self.phase = Phase::TurnTransition;
                self.banner = Some(Banner::PlayerTurn(PlayerId::Player2));
                tracing::info!(
                    player1_score = self.ships[0].score,
                    "player 1 out of lives, player 2 up"
                );
                self.scheduler.after(
                    self.config.transition_delay_ms,
                    Task::StartSecondTurn {
                        session: self.session,
                    },
                );
            }
            PlayerId::Player2 => self.end_game(),
        }
    }

    fn start_second_turn(&mut self) {
        if self.phase != Phase::TurnTransition {
            return;
        }
        self.banner = None;
        self.level = 1;
        if let Some(difficulty) = self.difficulty {
            self.swarm.apply_difficulty(difficulty);
        }
        self.swarm.reset(&mut self.scheduler);
        self.shields.reset(&mut self.rng);
        self.phase = Phase::Playing;
    }

    fn end_game(&mut self) {
        self.phase = Phase::GameOver;
        self.paused = false;
        self.banner = None;
        self.bonus_life = None;
        self.session.bump();
        self.swarm.cancel_timers();
        self.clear_field();
        self.events.push(GameEvent::Music(Music::Stop));
        self.sound(Sound::GameOver);
        tracing::info!(
            player1_score = self.ships[0].score,
            player2_score = self.ships[1].score,
            high_score = self.high_score,
            "game over"
        );
    }

    fn clear_field(&mut self) {
        self.shoot_generation.bump();
        for ship in &mut self.ships {
            ship.hide();
            ship.clear_lasers();
            ship.stop_moving();
        }
        self.swarm.clear_all();
        self.shields.clear();
        self.boss.disappear();
    }

    // ── Input entry points ───────────────────────────────────────────────────

    /// Menu digit.  Anything that is not a tier is ignored.
    pub fn on_select_difficulty(&mut self, key: char) -> bool {
        match Difficulty::from_key(key) {
            Some(difficulty) => self.choose_difficulty(difficulty),
            None => false,
        }
    }

    /// Leave the menu and start player 1's turn.  Ignored outside the menu.
    pub fn choose_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != Phase::Menu {
            return false;
        }
        self.difficulty = Some(difficulty);
        self.swarm.apply_difficulty(difficulty);
        self.swarm.reset(&mut self.scheduler);
        self.active_ship_mut().show();
        self.phase = Phase::Playing;
        self.paused = false;
        self.sound(Sound::Start);
        self.events.push(GameEvent::Music(Music::Play));
        tracing::info!(difficulty = difficulty.label(), "game started");
        true
    }

    pub fn on_move_start(&mut self, dir: HorizontalMove) {
        let ship = self.active_ship_mut();
        match dir {
            HorizontalMove::Left => ship.moving_left = true,
            HorizontalMove::Right => ship.moving_right = true,
        }
    }

    pub fn on_move_stop(&mut self, dir: HorizontalMove) {
        let ship = self.active_ship_mut();
        match dir {
            HorizontalMove::Left => ship.moving_left = false,
            HorizontalMove::Right => ship.moving_right = false,
        }
    }

    /// Start auto-fire: one shot now, then one attempt per repeat interval
    /// until [`GameState::on_fire_stop`].
    pub fn on_fire_start(&mut self) {
        if self.active_ship().shooting {
            return;
        }
        self.active_ship_mut().shooting = true;
        self.shoot_generation.bump();
        self.fire();
        self.scheduler.after(
            self.config.shoot_repeat_ms,
            Task::ShootRepeat {
                generation: self.shoot_generation,
            },
        );
    }

    pub fn on_fire_stop(&mut self) {
        self.active_ship_mut().shooting = false;
        self.shoot_generation.bump();
    }

    /// Single shot from the active ship, subject to the cooldown rule.
    pub fn fire(&mut self) -> bool {
        if !self.is_simulating() {
            return false;
        }
        let now = self.now_ms();
        let cooldown = self.config.shot_cooldown_ms;
        let muzzle = self.config.ship_height() / 2.0 + 20.0;
        let fired = self.active_ship_mut().fire(now, cooldown, muzzle);
        if fired {
            self.sound(Sound::Laser);
        }
        fired
    }

    /// Pause or resume play.  Only meaningful while a turn is running.
    pub fn on_toggle_pause(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.paused = !self.paused;
        // Swarm timers stay armed and idle while paused.
        if self.paused {
            self.banner = Some(Banner::Paused);
            self.events.push(GameEvent::Music(Music::Pause));
        } else {
            self.banner = None;
            self.events.push(GameEvent::Music(Music::Resume));
        }
        true
    }

    /// From the game-over screen back to the difficulty menu with every
    /// score, life and entity reset.  Ignored in any other phase.
    pub fn on_restart(&mut self) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.session.bump();
        self.bonus_generation.bump();
        self.clear_field();
        self.explosions.clear();

        let spawn = spawn_point(&self.config);
        for ship in &mut self.ships {
            ship.score = 0;
            ship.points_since_last_life = 0;
            ship.lives = self.config.lives;
            ship.last_shot_ms = None;
            ship.reset_position(spawn);
        }
        self.ships[PlayerId::Player1.index()].show();
        self.active = PlayerId::Player1;
        self.level = 1;
        self.difficulty = None;
        self.paused = false;
        self.banner = None;
        self.bonus_life = None;

        self.swarm.regenerate();
        self.shields.reset(&mut self.rng);
        self.boss.reset();

        self.phase = Phase::Menu;
        self.sound(Sound::Start);
        tracing::info!("restarted, back to menu");
        true
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn step_ship(&mut self) {
        let half = self.config.ship_width() / 2.0;
        let (left, right) = (self.config.left_wall() + half, self.config.right_wall() - half);
        let step = self.config.ship_step;
        let ship = self.active_ship_mut();
        if ship.moving_right {
            ship.step(HorizontalMove::Right, step, left, right);
        }
        if ship.moving_left {
            ship.step(HorizontalMove::Left, step, left, right);
        }
    }

    fn schedule_boss_appearance(&mut self) {
        let (lo, hi) = (self.config.boss_interval_min_ms, self.config.boss_interval_max_ms);
        let delay = self.rng.gen_range(lo..=hi.max(lo)).max(1);
        self.scheduler.after(delay, Task::BossAppearance);
    }

    fn explode(&mut self, position: Vec2) {
        self.explosions.push(Explosion {
            position,
            started_ms: self.now_ms(),
        });
    }

    fn sound(&mut self, sound: Sound) {
        self.events.push(GameEvent::Sound(sound));
    }
}

/// Where a ship starts each life and each level.
pub fn spawn_point(config: &GameConfig) -> Vec2 {
    Vec2::new(0.0, config.ship_baseline())
}
