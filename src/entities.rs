//! Game entity types.
//!
//! Every visible object implements the small [`Entity`] capability trait
//! instead of sharing a drawable base; the renderer and the collision engine
//! only ever need a position and a visibility flag.

use glam::Vec2;

/// Capability shared by everything that occupies the play field.
pub trait Entity {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    fn show(&mut self) {
        self.set_visible(true);
    }

    fn hide(&mut self) {
        self.set_visible(false);
    }

    fn distance_to(&self, other: &impl Entity) -> f32
    where
        Self: Sized,
    {
        self.position().distance(other.position())
    }
}

macro_rules! impl_entity {
    ($ty:ty) => {
        impl Entity for $ty {
            fn position(&self) -> Vec2 {
                self.position
            }

            fn set_position(&mut self, position: Vec2) {
                self.position = position;
            }

            fn is_visible(&self) -> bool {
                self.visible
            }

            fn set_visible(&mut self, visible: bool) {
                self.visible = visible;
            }
        }
    };
}

// ── Selectors ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Menu digit → tier.  Anything else is not a tier.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(Difficulty::Easy),
            '2' => Some(Difficulty::Medium),
            '3' => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerId {
    Player1,
    Player2,
}

impl PlayerId {
    pub fn index(self) -> usize {
        match self {
            PlayerId::Player1 => 0,
            PlayerId::Player2 => 1,
        }
    }

    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }
}

/// Where the game is in its menu / turn / level cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a difficulty digit.
    Menu,
    Playing,
    /// Wave cleared; the next level starts after the transition delay.
    LevelTransition,
    /// Player 1 is out of lives; player 2 starts after the transition delay.
    TurnTransition,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalMove {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
}

impl Heading {
    fn sign(self) -> f32 {
        match self {
            Heading::Up => 1.0,
            Heading::Down => -1.0,
        }
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

/// A player or enemy laser.  `active` is the only thing collision checks and
/// the renderer look at; inactive lasers are swept out of their owner's list.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub heading: Heading,
    pub active: bool,
    pub visible: bool,
}

impl_entity!(Projectile);

impl Projectile {
    pub fn new(position: Vec2, heading: Heading) -> Self {
        Projectile {
            position,
            heading,
            active: true,
            visible: true,
        }
    }

    /// Move one step along the heading and deactivate once past the wall.
    pub fn advance(&mut self, velocity: f32, top: f32, bottom: f32) {
        if !self.active {
            return;
        }
        self.position.y += velocity * self.heading.sign();
        if self.position.y > top || self.position.y < bottom {
            self.deactivate();
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.visible = false;
    }
}

// ── Aliens ───────────────────────────────────────────────────────────────────

/// Cosmetic rank of an alien, picked by grid row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlienTier {
    Predator,
    Ufo,
    Alien,
}

impl AlienTier {
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => AlienTier::Predator,
            1 | 2 => AlienTier::Ufo,
            _ => AlienTier::Alien,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub position: Vec2,
    pub alive: bool,
    pub tier: AlienTier,
    pub visible: bool,
}

impl_entity!(Alien);

impl Alien {
    pub fn new(position: Vec2, tier: AlienTier) -> Self {
        Alien {
            position,
            alive: true,
            tier,
            visible: true,
        }
    }
}

// ── Shield blocks ────────────────────────────────────────────────────────────

pub const SHIELD_BLOCK_HP: u8 = 3;

/// Visual state of a block, derived only from its hp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShieldTier {
    Intact,
    Damaged,
    Critical,
    Destroyed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShieldBlock {
    pub position: Vec2,
    pub hp: u8,
    pub visible: bool,
}

impl_entity!(ShieldBlock);

impl ShieldBlock {
    pub fn new(position: Vec2) -> Self {
        ShieldBlock {
            position,
            hp: SHIELD_BLOCK_HP,
            visible: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.hp > 0
    }

    /// Lose exactly one hp; a destroyed block stays at 0.
    pub fn take_damage(&mut self) {
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            self.visible = false;
        }
    }

    pub fn tier(&self) -> ShieldTier {
        match self.hp {
            3.. => ShieldTier::Intact,
            2 => ShieldTier::Damaged,
            1 => ShieldTier::Critical,
            0 => ShieldTier::Destroyed,
        }
    }
}

// ── Player ship ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub player: PlayerId,
    pub position: Vec2,
    pub visible: bool,
    pub lives: u32,
    pub score: u32,
    pub points_since_last_life: u32,
    pub lasers: Vec<Projectile>,
    pub moving_left: bool,
    pub moving_right: bool,
    pub shooting: bool,
    /// Scheduler time of the last successful shot.
    pub last_shot_ms: Option<u64>,
}

impl_entity!(Ship);

impl Ship {
    pub fn new(player: PlayerId, position: Vec2, lives: u32) -> Self {
        Ship {
            player,
            position,
            visible: true,
            lives,
            score: 0,
            points_since_last_life: 0,
            lasers: Vec::new(),
            moving_left: false,
            moving_right: false,
            shooting: false,
            last_shot_ms: None,
        }
    }

    pub fn has_active_laser(&self) -> bool {
        self.lasers.iter().any(|l| l.active)
    }

    /// Fire if no own laser is in flight or the cooldown has elapsed.
    /// Returns whether a laser was created.
    pub fn fire(&mut self, now_ms: u64, cooldown_ms: u64, muzzle_offset: f32) -> bool {
        let cooled_down = self
            .last_shot_ms
            .map(|last| now_ms.saturating_sub(last) >= cooldown_ms)
            .unwrap_or(true);
        if self.has_active_laser() && !cooled_down {
            return false;
        }
        self.last_shot_ms = Some(now_ms);
        let origin = Vec2::new(self.position.x, self.position.y + muzzle_offset);
        self.lasers.push(Projectile::new(origin, Heading::Up));
        true
    }

    /// Step sideways unless that would push the hull past a wall.
    pub fn step(&mut self, dir: HorizontalMove, step: f32, left_limit: f32, right_limit: f32) {
        let new_x = match dir {
            HorizontalMove::Left => self.position.x - step,
            HorizontalMove::Right => self.position.x + step,
        };
        if (left_limit..=right_limit).contains(&new_x) {
            self.position.x = new_x;
        }
    }

    pub fn update_lasers(&mut self, velocity: f32, top: f32, bottom: f32) {
        for laser in &mut self.lasers {
            laser.advance(velocity, top, bottom);
        }
        self.lasers.retain(|l| l.active);
    }

    pub fn clear_lasers(&mut self) {
        self.lasers.clear();
    }

    pub fn stop_moving(&mut self) {
        self.moving_left = false;
        self.moving_right = false;
        self.shooting = false;
    }

    pub fn reset_position(&mut self, spawn: Vec2) {
        self.position = spawn;
        self.clear_lasers();
    }
}

// ── Transient overlays ───────────────────────────────────────────────────────

/// A short explosion animation anchored where something was destroyed.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub position: Vec2,
    pub started_ms: u64,
}

impl Explosion {
    pub fn frame(&self, now_ms: u64, frame_ms: u64) -> u32 {
        (now_ms.saturating_sub(self.started_ms) / frame_ms.max(1)) as u32
    }
}

/// "1UP" marker shown above the ship that just earned a life.
#[derive(Clone, Debug, PartialEq)]
pub struct BonusLife {
    pub player: PlayerId,
    pub position: Vec2,
}
