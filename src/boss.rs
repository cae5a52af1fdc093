//! The mystery ship that crosses the top of the screen now and then.

use glam::Vec2;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::Entity;
use crate::scheduler::{Generation, Scheduler, Task};

/// How far past a side wall the boss enters and leaves.
const OFFSCREEN_MARGIN: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossPhase {
    Dormant,
    /// Placed just off an edge, first move step pending.
    Appearing,
    Moving,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub position: Vec2,
    pub visible: bool,
    pub moving_right: bool,
    phase: BossPhase,
    generation: Generation,
    step: f32,
    step_ms: u64,
    exit_x: f32,
    cruise_y: f32,
}

impl Entity for Boss {
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

impl Boss {
    pub fn new(config: &GameConfig) -> Self {
        Boss {
            position: parked(),
            visible: false,
            moving_right: true,
            phase: BossPhase::Dormant,
            generation: Generation::default(),
            step: config.boss_step,
            step_ms: config.boss_step_ms.max(1),
            exit_x: config.right_wall() + OFFSCREEN_MARGIN,
            cruise_y: config.top_wall() - 40.0,
        }
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != BossPhase::Dormant
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Enter from a random side.  Returns `false` (and does nothing) if the
    /// boss is already on its way across.
    pub fn appear(&mut self, scheduler: &mut Scheduler, rng: &mut impl Rng) -> bool {
        if self.is_active() {
            return false;
        }
        self.moving_right = rng.gen_bool(0.5);
        let x = if self.moving_right {
            -self.exit_x
        } else {
            self.exit_x
        };
        self.position = Vec2::new(x, self.cruise_y);
        self.visible = true;
        self.phase = BossPhase::Appearing;
        self.generation.bump();
        tracing::debug!(from_left = self.moving_right, "boss appearing");
        scheduler.after(
            0,
            Task::BossMove {
                generation: self.generation,
            },
        );
        true
    }

    /// Move timer callback.  Returns `true` when this step carried the boss
    /// off the far side.
    pub fn on_move_timer(&mut self, generation: Generation, scheduler: &mut Scheduler) -> bool {
        if !self.is_active() || generation != self.generation {
            return false;
        }
        self.phase = BossPhase::Moving;
        let dx = if self.moving_right { self.step } else { -self.step };
        self.position.x += dx;

        let exited = (self.moving_right && self.position.x > self.exit_x)
            || (!self.moving_right && self.position.x < -self.exit_x);
        if exited {
            self.disappear();
            return true;
        }
        scheduler.after(self.step_ms, Task::BossMove { generation });
        false
    }

    /// Knock the boss out of the sky from any active phase.  `on_destroy`
    /// runs once with the position of the hit; a dormant boss ignores hits.
    pub fn handle_hit(&mut self, on_destroy: impl FnOnce(Vec2)) -> bool {
        if !self.is_active() {
            return false;
        }
        let at = self.position;
        self.disappear();
        on_destroy(at);
        true
    }

    /// Back to dormant; any move step still queued becomes stale.
    pub fn disappear(&mut self) {
        self.phase = BossPhase::Dormant;
        self.visible = false;
        self.generation.bump();
    }

    pub fn reset(&mut self) {
        self.disappear();
        self.position = parked();
    }
}

fn parked() -> Vec2 {
    Vec2::new(10_000.0, 10_000.0)
}
