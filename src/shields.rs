//! Destructible shield clusters between the ship and the swarm.

use glam::Vec2;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Alien, Projectile, ShieldBlock};

/// Cell matrix for one cluster; `true` means a block is placed there.
pub type Pattern = Vec<Vec<bool>>;

#[derive(Clone, Debug)]
pub struct ShieldSystem {
    pub blocks: Vec<ShieldBlock>,
    num_shields: usize,
    block_size: f32,
    hit_radius: f32,
    screen_width: f32,
    baseline: f32,
}

impl ShieldSystem {
    pub fn new(config: &GameConfig) -> Self {
        ShieldSystem {
            blocks: Vec::new(),
            num_shields: config.num_shields,
            block_size: config.block_size,
            hit_radius: config.shield_hit_radius,
            screen_width: config.screen_width,
            baseline: config.bottom_wall() + config.screen_height * 0.25,
        }
    }

    pub fn block_size(&self) -> f32 {
        self.block_size
    }

    /// Lay out `num_shields` clusters evenly across the field, each with its
    /// own random pattern.
    pub fn generate(&mut self, rng: &mut impl Rng) {
        let spacing = (self.screen_width / (self.num_shields + 1) as f32).floor();
        for i in 0..self.num_shields {
            let x_center = -(self.screen_width / 2.0).floor() + (i + 1) as f32 * spacing;
            let pattern = random_pattern(rng);
            self.place_pattern(&pattern, x_center, self.baseline);
        }
    }

    /// Place a block for every set cell.  Columns are offset from the
    /// cluster centre; rows stack upward from `y_bottom` with row 0 on top.
    pub fn place_pattern(&mut self, pattern: &Pattern, x_center: f32, y_bottom: f32) {
        let height = pattern.len();
        for (row_index, row) in pattern.iter().enumerate() {
            let half = (row.len() / 2) as f32;
            for (col_index, &cell) in row.iter().enumerate() {
                if !cell {
                    continue;
                }
                let x = x_center + (col_index as f32 - half) * self.block_size;
                let y = y_bottom + (height - row_index) as f32 * self.block_size;
                self.blocks.push(ShieldBlock::new(Vec2::new(x, y)));
            }
        }
    }

    /// Lasers against blocks, laser-major.  The first live block in range
    /// takes one point of damage and consumes the laser.  Returns the number
    /// of hits.
    pub fn check_collision(&mut self, lasers: &mut [Projectile]) -> usize {
        let mut hits = 0;
        for laser in lasers.iter_mut().filter(|l| l.active) {
            let radius = self.hit_radius;
            let struck = self
                .blocks
                .iter_mut()
                .find(|b| b.is_active() && b.position.distance(laser.position) < radius);
            if let Some(block) = struck {
                block.take_damage();
                laser.deactivate();
                hits += 1;
            }
        }
        self.sweep();
        hits
    }

    /// Aliens grinding through blocks: every live block within one block
    /// size of an alien loses a point.  Aliens are never harmed.
    pub fn check_collision_with_aliens(&mut self, aliens: &[Alien]) -> usize {
        let mut hits = 0;
        for alien in aliens {
            for block in self.blocks.iter_mut() {
                if block.is_active() && block.position.distance(alien.position) < self.block_size {
                    block.take_damage();
                    hits += 1;
                }
            }
        }
        self.sweep();
        hits
    }

    pub fn active_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_active()).count()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.clear();
        self.generate(rng);
    }

    fn sweep(&mut self) {
        self.blocks.retain(|b| b.is_active());
    }
}

/// Random cluster shape: 3–6 columns by 2–4 rows, each cell a coin flip.
pub fn random_pattern(rng: &mut impl Rng) -> Pattern {
    let width = rng.gen_range(3..=6);
    let height = rng.gen_range(2..=4);
    (0..height)
        .map(|_| (0..width).map(|_| rng.gen_bool(0.5)).collect())
        .collect()
}
