//! Proximity tests between entity populations.
//!
//! Both functions are pure: they read slices and return index pairs, and the
//! caller applies the consequences afterwards.  Scans run in list order and
//! stop at the first match, so results are stable for a given input.

use crate::entities::{Entity, Projectile};

/// Default hit radius for a laser against an alien or the boss.
pub const DEFAULT_HIT_THRESHOLD: f32 = 20.0;

/// Hit radius between two lasers.
pub const LASER_CLASH_THRESHOLD: f32 = 10.0;

/// Pair each active laser with the first not-yet-claimed target closer than
/// `threshold`.  A laser claims at most one target and a target is claimed
/// by at most one laser.  Pairs come back in laser order as
/// `(laser_index, target_index)`.
pub fn lasers_vs_targets<T: Entity>(
    lasers: &[Projectile],
    targets: &[T],
    threshold: f32,
) -> Vec<(usize, usize)> {
    let mut hits = Vec::new();
    let mut claimed = vec![false; targets.len()];

    for (li, laser) in lasers.iter().enumerate() {
        if !laser.active {
            continue;
        }
        for (ti, target) in targets.iter().enumerate() {
            if claimed[ti] {
                continue;
            }
            if target.position().distance(laser.position) < threshold {
                claimed[ti] = true;
                hits.push((li, ti));
                break;
            }
        }
    }

    hits
}

/// Pair each active player laser with the first active enemy laser within
/// [`LASER_CLASH_THRESHOLD`].  Returns `(player_index, enemy_index)`.
pub fn laser_vs_laser(player_lasers: &[Projectile], enemy_lasers: &[Projectile]) -> Vec<(usize, usize)> {
    laser_vs_laser_within(player_lasers, enemy_lasers, LASER_CLASH_THRESHOLD)
}

pub fn laser_vs_laser_within(
    player_lasers: &[Projectile],
    enemy_lasers: &[Projectile],
    threshold: f32,
) -> Vec<(usize, usize)> {
    let mut hits = Vec::new();
    let mut claimed = vec![false; enemy_lasers.len()];

    for (pi, p_laser) in player_lasers.iter().enumerate() {
        if !p_laser.active {
            continue;
        }
        let found = enemy_lasers.iter().enumerate().find(|(ei, e_laser)| {
            e_laser.active
                && !claimed[*ei]
                && p_laser.position.distance(e_laser.position) < threshold
        });
        if let Some((ei, _)) = found {
            claimed[ei] = true;
            hits.push((pi, ei));
        }
    }

    hits
}
