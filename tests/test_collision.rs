use space_invaders::collision::*;
use space_invaders::entities::*;

use glam::Vec2;

fn up(x: f32, y: f32) -> Projectile {
    Projectile::new(Vec2::new(x, y), Heading::Up)
}

fn down(x: f32, y: f32) -> Projectile {
    Projectile::new(Vec2::new(x, y), Heading::Down)
}

fn alien(x: f32, y: f32) -> Alien {
    Alien::new(Vec2::new(x, y), AlienTier::Alien)
}

// ── lasers_vs_targets ─────────────────────────────────────────────────────────

#[test]
fn no_lasers_no_hits() {
    let hits = lasers_vs_targets(&[], &[alien(0.0, 0.0)], DEFAULT_HIT_THRESHOLD);
    assert!(hits.is_empty());
}

#[test]
fn laser_hits_target_in_range() {
    let hits = lasers_vs_targets(&[up(0.0, 5.0)], &[alien(0.0, 0.0)], DEFAULT_HIT_THRESHOLD);
    assert_eq!(hits, vec![(0, 0)]);
}

#[test]
fn threshold_is_exclusive() {
    let hits = lasers_vs_targets(&[up(20.0, 0.0)], &[alien(0.0, 0.0)], DEFAULT_HIT_THRESHOLD);
    assert!(hits.is_empty());
}

#[test]
fn laser_claims_first_target_in_list_order() {
    // Both aliens are in range; the earlier one wins even though it is farther.
    let targets = [alien(15.0, 0.0), alien(1.0, 0.0)];
    let hits = lasers_vs_targets(&[up(0.0, 0.0)], &targets, DEFAULT_HIT_THRESHOLD);
    assert_eq!(hits, vec![(0, 0)]);
}

#[test]
fn target_claimed_only_once() {
    let lasers = [up(0.0, 0.0), up(1.0, 0.0)];
    let targets = [alien(0.0, 0.0)];
    let hits = lasers_vs_targets(&lasers, &targets, DEFAULT_HIT_THRESHOLD);
    assert_eq!(hits, vec![(0, 0)]);
}

#[test]
fn second_laser_falls_through_to_next_target() {
    let lasers = [up(0.0, 0.0), up(10.0, 0.0)];
    let targets = [alien(5.0, 0.0), alien(20.0, 0.0)];
    let hits = lasers_vs_targets(&lasers, &targets, DEFAULT_HIT_THRESHOLD);
    assert_eq!(hits, vec![(0, 0), (1, 1)]);
}

#[test]
fn inactive_lasers_are_skipped() {
    let mut spent = up(0.0, 0.0);
    spent.deactivate();
    let lasers = [spent, up(0.0, 1.0)];
    let hits = lasers_vs_targets(&lasers, &[alien(0.0, 0.0)], DEFAULT_HIT_THRESHOLD);
    assert_eq!(hits, vec![(1, 0)]);
}

#[test]
fn pairs_come_back_in_laser_order() {
    let lasers = [up(100.0, 0.0), up(-100.0, 0.0), up(0.0, 0.0)];
    let targets = [alien(0.0, 0.0), alien(-100.0, 0.0), alien(100.0, 0.0)];
    let hits = lasers_vs_targets(&lasers, &targets, DEFAULT_HIT_THRESHOLD);
    assert_eq!(hits, vec![(0, 2), (1, 1), (2, 0)]);
}

// ── laser_vs_laser ────────────────────────────────────────────────────────────

#[test]
fn lasers_clash_within_threshold() {
    let hits = laser_vs_laser(&[up(0.0, 0.0)], &[down(0.0, 9.0)]);
    assert_eq!(hits, vec![(0, 0)]);
}

#[test]
fn lasers_pass_outside_threshold() {
    let hits = laser_vs_laser(&[up(0.0, 0.0)], &[down(0.0, LASER_CLASH_THRESHOLD)]);
    assert!(hits.is_empty());
}

#[test]
fn clash_is_one_to_one() {
    let player = [up(0.0, 0.0), up(1.0, 0.0)];
    let enemy = [down(0.0, 2.0)];
    let hits = laser_vs_laser(&player, &enemy);
    assert_eq!(hits, vec![(0, 0)]);
}

#[test]
fn inactive_enemy_laser_does_not_clash() {
    let mut spent = down(0.0, 1.0);
    spent.deactivate();
    let enemy = [spent, down(0.0, 5.0)];
    let hits = laser_vs_laser(&[up(0.0, 0.0)], &enemy);
    assert_eq!(hits, vec![(0, 1)]);
}
