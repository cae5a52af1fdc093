use space_invaders::entities::*;

use glam::Vec2;

const TOP: f32 = 512.0;
const BOTTOM: f32 = -512.0;

fn make_ship() -> Ship {
    Ship::new(PlayerId::Player1, Vec2::new(0.0, -358.4), 3)
}

// ── Selectors ─────────────────────────────────────────────────────────────────

#[test]
fn difficulty_from_menu_digit() {
    assert_eq!(Difficulty::from_key('1'), Some(Difficulty::Easy));
    assert_eq!(Difficulty::from_key('2'), Some(Difficulty::Medium));
    assert_eq!(Difficulty::from_key('3'), Some(Difficulty::Hard));
    assert_eq!(Difficulty::from_key('4'), None);
    assert_eq!(Difficulty::from_key('x'), None);
}

#[test]
fn player_ids_index_the_ship_pair() {
    assert_eq!(PlayerId::Player1.index(), 0);
    assert_eq!(PlayerId::Player2.index(), 1);
    assert_eq!(PlayerId::Player2.number(), 2);
}

#[test]
fn alien_tier_follows_grid_row() {
    assert_eq!(AlienTier::for_row(0), AlienTier::Predator);
    assert_eq!(AlienTier::for_row(1), AlienTier::Ufo);
    assert_eq!(AlienTier::for_row(2), AlienTier::Ufo);
    assert_eq!(AlienTier::for_row(3), AlienTier::Alien);
    assert_eq!(AlienTier::for_row(4), AlienTier::Alien);
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[test]
fn projectile_moves_along_heading() {
    let mut up = Projectile::new(Vec2::new(5.0, 0.0), Heading::Up);
    let mut down = Projectile::new(Vec2::new(5.0, 0.0), Heading::Down);
    up.advance(10.0, TOP, BOTTOM);
    down.advance(10.0, TOP, BOTTOM);
    assert_eq!(up.position, Vec2::new(5.0, 10.0));
    assert_eq!(down.position, Vec2::new(5.0, -10.0));
    assert!(up.active && down.active);
}

#[test]
fn projectile_deactivates_past_top_wall() {
    let mut laser = Projectile::new(Vec2::new(0.0, 505.0), Heading::Up);
    laser.advance(10.0, TOP, BOTTOM);
    assert!(!laser.active);
    assert!(!laser.visible);
}

#[test]
fn projectile_deactivates_past_bottom_wall() {
    let mut laser = Projectile::new(Vec2::new(0.0, -505.0), Heading::Down);
    laser.advance(10.0, TOP, BOTTOM);
    assert!(!laser.active);
}

#[test]
fn inactive_projectile_stays_put() {
    let mut laser = Projectile::new(Vec2::ZERO, Heading::Up);
    laser.deactivate();
    laser.advance(10.0, TOP, BOTTOM);
    assert_eq!(laser.position, Vec2::ZERO);
}

// ── Shield block ──────────────────────────────────────────────────────────────

#[test]
fn shield_block_hp_after_n_hits() {
    for hits in 0..6u8 {
        let mut block = ShieldBlock::new(Vec2::ZERO);
        for _ in 0..hits {
            block.take_damage();
        }
        assert_eq!(block.hp, SHIELD_BLOCK_HP.saturating_sub(hits), "after {hits} hits");
        assert_eq!(block.is_active(), hits < SHIELD_BLOCK_HP);
    }
}

#[test]
fn shield_block_tier_tracks_damage() {
    let mut block = ShieldBlock::new(Vec2::ZERO);
    assert_eq!(block.tier(), ShieldTier::Intact);
    block.take_damage();
    assert_eq!(block.tier(), ShieldTier::Damaged);
    block.take_damage();
    assert_eq!(block.tier(), ShieldTier::Critical);
    block.take_damage();
    assert_eq!(block.tier(), ShieldTier::Destroyed);
    assert!(!block.visible);
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[test]
fn ship_first_shot_always_fires() {
    let mut ship = make_ship();
    assert!(ship.fire(0, 1500, 27.0));
    assert_eq!(ship.lasers.len(), 1);
    assert_eq!(ship.lasers[0].position, Vec2::new(0.0, -358.4 + 27.0));
    assert_eq!(ship.lasers[0].heading, Heading::Up);
}

#[test]
fn ship_second_shot_blocked_while_laser_in_flight() {
    let mut ship = make_ship();
    assert!(ship.fire(0, 1500, 27.0));
    assert!(!ship.fire(100, 1500, 27.0));
    assert_eq!(ship.lasers.iter().filter(|l| l.active).count(), 1);
}

#[test]
fn ship_cooldown_allows_second_laser() {
    let mut ship = make_ship();
    assert!(ship.fire(0, 1500, 27.0));
    assert!(ship.fire(1500, 1500, 27.0));
    assert_eq!(ship.lasers.len(), 2);
}

#[test]
fn ship_fires_again_once_laser_is_gone() {
    let mut ship = make_ship();
    assert!(ship.fire(0, 1500, 27.0));
    ship.lasers[0].deactivate();
    assert!(ship.fire(20, 1500, 27.0));
}

#[test]
fn ship_update_lasers_sweeps_spent_ones() {
    let mut ship = make_ship();
    ship.lasers.push(Projectile::new(Vec2::new(0.0, 505.0), Heading::Up));
    ship.lasers.push(Projectile::new(Vec2::new(0.0, 0.0), Heading::Up));
    ship.update_lasers(10.0, TOP, BOTTOM);
    assert_eq!(ship.lasers.len(), 1);
    assert_eq!(ship.lasers[0].position.y, 10.0);
}

#[test]
fn ship_step_stays_inside_limits() {
    let mut ship = make_ship();
    ship.position.x = 420.0;
    ship.step(HorizontalMove::Right, 20.0, -422.4, 422.4);
    assert_eq!(ship.position.x, 420.0);
    ship.step(HorizontalMove::Left, 20.0, -422.4, 422.4);
    assert_eq!(ship.position.x, 400.0);
}

#[test]
fn ship_reset_position_clears_lasers() {
    let mut ship = make_ship();
    ship.position.x = 200.0;
    ship.fire(0, 1500, 27.0);
    ship.reset_position(Vec2::new(0.0, -358.4));
    assert_eq!(ship.position.x, 0.0);
    assert!(ship.lasers.is_empty());
}

#[test]
fn entity_trait_visibility_and_distance() {
    let mut ship = make_ship();
    ship.hide();
    assert!(!ship.is_visible());
    ship.show();
    assert!(ship.is_visible());

    ship.position = Vec2::ZERO;
    let alien = Alien::new(Vec2::new(3.0, 4.0), AlienTier::Alien);
    assert_eq!(ship.distance_to(&alien), 5.0);
}

// ── Overlays ──────────────────────────────────────────────────────────────────

#[test]
fn explosion_frame_advances_with_time() {
    let boom = Explosion {
        position: Vec2::ZERO,
        started_ms: 1000,
    };
    assert_eq!(boom.frame(1000, 100), 0);
    assert_eq!(boom.frame(1099, 100), 0);
    assert_eq!(boom.frame(1100, 100), 1);
    assert_eq!(boom.frame(1400, 100), 4);
}
