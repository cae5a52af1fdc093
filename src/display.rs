//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! world coordinates into terminal cells and state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;
use space_invaders::entities::{AlienTier, Difficulty, Phase, PlayerId, ShieldTier};
use space_invaders::game::{Banner, GameState};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_TITLE: Color = Color::White;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER1: Color = Color::White;
const C_PLAYER2: Color = Color::Cyan;
const C_PREDATOR: Color = Color::Magenta;
const C_UFO: Color = Color::Yellow;
const C_ALIEN: Color = Color::Green;
const C_BOSS: Color = Color::Red;
const C_LASER_PLAYER: Color = Color::Cyan;
const C_LASER_ENEMY: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::Yellow;
const C_BONUS: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

/// Maps the centred world rectangle onto the bordered play area.
struct Viewport {
    width: u16,
    height: u16,
    world_w: f32,
    world_h: f32,
}

impl Viewport {
    fn new(state: &GameState, width: u16, height: u16) -> Self {
        Viewport {
            width,
            height,
            world_w: state.config.screen_width,
            world_h: state.config.screen_height,
        }
    }

    /// Cell for a world position, or `None` when it falls outside the play area.
    fn cell(&self, p: Vec2) -> Option<(u16, u16)> {
        let cols = self.width.saturating_sub(3) as f32;
        let rows = self.height.saturating_sub(5) as f32;
        let fx = (p.x + self.world_w / 2.0) / self.world_w;
        let fy = (self.world_h / 2.0 - p.y) / self.world_h;
        if !(0.0..=1.0).contains(&fx) || !(0.0..=1.0).contains(&fy) {
            return None;
        }
        Some((1 + (fx * cols).round() as u16, 2 + (fy * rows).round() as u16))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, width: u16, height: u16) -> std::io::Result<()> {
    let view = Viewport::new(state, width, height);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, state, &view)?;

    match state.phase {
        Phase::Menu => draw_menu(out, state, &view)?,
        Phase::GameOver => draw_game_over(out, state, &view)?,
        _ => {
            draw_field(out, state, &view)?;
            if let Some(banner) = state.banner {
                draw_banner(out, banner, &view)?;
            }
        }
    }

    draw_controls_hint(out, &view)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let p1 = state.ship(PlayerId::Player1);
    let p2 = state.ship(PlayerId::Player2);

    // Player 1, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TITLE))?;
    out.queue(Print("1UP "))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("{:04}", p1.score)))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!(" {}", "♥".repeat(p1.lives as usize))))?;

    // High score + level, centre
    let centre = match state.difficulty {
        Some(d) => format!("HI {:04}  L{} {}", state.high_score, state.level, d.label()),
        None => format!("HI {:04}", state.high_score),
    };
    let cx = (view.width / 2).saturating_sub(centre.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(cx, 0))?;
    out.queue(style::SetForegroundColor(difficulty_color(state.difficulty)))?;
    out.queue(Print(&centre))?;

    // Player 2, right
    let right = format!("{} {:04} 2UP", "♥".repeat(p2.lives as usize), p2.score);
    let rx = view.width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&right))?;

    Ok(())
}

fn difficulty_color(difficulty: Option<Difficulty>) -> Color {
    match difficulty {
        Some(Difficulty::Easy) => Color::Green,
        Some(Difficulty::Medium) => Color::Yellow,
        Some(Difficulty::Hard) => Color::Red,
        None => C_HUD_TITLE,
    }
}

// ── Play field ────────────────────────────────────────────────────────────────

fn draw_field<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    for block in &state.shields.blocks {
        let color = match block.tier() {
            ShieldTier::Intact => Color::Green,
            ShieldTier::Damaged => Color::Yellow,
            ShieldTier::Critical => Color::Red,
            ShieldTier::Destroyed => continue,
        };
        put(out, view, block.position, "█", color)?;
    }

    for alien in &state.swarm.aliens {
        let (glyph, color) = match alien.tier {
            AlienTier::Predator => ("╓▼╖", C_PREDATOR),
            AlienTier::Ufo => ("«◎»", C_UFO),
            AlienTier::Alien => ("/¤\\", C_ALIEN),
        };
        put_centered(out, view, alien.position, glyph, color)?;
    }

    if state.boss.is_active() {
        put_centered(out, view, state.boss.position, "<=O=>", C_BOSS)?;
    }

    for laser in state.swarm.lasers.iter().filter(|l| l.active) {
        put(out, view, laser.position, "↓", C_LASER_ENEMY)?;
    }

    let ship = state.active_ship();
    for laser in ship.lasers.iter().filter(|l| l.active) {
        put(out, view, laser.position, "║", C_LASER_PLAYER)?;
    }
    if ship.visible {
        let color = match ship.player {
            PlayerId::Player1 => C_PLAYER1,
            PlayerId::Player2 => C_PLAYER2,
        };
        put_centered(out, view, ship.position, "/▲\\", color)?;
    }

    let now = state.now_ms();
    for explosion in &state.explosions {
        let glyph = match explosion.frame(now, state.config.explosion_frame_ms) {
            0 => "*",
            1 => "✶",
            2 => "✷",
            _ => "·",
        };
        put(out, view, explosion.position, glyph, C_EXPLOSION)?;
    }

    if let Some(bonus) = &state.bonus_life {
        put_centered(out, view, bonus.position, "1UP", C_BONUS)?;
    }

    Ok(())
}

fn put<W: Write>(out: &mut W, view: &Viewport, at: Vec2, glyph: &str, color: Color) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(at) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn put_centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    at: Vec2,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(at) {
        let half = glyph.chars().count() as u16 / 2;
        let col = col.saturating_sub(half).max(1);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, banner: Banner, view: &Viewport) -> std::io::Result<()> {
    let (text, color) = match banner {
        Banner::Level(level) => (format!("LEVEL {}", level), Color::White),
        Banner::PlayerTurn(player) => (format!("PLAYER {} TURN", player.number()), Color::Cyan),
        Banner::Paused => ("PAUSED  -  P to resume".to_string(), Color::Yellow),
    };
    centered_line(out, view, view.height / 2, &text, color)
}

fn draw_menu<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let cx = view.width / 2;
    let cy = view.height / 2;

    centered_line(out, view, cy.saturating_sub(6), "★  SPACE  INVADERS  ★", Color::Cyan)?;

    if state.high_score > 0 {
        let hs_str = format!("Best Score: {}", state.high_score);
        centered_line(out, view, cy.saturating_sub(5), &hs_str, Color::Yellow)?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Easy  ", Color::Green,  "Slow swarm, rare fire"),
        ("2", "Medium", Color::Yellow, "Balanced challenge"),
        ("3", "Hard  ", Color::Red,    "Fast and relentless!"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" - {}", desc)))?;
    }

    centered_line(
        out,
        view,
        cy + 4,
        "Two players take turns; player 2 starts when player 1 runs out of ships.",
        C_HINT,
    )
}

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let p1 = state.ship(PlayerId::Player1).score;
    let p2 = state.ship(PlayerId::Player2).score;
    let best = p1.max(p2);
    let new_best = best >= state.high_score && best > 0;

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];

    let total_rows = lines.len() + 4;
    let start_row = (view.height / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        centered_line(out, view, start_row + i as u16, msg, *color)?;
    }

    let score_row = start_row + lines.len() as u16;
    centered_line(out, view, score_row, &format!("Player 1: {:>6}", p1), Color::Yellow)?;
    centered_line(out, view, score_row + 1, &format!("Player 2: {:>6}", p2), Color::Yellow)?;

    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", state.high_score)
    } else {
        format!("Best Score:  {:>6}", state.high_score)
    };
    let best_color = if new_best { Color::Yellow } else { Color::DarkGrey };
    centered_line(out, view, score_row + 2, &best_line, best_color)?;

    centered_line(out, view, score_row + 3, "ENTER / R - Play Again  Q - Quit", Color::White)
}

fn centered_line<W: Write>(
    out: &mut W,
    view: &Viewport,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (view.width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}
