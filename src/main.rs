mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing_subscriber::EnvFilter;

use space_invaders::audio::{self, TerminalAudio};
use space_invaders::entities::{HorizontalMove, Phase};
use space_invaders::events::GameEvent;
use space_invaders::high_score::HighScoreStore;
use space_invaders::{GameConfig, GameState};

const FRAME: Duration = Duration::from_millis(16);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈128 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser, Debug)]
#[command(name = "space_invaders", about = "Two-player terminal Space Invaders")]
struct Args {
    /// TOML file overriding any of the game constants.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the best score is kept (default: ~/.space_invaders/high_score.json).
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Log destination; the terminal itself is the game screen.
    #[arg(long, default_value = "space_invaders.log")]
    log_file: PathBuf,

    /// Fixed RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Ring the terminal bell for hits, the boss and bonus lives.
    #[arg(long)]
    bell: bool,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Last-seen state of the continuous controls, so the game only hears about
/// edges (press → start, release → stop).
#[derive(Default)]
struct HeldControls {
    left: bool,
    right: bool,
    fire: bool,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_tracing(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: we keep a `key_frame` map of the frame each key was last
/// pressed or repeated.  Keyboard-enhancement terminals also send releases,
/// which drop the key immediately; classic terminals let keys expire after
/// `HOLD_WINDOW` frames of silence.  Edges of the derived held state are
/// forwarded to the game as start/stop calls.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    store: &HighScoreStore,
    audio_out: &mut TerminalAudio<std::io::Stdout>,
) -> std::io::Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut held = HeldControls::default();
    let mut frame: u64 = 0;
    let mut size = terminal::size()?;
    let started = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            game.on_toggle_pause();
                        }
                        KeyCode::Char(digit @ '1'..='3') => {
                            game.on_select_difficulty(digit);
                        }
                        KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R')
                            if game.phase == Phase::GameOver =>
                        {
                            game.on_restart();
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Forward edges of the held controls ────────────────────────────────
        let now_held = HeldControls {
            left: any_held(&key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
            right: any_held(&key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
            fire: is_held(&key_frame, &KeyCode::Char(' '), frame),
        };
        if now_held.left != held.left {
            if now_held.left {
                game.on_move_start(HorizontalMove::Left);
            } else {
                game.on_move_stop(HorizontalMove::Left);
            }
        }
        if now_held.right != held.right {
            if now_held.right {
                game.on_move_start(HorizontalMove::Right);
            } else {
                game.on_move_stop(HorizontalMove::Right);
            }
        }
        if now_held.fire != held.fire {
            if now_held.fire {
                game.on_fire_start();
            } else {
                game.on_fire_stop();
            }
        }
        held = now_held;

        // ── Simulation ────────────────────────────────────────────────────────
        game.advance(started.elapsed().as_millis() as u64);

        for event in game.drain_events() {
            audio::dispatch(audio_out, &event);
            if let GameEvent::HighScore(score) = event {
                if let Err(err) = store.save(score) {
                    tracing::warn!(%err, "could not persist high score");
                }
            }
        }

        // ── Render ────────────────────────────────────────────────────────────
        if let Ok(current) = terminal::size() {
            size = current;
        }
        match display::render(out, game, size.0, size.1) {
            Ok(()) => game.set_surface_available(true),
            Err(err) => {
                tracing::warn!(%err, "frame dropped");
                game.set_surface_available(false);
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let store = HighScoreStore::new(
        args.high_score_file
            .clone()
            .unwrap_or_else(HighScoreStore::default_path),
    );
    let high_score = store.load();
    tracing::info!(high_score, path = %store.path().display(), "starting");

    let mut game = match args.seed {
        Some(seed) => GameState::with_seed(config, high_score, seed),
        None => GameState::new(config, high_score),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let mut audio_out = TerminalAudio::new(stdout(), args.bell);
    let result = game_loop(&mut out, &mut game, &rx, &store, &mut audio_out);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;
    tracing::info!(high_score = game.high_score, "quit");
    Ok(())
}
