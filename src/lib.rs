//! Two-player, turn-based Space Invaders simulation core.
//!
//! The library is host-agnostic: it never draws, plays audio or reads the
//! keyboard.  A host drives [`game::GameState`] with a clock, feeds it input
//! and drains the [`events::GameEvent`]s it produces.

pub mod audio;
pub mod boss;
pub mod collision;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod game;
pub mod high_score;
pub mod scheduler;
pub mod shields;
pub mod swarm;

pub use config::GameConfig;
pub use error::GameError;
pub use game::GameState;
