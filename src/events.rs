//! Side effects the simulation asks the host to perform.
//!
//! The core never touches audio or disk itself; it queues these and the host
//! drains them once per frame.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Laser,
    Explosion,
    Hit,
    Boss,
    NextLevel,
    Bonus,
    Start,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Music {
    Play,
    Pause,
    Resume,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Sound(Sound),
    Music(Music),
    /// A new best score; the host should persist it.
    HighScore(u32),
}
