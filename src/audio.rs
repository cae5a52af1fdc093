//! Audio collaborator.
//!
//! A terminal has exactly one instrument, the bell, so the stock
//! implementation rings it for the effects worth noticing and only logs
//! the rest.

use std::io::Write;

use crate::events::{GameEvent, Music, Sound};

pub trait Audio {
    fn play_effect(&mut self, sound: Sound);
    fn play_music(&mut self);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    fn stop_music(&mut self);
}

/// Forward the audio part of an event; other events are ignored.
pub fn dispatch(audio: &mut impl Audio, event: &GameEvent) {
    match *event {
        GameEvent::Sound(sound) => audio.play_effect(sound),
        GameEvent::Music(Music::Play) => audio.play_music(),
        GameEvent::Music(Music::Pause) => audio.pause_music(),
        GameEvent::Music(Music::Resume) => audio.resume_music(),
        GameEvent::Music(Music::Stop) => audio.stop_music(),
        GameEvent::HighScore(_) => {}
    }
}

pub struct TerminalAudio<W: Write> {
    out: W,
    bell: bool,
    music_playing: bool,
}

impl<W: Write> TerminalAudio<W> {
    pub fn new(out: W, bell: bool) -> Self {
        TerminalAudio {
            out,
            bell,
            music_playing: false,
        }
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self) {
        // Fire-and-forget: a failed bell is not worth interrupting a frame.
        if self.out.write_all(b"\x07").and_then(|_| self.out.flush()).is_err() {
            tracing::trace!("terminal bell unavailable");
        }
    }
}

impl<W: Write> Audio for TerminalAudio<W> {
    fn play_effect(&mut self, sound: Sound) {
        tracing::trace!(?sound, "effect");
        let loud = matches!(sound, Sound::Hit | Sound::Boss | Sound::GameOver | Sound::Bonus);
        if self.bell && loud {
            self.ring();
        }
    }

    fn play_music(&mut self) {
        self.music_playing = true;
    }

    fn pause_music(&mut self) {
        self.music_playing = false;
    }

    fn resume_music(&mut self) {
        self.music_playing = true;
    }

    fn stop_music(&mut self) {
        self.music_playing = false;
    }
}
