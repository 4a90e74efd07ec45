//! Sound output: one ambience channel plus the click and gong cues.
//!
//! Playback failures are never surfaced to the driver. They come back as
//! [`PlaybackDenied`] and end up in the log.

pub mod ambience;
pub mod command;
pub mod cues;

pub use ambience::AmbiencePlayer;
pub use command::CommandHandle;
pub use cues::{Cue, Cues};

use thiserror::Error;

/// The platform refused or failed to play a sound
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackDenied {
    #[error("no audio source registered for {0}")]
    Unavailable(String),

    #[error("failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("player exited: {0}")]
    Exited(String),
}

/// A single playable sound
pub trait AudioHandle {
    /// Volume for the next playback, 0.0 to 1.0
    fn set_volume(&mut self, volume: f32);

    /// Begin playing from the current position
    fn play(&mut self) -> Result<(), PlaybackDenied>;

    /// Stop playing, keeping the position
    fn pause(&mut self);

    /// Move the position back to the start
    fn rewind(&mut self);

    fn is_playing(&self) -> bool;

    /// Collect the outcome of playback that finished on its own since the
    /// last poll. An error means the sound stopped because it failed.
    fn poll(&mut self) -> Result<(), PlaybackDenied> {
        Ok(())
    }
}
