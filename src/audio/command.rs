use super::{AudioHandle, PlaybackDenied};
use crate::persistence::PlayerCommand;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// Plays a sound by running an external player process.
///
/// Pausing kills the process and remembers how far it got, so the next play
/// resumes from there unless the handle was rewound. The ambience player and
/// the cues always rewind after pausing, so the offset only takes effect for a
/// bare pause, and only with a player template that takes `{start}` (the
/// default afplay one does not). Streams have no position.
pub struct CommandHandle {
    player: PlayerCommand,
    source: String,
    volume: f32,
    looping: bool,
    is_stream: bool,
    child: Option<Child>,
    started_at: Option<Instant>,
    offset: Duration,
}

impl CommandHandle {
    /// A finite file, restarted from the top when `looping` and it runs out
    pub fn clip(player: PlayerCommand, source: String, looping: bool) -> Self {
        Self::build(player, source, looping, false)
    }

    /// A continuous stream
    pub fn stream(player: PlayerCommand, source: String) -> Self {
        Self::build(player, source, false, true)
    }

    fn build(player: PlayerCommand, source: String, looping: bool, is_stream: bool) -> Self {
        Self {
            player,
            source,
            volume: 1.0,
            looping,
            is_stream,
            child: None,
            started_at: None,
            offset: Duration::ZERO,
        }
    }

    fn start_offset(&self) -> u64 {
        if self.is_stream {
            0
        } else {
            self.offset.as_secs()
        }
    }

    fn spawn(&mut self) -> Result<(), PlaybackDenied> {
        let args = self.player.render_args(&self.source, self.volume, self.start_offset());
        let child = Command::new(&self.player.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PlaybackDenied::Spawn {
                program: self.player.program.clone(),
                reason: e.to_string(),
            })?;

        debug!(program = %self.player.program, source = %self.source, pid = child.id(), "player spawned");
        self.child = Some(child);
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(started) = self.started_at.take() {
            self.offset += started.elapsed();
        }
    }
}

impl AudioHandle for CommandHandle {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn play(&mut self) -> Result<(), PlaybackDenied> {
        if self.child.is_some() {
            return Ok(());
        }
        self.spawn()
    }

    fn pause(&mut self) {
        self.kill();
    }

    fn rewind(&mut self) {
        self.offset = Duration::ZERO;
    }

    fn is_playing(&self) -> bool {
        self.child.is_some()
    }

    fn poll(&mut self) -> Result<(), PlaybackDenied> {
        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };

        let outcome = match child.try_wait() {
            Ok(None) => return Ok(()),
            Ok(Some(status)) => status,
            Err(e) => {
                self.child = None;
                self.started_at = None;
                return Err(PlaybackDenied::Exited(e.to_string()));
            }
        };

        self.child = None;
        self.started_at = None;
        self.offset = Duration::ZERO;

        if !outcome.success() {
            return Err(PlaybackDenied::Exited(outcome.to_string()));
        }
        if self.looping {
            return self.spawn();
        }
        Ok(())
    }
}

impl Drop for CommandHandle {
    fn drop(&mut self) {
        self.kill();
    }
}
