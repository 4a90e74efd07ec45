use super::AudioHandle;
use tracing::warn;

/// Cues always play at full volume
const CUE_VOLUME: f32 = 1.0;

/// One-shot notification sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Session started
    Click,
    /// Session completed
    Gong,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Click => "click",
            Cue::Gong => "gong",
        }
    }
}

/// The click and gong channels, independent of the ambience channel
#[derive(Default)]
pub struct Cues {
    click: Option<Box<dyn AudioHandle>>,
    gong: Option<Box<dyn AudioHandle>>,
}

impl Cues {
    pub fn new(click: Option<Box<dyn AudioHandle>>, gong: Option<Box<dyn AudioHandle>>) -> Self {
        Self { click, gong }
    }

    /// Play a cue from the start. Failures are logged and otherwise ignored.
    pub fn play(&mut self, cue: Cue) {
        let slot = match cue {
            Cue::Click => &mut self.click,
            Cue::Gong => &mut self.gong,
        };
        let Some(handle) = slot else {
            return;
        };

        if handle.is_playing() {
            handle.pause();
        }
        handle.rewind();
        handle.set_volume(CUE_VOLUME);
        if let Err(denied) = handle.play() {
            warn!(cue = cue.name(), error = %denied, "cue playback denied");
        }
    }

    /// Reap finished cue players
    pub fn poll(&mut self) {
        for (cue, slot) in [(Cue::Click, &mut self.click), (Cue::Gong, &mut self.gong)] {
            if let Some(handle) = slot {
                if let Err(denied) = handle.poll() {
                    warn!(cue = cue.name(), error = %denied, "cue playback failed");
                }
            }
        }
    }
}
