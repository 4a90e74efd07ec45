use super::{AudioHandle, PlaybackDenied};
use crate::domain::AmbienceSelection;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One registered ambience sound
struct AmbienceTrack {
    handle: Box<dyn AudioHandle>,
    base_volume: f32,
    /// Live streams must not be rewound
    is_stream: bool,
}

/// Plays at most one ambience sound at a time
#[derive(Default)]
pub struct AmbiencePlayer {
    tracks: HashMap<AmbienceSelection, AmbienceTrack>,
    active: Option<AmbienceSelection>,
}

impl AmbiencePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handle for a sound. `AmbienceSelection::None` is never registered.
    pub fn register(&mut self, selection: AmbienceSelection, handle: Box<dyn AudioHandle>, is_stream: bool) {
        let Some(base_volume) = selection.base_volume() else {
            return;
        };
        self.tracks.insert(
            selection,
            AmbienceTrack {
                handle,
                base_volume,
                is_stream,
            },
        );
    }

    /// Currently playing selection
    pub fn active(&self) -> Option<AmbienceSelection> {
        self.active
    }

    /// Stop whatever is playing, then start `selection`.
    ///
    /// A denied playback is logged and leaves nothing playing. Returns whether
    /// the new sound is playing.
    pub fn play_selected(&mut self, selection: AmbienceSelection) -> bool {
        self.stop();

        if selection == AmbienceSelection::None {
            return false;
        }

        let Some(track) = self.tracks.get_mut(&selection) else {
            report_denied(selection, PlaybackDenied::Unavailable(selection.to_tag().to_string()));
            return false;
        };

        track.handle.set_volume(track.base_volume);
        match track.handle.play() {
            Ok(()) => {
                debug!(sound = selection.to_tag(), volume = track.base_volume, "ambience started");
                self.active = Some(selection);
                true
            }
            Err(denied) => {
                report_denied(selection, denied);
                false
            }
        }
    }

    /// Pause the active sound. Clips are rewound for a clean restart, streams are not.
    pub fn stop(&mut self) {
        let Some(selection) = self.active.take() else {
            return;
        };
        if let Some(track) = self.tracks.get_mut(&selection) {
            track.handle.pause();
            if !track.is_stream {
                track.handle.rewind();
            }
            debug!(sound = selection.to_tag(), "ambience stopped");
        }
    }

    /// Pick up playback failures that happened after the sound started
    pub fn poll(&mut self) {
        let Some(selection) = self.active else {
            return;
        };
        let Some(track) = self.tracks.get_mut(&selection) else {
            return;
        };
        if let Err(denied) = track.handle.poll() {
            report_denied(selection, denied);
            self.active = None;
        }
    }
}

fn report_denied(selection: AmbienceSelection, denied: PlaybackDenied) {
    warn!(sound = selection.to_tag(), error = %denied, "ambience playback denied");
}
