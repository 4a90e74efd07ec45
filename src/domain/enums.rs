use serde::{Deserialize, Serialize};

/// Which interval the session clock is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    /// Get the display name for this mode
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::Break => "Break",
        }
    }

    /// The mode a completed session of this mode hands over to
    pub fn next(&self) -> Mode {
        match self {
            Mode::Focus => Mode::Break,
            Mode::Break => Mode::Focus,
        }
    }

    /// Color flashed when a session of this mode completes
    pub fn completion_flash(&self) -> FlashColor {
        match self {
            Mode::Focus => FlashColor::Green,
            Mode::Break => FlashColor::Blue,
        }
    }
}

/// Run state of the session clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Freshly reset, nothing counted yet
    Idle,
    Running,
    Paused,
}

impl RunState {
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
        }
    }
}

/// Screen flash shown when the clock changes mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashColor {
    /// Green family, focus session finished
    Green,
    /// Blue family, break finished
    Blue,
}

impl FlashColor {
    pub fn hex(&self) -> &'static str {
        match self {
            FlashColor::Green => "#30d158",
            FlashColor::Blue => "#0a84ff",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            FlashColor::Green => (0x30, 0xd1, 0x58),
            FlashColor::Blue => (0x0a, 0x84, 0xff),
        }
    }
}

/// Ambient background sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AmbienceSelection {
    #[default]
    None,
    Rain,
    White,
    Cafe,
}

impl AmbienceSelection {
    /// Parse a selection from its lowercase tag ("rain", "white", ...)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "none" => Some(Self::None),
            "rain" => Some(Self::Rain),
            "white" => Some(Self::White),
            "cafe" => Some(Self::Cafe),
            _ => None,
        }
    }

    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rain => "rain",
            Self::White => "white",
            Self::Cafe => "cafe",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "Silence",
            Self::Rain => "Rain",
            Self::White => "White noise",
            Self::Cafe => "Café",
        }
    }

    /// Fixed playback volume for each sound. White noise is kept very quiet.
    pub fn base_volume(&self) -> Option<f32> {
        match self {
            Self::None => None,
            Self::Rain => Some(0.3),
            Self::White => Some(0.05),
            Self::Cafe => Some(0.4),
        }
    }

    /// Next selection in the cycle order used by the settings pane
    pub fn cycle(&self) -> Self {
        match self {
            Self::None => Self::Rain,
            Self::Rain => Self::White,
            Self::White => Self::Cafe,
            Self::Cafe => Self::None,
        }
    }

    /// All selections that map to an actual sound
    pub fn audible() -> &'static [AmbienceSelection] {
        &[Self::Rain, Self::White, Self::Cafe]
    }
}

/// Color theme, persisted under the `theme` key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Only an exact "dark" selects the dark theme
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_stored(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Status line shown above the timer, together with the start button label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Running(Mode),
    Paused,
    /// A focus session just completed
    BreakDue,
    /// A break just completed
    FocusDue,
}

impl Status {
    pub fn text(&self) -> &'static str {
        match self {
            Status::Ready => "READY",
            Status::Running(Mode::Focus) => "FOCUS MODE",
            Status::Running(Mode::Break) => "BREAK TIME",
            Status::Paused => "PAUSED",
            Status::BreakDue => "TIME FOR A BREAK",
            Status::FocusDue => "FOCUS FINISHED",
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            Status::Ready => "Start",
            Status::Running(_) => "Pause",
            Status::Paused => "Resume",
            Status::BreakDue => "Start break",
            Status::FocusDue => "Start focus",
        }
    }

    /// Paused status is drawn dimmed
    pub fn is_dimmed(&self) -> bool {
        matches!(self, Status::Paused)
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    EditingTask,
    EditingNotepad,
}
