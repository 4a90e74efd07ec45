use crate::clock::{DEFAULT_BREAK_MINUTES, DEFAULT_FOCUS_MINUTES};
use crate::domain::AmbienceSelection;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub ambience: AmbienceSelection,
    pub sounds: SoundSources,
    pub player: PlayerCommand,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            ambience: AmbienceSelection::None,
            sounds: SoundSources::default(),
            player: PlayerCommand::default(),
        }
    }
}

/// Where a sound comes from. Relative paths are resolved against the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundSource {
    pub source: String,
    /// Continuous streams are never rewound. Defaults to true for http(s) URLs.
    #[serde(default)]
    pub stream: Option<bool>,
}

impl SoundSource {
    fn file(name: &str) -> Self {
        Self {
            source: format!("sounds/{}", name),
            stream: None,
        }
    }

    pub fn is_url(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    pub fn is_stream(&self) -> bool {
        self.stream.unwrap_or_else(|| self.is_url())
    }

    /// Source as handed to the player: URLs and absolute paths unchanged,
    /// relative paths joined onto `base`
    pub fn resolve(&self, base: &Path) -> String {
        if self.is_url() || Path::new(&self.source).is_absolute() {
            self.source.clone()
        } else {
            base.join(&self.source).to_string_lossy().into_owned()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundSources {
    pub rain: SoundSource,
    pub white: SoundSource,
    pub cafe: SoundSource,
    pub click: SoundSource,
    pub gong: SoundSource,
}

impl Default for SoundSources {
    fn default() -> Self {
        Self {
            rain: SoundSource::file("rain.mp3"),
            white: SoundSource::file("white.mp3"),
            cafe: SoundSource::file("cafe.mp3"),
            click: SoundSource::file("click.mp3"),
            gong: SoundSource::file("gong.mp3"),
        }
    }
}

impl SoundSources {
    /// Source for an ambience selection; `None` has no source
    pub fn ambience(&self, selection: AmbienceSelection) -> Option<&SoundSource> {
        match selection {
            AmbienceSelection::None => None,
            AmbienceSelection::Rain => Some(&self.rain),
            AmbienceSelection::White => Some(&self.white),
            AmbienceSelection::Cafe => Some(&self.cafe),
        }
    }
}

/// External program used to play sounds.
///
/// Arguments may contain `{source}`, `{volume}` (0.0-1.0), `{volume_pct}`
/// (0-100) and `{start}` (offset in whole seconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for PlayerCommand {
    #[cfg(target_os = "macos")]
    fn default() -> Self {
        Self {
            program: "afplay".to_string(),
            args: vec!["-v".into(), "{volume}".into(), "{source}".into()],
        }
    }

    #[cfg(not(target_os = "macos"))]
    fn default() -> Self {
        Self {
            program: "ffplay".to_string(),
            args: vec![
                "-nodisp".into(),
                "-autoexit".into(),
                "-loglevel".into(),
                "quiet".into(),
                "-volume".into(),
                "{volume_pct}".into(),
                "-ss".into(),
                "{start}".into(),
                "{source}".into(),
            ],
        }
    }
}

impl PlayerCommand {
    /// Expand the argument template for one playback
    pub fn render_args(&self, source: &str, volume: f32, start_secs: u64) -> Vec<String> {
        let volume = volume.clamp(0.0, 1.0);
        let volume_pct = (volume * 100.0).round() as u32;
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{source}", source)
                    .replace("{volume_pct}", &volume_pct.to_string())
                    .replace("{volume}", &format!("{:.2}", volume))
                    .replace("{start}", &start_secs.to_string())
            })
            .collect()
    }
}

/// Load settings from config.json, falling back to defaults when absent
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config: {}", path.display()))?;

    if settings.focus_minutes == 0 || settings.break_minutes == 0 {
        anyhow::bail!("Durations in {} must be at least one minute", path.display());
    }

    Ok(settings)
}
