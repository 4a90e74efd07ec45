use crate::domain::{FlashColor, Mode, Theme};
use ratatui::style::{Color, Modifier, Style};

/// Base style for the whole screen in the given theme
pub fn base_style(theme: Theme) -> Style {
    match theme {
        Theme::Dark => Style::default().fg(Color::White).bg(Color::Black),
        Theme::Light => Style::default().fg(Color::Black).bg(Color::White),
    }
}

/// Screen background while a completion flash is showing
pub fn flash_style(flash: FlashColor) -> Style {
    let (r, g, b) = flash.rgb();
    Style::default().fg(Color::Black).bg(Color::Rgb(r, g, b))
}

/// Accent color of the countdown per mode
pub fn mode_style(mode: Mode) -> Style {
    let color = match mode {
        Mode::Focus => Color::Magenta,
        Mode::Break => Color::Green,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Status line above the countdown
pub fn status_style(dimmed: bool) -> Style {
    if dimmed {
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Border of the pane being edited
pub fn editing_style() -> Style {
    Style::default()
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Progress gauge style
pub fn gauge_style(mode: Mode) -> Style {
    let color = match mode {
        Mode::Focus => Color::Magenta,
        Mode::Break => Color::Green,
    };
    Style::default().fg(color).bg(Color::DarkGray)
}

/// Start button label
pub fn button_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}
