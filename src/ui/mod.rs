pub mod keybindings;
pub mod layout;
pub mod notes_pane;
pub mod settings_pane;
pub mod styles;
pub mod timer_pane;

use crate::app::AppState;
use keybindings::render_keybindings;
use layout::create_layout;
use notes_pane::{render_notepad_pane, render_task_pane};
use ratatui::{widgets::Block, Frame};
use settings_pane::render_settings_pane;
use std::time::Instant;
use styles::{base_style, flash_style};
use timer_pane::render_timer_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();

    // A completion flash briefly takes over the background
    let background = match app.view.active_flash(Instant::now()) {
        Some(flash) => flash_style(flash),
        None => base_style(app.theme),
    };
    f.render_widget(Block::default().style(background), size);

    let layout = create_layout(size);
    render_keybindings(f, app.ui_mode, layout.keybindings_area);
    render_timer_pane(f, app, layout.timer_area);
    render_settings_pane(f, app, layout.settings_area);
    render_task_pane(f, app, layout.task_area);
    render_notepad_pane(f, app, layout.notepad_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AmbiencePlayer, Cues};
    use crate::persistence::{KvStore, Settings};
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn create_test_app() -> AppState {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        AppState::new_on(
            &Settings::default(),
            KvStore::in_memory(),
            AmbiencePlayer::new(),
            Cues::default(),
            today,
        )
        .unwrap()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_idle_screen() {
        let app = create_test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("25:00"));
        assert!(text.contains("READY"));
        assert!(text.contains("[ Start ]"));
        assert!(text.contains("Sessions today"));
    }

    #[test]
    fn test_render_running_screen() {
        let mut app = create_test_app();
        app.toggle_timer();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("FOCUS MODE"));
        assert!(text.contains("[ Pause ]"));
        assert!(text.contains("RUNNING"));
    }
}
