use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::EditingTask | UiMode::EditingNotepad => handle_editing_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Start / pause
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.toggle_timer();
            Ok(false)
        }

        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.reset();
            Ok(false)
        }

        // 25/5 pomodoro shortcut
        KeyCode::Char('p') | KeyCode::Char('P') => {
            app.quick_start();
            Ok(false)
        }

        // Duration presets
        KeyCode::Char('f') | KeyCode::Char('F') => {
            app.cycle_focus_minutes();
            Ok(false)
        }
        KeyCode::Char('b') | KeyCode::Char('B') => {
            app.cycle_break_minutes();
            Ok(false)
        }

        // Ambient sound
        KeyCode::Char('s') | KeyCode::Char('S') => {
            app.cycle_ambience();
            Ok(false)
        }

        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.toggle_theme()?;
            Ok(false)
        }

        // Text fields
        KeyCode::Char('e') | KeyCode::Char('E') => {
            app.begin_edit(UiMode::EditingTask);
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.begin_edit(UiMode::EditingNotepad);
            Ok(false)
        }

        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys while a text field is being edited
fn handle_editing_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.end_edit();
            Ok(false)
        }

        // Enter finishes the one-line task, adds a line to the notepad
        KeyCode::Enter => {
            if app.ui_mode == UiMode::EditingTask {
                app.end_edit();
            } else {
                app.input_char('\n')?;
            }
            Ok(false)
        }

        KeyCode::Backspace => {
            app.backspace()?;
            Ok(false)
        }

        KeyCode::Char(c) => {
            app.input_char(c)?;
            Ok(false)
        }

        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AmbiencePlayer, Cues};
    use crate::domain::{AmbienceSelection, Mode, RunState, Theme};
    use crate::persistence::{KvStore, Settings};
    use chrono::NaiveDate;

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

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        assert!(handle_key(&mut app, key(KeyCode::Char('q'))).unwrap());
        assert!(handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap());
    }

    #[test]
    fn test_space_toggles_timer() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert_eq!(app.clock.run_state(), RunState::Running);
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.clock.run_state(), RunState::Paused);
        handle_key(&mut app, key(KeyCode::Char('r'))).unwrap();
        assert_eq!(app.clock.run_state(), RunState::Idle);
    }

    #[test]
    fn test_quick_start_key() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('f'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('p'))).unwrap();
        assert_eq!(app.clock.run_state(), RunState::Running);
        assert_eq!(app.clock.mode(), Mode::Focus);
        assert_eq!(app.clock.state().total_seconds, 1500);
    }

    #[test]
    fn test_settings_keys() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('s'))).unwrap();
        assert_eq!(app.selection, AmbienceSelection::Rain);
        handle_key(&mut app, key(KeyCode::Char('b'))).unwrap();
        assert_eq!(app.clock.break_minutes(), 10);
        handle_key(&mut app, key(KeyCode::Char('t'))).unwrap();
        assert_eq!(app.theme, Theme::Dark);
    }

    #[test]
    fn test_editing_task_swallows_commands() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('e'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingTask);

        // 'q' and 'p' are text here, not commands
        let quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(!quit);
        type_text(&mut app, "p");
        assert_eq!(app.main_task, "qp");
        assert_eq!(app.clock.run_state(), RunState::Idle);

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_editing_notepad() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('n'))).unwrap();
        type_text(&mut app, "one");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        type_text(&mut app, "twoo");
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();

        assert_eq!(app.notepad, "one\ntwo");
        assert_eq!(app.ui_mode, UiMode::Normal);
    }
}
