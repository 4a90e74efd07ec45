use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::{border_style, editing_style};
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the one-line main task
pub fn render_task_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let is_editing = app.ui_mode == UiMode::EditingTask;
    let title = if is_editing {
        " 🎯 Main task - [Editing] "
    } else {
        " 🎯 Main task "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if is_editing { editing_style() } else { border_style() });

    f.render_widget(Paragraph::new(app.main_task.as_str()).block(block), area);

    if is_editing {
        place_cursor(f, &app.main_task, area);
    }
}

/// Render the free-form notepad
pub fn render_notepad_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let is_editing = app.ui_mode == UiMode::EditingNotepad;
    let title = if is_editing {
        " 📓 Notes - [Editing] "
    } else {
        " 📓 Notes "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if is_editing { editing_style() } else { border_style() });

    let lines: Vec<Line> = app
        .notepad
        .split('\n')
        .map(|line| Line::raw(line.to_string()))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);

    if is_editing {
        place_cursor(f, &app.notepad, area);
    }
}

/// Put the terminal cursor after the last character of `text`
fn place_cursor(f: &mut Frame, text: &str, area: Rect) {
    if let Some((x, y)) = cursor_position(text, area) {
        f.set_cursor(x, y);
    }
}

/// Cursor cell for the end of `text`, if it falls inside the bordered area
fn cursor_position(text: &str, area: Rect) -> Option<(u16, u16)> {
    let line_number = u16::try_from(text.matches('\n').count()).unwrap_or(u16::MAX);
    let column = text
        .rsplit('\n')
        .next()
        .map(|l| u16::try_from(l.chars().count()).unwrap_or(u16::MAX))
        .unwrap_or(0);

    // Account for the border
    let cursor_x = area.x.saturating_add(1).saturating_add(column);
    let cursor_y = area.y.saturating_add(1).saturating_add(line_number);

    let right = area.x.saturating_add(area.width.saturating_sub(1));
    let bottom = area.y.saturating_add(area.height.saturating_sub(1));
    (cursor_x < right && cursor_y < bottom).then_some((cursor_x, cursor_y))
}
