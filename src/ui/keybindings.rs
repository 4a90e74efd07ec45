use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, ui_mode: UiMode, area: Rect) {
    let hints = match ui_mode {
        UiMode::Normal => Line::from(vec![
            Span::raw(" Space start/pause   "),
            Span::raw("r reset   "),
            Span::raw("p pomodoro 25/5   "),
            Span::raw("f focus   "),
            Span::raw("b break   "),
            Span::raw("s sound   "),
            Span::raw("t theme   "),
            Span::raw("e task   "),
            Span::raw("n notes   "),
            Span::raw("q quit"),
        ]),
        UiMode::EditingTask => Line::from(vec![Span::raw(" Enter/Esc done editing task")]),
        UiMode::EditingNotepad => Line::from(vec![Span::raw(" Enter new line   Esc done editing notes")]),
    };

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}
