use crate::app::AppState;
use crate::ui::styles::{border_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render durations, sound, theme and today's session count
pub fn render_settings_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let sound_state = match app.ambience.active() {
        Some(active) if active == app.selection => " ♪",
        _ => "",
    };

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled(" Focus    ", title_style()),
            Span::raw(format!("{} min", app.clock.focus_minutes())),
        ]),
        Line::from(vec![
            Span::styled(" Break    ", title_style()),
            Span::raw(format!("{} min", app.clock.break_minutes())),
        ]),
        Line::from(vec![
            Span::styled(" Sound    ", title_style()),
            Span::raw(format!("{}{}", app.selection.name(), sound_state)),
        ]),
        Line::from(vec![
            Span::styled(" Theme    ", title_style()),
            Span::raw(app.theme.as_stored()),
        ]),
        Line::from(vec![
            Span::styled(" State    ", title_style()),
            Span::raw(app.clock.run_state().to_tag()),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" Sessions today  ", title_style()),
            Span::raw(app.view.session_count.to_string()),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Settings ")
            .border_style(border_style()),
    );
    f.render_widget(paragraph, area);
}
