use crate::app::AppState;
use crate::ui::styles::{border_style, button_style, gauge_style, mode_style, status_style, title_style};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render the countdown, status line, progress and start button
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let view = &app.view;
    let marker = if view.running { "●" } else { "⏱" };
    let title = format!(" {} {} ", marker, view.mode.name());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, title_style()))
        .border_style(border_style());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // Status
            Constraint::Length(1),
            Constraint::Length(1), // Countdown
            Constraint::Length(1),
            Constraint::Length(1), // Progress
            Constraint::Length(1),
            Constraint::Length(1), // Button
            Constraint::Min(0),
        ])
        .split(inner);

    let status = Paragraph::new(view.status.text())
        .style(status_style(view.status.is_dimmed()))
        .alignment(Alignment::Center);
    f.render_widget(status, rows[1]);

    let countdown = Paragraph::new(Line::from(Span::styled(view.display.clone(), mode_style(view.mode))))
        .alignment(Alignment::Center);
    f.render_widget(countdown, rows[3]);

    let gauge_area = centered_row(rows[5], 60);
    let gauge = Gauge::default()
        .gauge_style(gauge_style(view.mode))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", view.progress * 100.0));
    f.render_widget(gauge, gauge_area);

    let button = Paragraph::new(Line::from(Span::styled(
        format!(" [ {} ] ", view.status.button_label()),
        button_style(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(button, rows[7]);
}

/// Middle `percent` of a single row
fn centered_row(area: Rect, percent: u16) -> Rect {
    let side = (100 - percent.min(100)) / 2;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side),
            Constraint::Percentage(percent),
            Constraint::Percentage(side),
        ])
        .split(area)[1]
}
