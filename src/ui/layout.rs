use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub timer_area: Rect,
    pub settings_area: Rect,
    pub task_area: Rect,
    pub notepad_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Upper area: Timer (65%) | Settings (35%)
/// - Main task (3 rows), then the notepad below
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Keybindings bar
            Constraint::Percentage(55), // Timer + settings
            Constraint::Length(3),      // Main task
            Constraint::Min(3),         // Notepad
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(main_chunks[1]);

    MainLayout {
        keybindings_area: main_chunks[0],
        timer_area: top[0],
        settings_area: top[1],
        task_area: main_chunks[2],
        notepad_area: main_chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_covers_screen() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = create_layout(area);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.task_area.height, 3);
        assert_eq!(layout.timer_area.y, 1);
        assert_eq!(layout.timer_area.width + layout.settings_area.width, 100);
        assert!(layout.notepad_area.height >= 3);
    }
}
