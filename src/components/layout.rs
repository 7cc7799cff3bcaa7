//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub search: Rect,
    pub content: Rect,
    pub status: Option<Rect>,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout: search bar, page content, status, help bar
pub fn calculate_main_layout(area: Rect, has_status: bool) -> MainLayout {
    let chunks = if has_status {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area)
    };

    let (status, help) = if has_status {
        (Some(chunks[2]), chunks[3])
    } else {
        (None, chunks[2])
    };

    MainLayout {
        search: chunks[0],
        content: chunks[1],
        status,
        help,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_without_status() {
        let layout = calculate_main_layout(Rect::new(0, 0, 80, 24), false);
        assert_eq!(layout.search.height, 3);
        assert_eq!(layout.content.y, 3);
        assert_eq!(layout.content.height, 20);
        assert!(layout.status.is_none());
        assert_eq!(layout.help.y, 23);
    }

    #[test]
    fn test_layout_with_status() {
        let layout = calculate_main_layout(Rect::new(0, 0, 80, 24), true);
        assert_eq!(layout.status.map(|r| r.y), Some(22));
        assert_eq!(layout.help.y, 23);
    }

    #[test]
    fn test_centered_popup_clamps_to_area() {
        let popup = centered_popup(Rect::new(0, 0, 30, 5), 40, 7);
        assert_eq!(popup.width, 30);
        assert_eq!(popup.height, 5);
    }
}
