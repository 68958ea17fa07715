use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub nodes: Rect,
    pub pods: Rect,
    pub scale: Rect,
    pub status_bar: Rect,
}

pub fn create_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Nodes
            Constraint::Min(5),         // Pods
            Constraint::Length(3),      // Autoscale panel
            Constraint::Length(1),      // Status bar
        ])
        .split(area);

    AppLayout {
        nodes: chunks[0],
        pods: chunks[1],
        scale: chunks[2],
        status_bar: chunks[3],
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect {
        x: area.x + x,
        y: area.y + y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fills_area() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = create_layout(area);
        assert_eq!(layout.scale.height, 3);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.status_bar.y, 39);
        assert_eq!(
            layout.nodes.height + layout.pods.height + layout.scale.height + 1,
            40
        );
    }

    #[test]
    fn test_centered_rect_clips() {
        let area = Rect::new(0, 0, 40, 10);
        let r = centered_rect(area, 60, 6);
        assert_eq!(r.width, 40);
        assert_eq!(r.y, 2);
    }
}
