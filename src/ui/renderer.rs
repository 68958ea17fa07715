use crate::ui::app::{App, AppMode, Pane, matching_nodes, matching_pods};
use crate::ui::layout::create_layout;
use crate::ui::widgets::{
    FormPopup, HelpOverlay, MessagePopup, NodeTable, PodTable, ScalePanel, StatusBar,
};
use ratatui::{Frame, Terminal, backend::Backend};

pub fn render<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> std::io::Result<()> {
    terminal.draw(|f| render_frame(f, app))?;
    Ok(())
}

fn render_frame(f: &mut Frame, app: &mut App) {
    let layout = create_layout(f.area());
    let filter = app.filter_regex();

    let node_table = NodeTable::new(
        matching_nodes(&app.nodes, filter.as_ref()),
        app.nodes.len(),
        app.nodes_refreshed,
        app.focus == Pane::Nodes,
    );
    f.render_stateful_widget(node_table, layout.nodes, &mut app.node_state);

    let pod_table = PodTable::new(
        matching_pods(&app.pods, filter.as_ref()),
        app.pods.len(),
        app.pods_refreshed,
        app.focus == Pane::Pods,
    );
    f.render_stateful_widget(pod_table, layout.pods, &mut app.pod_state);

    f.render_widget(
        ScalePanel::new(&app.scale_fields, app.focus == Pane::Scale),
        layout.scale,
    );

    let status_bar = StatusBar::new(
        app.nodes.len(),
        app.pods.len(),
        &app.filter_pattern,
        app.busy.as_deref(),
    );
    f.render_widget(status_bar, layout.status_bar);

    if let Some(form) = &app.form {
        f.render_widget(FormPopup::new(form), f.area());
    }

    if let Some(text) = &app.message {
        f.render_widget(MessagePopup::new(text), f.area());
    }

    if app.help_visible {
        f.render_widget(HelpOverlay, f.area());
    }

    // Render filter bar if in filter mode
    if app.mode == AppMode::Filter {
        use ratatui::{
            layout::{Alignment, Constraint, Direction, Layout},
            style::{Color, Style},
            text::Span,
            widgets::{Block, Borders, Clear, Paragraph},
        };

        let filter_area = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(f.area())[1];

        // Clear the area to make it opaque
        f.render_widget(Clear, filter_area);

        let filter_text = format!("Filter: {}_", app.filter_pattern);
        let filter_widget =
            Paragraph::new(Span::styled(filter_text, Style::default().fg(Color::Cyan)))
                .block(
                    Block::default()
                        .title("Filter rows (Enter to apply, Esc to clear)")
                        .borders(Borders::ALL)
                        .style(Style::default().fg(Color::Cyan)),
                )
                .alignment(Alignment::Left);

        f.render_widget(filter_widget, filter_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pod;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_full_frame() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = App::new();
        app.set_pods(vec![Pod {
            id: 3,
            name: "frontend-7d9c".to_string(),
            namespace: "default".to_string(),
            status: "Running".to_string(),
        }]);

        render(&mut terminal, &mut app).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("AKS Nodes (0)"));
        assert!(text.contains("frontend-7d9c"));
        assert!(text.contains("Autoscale Deployment"));
    }

    #[test]
    fn test_render_message_popup() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = App::new();
        app.show_message("DB Error: connection reset");

        render(&mut terminal, &mut app).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("DB Error: connection reset"));
        assert!(text.contains("Press any key to close"));
    }
}
