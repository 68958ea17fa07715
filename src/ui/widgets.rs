use crate::types::{Node, Pod};
use crate::ui::app::InputForm;
use crate::ui::layout::centered_rect;
use crate::utils::{get_color, status_tone, tone_color};
use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, Paragraph, Row, StatefulWidget, Table, TableState, Widget,
        Wrap,
    },
};

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

fn table_title(label: &str, shown: usize, total: usize, refreshed: Option<DateTime<Local>>) -> String {
    let count = if shown == total {
        format!("{}", total)
    } else {
        format!("{}/{}", shown, total)
    };
    match refreshed {
        Some(ts) => format!(" {} ({}) refreshed {} ", label, count, ts.format("%H:%M:%S")),
        None => format!(" {} ({}) ", label, count),
    }
}

fn header_row(cells: [&'static str; 4]) -> Row<'static> {
    Row::new(cells).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn highlight() -> Style {
    Style::default()
        .add_modifier(Modifier::REVERSED)
        .fg(Color::Yellow)
        .bg(Color::DarkGray)
}

fn status_cell(status: &str) -> Cell<'_> {
    Cell::from(status).style(Style::default().fg(tone_color(status_tone(status))))
}

pub struct NodeTable<'a> {
    nodes: Vec<&'a Node>,
    total: usize,
    refreshed: Option<DateTime<Local>>,
    focused: bool,
}

impl<'a> NodeTable<'a> {
    pub fn new(
        nodes: Vec<&'a Node>,
        total: usize,
        refreshed: Option<DateTime<Local>>,
        focused: bool,
    ) -> Self {
        Self {
            nodes,
            total,
            refreshed,
            focused,
        }
    }
}

impl<'a> StatefulWidget for NodeTable<'a> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let title = table_title("AKS Nodes", self.nodes.len(), self.total, self.refreshed);
        let rows = self.nodes.iter().map(|n| {
            Row::new(vec![
                Cell::from(n.id.to_string()),
                Cell::from(n.name.as_str()),
                status_cell(&n.status),
                Cell::from(n.kubelet_version.as_str()),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Percentage(45),
                Constraint::Length(14),
                Constraint::Min(10),
            ],
        )
        .header(header_row(["ID", "Name", "Status", "Kubelet Version"]))
        .block(pane_block(title, self.focused))
        .row_highlight_style(highlight())
        .highlight_symbol("→ ");

        StatefulWidget::render(table, area, buf, state);
    }
}

pub struct PodTable<'a> {
    pods: Vec<&'a Pod>,
    total: usize,
    refreshed: Option<DateTime<Local>>,
    focused: bool,
}

impl<'a> PodTable<'a> {
    pub fn new(
        pods: Vec<&'a Pod>,
        total: usize,
        refreshed: Option<DateTime<Local>>,
        focused: bool,
    ) -> Self {
        Self {
            pods,
            total,
            refreshed,
            focused,
        }
    }
}

impl<'a> StatefulWidget for PodTable<'a> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let title = table_title("AKS Pods", self.pods.len(), self.total, self.refreshed);
        let rows = self.pods.iter().map(|p| {
            Row::new(vec![
                Cell::from(p.id.to_string()),
                Cell::from(p.name.as_str()),
                Cell::from(p.namespace.as_str()).style(Style::default().fg(get_color(&p.namespace))),
                status_cell(&p.status),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Percentage(45),
                Constraint::Percentage(25),
                Constraint::Min(10),
            ],
        )
        .header(header_row(["ID", "Name", "Namespace", "Status"]))
        .block(pane_block(title, self.focused))
        .row_highlight_style(highlight())
        .highlight_symbol("→ ");

        StatefulWidget::render(table, area, buf, state);
    }
}

pub struct ScalePanel<'a> {
    fields: &'a [String; 3],
    focused: bool,
}

impl<'a> ScalePanel<'a> {
    pub fn new(fields: &'a [String; 3], focused: bool) -> Self {
        Self { fields, focused }
    }
}

impl<'a> Widget for ScalePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let value = |s: &'a String| {
            if s.is_empty() {
                Span::styled("-", Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(s.as_str())
            }
        };
        let label = |s: &'static str| Span::styled(s, Style::default().fg(Color::Cyan));

        let line = Line::from(vec![
            label("Deployment: "),
            value(&self.fields[0]),
            Span::raw("   "),
            label("Namespace: "),
            value(&self.fields[1]),
            Span::raw("   "),
            label("CPU %: "),
            value(&self.fields[2]),
            Span::styled(
                "   [Enter/s] Scale",
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        Paragraph::new(line)
            .block(pane_block(" Autoscale Deployment ".to_string(), self.focused))
            .render(area, buf);
    }
}

pub struct StatusBar<'a> {
    node_rows: usize,
    pod_rows: usize,
    filter: &'a str,
    busy: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(node_rows: usize, pod_rows: usize, filter: &'a str, busy: Option<&'a str>) -> Self {
        Self {
            node_rows,
            pod_rows,
            filter,
            busy,
        }
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let filter_str = if self.filter.is_empty() {
            "none"
        } else {
            self.filter
        };

        let mut status_text = [
            format!("Nodes: {}", self.node_rows),
            format!("Pods: {}", self.pod_rows),
            format!("Filter: {}", filter_str),
        ]
        .join(" | ");

        if let Some(busy) = self.busy {
            status_text.push_str(&format!(" | [{}...]", busy));
        }
        status_text.push_str(" | Tab: switch pane | ? for help");

        Paragraph::new(status_text)
            .style(Style::default().bg(Color::DarkGray).fg(Color::White))
            .render(area, buf);
    }
}

pub struct HelpOverlay;

impl Widget for HelpOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let help_lines = vec![
            "Keyboard Shortcuts",
            "",
            "  q/Q/Ctrl-C  - Quit",
            "  Tab/S-Tab   - Switch pane (nodes, pods, autoscale)",
            "  ↑/↓ or k/j  - Select row",
            "  ?           - Toggle this help",
            "",
            "Nodes & Pods:",
            "  r           - Refresh focused table",
            "  R           - Refresh both tables",
            "  a           - Add a row to the focused table",
            "  d/Del       - Delete the selected row",
            "  f           - Filter rows (regex, case-insensitive)",
            "",
            "Autoscale:",
            "  s / Enter   - Open the autoscale form",
            "",
            "Forms:",
            "  Enter       - Next field, submit on the last one",
            "  Tab/↑/↓     - Move between fields",
            "  Esc         - Cancel",
            "",
            "Press any key to close",
        ];

        let lines: Vec<Line> = help_lines.iter().map(|s| Line::from(*s)).collect();
        let help_area = centered_rect(area, 60, help_lines.len() as u16 + 2);

        // Clear the area to make it opaque
        Clear.render(help_area, buf);

        let block = Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Black).fg(Color::White));

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left)
            .style(Style::default().bg(Color::Black).fg(Color::White))
            .render(help_area, buf);
    }
}

pub struct FormPopup<'a> {
    form: &'a InputForm,
}

impl<'a> FormPopup<'a> {
    pub fn new(form: &'a InputForm) -> Self {
        Self { form }
    }
}

impl<'a> Widget for FormPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let labels = self.form.kind.labels();
        let mut lines = Vec::new();
        for (i, (label, value)) in labels.iter().zip(&self.form.values).enumerate() {
            let active = i == self.form.active;
            let style = if active {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let cursor = if active { "_" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(format!("{:>16}: ", label), style),
                Span::styled(format!("{}{}", value, cursor), style),
            ]));
        }

        let popup = centered_rect(area, 64, lines.len() as u16 + 2);
        Clear.render(popup, buf);

        let title = format!("{} (Enter: next/submit, Esc: cancel)", self.form.kind.title());
        Paragraph::new(lines)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .render(popup, buf);
    }
}

pub struct MessagePopup<'a> {
    text: &'a str,
}

impl<'a> MessagePopup<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl<'a> Widget for MessagePopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width.saturating_sub(8).clamp(20, 100);
        let inner_width = width.saturating_sub(2).max(1) as usize;
        // Rough wrapped height, plus borders and the hint line
        let body_lines: usize = self
            .text
            .lines()
            .map(|l| l.chars().count().div_ceil(inner_width).max(1))
            .sum::<usize>()
            .max(1);
        let height = (body_lines as u16).saturating_add(3);
        let popup = centered_rect(area, width, height);

        Clear.render(popup, buf);

        let mut lines: Vec<Line> = self.text.lines().map(Line::from).collect();
        lines.push(Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Message")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(Color::Black).fg(Color::White)),
            )
            .render(popup, buf);
    }
}
