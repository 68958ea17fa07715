use std::hash::{Hash, Hasher};

/// Coarse health classification of a free-form status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Good,
    Pending,
    Bad,
    Unknown,
}

pub fn status_tone(status: &str) -> StatusTone {
    match status.trim().to_ascii_lowercase().as_str() {
        "ready" | "running" | "succeeded" | "completed" => StatusTone::Good,
        "pending" | "containercreating" | "terminating" => StatusTone::Pending,
        "notready" | "failed" | "error" | "crashloopbackoff" | "unknown" | "evicted" => {
            StatusTone::Bad
        }
        _ => StatusTone::Unknown,
    }
}

pub fn tone_color(tone: StatusTone) -> ratatui::style::Color {
    use ratatui::style::Color;
    match tone {
        StatusTone::Good => Color::Green,
        StatusTone::Pending => Color::Yellow,
        StatusTone::Bad => Color::Red,
        StatusTone::Unknown => Color::Gray,
    }
}

pub fn tone_crossterm_color(tone: StatusTone) -> crossterm::style::Color {
    use crossterm::style::Color;
    match tone {
        StatusTone::Good => Color::Green,
        StatusTone::Pending => Color::Yellow,
        StatusTone::Bad => Color::Red,
        StatusTone::Unknown => Color::Grey,
    }
}

/// Generate a stable color for a string (namespaces) based on hash.
pub fn get_color(s: &str) -> ratatui::style::Color {
    use ratatui::style::Color;
    let colors = [
        Color::Cyan,
        Color::Magenta,
        Color::Blue,
        Color::LightCyan,
        Color::LightMagenta,
        Color::LightBlue,
        Color::Indexed(208), // Orange
        Color::Indexed(141), // Purple
    ];
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    let hash = hasher.finish() as u32;
    colors[(hash % colors.len() as u32) as usize]
}

/// Render rows as left-aligned, space-padded columns for stdout mode.
///
/// Output is always one line per row: line breaks inside a cell become spaces.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.replace(['\r', '\n'], " ")).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = format_row(headers.to_vec());
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}
