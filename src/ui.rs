use ratatui::prelude::*;

use crate::messages::ui_events::{InputMode, Panel};
use crate::models::HttpMethod;

/// Border style for a panel: yellow while editing, cyan when focused
pub fn panel_border(panel: Panel, active: Panel, input_mode: InputMode) -> Style {
    if panel != active {
        Style::default()
    } else if input_mode == InputMode::Editing && panel.is_editable() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    }
}

/// Simple JSON syntax highlighting
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for line in text.lines() {
        let mut spans = Vec::new();
        let mut current = String::new();
        let mut in_string = false;
        let mut is_key = false;

        for (idx, c) in line.char_indices() {
            match c {
                '"' => {
                    if in_string {
                        // End of string
                        current.push(c);
                        let color = if is_key { Color::Cyan } else { Color::Green };
                        spans.push(Span::styled(std::mem::take(&mut current), Style::default().fg(color)));
                        in_string = false;
                        is_key = false;
                    } else {
                        if !current.is_empty() {
                            spans.push(scalar_span(std::mem::take(&mut current)));
                        }
                        in_string = true;
                        current.push(c);
                        // A key is a string followed by ':'
                        is_key = line[idx + 1..]
                            .find('"')
                            .map(|end| line[idx + 1 + end + 1..].trim_start().starts_with(':'))
                            .unwrap_or(false);
                    }
                }
                _ if in_string => current.push(c),
                ':' | ',' => {
                    if !current.is_empty() {
                        spans.push(scalar_span(std::mem::take(&mut current)));
                    }
                    spans.push(Span::styled(c.to_string(), Style::default().fg(Color::White)));
                }
                '{' | '}' | '[' | ']' => {
                    if !current.is_empty() {
                        spans.push(scalar_span(std::mem::take(&mut current)));
                    }
                    spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
                }
                _ => current.push(c),
            }
        }

        if !current.is_empty() {
            spans.push(scalar_span(current));
        }

        lines.push(Line::from(spans));
    }

    lines
}

fn scalar_span(text: String) -> Span<'static> {
    let trimmed = text.trim();
    let style = match trimmed {
        "true" | "false" | "null" => Style::default().fg(Color::Magenta),
        _ if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok() => Style::default().fg(Color::Yellow),
        _ => Style::default(),
    };
    Span::styled(text, style)
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::PATCH => Color::Cyan,
        HttpMethod::DELETE => Color::Red,
    }
}

/// A rectangle centered in `r`, sized by percentage
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
