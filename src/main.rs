//! apitry - discover Spring endpoints in a project and try them from the terminal
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use apitry::app::{AppActor, AppState};
use apitry::constants::{APP_NAME, LOG_FILE};
use apitry::messages::ui_events::{key_to_ui_event, HeaderField, InputMode, Panel};
use apitry::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use apitry::network::{create_client, NetworkActor, ReqwestTransport};
use apitry::settings::SettingsStore;
use apitry::ui::{centered_rect, highlight_json, method_color, panel_border, status_color};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let project_root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    tracing::info!(root = %project_root.display(), "Starting {}", APP_NAME);

    let state = AppState::new(project_root, SettingsStore::new());
    let timeout = state.settings.timeout_secs.map(Duration::from_secs);
    let transport = Arc::new(ReqwestTransport::new(create_client(timeout)));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(transport, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.popup_open(),
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[1]);

    draw_endpoints(f, state, columns[0]);
    draw_request_panels(f, state, columns[1]);
    draw_status_bar(f, state, main_chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
    if state.show_diagnostics {
        draw_diagnostics_popup(f, state, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw(format!(" {} ", state.project_root)),
        Span::styled(
            format!("[{} endpoints]", state.endpoints.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn draw_endpoints(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Endpoints;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(Panel::Endpoints, state.active_panel, state.input_mode))
        .title(" Endpoints (Enter:select r:rescan) ");

    if state.endpoints.is_empty() {
        let empty = Paragraph::new("No endpoints found.\n\nPress 'r' to rescan, 'l' for the scan log.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false });
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .endpoints
        .iter()
        .map(|ep| {
            let active = state.active_endpoint.as_ref() == Some(ep);
            let method_span = Span::styled(
                format!("{:7}", ep.method.as_str()),
                Style::default().fg(method_color(ep.method)).bold(),
            );
            let marker = if active { " *" } else { "" };
            ListItem::new(Line::from(vec![method_span, Span::raw(format!("{}{}", ep.path, marker))]))
        })
        .collect();

    let highlight_style = if is_focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style)
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_endpoint));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_request_panels(f: &mut Frame, state: &RenderState, area: Rect) {
    let variable_rows = state.path_values.len().clamp(1, 4) as u16;
    let header_rows = state.headers.len().clamp(1, 5) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                 // Host / Port
            Constraint::Length(variable_rows + 2), // Path variables
            Constraint::Length(header_rows + 2),   // Headers
            Constraint::Length(5),                 // Body
            Constraint::Min(5),                    // Response
        ])
        .split(area);

    draw_connection(f, state, chunks[0]);
    draw_path_variables(f, state, chunks[1]);
    draw_headers(f, state, chunks[2]);
    draw_body(f, state, chunks[3]);
    draw_response(f, state, chunks[4]);
}

fn is_editing(state: &RenderState, panel: Panel) -> bool {
    state.active_panel == panel && state.input_mode == InputMode::Editing
}

fn set_cursor(f: &mut Frame, area: Rect, column: usize, row: usize) {
    let max_x = area.x + area.width.saturating_sub(2);
    let max_y = area.y + area.height.saturating_sub(2);
    let cursor_x = (area.x + 1 + column as u16).min(max_x);
    let cursor_y = (area.y + 1 + row as u16).min(max_y);
    f.set_cursor_position(Position::new(cursor_x, cursor_y));
}

fn draw_connection(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(14)])
        .split(area);

    let title = match &state.active_endpoint {
        Some(ep) => Line::from(vec![
            Span::raw(" "),
            Span::styled(ep.method.as_str(), Style::default().fg(method_color(ep.method)).bold()),
            Span::raw(format!(" {}://host (p:toggle) ", state.protocol.trim())),
        ]),
        None => Line::from(format!(" {}://host (p:toggle) ", state.protocol.trim())),
    };
    let loading = if state.is_loading { " [...]" } else { "" };

    let host = Paragraph::new(state.host.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(panel_border(Panel::Host, state.active_panel, state.input_mode))
            .title(title)
            .title_bottom(Line::from(loading).right_aligned()),
    );
    f.render_widget(host, chunks[0]);

    let port = Paragraph::new(state.port.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(panel_border(Panel::Port, state.active_panel, state.input_mode))
            .title(" Port "),
    );
    f.render_widget(port, chunks[1]);

    if is_editing(state, Panel::Host) {
        set_cursor(f, chunks[0], state.cursor_position, 0);
    }
    if is_editing(state, Panel::Port) {
        set_cursor(f, chunks[1], state.cursor_position, 0);
    }
}

fn draw_path_variables(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::PathVariables;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(Panel::PathVariables, state.active_panel, state.input_mode))
        .title(" Path Variables ");

    if state.path_values.is_empty() {
        let hint = if state.active_endpoint.is_some() { "(none)" } else { "Select an endpoint" };
        let empty = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)).block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .path_values
        .iter()
        .map(|(name, value)| {
            let value_span = if value.trim().is_empty() {
                Span::styled("<required>", Style::default().fg(Color::Red))
            } else {
                Span::raw(value.clone())
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} = ", name), Style::default().fg(Color::Cyan)),
                value_span,
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(if is_focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    });
    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_variable));
    f.render_stateful_widget(list, area, &mut list_state);

    if is_editing(state, Panel::PathVariables) {
        if let Some((name, _)) = state.path_values.get(state.selected_variable) {
            let row = state.selected_variable.saturating_sub(list_state.offset());
            set_cursor(f, area, name.len() + 3 + state.cursor_position, row);
        }
    }
}

fn draw_headers(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Headers;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(Panel::Headers, state.active_panel, state.input_mode))
        .title(" Headers (a:add d:del Tab:key/value) ");

    let items: Vec<ListItem> = state
        .headers
        .iter()
        .map(|h| {
            let style = if h.key.trim().is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(format!("{}: {}", h.key, h.value)).style(style)
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(if is_focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    });
    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_header).filter(|_| !state.headers.is_empty()));
    f.render_stateful_widget(list, area, &mut list_state);

    if is_editing(state, Panel::Headers) {
        if let Some(header) = state.headers.get(state.selected_header) {
            let column = match state.header_field {
                HeaderField::Key => state.cursor_position,
                HeaderField::Value => header.key.len() + 2 + state.cursor_position,
            };
            let row = state.selected_header.saturating_sub(list_state.offset());
            set_cursor(f, area, column, row);
        }
    }
}

fn draw_body(f: &mut Frame, state: &RenderState, area: Rect) {
    let sends_body = state
        .active_endpoint
        .as_ref()
        .map(|ep| ep.method.transmits_body())
        .unwrap_or(true);
    let title = if sends_body {
        " Body (f:format JSON) "
    } else {
        " Body (not sent with GET) "
    };

    let body = Paragraph::new(state.body.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(Panel::Body, state.active_panel, state.input_mode))
                .title(title),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(body, area);

    if is_editing(state, Panel::Body) {
        let before = &state.body[..state.cursor_position.min(state.body.len())];
        let row = before.matches('\n').count();
        let column = before.rsplit('\n').next().map(str::len).unwrap_or(0);
        set_cursor(f, area, column, row);
    }
}

fn draw_response(f: &mut Frame, state: &RenderState, area: Rect) {
    let status_text = match state.response.status_code {
        Some(code) => Span::styled(format!(" {} ", code), Style::default().fg(status_color(code)).bold()),
        None => Span::raw(" Response "),
    };

    let time_text = if state.response.time_ms > 0 {
        format!(" {}ms ", state.response.time_ms)
    } else {
        String::new()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(Panel::Response, state.active_panel, state.input_mode))
        .title(status_text)
        .title_bottom(Line::from(time_text).right_aligned());

    let response = Paragraph::new(highlight_json(&state.response.body))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.response_scroll, 0));
    f.render_widget(response, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.is_loading {
        " Sending... Ctrl+X:cancel "
    } else if state.input_mode == InputMode::Editing && state.active_panel == Panel::Body {
        " Esc:stop editing | Enter:new line | arrows:move "
    } else if state.input_mode == InputMode::Editing {
        " Esc/Enter:stop editing | arrows:move "
    } else {
        " Tab:panel | e:edit | s:send | r:rescan | l:log | ?:help | q:quit "
    };
    let history = format!("history: {} ", state.history_len);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(history.len() as u16)])
        .split(area);

    f.render_widget(Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)), chunks[0]);
    f.render_widget(Paragraph::new(history).style(Style::default().fg(Color::DarkGray)), chunks[1]);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 APITRY - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   ↑ / ↓  (k / j)     Move in lists / scroll response

 ENDPOINTS
   Enter / e          Select endpoint
   r                  Rescan project
   l                  Show scan log

 REQUEST
   e / Enter          Edit current field
   p                  Toggle http / https
   s                  Send request
   Ctrl+X             Cancel request

 HEADERS
   a                  Add header
   d                  Delete selected header
   Tab (editing)      Switch key / value

 BODY
   Enter (editing)    New line
   f                  Format as JSON

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_diagnostics_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(80, 70, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Scan Log (any key to close) ")
        .style(Style::default().bg(Color::Black));

    let lines: Vec<Line> = if state.diagnostics.is_empty() {
        vec![Line::from("No scan has run yet.")]
    } else {
        state.diagnostics.iter().map(|line| Line::from(line.as_str())).collect()
    };

    let log = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(log, popup_area);
}
