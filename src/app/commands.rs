//! Command handlers - business logic for processing UI events

use crate::app::AppState;
use crate::constants::MAX_HISTORY;
use crate::discovery::discover_workspace;
use crate::format::{format_json_body, render_response};
use crate::messages::ui_events::{HeaderField, InputMode, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{HeaderRow, HistoryEntry};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if let Some(len) = self.current_input().map(str::len) {
            self.input_mode = InputMode::Editing;
            self.cursor_position = len;
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let Some(input) = self.current_input() else { return };
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let Some(input) = self.current_input() else { return };
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let Some(input) = self.current_input_mut() else { return };
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let cursor_pos = self.cursor_position;
            let Some(input) = self.current_input_mut() else { return };
            if cursor_pos > input.len() {
                return;
            }
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    // ========================
    // Response scrolling
    // ========================

    pub fn scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(1);
    }

    // ========================
    // Endpoints
    // ========================

    pub fn next_endpoint(&mut self) {
        if !self.endpoints.is_empty() {
            self.selected_endpoint = (self.selected_endpoint + 1) % self.endpoints.len();
        }
    }

    pub fn prev_endpoint(&mut self) {
        if !self.endpoints.is_empty() {
            self.selected_endpoint = self
                .selected_endpoint
                .checked_sub(1)
                .unwrap_or(self.endpoints.len() - 1);
        }
    }

    pub fn select_endpoint(&mut self) {
        let Some(endpoint) = self.endpoints.get(self.selected_endpoint).cloned() else {
            return;
        };

        self.response.body = format!(
            "Selected: {} {}\n\nSource: {}",
            endpoint.method, endpoint.path, endpoint.source_location
        );
        self.response.status_code = None;
        self.response_scroll = 0;
        self.selected_variable = 0;

        self.active_panel = if endpoint.variables.is_empty() {
            Panel::Host
        } else {
            Panel::PathVariables
        };
        self.session.select(endpoint);
    }

    /// Re-run discovery over the project root
    pub fn rescan(&mut self) {
        let report = discover_workspace(&self.project_root);
        tracing::info!(
            root = %self.project_root.display(),
            endpoints = report.endpoints.len(),
            "Rescanned project"
        );

        self.endpoints = report.endpoints;
        self.diagnostics = report.diagnostics;
        if self.selected_endpoint >= self.endpoints.len() {
            self.selected_endpoint = 0;
        }

        // Keep the active selection only while it is still discoverable
        let still_present = self
            .session
            .selected
            .as_ref()
            .is_some_and(|selected| self.endpoints.contains(selected));
        if !still_present {
            self.session.selected = None;
            self.session.path_values.clear();
            self.selected_variable = 0;
        }

        self.response.status_code = None;
        self.response.body = if self.endpoints.is_empty() {
            format!("No endpoints found in {}", self.project_root.display())
        } else {
            format!("✓ Found {} endpoints", self.endpoints.len())
        };
    }

    // ========================
    // Connection
    // ========================

    pub fn toggle_protocol(&mut self) {
        self.session.protocol = if self.session.protocol.trim() == "https" {
            "http".to_string()
        } else {
            "https".to_string()
        };
    }

    // ========================
    // Path variables
    // ========================

    pub fn next_variable(&mut self) {
        let count = self.variable_names().len();
        if count > 0 {
            self.selected_variable = (self.selected_variable + 1) % count;
        }
    }

    pub fn prev_variable(&mut self) {
        let count = self.variable_names().len();
        if count > 0 {
            self.selected_variable = self.selected_variable.checked_sub(1).unwrap_or(count - 1);
        }
    }

    // ========================
    // Headers
    // ========================

    pub fn next_header(&mut self) {
        let rows = &self.session.header_rows;
        if !rows.is_empty() {
            self.selected_header = (self.selected_header + 1) % rows.len();
        }
    }

    pub fn prev_header(&mut self) {
        let rows = &self.session.header_rows;
        if !rows.is_empty() {
            self.selected_header = self.selected_header.checked_sub(1).unwrap_or(rows.len() - 1);
        }
    }

    pub fn next_header_field(&mut self) {
        self.header_field = match self.header_field {
            HeaderField::Key => HeaderField::Value,
            HeaderField::Value => HeaderField::Key,
        };
        self.cursor_position = self.current_input().map(str::len).unwrap_or(0);
    }

    pub fn add_header(&mut self) {
        self.session.header_rows.push(HeaderRow::default());
        self.selected_header = self.session.header_rows.len() - 1;
        self.header_field = HeaderField::Key;
    }

    pub fn delete_header(&mut self) {
        if self.selected_header < self.session.header_rows.len() {
            self.session.header_rows.remove(self.selected_header);
            if self.selected_header > 0 {
                self.selected_header -= 1;
            }
        }
    }

    // ========================
    // Body
    // ========================

    pub fn format_body(&mut self) {
        if self.session.body.trim().is_empty() {
            return;
        }
        match format_json_body(&self.session.body) {
            Ok(formatted) => self.session.body = formatted,
            Err(e) => {
                self.response.status_code = None;
                self.response.body = format!("✗ {}", e);
            }
        }
    }

    // ========================
    // Request sending
    // ========================

    pub fn prepare_request(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }

        let descriptor = match self.session.compose() {
            Ok(descriptor) => descriptor,
            Err(e) => {
                self.response.status_code = None;
                self.response.time_ms = 0;
                self.response.body = format!("✗ {}", e);
                self.focus_field(&e.fields());
                return None;
            }
        };

        self.settings.update_from(&self.session);
        if let Err(e) = self.settings_store.save(&self.settings) {
            tracing::warn!(path = %self.settings_store.path().display(), error = %e, "Failed to save settings");
        }

        self.is_loading = true;
        self.response.body = String::from("Sending request...");
        self.response.status_code = None;
        self.response_scroll = 0;

        let id = self.next_id();
        self.pending_request_id = Some(id);
        self.pending_method = descriptor.method;
        self.pending_url = format!(
            "{}{}",
            descriptor.base_url.as_str().trim_end_matches('/'),
            descriptor.resolved_path
        );

        Some(NetworkCommand::ExecuteRequest { id, descriptor })
    }

    /// Move focus to the first input an error is attributed to
    fn focus_field(&mut self, fields: &[String]) {
        let Some(first) = fields.first() else { return };
        self.active_panel = match first.as_str() {
            "host" | "protocol" => Panel::Host,
            "port" => Panel::Port,
            "body" => Panel::Body,
            name => match self.variable_names().iter().position(|v| v == name) {
                Some(index) => {
                    self.selected_variable = index;
                    Panel::PathVariables
                }
                None => return,
            },
        };
    }

    /// Cancel the current pending request
    pub fn cancel_request(&mut self) -> Option<NetworkCommand> {
        self.pending_request_id.map(NetworkCommand::CancelRequest)
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        if self.pending_request_id != Some(response.id()) {
            return;
        }

        let NetworkResponse::Completed { result, time_ms, .. } = response;

        self.history.push_front(HistoryEntry::new(
            self.pending_method,
            &result,
            &self.pending_url,
            time_ms,
        ));
        self.history.truncate(MAX_HISTORY);

        self.response.status_code = result.status_code();
        self.response.body = render_response(&result);
        self.response.time_ms = time_ms;
        self.response_scroll = 0;

        self.is_loading = false;
        self.pending_request_id = None;
        self.pending_url.clear();
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn show_diagnostics(&mut self) {
        self.show_diagnostics = true;
    }

    pub fn close_popup(&mut self) {
        self.show_help = false;
        self.show_diagnostics = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::{tempdir, TempDir};

    use crate::models::HttpMethod;
    use crate::network::{ResponseResult, ResponseSuccess};
    use crate::settings::SettingsStore;

    const CONTROLLER: &str = r#"
@RestController
@RequestMapping("/api")
public class UserController {
    @GetMapping("/users/{id}")
    public User get() {}

    @PostMapping("/users")
    public User create() {}
}
"#;

    fn state_with_project() -> (TempDir, AppState) {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("UserController.java"), CONTROLLER).unwrap();

        let store = SettingsStore::at(dir.path().join("settings.yaml"));
        let mut state = AppState::new(project, store);
        state.rescan();
        (dir, state)
    }

    fn select_path(state: &mut AppState, path: &str) {
        state.selected_endpoint = state.endpoints.iter().position(|e| e.path == path).unwrap();
        state.select_endpoint();
    }

    #[test]
    fn test_rescan_populates_inventory() {
        let (_dir, state) = state_with_project();
        assert_eq!(state.endpoints.len(), 2);
        assert!(state.response.body.contains("Found 2 endpoints"));
        assert!(!state.diagnostics.is_empty());
    }

    #[test]
    fn test_select_moves_to_variables() {
        let (_dir, mut state) = state_with_project();
        select_path(&mut state, "/api/users/{id}");

        assert_eq!(state.active_panel, Panel::PathVariables);
        assert_eq!(state.session.path_values.get("id").map(String::as_str), Some(""));
    }

    #[test]
    fn test_editing_path_variable() {
        let (_dir, mut state) = state_with_project();
        select_path(&mut state, "/api/users/{id}");

        state.start_editing();
        for c in "42".chars() {
            state.enter_char(c);
        }
        state.delete_char();
        state.enter_char('7');
        state.stop_editing();

        assert_eq!(state.session.path_values["id"], "47");
        let render = state.to_render_state();
        assert_eq!(render.path_values, vec![("id".to_string(), "47".to_string())]);
    }

    #[test]
    fn test_compose_error_is_shown_without_sending() {
        let (_dir, mut state) = state_with_project();
        select_path(&mut state, "/api/users/{id}");

        state.active_panel = Panel::Body;

        assert!(state.prepare_request().is_none());
        assert!(!state.is_loading);
        assert!(state.response.body.contains("id"));
        assert!(state.history.is_empty());
        assert_eq!(state.active_panel, Panel::PathVariables);
    }

    #[test]
    fn test_invalid_port_focuses_port() {
        let (_dir, mut state) = state_with_project();
        select_path(&mut state, "/api/users");
        state.session.port = "99999".into();

        assert!(state.prepare_request().is_none());
        assert_eq!(state.active_panel, Panel::Port);
        assert!(state.response.body.contains("99999"));
    }

    #[test]
    fn test_send_without_selection() {
        let (_dir, mut state) = state_with_project();
        assert!(state.prepare_request().is_none());
        assert!(state.response.body.starts_with("✗"));
    }

    #[test]
    fn test_send_and_receive() {
        let (dir, mut state) = state_with_project();
        select_path(&mut state, "/api/users/{id}");
        state.session.path_values.insert("id".into(), " 7 ".into());

        let Some(NetworkCommand::ExecuteRequest { id, descriptor }) = state.prepare_request() else {
            panic!("expected a request");
        };
        assert_eq!(descriptor.resolved_path, "/api/users/7");
        assert!(state.is_loading);
        assert!(dir.path().join("settings.yaml").exists());

        // A second send while loading is ignored
        assert!(state.prepare_request().is_none());

        // Stale ids are dropped
        state.handle_response(NetworkResponse::Completed {
            id: id + 100,
            result: ResponseResult::Failure { message: "stale".into() },
            time_ms: 1,
        });
        assert!(state.is_loading);

        state.handle_response(NetworkResponse::Completed {
            id,
            result: ResponseResult::Success(ResponseSuccess {
                final_url: "http://localhost:8080/api/users/7".into(),
                status_code: 200,
                status_text: "OK".into(),
                headers: Default::default(),
                body_text: "{}".into(),
            }),
            time_ms: 12,
        });

        assert!(!state.is_loading);
        assert_eq!(state.response.status_code, Some(200));
        assert_eq!(state.response.time_ms, 12);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].url, "http://localhost:8080/api/users/7");
    }

    #[test]
    fn test_failed_request_records_composed_url() {
        let (_dir, mut state) = state_with_project();
        select_path(&mut state, "/api/users");

        let Some(NetworkCommand::ExecuteRequest { id, .. }) = state.prepare_request() else {
            panic!("expected a request");
        };
        state.handle_response(NetworkResponse::Completed {
            id,
            result: ResponseResult::Failure { message: "Connection failed: refused".into() },
            time_ms: 3,
        });

        assert_eq!(state.response.body, "Error: Connection failed: refused");
        assert_eq!(state.history[0].url, "http://localhost:8080/api/users");
        assert_eq!(state.history[0].status_code, None);
    }

    #[test]
    fn test_history_records_sent_method() {
        let (_dir, mut state) = state_with_project();
        select_path(&mut state, "/api/users");
        assert_eq!(state.session.selected.as_ref().map(|e| e.method), Some(HttpMethod::POST));

        let Some(NetworkCommand::ExecuteRequest { id, .. }) = state.prepare_request() else {
            panic!("expected a request");
        };

        // Selection changes while the request is in flight
        select_path(&mut state, "/api/users/{id}");
        state.handle_response(NetworkResponse::Completed {
            id,
            result: ResponseResult::Failure { message: "Connection failed".into() },
            time_ms: 2,
        });

        assert_eq!(state.history[0].method, HttpMethod::POST);
        assert_eq!(state.history[0].url, "http://localhost:8080/api/users");
    }

    #[test]
    fn test_body_keeps_newlines() {
        let (_dir, mut state) = state_with_project();
        state.active_panel = Panel::Body;
        state.start_editing();
        for c in "{\n\"a\": 1\n}".chars() {
            state.enter_char(c);
        }
        state.stop_editing();
        assert_eq!(state.session.body, "{\n\"a\": 1\n}");
    }

    #[test]
    fn test_rescan_drops_vanished_selection() {
        let (_dir, mut state) = state_with_project();
        select_path(&mut state, "/api/users/{id}");

        fs::write(
            state.project_root.join("UserController.java"),
            CONTROLLER.replace("/users/{id}", "/people/{id}"),
        )
        .unwrap();
        state.rescan();

        assert!(state.session.selected.is_none());
        assert!(state.session.path_values.is_empty());
    }

    #[test]
    fn test_rescan_keeps_surviving_selection() {
        let (_dir, mut state) = state_with_project();
        select_path(&mut state, "/api/users");
        state.rescan();
        assert_eq!(state.session.selected.as_ref().map(|e| e.path.as_str()), Some("/api/users"));
    }

    #[test]
    fn test_header_editing() {
        let (_dir, mut state) = state_with_project();
        let before = state.session.header_rows.len();

        state.active_panel = Panel::Headers;
        state.add_header();
        assert_eq!(state.selected_header, before);

        state.start_editing();
        state.enter_char('X');
        state.next_header_field();
        state.enter_char('1');
        state.stop_editing();

        assert_eq!(state.session.header_rows[before], HeaderRow::new("X", "1"));

        state.delete_header();
        assert_eq!(state.session.header_rows.len(), before);
    }

    #[test]
    fn test_format_body() {
        let (_dir, mut state) = state_with_project();
        state.session.body = "{\"a\":1}".into();
        state.format_body();
        assert_eq!(state.session.body, "{\n  \"a\": 1\n}");

        state.session.body = "{oops".into();
        state.format_body();
        assert_eq!(state.session.body, "{oops");
        assert!(state.response.body.starts_with("✗"));
    }

    #[test]
    fn test_toggle_protocol() {
        let (_dir, mut state) = state_with_project();
        assert_eq!(state.session.protocol, "http");
        state.toggle_protocol();
        assert_eq!(state.session.protocol, "https");
        state.toggle_protocol();
        assert_eq!(state.session.protocol, "http");
    }

    #[test]
    fn test_endpoint_navigation_wraps() {
        let (_dir, mut state) = state_with_project();
        state.prev_endpoint();
        assert_eq!(state.selected_endpoint, 1);
        state.next_endpoint();
        assert_eq!(state.selected_endpoint, 0);
    }

    #[test]
    fn test_non_editable_panel_ignores_input() {
        let (_dir, mut state) = state_with_project();
        state.active_panel = Panel::Response;
        state.start_editing();
        assert_eq!(state.input_mode, InputMode::Normal);
        state.enter_char('x');
        state.delete_char();
    }
}
