//! App state - pure data structure with no I/O logic

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::composer::Session;
use crate::constants::MAX_HISTORY;
use crate::discovery::Endpoint;
use crate::messages::ui_events::{HeaderField, InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{HistoryEntry, HttpMethod, Response};
use crate::settings::{Settings, SettingsStore};

/// Main application state - pure data, no I/O
pub struct AppState {
    // Project
    pub project_root: PathBuf,
    pub endpoints: Vec<Endpoint>,
    pub diagnostics: Vec<String>,
    pub selected_endpoint: usize,

    // Request inputs
    pub session: Session,
    pub selected_variable: usize,
    pub selected_header: usize,
    pub header_field: HeaderField,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub response_scroll: u16,

    // HTTP Response
    pub response: Response,
    pub is_loading: bool,
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,
    pub pending_method: HttpMethod,
    pub pending_url: String,

    // History
    pub history: VecDeque<HistoryEntry>,

    // Settings
    pub settings: Settings,
    pub settings_store: SettingsStore,

    // Popups
    pub show_help: bool,
    pub show_diagnostics: bool,
}

impl AppState {
    pub fn new(project_root: PathBuf, settings_store: SettingsStore) -> Self {
        let settings = settings_store.load_or_default();
        let mut session = Session::default();
        settings.apply_to(&mut session);

        AppState {
            project_root,
            endpoints: Vec::new(),
            diagnostics: Vec::new(),
            selected_endpoint: 0,
            session,
            selected_variable: 0,
            selected_header: 0,
            header_field: HeaderField::Key,
            active_panel: Panel::Endpoints,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            response_scroll: 0,
            response: Response::default(),
            is_loading: false,
            next_request_id: 1,
            pending_request_id: None,
            pending_method: HttpMethod::default(),
            pending_url: String::new(),
            history: VecDeque::with_capacity(MAX_HISTORY),
            settings,
            settings_store,
            show_help: false,
            show_diagnostics: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Variable names of the selected endpoint
    pub fn variable_names(&self) -> Vec<String> {
        self.session
            .selected
            .as_ref()
            .map(|ep| ep.variables.clone())
            .unwrap_or_default()
    }

    /// The field the active panel edits, if any
    pub fn current_input(&self) -> Option<&str> {
        match self.active_panel {
            Panel::Host => Some(&self.session.host),
            Panel::Port => Some(&self.session.port),
            Panel::Body => Some(&self.session.body),
            Panel::PathVariables => {
                let name = self.variable_names().get(self.selected_variable).cloned()?;
                self.session.path_values.get(&name).map(String::as_str)
            }
            Panel::Headers => self.session.header_rows.get(self.selected_header).map(|row| {
                match self.header_field {
                    HeaderField::Key => row.key.as_str(),
                    HeaderField::Value => row.value.as_str(),
                }
            }),
            Panel::Endpoints | Panel::Response => None,
        }
    }

    /// Mutable access to the field the active panel edits
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.active_panel {
            Panel::Host => Some(&mut self.session.host),
            Panel::Port => Some(&mut self.session.port),
            Panel::Body => Some(&mut self.session.body),
            Panel::PathVariables => {
                let name = self.variable_names().get(self.selected_variable).cloned()?;
                Some(self.session.path_values.entry(name).or_default())
            }
            Panel::Headers => {
                let field = self.header_field;
                self.session
                    .header_rows
                    .get_mut(self.selected_header)
                    .map(|row| match field {
                        HeaderField::Key => &mut row.key,
                        HeaderField::Value => &mut row.value,
                    })
            }
            Panel::Endpoints | Panel::Response => None,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let path_values = self
            .variable_names()
            .into_iter()
            .map(|name| {
                let value = self.session.path_values.get(&name).cloned().unwrap_or_default();
                (name, value)
            })
            .collect();

        RenderState {
            project_root: self.project_root.display().to_string(),
            endpoints: self.endpoints.clone(),
            selected_endpoint: self.selected_endpoint,
            active_endpoint: self.session.selected.clone(),
            diagnostics: self.diagnostics.clone(),
            host: self.session.host.clone(),
            protocol: self.session.protocol.clone(),
            port: self.session.port.clone(),
            path_values,
            selected_variable: self.selected_variable,
            headers: self.session.header_rows.clone(),
            selected_header: self.selected_header,
            header_field: self.header_field,
            body: self.session.body.clone(),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            response: self.response.clone(),
            response_scroll: self.response_scroll,
            is_loading: self.is_loading,
            history_len: self.history.len(),
            show_help: self.show_help,
            show_diagnostics: self.show_diagnostics,
        }
    }
}
