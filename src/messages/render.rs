//! Render state - data structure sent from App layer to UI for rendering

use crate::discovery::Endpoint;
use crate::messages::ui_events::{HeaderField, InputMode, Panel};
use crate::models::{HeaderRow, Response};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub project_root: String,

    // Inventory
    pub endpoints: Vec<Endpoint>,
    pub selected_endpoint: usize,
    pub active_endpoint: Option<Endpoint>,
    pub diagnostics: Vec<String>,

    // Request inputs
    pub host: String,
    pub protocol: String,
    pub port: String,
    /// (name, value) in path order
    pub path_values: Vec<(String, String)>,
    pub selected_variable: usize,
    pub headers: Vec<HeaderRow>,
    pub selected_header: usize,
    pub header_field: HeaderField,
    pub body: String,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // HTTP Response
    pub response: Response,
    pub response_scroll: u16,
    pub is_loading: bool,
    pub history_len: usize,

    // Popups
    pub show_help: bool,
    pub show_diagnostics: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            project_root: String::from("."),
            endpoints: Vec::new(),
            selected_endpoint: 0,
            active_endpoint: None,
            diagnostics: Vec::new(),
            host: String::new(),
            protocol: String::new(),
            port: String::new(),
            path_values: Vec::new(),
            selected_variable: 0,
            headers: Vec::new(),
            selected_header: 0,
            header_field: HeaderField::Key,
            body: String::new(),
            active_panel: Panel::Endpoints,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            response: Response::default(),
            response_scroll: 0,
            is_loading: false,
            history_len: 0,
            show_help: false,
            show_diagnostics: false,
        }
    }
}

impl RenderState {
    pub fn popup_open(&self) -> bool {
        self.show_help || self.show_diagnostics
    }
}
