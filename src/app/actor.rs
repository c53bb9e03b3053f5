//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        self.state.rescan();
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Panel navigation
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Endpoints
            UiEvent::NextEndpoint => self.state.next_endpoint(),
            UiEvent::PrevEndpoint => self.state.prev_endpoint(),
            UiEvent::SelectEndpoint => self.state.select_endpoint(),
            UiEvent::Rescan => self.state.rescan(),

            // Request inputs
            UiEvent::ToggleProtocol => self.state.toggle_protocol(),
            UiEvent::NextVariable => self.state.next_variable(),
            UiEvent::PrevVariable => self.state.prev_variable(),
            UiEvent::NextHeader => self.state.next_header(),
            UiEvent::PrevHeader => self.state.prev_header(),
            UiEvent::NextHeaderField => self.state.next_header_field(),
            UiEvent::AddHeader => self.state.add_header(),
            UiEvent::DeleteHeader => self.state.delete_header(),
            UiEvent::FormatBody => self.state.format_body(),

            // Request actions
            UiEvent::SendRequest => {
                if self.state.input_mode == InputMode::Editing {
                    self.state.stop_editing();
                }
                if let Some(cmd) = self.state.prepare_request() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::CancelRequest => {
                if let Some(cmd) = self.state.cancel_request() {
                    let _ = self.network_tx.send(cmd);
                }
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::ShowDiagnostics => self.state.show_diagnostics(),
            UiEvent::ClosePopup => self.state.close_popup(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::tempdir;

    use crate::network::ResponseResult;
    use crate::settings::SettingsStore;

    #[tokio::test]
    async fn test_send_round_trip_through_channels() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        fs::write(
            project.join("Health.java"),
            "@RestController\nclass Health {\n  @GetMapping(\"/health\")\n  String ok() {}\n}",
        )
        .unwrap();

        let state = AppState::new(project, SettingsStore::at(dir.path().join("settings.yaml")));
        let (network_tx, mut network_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_tx, net_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(state, network_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_rx));

        let initial = render_rx.recv().await.unwrap();
        assert_eq!(initial.endpoints.len(), 1);

        ui_tx.send(UiEvent::SelectEndpoint).unwrap();
        ui_tx.send(UiEvent::SendRequest).unwrap();

        let Some(NetworkCommand::ExecuteRequest { id, descriptor }) = network_rx.recv().await else {
            panic!("expected a request");
        };
        assert_eq!(descriptor.resolved_path, "/health");

        net_tx
            .send(NetworkResponse::Completed {
                id,
                result: ResponseResult::Failure { message: "Connection failed".into() },
                time_ms: 5,
            })
            .unwrap();

        let done = loop {
            let render = render_rx.recv().await.unwrap();
            if render.history_len == 1 {
                break render;
            }
        };
        assert!(!done.is_loading);
        assert_eq!(done.response.body, "Error: Connection failed");

        ui_tx.send(UiEvent::Quit).unwrap();
        assert!(matches!(network_rx.recv().await, Some(NetworkCommand::Shutdown)));
        handle.await.unwrap();
    }
}
