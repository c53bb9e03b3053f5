//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    ScrollUp,
    ScrollDown,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Endpoints
    NextEndpoint,
    PrevEndpoint,
    SelectEndpoint,
    Rescan,

    // Connection
    ToggleProtocol,

    // Path variables
    NextVariable,
    PrevVariable,

    // Headers
    NextHeader,
    PrevHeader,
    NextHeaderField,
    AddHeader,
    DeleteHeader,

    // Body
    FormatBody,

    // Request actions
    SendRequest,
    CancelRequest,

    // Popups
    ToggleHelp,
    ShowDiagnostics,
    ClosePopup,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Panel {
    Endpoints,
    Host,
    Port,
    PathVariables,
    Headers,
    Body,
    Response,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Endpoints => Panel::Host,
            Panel::Host => Panel::Port,
            Panel::Port => Panel::PathVariables,
            Panel::PathVariables => Panel::Headers,
            Panel::Headers => Panel::Body,
            Panel::Body => Panel::Response,
            Panel::Response => Panel::Endpoints,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Endpoints => Panel::Response,
            Panel::Host => Panel::Endpoints,
            Panel::Port => Panel::Host,
            Panel::PathVariables => Panel::Port,
            Panel::Headers => Panel::PathVariables,
            Panel::Body => Panel::Headers,
            Panel::Response => Panel::Body,
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            Panel::Host | Panel::Port | Panel::PathVariables | Panel::Headers | Panel::Body
        )
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Which half of a header row is being edited
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HeaderField {
    Key,
    Value,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    popup_open: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('x') => return Some(UiEvent::CancelRequest),
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            _ => {}
        }
    }

    if popup_open {
        return Some(UiEvent::ClosePopup);
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('l') => Some(UiEvent::ShowDiagnostics),
            KeyCode::Tab => Some(UiEvent::NextPanel),
            KeyCode::BackTab => Some(UiEvent::PrevPanel),
            KeyCode::Char('s') => Some(UiEvent::SendRequest),
            KeyCode::Char('r') => Some(UiEvent::Rescan),
            KeyCode::Char('p') => Some(UiEvent::ToggleProtocol),
            KeyCode::Char('e') | KeyCode::Enter => match active_panel {
                Panel::Endpoints => Some(UiEvent::SelectEndpoint),
                Panel::Response => None,
                _ => Some(UiEvent::StartEditing),
            },
            KeyCode::Up | KeyCode::Char('k') => match active_panel {
                Panel::Endpoints => Some(UiEvent::PrevEndpoint),
                Panel::PathVariables => Some(UiEvent::PrevVariable),
                Panel::Headers => Some(UiEvent::PrevHeader),
                Panel::Response => Some(UiEvent::ScrollUp),
                _ => None,
            },
            KeyCode::Down | KeyCode::Char('j') => match active_panel {
                Panel::Endpoints => Some(UiEvent::NextEndpoint),
                Panel::PathVariables => Some(UiEvent::NextVariable),
                Panel::Headers => Some(UiEvent::NextHeader),
                Panel::Response => Some(UiEvent::ScrollDown),
                _ => None,
            },
            KeyCode::Char('a') if active_panel == Panel::Headers => Some(UiEvent::AddHeader),
            KeyCode::Char('d') if active_panel == Panel::Headers => Some(UiEvent::DeleteHeader),
            KeyCode::Char('f') if active_panel == Panel::Body => Some(UiEvent::FormatBody),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Enter if active_panel == Panel::Body => Some(UiEvent::CharInput('\n')),
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Tab if active_panel == Panel::Headers => Some(UiEvent::NextHeaderField),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_depends_on_panel() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Enter), Panel::Endpoints, InputMode::Normal, false),
            Some(UiEvent::SelectEndpoint)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Enter), Panel::Host, InputMode::Normal, false),
            Some(UiEvent::StartEditing)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Enter), Panel::Host, InputMode::Editing, false),
            Some(UiEvent::StopEditing)
        );
    }

    #[test]
    fn test_body_editor_takes_newlines() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Enter), Panel::Body, InputMode::Editing, false),
            Some(UiEvent::CharInput('\n'))
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Esc), Panel::Body, InputMode::Editing, false),
            Some(UiEvent::StopEditing)
        );
    }

    #[test]
    fn test_editing_captures_letters() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), Panel::Host, InputMode::Editing, false),
            Some(UiEvent::CharInput('q'))
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), Panel::Host, InputMode::Normal, false),
            Some(UiEvent::Quit)
        );
    }

    #[test]
    fn test_popup_swallows_keys() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), Panel::Endpoints, InputMode::Normal, true),
            Some(UiEvent::ClosePopup)
        );
        assert_eq!(
            key_to_ui_event(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                Panel::Endpoints,
                InputMode::Normal,
                true
            ),
            Some(UiEvent::Quit)
        );
    }

    #[test]
    fn test_panel_cycle_round_trips() {
        let mut panel = Panel::Endpoints;
        for _ in 0..7 {
            assert_eq!(panel.next().prev(), panel);
            panel = panel.next();
        }
        assert_eq!(panel, Panel::Endpoints);
    }
}
