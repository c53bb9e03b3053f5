//! # apitry
//!
//! A terminal tool that finds the HTTP endpoints a Spring project declares
//! and lets you send requests to them.
//!
//! ## Features
//! - Endpoint discovery from `@RestController` / `@*Mapping` annotations
//! - Path variable substitution with percent-encoding
//! - Editable host, port, protocol, headers and body
//! - Request cancellation and in-memory history
//! - JSON formatting and syntax highlighting
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod constants;
pub mod error;
pub mod models;
pub mod path_template;
pub mod discovery;
pub mod composer;
pub mod network;
pub mod format;
pub mod settings;
pub mod messages;
pub mod app;
pub mod ui;

// Re-export commonly used types
pub use error::RequestError;
pub use models::{HeaderRow, HttpMethod};
pub use discovery::{discover, discover_workspace, DiscoveryReport, Endpoint, SourceFile};
pub use composer::{RequestDescriptor, Session};
pub use network::{execute, ResponseResult, Transport};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::NetworkActor;
