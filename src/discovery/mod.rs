//! Workspace discovery module - detects Spring endpoints from project source code

pub mod matchers;
pub mod models;
pub mod scanner;
pub mod walker;

pub use models::*;
pub use scanner::{discover, Scanner};
pub use walker::discover_workspace;
