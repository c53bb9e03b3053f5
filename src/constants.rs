//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default target host
pub const DEFAULT_HOST: &str = "localhost";

/// Default protocol; anything other than "https" is sent as "http"
pub const DEFAULT_PROTOCOL: &str = "http";

/// Default Spring Boot port
pub const DEFAULT_PORT: &str = "8080";

/// Header rows a fresh session starts with
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[
    ("Accept", "application/json, text/plain, */*"),
    ("Content-Type", "application/json"),
];

/// Request history size
pub const MAX_HISTORY: usize = 50;

/// Log file written in the working directory
pub const LOG_FILE: &str = "apitry.log";

/// Settings directory under the user's home
pub const SETTINGS_DIR: &str = ".apitry";

/// Settings file name inside `SETTINGS_DIR`
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Application name
pub const APP_NAME: &str = "apitry";
