pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(not(windows))]
pub const EXEC_NAME: &str = "rival";
#[cfg(windows)]
pub const EXEC_NAME: &str = "rival.exe";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "RIVAL_API_URL";
pub const TOKEN_ENV: &str = "RIVAL_TOKEN";

pub const AUTH_STORE_PATH: &str = ".rival/auth.json";
