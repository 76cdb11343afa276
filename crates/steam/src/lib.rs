pub mod launch_options;
pub mod paths;
#[cfg(target_os = "linux")]
mod paths_linux;
#[cfg(target_os = "windows")]
mod paths_windows;
pub mod users;
pub mod vdf;

// Re-export primary types.
pub use launch_options::{CONDEBUG, LaunchOptionsScan, TF2_APP_ID, scan_launch_options};
pub use paths::{Paths, TF2_DIR_NAME, console_log_path};
pub use users::{User, get_users_with_paths};
pub use vdf::{VdfObject, VdfValue, parse_text_vdf};

/// Errors for Steam operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam installation not found")]
    NotFound,

    #[error("VDF parse error: {0}")]
    Vdf(String),

    #[error("I/O error: {0}")]
    Io(String),
}
