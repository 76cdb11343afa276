use std::path::{Path, PathBuf};

use crate::SteamError;

/// TF2's directory name under `steamapps/common`.
pub const TF2_DIR_NAME: &str = "Team Fortress 2";

/// Provides access to Steam directory paths.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Creates a new `Paths` instance with auto-detected Steam directory.
    pub fn new() -> Result<Self, SteamError> {
        let base_dir = get_base_dir()?;
        Ok(Self { base_dir })
    }

    /// Creates a new `Paths` instance with a custom base directory.
    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the Steam base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the userdata directory.
    pub fn user_data_dir(&self) -> PathBuf {
        self.base_dir.join("userdata")
    }

    /// Returns the directory for a specific user.
    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.user_data_dir().join(user_id)
    }

    /// Returns the config directory for a user.
    pub fn config_dir(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("config")
    }

    /// Returns the path to a user's localconfig.vdf (launch options, persona name).
    pub fn local_config_path(&self, user_id: &str) -> PathBuf {
        self.config_dir(user_id).join("localconfig.vdf")
    }

    /// Returns true if the user has a localconfig.vdf file.
    pub fn has_local_config(&self, user_id: &str) -> bool {
        self.local_config_path(user_id).is_file()
    }

    /// Returns TF2's install directory in the default library.
    pub fn tf2_dir(&self) -> PathBuf {
        self.base_dir
            .join("steamapps")
            .join("common")
            .join(TF2_DIR_NAME)
    }
}

/// Returns the path of console.log for a TF2 install.
pub fn console_log_path(game_dir: &Path) -> PathBuf {
    game_dir.join("tf").join("console.log")
}

// Platform-specific base directory detection.
#[cfg(target_os = "linux")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    crate::paths_linux::get_base_dir()
}

#[cfg(target_os = "windows")]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    crate::paths_windows::get_base_dir()
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn get_base_dir() -> Result<PathBuf, SteamError> {
    Err(SteamError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_with_base() {
        let paths = Paths::with_base("/tmp/steam");
        assert_eq!(paths.base_dir(), Path::new("/tmp/steam"));
        assert_eq!(paths.user_data_dir(), PathBuf::from("/tmp/steam/userdata"));
    }

    #[test]
    fn user_dir_structure() {
        let paths = Paths::with_base("/steam");
        assert_eq!(
            paths.user_dir("12345"),
            PathBuf::from("/steam/userdata/12345")
        );
        assert_eq!(
            paths.config_dir("12345"),
            PathBuf::from("/steam/userdata/12345/config")
        );
        assert_eq!(
            paths.local_config_path("12345"),
            PathBuf::from("/steam/userdata/12345/config/localconfig.vdf")
        );
    }

    #[test]
    fn tf2_and_console_log() {
        let paths = Paths::with_base("/steam");
        let game_dir = paths.tf2_dir();
        assert_eq!(
            game_dir,
            PathBuf::from("/steam/steamapps/common/Team Fortress 2")
        );
        assert_eq!(
            console_log_path(&game_dir),
            PathBuf::from("/steam/steamapps/common/Team Fortress 2/tf/console.log")
        );
    }

    #[test]
    fn has_local_config_checks_file() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::with_base(tmp.path());
        assert!(!paths.has_local_config("42"));

        std::fs::create_dir_all(paths.config_dir("42")).unwrap();
        std::fs::write(paths.local_config_path("42"), "\"UserLocalConfigStore\" {}").unwrap();
        assert!(paths.has_local_config("42"));
    }
}
