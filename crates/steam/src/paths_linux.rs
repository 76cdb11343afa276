use std::path::{Path, PathBuf};

use crate::SteamError;

/// Returns the Steam base directory on Linux/Unix systems.
pub(crate) fn get_base_dir() -> Result<PathBuf, SteamError> {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or(SteamError::NotFound)?;

    find_base_dir(&home).ok_or(SteamError::NotFound)
}

/// Returns the first existing Steam install under `home`.
fn find_base_dir(home: &Path) -> Option<PathBuf> {
    candidate_dirs(home).into_iter().find(|dir| dir.exists())
}

/// Known Steam locations, most common first.
fn candidate_dirs(home: &Path) -> [PathBuf; 3] {
    [
        home.join(".steam").join("steam"),
        home.join(".local").join("share").join("Steam"),
        // Flatpak
        home.join(".var")
            .join("app")
            .join("com.valvesoftware.Steam")
            .join(".steam")
            .join("steam"),
    ]
}
