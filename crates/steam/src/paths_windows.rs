use std::path::PathBuf;

use crate::SteamError;

/// Registry keys holding Steam's `InstallPath`, 64-bit view first.
const STEAM_REGISTRY_KEYS: &[&str] = &[
    r"SOFTWARE\Wow6432Node\Valve\Steam",
    r"SOFTWARE\Valve\Steam",
];

/// Returns the Steam base directory on Windows using the registry.
pub(crate) fn get_base_dir() -> Result<PathBuf, SteamError> {
    STEAM_REGISTRY_KEYS
        .iter()
        .find_map(|subkey| read_install_path(subkey).ok())
        .ok_or(SteamError::NotFound)
}

fn read_install_path(subkey: &str) -> Result<PathBuf, SteamError> {
    use winreg::RegKey;
    use winreg::enums::HKEY_LOCAL_MACHINE;

    let key = RegKey::predef(HKEY_LOCAL_MACHINE)
        .open_subkey(subkey)
        .map_err(|_| SteamError::NotFound)?;
    let install_path: String = key
        .get_value("InstallPath")
        .map_err(|_| SteamError::NotFound)?;
    Ok(PathBuf::from(install_path))
}
