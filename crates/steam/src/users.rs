use std::fs;

use crate::SteamError;
use crate::paths::Paths;

/// A Steam account that has logged in on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    /// The account has a `localconfig.vdf` to read launch options from.
    pub has_local_config: bool,
}

/// Returns the accounts under `userdata`, sorted by id.
pub fn get_users_with_paths(paths: &Paths) -> Result<Vec<User>, SteamError> {
    let user_data_dir = paths.user_data_dir();

    let entries = fs::read_dir(&user_data_dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SteamError::NotFound
        } else {
            SteamError::Io(e.to_string())
        }
    })?;

    let mut users = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SteamError::Io(e.to_string()))?;

        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();

        // Verify it's a numeric user ID
        if name.parse::<u64>().is_err() {
            continue;
        }

        // Skip "0" directory, a temporary Steam directory, not a real user
        if name == "0" {
            continue;
        }

        let has_local_config = paths.has_local_config(&name);
        users.push(User {
            id: name.into_owned(),
            has_local_config,
        });
    }

    users.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(users)
}
