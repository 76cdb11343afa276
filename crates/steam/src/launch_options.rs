//! Launch option lookup in each user's localconfig.vdf.
//!
//! console.log only exists when the game runs with `-condebug`, and the
//! persona names of the accounts that set it are what the game prints for the
//! local player.

use std::fs;

use crate::SteamError;
use crate::paths::Paths;
use crate::users::get_users_with_paths;
use crate::vdf::parse_text_vdf;

/// TF2's Steam app ID.
pub const TF2_APP_ID: u32 = 440;

/// The launch option that makes the game write console.log.
pub const CONDEBUG: &str = "-condebug";

/// Result of checking every local account's launch options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptionsScan {
    /// At least one account launches the app with `-condebug`.
    pub condebug_found: bool,
    /// Persona names of the accounts with `-condebug`.
    pub usernames: Vec<String>,
}

/// Checks every Steam account's launch options for `app_id`.
pub fn scan_launch_options(paths: &Paths, app_id: u32) -> Result<LaunchOptionsScan, SteamError> {
    let users = get_users_with_paths(paths)?;
    tracing::debug!(users = users.len(), "looking for -condebug");

    let app_key = app_id.to_string();
    let quoted_app_key = format!("\"{app_id}\"");
    let mut scan = LaunchOptionsScan::default();

    for user in users {
        if !user.has_local_config {
            tracing::debug!(user = %user.id, "no localconfig.vdf, skipping");
            continue;
        }

        let path = paths.local_config_path(&user.id);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "can't read localconfig.vdf");
                continue;
            }
        };
        let text = String::from_utf8_lossy(&raw);

        // Most accounts never set it, so skip parsing those files entirely.
        if !text.contains(CONDEBUG) || !text.contains(&quoted_app_key) {
            continue;
        }

        tracing::debug!(path = %path.display(), bytes = raw.len(), "parsing localconfig.vdf");
        let root = match parse_text_vdf(&text) {
            Ok(root) => root,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "can't parse localconfig.vdf");
                continue;
            }
        };

        let persona_name = root
            .get_str_path(&["UserLocalConfigStore", "friends", "PersonaName"])
            .unwrap_or_default();
        if persona_name.is_empty() {
            tracing::error!(user = %user.id, "no PersonaName in localconfig.vdf");
        }

        let launch_options = root.get_str_path(&[
            "UserLocalConfigStore",
            "Software",
            "Valve",
            "Steam",
            "apps",
            &app_key,
            "LaunchOptions",
        ]);

        if let Some(options) = launch_options.filter(|o| o.contains(CONDEBUG)) {
            tracing::debug!(user = %user.id, options, "found -condebug in launch options");
            scan.condebug_found = true;
            if !persona_name.is_empty() {
                scan.usernames.push(persona_name.to_string());
            }
        }
    }

    if scan.condebug_found {
        tracing::debug!(usernames = ?scan.usernames, "accounts with -condebug");
    } else {
        tracing::warn!("-condebug not found in any account's launch options");
    }

    Ok(scan)
}
