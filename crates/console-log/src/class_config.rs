//! Class config patching.
//!
//! TF2 doesn't log class changes on its own. Each class has a cfg file that
//! runs when the class is picked, so an `echo` added there makes the game
//! print `"<Class> selected "` to the console, and so to console.log.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::class::PlayerClass;

/// What [`ensure_class_configs`] found and changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassConfigReport {
    /// Configs that already had the echo line.
    pub found: Vec<PlayerClass>,
    /// Existing configs the echo line was appended to.
    pub appended: Vec<PlayerClass>,
    /// Configs that didn't exist and were created.
    pub created: Vec<PlayerClass>,
}

/// Returns the block added to a class's cfg file.
pub fn echo_block(class: PlayerClass) -> String {
    format!("\n// Added by tf2rp, please don't remove\necho \"{class} selected\"\n")
}

/// Returns `<game_dir>/tf/cfg`.
pub fn cfg_dir(game_dir: &Path) -> PathBuf {
    game_dir.join("tf").join("cfg")
}

/// Makes sure every class cfg under `game_dir` echoes its class on selection.
///
/// Idempotent: configs that already contain the echo block are left alone.
pub fn ensure_class_configs(game_dir: &Path) -> io::Result<ClassConfigReport> {
    let cfg_path = cfg_dir(game_dir);
    if !cfg_path.is_dir() {
        let reason = if game_dir.is_dir() {
            "game directory exists but tf/cfg doesn't"
        } else {
            "game directory doesn't exist"
        };
        tracing::error!(path = %cfg_path.display(), reason, "can't patch class configs");
        return Err(io::Error::new(io::ErrorKind::NotFound, reason));
    }

    tracing::debug!(path = %cfg_path.display(), "checking class configs");

    let mut report = ClassConfigReport::default();
    for &class in PlayerClass::all() {
        let block = echo_block(class);
        let path = cfg_path.join(format!("{}.cfg", class.config_name()));

        if path.is_file() {
            let mut file = OpenOptions::new().read(true).append(true).open(&path)?;
            let mut raw = Vec::new();
            file.read_to_end(&mut raw)?;

            if String::from_utf8_lossy(&raw).contains(&block) {
                report.found.push(class);
            } else {
                file.write_all(format!("\n{block}").as_bytes())?;
                report.appended.push(class);
            }
        } else {
            fs::write(&path, block)?;
            tracing::debug!(path = %path.display(), "created class config");
            report.created.push(class);
        }
    }

    tracing::debug!(
        found = report.found.len(),
        appended = report.appended.len(),
        created = report.created.len(),
        "class configs checked"
    );

    Ok(report)
}
