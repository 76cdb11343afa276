//! Game process detection stub for platforms without procfs.

/// Always `None`: the game is never detected as running.
pub fn find_game_start() -> Option<i64> {
    None
}
