//! Game process detection via procfs.

use std::path::Path;

/// `comm` names the game runs under, natively or through Proton.
const GAME_PROCESS_NAMES: &[&str] = &[
    "hl2_linux",
    "tf_linux64",
    "tf_linux",
    "hl2.exe",
    "tf.exe",
    "tf_win64.exe",
];

/// Clock ticks per second for `/proc/<pid>/stat` times. Fixed at 100 on
/// every mainstream Linux ABI.
const USER_HZ: i64 = 100;

/// Returns the start time (unix seconds) of the running game, if any.
///
/// With several matching processes the earliest start wins.
pub fn find_game_start() -> Option<i64> {
    let boot_time = read_boot_time(Path::new("/proc/stat"))?;
    let entries = std::fs::read_dir("/proc").ok()?;

    let mut earliest: Option<i64> = None;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if name.to_string_lossy().parse::<u32>().is_err() {
            continue;
        }

        let dir = entry.path();
        let Ok(comm) = std::fs::read_to_string(dir.join("comm")) else {
            continue;
        };
        if !is_game_process(comm.trim_end()) {
            continue;
        }

        let Some(ticks) = std::fs::read_to_string(dir.join("stat"))
            .ok()
            .and_then(|stat| parse_start_ticks(&stat))
        else {
            continue;
        };

        let started = boot_time + ticks / USER_HZ;
        tracing::trace!(
            pid = %name.to_string_lossy(),
            comm = comm.trim_end(),
            started,
            "game process"
        );
        earliest = Some(earliest.map_or(started, |e| e.min(started)));
    }

    earliest
}

fn is_game_process(comm: &str) -> bool {
    GAME_PROCESS_NAMES.contains(&comm)
}

/// Extracts `starttime` (field 22) from a `/proc/<pid>/stat` line.
///
/// The command name in field 2 may contain spaces and parentheses, so fields
/// are counted from the last `)`.
fn parse_start_ticks(stat: &str) -> Option<i64> {
    let rest = &stat[stat.rfind(')')? + 1..];
    // `rest` starts at field 3.
    rest.split_whitespace().nth(19)?.parse().ok()
}

/// Reads the boot time (unix seconds) from the `btime` line of `/proc/stat`.
fn read_boot_time(path: &Path) -> Option<i64> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_boot_time(&content)
}

fn parse_boot_time(content: &str) -> Option<i64> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("btime "))
        .and_then(|value| value.trim().parse().ok())
}
