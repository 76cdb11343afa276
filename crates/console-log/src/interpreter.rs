//! Reads console.log and turns it into the current map and class.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::InterpretError;
use crate::interpretation::Interpretation;
use crate::reader::{read_tail, trim_to_tail};
use crate::scanner::{ScanContext, scan};
use crate::session::InterpreterSession;
use crate::{
    DEFAULT_SCAN_KB, DEFAULT_TRACKED_DEVELOPER, LOAD_TIME_ASSUMPTION_SECS, TRIM_MIN_LINES,
    TRIM_TARGET_MULTIPLE, TRIM_TRIGGER_MULTIPLE,
};

/// Settings that shape how console.log is read and interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretOptions {
    /// Maximum number of kilobytes read from the end of the log per call.
    pub scan_kb: f64,
    /// Report "Queued" instead of naming the queued gamemode.
    pub hide_queued_gamemode: bool,
    /// Cap console.log's size by rewriting it to its tail.
    pub trim_console_log: bool,
    /// Debug runs never trim.
    pub debug: bool,
    /// Username that triggers the one-time hello when seen in a match.
    pub tracked_developer: String,
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            scan_kb: DEFAULT_SCAN_KB,
            hide_queued_gamemode: false,
            trim_console_log: true,
            debug: false,
            tracked_developer: DEFAULT_TRACKED_DEVELOPER.into(),
        }
    }
}

impl InterpretOptions {
    /// Scan budget in bytes.
    pub fn byte_limit(&self) -> u64 {
        // `as` saturates, so negative or NaN budgets read nothing.
        (self.scan_kb * 1024.0) as u64
    }
}

/// Interprets console.log on demand.
///
/// The interpreter itself is stateless; everything that must survive between
/// polls lives in the caller's [`InterpreterSession`]. Calls sharing a session
/// must not overlap.
#[derive(Debug, Clone, Default)]
pub struct LogInterpreter {
    options: InterpretOptions,
}

impl LogInterpreter {
    pub fn new(options: InterpretOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &InterpretOptions {
        &self.options
    }

    /// Returns the current map and class/queue status.
    ///
    /// `usernames` are the local player's Steam persona names, and
    /// `process_start` is the game's start time in unix seconds. With `force`
    /// set, the mtime cache is bypassed and the log is never trimmed.
    ///
    /// Returns [`InterpretError::LogUnavailable`] if console.log doesn't exist.
    pub fn interpret(
        &self,
        session: &mut InterpreterSession,
        log_path: &Path,
        usernames: &[String],
        force: bool,
        process_start: i64,
    ) -> Result<Interpretation, InterpretError> {
        tracing::debug!(path = %log_path.display(), "looking for console.log");

        let metadata = match std::fs::metadata(log_path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(unavailable(log_path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(unavailable(log_path));
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                tracing::error!(error = %e, "can't stat console.log");
                return Ok(previous(session));
            }
            Err(e) => return Err(e.into()),
        };

        let mtime = unix_seconds(metadata.modified()?);
        if !force && session.last_mtime == Some(mtime) {
            if let Some(last) = &session.last_interpretation {
                tracing::debug!(interpretation = %last, "console.log unchanged, not rescanning");
                return Ok(last.clone());
            }
        }

        // The game takes a while to start writing, so anything this close to
        // its start time is left over from a previous run.
        let mtime_relative = mtime - process_start;
        if mtime_relative <= LOAD_TIME_ASSUMPTION_SECS {
            tracing::debug!(
                mtime_relative,
                threshold = LOAD_TIME_ASSUMPTION_SECS,
                "console.log predates game startup, assuming default state"
            );
            return Ok(Interpretation::in_menus());
        }

        let byte_limit = self.options.byte_limit();
        let tail = match read_tail(log_path, byte_limit) {
            Ok(tail) => tail,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                tracing::error!(error = %e, "can't read console.log");
                return Ok(previous(session));
            }
            Err(e) => return Err(e.into()),
        };

        if tail.skipped() {
            tracing::debug!(
                bytes = tail.file_size,
                skipped_to = tail.start_offset,
                read = tail.bytes_read,
                lines = tail.lines.len(),
                "read console.log tail"
            );
        } else {
            tracing::debug!(
                bytes = tail.file_size,
                lines = tail.lines.len(),
                "read all of console.log"
            );
        }

        if self.should_trim(tail.file_size, tail.lines.len(), byte_limit, force) {
            let keep = byte_limit.saturating_mul(TRIM_TARGET_MULTIPLE);
            tracing::debug!(keep, "trimming console.log");
            match trim_to_tail(log_path, keep) {
                Ok(size) => tracing::debug!(size, "console.log trimmed"),
                Err(e) => tracing::error!(error = %e, "failed to trim console.log"),
            }
        }

        let outcome = scan(
            &tail.lines,
            &ScanContext {
                usernames,
                hide_queued_gamemode: self.options.hide_queued_gamemode,
                tracked_developer: &self.options.tracked_developer,
                has_seen_developer: session.has_seen_developer,
            },
        );

        if outcome.developer_spotted {
            session.has_seen_developer = true;
            session.developer_notice_pending = true;
            tracing::info!(
                developer = %self.options.tracked_developer,
                map = %outcome.interpretation.map,
                "developer located in current match"
            );
        }

        session.record(outcome.interpretation.clone(), mtime);
        Ok(outcome.interpretation)
    }

    fn should_trim(&self, file_size: u64, lines_read: usize, byte_limit: u64, force: bool) -> bool {
        file_size > byte_limit.saturating_mul(TRIM_TRIGGER_MULTIPLE)
            && lines_read > TRIM_MIN_LINES
            && self.options.trim_console_log
            && !force
            && !self.options.debug
    }
}

fn unavailable(log_path: &Path) -> InterpretError {
    tracing::error!(path = %log_path.display(), "console.log doesn't exist");
    InterpretError::LogUnavailable {
        path: log_path.to_path_buf(),
    }
}

fn previous(session: &InterpreterSession) -> Interpretation {
    session.last_interpretation.clone().unwrap_or_default()
}

fn unix_seconds(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
