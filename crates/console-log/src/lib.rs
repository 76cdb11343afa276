//! console.log interpreter: infer the current map and class from TF2's console log.
//!
//! TF2 launched with `-condebug` appends everything it prints to
//! `tf/console.log`. The interpreter reads a bounded tail of that file on each
//! poll, optionally trims the file so it can't grow forever, and runs the lines
//! through a small state machine to work out where the player is.

mod class;
mod class_config;
mod error;
mod interpretation;
mod interpreter;
mod match_type;
mod reader;
mod scanner;
mod session;

pub use class::PlayerClass;
pub use class_config::{ClassConfigReport, ensure_class_configs};
pub use error::InterpretError;
pub use interpretation::{Interpretation, MapState, Status};
pub use interpreter::{InterpretOptions, LogInterpreter};
pub use match_type::MatchType;
pub use reader::{TailRead, read_tail, trim_to_tail};
pub use session::InterpreterSession;

/// Seconds after process start during which console.log is not trusted.
pub const LOAD_TIME_ASSUMPTION_SECS: i64 = 10;

/// File size (as a multiple of the scan budget) that triggers trimming.
pub const TRIM_TRIGGER_MULTIPLE: u64 = 4;

/// File size (as a multiple of the scan budget) kept after trimming.
pub const TRIM_TARGET_MULTIPLE: u64 = 2;

/// Minimum number of lines read before trimming is considered.
pub const TRIM_MIN_LINES: usize = 15_000;

/// Default scan budget in kilobytes.
pub const DEFAULT_SCAN_KB: f64 = 1000.0;

/// The developer whose presence in a match gets a one-time hello.
pub const DEFAULT_TRACKED_DEVELOPER: &str = "Kataiser";
