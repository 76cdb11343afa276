//! Application orchestrator: polls the game process and console.log.

use std::path::PathBuf;

use tf2rp_console_log::{
    InterpretError, Interpretation, InterpreterSession, LogInterpreter, ensure_class_configs,
};
use tf2rp_steam::{CONDEBUG, Paths, TF2_APP_ID, console_log_path, scan_launch_options};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::process;

/// Runs the monitor until `cancel` fires.
pub async fn run(config: Config, cancel: CancellationToken) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(config.poll_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut monitor = Monitor::new(config)?;
    tracing::info!(
        game_dir = %monitor.game_dir.display(),
        "monitoring console.log"
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("shutdown signal received");
                break;
            }
            _ = interval.tick() => {
                // Reading and trimming console.log blocks, so poll off the runtime.
                let (returned, outcome) = tokio::task::spawn_blocking(move || {
                    let outcome = monitor.tick(process::find_game_start());
                    (monitor, outcome)
                })
                .await?;
                monitor = returned;
                tracing::trace!(?outcome, "poll");
            }
        }
    }

    Ok(())
}

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The game isn't running.
    NotRunning,
    /// The interpretation changed since the last report.
    Updated(Interpretation),
    /// Same interpretation as the last report.
    Unchanged,
    /// console.log doesn't exist, so `-condebug` is probably missing.
    LogUnavailable,
    /// The interpreter hit an I/O error.
    Failed,
}

/// State for one run of the game process.
struct GameSession {
    start_time: i64,
    session: InterpreterSession,
    usernames: Vec<String>,
    /// Setup instructions were already printed this run.
    warned: bool,
}

/// Polling state that survives game restarts.
pub struct Monitor {
    interpreter: LogInterpreter,
    steam: Option<Paths>,
    game_dir: PathBuf,
    log_path: PathBuf,
    game: Option<GameSession>,
    last_reported: Option<Interpretation>,
}

impl Monitor {
    /// Resolves the Steam and game directories from `config`.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let steam = match &config.steam_dir {
            Some(dir) => Some(Paths::with_base(dir)),
            None => match Paths::new() {
                Ok(paths) => Some(paths),
                Err(e) => {
                    tracing::warn!(error = %e, "can't find Steam, launch options won't be checked");
                    None
                }
            },
        };

        let game_dir = match (&config.game_dir, &steam) {
            (Some(dir), _) => dir.clone(),
            (None, Some(paths)) => paths.tf2_dir(),
            (None, None) => {
                anyhow::bail!("can't locate Team Fortress 2; set game_dir in the config file")
            }
        };
        let log_path = console_log_path(&game_dir);

        Ok(Self {
            interpreter: LogInterpreter::new(config.interpret_options()),
            steam,
            game_dir,
            log_path,
            game: None,
            last_reported: None,
        })
    }

    /// Polls once. `game_start` is the game's start time in unix seconds, or
    /// `None` if it isn't running.
    pub fn tick(&mut self, game_start: Option<i64>) -> TickOutcome {
        let Some(start_time) = game_start else {
            if self.game.take().is_some() {
                tracing::info!("game closed");
                self.last_reported = None;
            }
            return TickOutcome::NotRunning;
        };

        if self.game.as_ref().map(|g| g.start_time) != Some(start_time) {
            tracing::info!(start_time, "game started");
            self.last_reported = None;
            self.game = Some(self.start_game_session(start_time));
        }
        let Some(game) = self.game.as_mut() else {
            return TickOutcome::NotRunning;
        };

        let result = self.interpreter.interpret(
            &mut game.session,
            &self.log_path,
            &game.usernames,
            false,
            start_time,
        );

        if game.session.take_developer_notice() {
            println!("{}", developer_notice(&self.interpreter));
        }

        match result {
            Ok(interpretation) => {
                if self.last_reported.as_ref() == Some(&interpretation) {
                    return TickOutcome::Unchanged;
                }
                tracing::info!(
                    map = %interpretation.map,
                    status = %interpretation.status,
                    "state changed"
                );
                self.last_reported = Some(interpretation.clone());
                TickOutcome::Updated(interpretation)
            }
            Err(InterpretError::LogUnavailable { path }) => {
                tracing::debug!(path = %path.display(), "console.log unavailable");
                if !game.warned {
                    game.warned = true;
                    println!("{}", setup_instructions());
                }
                TickOutcome::LogUnavailable
            }
            Err(e) => {
                tracing::error!(error = %e, "can't interpret console.log");
                TickOutcome::Failed
            }
        }
    }

    /// Runs the once-per-launch checks and returns a fresh session.
    fn start_game_session(&self, start_time: i64) -> GameSession {
        let mut game = GameSession {
            start_time,
            session: InterpreterSession::new(),
            usernames: Vec::new(),
            warned: false,
        };

        if let Some(paths) = &self.steam {
            match scan_launch_options(paths, TF2_APP_ID) {
                Ok(scan) => {
                    game.usernames = scan.usernames;
                    if !scan.condebug_found {
                        game.warned = true;
                        println!("{}", setup_instructions());
                    }
                }
                Err(e) => tracing::warn!(error = %e, "can't check launch options"),
            }
        }

        match ensure_class_configs(&self.game_dir) {
            Ok(report) => {
                if !report.appended.is_empty() || !report.created.is_empty() {
                    tracing::info!(
                        appended = ?report.appended,
                        created = ?report.created,
                        "patched class configs"
                    );
                } else {
                    tracing::debug!(classes = report.found.len(), "class configs already patched");
                }
            }
            Err(e) => tracing::warn!(error = %e, "can't patch class configs"),
        }

        game
    }
}

/// Text shown when console.log is missing or `-condebug` isn't set.
fn setup_instructions() -> String {
    format!(
        "console.log wasn't found, so TF2 probably isn't writing one.\n\
         In Steam, right click Team Fortress 2, open Properties, and add \
         {CONDEBUG} to the launch options. Then restart the game."
    )
}

fn developer_notice(interpreter: &LogInterpreter) -> String {
    format!(
        "Hi {}, you're in this server too!",
        interpreter.options().tracked_developer
    )
}
