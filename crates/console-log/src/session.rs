use crate::interpretation::Interpretation;

/// State carried between `interpret` calls for one run of the game.
///
/// Create a fresh session whenever the game (re)starts so the mtime cache of
/// a previous run can never short-circuit the new one.
#[derive(Debug, Clone, Default)]
pub struct InterpreterSession {
    /// Result of the last full scan.
    pub(crate) last_interpretation: Option<Interpretation>,
    /// console.log mtime (unix seconds) at the last full scan.
    pub(crate) last_mtime: Option<i64>,
    /// Whether the tracked developer has already been announced.
    pub(crate) has_seen_developer: bool,
    /// Set when the developer was just spotted, cleared by the caller.
    pub(crate) developer_notice_pending: bool,
}

impl InterpreterSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last computed interpretation, if any.
    pub fn last_interpretation(&self) -> Option<&Interpretation> {
        self.last_interpretation.as_ref()
    }

    /// Returns the console.log mtime recorded with the last interpretation.
    pub fn last_mtime(&self) -> Option<i64> {
        self.last_mtime
    }

    pub fn has_seen_developer(&self) -> bool {
        self.has_seen_developer
    }

    /// Returns true once after the developer is first seen on the current map.
    pub fn take_developer_notice(&mut self) -> bool {
        std::mem::take(&mut self.developer_notice_pending)
    }

    pub(crate) fn record(&mut self, interpretation: Interpretation, mtime: i64) {
        self.last_interpretation = Some(interpretation);
        self.last_mtime = Some(mtime);
    }
}
