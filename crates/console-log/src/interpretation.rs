use std::fmt;

use crate::class::PlayerClass;
use crate::match_type::MatchType;

/// Where the player is, as far as console.log can tell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MapState {
    #[default]
    InMenus,
    /// On a map, raw map name as logged.
    Playing(String),
    /// On a map served by the local listen server.
    Hosting(String),
}

impl MapState {
    /// Returns true for the menu sentinel.
    pub fn is_menus(&self) -> bool {
        matches!(self, MapState::InMenus)
    }

    /// Returns the bare map name, without any hosting marker.
    pub fn map_name(&self) -> Option<&str> {
        match self {
            MapState::InMenus => None,
            MapState::Playing(map) | MapState::Hosting(map) => Some(map),
        }
    }
}

impl fmt::Display for MapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapState::InMenus => f.write_str("In menus"),
            MapState::Playing(map) => f.write_str(map),
            MapState::Hosting(map) => write!(f, "{map} (hosting)"),
        }
    }
}

/// The player's class, or their matchmaking queue while in menus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    NotQueued,
    Class(PlayerClass),
    /// On a map, no class picked yet.
    Unselected,
    /// Queued, with the gamemode hidden by configuration.
    Queued,
    QueuedFor(MatchType),
    /// Standby queue for a match the party is already in.
    QueuedForParty,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NotQueued => f.write_str("Not queued"),
            Status::Class(class) => f.write_str(class.name()),
            Status::Unselected => f.write_str("unselected"),
            Status::Queued => f.write_str("Queued"),
            Status::QueuedFor(match_type) => write!(f, "Queued for {match_type}"),
            Status::QueuedForParty => f.write_str("Queued for a party's match"),
        }
    }
}

/// Current map and class/queue status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Interpretation {
    pub map: MapState,
    pub status: Status,
}

impl Interpretation {
    pub fn new(map: MapState, status: Status) -> Self {
        Self { map, status }
    }

    /// The `("In menus", "Not queued")` state.
    pub fn in_menus() -> Self {
        Self::default()
    }

    /// Returns the `(map, status)` strings a presence display consumes.
    pub fn pair(&self) -> (String, String) {
        (self.map.to_string(), self.status.to_string())
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "('{}', '{}')", self.map, self.status)
    }
}
