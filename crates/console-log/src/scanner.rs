//! Line-by-line state machine over console.log.
//!
//! Lines are applied in file order. A session-end marker is checked first and
//! on its own; after that at most one of the line rules in [`LineEvent`]
//! applies per line. Tracking of the developer's name runs on every line
//! regardless of which rule fired.

use crate::class::PlayerClass;
use crate::interpretation::{Interpretation, MapState, Status};
use crate::match_type::MatchType;

/// Substrings that mean the player left whatever server they were on.
const SESSION_END_MARKERS: &[&str] = &[
    "Server shutting down",
    "For FCVAR_REPLICATED",
    "[TF Workshop]",
    "Lobby destroyed",
    "Disconnect:",
    "destroyed Lobby",
    "destroyed CAsyncWavDataCache",
    "Missing map",
    "Host_Error",
    "SoundEmitter:",
];

const CLASS_SELECTED_SUFFIX: &str = " selected \n";
const MAP_PREFIX: &str = "Map:";
const QUEUE_LEFT: &str = "[PartyClient] L";
const QUEUE_ENTERED: &str = "[PartyClient] Entering q";
const STANDBY_QUEUE_ENTERED: &str = "[PartyClient] Entering s";
const DISCONNECT_BY_USER: &str = "Disconnect by user";
const SERVER_ACTIVATED: &str = "SV_ActivateServer";
const MATCH_GROUP: &str = "match group ";

/// Kill feed lines all contain this, and almost nothing else useful does.
const KILL_FEED_WORD: &str = "with";

/// Inputs to one scan that don't change line to line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScanContext<'a> {
    pub usernames: &'a [String],
    pub hide_queued_gamemode: bool,
    pub tracked_developer: &'a str,
    pub has_seen_developer: bool,
}

/// Result of scanning a batch of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScanOutcome {
    pub interpretation: Interpretation,
    /// The developer showed up on the final map and should be announced.
    pub developer_spotted: bool,
}

/// Whether the local player is running the server for the current map.
///
/// `SV_ActivateServer` is logged when a listen server starts; if the next
/// `Map:` line follows it, that map is hosted locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerPhase {
    Idle,
    /// Server activated, waiting for its map.
    Starting,
    /// Current map is hosted locally.
    Hosting,
    /// Hosting, and the server activated again before a new map loaded.
    HostingRestarting,
}

impl ServerPhase {
    fn on_server_activated(self) -> Self {
        match self {
            ServerPhase::Idle | ServerPhase::Starting => ServerPhase::Starting,
            ServerPhase::Hosting | ServerPhase::HostingRestarting => {
                ServerPhase::HostingRestarting
            }
        }
    }

    fn on_map_loaded(self) -> Self {
        match self {
            ServerPhase::Starting | ServerPhase::HostingRestarting => ServerPhase::Hosting,
            ServerPhase::Idle | ServerPhase::Hosting => ServerPhase::Idle,
        }
    }

    fn is_hosting(self) -> bool {
        matches!(self, ServerPhase::Hosting | ServerPhase::HostingRestarting)
    }
}

/// The line rules, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineEvent<'l> {
    ClassSelected(PlayerClass),
    MapLoaded(&'l str),
    QueueLeft,
    QueueEntered(&'l str),
    DisconnectedByUser,
    StandbyQueueEntered,
    ServerActivated,
}

/// Matches a line against the rules; the first rule that matches wins.
fn classify<'l>(line: &'l str, usernames: &[String]) -> Option<LineEvent<'l>> {
    if let Some(prefix) = line.strip_suffix(CLASS_SELECTED_SUFFIX) {
        // A "selected" line that isn't a class still claims the line.
        return prefix.parse().ok().map(LineEvent::ClassSelected);
    }

    if let Some(rest) = line.strip_prefix(MAP_PREFIX) {
        return Some(LineEvent::MapLoaded(rest.trim()));
    }

    if line.contains(QUEUE_LEFT) {
        return Some(LineEvent::QueueLeft);
    }

    if line.contains(QUEUE_ENTERED) {
        let after = line.rsplit(MATCH_GROUP).next().unwrap_or(line);
        let token = after.strip_suffix('\n').unwrap_or(after);
        return Some(LineEvent::QueueEntered(token));
    }

    if line.contains(DISCONNECT_BY_USER)
        && usernames
            .iter()
            .any(|name| !name.is_empty() && line.contains(name.as_str()))
    {
        return Some(LineEvent::DisconnectedByUser);
    }

    if line.contains(STANDBY_QUEUE_ENTERED) {
        return Some(LineEvent::StandbyQueueEntered);
    }

    if line.contains(SERVER_ACTIVATED) {
        return Some(LineEvent::ServerActivated);
    }

    None
}

fn queued_status(token: &str, hide_gamemode: bool) -> Status {
    if hide_gamemode {
        return Status::Queued;
    }

    match MatchType::from_token(token) {
        Some(match_type) => Status::QueuedFor(match_type),
        None => {
            // Every match group the client can log belongs in the table.
            tracing::error!(token, "unknown match group in queue line");
            Status::Queued
        }
    }
}

/// Runs `lines` through the state machine, starting from the menus.
pub(crate) fn scan(lines: &[String], ctx: &ScanContext<'_>) -> ScanOutcome {
    let user_is_developer = ctx.usernames.iter().any(|name| name == ctx.tracked_developer);
    let watch_for_developer = !user_is_developer && !ctx.has_seen_developer;
    let skip_kill_feed = !ctx
        .usernames
        .iter()
        .any(|name| name.contains(KILL_FEED_WORD));

    let mut map = MapState::InMenus;
    let mut status = Status::NotQueued;
    let mut phase = ServerPhase::Idle;
    let mut developer_seen_on: Option<MapState> = None;

    let mut map_line: &str = "";
    let mut status_line: &str = "";

    for line in lines {
        let line = line.as_str();

        if skip_kill_feed
            && line.contains(KILL_FEED_WORD)
            && !(watch_for_developer && line.contains(ctx.tracked_developer))
        {
            continue;
        }

        if !map.is_menus() && SESSION_END_MARKERS.iter().any(|marker| line.contains(marker)) {
            map = MapState::InMenus;
            status = Status::NotQueued;
            map_line = line;
            status_line = line;
        }

        match classify(line, ctx.usernames) {
            Some(LineEvent::ClassSelected(class)) => {
                status = Status::Class(class);
                status_line = line;
            }
            Some(LineEvent::MapLoaded(name)) => {
                map = MapState::Playing(name.to_string());
                status = Status::Unselected;
                map_line = line;
                status_line = line;
                phase = phase.on_map_loaded();
            }
            Some(LineEvent::QueueLeft) => {
                // Leaving a queue doesn't say anything about the map.
                status = Status::NotQueued;
                status_line = line;
            }
            Some(LineEvent::QueueEntered(token)) => {
                map = MapState::InMenus;
                status = queued_status(token, ctx.hide_queued_gamemode);
                map_line = line;
                status_line = line;
            }
            Some(LineEvent::DisconnectedByUser) => {
                map = MapState::InMenus;
                status = Status::NotQueued;
                map_line = line;
                status_line = line;
            }
            Some(LineEvent::StandbyQueueEntered) => {
                map = MapState::InMenus;
                status = Status::QueuedForParty;
                map_line = line;
                status_line = line;
            }
            Some(LineEvent::ServerActivated) => {
                phase = phase.on_server_activated();
            }
            None => {}
        }

        if watch_for_developer && line.contains(ctx.tracked_developer) {
            developer_seen_on = Some(map.clone());
        }
    }

    let developer_spotted =
        watch_for_developer && !map.is_menus() && developer_seen_on.as_ref() == Some(&map);

    let map = match map {
        MapState::Playing(name) if phase.is_hosting() => MapState::Hosting(name),
        other => other,
    };

    if map_line == status_line {
        tracing::debug!(
            map = %map,
            status = %status,
            line = map_line.trim_end_matches('\n'),
            "interpreted console.log"
        );
    } else {
        tracing::debug!(
            map = %map,
            status = %status,
            map_line = map_line.trim_end_matches('\n'),
            status_line = status_line.trim_end_matches('\n'),
            "interpreted console.log"
        );
    }

    if map_line.is_empty() && !status_line.is_empty() {
        tracing::error!("status line used without a map line");
    }

    ScanOutcome {
        interpretation: Interpretation::new(map, status),
        developer_spotted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|l| l.to_string()).collect()
    }

    fn ctx(usernames: &[String]) -> ScanContext<'_> {
        ScanContext {
            usernames,
            hide_queued_gamemode: false,
            tracked_developer: "Kataiser",
            has_seen_developer: false,
        }
    }

    fn pair(outcome: &ScanOutcome) -> (String, String) {
        outcome.interpretation.pair()
    }

    fn p(map: &str, status: &str) -> (String, String) {
        (map.to_string(), status.to_string())
    }

    #[test]
    fn empty_log_is_menus() {
        let names: Vec<String> = vec![];
        let outcome = scan(&[], &ctx(&names));
        assert_eq!(pair(&outcome), p("In menus", "Not queued"));
        assert!(!outcome.developer_spotted);
    }

    #[test]
    fn map_then_class() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&["Map: ctf_2fort\n", "Soldier selected \n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("ctf_2fort", "Soldier"));
    }

    #[test]
    fn map_resets_class_to_unselected() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&["Map: ctf_2fort\n", "Medic selected \n", "Map: pl_upward\n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("pl_upward", "unselected"));
    }

    #[test]
    fn unknown_class_selected_is_ignored() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&["Map: ctf_2fort\n", "Civilian selected \n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("ctf_2fort", "unselected"));
    }

    #[test]
    fn class_line_without_newline_is_ignored() {
        let names: Vec<String> = vec![];
        let outcome = scan(&lines(&["Map: ctf_2fort\n", "Spy selected "]), &ctx(&names));
        assert_eq!(pair(&outcome), p("ctf_2fort", "unselected"));
    }

    #[test]
    fn session_end_markers_return_to_menus() {
        let names: Vec<String> = vec![];
        for marker in SESSION_END_MARKERS {
            let outcome = scan(
                &lines(&[
                    "Map: koth_harvest_final\n",
                    "Pyro selected \n",
                    &format!("blah {marker} blah\n"),
                ]),
                &ctx(&names),
            );
            assert_eq!(pair(&outcome), p("In menus", "Not queued"), "{marker}");
        }
    }

    #[test]
    fn session_end_marker_in_menus_keeps_queue() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&[
                "[PartyClient] Entering queue for match group 12v12 Casual Match\n",
                "Lobby destroyed\n",
            ]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("In menus", "Queued for Casual"));
    }

    #[test]
    fn queue_display_names() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&["[PartyClient] Entering queue for match group 12v12 Casual Match\n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("In menus", "Queued for Casual"));

        let outcome = scan(
            &lines(&["[PartyClient] Entering queue for match group MvM MannUp\n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("In menus", "Queued for MvM (Mann Up)"));
    }

    #[test]
    fn queue_hidden_gamemode() {
        let names: Vec<String> = vec![];
        let mut context = ctx(&names);
        context.hide_queued_gamemode = true;
        let outcome = scan(
            &lines(&["[PartyClient] Entering queue for match group 12v12 Casual Match\n"]),
            &context,
        );
        assert_eq!(pair(&outcome), p("In menus", "Queued"));
    }

    #[test]
    fn unknown_match_group_falls_back_to_queued() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&["[PartyClient] Entering queue for match group 4v4 Mystery\n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("In menus", "Queued"));
    }

    #[test]
    fn entering_queue_leaves_map() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&[
                "Map: cp_process_final\n",
                "Scout selected \n",
                "[PartyClient] Entering queue for match group 6v6 Ladder Match\n",
            ]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("In menus", "Queued for Competitive"));
    }

    #[test]
    fn leaving_queue_keeps_map() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&[
                "[PartyClient] Entering queue for match group 12v12 Casual Match\n",
                "[PartyClient] Leaving queue\n",
            ]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("In menus", "Not queued"));

        let outcome = scan(
            &lines(&["Map: cp_dustbowl\n", "[PartyClient] Leaving queue\n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("cp_dustbowl", "Not queued"));
    }

    #[test]
    fn standby_queue() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&["Map: pl_badwater\n", "[PartyClient] Entering standby queue\n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("In menus", "Queued for a party's match"));
    }

    #[test]
    fn disconnect_by_user_needs_own_username() {
        let names = vec!["Heavy Lifter".to_string()];
        let outcome = scan(
            &lines(&["Map: pl_badwater\n", "SomeoneElse: Disconnect by user.\n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("pl_badwater", "unselected"));

        let outcome = scan(
            &lines(&["Map: pl_badwater\n", "Heavy Lifter: Disconnect by user.\n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("In menus", "Not queued"));
    }

    #[test]
    fn hosting_marker() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&[
                "SV_ActivateServer: setting tickrate to 66.7\n",
                "Map: plr_hightower\n",
                "Engineer selected \n",
            ]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("plr_hightower (hosting)", "Engineer"));
    }

    #[test]
    fn joining_a_server_after_hosting_clears_marker() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&[
                "SV_ActivateServer: setting tickrate to 66.7\n",
                "Map: plr_hightower\n",
                "Map: cp_gorge\n",
            ]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("cp_gorge", "unselected"));
    }

    #[test]
    fn server_restart_while_hosting_stays_hosting() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&[
                "SV_ActivateServer: setting tickrate to 66.7\n",
                "Map: plr_hightower\n",
                "SV_ActivateServer: setting tickrate to 66.7\n",
                "Map: cp_gorge\n",
            ]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("cp_gorge (hosting)", "unselected"));
    }

    #[test]
    fn hosting_marker_not_applied_in_menus() {
        let names: Vec<String> = vec![];
        let outcome = scan(
            &lines(&[
                "SV_ActivateServer: setting tickrate to 66.7\n",
                "Map: plr_hightower\n",
                "Server shutting down\n",
            ]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("In menus", "Not queued"));
    }

    #[test]
    fn kill_feed_lines_are_skipped() {
        let names = vec!["Player".to_string()];
        // Would otherwise pick up the Map: rule.
        let outcome = scan(
            &lines(&["Map: ctf_2fort\n", "Map: killed Player with scattergun.\n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("ctf_2fort", "unselected"));
    }

    #[test]
    fn kill_feed_kept_when_username_contains_with() {
        let names = vec!["Dances with Wolves".to_string()];
        let outcome = scan(
            &lines(&["Map: ctf_2fort\n", "Map: killed Dances with Wolves\n"]),
            &ctx(&names),
        );
        assert_eq!(pair(&outcome), p("killed Dances with Wolves", "unselected"));
    }

    #[test]
    fn developer_spotted_on_current_map() {
        let names = vec!["Player".to_string()];
        let outcome = scan(
            &lines(&[
                "Map: cp_granary\n",
                "Kataiser killed Player with rocketlauncher.\n",
            ]),
            &ctx(&names),
        );
        assert!(outcome.developer_spotted);
    }

    #[test]
    fn developer_seen_on_previous_map_is_not_spotted() {
        let names = vec!["Player".to_string()];
        let outcome = scan(
            &lines(&["Map: cp_granary\n", "Kataiser connected\n", "Map: cp_well\n"]),
            &ctx(&names),
        );
        assert!(!outcome.developer_spotted);
    }

    #[test]
    fn developer_in_menus_is_not_spotted() {
        let names = vec!["Player".to_string()];
        let outcome = scan(&lines(&["Kataiser connected\n"]), &ctx(&names));
        assert!(!outcome.developer_spotted);
    }

    #[test]
    fn developer_not_spotted_by_themselves_or_twice() {
        let names = vec!["Kataiser".to_string()];
        let outcome = scan(
            &lines(&["Map: cp_granary\n", "Kataiser connected\n"]),
            &ctx(&names),
        );
        assert!(!outcome.developer_spotted);

        let names = vec!["Player".to_string()];
        let mut context = ctx(&names);
        context.has_seen_developer = true;
        let outcome = scan(
            &lines(&["Map: cp_granary\n", "Kataiser connected\n"]),
            &context,
        );
        assert!(!outcome.developer_spotted);
    }

    #[test]
    fn server_phase_transitions() {
        use ServerPhase::*;
        assert_eq!(Idle.on_server_activated(), Starting);
        assert_eq!(Starting.on_map_loaded(), Hosting);
        assert_eq!(Hosting.on_map_loaded(), Idle);
        assert_eq!(Hosting.on_server_activated(), HostingRestarting);
        assert_eq!(HostingRestarting.on_map_loaded(), Hosting);
        assert!(HostingRestarting.is_hosting());
        assert!(!Starting.is_hosting());
    }

    #[test]
    fn classify_precedence() {
        let names: Vec<String> = vec![];
        assert_eq!(
            classify("Spy selected \n", &names),
            Some(LineEvent::ClassSelected(PlayerClass::Spy))
        );
        assert_eq!(classify("Map: x selected \n", &names), None);
        assert_eq!(
            classify("Map:  ctf_2fort \n", &names),
            Some(LineEvent::MapLoaded("ctf_2fort"))
        );
        assert_eq!(
            classify("[PartyClient] Entering queue for match group MvM Practice\n", &names),
            Some(LineEvent::QueueEntered("MvM Practice"))
        );
        assert_eq!(
            classify("SV_ActivateServer: setting tickrate to 66.7\n", &names),
            Some(LineEvent::ServerActivated)
        );
        assert_eq!(classify("nothing interesting\n", &names), None);
    }
}
