use std::fmt;

/// Matchmaking queue types the party client can announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    Casual,
    MvmBootCamp,
    MvmMannUp,
    Competitive,
}

/// Raw match group token → match type.
const MATCH_TYPES: &[(&str, MatchType)] = &[
    ("12v12 Casual Match", MatchType::Casual),
    ("MvM Practice", MatchType::MvmBootCamp),
    ("MvM MannUp", MatchType::MvmMannUp),
    ("6v6 Ladder Match", MatchType::Competitive),
];

impl MatchType {
    /// Looks up the raw token that follows `match group ` in a queue line.
    pub fn from_token(token: &str) -> Option<Self> {
        MATCH_TYPES
            .iter()
            .find(|(raw, _)| *raw == token)
            .map(|(_, match_type)| *match_type)
    }

    /// Returns the raw token the game logs for this queue.
    pub fn token(&self) -> &'static str {
        MATCH_TYPES
            .iter()
            .find(|(_, match_type)| match_type == self)
            .map(|(raw, _)| *raw)
            .unwrap_or_default()
    }

    /// Returns the human-readable queue name.
    pub fn display_name(&self) -> &'static str {
        match self {
            MatchType::Casual => "Casual",
            MatchType::MvmBootCamp => "MvM (Boot Camp)",
            MatchType::MvmMannUp => "MvM (Mann Up)",
            MatchType::Competitive => "Competitive",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_resolves_to_itself() {
        for (raw, match_type) in MATCH_TYPES {
            assert_eq!(MatchType::from_token(raw), Some(*match_type));
            assert_eq!(match_type.token(), *raw);
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(MatchType::Casual.to_string(), "Casual");
        assert_eq!(MatchType::MvmBootCamp.to_string(), "MvM (Boot Camp)");
        assert_eq!(MatchType::MvmMannUp.to_string(), "MvM (Mann Up)");
        assert_eq!(MatchType::Competitive.to_string(), "Competitive");
    }

    #[test]
    fn unknown_token() {
        assert_eq!(MatchType::from_token("12v12 Casual"), None);
        assert_eq!(MatchType::from_token(""), None);
    }
}
