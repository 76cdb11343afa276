use std::fmt;
use std::str::FromStr;

/// A playable TF2 class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerClass {
    Scout,
    Soldier,
    Pyro,
    Demoman,
    Heavy,
    Engineer,
    Medic,
    Sniper,
    Spy,
}

impl PlayerClass {
    /// Returns all classes in scoreboard order.
    pub fn all() -> &'static [PlayerClass] {
        &[
            PlayerClass::Scout,
            PlayerClass::Soldier,
            PlayerClass::Pyro,
            PlayerClass::Demoman,
            PlayerClass::Heavy,
            PlayerClass::Engineer,
            PlayerClass::Medic,
            PlayerClass::Sniper,
            PlayerClass::Spy,
        ]
    }

    /// Returns the display name, which is also what the class cfg echoes.
    pub fn name(&self) -> &'static str {
        match self {
            PlayerClass::Scout => "Scout",
            PlayerClass::Soldier => "Soldier",
            PlayerClass::Pyro => "Pyro",
            PlayerClass::Demoman => "Demoman",
            PlayerClass::Heavy => "Heavy",
            PlayerClass::Engineer => "Engineer",
            PlayerClass::Medic => "Medic",
            PlayerClass::Sniper => "Sniper",
            PlayerClass::Spy => "Spy",
        }
    }

    /// Returns the stem of the class's cfg file under `tf/cfg/`.
    pub fn config_name(&self) -> &'static str {
        match self {
            PlayerClass::Heavy => "heavyweapons",
            PlayerClass::Scout => "scout",
            PlayerClass::Soldier => "soldier",
            PlayerClass::Pyro => "pyro",
            PlayerClass::Demoman => "demoman",
            PlayerClass::Engineer => "engineer",
            PlayerClass::Medic => "medic",
            PlayerClass::Sniper => "sniper",
            PlayerClass::Spy => "spy",
        }
    }
}

impl fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerClass {
    type Err = ();

    /// Exact, case-sensitive match against the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerClass::all()
            .iter()
            .copied()
            .find(|class| class.name() == s)
            .ok_or(())
    }
}
