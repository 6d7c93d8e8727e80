//! Game simulation modules

pub mod anticheat;
pub mod arena;
pub mod bot;
pub mod combat;
pub mod constants;
pub mod effects;
pub mod map;
pub mod physics;
pub mod spawn;

pub use arena::{Arena, ArenaEvent, ArenaState, MatchStatus, Player};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Match teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    A,
    B,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    /// Callsign used in announcements
    pub fn callsign(self) -> &'static str {
        match self {
            Team::A => "ALPHA",
            Team::B => "BRAVO",
        }
    }
}

/// Combat roles selectable in the lobby
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerClass {
    /// Balanced speed and damage
    Assault,
    /// High damage, fragile, fast bullets
    Sniper,
    /// High health, slow movement
    Tank,
}

impl Default for PlayerClass {
    fn default() -> Self {
        Self::Assault
    }
}

impl FromStr for PlayerClass {
    type Err = ParseClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "assault" => Ok(Self::Assault),
            "sniper" => Ok(Self::Sniper),
            "tank" => Ok(Self::Tank),
            other => Err(ParseClassError(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown player class: {0}")]
pub struct ParseClassError(String);

/// Match mode, encoded as "AvB" ("1v1" .. "5v5", "1v5") or "1v1-local"
/// for two actors on the same keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Skirmish { allies: u8, enemies: u8 },
    LocalDuel,
}

impl MatchMode {
    /// Team sizes as (team A, team B)
    pub fn team_sizes(self) -> (u8, u8) {
        match self {
            MatchMode::Skirmish { allies, enemies } => (allies, enemies),
            MatchMode::LocalDuel => (1, 1),
        }
    }

    pub fn is_local_duel(self) -> bool {
        matches!(self, MatchMode::LocalDuel)
    }
}

impl FromStr for MatchMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("1v1-local") {
            return Ok(MatchMode::LocalDuel);
        }
        let (a, b) = s
            .split_once(&['v', 'V'][..])
            .ok_or_else(|| ParseModeError(s.to_string()))?;
        let allies: u8 = a.parse().map_err(|_| ParseModeError(s.to_string()))?;
        let enemies: u8 = b.parse().map_err(|_| ParseModeError(s.to_string()))?;
        let valid = matches!((allies, enemies), (1..=5, e) if e == allies)
            || (allies, enemies) == (1, 5);
        if !valid {
            return Err(ParseModeError(s.to_string()));
        }
        Ok(MatchMode::Skirmish { allies, enemies })
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Skirmish { allies, enemies } => write!(f, "{allies}v{enemies}"),
            MatchMode::LocalDuel => write!(f, "1v1-local"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown match mode: {0}")]
pub struct ParseModeError(String);

/// Actor identity, unique within one match.
///
/// Ids 0 and 1 are reserved for the locally-controlled actors; bots are
/// numbered from 2 upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl PlayerId {
    pub const LOCAL: PlayerId = PlayerId(0);
    pub const LOCAL_SECOND: PlayerId = PlayerId(1);

    pub fn is_local(self) -> bool {
        self.0 < 2
    }
}

/// How a local actor is steered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlScheme {
    /// WASD + pointer aim + Space/LMB fire
    FreeAim,
    /// Arrow keys + Comma/Period rotate + Enter/RShift fire
    KeyRotate,
}

/// Aim resolved by the input sampler for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimInput {
    /// Absolute facing angle in radians (pointer aim)
    Absolute(f32),
    /// Angular delta for this tick (key rotation)
    Turn(f32),
}

/// Per-tick intent for one locally-controlled actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlIntent {
    /// Unit-length movement direction, or (0, 0) when idle
    pub move_dir: (f32, f32),
    pub aim: AimInput,
    /// Fire request, already gated by the sampler's reload cooldown
    pub fire: bool,
}

impl Default for ControlIntent {
    fn default() -> Self {
        Self {
            move_dir: (0.0, 0.0),
            aim: AimInput::Turn(0.0),
            fire: false,
        }
    }
}

/// Roster entry supplied by the room collaborator for private matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: Uuid,
    pub name: String,
    pub team: Team,
}

/// Construction parameters for one match instance
#[derive(Debug, Clone)]
pub struct ArenaOptions {
    pub mode: MatchMode,
    pub player_name: String,
    pub class: PlayerClass,
    pub skin_id: Option<String>,
    /// Pre-seeded roster for private matches; `None` fills with bots
    pub roster: Option<Vec<RosterPlayer>>,
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes_parse() {
        assert_eq!(
            "1v1".parse::<MatchMode>().unwrap(),
            MatchMode::Skirmish { allies: 1, enemies: 1 }
        );
        assert_eq!(
            "5v5".parse::<MatchMode>().unwrap(),
            MatchMode::Skirmish { allies: 5, enemies: 5 }
        );
        assert_eq!(
            "1v5".parse::<MatchMode>().unwrap(),
            MatchMode::Skirmish { allies: 1, enemies: 5 }
        );
        assert_eq!("1v1-local".parse::<MatchMode>().unwrap(), MatchMode::LocalDuel);
    }

    #[test]
    fn lopsided_modes_are_rejected() {
        assert!("2v5".parse::<MatchMode>().is_err());
        assert!("0v0".parse::<MatchMode>().is_err());
        assert!("6v6".parse::<MatchMode>().is_err());
        assert!("five".parse::<MatchMode>().is_err());
    }

    #[test]
    fn reserved_ids_are_local() {
        assert!(PlayerId::LOCAL.is_local());
        assert!(PlayerId::LOCAL_SECOND.is_local());
        assert!(!PlayerId(2).is_local());
    }
}
