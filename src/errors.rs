use crate::player::ParticipantId;
use std::path::PathBuf;
use thiserror::Error;

/// Structural and protocol rejections raised by the session coordinator.
///
/// A rejected submission never touches the battle state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("battle {0} does not exist")]
    UnknownBattle(String),

    #[error("battle {0} already exists")]
    BattleExists(String),

    #[error("participant {participant} is not part of battle {battle_id}")]
    NotAParticipant {
        battle_id: String,
        participant: ParticipantId,
    },

    #[error("battle {0} is not accepting actions")]
    BattleNotActive(String),

    #[error("participant {0} already submitted an action this round")]
    AlreadySubmitted(ParticipantId),

    #[error("action targets turn {provided} but battle is on turn {expected}")]
    StaleTurn { expected: u32, provided: u32 },

    #[error("move index {index} is out of range ({available} moves known)")]
    InvalidMoveIndex { index: usize, available: usize },

    #[error("switch index {index} is out of range (roster of {roster_size})")]
    InvalidSwitchIndex { index: usize, roster_size: usize },

    #[error("participants must be distinct, got {0} twice")]
    DuplicateParticipant(ParticipantId),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("battle {0} was closed before the turn resolved")]
    SessionClosed(String),
}

/// Failures from the roster snapshot provider or roster validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("no roster registered for participant {0}")]
    UnknownParticipant(ParticipantId),

    #[error("roster is empty")]
    EmptyRoster,

    #[error("roster has {size} combatants, at most {max} allowed")]
    RosterTooLarge { size: usize, max: usize },

    #[error("combatant in slot {slot} knows no moves")]
    NoMoves { slot: usize },

    #[error("combatant in slot {slot} knows {count} moves, at most {max} allowed")]
    TooManyMoves { slot: usize, count: usize, max: usize },

    #[error("combatant in slot {slot} has {count} types, expected one or two")]
    InvalidTyping { slot: usize, count: usize },

    #[error("combatant in slot {slot} has zero max HP")]
    ZeroHp { slot: usize },
}

/// Failures at the persistence/notification boundary.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to encode turn record")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write turn record")]
    Io(#[from] std::io::Error),

    #[error("turn sink lock poisoned")]
    Poisoned,
}

/// Failures loading or validating the engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Type alias for Results using SessionError
pub type Result<T> = std::result::Result<T, SessionError>;

/// Type alias for Results using RosterError
pub type RosterResult<T> = std::result::Result<T, RosterError>;
