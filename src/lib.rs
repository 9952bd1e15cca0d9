//! Pokemon Duel Battle Core
//!
//! Server-authoritative turn resolution for two-player Pokemon-style
//! battles. [`resolve_turn`] is the pure transition function over an
//! explicit [`BattleState`]; [`SessionCoordinator`] layers per-battle
//! mutual exclusion and action buffering on top of it.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod player;
pub mod roster;
pub mod session;
pub mod sink;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    effectiveness, BaseStats, Combatant, MoveCategory, MoveData, MoveEffect, PokemonType, StatType,
    StatusCondition, Target, Weather,
};

// --- From this crate's modules ---
pub use battle::calculators::{compute_damage, BattlerRef, DamageOutcome};
pub use battle::engine::{get_valid_actions, resolve_turn, TurnResolver};
pub use battle::rng::{RandomSource, ScriptedRng, TurnRng};
pub use battle::state::{
    ActionFailureReason, BattleState, CombatantState, EventBus, EventKind, EventPayload, GameState,
    TurnEvent, TurnOutcome, TurnResult,
};
pub use battle::turn_order::determine_action_order;
pub use config::EngineConfig;
pub use errors::{ConfigError, RosterError, SessionError, SinkError};
pub use player::{ParticipantId, PlayerAction, Side};
pub use roster::{validate_roster, InMemoryRosters, RosterProvider};
pub use session::{PendingTurn, SessionCoordinator, Submission};
pub use sink::{JsonLinesSink, NullSink, RecordingSink, TurnRecord, TurnSink};
