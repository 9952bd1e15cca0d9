//! Roster snapshots supplied by the surrounding service.

use crate::config::EngineConfig;
use crate::errors::{RosterError, RosterResult};
use crate::player::ParticipantId;
use schema::Combatant;
use std::collections::HashMap;

/// Resolves a participant to its fully built battle roster.
///
/// Called once per participant when a battle is created; the returned
/// snapshot is owned by the battle from then on.
pub trait RosterProvider: Send + Sync {
    fn roster(&self, participant: &ParticipantId) -> RosterResult<Vec<Combatant>>;
}

/// Provider backed by a fixed map, for tests and embedded use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRosters {
    rosters: HashMap<ParticipantId, Vec<Combatant>>,
}

impl InMemoryRosters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(mut self, participant: impl Into<ParticipantId>, roster: Vec<Combatant>) -> Self {
        self.insert(participant, roster);
        self
    }

    pub fn insert(&mut self, participant: impl Into<ParticipantId>, roster: Vec<Combatant>) {
        self.rosters.insert(participant.into(), roster);
    }
}

impl RosterProvider for InMemoryRosters {
    fn roster(&self, participant: &ParticipantId) -> RosterResult<Vec<Combatant>> {
        self.rosters
            .get(participant)
            .cloned()
            .ok_or_else(|| RosterError::UnknownParticipant(participant.clone()))
    }
}

/// Structural checks a roster must pass before a battle can start.
pub fn validate_roster(roster: &[Combatant], config: &EngineConfig) -> RosterResult<()> {
    if roster.is_empty() {
        return Err(RosterError::EmptyRoster);
    }
    if roster.len() > config.max_roster_size {
        return Err(RosterError::RosterTooLarge {
            size: roster.len(),
            max: config.max_roster_size,
        });
    }

    for (slot, combatant) in roster.iter().enumerate() {
        if combatant.moves.is_empty() {
            return Err(RosterError::NoMoves { slot });
        }
        if combatant.moves.len() > config.max_moves {
            return Err(RosterError::TooManyMoves {
                slot,
                count: combatant.moves.len(),
                max: config.max_moves,
            });
        }
        if combatant.types.is_empty() || combatant.types.len() > 2 {
            return Err(RosterError::InvalidTyping {
                slot,
                count: combatant.types.len(),
            });
        }
        if combatant.max_hp() == 0 {
            return Err(RosterError::ZeroHp { slot });
        }
    }

    Ok(())
}
