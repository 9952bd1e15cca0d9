//! Concurrency-safe entry point layered over the turn resolver.
//!
//! Each battle lives behind its own async mutex, so submissions for
//! different battles never contend. The first accepted action of a round
//! is buffered together with a oneshot sender; the second triggers
//! resolution and both callers receive the same [`TurnRecord`].

use crate::battle::engine::{get_valid_actions, TurnResolver};
use crate::battle::rng::{RandomSource, TurnRng};
use crate::battle::state::{BattleState, TurnOutcome};
use crate::config::EngineConfig;
use crate::errors::{Result, SessionError};
use crate::player::{ParticipantId, PlayerAction, Side};
use crate::roster::{validate_roster, RosterProvider};
use crate::sink::{TurnRecord, TurnSink};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use schema::Combatant;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};


/// Outcome of an accepted submission.
#[derive(Debug)]
pub enum Submission {
    /// First action of the round; the turn resolves when the opponent submits.
    Waiting(PendingTurn),
    /// Second action of the round; the turn has been resolved.
    Resolved(Arc<TurnRecord>),
}

impl Submission {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Submission::Resolved(_))
    }

    /// Wait for the round to resolve if it has not already.
    pub async fn into_record(self) -> Result<Arc<TurnRecord>> {
        match self {
            Submission::Waiting(pending) => pending.wait().await,
            Submission::Resolved(record) => Ok(record),
        }
    }
}

/// Handle held by the first submitter of a round.
#[derive(Debug)]
pub struct PendingTurn {
    battle_id: String,
    receiver: oneshot::Receiver<Arc<TurnRecord>>,
}

impl PendingTurn {
    pub async fn wait(self) -> Result<Arc<TurnRecord>> {
        self.receiver
            .await
            .map_err(|_| SessionError::SessionClosed(self.battle_id))
    }
}

struct PendingSubmission {
    action: PlayerAction,
    waiter: Option<oneshot::Sender<Arc<TurnRecord>>>,
}

struct Session {
    battle_id: String,
    participants: [ParticipantId; 2],
    rosters: [Vec<Combatant>; 2],
    state: BattleState,
    pending: [Option<PendingSubmission>; 2],
    rng: Box<dyn RandomSource + Send>,
    history: Vec<Arc<TurnRecord>>,
}

impl Session {
    fn side_of(&self, participant: &ParticipantId) -> Result<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| &self.participants[side.index()] == participant)
            .ok_or_else(|| SessionError::NotAParticipant {
                battle_id: self.battle_id.clone(),
                participant: participant.clone(),
            })
    }

    /// Index checks against the submitter's own roster. Whether the action
    /// can actually be carried out is decided during resolution.
    fn validate_action(&self, side: Side, action: &PlayerAction) -> Result<()> {
        let roster = &self.rosters[side.index()];
        match action {
            PlayerAction::UseMove { move_index } => {
                let available = roster
                    .get(self.state.active_index[side.index()])
                    .map_or(0, |combatant| combatant.moves.len());
                if *move_index >= available {
                    return Err(SessionError::InvalidMoveIndex {
                        index: *move_index,
                        available,
                    });
                }
            }
            PlayerAction::SwitchPokemon { team_index } => {
                if *team_index >= roster.len() {
                    return Err(SessionError::InvalidSwitchIndex {
                        index: *team_index,
                        roster_size: roster.len(),
                    });
                }
            }
            PlayerAction::Forfeit => {}
        }
        Ok(())
    }

    fn resolve_round(&mut self, actions: [PlayerAction; 2], config: &EngineConfig) -> Arc<TurnRecord> {
        let turn_number = self.state.current_turn_number;
        let TurnOutcome { state, result, winner } = TurnResolver::new(config).resolve(
            &self.state,
            [self.rosters[0].as_slice(), self.rosters[1].as_slice()],
            actions,
            turn_number,
            self.rng.as_mut(),
        );

        self.state = state.clone();
        let record = Arc::new(TurnRecord {
            battle_id: self.battle_id.clone(),
            state,
            result,
            winner,
        });
        self.history.push(Arc::clone(&record));
        record
    }
}

/// Registry of live battles and the single authority over their state.
pub struct SessionCoordinator {
    battles: DashMap<String, Arc<Mutex<Session>>>,
    rosters: Arc<dyn RosterProvider>,
    sink: Arc<dyn TurnSink>,
    config: EngineConfig,
}

impl SessionCoordinator {
    pub fn new(rosters: Arc<dyn RosterProvider>, sink: Arc<dyn TurnSink>) -> Self {
        Self::with_config(rosters, sink, EngineConfig::default())
    }

    pub fn with_config(rosters: Arc<dyn RosterProvider>, sink: Arc<dyn TurnSink>, config: EngineConfig) -> Self {
        Self {
            battles: DashMap::new(),
            rosters,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a battle with an OS-seeded random source.
    pub fn create_battle(
        &self,
        battle_id: impl Into<String>,
        participant_a: ParticipantId,
        participant_b: ParticipantId,
    ) -> Result<BattleState> {
        self.create_battle_with_rng(
            battle_id,
            participant_a,
            participant_b,
            Box::new(TurnRng::new_random()),
        )
    }

    /// Start a battle whose every draw comes from `rng`.
    pub fn create_battle_with_rng(
        &self,
        battle_id: impl Into<String>,
        participant_a: ParticipantId,
        participant_b: ParticipantId,
        rng: Box<dyn RandomSource + Send>,
    ) -> Result<BattleState> {
        let battle_id = battle_id.into();
        if participant_a == participant_b {
            return Err(SessionError::DuplicateParticipant(participant_a));
        }

        let roster_a = self.rosters.roster(&participant_a)?;
        validate_roster(&roster_a, &self.config)?;
        let roster_b = self.rosters.roster(&participant_b)?;
        validate_roster(&roster_b, &self.config)?;

        let state = BattleState::new(&roster_a, &roster_b);

        match self.battles.entry(battle_id.clone()) {
            Entry::Occupied(_) => {
                warn!(battle_id = %battle_id, "battle id already in use");
                Err(SessionError::BattleExists(battle_id))
            }
            Entry::Vacant(slot) => {
                info!(
                    battle_id = %battle_id,
                    side_a = %participant_a,
                    side_b = %participant_b,
                    "battle created"
                );
                slot.insert(Arc::new(Mutex::new(Session {
                    battle_id: battle_id.clone(),
                    participants: [participant_a, participant_b],
                    rosters: [roster_a, roster_b],
                    state: state.clone(),
                    pending: [None, None],
                    rng,
                    history: Vec::new(),
                })));
                Ok(state)
            }
        }
    }

    fn session(&self, battle_id: &str) -> Result<Arc<Mutex<Session>>> {
        self.battles
            .get(battle_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SessionError::UnknownBattle(battle_id.to_string()))
    }

    /// Buffer `action` for the current round, resolving the turn when it
    /// is the second one. Rejections leave the battle untouched.
    pub async fn submit_action(
        &self,
        battle_id: &str,
        participant: &ParticipantId,
        action: PlayerAction,
    ) -> Result<Submission> {
        self.submit(battle_id, participant, None, action).await
    }

    /// Like [`submit_action`](Self::submit_action), but rejects the action
    /// unless the battle is still on `turn_number`.
    pub async fn submit_action_for_turn(
        &self,
        battle_id: &str,
        participant: &ParticipantId,
        turn_number: u32,
        action: PlayerAction,
    ) -> Result<Submission> {
        self.submit(battle_id, participant, Some(turn_number), action)
            .await
    }

    /// Submit and block until the round has resolved.
    pub async fn submit_and_wait(
        &self,
        battle_id: &str,
        participant: &ParticipantId,
        action: PlayerAction,
    ) -> Result<Arc<TurnRecord>> {
        self.submit_action(battle_id, participant, action)
            .await?
            .into_record()
            .await
    }

    async fn submit(
        &self,
        battle_id: &str,
        participant: &ParticipantId,
        turn_number: Option<u32>,
        action: PlayerAction,
    ) -> Result<Submission> {
        let handle = self.session(battle_id)?;
        let mut session = handle.lock().await;

        let side = match Self::check_submission(&session, participant, turn_number, &action) {
            Ok(side) => side,
            Err(error) => {
                warn!(battle_id, %participant, %action, %error, "submission rejected");
                return Err(error);
            }
        };

        let opponent = side.opponent();
        let Some(first) = session.pending[opponent.index()].take() else {
            let (sender, receiver) = oneshot::channel();
            session.pending[side.index()] = Some(PendingSubmission {
                action,
                waiter: Some(sender),
            });
            debug!(battle_id, %side, "action buffered, waiting for opponent");
            return Ok(Submission::Waiting(PendingTurn {
                battle_id: battle_id.to_string(),
                receiver,
            }));
        };

        let actions = match side {
            Side::A => [action, first.action],
            Side::B => [first.action, action],
        };
        let record = session.resolve_round(actions, &self.config);

        if let Err(error) = self.sink.publish(&record) {
            warn!(battle_id, %error, "turn sink failed to publish record");
        }
        if let Some(winner) = record.winner {
            info!(battle_id, %winner, "battle finished");
        } else if record.state.game_state.is_finished() {
            info!(battle_id, "battle finished in a draw");
        }

        if let Some(waiter) = first.waiter {
            if waiter.send(Arc::clone(&record)).is_err() {
                debug!(battle_id, "first submitter stopped waiting");
            }
        }

        Ok(Submission::Resolved(record))
    }

    fn check_submission(
        session: &Session,
        participant: &ParticipantId,
        turn_number: Option<u32>,
        action: &PlayerAction,
    ) -> Result<Side> {
        if session.state.game_state.is_finished() {
            return Err(SessionError::BattleNotActive(session.battle_id.clone()));
        }
        let side = session.side_of(participant)?;
        if let Some(provided) = turn_number {
            let expected = session.state.current_turn_number;
            if provided != expected {
                return Err(SessionError::StaleTurn { expected, provided });
            }
        }
        if session.pending[side.index()].is_some() {
            return Err(SessionError::AlreadySubmitted(participant.clone()));
        }
        session.validate_action(side, action)?;
        Ok(side)
    }

    pub async fn snapshot(&self, battle_id: &str) -> Result<BattleState> {
        let handle = self.session(battle_id)?;
        let session = handle.lock().await;
        Ok(session.state.clone())
    }

    /// Participants whose action for the current round is buffered.
    pub async fn pending_participants(&self, battle_id: &str) -> Result<Vec<ParticipantId>> {
        let handle = self.session(battle_id)?;
        let session = handle.lock().await;
        Ok(Side::BOTH
            .into_iter()
            .filter(|side| session.pending[side.index()].is_some())
            .map(|side| session.participants[side.index()].clone())
            .collect())
    }

    pub async fn turn_history(&self, battle_id: &str) -> Result<Vec<Arc<TurnRecord>>> {
        let handle = self.session(battle_id)?;
        let session = handle.lock().await;
        Ok(session.history.clone())
    }

    /// Actions `participant` can meaningfully choose this round.
    pub async fn valid_actions(&self, battle_id: &str, participant: &ParticipantId) -> Result<Vec<PlayerAction>> {
        let handle = self.session(battle_id)?;
        let session = handle.lock().await;
        if session.state.game_state.is_finished() {
            return Ok(Vec::new());
        }
        let side = session.side_of(participant)?;
        Ok(get_valid_actions(
            &session.state,
            &session.rosters[side.index()],
            side,
        ))
    }

    pub fn battle_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.battles.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Drop a battle. Anyone still waiting on its round gets `SessionClosed`.
    pub async fn close_battle(&self, battle_id: &str) -> Result<()> {
        let (_, handle) = self
            .battles
            .remove(battle_id)
            .ok_or_else(|| SessionError::UnknownBattle(battle_id.to_string()))?;

        let mut session = handle.lock().await;
        session.pending = [None, None];
        info!(battle_id, turns = session.history.len(), "battle closed");
        Ok(())
    }
}
