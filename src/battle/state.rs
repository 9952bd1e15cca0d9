use crate::player::Side;
use schema::{Combatant, StatType, StatusCondition, Weather};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    WaitingForActions,
    TurnInProgress,
    SideAWin,
    SideBWin,
    Draw,
}

impl GameState {
    pub fn is_finished(self) -> bool {
        matches!(self, GameState::SideAWin | GameState::SideBWin | GameState::Draw)
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            GameState::SideAWin => Some(Side::A),
            GameState::SideBWin => Some(Side::B),
            _ => None,
        }
    }

    pub fn won_by(side: Side) -> Self {
        match side {
            Side::A => GameState::SideAWin,
            Side::B => GameState::SideBWin,
        }
    }
}

/// Mutable battle-side view of one roster slot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CombatantState {
    pub current_hp: u16,
    pub max_hp: u16,
    pub status: Option<StatusCondition>,
    // One counter per move slot, never above that move's max PP.
    pub pp_used: Vec<u8>,
    // Stage per stat, -6 to +6. Only Spe is consulted by this core.
    pub stat_stages: BTreeMap<StatType, i8>,
}

impl CombatantState {
    pub fn from_combatant(combatant: &Combatant) -> Self {
        Self {
            current_hp: combatant.max_hp(),
            max_hp: combatant.max_hp(),
            status: combatant.status,
            pp_used: vec![0; combatant.moves.len()],
            stat_stages: BTreeMap::new(),
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Subtract up to `amount` HP. Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    pub fn pp_remaining(&self, move_index: usize, max_pp: u8) -> u8 {
        let used = self.pp_used.get(move_index).copied().unwrap_or(max_pp);
        max_pp.saturating_sub(used)
    }

    /// Spend one PP. Returns false, changing nothing, when none is left.
    pub fn use_pp(&mut self, move_index: usize, max_pp: u8) -> bool {
        if self.pp_remaining(move_index, max_pp) == 0 {
            return false;
        }
        match self.pp_used.get_mut(move_index) {
            Some(used) => {
                *used += 1;
                true
            }
            None => false,
        }
    }

    pub fn get_stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Shift a stat stage, clamped to -6..=6. Returns (old, new).
    pub fn change_stat_stage(&mut self, stat: StatType, delta: i8) -> (i8, i8) {
        let old_stage = self.get_stat_stage(stat);
        let new_stage = old_stage.saturating_add(delta).clamp(-6, 6);
        if new_stage == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, new_stage);
        }
        (old_stage, new_stage)
    }

    /// Forget everything that only lasts while on the field.
    pub fn clear_active_state(&mut self) {
        self.stat_stages.clear();
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleState {
    pub active_index: [usize; 2],
    pub team_state: [Vec<CombatantState>; 2],
    pub weather: Weather,
    pub weather_turns_elapsed: u32,
    pub current_turn_number: u32,
    pub game_state: GameState,
}

impl BattleState {
    pub fn new(roster_a: &[Combatant], roster_b: &[Combatant]) -> Self {
        Self {
            active_index: [0, 0],
            team_state: [
                roster_a.iter().map(CombatantState::from_combatant).collect(),
                roster_b.iter().map(CombatantState::from_combatant).collect(),
            ],
            weather: Weather::Clear,
            weather_turns_elapsed: 0,
            current_turn_number: 1,
            game_state: GameState::WaitingForActions,
        }
    }

    pub fn team(&self, side: Side) -> &[CombatantState] {
        &self.team_state[side.index()]
    }

    pub fn active(&self, side: Side) -> Option<&CombatantState> {
        self.team_state[side.index()].get(self.active_index[side.index()])
    }

    pub fn active_mut(&mut self, side: Side) -> Option<&mut CombatantState> {
        let index = self.active_index[side.index()];
        self.team_state[side.index()].get_mut(index)
    }

    pub fn active_is_fainted(&self, side: Side) -> bool {
        self.active(side).map_or(true, CombatantState::is_fainted)
    }

    pub fn has_living(&self, side: Side) -> bool {
        self.team(side).iter().any(|member| !member.is_fainted())
    }

    /// Lowest roster index that can still fight.
    pub fn first_living(&self, side: Side) -> Option<usize> {
        self.team(side).iter().position(|member| !member.is_fainted())
    }

    pub fn winner(&self) -> Option<Side> {
        self.game_state.winner()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    MoveUsed,
    Damage,
    Faint,
    Switch,
    StatusBlocked,
    WeatherExpired,
    StatusMessage,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFrozen,
    NoPPRemaining,
    PokemonFainted, // The acting combatant is fainted
    NoEnemyPresent, // Damaging move with no living target
    NoUsableCombatant,
    AlreadyActive,
    AlreadyActed,
    InvalidMove,
}

impl ActionFailureReason {
    fn describe(self) -> &'static str {
        match self {
            ActionFailureReason::IsAsleep => "is fast asleep.",
            ActionFailureReason::IsFrozen => "is frozen solid!",
            ActionFailureReason::NoPPRemaining => "has no PP left for that move!",
            ActionFailureReason::PokemonFainted => "has fainted and cannot move!",
            ActionFailureReason::NoEnemyPresent => "has no target. But it failed!",
            ActionFailureReason::NoUsableCombatant => "has no usable combatant to send out!",
            ActionFailureReason::AlreadyActive => "is already in battle!",
            ActionFailureReason::AlreadyActed => "has already acted this turn.",
            ActionFailureReason::InvalidMove => "doesn't know that move!",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum EventPayload {
    Damage {
        amount: u16,
        critical: bool,
        effectiveness: f64,
        remaining_hp: u16,
    },
    Switch {
        from: usize,
        to: usize,
    },
    Blocked {
        reason: ActionFailureReason,
    },
}

/// One entry of the turn log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TurnEvent {
    pub kind: EventKind,
    pub side: Option<Side>,
    pub message: String,
    pub payload: Option<EventPayload>,
}

impl TurnEvent {
    pub fn move_used(side: Side, species: &str, move_name: &str) -> Self {
        Self {
            kind: EventKind::MoveUsed,
            side: Some(side),
            message: format!("{}'s {} used {}!", side, species, move_name),
            payload: None,
        }
    }

    pub fn damage(
        side: Side,
        species: &str,
        amount: u16,
        critical: bool,
        effectiveness: f64,
        remaining_hp: u16,
    ) -> Self {
        let mut message = String::new();
        if critical {
            message.push_str("A critical hit! ");
        }
        if effectiveness == 0.0 {
            message.push_str(&format!("It doesn't affect {}'s {}...", side, species));
        } else {
            if effectiveness > 1.0 {
                message.push_str("It's super effective! ");
            } else if effectiveness < 1.0 {
                message.push_str("It's not very effective... ");
            }
            message.push_str(&format!("{}'s {} took {} damage!", side, species, amount));
        }
        Self {
            kind: EventKind::Damage,
            side: Some(side),
            message,
            payload: Some(EventPayload::Damage {
                amount,
                critical,
                effectiveness,
                remaining_hp,
            }),
        }
    }

    pub fn residual_damage(side: Side, species: &str, status: StatusCondition, amount: u16, remaining_hp: u16) -> Self {
        let cause = match status {
            StatusCondition::Burn => "its burn",
            _ => "poison",
        };
        Self {
            kind: EventKind::Damage,
            side: Some(side),
            message: format!("{}'s {} was hurt by {}!", side, species, cause),
            payload: Some(EventPayload::Damage {
                amount,
                critical: false,
                effectiveness: 1.0,
                remaining_hp,
            }),
        }
    }

    pub fn fainted(side: Side, species: &str) -> Self {
        Self {
            kind: EventKind::Faint,
            side: Some(side),
            message: format!("{}'s {} fainted!", side, species),
            payload: None,
        }
    }

    pub fn switched(side: Side, from: usize, to: usize, old_species: &str, new_species: &str) -> Self {
        Self {
            kind: EventKind::Switch,
            side: Some(side),
            message: format!("{} withdrew {} and sent out {}!", side, old_species, new_species),
            payload: Some(EventPayload::Switch { from, to }),
        }
    }

    pub fn blocked(side: Side, subject: &str, reason: ActionFailureReason) -> Self {
        Self {
            kind: EventKind::StatusBlocked,
            side: Some(side),
            message: format!("{}'s {} {}", side, subject, reason.describe()),
            payload: Some(EventPayload::Blocked { reason }),
        }
    }

    pub fn weather_expired(weather: Weather) -> Self {
        Self {
            kind: EventKind::WeatherExpired,
            side: None,
            message: format!("The {} subsided.", weather),
            payload: None,
        }
    }

    pub fn message(side: Option<Side>, message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::StatusMessage,
            side,
            message: message.into(),
            payload: None,
        }
    }

    pub fn damage_amount(&self) -> Option<u16> {
        match self.payload {
            Some(EventPayload::Damage { amount, .. }) => Some(amount),
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<ActionFailureReason> {
        match self.payload {
            Some(EventPayload::Blocked { reason }) => Some(reason),
            _ => None,
        }
    }
}

/// Event bus for collecting the ordered events of one turn.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<TurnEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: TurnEvent) {
        tracing::debug!(kind = ?event.kind, side = ?event.side, "{}", event.message);
        self.events.push(event);
    }

    pub fn events(&self) -> &[TurnEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TurnEvent> {
        self.events
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {}", event.message)?;
        }
        Ok(())
    }
}

/// The auditable log of one resolved turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub turn_number: u32,
    pub events: Vec<TurnEvent>,
}

impl TurnResult {
    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &TurnEvent> {
        self.events.iter().filter(move |event| event.kind == kind)
    }

    pub fn has_event(&self, kind: EventKind) -> bool {
        self.events_of(kind).next().is_some()
    }
}

/// Everything `resolve_turn` hands back: the next state, the log and the winner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub state: BattleState,
    pub result: TurnResult,
    pub winner: Option<Side>,
}

impl TurnOutcome {
    pub fn is_draw(&self) -> bool {
        self.state.game_state == GameState::Draw
    }

    pub fn is_finished(&self) -> bool {
        self.state.game_state.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state_with_hp(max_hp: u16) -> CombatantState {
        CombatantState {
            current_hp: max_hp,
            max_hp,
            status: None,
            pp_used: vec![0, 0],
            stat_stages: BTreeMap::new(),
        }
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut state = state_with_hp(20);
        assert_eq!(state.take_damage(5), 5);
        assert_eq!(state.current_hp, 15);
        assert_eq!(state.take_damage(40), 15);
        assert_eq!(state.current_hp, 0);
        assert!(state.is_fainted());
    }

    #[test]
    fn test_pp_never_exceeds_max() {
        let mut state = state_with_hp(20);
        assert!(state.use_pp(0, 2));
        assert!(state.use_pp(0, 2));
        assert!(!state.use_pp(0, 2));
        assert_eq!(state.pp_used[0], 2);
        assert_eq!(state.pp_remaining(0, 2), 0);
    }

    #[test]
    fn test_pp_for_unknown_slot_is_unusable() {
        let mut state = state_with_hp(20);
        assert_eq!(state.pp_remaining(7, 10), 0);
        assert!(!state.use_pp(7, 10));
    }

    #[test]
    fn test_stat_stage_clamps() {
        let mut state = state_with_hp(20);
        assert_eq!(state.change_stat_stage(StatType::Spe, 4), (0, 4));
        assert_eq!(state.change_stat_stage(StatType::Spe, 4), (4, 6));
        assert_eq!(state.change_stat_stage(StatType::Spe, -13), (6, -6));
        state.clear_active_state();
        assert_eq!(state.get_stat_stage(StatType::Spe), 0);
    }

    #[test]
    fn test_game_state_winner() {
        assert_eq!(GameState::SideAWin.winner(), Some(Side::A));
        assert_eq!(GameState::Draw.winner(), None);
        assert!(GameState::Draw.is_finished());
        assert!(!GameState::WaitingForActions.is_finished());
        assert_eq!(GameState::won_by(Side::B), GameState::SideBWin);
    }

    #[test]
    fn test_damage_event_text() {
        let event = TurnEvent::damage(Side::B, "Squirtle", 12, true, 2.0, 30);
        assert_eq!(
            event.message,
            "A critical hit! It's super effective! Side B's Squirtle took 12 damage!"
        );
        assert_eq!(event.damage_amount(), Some(12));

        let immune = TurnEvent::damage(Side::A, "Gastly", 0, false, 0.0, 30);
        assert_eq!(immune.message, "It doesn't affect Side A's Gastly...");
    }

    #[test]
    fn test_event_bus_display() {
        let mut bus = EventBus::new();
        bus.push(TurnEvent::fainted(Side::A, "Pikachu"));
        bus.push(TurnEvent::weather_expired(Weather::Rain));
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.to_string(), "  Side A's Pikachu fainted!\n  The rain subsided.\n");
    }
}
