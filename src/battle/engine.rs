use crate::battle::calculators::{compute_damage, BattlerRef};
use crate::battle::rng::RandomSource;
use crate::battle::state::{
    ActionFailureReason, BattleState, EventBus, GameState, TurnEvent, TurnOutcome, TurnResult,
};
use crate::battle::turn_order::determine_action_order;
use crate::config::EngineConfig;
use crate::player::{PlayerAction, Side};
use schema::{Combatant, MoveData, MoveEffect, StatType, StatusCondition, Target, Weather};

/// Resolve one turn with the default ruleset.
///
/// Pure with respect to its inputs: `battle_state` is cloned, never aliased,
/// and the rosters are only read. All randomness comes from `rng`.
pub fn resolve_turn<R: RandomSource + ?Sized>(
    battle_state: &BattleState,
    roster_a: &[Combatant],
    roster_b: &[Combatant],
    action_a: PlayerAction,
    action_b: PlayerAction,
    turn_number: u32,
    rng: &mut R,
) -> TurnOutcome {
    let config = EngineConfig::default();
    TurnResolver::new(&config).resolve(
        battle_state,
        [roster_a, roster_b],
        [action_a, action_b],
        turn_number,
        rng,
    )
}

/// Turn resolution bound to a specific configuration.
#[derive(Debug, Clone, Copy)]
pub struct TurnResolver<'c> {
    config: &'c EngineConfig,
}

impl<'c> TurnResolver<'c> {
    pub fn new(config: &'c EngineConfig) -> Self {
        Self { config }
    }

    pub fn resolve<R: RandomSource + ?Sized>(
        &self,
        battle_state: &BattleState,
        rosters: [&[Combatant]; 2],
        actions: [PlayerAction; 2],
        turn_number: u32,
        rng: &mut R,
    ) -> TurnOutcome {
        if battle_state.game_state.is_finished() {
            tracing::warn!(turn_number, game_state = ?battle_state.game_state, "turn submitted for a finished battle");
            let mut bus = EventBus::new();
            bus.push(TurnEvent::message(None, "The battle is already over."));
            return TurnOutcome {
                state: battle_state.clone(),
                result: TurnResult {
                    turn_number,
                    events: bus.into_events(),
                },
                winner: battle_state.winner(),
            };
        }

        // 1. Initialization
        let mut turn = TurnExecution {
            config: self.config,
            rosters,
            state: battle_state.clone(),
            bus: EventBus::new(),
            rng,
            acted: [false, false],
            forfeited: None,
        };
        turn.state.game_state = GameState::TurnInProgress;

        // 2. Ordering
        let order = determine_action_order(&turn.state, rosters, &actions, &mut *turn.rng);

        // 3. Execute actions in order, stopping at a forfeit
        for side in order {
            turn.execute_action(side, &actions[side.index()]);
            if turn.forfeited.is_some() {
                break;
            }
        }

        // 4. End-of-turn phase
        if turn.forfeited.is_none() && self.config.residual_status_damage {
            turn.apply_residual_damage();
        }
        turn.auto_switch_fainted();
        turn.weather_upkeep();

        // 5. Terminal check and finalization
        turn.finalize(turn_number)
    }
}

/// Actions that are currently meaningful for a side. Moves without PP and
/// fainted or active switch targets are left out; Forfeit is always offered.
pub fn get_valid_actions(state: &BattleState, roster: &[Combatant], side: Side) -> Vec<PlayerAction> {
    let mut actions = Vec::new();
    let active_index = state.active_index[side.index()];

    if let (Some(combatant), Some(active)) = (roster.get(active_index), state.active(side)) {
        if !active.is_fainted() {
            for (move_index, move_data) in combatant.moves.iter().enumerate() {
                if active.pp_remaining(move_index, move_data.max_pp) > 0 {
                    actions.push(PlayerAction::UseMove { move_index });
                }
            }
        }
    }

    for (team_index, member) in state.team(side).iter().enumerate() {
        if team_index != active_index && !member.is_fainted() {
            actions.push(PlayerAction::SwitchPokemon { team_index });
        }
    }

    actions.push(PlayerAction::Forfeit);
    actions
}

struct TurnExecution<'a, R: RandomSource + ?Sized> {
    config: &'a EngineConfig,
    rosters: [&'a [Combatant]; 2],
    state: BattleState,
    bus: EventBus,
    rng: &'a mut R,
    acted: [bool; 2],
    forfeited: Option<Side>,
}

impl<'a, R: RandomSource + ?Sized> TurnExecution<'a, R> {
    fn combatant(&self, side: Side, index: usize) -> Option<&'a Combatant> {
        let roster: &'a [Combatant] = self.rosters[side.index()];
        roster.get(index)
    }

    fn active_combatant(&self, side: Side) -> Option<&'a Combatant> {
        self.combatant(side, self.state.active_index[side.index()])
    }

    fn active_species(&self, side: Side) -> &'a str {
        self.active_combatant(side)
            .map_or("(empty slot)", |combatant| combatant.species.as_str())
    }

    fn execute_action(&mut self, side: Side, action: &PlayerAction) {
        if self.acted[side.index()] {
            let species = self.active_species(side);
            self.bus
                .push(TurnEvent::blocked(side, species, ActionFailureReason::AlreadyActed));
            return;
        }
        self.acted[side.index()] = true;

        tracing::debug!(%side, %action, "executing action");
        match action {
            PlayerAction::Forfeit => self.execute_forfeit(side),
            PlayerAction::SwitchPokemon { team_index } => self.execute_switch(side, *team_index),
            PlayerAction::UseMove { move_index } => self.execute_move(side, *move_index),
        }
    }

    /// Forfeit action - the side loses immediately
    fn execute_forfeit(&mut self, side: Side) {
        self.forfeited = Some(side);
        self.bus
            .push(TurnEvent::message(Some(side), format!("{} forfeited the battle!", side)));
    }

    fn execute_switch(&mut self, side: Side, target_index: usize) {
        let species = self.active_species(side);
        let target_usable = self
            .state
            .team(side)
            .get(target_index)
            .is_some_and(|member| !member.is_fainted());

        if !target_usable {
            self.bus.push(TurnEvent::blocked(
                side,
                species,
                ActionFailureReason::NoUsableCombatant,
            ));
            return;
        }

        if target_index == self.state.active_index[side.index()] {
            self.bus
                .push(TurnEvent::blocked(side, species, ActionFailureReason::AlreadyActive));
            return;
        }

        self.switch_active(side, target_index);
    }

    /// Bring `target_index` onto the field. The outgoing combatant loses its stat stages.
    fn switch_active(&mut self, side: Side, target_index: usize) {
        let old_index = self.state.active_index[side.index()];
        let old_species = self.active_species(side);
        let new_species = self
            .combatant(side, target_index)
            .map_or("(empty slot)", |combatant| combatant.species.as_str());

        if let Some(outgoing) = self.state.active_mut(side) {
            outgoing.clear_active_state();
        }
        self.state.active_index[side.index()] = target_index;

        self.bus.push(TurnEvent::switched(
            side,
            old_index,
            target_index,
            old_species,
            new_species,
        ));
    }

    fn execute_move(&mut self, side: Side, move_index: usize) {
        let species = self.active_species(side);

        // Fainted combatants may only switch or forfeit.
        if self.state.active_is_fainted(side) {
            self.bus
                .push(TurnEvent::blocked(side, species, ActionFailureReason::PokemonFainted));
            return;
        }

        let Some(move_data) = self
            .active_combatant(side)
            .and_then(|combatant| combatant.moves.get(move_index))
        else {
            self.bus
                .push(TurnEvent::blocked(side, species, ActionFailureReason::InvalidMove));
            return;
        };

        let pp_remaining = self
            .state
            .active(side)
            .map_or(0, |active| active.pp_remaining(move_index, move_data.max_pp));
        if pp_remaining == 0 {
            self.bus
                .push(TurnEvent::blocked(side, species, ActionFailureReason::NoPPRemaining));
            return;
        }

        if !self.check_status_allows_action(side) {
            return;
        }

        if move_data.is_damaging() && self.state.active_is_fainted(side.opponent()) {
            self.bus
                .push(TurnEvent::blocked(side, species, ActionFailureReason::NoEnemyPresent));
            return;
        }

        if let Some(active) = self.state.active_mut(side) {
            active.use_pp(move_index, move_data.max_pp);
        }
        self.bus
            .push(TurnEvent::move_used(side, species, &move_data.name));

        let dealt = if move_data.is_damaging() {
            self.execute_damage(side, move_data)
        } else {
            0
        };

        if let Some(effect) = &move_data.effect {
            self.apply_move_effect(side, move_data, effect, dealt);
        }
    }

    /// Sleep and freeze checks. Returns false when the combatant cannot act;
    /// the blocking event has already been emitted in that case.
    fn check_status_allows_action(&mut self, side: Side) -> bool {
        let species = self.active_species(side);
        let status = self.state.active(side).and_then(|active| active.status);

        let (recovered, failure, recovery_text) = match status {
            Some(StatusCondition::Sleep) => (
                self.rng
                    .chance("Wake Up Check", self.config.wake_chance_percent),
                ActionFailureReason::IsAsleep,
                "woke up!",
            ),
            Some(StatusCondition::Freeze) => (
                self.rng
                    .chance("Defrost Check", self.config.thaw_chance_percent),
                ActionFailureReason::IsFrozen,
                "thawed out!",
            ),
            _ => return true,
        };

        if !recovered {
            self.bus.push(TurnEvent::blocked(side, species, failure));
            return false;
        }

        if let Some(active) = self.state.active_mut(side) {
            active.status = None;
        }
        self.bus.push(TurnEvent::message(
            Some(side),
            format!("{}'s {} {}", side, species, recovery_text),
        ));
        true
    }

    /// Apply one damaging hit to the opposing active combatant. Returns HP removed.
    fn execute_damage(&mut self, side: Side, move_data: &MoveData) -> u16 {
        let defender_side = side.opponent();
        let (Some(attacker), Some(defender)) = (
            self.active_combatant(side),
            self.active_combatant(defender_side),
        ) else {
            return 0;
        };

        let outcome = {
            let (Some(attacker_state), Some(defender_state)) =
                (self.state.active(side), self.state.active(defender_side))
            else {
                return 0;
            };
            compute_damage(
                BattlerRef::new(attacker, attacker_state),
                BattlerRef::new(defender, defender_state),
                move_data,
                self.state.weather,
                self.config,
                &mut *self.rng,
            )
        };

        let Some(defender_state) = self.state.active_mut(defender_side) else {
            return 0;
        };
        let dealt = defender_state.take_damage(outcome.damage);
        let remaining_hp = defender_state.current_hp;

        self.bus.push(TurnEvent::damage(
            defender_side,
            &defender.species,
            dealt,
            outcome.is_critical,
            outcome.effectiveness,
            remaining_hp,
        ));
        if remaining_hp == 0 {
            self.bus
                .push(TurnEvent::fainted(defender_side, &defender.species));
        }
        dealt
    }

    fn apply_move_effect(&mut self, side: Side, move_data: &MoveData, effect: &MoveEffect, dealt: u16) {
        match effect {
            MoveEffect::Inflict { status, chance } => {
                self.apply_inflict(side, move_data, *status, *chance, dealt)
            }
            MoveEffect::SetWeather(weather) => self.apply_weather(side, *weather),
            MoveEffect::SpeedStage { target, stages } => {
                let target_side = match target {
                    Target::User => side,
                    Target::Target => side.opponent(),
                };
                self.apply_speed_stage(target_side, *stages);
            }
        }
    }

    fn apply_inflict(&mut self, side: Side, move_data: &MoveData, status: StatusCondition, chance: u8, dealt: u16) {
        let target_side = side.opponent();
        let species = self.active_species(target_side);

        // Secondary effects of attacks ride on a hit that landed.
        if move_data.is_damaging() && dealt == 0 {
            return;
        }

        let Some(target) = self.state.active(target_side) else {
            return;
        };
        if target.is_fainted() {
            return;
        }
        if let Some(existing) = target.status {
            if !move_data.is_damaging() {
                self.bus.push(TurnEvent::message(
                    Some(target_side),
                    format!("{}'s {} is already {}!", target_side, species, existing),
                ));
            }
            return;
        }

        if !self.rng.chance("Secondary Effect Chance", chance) {
            return;
        }

        if let Some(target) = self.state.active_mut(target_side) {
            target.status = Some(status);
        }
        self.bus.push(TurnEvent::message(
            Some(target_side),
            format!("{}'s {} {}", target_side, species, status_applied_text(status)),
        ));
    }

    fn apply_weather(&mut self, side: Side, weather: Weather) {
        self.state.weather = weather;
        self.state.weather_turns_elapsed = 0;
        let text = match weather {
            Weather::Clear => "The skies cleared.",
            Weather::Sun => "The sunlight turned harsh!",
            Weather::Rain => "It started to rain!",
            Weather::Sandstorm => "A sandstorm kicked up!",
            Weather::Hail => "It started to hail!",
        };
        self.bus.push(TurnEvent::message(Some(side), text));
    }

    fn apply_speed_stage(&mut self, target_side: Side, stages: i8) {
        let species = self.active_species(target_side);
        let Some(target) = self.state.active_mut(target_side) else {
            return;
        };
        if target.is_fainted() {
            return;
        }

        let (old_stage, new_stage) = target.change_stat_stage(StatType::Spe, stages);
        let text = match (new_stage - old_stage, stages.signum()) {
            (0, 1) => "speed won't go any higher!".to_string(),
            (0, _) => "speed won't go any lower!".to_string(),
            (delta, _) if delta >= 2 => "speed rose sharply!".to_string(),
            (delta, _) if delta > 0 => "speed rose!".to_string(),
            (delta, _) if delta <= -2 => "speed harshly fell!".to_string(),
            _ => "speed fell!".to_string(),
        };
        self.bus.push(TurnEvent::message(
            Some(target_side),
            format!("{}'s {} {}", target_side, species, text),
        ));
    }

    /// Burn and poison chip damage for living active combatants.
    fn apply_residual_damage(&mut self) {
        for side in Side::BOTH {
            let species = self.active_species(side);
            let Some(active) = self.state.active_mut(side) else {
                continue;
            };
            if active.is_fainted() {
                continue;
            }
            let (status, amount) = match active.status {
                Some(StatusCondition::Burn) => (StatusCondition::Burn, (active.max_hp / 16).max(1)),
                Some(StatusCondition::Poison) => (StatusCondition::Poison, (active.max_hp / 8).max(1)),
                _ => continue,
            };
            let dealt = active.take_damage(amount);
            let remaining_hp = active.current_hp;

            self.bus.push(TurnEvent::residual_damage(
                side,
                species,
                status,
                dealt,
                remaining_hp,
            ));
            if remaining_hp == 0 {
                self.bus.push(TurnEvent::fainted(side, species));
            }
        }
    }

    /// Replace fainted active combatants with the lowest-index living member.
    fn auto_switch_fainted(&mut self) {
        for side in Side::BOTH {
            if !self.state.active_is_fainted(side) {
                continue;
            }
            if let Some(replacement) = self.state.first_living(side) {
                self.switch_active(side, replacement);
            }
        }
    }

    fn weather_upkeep(&mut self) {
        if self.state.weather == Weather::Clear {
            return;
        }
        self.state.weather_turns_elapsed += 1;
        if self.state.weather_turns_elapsed > self.config.weather_duration {
            let expired = self.state.weather;
            self.state.weather = Weather::Clear;
            self.state.weather_turns_elapsed = 0;
            self.bus.push(TurnEvent::weather_expired(expired));
        }
    }

    fn finalize(mut self, turn_number: u32) -> TurnOutcome {
        let game_state = match self.forfeited {
            Some(side) => GameState::won_by(side.opponent()),
            None => match (self.state.has_living(Side::A), self.state.has_living(Side::B)) {
                (false, false) => GameState::Draw,
                (false, true) => GameState::SideBWin,
                (true, false) => GameState::SideAWin,
                (true, true) => GameState::WaitingForActions,
            },
        };

        match game_state {
            GameState::Draw => self
                .bus
                .push(TurnEvent::message(None, "Both sides are out of usable combatants. It's a draw!")),
            GameState::SideAWin | GameState::SideBWin => {
                if let Some(winner) = game_state.winner() {
                    self.bus
                        .push(TurnEvent::message(Some(winner), format!("{} won the battle!", winner)));
                }
            }
            _ => {}
        }

        self.state.game_state = game_state;
        self.state.current_turn_number = turn_number.saturating_add(1);

        tracing::info!(
            turn_number,
            ?game_state,
            events = self.bus.len(),
            "turn resolved"
        );

        TurnOutcome {
            state: self.state,
            result: TurnResult {
                turn_number,
                events: self.bus.into_events(),
            },
            winner: game_state.winner(),
        }
    }
}

fn status_applied_text(status: StatusCondition) -> &'static str {
    match status {
        StatusCondition::Burn => "was burned!",
        StatusCondition::Paralysis => "is paralyzed! It may be slow to move!",
        StatusCondition::Sleep => "fell asleep!",
        StatusCondition::Poison => "was poisoned!",
        StatusCondition::Freeze => "was frozen solid!",
    }
}
