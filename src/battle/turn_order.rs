use crate::battle::rng::RandomSource;
use crate::battle::state::BattleState;
use crate::battle::stats::effective_speed;
use crate::player::{PlayerAction, Side};
use schema::Combatant;
use std::cmp::Ordering;

/// Sort key for one side's action. Fields compare in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActionPriority {
    pub action_priority: i8, // Forfeit: 2, Switch: 1, Move: 0
    pub move_priority: i8,   // Only relevant for moves
    pub speed: u32,          // Effective speed, only relevant for moves
}

pub fn calculate_action_priority(
    side: Side,
    action: &PlayerAction,
    battle_state: &BattleState,
    roster: &[Combatant],
) -> ActionPriority {
    match action {
        PlayerAction::Forfeit => ActionPriority {
            action_priority: 2,
            move_priority: 0,
            speed: 0,
        },
        PlayerAction::SwitchPokemon { .. } => ActionPriority {
            action_priority: 1,
            move_priority: 0,
            speed: 0,
        },
        PlayerAction::UseMove { move_index } => {
            let active_index = battle_state.active_index[side.index()];
            let combatant = roster.get(active_index);
            let move_priority = combatant
                .and_then(|combatant| combatant.moves.get(*move_index))
                .map_or(0, |move_data| move_data.priority);
            let speed = match (combatant, battle_state.active(side)) {
                (Some(combatant), Some(state)) => effective_speed(combatant, state),
                _ => 0,
            };

            ActionPriority {
                action_priority: 0,
                move_priority,
                speed,
            }
        }
    }
}

/// Order both sides' actions for this turn, first actor first.
///
/// Recomputed every turn from the current state. Exact ties are settled
/// by a coin flip from `rng`: 0 puts side A first.
pub fn determine_action_order<R: RandomSource + ?Sized>(
    battle_state: &BattleState,
    rosters: [&[Combatant]; 2],
    actions: &[PlayerAction; 2],
    rng: &mut R,
) -> [Side; 2] {
    let priority_a = calculate_action_priority(Side::A, &actions[0], battle_state, rosters[0]);
    let priority_b = calculate_action_priority(Side::B, &actions[1], battle_state, rosters[1]);

    let order = match priority_a.cmp(&priority_b) {
        Ordering::Greater => [Side::A, Side::B],
        Ordering::Less => [Side::B, Side::A],
        Ordering::Equal => {
            if rng.roll("Speed Tie", 2) == 0 {
                [Side::A, Side::B]
            } else {
                [Side::B, Side::A]
            }
        }
    };

    tracing::debug!(?priority_a, ?priority_b, first = %order[0], "action order decided");
    order
}
