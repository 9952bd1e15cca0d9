use crate::battle::state::CombatantState;
use schema::{Combatant, StatType, StatusCondition};

/// Calculate effective speed including the speed stage and paralysis.
pub fn effective_speed(combatant: &Combatant, state: &CombatantState) -> u32 {
    let mut base_speed = u32::from(combatant.stats.spe);

    // Paralysis halves speed before the stage applies
    if state.status == Some(StatusCondition::Paralysis) {
        base_speed /= 2;
    }

    apply_stat_stage_multiplier(base_speed, state.get_stat_stage(StatType::Spe))
}

/// Apply stat stage multipliers according to the staged formula.
/// Stages range from -6 to +6
/// Negative stages: (2 / (2 + |stage|))
/// Positive stages: ((2 + stage) / 2)
/// The result is floored.
pub fn apply_stat_stage_multiplier(base_stat: u32, stage: i8) -> u32 {
    let clamped_stage = stage.clamp(-6, 6);
    let magnitude = u32::from(clamped_stage.unsigned_abs());

    if clamped_stage >= 0 {
        base_stat * (2 + magnitude) / 2
    } else {
        base_stat * 2 / (2 + magnitude)
    }
}
