use crate::battle::rng::RandomSource;
use crate::battle::state::CombatantState;
use crate::config::EngineConfig;
use schema::{effectiveness, Combatant, MoveCategory, MoveData, PokemonType, StatusCondition, Weather};
use serde::{Deserialize, Serialize};

/// A roster entry together with its in-battle state.
#[derive(Debug, Clone, Copy)]
pub struct BattlerRef<'a> {
    pub combatant: &'a Combatant,
    pub state: &'a CombatantState,
}

impl<'a> BattlerRef<'a> {
    pub fn new(combatant: &'a Combatant, state: &'a CombatantState) -> Self {
        Self { combatant, state }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    pub is_critical: bool,
    pub effectiveness: f64,
}

impl DamageOutcome {
    fn no_damage() -> Self {
        Self {
            damage: 0,
            is_critical: false,
            effectiveness: 1.0,
        }
    }
}

/// Move power after weather: sun favours Fire over Water, rain the reverse.
pub fn weather_adjusted_power(power: u16, move_type: PokemonType, weather: Weather) -> u16 {
    match (weather, move_type) {
        (Weather::Sun, PokemonType::Fire) | (Weather::Rain, PokemonType::Water) => {
            (u32::from(power) * 3 / 2).min(u32::from(u16::MAX)) as u16
        }
        (Weather::Sun, PokemonType::Water) | (Weather::Rain, PokemonType::Fire) => power / 2,
        _ => power,
    }
}

/// Attack and defense stats the move uses, with burn applied.
fn offensive_and_defensive_stats(attacker: BattlerRef<'_>, defender: BattlerRef<'_>, category: MoveCategory) -> (u16, u16) {
    match category {
        MoveCategory::Physical => {
            let mut attack = attacker.combatant.stats.atk;
            if attacker.state.status == Some(StatusCondition::Burn) {
                attack /= 2;
            }
            (attack, defender.combatant.stats.def)
        }
        _ => (attacker.combatant.stats.spa, defender.combatant.stats.spd),
    }
}

/// Damage, critical flag and type multiplier for one use of `move_data`.
///
/// Draws twice from `rng` for damaging moves: the critical-hit check, then
/// the damage roll (85..=100%). Status moves never draw.
pub fn compute_damage<R: RandomSource + ?Sized>(
    attacker: BattlerRef<'_>,
    defender: BattlerRef<'_>,
    move_data: &MoveData,
    weather: Weather,
    config: &EngineConfig,
    rng: &mut R,
) -> DamageOutcome {
    if move_data.category == MoveCategory::Status {
        return DamageOutcome::no_damage();
    }

    let (attack, defense) = offensive_and_defensive_stats(attacker, defender, move_data.category);
    let power = weather_adjusted_power(move_data.power, move_data.move_type, weather);

    let level = f64::from(attacker.combatant.level);
    let ratio = f64::from(attack) / f64::from(defense.max(1));
    let base_damage = ((2.0 * level / 5.0 + 2.0) * f64::from(power) * ratio) / 50.0 + 2.0;

    let is_critical = rng.one_in("Critical Hit Check", config.critical_hit_chance);
    let critical_multiplier = if is_critical { config.critical_multiplier } else { 1.0 };

    let roll_percent = 85 + rng.roll("Damage Roll", 16);
    let roll_multiplier = f64::from(roll_percent) / 100.0;

    let stab_multiplier = if attacker.combatant.has_type(move_data.move_type) {
        config.stab_multiplier
    } else {
        1.0
    };

    let type_multiplier = effectiveness(move_data.move_type, &defender.combatant.types);

    let total = base_damage * critical_multiplier * roll_multiplier * stab_multiplier * type_multiplier;
    let damage = total.floor().clamp(0.0, f64::from(u16::MAX)) as u16;

    tracing::trace!(
        move_name = %move_data.name,
        base_damage,
        roll_percent,
        is_critical,
        type_multiplier,
        damage,
        "damage computed"
    );

    DamageOutcome {
        damage,
        is_critical,
        effectiveness: type_multiplier,
    }
}
