use crate::battle::rng::ScriptedRng;
use crate::battle::state::BattleState;
use crate::player::Side;
use schema::{
    BaseStats, Combatant, MoveCategory, MoveData, MoveEffect, PokemonType, StatusCondition, Target, Weather,
};

/// A builder for creating test combatants with common defaults.
///
/// Defaults: Normal type, 100 in every stat, Tackle as the only move.
///
/// # Example
/// ```ignore
/// let pikachu = CombatantBuilder::new("Pikachu", 25)
///     .with_types(vec![PokemonType::Electric])
///     .with_moves(vec![thunder_wave()])
///     .build();
/// ```
pub struct CombatantBuilder {
    species: String,
    level: u8,
    types: Vec<PokemonType>,
    stats: BaseStats,
    status: Option<StatusCondition>,
    moves: Option<Vec<MoveData>>,
}

impl CombatantBuilder {
    pub fn new(species: &str, level: u8) -> Self {
        Self {
            species: species.to_string(),
            level,
            types: vec![PokemonType::Normal],
            stats: BaseStats {
                hp: 100,
                atk: 100,
                def: 100,
                spa: 100,
                spd: 100,
                spe: 100,
            },
            status: None,
            moves: None,
        }
    }

    pub fn with_types(mut self, types: Vec<PokemonType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_stats(mut self, hp: u16, atk: u16, def: u16, spa: u16, spd: u16, spe: u16) -> Self {
        self.stats = BaseStats {
            hp,
            atk,
            def,
            spa,
            spd,
            spe,
        };
        self
    }

    pub fn with_hp(mut self, hp: u16) -> Self {
        self.stats.hp = hp;
        self
    }

    pub fn with_speed(mut self, spe: u16) -> Self {
        self.stats.spe = spe;
        self
    }

    pub fn with_moves(mut self, moves: Vec<MoveData>) -> Self {
        self.moves = Some(moves);
        self
    }

    /// Status carried in from outside the battle.
    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    pub fn build(self) -> Combatant {
        Combatant {
            species: self.species,
            level: self.level,
            types: self.types,
            stats: self.stats,
            status: self.status,
            moves: self.moves.unwrap_or_else(|| vec![tackle()]),
        }
    }
}

pub fn tackle() -> MoveData {
    MoveData::new(33, "Tackle", PokemonType::Normal, MoveCategory::Physical, 40).with_pp(35)
}

pub fn quick_attack() -> MoveData {
    MoveData::new(98, "Quick Attack", PokemonType::Normal, MoveCategory::Physical, 40)
        .with_pp(30)
        .with_priority(1)
}

pub fn ember() -> MoveData {
    MoveData::new(52, "Ember", PokemonType::Fire, MoveCategory::Special, 40)
        .with_pp(25)
        .with_effect(MoveEffect::Inflict {
            status: StatusCondition::Burn,
            chance: 10,
        })
}

pub fn water_gun() -> MoveData {
    MoveData::new(55, "Water Gun", PokemonType::Water, MoveCategory::Special, 40).with_pp(25)
}

pub fn thunder_wave() -> MoveData {
    MoveData::new(86, "Thunder Wave", PokemonType::Electric, MoveCategory::Status, 0)
        .with_pp(20)
        .with_effect(MoveEffect::Inflict {
            status: StatusCondition::Paralysis,
            chance: 100,
        })
}

pub fn rain_dance() -> MoveData {
    MoveData::new(240, "Rain Dance", PokemonType::Water, MoveCategory::Status, 0)
        .with_pp(5)
        .with_accuracy(None)
        .with_effect(MoveEffect::SetWeather(Weather::Rain))
}

pub fn agility() -> MoveData {
    MoveData::new(97, "Agility", PokemonType::Psychic, MoveCategory::Status, 0)
        .with_pp(30)
        .with_accuracy(None)
        .with_effect(MoveEffect::SpeedStage {
            target: Target::User,
            stages: 2,
        })
}

pub fn string_shot() -> MoveData {
    MoveData::new(81, "String Shot", PokemonType::Bug, MoveCategory::Status, 0)
        .with_pp(40)
        .with_effect(MoveEffect::SpeedStage {
            target: Target::Target,
            stages: -1,
        })
}

/// Creates a standard 1v1 battle for testing.
pub fn create_test_battle(a: Combatant, b: Combatant) -> (Vec<Combatant>, Vec<Combatant>, BattleState) {
    let roster_a = vec![a];
    let roster_b = vec![b];
    let state = BattleState::new(&roster_a, &roster_b);
    (roster_a, roster_b, state)
}

pub fn set_hp(state: &mut BattleState, side: Side, slot: usize, hp: u16) {
    state.team_state[side.index()][slot].current_hp = hp;
}

/// A `ScriptedRng` full of high outcomes: no crits, full damage rolls,
/// no wake-ups, side B first on ties.
pub fn predictable_rng() -> ScriptedRng {
    ScriptedRng::new_for_test(vec![99; 100])
}

/// Route `tracing` output through the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
