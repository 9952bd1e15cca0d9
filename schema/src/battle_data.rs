use crate::move_types::MoveData;
use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCondition {
    Burn,
    Paralysis,
    Sleep,
    Poison,
    Freeze,
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatusCondition::Burn => "burned",
            StatusCondition::Paralysis => "paralyzed",
            StatusCondition::Sleep => "asleep",
            StatusCondition::Poison => "poisoned",
            StatusCondition::Freeze => "frozen",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Weather {
    /// No weather in effect.
    #[default]
    Clear,
    Sun,
    Rain,
    Sandstorm,
    Hail,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Weather::Clear => "clear skies",
            Weather::Sun => "harsh sunlight",
            Weather::Rain => "rain",
            Weather::Sandstorm => "sandstorm",
            Weather::Hail => "hail",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

/// Fully resolved roster entry, as handed over by the roster provider.
///
/// Read-only during a battle: HP, PP and status changes live in the
/// per-battle combatant state, never here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Combatant {
    pub species: String,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub stats: BaseStats,
    #[serde(default)]
    pub status: Option<StatusCondition>,
    pub moves: Vec<MoveData>,
}

impl Combatant {
    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }
}
