// Shared data definitions for the pokemon-duel battle core.
// Static enums, the type chart and roster snapshots live here so that
// roster providers can depend on them without pulling in the engine.

pub use battle_data::*;
pub use move_types::*;
pub use pokemon_types::*;

pub mod battle_data;
pub mod move_types;
pub mod pokemon_types;
