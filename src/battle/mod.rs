pub mod calculators;
pub mod engine;
pub mod rng;
pub mod state;
pub mod stats;
pub mod turn_order;

#[cfg(test)]
pub(crate) mod tests;
