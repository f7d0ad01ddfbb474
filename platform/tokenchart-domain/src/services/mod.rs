pub mod coin_lookup;
pub mod normalizer;
pub mod token_registry;
