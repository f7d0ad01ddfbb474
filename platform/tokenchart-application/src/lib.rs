pub mod config;
pub mod extraction;
pub mod lookup;
