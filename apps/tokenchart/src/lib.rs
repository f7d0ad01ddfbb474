pub mod commands;
pub mod preview;
