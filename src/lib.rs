// lib.rs
// Library modules for the dual attention game

pub mod defs;
pub mod card;
pub mod board;
pub mod pulse;
pub mod timer;
pub mod game;
pub mod config;
pub mod strings;
pub mod logging;
pub mod terminal;
