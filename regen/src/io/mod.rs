//! I/O helpers for regeneration commands.

pub mod config;
pub mod fixture;
pub mod listing;
pub mod scanner;
