//! Subcommand implementations for the `argus` binary

pub mod config;
pub mod enums;
pub mod list;
pub mod record;
pub mod trace;
