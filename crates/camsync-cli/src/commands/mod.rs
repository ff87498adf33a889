//! CLI subcommands

pub mod config;
pub mod export;
pub mod marker;
pub mod select;
pub mod status;
pub mod sync;
pub mod target;
