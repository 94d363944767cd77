//! CLI subcommands

pub mod assign;
pub mod run;
pub mod traits;
