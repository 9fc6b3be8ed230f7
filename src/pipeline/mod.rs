// End-to-end runs behind the CLI subcommands.

pub mod analysis;
pub mod classify;
