// disaster-lens: topic clustering, engagement charts and label prediction
// for disaster-related social media posts.
//
// This is the library root. Each module corresponds to one stage of the
// analysis pipeline; the binary in main.rs wires them to the CLI.

pub mod charts;
pub mod classify;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod posts;
pub mod topics;
