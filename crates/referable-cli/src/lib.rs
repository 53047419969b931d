//! Library components of the `referable` command-line client.

pub mod config;
pub mod edits;
pub mod logging;
pub mod pipeline;
