//! Command implementations for the `melodica` binary.

mod common;

pub mod json_output;
pub mod play;
pub mod replay;
pub mod serve;
pub mod songs;
