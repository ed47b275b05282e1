//! Melodica CLI library.
//!
//! This crate provides the functionality behind the `melodica` binary:
//! the composition catalog and the play, replay, serve, and songs commands.

pub mod catalog;
pub mod commands;
