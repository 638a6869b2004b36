//! VoxCade CLI library.
//!
//! Argument definitions and command implementations for the `voxcade`
//! binary, kept in a library so they can be exercised from tests.

pub mod cli_args;
pub mod commands;
