//! Command-line interface
//!
//! Argument definitions and command handlers for the `nixos-options` binary.

pub mod args;
pub mod commands;
