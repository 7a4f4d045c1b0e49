//! Cardvault command-line frontend
//!
//! Drives the vault flows from a terminal against a directory that stands in
//! for the removable card. The terminal implements the display and menu
//! collaborators; the identity is the owner id given on the command line.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
mod error;
pub mod terminal;
mod wallet;

pub use commands::Command;
pub use error::CliError;
pub use terminal::Terminal;
pub use wallet::{CliIdentity, EXPLANATION};
