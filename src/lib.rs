//! `gdd` library crate.
//!
//! The binary (`gdd`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or hitting the network
//! - the fetch/compute pipeline is shared between the printed report and the TUI

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod degree_days;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod tui;
