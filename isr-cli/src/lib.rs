//! Command-line front end for `isr-core`: argument parsing, configuration,
//! logging setup and report rendering.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod report;
