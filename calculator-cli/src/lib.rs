//! Calculator CLI Library
//!
//! This library provides the pieces of the calculator command line:
//! argument definitions, configuration, logging setup, error handling, exit
//! codes and the calculate command itself.

/// The calculate command
pub mod calculate;
/// Command-line interface definitions and argument parsing
pub mod cli;
/// Environment-driven configuration
pub mod config;
/// CLI error type and exit-code mapping
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Log subscriber setup
pub mod logging;
