//! kestrel-daemon -- process bootstrap around the configuration core.
//!
//! The daemon owns everything the core deliberately does not: argument
//! parsing, global logger setup, and the exit-code policy that
//! distinguishes recoverable configuration errors from fatal rules
//! directory I/O failures.

pub mod cli;
pub mod logging;
