//! # coc-cli — Command-Line Interface
//!
//! Subcommand handlers for the `coc` binary:
//!
//! - [`demo`]: drives a complete custody scenario (create → transfer →
//!   accept → download) against a throwaway engine and prints the
//!   resulting audit chain and its verification report.
//! - [`verify`]: offline verification of an exported audit-log JSON file
//!   — the chain walk is a pure function over entries, so it needs no
//!   engine or store.
//!
//! Handlers return a process exit code; `main` owns argument parsing and
//! tracing initialization.

pub mod demo;
pub mod verify;
