//! lookout — terminal dashboard monitoring the liveness of network endpoints.
//!
//! Targets (address + probe name) are checked on a fixed interval by a set of
//! pluggable probes; results are persisted to a flat YAML file and rendered
//! in an interactive TUI or via one-shot CLI commands.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
