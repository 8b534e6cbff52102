//! lmk-daemon library target.
//!
//! Exposes configuration, router and state so scenario tests (and other
//! crates' test suites) can drive the daemon in-process.  The binary
//! `main.rs` depends on this library target.

pub mod config;
pub mod routes;
pub mod state;
