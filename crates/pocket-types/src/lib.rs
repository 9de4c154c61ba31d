//! Foundation types for pocket-shell.
//!
//! Platform-agnostic types shared by every pocket-shell crate: hardware input
//! events, the shell configuration, and the error type.

pub mod config;
pub mod error;
pub mod input;
