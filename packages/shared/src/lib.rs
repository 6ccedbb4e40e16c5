//! Shared utilities for the xor-relay workspace.

pub mod logger;
pub mod time;
