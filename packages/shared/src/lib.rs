//! Shared utilities for the Hiroba chat relay.

pub mod logger;
pub mod time;
