//! CLI command implementations.

pub mod lap;
pub mod remove;
pub mod start;
pub mod status;
pub mod stop;
