//! Frostfire application layer
//!
//! Layered configuration and the headless demo host. The gameplay itself
//! lives in the `frostfire_*` crates.

pub mod config;
pub mod demo;
