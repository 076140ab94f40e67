//! Device-independent input for Frostfire
//!
//! This crate turns host key/pointer events into the abstract intents the
//! simulation consumes. It knows nothing about windowing libraries.

mod intents;
mod mapper;
mod tracker;

pub use intents::{IntentSnapshot, Intents};
pub use mapper::{HostAction, IntentMapper, KeyBindings};
pub use tracker::IntentTracker;
