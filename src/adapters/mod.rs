//! Adapter implementations for port traits.
//!
//! - `live/` — Real HTTP implementation
//! - `recording/` — Record exchanges to cassettes
//! - `replaying/` — Replay exchanges from cassettes

pub mod live;
pub mod recording;
pub mod replaying;
