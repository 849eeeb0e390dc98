//! Replaying adapters that serve recorded exchanges from cassettes.

pub mod image_source;
