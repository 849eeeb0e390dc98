//! Recording adapters that capture exchanges to cassettes.

pub mod image_source;
