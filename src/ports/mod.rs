//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the pipeline and an external
//! system. Implementations live in `src/adapters/`.

pub mod image_source;

pub use image_source::{FetchRequest, ImageSource, RawResponse};
