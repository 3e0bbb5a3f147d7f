//! Pure domain types: configuration and logical input occurrences.

pub mod config;
pub mod occurrence;

pub use config::{PageConfig, SurfaceConfig};
pub use occurrence::{Occurrence, TouchContact};
