//! Core trait abstractions.

pub mod cache;
pub mod source;

pub use cache::{CacheValidity, ResultCache};
pub use source::PoiSource;
