//! Hashing of the watch target's content.

mod content;

pub use content::{ContentDigest, ContentDigester};
