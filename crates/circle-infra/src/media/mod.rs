//! Uploaded image storage.

mod local;

pub use local::{LocalMediaStore, MediaConfig};
