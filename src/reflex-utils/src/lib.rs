//! Shared code for the Reflex project.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use ahash;
pub use tracing;

pub mod hash;
