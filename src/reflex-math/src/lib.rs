//! Linear algebra library for reflected values.
//!
//! While this crate primarily just re-exports the types
//! of the [`glam`] crate, it additionally provides the
//! textual format used to store vectors and matrices in
//! reflected attributes.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

#[doc(inline)]
pub use glam::*;

pub mod text;
