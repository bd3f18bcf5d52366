//! Generic containers backing the reflection system.
//!
//! - [`Vector`] is a contiguous array with an explicit,
//!   policy-driven growth strategy.
//!
//! - [`SList`] is a singly linked list used for hash
//!   bucket chains.
//!
//! - [`HashMap`] is a chained hash map built from the two.

#![deny(
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    unsafe_op_in_unsafe_fn
)]

mod error;
pub use self::error::*;

mod hash_map;
pub use self::hash_map::HashMap;

mod increment;
pub use self::increment::*;

pub mod slist;
pub use self::slist::SList;

mod vector;
pub use self::vector::Vector;
