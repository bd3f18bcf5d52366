//! Runtime-typed attribute trees with reflection of Rust
//! structs into them.
//!
//! The building blocks are:
//!
//! - [`Datum`], a homogeneous array whose element type is
//!   chosen at runtime and which either owns its buffer or
//!   aliases memory owned by someone else.
//!
//! - [`Scopes`], an arena of [`Scope`] nodes. Each scope is an
//!   ordered dictionary of named datums; datums of type
//!   [`DatumType::Table`] hold child scopes, forming a tree.
//!
//! - [`Attributed`] types, whose fields are exposed as
//!   *prescribed* attributes of a scope through the
//!   [`Signature`]s registered with the [`TypeManager`].
//!
//! - The [`FactoryRegistry`], which produces scopes for
//!   registered class names.

#![deny(
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    unsafe_op_in_unsafe_fn
)]

#[doc(inline)]
pub use reflex_object_macros::{Attributed, Rtti};

pub use reflex_math as math;

mod attributed;
pub use self::attributed::*;

mod config;
pub use self::config::Config;

pub mod datum;
pub use self::datum::{Datum, DatumType, Reference};

mod error;
pub use self::error::*;

mod factory;
pub use self::factory::*;

mod rtti;
pub use self::rtti::*;

pub mod scope;
pub use self::scope::{Scope, ScopeId, Scopes};

mod signature;
pub use self::signature::*;

mod type_manager;
pub use self::type_manager::TypeManager;
