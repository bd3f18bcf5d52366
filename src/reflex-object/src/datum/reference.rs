use std::{fmt, rc::Rc};

use crate::{Rtti, ScopeId};

/// An element of a [`Pointer`](crate::DatumType::Pointer)
/// datum.
///
/// References do not own scopes; a scope reference stays a
/// plain handle into its arena.
#[derive(Clone, Default)]
pub enum Reference {
    /// Points at nothing.
    #[default]
    Null,
    /// A shared runtime-identifiable object.
    Object(Rc<dyn Rtti>),
    /// A scope living in a [`Scopes`](crate::Scopes) arena.
    Scope(ScopeId),
}

impl Reference {
    /// Wraps `object` into a new reference.
    pub fn object<T: Rtti>(object: T) -> Self {
        Self::Object(Rc::new(object))
    }

    /// Checks whether the reference points at nothing.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Gets the referenced object, if any.
    pub fn as_object(&self) -> Option<&dyn Rtti> {
        match self {
            Self::Object(object) => Some(&**object),
            _ => None,
        }
    }

    /// Gets the referenced scope, if any.
    pub fn as_scope(&self) -> Option<ScopeId> {
        match self {
            Self::Scope(id) => Some(*id),
            _ => None,
        }
    }

    /// Produces the textual representation of the referenced
    /// value.
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => "nullptr".to_owned(),
            Self::Object(object) => object.to_text(),
            Self::Scope(id) => id.to_string(),
        }
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Object(a), Self::Object(b)) => a.equals(&**b),
            (Self::Scope(a), Self::Scope(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
            Self::Scope(id) => f.debug_tuple("Scope").field(id).finish(),
        }
    }
}

impl<T: Rtti> From<Rc<T>> for Reference {
    fn from(object: Rc<T>) -> Self {
        Self::Object(object)
    }
}

impl From<ScopeId> for Reference {
    fn from(id: ScopeId) -> Self {
        Self::Scope(id)
    }
}
