use crate::{DatumType, ScopeId};

/// Result type of reflection operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised when an operation violates the invariants of
/// datums, scopes or the type registry.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The operation expected a different datum type, or
    /// tried to change an already set one.
    ///
    /// An `expected` type of [`DatumType::Unknown`] stands for
    /// any type: the operation needs a typed datum.
    #[error("type mismatch: expected {}, found {found}", expected_name(.expected))]
    TypeMismatch {
        expected: DatumType,
        found: DatumType,
    },

    /// A structural invariant would be violated.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// An index was not smaller than the datum's size.
    #[error("index {index} is out of range for size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// A required lookup did not find its key.
    #[error("'{0}' was not found")]
    NotFound(String),

    /// A textual value could not be converted into the
    /// datum's type.
    #[error("cannot parse '{input}' as {ty}")]
    Parse { ty: DatumType, input: String },

    /// A scope handle refers to a freed arena slot.
    #[error("{0} is no longer alive")]
    StaleScope(ScopeId),
}

fn expected_name(ty: &DatumType) -> String {
    match ty {
        DatumType::Unknown => "a typed datum".to_owned(),
        ty => ty.to_string(),
    }
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    pub(crate) fn mismatch(expected: DatumType, found: DatumType) -> Self {
        Self::TypeMismatch { expected, found }
    }
}

impl From<reflex_containers::Error> for Error {
    fn from(e: reflex_containers::Error) -> Self {
        use reflex_containers::Error as E;

        match e {
            E::IndexOutOfRange { index, len } => Self::IndexOutOfRange { index, size: len },
            E::Empty => Self::IndexOutOfRange { index: 0, size: 0 },
            E::KeyNotFound => Self::NotFound("key".into()),
        }
    }
}
