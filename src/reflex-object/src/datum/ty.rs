use std::{fmt, str::FromStr};

use crate::Error;

/// The element type of a [`Datum`](crate::Datum).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DatumType {
    /// No type assigned yet.
    #[default]
    Unknown,
    /// 32-bit signed integers.
    Integer,
    /// 32-bit floats.
    Float,
    /// 4-component float vectors.
    Vector,
    /// 4x4 float matrices.
    Matrix,
    /// Nested scopes.
    Table,
    /// Strings.
    String,
    /// References to runtime-identifiable objects.
    Pointer,
}

impl DatumType {
    /// Maps textual type tags to their datum types.
    pub const TYPE_MAP: [(&'static str, DatumType); 7] = [
        ("integer", DatumType::Integer),
        ("float", DatumType::Float),
        ("vector", DatumType::Vector),
        ("matrix", DatumType::Matrix),
        ("table", DatumType::Table),
        ("string", DatumType::String),
        ("pointer", DatumType::Pointer),
    ];

    /// Gets the textual tag of this type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Vector => "vector",
            Self::Matrix => "matrix",
            Self::Table => "table",
            Self::String => "string",
            Self::Pointer => "pointer",
        }
    }

    /// Looks up a type by its textual tag.
    ///
    /// `"unknown"` is not a valid tag.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::TYPE_MAP
            .iter()
            .find(|(tag, _)| *tag == name)
            .map(|(_, ty)| *ty)
    }
}

impl fmt::Display for DatumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatumType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::NotFound(s.to_owned()))
    }
}
