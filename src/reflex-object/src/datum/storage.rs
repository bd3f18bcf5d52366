use std::{any::Any, fmt, ptr::NonNull, rc::Rc, slice};

use reflex_containers::Vector;
use reflex_math::{Mat4, Vec4};

use super::{DatumType, Reference};
use crate::{Error, Result, ScopeId};

/// The backing memory of a typed datum.
pub enum Buffer<T> {
    /// A buffer owned and managed by the datum.
    Owned(Vector<T>),
    /// Memory owned elsewhere which the datum aliases.
    ///
    /// `owner`, if any, keeps the aliased allocation alive for
    /// as long as this buffer or a clone of it exists.
    External {
        ptr: NonNull<T>,
        len: usize,
        owner: Option<Rc<dyn Any>>,
    },
}

impl<T> Buffer<T> {
    #[inline]
    pub fn new() -> Self {
        Self::Owned(Vector::new())
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Owned(data) => data.as_slice(),
            // SAFETY: `set_storage` requires the caller to keep
            // `len` elements at `ptr` alive for as long as they
            // are aliased, or `owner` does; we only hand out
            // borrows of `self`.
            Self::External { ptr, len, .. } => unsafe { slice::from_raw_parts(ptr.as_ptr(), *len) },
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Self::Owned(data) => data.as_mut_slice(),
            // SAFETY: See `as_slice`. The exclusive borrow of
            // `self` prevents overlapping slices through us.
            Self::External { ptr, len, .. } => unsafe {
                slice::from_raw_parts_mut(ptr.as_ptr(), *len)
            },
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Owned(data) => data.len(),
            Self::External { len, .. } => *len,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        match self {
            Self::Owned(data) => data.capacity(),
            Self::External { len, .. } => *len,
        }
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External { .. })
    }

    /// Gets the owned storage for operations which may
    /// reallocate or resize.
    pub fn owned(&mut self) -> Result<&mut Vector<T>> {
        match self {
            Self::Owned(data) => Ok(data),
            Self::External { .. } => Err(Error::invalid(
                "external storage cannot be reallocated or resized",
            )),
        }
    }
}

impl<T: Clone> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Owned(data) => Self::Owned(data.clone()),
            Self::External { ptr, len, owner } => Self::External {
                ptr: *ptr,
                len: *len,
                owner: owner.clone(),
            },
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.is_external() { "External" } else { "Owned" };
        f.debug_tuple(name).field(&self.as_slice()).finish()
    }
}

/// Storage of a datum, tagged by element type.
#[derive(Debug, Default)]
pub enum Values {
    #[default]
    Unknown,
    Integer(Buffer<i32>),
    Float(Buffer<f32>),
    Vector(Buffer<Vec4>),
    Matrix(Buffer<Mat4>),
    Table(Buffer<ScopeId>),
    String(Buffer<String>),
    Pointer(Buffer<Reference>),
}

/// Runs `$body` with `$buf` bound to the typed buffer of any
/// non-unknown variant.
macro_rules! dispatch {
    ($values:expr, $buf:ident => $body:expr, unknown => $unknown:expr) => {
        match $values {
            Values::Unknown => $unknown,
            Values::Integer($buf) => $body,
            Values::Float($buf) => $body,
            Values::Vector($buf) => $body,
            Values::Matrix($buf) => $body,
            Values::Table($buf) => $body,
            Values::String($buf) => $body,
            Values::Pointer($buf) => $body,
        }
    };
}
pub(crate) use dispatch;

impl Clone for Values {
    /// Clones the elements of every type but tables, which
    /// come out empty. Child scopes belong to exactly one
    /// table, the one of their parent.
    fn clone(&self) -> Self {
        match self {
            Self::Unknown => Self::Unknown,
            Self::Integer(buf) => Self::Integer(buf.clone()),
            Self::Float(buf) => Self::Float(buf.clone()),
            Self::Vector(buf) => Self::Vector(buf.clone()),
            Self::Matrix(buf) => Self::Matrix(buf.clone()),
            Self::Table(_) => Self::Table(Buffer::new()),
            Self::String(buf) => Self::String(buf.clone()),
            Self::Pointer(buf) => Self::Pointer(buf.clone()),
        }
    }
}

impl Values {
    pub fn empty(ty: DatumType) -> Self {
        match ty {
            DatumType::Unknown => Self::Unknown,
            DatumType::Integer => Self::Integer(Buffer::new()),
            DatumType::Float => Self::Float(Buffer::new()),
            DatumType::Vector => Self::Vector(Buffer::new()),
            DatumType::Matrix => Self::Matrix(Buffer::new()),
            DatumType::Table => Self::Table(Buffer::new()),
            DatumType::String => Self::String(Buffer::new()),
            DatumType::Pointer => Self::Pointer(Buffer::new()),
        }
    }

    pub fn ty(&self) -> DatumType {
        match self {
            Self::Unknown => DatumType::Unknown,
            Self::Integer(_) => DatumType::Integer,
            Self::Float(_) => DatumType::Float,
            Self::Vector(_) => DatumType::Vector,
            Self::Matrix(_) => DatumType::Matrix,
            Self::Table(_) => DatumType::Table,
            Self::String(_) => DatumType::String,
            Self::Pointer(_) => DatumType::Pointer,
        }
    }
}

pub(crate) mod sealed {
    use super::*;

    pub trait Sealed: Sized {
        fn buffer(values: &Values) -> Option<&Buffer<Self>>;

        fn buffer_mut(values: &mut Values) -> Option<&mut Buffer<Self>>;

        fn wrap(buffer: Buffer<Self>) -> Values;

        fn format(&self) -> String;

        fn parse(text: &str) -> Result<Self>;
    }
}

/// A type which can be stored in a [`Datum`](crate::Datum).
///
/// This is sealed and implemented for [`i32`], [`f32`],
/// [`Vec4`], [`Mat4`], [`ScopeId`], [`String`] and
/// [`Reference`].
pub trait Element: sealed::Sealed + Clone + PartialEq + 'static {
    /// The datum type storing elements of this type.
    const TYPE: DatumType;
}

/// An [`Element`] which may be written through the public
/// datum interface.
///
/// [`ScopeId`] is excluded; table elements are managed by
/// the owning [`Scopes`](crate::Scopes) arena.
pub trait Value: Element + Default {}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident, $format:expr, $parse:expr;)*) => {
        $(
            impl sealed::Sealed for $ty {
                #[inline]
                fn buffer(values: &Values) -> Option<&Buffer<Self>> {
                    match values {
                        Values::$variant(buffer) => Some(buffer),
                        _ => None,
                    }
                }

                #[inline]
                fn buffer_mut(values: &mut Values) -> Option<&mut Buffer<Self>> {
                    match values {
                        Values::$variant(buffer) => Some(buffer),
                        _ => None,
                    }
                }

                #[inline]
                fn wrap(buffer: Buffer<Self>) -> Values {
                    Values::$variant(buffer)
                }

                fn format(&self) -> String {
                    let format: fn(&Self) -> String = $format;
                    format(self)
                }

                fn parse(text: &str) -> Result<Self> {
                    let parse: fn(&str) -> Option<Self> = $parse;
                    parse(text).ok_or_else(|| Error::Parse {
                        ty: DatumType::$variant,
                        input: text.to_owned(),
                    })
                }
            }

            impl Element for $ty {
                const TYPE: DatumType = DatumType::$variant;
            }
        )*
    };
}

impl_element! {
    i32 => Integer, |v| v.to_string(), |s| s.trim().parse().ok();
    f32 => Float, |v| reflex_math::text::format_f32(*v), |s| s.trim().parse().ok();
    Vec4 => Vector, |v| reflex_math::text::format_vec4(*v), |s| reflex_math::text::parse_vec4(s).ok();
    Mat4 => Matrix, |v| reflex_math::text::format_mat4(*v), |s| reflex_math::text::parse_mat4(s).ok();
    ScopeId => Table, |v| v.to_string(), |_| None;
    String => String, |v| v.clone(), |s| Some(s.to_owned());
    Reference => Pointer, |v| v.to_text(), |_| None;
}

impl Value for i32 {}
impl Value for f32 {}
impl Value for Vec4 {}
impl Value for Mat4 {}
impl Value for String {}
impl Value for Reference {}
