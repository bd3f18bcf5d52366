//! Runtime-typed homogeneous arrays.

use std::{any::Any, ptr::NonNull, rc::Rc};

use reflex_containers::{DefaultIncrement, Increment, Vector};
use reflex_math::{Mat4, Vec4};

use crate::{Error, Result, ScopeId};

mod reference;
pub use self::reference::Reference;

mod storage;
use self::storage::{dispatch, Buffer, Values};
pub use self::storage::{Element, Value};

mod ty;
pub use self::ty::DatumType;

/// A homogeneous array whose element type is decided at
/// runtime.
///
/// A datum starts out as [`DatumType::Unknown`] and gets its
/// type exactly once, either through [`Datum::set_type`] or
/// implicitly by the first assignment. Afterwards, every
/// typed operation must agree with it.
///
/// The elements either live in a buffer owned by the datum or
/// in *external storage* bound with [`Datum::set_storage`].
/// External storage can be read and written but never
/// reallocated, so all operations that change the size of
/// the datum fail on it.
///
/// Datums of type [`DatumType::Table`] hold [`ScopeId`]s of
/// child scopes. Their structure is managed by the
/// [`Scopes`](crate::Scopes) arena owning the children, so the
/// size-changing operations of this type reject them, and
/// cloning a table datum yields an empty table.
#[derive(Clone, Debug, Default)]
pub struct Datum {
    values: Values,
}

fn untyped() -> Error {
    Error::mismatch(DatumType::Unknown, DatumType::Unknown)
}

fn table_structure() -> Error {
    Error::invalid("table datums are restructured through their scope")
}

impl Datum {
    /// Creates an empty datum of unknown type.
    #[inline]
    pub const fn new() -> Self {
        Self {
            values: Values::Unknown,
        }
    }

    /// Creates an empty datum of the given type.
    pub fn with_type(ty: DatumType) -> Self {
        Self {
            values: Values::empty(ty),
        }
    }

    /// Gets the element type.
    #[inline]
    pub fn ty(&self) -> DatumType {
        self.values.ty()
    }

    /// Assigns the element type.
    ///
    /// Setting the type that is already assigned is a no-op;
    /// any other change fails.
    pub fn set_type(&mut self, ty: DatumType) -> Result<()> {
        if ty == DatumType::Unknown {
            return Err(Error::invalid("cannot set a datum to the unknown type"));
        }

        match self.ty() {
            DatumType::Unknown => {
                self.values = Values::empty(ty);
                Ok(())
            }
            current if current == ty => Ok(()),
            current => Err(Error::mismatch(ty, current)),
        }
    }

    /// Gets the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        dispatch!(&self.values, buf => buf.len(), unknown => 0)
    }

    /// Checks whether the datum holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the number of elements that fit into the owned
    /// buffer before it has to grow.
    ///
    /// For external storage this is the aliased length.
    #[inline]
    pub fn capacity(&self) -> usize {
        dispatch!(&self.values, buf => buf.capacity(), unknown => 0)
    }

    /// Checks whether the datum aliases external storage.
    #[inline]
    pub fn is_external(&self) -> bool {
        dispatch!(&self.values, buf => buf.is_external(), unknown => false)
    }

    /// Grows the owned buffer to hold at least `capacity`
    /// elements.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        dispatch!(
            &mut self.values,
            buf => buf.owned()?.reserve(capacity),
            unknown => return Err(untyped())
        );
        Ok(())
    }

    /// Resizes the owned buffer to `len` elements.
    ///
    /// New elements are default-initialized; matrices start
    /// out as identity. Shrinking drops the trimmed elements
    /// but keeps the capacity.
    pub fn resize(&mut self, len: usize) -> Result<()> {
        match &mut self.values {
            Values::Unknown => return Err(untyped()),
            Values::Integer(buf) => buf.owned()?.resize(len),
            Values::Float(buf) => buf.owned()?.resize(len),
            Values::Vector(buf) => buf.owned()?.resize(len),
            Values::Matrix(buf) => buf.owned()?.resize(len),
            Values::Table(_) => return Err(table_structure()),
            Values::String(buf) => buf.owned()?.resize(len),
            Values::Pointer(buf) => buf.owned()?.resize(len),
        }
        Ok(())
    }

    /// Releases owned capacity not occupied by elements.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        dispatch!(
            &mut self.values,
            buf => buf.owned()?.shrink_to_fit(),
            unknown => {}
        );
        Ok(())
    }

    /// Removes all elements, keeping the type and capacity.
    pub fn clear(&mut self) -> Result<()> {
        if let Values::Table(_) = self.values {
            return Err(table_structure());
        }

        dispatch!(&mut self.values, buf => buf.owned()?.clear(), unknown => {});
        Ok(())
    }

    /// Removes the last element.
    ///
    /// Does nothing when the datum is empty.
    pub fn pop_back(&mut self) -> Result<()> {
        if let Values::Table(_) = self.values {
            return Err(table_structure());
        }

        dispatch!(
            &mut self.values,
            buf => {
                buf.owned()?.pop_back();
            },
            unknown => return Err(untyped())
        );
        Ok(())
    }

    /// Removes the element at `index`, shifting the following
    /// elements down.
    pub fn remove_at(&mut self, index: usize) -> Result<()> {
        if let Values::Table(_) = self.values {
            return Err(table_structure());
        }

        dispatch!(
            &mut self.values,
            buf => {
                buf.owned()?.remove_at(index)?;
            },
            unknown => return Err(untyped())
        );
        Ok(())
    }

    /// Binds the datum to `len` elements of external storage
    /// at `data`.
    ///
    /// An unknown datum adopts the type of `T`. Rebinding an
    /// external datum is allowed, replacing owned data only
    /// when it is empty.
    ///
    /// # Safety
    ///
    /// `data` must point to `len` initialized elements which
    /// stay valid, and are not accessed through other means
    /// while a borrow obtained from this datum is live, for as
    /// long as this datum or any clone of it aliases them.
    pub unsafe fn set_storage<T: Value>(&mut self, data: *mut T, len: usize) -> Result<()> {
        // SAFETY: Upheld by the caller.
        unsafe { self.bind_storage(data, len, None) }
    }

    /// Like [`Datum::set_storage`], but the aliased memory is
    /// also kept alive by `owner`.
    ///
    /// # Safety
    ///
    /// `data` must point to `len` initialized elements inside
    /// the allocation kept alive by `owner`, if given.
    pub(crate) unsafe fn bind_storage<T: Value>(
        &mut self,
        data: *mut T,
        len: usize,
        owner: Option<Rc<dyn Any>>,
    ) -> Result<()> {
        let ptr = NonNull::new(data)
            .ok_or_else(|| Error::invalid("external storage must not be null"))?;
        if len == 0 {
            return Err(Error::invalid("external storage must not be empty"));
        }

        match self.ty() {
            DatumType::Unknown => {}
            ty if ty != T::TYPE => return Err(Error::mismatch(T::TYPE, ty)),
            _ if !self.is_external() && !self.is_empty() => {
                return Err(Error::invalid(
                    "cannot set external storage on a datum owning data",
                ));
            }
            _ => {}
        }

        self.values = T::wrap(Buffer::External { ptr, len, owner });
        Ok(())
    }

    fn buffer<T: Element>(&self) -> Result<&Buffer<T>> {
        T::buffer(&self.values).ok_or_else(|| Error::mismatch(T::TYPE, self.ty()))
    }

    fn buffer_mut<T: Element>(&mut self) -> Result<&mut Buffer<T>> {
        let ty = self.ty();
        T::buffer_mut(&mut self.values).ok_or(Error::mismatch(T::TYPE, ty))
    }

    /// Gets all elements as a slice of `T`.
    #[inline]
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        self.buffer::<T>().map(Buffer::as_slice)
    }

    /// Gets all elements as a mutable slice of `T`.
    #[inline]
    pub fn as_mut_slice<T: Value>(&mut self) -> Result<&mut [T]> {
        self.buffer_mut::<T>().map(Buffer::as_mut_slice)
    }

    /// Gets the element at `index`.
    pub fn get<T: Element>(&self, index: usize) -> Result<&T> {
        let data = self.as_slice()?;
        let size = data.len();
        data.get(index)
            .ok_or(Error::IndexOutOfRange { index, size })
    }

    /// Gets the element at `index` mutably.
    pub fn get_mut<T: Value>(&mut self, index: usize) -> Result<&mut T> {
        let data = self.as_mut_slice()?;
        let size = data.len();
        data.get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, size })
    }

    /// Overwrites the element at `index` with `value`.
    #[inline]
    pub fn set<T: Value>(&mut self, value: T, index: usize) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Gets the first element.
    pub fn front<T: Element>(&self) -> Result<&T> {
        self.get(0)
    }

    /// Gets the last element.
    pub fn back<T: Element>(&self) -> Result<&T> {
        let data = self.as_slice()?;
        data.last()
            .ok_or(Error::IndexOutOfRange { index: 0, size: 0 })
    }

    /// Appends `value` to the owned buffer.
    #[inline]
    pub fn push_back<T: Value>(&mut self, value: T) -> Result<()> {
        self.push_back_with(value, &DefaultIncrement)
    }

    /// Appends `value` to the owned buffer, growing by
    /// `policy` when it is full.
    pub fn push_back_with<T: Value, I: Increment + ?Sized>(
        &mut self,
        value: T,
        policy: &I,
    ) -> Result<()> {
        self.buffer_mut::<T>()?.owned()?.push_back_with(value, policy);
        Ok(())
    }

    /// Finds the index of the first element equal to `value`.
    pub fn index_of<T: Element>(&self, value: &T) -> Result<Option<usize>> {
        Ok(self.as_slice::<T>()?.iter().position(|v| v == value))
    }

    /// Removes the first element equal to `value`.
    ///
    /// Returns whether an element was found and removed.
    pub fn remove<T: Value>(&mut self, value: &T) -> Result<bool> {
        match self.index_of(value)? {
            Some(index) => self.remove_at(index).map(|()| true),
            None => Ok(false),
        }
    }

    /// Replaces the contents with the single element `value`.
    ///
    /// An unknown datum adopts the type of `T`.
    pub fn assign<T: Value>(&mut self, value: T) -> Result<()> {
        if self.ty() == DatumType::Unknown {
            self.set_type(T::TYPE)?;
        }

        let data = self.buffer_mut::<T>()?.owned()?;
        data.clear();
        data.push_back(value);
        Ok(())
    }

    /// Formats the element at `index` as text.
    pub fn to_text(&self, index: usize) -> Result<String> {
        use self::storage::sealed::Sealed;

        let size = self.len();
        let out_of_range = || Error::IndexOutOfRange { index, size };
        dispatch!(
            &self.values,
            buf => buf.as_slice().get(index).map(Sealed::format).ok_or_else(out_of_range),
            unknown => Err(untyped())
        )
    }

    /// Parses `text` and stores it at `index`.
    ///
    /// Not supported for unknown, table and pointer datums.
    pub fn set_from_string(&mut self, text: &str, index: usize) -> Result<()> {
        match self.ty() {
            DatumType::Integer => self.set(parse::<i32>(text)?, index),
            DatumType::Float => self.set(parse::<f32>(text)?, index),
            DatumType::Vector => self.set(parse::<Vec4>(text)?, index),
            DatumType::Matrix => self.set(parse::<Mat4>(text)?, index),
            DatumType::String => self.set(text.to_owned(), index),
            ty => Err(Error::invalid(format!("cannot set {ty} datums from a string"))),
        }
    }

    /// Parses `text` and appends it.
    ///
    /// Not supported for unknown, table and pointer datums.
    pub fn push_back_from_string(&mut self, text: &str) -> Result<()> {
        match self.ty() {
            DatumType::Integer => self.push_back(parse::<i32>(text)?),
            DatumType::Float => self.push_back(parse::<f32>(text)?),
            DatumType::Vector => self.push_back(parse::<Vec4>(text)?),
            DatumType::Matrix => self.push_back(parse::<Mat4>(text)?),
            DatumType::String => self.push_back(text.to_owned()),
            ty => Err(Error::invalid(format!("cannot push {ty} datums from a string"))),
        }
    }

    /// Compares two datums.
    ///
    /// Two unknown datums are equal; comparing an unknown
    /// datum with a typed one fails. Otherwise datums are
    /// equal when type, size and all elements match. Tables
    /// compare their scope handles; use
    /// [`Scopes::equals`](crate::Scopes::equals) for structural
    /// comparison.
    pub fn try_eq(&self, other: &Datum) -> Result<bool> {
        match (&self.values, &other.values) {
            (Values::Unknown, Values::Unknown) => Ok(true),
            (Values::Unknown, v) | (v, Values::Unknown) => {
                Err(Error::mismatch(v.ty(), DatumType::Unknown))
            }
            (Values::Integer(a), Values::Integer(b)) => Ok(a.as_slice() == b.as_slice()),
            (Values::Float(a), Values::Float(b)) => Ok(a.as_slice() == b.as_slice()),
            (Values::Vector(a), Values::Vector(b)) => Ok(a.as_slice() == b.as_slice()),
            (Values::Matrix(a), Values::Matrix(b)) => Ok(a.as_slice() == b.as_slice()),
            (Values::Table(a), Values::Table(b)) => Ok(a.as_slice() == b.as_slice()),
            (Values::String(a), Values::String(b)) => Ok(a.as_slice() == b.as_slice()),
            (Values::Pointer(a), Values::Pointer(b)) => Ok(a.as_slice() == b.as_slice()),
            _ => Ok(false),
        }
    }

    /// Takes the contents out of the datum, leaving an unknown
    /// datum behind.
    #[inline]
    pub fn take(&mut self) -> Datum {
        std::mem::take(self)
    }

    pub(crate) fn scope_ids(&self) -> &[ScopeId] {
        match &self.values {
            Values::Table(buf) => buf.as_slice(),
            _ => &[],
        }
    }

    pub(crate) fn push_scope(&mut self, id: ScopeId) -> Result<()> {
        self.set_type(DatumType::Table)?;
        self.buffer_mut::<ScopeId>()?.owned()?.push_back(id);
        Ok(())
    }

    pub(crate) fn set_scope(&mut self, index: usize, id: ScopeId) -> Result<()> {
        let data = self.buffer_mut::<ScopeId>()?.as_mut_slice();
        let size = data.len();
        let slot = data
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, size })?;
        *slot = id;
        Ok(())
    }

    pub(crate) fn remove_scope_at(&mut self, index: usize) -> Result<ScopeId> {
        Ok(self.buffer_mut::<ScopeId>()?.owned()?.remove_at(index)?)
    }

    pub(crate) fn take_scopes(&mut self) -> Vector<ScopeId> {
        match &mut self.values {
            Values::Table(Buffer::Owned(data)) => std::mem::take(data),
            _ => Vector::new(),
        }
    }
}

fn parse<T: Element>(text: &str) -> Result<T> {
    <T as storage::sealed::Sealed>::parse(text)
}

macro_rules! typed_accessors {
    ($($ty:ty => $get:ident, $get_mut:ident;)*) => {
        impl Datum {
            $(
                #[doc = concat!("Gets the `", stringify!($ty), "` at `index`.")]
                #[inline]
                pub fn $get(&self, index: usize) -> Result<&$ty> {
                    self.get(index)
                }

                #[doc = concat!("Gets the `", stringify!($ty), "` at `index` mutably.")]
                #[inline]
                pub fn $get_mut(&mut self, index: usize) -> Result<&mut $ty> {
                    self.get_mut(index)
                }
            )*

            /// Gets the handle of the child scope at `index`.
            #[inline]
            pub fn get_scope(&self, index: usize) -> Result<ScopeId> {
                self.get(index).copied()
            }
        }

        $(
            impl From<$ty> for Datum {
                fn from(value: $ty) -> Self {
                    let mut data = Vector::with_capacity(1);
                    data.push_back(value);
                    Self {
                        values: <$ty as storage::sealed::Sealed>::wrap(Buffer::Owned(data)),
                    }
                }
            }

            impl From<Vec<$ty>> for Datum {
                fn from(values: Vec<$ty>) -> Self {
                    Self {
                        values: <$ty as storage::sealed::Sealed>::wrap(Buffer::Owned(values.into())),
                    }
                }
            }

            impl FromIterator<$ty> for Datum {
                fn from_iter<I: IntoIterator<Item = $ty>>(iter: I) -> Self {
                    iter.into_iter().collect::<Vec<_>>().into()
                }
            }

            impl PartialEq<$ty> for Datum {
                fn eq(&self, other: &$ty) -> bool {
                    self.as_slice::<$ty>()
                        .map_or(false, |data| data.len() == 1 && data[0] == *other)
                }
            }
        )*
    };
}

typed_accessors! {
    i32 => get_integer, get_integer_mut;
    f32 => get_float, get_float_mut;
    Vec4 => get_vector, get_vector_mut;
    Mat4 => get_matrix, get_matrix_mut;
    String => get_string, get_string_mut;
    Reference => get_pointer, get_pointer_mut;
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl PartialEq<str> for Datum {
    fn eq(&self, other: &str) -> bool {
        self.as_slice::<String>()
            .map_or(false, |data| data.len() == 1 && data[0] == other)
    }
}

impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        self.try_eq(other).unwrap_or(false)
    }
}
