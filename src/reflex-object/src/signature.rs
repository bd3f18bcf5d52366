use std::{
    any::{Any, TypeId},
    borrow::Cow,
    fmt,
    ptr::NonNull,
    rc::Rc,
    sync::Arc,
};

use reflex_math::{Mat4, Vec4};

use crate::{
    datum::{Element, Value},
    Datum, DatumType, Error, Reference, Result,
};

/// A struct field type which can be reflected as a
/// prescribed attribute.
///
/// Scalars bind as a single element, arrays `[T; N]` as `N`
/// elements.
pub trait Field: 'static {
    /// The element type the field is made of.
    type Element: Value;

    /// The number of elements in the field.
    const LEN: usize;
}

macro_rules! impl_scalar_field {
    ($($ty:ty),*) => {
        $(
            impl Field for $ty {
                type Element = $ty;
                const LEN: usize = 1;
            }
        )*
    };
}

impl_scalar_field!(i32, f32, Vec4, Mat4, String, Reference);

impl<T: Value, const N: usize> Field for [T; N] {
    type Element = T;
    const LEN: usize = N;
}

trait FieldAccess: Send + Sync {
    fn object_type(&self) -> TypeId;

    /// # Safety
    ///
    /// `object` must point to an object of the type reported
    /// by [`FieldAccess::object_type`] which `owner` keeps
    /// alive.
    unsafe fn bind(
        &self,
        object: NonNull<()>,
        owner: &Rc<dyn Any>,
        datum: &mut Datum,
    ) -> Result<()>;
}

struct Projection<T, F> {
    project: fn(*mut T) -> *mut F,
}

impl<T: 'static, F: Field> FieldAccess for Projection<T, F> {
    fn object_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    unsafe fn bind(
        &self,
        object: NonNull<()>,
        owner: &Rc<dyn Any>,
        datum: &mut Datum,
    ) -> Result<()> {
        let field = (self.project)(object.as_ptr().cast::<T>());

        // SAFETY: `Signature::field` requires `project` to only
        // compute the address of a field inside `object`, which
        // `owner` keeps alive. Arrays are laid out as
        // consecutive elements.
        unsafe {
            datum.bind_storage(field.cast::<F::Element>(), F::LEN, Some(owner.clone()))
        }
    }
}

/// Describes one prescribed attribute of an
/// [`Attributed`](crate::Attributed) type.
///
/// A signature is either a *field*, bound to external storage
/// inside every instance, or a *table* of nested scopes owned
/// by the instance's scope.
#[derive(Clone)]
pub struct Signature {
    name: Cow<'static, str>,
    ty: DatumType,
    size: usize,
    access: Option<Arc<dyn FieldAccess>>,
}

impl Signature {
    /// Creates a signature for a field of `T`.
    ///
    /// Use [`std::ptr::addr_of_mut`] in `project` so that no
    /// reference to the object is created:
    ///
    /// ```
    /// # use std::ptr::addr_of_mut;
    /// # use reflex_object::Signature;
    /// struct Player {
    ///     health: i32,
    /// }
    ///
    /// let signature = unsafe {
    ///     Signature::field("Health", |this: *mut Player| addr_of_mut!((*this).health))
    /// };
    /// assert_eq!(signature.size(), 1);
    /// ```
    ///
    /// # Safety
    ///
    /// `project` must map a pointer to a `T` to a pointer to
    /// one of its fields and must not do anything else. Datums
    /// bound through this signature read and write whatever
    /// address it returns.
    ///
    /// ```compile_fail
    /// # use reflex_object::Signature;
    /// let signature = Signature::field("Bogus", |_: *mut u8| 0x10 as *mut i32);
    /// ```
    pub unsafe fn field<T: 'static, F: Field>(
        name: impl Into<Cow<'static, str>>,
        project: fn(*mut T) -> *mut F,
    ) -> Self {
        Self {
            name: name.into(),
            ty: <F::Element as Element>::TYPE,
            size: F::LEN,
            access: Some(Arc::new(Projection { project })),
        }
    }

    /// Creates a signature for a table with `size` nested
    /// scopes created up front.
    pub fn table(name: impl Into<Cow<'static, str>>, size: usize) -> Self {
        Self {
            name: name.into(),
            ty: DatumType::Table,
            size,
            access: None,
        }
    }

    /// Gets the attribute name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the attribute type.
    #[inline]
    pub fn ty(&self) -> DatumType {
        self.ty
    }

    /// Gets the number of elements, or the number of nested
    /// scopes for tables.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Checks whether this signature describes a table.
    #[inline]
    pub fn is_table(&self) -> bool {
        self.access.is_none()
    }

    /// Gets the type whose field is described, if any.
    pub fn object_type(&self) -> Option<TypeId> {
        self.access.as_ref().map(|access| access.object_type())
    }

    /// Binds `datum` to the described field of `object`.
    ///
    /// # Safety
    ///
    /// `object` must point to an object of type `object_type`
    /// which `owner` keeps alive.
    pub(crate) unsafe fn bind(
        &self,
        object_type: TypeId,
        object: NonNull<()>,
        owner: &Rc<dyn Any>,
        datum: &mut Datum,
    ) -> Result<()> {
        let Some(access) = &self.access else {
            return Ok(());
        };

        if access.object_type() != object_type {
            return Err(Error::invalid(format!(
                "signature '{}' describes a field of another type",
                self.name
            )));
        }

        // SAFETY: The object type was checked above and the
        // caller guarantees the object is alive.
        unsafe { access.bind(object, owner, datum) }
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty && self.size == other.size
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("size", &self.size)
            .finish()
    }
}
