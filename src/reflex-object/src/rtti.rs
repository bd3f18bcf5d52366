use std::any::{Any, TypeId};

/// A runtime-identifiable object that can be referenced from
/// [`Pointer`](crate::DatumType::Pointer) datums.
///
/// Implementations are usually generated by `#[derive(Rtti)]`
/// or the [`impl_rtti!`](crate::impl_rtti) macro.
///
/// # Correctness
///
/// [`Rtti::as_any`] and [`Rtti::as_any_mut`] must return
/// `self`, or downcasting will silently fail.
pub trait Rtti: Any {
    /// The name identifying the concrete type.
    fn type_name(&self) -> &'static str;

    /// Names of the types this type derives from, nearest
    /// first.
    fn type_chain(&self) -> &'static [&'static str] {
        &[]
    }

    /// Gets the value as an [`Any`] reference.
    fn as_any(&self) -> &dyn Any;

    /// Gets the value as an [`Any`] reference.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Compares with another object.
    ///
    /// Defaults to identity.
    fn equals(&self, other: &dyn Rtti) -> bool {
        std::ptr::eq(
            (self as *const Self).cast::<()>(),
            (other as *const dyn Rtti).cast::<()>(),
        )
    }

    /// Produces the textual representation of the object.
    fn to_text(&self) -> String {
        self.type_name().to_owned()
    }
}

impl dyn Rtti {
    /// Checks whether the object is named `tag` or derives
    /// from a type named `tag`.
    pub fn is(&self, tag: &str) -> bool {
        self.type_name() == tag || self.type_chain().contains(&tag)
    }

    /// Checks if this value is an instance of `T`.
    #[inline]
    pub fn is_type<T: Rtti>(&self) -> bool {
        self.as_any().type_id() == TypeId::of::<T>()
    }

    /// Downcasts the value into the concrete type if it
    /// is a `T` underneath.
    #[inline]
    pub fn downcast_ref<T: Rtti>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Downcasts the value into the concrete type if it
    /// is a `T` underneath.
    #[inline]
    pub fn downcast_mut<T: Rtti>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

/// Implements [`Rtti`] for a type by hand.
///
/// ```
/// # use reflex_object::impl_rtti;
/// #[derive(PartialEq)]
/// struct Foo(i32);
///
/// impl_rtti!(Foo, "Foo", bases = ["Object"], eq);
/// ```
///
/// Passing `eq` compares through [`PartialEq`] rather than
/// by identity.
#[macro_export]
macro_rules! impl_rtti {
    (@common $name:literal $(, [$($base:literal),*])?) => {
        #[inline]
        fn type_name(&self) -> &'static str {
            $name
        }

        #[inline]
        fn type_chain(&self) -> &'static [&'static str] {
            &[$($($base),*)?]
        }

        #[inline]
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };

    ($ty:ty, $name:literal $(, bases = [$($base:literal),* $(,)?])?) => {
        impl $crate::Rtti for $ty {
            $crate::impl_rtti!(@common $name $(, [$($base),*])?);
        }
    };

    ($ty:ty, $name:literal $(, bases = [$($base:literal),* $(,)?])?, eq) => {
        impl $crate::Rtti for $ty {
            $crate::impl_rtti!(@common $name $(, [$($base),*])?);

            fn equals(&self, other: &dyn $crate::Rtti) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .map_or(false, |other| self == other)
            }
        }
    };
}
