use std::{
    any::{Any, TypeId},
    ptr::NonNull,
    rc::Rc,
    sync::Arc,
};

use reflex_utils::tracing::{trace, warn};

use crate::{Datum, DatumType, Error, Reference, Result, Rtti, ScopeId, Scopes, Signature, TypeManager};

/// The name of the entry referring to an attributed scope
/// itself.
pub const THIS: &str = "this";

/// A Rust type whose fields are reflected as the prescribed
/// attributes of a scope.
///
/// The fields are described by [`Attributed::signatures`],
/// which must be registered with the [`TypeManager`] before
/// the first instance is created through
/// [`Scopes::create_object`]. Usually implemented through
/// `#[derive(Attributed)]`.
///
/// ```
/// use reflex_object::{Attributed, Rtti, Scopes, TypeManager};
///
/// #[derive(Clone, Default, Rtti, Attributed)]
/// #[rtti(name = "Monster")]
/// #[table(name = "Loot")]
/// struct Monster {
///     #[attribute(name = "Health")]
///     health: i32,
/// }
///
/// TypeManager::register::<Monster>().unwrap();
///
/// let mut scopes = Scopes::new();
/// let monster = scopes.create_object::<Monster>().unwrap();
/// scopes.object_mut::<Monster>(monster).unwrap().health = 7;
/// assert_eq!(scopes.at(monster, "Health").unwrap().get_integer(0), Ok(&7));
/// ```
pub trait Attributed: Rtti {
    /// Describes the prescribed attributes of the type.
    fn signatures() -> Vec<Signature>
    where
        Self: Sized;

    /// Clones the object behind a trait object.
    fn clone_object(&self) -> Box<dyn Attributed>;

    /// Gets the value as a [`Rtti`] reference.
    fn as_rtti(&self) -> &dyn Rtti;
}

/// The heap allocation of an attributed object.
///
/// Shared between the [`Object`] and every datum aliasing one
/// of its fields, so the fields outlive their scope when a
/// datum was cloned out of it.
struct Allocation(NonNull<dyn Attributed>);

impl Drop for Allocation {
    fn drop(&mut self) {
        // SAFETY: The pointer comes from a leaked box and the
        // last reference to it is gone.
        drop(unsafe { Box::from_raw(self.0.as_ptr()) });
    }
}

/// The attributed object owned by a scope.
///
/// The object is kept behind a raw pointer since datums of
/// its scope alias its fields.
pub(crate) struct Object {
    allocation: Rc<Allocation>,
    type_id: TypeId,
    signatures: Arc<[Signature]>,
}

impl Object {
    fn new(object: Box<dyn Attributed>, type_id: TypeId, signatures: Arc<[Signature]>) -> Self {
        Self {
            allocation: Rc::new(Allocation(NonNull::from(Box::leak(object)))),
            type_id,
            signatures,
        }
    }

    #[inline]
    fn ptr(&self) -> NonNull<dyn Attributed> {
        self.allocation.0
    }

    fn owner(&self) -> Rc<dyn Any> {
        self.allocation.clone()
    }

    pub(crate) fn as_dyn(&self) -> &dyn Attributed {
        // SAFETY: The allocation lives as long as `self`.
        // Mutable access requires `&mut self`.
        unsafe { self.ptr().as_ref() }
    }

    pub(crate) fn duplicate(&self) -> Self {
        Self::new(
            self.as_dyn().clone_object(),
            self.type_id,
            self.signatures.clone(),
        )
    }

    fn downcast_ref<T: Any>(&self) -> Option<&T> {
        if self.type_id != TypeId::of::<T>() {
            return None;
        }

        // SAFETY: The type was checked above. See `as_dyn`.
        Some(unsafe { &*self.ptr().as_ptr().cast::<T>() })
    }

    fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        if self.type_id != TypeId::of::<T>() {
            return None;
        }

        // SAFETY: The type was checked above and `&mut self`
        // guarantees that no datum of the scope is borrowed.
        Some(unsafe { &mut *self.ptr().as_ptr().cast::<T>() })
    }
}

impl Scopes {
    /// Creates a root scope for a default-constructed `T`.
    pub fn create_object<T: Attributed + Default>(&mut self) -> Result<ScopeId> {
        self.create_object_from(T::default())
    }

    /// Creates a root scope for `object`.
    ///
    /// The scope starts with the `"this"` entry followed by one
    /// entry per signature of `T`: fields are bound to the
    /// object's storage, tables are populated with the declared
    /// number of empty child scopes.
    pub fn create_object_from<T: Attributed>(&mut self, object: T) -> Result<ScopeId> {
        let signatures = TypeManager::signatures_of::<T>()?;
        let object = Object::new(Box::new(object), TypeId::of::<T>(), signatures);

        let id = self.create_with_capacity(object.signatures.len() + 1);
        self.scope_mut(id)?.object = Some(object);

        if let Err(e) = self.populate(id) {
            self.free_subtree(id);
            return Err(e);
        }
        Ok(id)
    }

    fn populate(&mut self, id: ScopeId) -> Result<()> {
        let scope = self.scope_mut(id)?;
        let Some(object) = &scope.object else {
            return Ok(());
        };
        let (ptr, type_id, owner) = (object.ptr().cast::<()>(), object.type_id, object.owner());
        let signatures = object.signatures.clone();

        scope.append(THIS)?.assign(Reference::Scope(id))?;
        for signature in signatures.iter() {
            let datum = self.append(id, signature.name())?;
            if signature.is_table() {
                datum.set_type(DatumType::Table)?;
                for _ in 0..signature.size() {
                    self.append_scope(id, signature.name())?;
                }
            } else {
                // SAFETY: `ptr` is the object kept alive by `owner`.
                unsafe { signature.bind(type_id, ptr, &owner, datum)? };
            }
        }

        Ok(())
    }

    /// Points `"this"` back at `id` and rebinds all field
    /// attributes to the object of `id`.
    ///
    /// This is done automatically whenever a scope is copied
    /// or moved. Does nothing for scopes without object.
    pub fn update_external_storage(&mut self, id: ScopeId) -> Result<()> {
        let scope = self.scope_mut(id)?;
        let Some(object) = &scope.object else {
            return Ok(());
        };
        let (ptr, type_id, owner) = (object.ptr().cast::<()>(), object.type_id, object.owner());
        let signatures = object.signatures.clone();

        if let Some(this) = scope.find_mut(THIS) {
            this.assign(Reference::Scope(id))?;
        }
        for signature in signatures.iter().filter(|s| !s.is_table()) {
            match scope.find_mut(signature.name()) {
                // SAFETY: See `populate`.
                Some(datum) => unsafe { signature.bind(type_id, ptr, &owner, datum)? },
                None => warn!(%id, name = signature.name(), "prescribed attribute is missing"),
            }
        }

        trace!(%id, "rebound external storage");
        Ok(())
    }

    /// Gets the object of `id` if it is a `T`.
    pub fn object<T: Attributed>(&self, id: ScopeId) -> Option<&T> {
        self.get(id)?.object.as_ref()?.downcast_ref()
    }

    /// Gets the object of `id` mutably if it is a `T`.
    pub fn object_mut<T: Attributed>(&mut self, id: ScopeId) -> Option<&mut T> {
        self.get_mut(id)?.object.as_mut()?.downcast_mut()
    }

    /// Gets the object of `id` of whatever type it is.
    pub fn object_dyn(&self, id: ScopeId) -> Option<&dyn Attributed> {
        self.get(id)?.object.as_ref().map(Object::as_dyn)
    }

    /// Gets the signatures `id` was populated from.
    pub fn signatures(&self, id: ScopeId) -> Option<&[Signature]> {
        self.get(id)?
            .object
            .as_ref()
            .map(|object| &*object.signatures)
    }

    fn prescribed_count(&self, id: ScopeId) -> Result<usize> {
        let scope = self.scope(id)?;
        let count = scope
            .object
            .as_ref()
            .map_or(0, |object| object.signatures.len() + 1);
        Ok(count.min(scope.len()))
    }

    /// Checks whether `id` has an entry named `name`.
    pub fn is_attribute(&self, id: ScopeId, name: &str) -> bool {
        self.get(id).map_or(false, |scope| scope.contains(name))
    }

    /// Checks whether `name` is a prescribed attribute of `id`:
    /// `"this"` or the name of one of its signatures.
    pub fn is_prescribed_attribute(&self, id: ScopeId, name: &str) -> bool {
        self.is_attribute(id, name)
            && self.signatures(id).map_or(false, |signatures| {
                name == THIS || signatures.iter().any(|s| s.name() == name)
            })
    }

    /// Checks whether `name` is an attribute of `id` which
    /// was appended at runtime.
    pub fn is_auxiliary_attribute(&self, id: ScopeId, name: &str) -> bool {
        self.is_attribute(id, name) && !self.is_prescribed_attribute(id, name)
    }

    /// Appends an auxiliary attribute named `name` to `id`.
    ///
    /// Fails if `name` is prescribed for the scope's type.
    pub fn append_auxiliary_attribute(&mut self, id: ScopeId, name: &str) -> Result<&mut Datum> {
        let prescribed = self.signatures(id).map_or(false, |signatures| {
            name == THIS || signatures.iter().any(|s| s.name() == name)
        });
        if prescribed {
            return Err(Error::invalid(format!(
                "'{name}' is a prescribed attribute"
            )));
        }

        self.append(id, name)
    }

    /// Gets all attributes of `id` in order.
    pub fn attributes(&self, id: ScopeId) -> Result<&[(String, Datum)]> {
        Ok(self.scope(id)?.entries())
    }

    /// Gets the prescribed attributes of `id`, `"this"` first.
    pub fn prescribed_attributes(&self, id: ScopeId) -> Result<&[(String, Datum)]> {
        let count = self.prescribed_count(id)?;
        Ok(&self.scope(id)?.entries()[..count])
    }

    /// Gets the attributes of `id` appended at runtime.
    pub fn auxiliary_attributes(&self, id: ScopeId) -> Result<&[(String, Datum)]> {
        let count = self.prescribed_count(id)?;
        Ok(&self.scope(id)?.entries()[count..])
    }
}
