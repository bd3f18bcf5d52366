use std::{any::TypeId, sync::Arc};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use reflex_containers::HashMap;
use reflex_utils::tracing::debug;

use crate::{Attributed, Error, Result, Signature};

type Registry = HashMap<TypeId, Arc<[Signature]>>;

static TYPES: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// The process-wide registry of [`Signature`] lists, keyed by
/// the [`TypeId`] of the type they describe.
///
/// Every [`Attributed`] type must be registered before its
/// first instance is created.
pub struct TypeManager;

impl TypeManager {
    /// Registers the signatures of `type_id`.
    ///
    /// Fails if the type is already registered, if a name is
    /// empty, reserved or repeated, or if a field signature
    /// belongs to another type.
    pub fn add_type(type_id: TypeId, signatures: Vec<Signature>) -> Result<()> {
        for (i, signature) in signatures.iter().enumerate() {
            let name = signature.name();
            if name.is_empty() || name == "this" {
                return Err(Error::invalid(format!("'{name}' is not a valid attribute name")));
            }
            if signatures[..i].iter().any(|s| s.name() == name) {
                return Err(Error::invalid(format!("duplicate attribute '{name}'")));
            }
            if signature.object_type().map_or(false, |ty| ty != type_id) {
                return Err(Error::invalid(format!(
                    "attribute '{name}' describes a field of another type"
                )));
            }
        }

        let count = signatures.len();
        let (_, inserted) = TYPES.write().insert(type_id, signatures.into());
        if !inserted {
            return Err(Error::invalid("type already registered"));
        }

        debug!(?type_id, count, "registered attributed type");
        Ok(())
    }

    /// Registers the signatures of `T`.
    pub fn register<T: Attributed>() -> Result<()> {
        Self::add_type(TypeId::of::<T>(), T::signatures())
    }

    /// Gets the signatures registered for `type_id`.
    pub fn get_signatures_for_type(type_id: TypeId) -> Result<Arc<[Signature]>> {
        TYPES
            .read()
            .get(&type_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{type_id:?}")))
    }

    /// Gets the signatures registered for `T`.
    pub fn signatures_of<T: 'static>() -> Result<Arc<[Signature]>> {
        TYPES
            .read()
            .get(&TypeId::of::<T>())
            .cloned()
            .ok_or_else(|| Error::NotFound(std::any::type_name::<T>().to_owned()))
    }

    /// Checks whether `type_id` is registered.
    pub fn contains_type(type_id: TypeId) -> bool {
        TYPES.read().contains_key(&type_id)
    }

    /// Unregisters `type_id`, returning whether it was
    /// registered.
    ///
    /// Existing instances keep the signatures they were
    /// created with.
    pub fn remove_type(type_id: TypeId) -> bool {
        let removed = TYPES.write().remove(&type_id).is_some();
        if removed {
            debug!(?type_id, "removed attributed type");
        }
        removed
    }

    /// Gets the identifiers of all registered types.
    pub fn types() -> Vec<TypeId> {
        TYPES.read().keys().copied().collect()
    }

    /// Gets the number of registered types.
    pub fn len() -> usize {
        TYPES.read().len()
    }

    /// Unregisters all types.
    pub fn clear() {
        TYPES.write().clear();
        debug!("cleared type registry");
    }
}
