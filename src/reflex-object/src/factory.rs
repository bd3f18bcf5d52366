use std::{any::type_name, fmt, marker::PhantomData};

use reflex_utils::{ahash::AHashMap, tracing::debug};

use crate::{Attributed, Error, Result, ScopeId, Scopes};

/// Produces new root scopes of a particular class.
pub trait Factory {
    /// The name the factory is registered under.
    fn class_name(&self) -> &str;

    /// Creates a new instance in `scopes`.
    fn create(&self, scopes: &mut Scopes) -> anyhow::Result<ScopeId>;
}

/// A [`Factory`] for default-constructed [`Attributed`]
/// objects, named after their [`Rtti`](crate::Rtti) type name.
pub struct ConcreteFactory<T> {
    class_name: &'static str,
    _t: PhantomData<fn() -> T>,
}

impl<T: Attributed + Default> ConcreteFactory<T> {
    pub fn new() -> Self {
        Self {
            class_name: T::default().type_name(),
            _t: PhantomData,
        }
    }
}

impl<T: Attributed + Default> Default for ConcreteFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Attributed + Default> Factory for ConcreteFactory<T> {
    fn class_name(&self) -> &str {
        self.class_name
    }

    fn create(&self, scopes: &mut Scopes) -> anyhow::Result<ScopeId> {
        scopes
            .create_object::<T>()
            .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", type_name::<T>()))
    }
}

/// A [`Factory`] for empty plain scopes, named `"Scope"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScopeFactory;

impl Factory for ScopeFactory {
    fn class_name(&self) -> &str {
        "Scope"
    }

    fn create(&self, scopes: &mut Scopes) -> anyhow::Result<ScopeId> {
        Ok(scopes.create())
    }
}

/// A collection of [`Factory`] objects keyed by class name.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: AHashMap<String, Box<dyn Factory>>,
}

impl FactoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory` under its class name.
    ///
    /// Fails when the name is already taken.
    pub fn add<F: Factory + 'static>(&mut self, factory: F) -> Result<()> {
        let name = factory.class_name().to_owned();
        if self.factories.contains_key(&name) {
            return Err(Error::invalid(format!(
                "a factory for '{name}' is already registered"
            )));
        }

        debug!(%name, "registered factory");
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Removes the factory for `name`, returning whether one
    /// was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.factories.remove(name).is_some();
        if removed {
            debug!(name, "removed factory");
        }
        removed
    }

    /// Finds the factory for `name`.
    pub fn find(&self, name: &str) -> Option<&dyn Factory> {
        self.factories.get(name).map(|factory| &**factory)
    }

    /// Creates an instance of `name` in `scopes`.
    ///
    /// Returns `None` when no factory is registered for it.
    pub fn create(&self, name: &str, scopes: &mut Scopes) -> anyhow::Result<Option<ScopeId>> {
        self.find(name)
            .map(|factory| factory.create(scopes))
            .transpose()
    }

    /// Gets the number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Checks whether no factory is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Iterates over the names of all registered factories.
    pub fn class_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.class_names()).finish()
    }
}
