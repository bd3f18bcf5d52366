use std::ops::{Index, IndexMut};

use reflex_containers::Vector;
use reflex_utils::tracing::trace;

use super::{Scope, ScopeId};
use crate::{Config, Error, Result};

struct Slot {
    generation: u32,
    scope: Option<Scope>,
}

/// An arena owning a forest of [`Scope`]s.
///
/// Scopes refer to their parents and children through
/// [`ScopeId`] handles, so reparenting never invalidates
/// anything but the affected links. Destroying a scope frees
/// its slot and, recursively, those of all its children.
pub struct Scopes {
    slots: Vector<Slot>,
    free: Vector<u32>,
    config: Config,
}

impl Scopes {
    /// Creates an empty arena with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty arena.
    pub fn with_config(config: Config) -> Self {
        Self {
            slots: Vector::with_capacity(config.initial_slots),
            free: Vector::new(),
            config,
        }
    }

    /// Gets the configuration of the arena.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gets the number of live scopes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Checks whether no scope is alive.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates an empty root scope.
    pub fn create(&mut self) -> ScopeId {
        self.create_with_capacity(0)
    }

    /// Creates an empty root scope with room for `capacity`
    /// entries.
    pub fn create_with_capacity(&mut self, capacity: usize) -> ScopeId {
        let scope = Scope::new(None, capacity, self.config.lookup_buckets);
        self.insert(scope)
    }

    pub(crate) fn insert(&mut self, scope: Scope) -> ScopeId {
        let id = match self.free.pop_back() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.scope = Some(scope);
                ScopeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push_back(Slot {
                    generation: 0,
                    scope: Some(scope),
                });
                ScopeId {
                    index,
                    generation: 0,
                }
            }
        };

        trace!(%id, "created scope");
        id
    }

    /// Checks whether `id` refers to a live scope.
    #[inline]
    pub fn contains(&self, id: ScopeId) -> bool {
        self.get(id).is_some()
    }

    /// Gets the scope behind `id`.
    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.scope.as_ref())
    }

    /// Gets the scope behind `id` mutably.
    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.scope.as_mut())
    }

    /// Gets the scope behind `id`, failing for stale handles.
    #[inline]
    pub fn scope(&self, id: ScopeId) -> Result<&Scope> {
        self.get(id).ok_or(Error::StaleScope(id))
    }

    /// Gets the scope behind `id` mutably, failing for stale
    /// handles.
    #[inline]
    pub fn scope_mut(&mut self, id: ScopeId) -> Result<&mut Scope> {
        self.get_mut(id).ok_or(Error::StaleScope(id))
    }

    /// Gets the handle of the scope owning `id`.
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).and_then(Scope::parent)
    }

    /// Destroys `id` together with all its descendants.
    ///
    /// The scope is detached from its parent first.
    pub fn destroy(&mut self, id: ScopeId) -> Result<()> {
        self.orphan(id)?;
        self.free_subtree(id);
        Ok(())
    }

    /// Frees the slots of `root` and all scopes below it
    /// without touching any parent links.
    pub(crate) fn free_subtree(&mut self, root: ScopeId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let Some(scope) = self.take(id) else {
                continue;
            };

            pending.extend(scope.children());
            trace!(%id, "destroyed scope");
        }
    }

    fn take(&mut self, id: ScopeId) -> Option<Scope> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)?;
        let scope = slot.scope.take()?;

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push_back(id.index);
        Some(scope)
    }

    /// Iterates over the handles of all live scopes.
    pub fn ids(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.scope.is_some())
            .map(|(index, slot)| ScopeId {
                index: index as u32,
                generation: slot.generation,
            })
    }

    /// Iterates over the handles of all live root scopes.
    pub fn roots(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.ids().filter(|id| self.parent(*id).is_none())
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<ScopeId> for Scopes {
    type Output = Scope;

    fn index(&self, id: ScopeId) -> &Scope {
        match self.get(id) {
            Some(scope) => scope,
            None => panic!("{id} is no longer alive"),
        }
    }
}

impl IndexMut<ScopeId> for Scopes {
    fn index_mut(&mut self, id: ScopeId) -> &mut Scope {
        match self.get_mut(id) {
            Some(scope) => scope,
            None => panic!("{id} is no longer alive"),
        }
    }
}
