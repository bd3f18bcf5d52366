use reflex_containers::HashMap;
use reflex_utils::tracing::trace;

use super::{Scope, ScopeId, Scopes};
use crate::{Datum, DatumType, Error, Result};

fn require_table(datum: Option<&Datum>) -> Result<()> {
    match datum.map(Datum::ty) {
        None | Some(DatumType::Unknown) | Some(DatumType::Table) => Ok(()),
        Some(ty) => Err(Error::mismatch(DatumType::Table, ty)),
    }
}

impl Scopes {
    /// Gets the datum named `name` in `id`, appending an empty
    /// one if it does not exist yet.
    ///
    /// Fails if `name` holds a table; use
    /// [`Scopes::append_scope`] and [`Scopes::adopt`] instead.
    pub fn append(&mut self, id: ScopeId, name: &str) -> Result<&mut Datum> {
        self.scope_mut(id)?.append(name)
    }

    /// Creates a new child scope of `id` and appends it to the
    /// table datum named `name`.
    ///
    /// Fails if `name` already holds a datum of another type.
    pub fn append_scope(&mut self, id: ScopeId, name: &str) -> Result<ScopeId> {
        let scope = self.scope(id)?;
        if name.is_empty() {
            return Err(Error::invalid("attribute names must not be empty"));
        }
        require_table(scope.find(name))?;

        let buckets = self.config().lookup_buckets;
        let child = self.insert(Scope::new(Some(id), 0, buckets));
        self.scope_mut(id)?.table_mut(name)?.push_scope(child)?;

        Ok(child)
    }

    /// Moves `child` under `parent`, appending it to the table
    /// datum named `name`.
    ///
    /// `child` is detached from its current parent first.
    /// Adopting a scope that already sits in `name` of `parent`
    /// changes nothing. A scope can neither adopt itself nor
    /// one of its ancestors; on failure, no tree is modified.
    pub fn adopt(&mut self, parent: ScopeId, child: ScopeId, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::invalid("attribute names must not be empty"));
        }
        if parent == child {
            return Err(Error::invalid("a scope cannot adopt itself"));
        }

        let target = self.scope(parent)?;
        let current = self.scope(child)?.parent;
        if self.is_ancestor_of(child, parent) {
            return Err(Error::invalid("a scope cannot adopt one of its ancestors"));
        }

        let existing = target.find(name);
        require_table(existing)?;
        if current == Some(parent)
            && existing.map_or(false, |datum| datum.scope_ids().contains(&child))
        {
            return Ok(());
        }

        self.orphan(child)?;
        self.scope_mut(parent)?.table_mut(name)?.push_scope(child)?;
        self.scope_mut(child)?.parent = Some(parent);

        trace!(%parent, %child, name, "adopted scope");
        Ok(())
    }

    /// Detaches `id` from its parent.
    ///
    /// The scope stays alive as a root; whoever orphans it is
    /// responsible for destroying it eventually.
    pub fn orphan(&mut self, id: ScopeId) -> Result<()> {
        let Some(parent) = self.scope(id)?.parent else {
            return Ok(());
        };

        if let Some(parent) = self.get_mut(parent) {
            if let Some((entry, index)) = parent.locate(id) {
                parent.datum_at_mut(entry).remove_scope_at(index)?;
            }
        }
        self.scope_mut(id)?.parent = None;

        trace!(%id, %parent, "orphaned scope");
        Ok(())
    }

    /// Finds the datum named `name` in `id` only.
    pub fn find(&self, id: ScopeId, name: &str) -> Option<&Datum> {
        self.get(id)?.find(name)
    }

    /// Finds the datum named `name` in `id` only.
    ///
    /// Returns `None` for tables, see [`Scope::find_mut`].
    pub fn find_mut(&mut self, id: ScopeId, name: &str) -> Option<&mut Datum> {
        self.get_mut(id)?.find_mut(name)
    }

    /// Gets the datum named `name` in `id`, failing if absent.
    pub fn at(&self, id: ScopeId, name: &str) -> Result<&Datum> {
        self.scope(id)?.at(name)
    }

    /// Looks for `name` in `id` and then in each of its
    /// ancestors, nearest first.
    ///
    /// Returns the datum together with the scope it was found
    /// in.
    pub fn search(&self, id: ScopeId, name: &str) -> Option<(ScopeId, &Datum)> {
        let mut current = Some(id);
        while let Some(id) = current {
            let scope = self.get(id)?;
            if let Some(datum) = scope.find(name) {
                return Some((id, datum));
            }
            current = scope.parent;
        }

        None
    }

    /// Like [`Scopes::search`], but returns the datum mutably.
    ///
    /// Returns `None` if the nearest datum named `name` is a
    /// table.
    pub fn search_mut(&mut self, id: ScopeId, name: &str) -> Option<(ScopeId, &mut Datum)> {
        let (found, _) = self.search(id, name)?;
        let datum = self.get_mut(found)?.find_mut(name)?;
        Some((found, datum))
    }

    /// Finds the table datum of `parent` containing `child`
    /// and the index of `child` within it.
    pub fn find_contained_scope(&self, parent: ScopeId, child: ScopeId) -> Option<(&Datum, usize)> {
        let scope = self.get(parent)?;
        let (entry, index) = scope.locate(child)?;
        Some((&scope.entries[entry].1, index))
    }

    /// Gets the handle of the `index`th scope in the table
    /// datum `name` of `id`.
    pub fn child(&self, id: ScopeId, name: &str, index: usize) -> Result<ScopeId> {
        self.at(id, name)?.get_scope(index)
    }

    /// Checks whether `ancestor` is found on the parent chain
    /// of `id`.
    pub fn is_ancestor_of(&self, ancestor: ScopeId, id: ScopeId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }

        false
    }

    /// Checks whether `id` is found below `ancestor`.
    #[inline]
    pub fn is_descendant_of(&self, id: ScopeId, ancestor: ScopeId) -> bool {
        self.is_ancestor_of(ancestor, id)
    }

    /// Destroys all child scopes of `id` and removes all of
    /// its entries.
    ///
    /// The scope itself stays attached to its parent.
    pub fn clear(&mut self, id: ScopeId) -> Result<()> {
        let scope = self.scope_mut(id)?;
        let mut children = Vec::new();
        for (_, datum) in scope.entries.iter_mut() {
            children.extend(datum.take_scopes());
        }
        scope.entries.clear();
        scope.lookup.clear();

        for child in children {
            self.free_subtree(child);
        }
        Ok(())
    }

    /// Compares two scopes structurally.
    ///
    /// Entries are compared pairwise in insertion order,
    /// skipping entries named `"this"`. Tables are compared by
    /// recursively comparing their child scopes.
    pub fn equals(&self, a: ScopeId, b: ScopeId) -> Result<bool> {
        if a == b {
            return self.scope(a).map(|_| true);
        }

        let a = self.scope(a)?;
        let b = self.scope(b)?;
        let mut lhs = a.iter().filter(|(name, _)| *name != "this");
        let mut rhs = b.iter().filter(|(name, _)| *name != "this");

        loop {
            let ((ln, ld), (rn, rd)) = match (lhs.next(), rhs.next()) {
                (None, None) => return Ok(true),
                (Some(l), Some(r)) => (l, r),
                _ => return Ok(false),
            };

            if ln != rn {
                return Ok(false);
            }

            if ld.ty() == DatumType::Table && rd.ty() == DatumType::Table {
                let (lc, rc) = (ld.scope_ids(), rd.scope_ids());
                if lc.len() != rc.len() {
                    return Ok(false);
                }
                for (l, r) in lc.iter().zip(rc) {
                    if !self.equals(*l, *r)? {
                        return Ok(false);
                    }
                }
            } else if ld != rd {
                return Ok(false);
            }
        }
    }

    /// Deep-copies `id` into a new root scope.
    ///
    /// Child scopes are copied recursively. Other datums are
    /// copied by value, so datums with external storage keep
    /// aliasing the same memory; attributed scopes copy their
    /// object and rebind to it.
    pub fn clone_scope(&mut self, id: ScopeId) -> Result<ScopeId> {
        self.deep_copy(id, None)
    }

    fn deep_copy(&mut self, source: ScopeId, parent: Option<ScopeId>) -> Result<ScopeId> {
        let scope = self.scope(source)?;
        // Table datums clone empty; their children are copied below.
        let tables: Vec<(usize, Vec<ScopeId>)> = scope
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (_, datum))| datum.ty() == DatumType::Table)
            .map(|(entry, (_, datum))| (entry, datum.scope_ids().to_vec()))
            .collect();
        let copy = Scope {
            parent,
            entries: scope.entries.clone(),
            lookup: scope.lookup.clone(),
            object: scope.object.as_ref().map(|object| object.duplicate()),
        };
        let attributed = copy.object.is_some();
        let id = self.insert(copy);

        for (entry, children) in tables {
            for child in children {
                let child = self.deep_copy(child, Some(id))?;
                self.scope_mut(id)?.datum_at_mut(entry).push_scope(child)?;
            }
        }

        if attributed {
            self.update_external_storage(id)?;
        }
        Ok(id)
    }

    /// Replaces the contents of `target` with a deep copy of
    /// `source`.
    ///
    /// `target` keeps its place in the tree.
    pub fn copy_assign(&mut self, target: ScopeId, source: ScopeId) -> Result<()> {
        if target == source {
            return self.scope(target).map(drop);
        }

        // Copy first; `source` may live below `target`.
        let copy = self.clone_scope(source)?;
        self.clear(target)?;
        self.transplant(copy, target)?;
        self.free_subtree(copy);

        self.update_external_storage(target)
    }

    /// Moves the contents of `source` into a new scope which
    /// takes over the place of `source` in its parent.
    ///
    /// `source` is left behind as an empty root.
    pub fn relocate(&mut self, source: ScopeId) -> Result<ScopeId> {
        let buckets = self.config().lookup_buckets;
        let parent = self.scope(source)?.parent;

        let target = self.insert(Scope::new(None, 0, buckets));
        self.take_place(source, target, parent)?;

        trace!(%source, %target, "relocated scope");
        Ok(target)
    }

    /// Replaces the contents of `target` by moving in those of
    /// `source`, which leaves `source` as an empty root.
    ///
    /// The previous children of `target` are destroyed and
    /// `target` takes over the place of `source` in its parent.
    pub fn move_assign(&mut self, target: ScopeId, source: ScopeId) -> Result<()> {
        if target == source {
            return self.scope(target).map(drop);
        }
        self.scope(source)?;
        if self.is_ancestor_of(target, source) {
            return Err(Error::invalid("cannot move a scope into one of its ancestors"));
        }

        self.orphan(target)?;
        self.clear(target)?;

        let parent = self.scope(source)?.parent;
        self.take_place(source, target, parent)
    }

    fn take_place(
        &mut self,
        source: ScopeId,
        target: ScopeId,
        parent: Option<ScopeId>,
    ) -> Result<()> {
        self.transplant(source, target)?;

        if let Some(parent) = parent.and_then(|parent| self.get_mut(parent)) {
            if let Some((entry, index)) = parent.locate(source) {
                parent.datum_at_mut(entry).set_scope(index, target)?;
            }
        }
        self.scope_mut(target)?.parent = parent;
        self.scope_mut(source)?.parent = None;

        self.update_external_storage(target)
    }

    /// Moves entries and object of `source` into `target` and
    /// reparents the moved children.
    fn transplant(&mut self, source: ScopeId, target: ScopeId) -> Result<()> {
        let buckets = self.config().lookup_buckets;
        let scope = self.scope_mut(source)?;
        let entries = std::mem::take(&mut scope.entries);
        let lookup = std::mem::replace(&mut scope.lookup, HashMap::with_buckets(buckets));
        let object = scope.object.take();

        let scope = self.scope_mut(target)?;
        scope.entries = entries;
        scope.lookup = lookup;
        scope.object = object;

        let children: Vec<_> = scope.children().collect();
        for child in children {
            self.scope_mut(child)?.parent = Some(target);
        }
        Ok(())
    }

    /// Produces the textual representation of `id`.
    ///
    /// Attributed scopes defer to their object.
    pub fn to_text(&self, id: ScopeId) -> Result<String> {
        let scope = self.scope(id)?;
        Ok(match &scope.object {
            Some(object) => object.as_dyn().to_text(),
            None => "Scope".to_owned(),
        })
    }
}
