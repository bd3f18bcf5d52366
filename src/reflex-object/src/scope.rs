//! Trees of named datums stored in an arena.
//!
//! A [`Scope`] is an ordered dictionary of named [`Datum`]s.
//! Datums of type [`DatumType::Table`](crate::DatumType::Table)
//! hold the [`ScopeId`]s of child scopes, which turns scopes
//! into a tree. All scopes live in a [`Scopes`] arena which
//! owns them and hands out copyable handles.

use std::{fmt, ops::Index};

use reflex_containers::{HashMap, Vector};

use crate::{attributed::Object, Datum, DatumType, Error, Result};

mod arena;
pub use self::arena::Scopes;

mod tree;

/// A handle to a scope in a [`Scopes`] arena.
///
/// Handles are invalidated when their scope is destroyed;
/// a recycled slot never answers to an old handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId {
    index: u32,
    generation: u32,
}

impl ScopeId {
    /// Gets the arena slot of this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope({})", self.index)
    }
}

/// An ordered dictionary of named [`Datum`]s.
///
/// Entries keep their insertion order and are looked up by
/// name through a hash table. Structural changes that involve
/// child scopes go through the owning [`Scopes`] arena.
pub struct Scope {
    parent: Option<ScopeId>,
    entries: Vector<(String, Datum)>,
    lookup: HashMap<String, usize>,
    pub(crate) object: Option<Object>,
}

impl Scope {
    pub(crate) fn new(parent: Option<ScopeId>, capacity: usize, buckets: usize) -> Self {
        Self {
            parent,
            entries: Vector::with_capacity(capacity),
            lookup: HashMap::with_buckets(buckets),
            object: None,
        }
    }

    /// Gets the handle of the scope owning this one.
    #[inline]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Gets the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the scope has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets all entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[(String, Datum)] {
        &self.entries
    }

    /// Gets the entry at `index` in insertion order.
    pub fn entry(&self, index: usize) -> Option<(&str, &Datum)> {
        self.entries
            .get(index)
            .map(|(name, datum)| (name.as_str(), datum))
    }

    /// Gets the insertion index of `name`.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// Checks whether an entry named `name` exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    /// Finds the datum named `name` in this scope only.
    pub fn find(&self, name: &str) -> Option<&Datum> {
        self.index_of(name).map(|i| &self.entries[i].1)
    }

    /// Finds the datum named `name` in this scope only.
    ///
    /// Table datums are never handed out mutably since their
    /// children belong to this scope; `None` is returned for
    /// them. Restructure tables through [`Scopes`].
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Datum> {
        let index = self.index_of(name)?;
        writable(&mut self.entries[index].1).ok()
    }

    /// Gets the datum named `name`, failing if it is absent.
    pub fn at(&self, name: &str) -> Result<&Datum> {
        self.find(name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    /// Gets the datum named `name` mutably, failing if it is
    /// absent or a table.
    pub fn at_mut(&mut self, name: &str) -> Result<&mut Datum> {
        let index = self
            .index_of(name)
            .ok_or_else(|| Error::NotFound(name.to_owned()))?;
        writable(&mut self.entries[index].1)
    }

    /// Gets the datum named `name`, appending an empty one at
    /// the end if it does not exist yet.
    ///
    /// Fails if `name` holds a table.
    pub fn append(&mut self, name: &str) -> Result<&mut Datum> {
        let index = self.append_index(name)?.0;
        writable(&mut self.entries[index].1)
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Datum)> + '_ {
        self.entries
            .iter()
            .map(|(name, datum)| (name.as_str(), datum))
    }

    /// Checks whether this scope carries an attributed object.
    #[inline]
    pub fn is_attributed(&self) -> bool {
        self.object.is_some()
    }

    pub(crate) fn append_index(&mut self, name: &str) -> Result<(usize, bool)> {
        if name.is_empty() {
            return Err(Error::invalid("attribute names must not be empty"));
        }

        let next = self.entries.len();
        let (&mut index, inserted) = self.lookup.insert(name.to_owned(), next);
        if inserted {
            self.entries.push_back((name.to_owned(), Datum::new()));
        }

        Ok((index, inserted))
    }

    /// Gets the table datum named `name`, appending it if it
    /// does not exist yet.
    pub(crate) fn table_mut(&mut self, name: &str) -> Result<&mut Datum> {
        let index = self.append_index(name)?.0;
        let datum = &mut self.entries[index].1;
        datum.set_type(DatumType::Table)?;
        Ok(datum)
    }

    pub(crate) fn datum_at_mut(&mut self, index: usize) -> &mut Datum {
        &mut self.entries[index].1
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.entries
            .iter()
            .flat_map(|(_, datum)| datum.scope_ids().iter().copied())
    }

    /// Locates `child` among the table datums as
    /// `(entry index, element index)`.
    pub(crate) fn locate(&self, child: ScopeId) -> Option<(usize, usize)> {
        self.entries.iter().enumerate().find_map(|(entry, (_, datum))| {
            datum
                .scope_ids()
                .iter()
                .position(|id| *id == child)
                .map(|index| (entry, index))
        })
    }
}

fn writable(datum: &mut Datum) -> Result<&mut Datum> {
    if datum.ty() == DatumType::Table {
        return Err(Error::invalid(
            "table datums are restructured through their scope",
        ));
    }
    Ok(datum)
}

impl Index<&str> for Scope {
    type Output = Datum;

    fn index(&self, name: &str) -> &Datum {
        match self.find(name) {
            Some(datum) => datum,
            None => panic!("no attribute named '{name}'"),
        }
    }
}

impl Index<usize> for Scope {
    type Output = Datum;

    fn index(&self, index: usize) -> &Datum {
        &self.entries[index].1
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("parent", &self.parent)
            .field("entries", &self.entries)
            .finish()
    }
}
