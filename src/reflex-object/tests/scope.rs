use reflex_object::{Config, Datum, DatumType, Error, Reference, ScopeId, Scopes};

fn names(scopes: &Scopes, id: ScopeId) -> Vec<String> {
    scopes[id].iter().map(|(name, _)| name.to_owned()).collect()
}

#[test]
fn append_keeps_insertion_order() {
    let mut scopes = Scopes::new();
    let root = scopes.create();

    scopes.append(root, "b").unwrap().assign(1).unwrap();
    scopes.append(root, "a").unwrap().assign(2).unwrap();
    scopes.append(root, "c").unwrap();

    // Appending an existing name hands out the same datum.
    assert_eq!(scopes.append(root, "b").unwrap().get_integer(0), Ok(&1));
    assert_eq!(names(&scopes, root), ["b", "a", "c"]);
    assert_eq!(scopes[root].index_of("a"), Some(1));
    assert_eq!(scopes[root]["a"], 2);
    assert_eq!(scopes[root][2].ty(), DatumType::Unknown);

    assert!(matches!(
        scopes.append(root, ""),
        Err(Error::InvalidOperation(_))
    ));
    assert!(scopes.find(root, "missing").is_none());
    assert_eq!(
        scopes.at(root, "missing"),
        Err(Error::NotFound("missing".to_owned()))
    );
}

#[test]
fn append_scope_parents_the_child() {
    let mut scopes = Scopes::new();
    let root = scopes.create();
    let child = scopes.append_scope(root, "X").unwrap();

    let datum = scopes.find(root, "X").unwrap();
    assert_eq!(datum.ty(), DatumType::Table);
    assert_eq!(datum.len(), 1);
    assert_eq!(datum.get_scope(0), Ok(child));
    assert_eq!(scopes.parent(child), Some(root));
    assert_eq!(scopes.child(root, "X", 0), Ok(child));

    let second = scopes.append_scope(root, "X").unwrap();
    assert_eq!(scopes.find(root, "X").unwrap().len(), 2);
    assert_eq!(scopes.find_contained_scope(root, second).map(|(_, i)| i), Some(1));

    scopes.append(root, "Number").unwrap().assign(5).unwrap();
    assert_eq!(
        scopes.append_scope(root, "Number"),
        Err(Error::TypeMismatch {
            expected: DatumType::Table,
            found: DatumType::Integer
        })
    );
    assert!(scopes.append_scope(root, "").is_err());

    // Untyped datums turn into tables.
    scopes.append(root, "Later").unwrap();
    scopes.append_scope(root, "Later").unwrap();
    assert_eq!(scopes.find(root, "Later").unwrap().ty(), DatumType::Table);
    assert_eq!(scopes.len(), 4);
}

#[test]
fn tables_are_managed_by_the_arena() {
    let mut scopes = Scopes::new();
    let root = scopes.create();
    let child = scopes.append_scope(root, "Children").unwrap();

    assert!(scopes.find_mut(root, "Children").is_none());
    assert!(scopes.search_mut(child, "Children").is_none());
    assert!(matches!(
        scopes.append(root, "Children"),
        Err(Error::InvalidOperation(_))
    ));
    assert_eq!(scopes[root].find("Children").map(Datum::len), Some(1));
    assert!(matches!(
        scopes.get_mut(root).unwrap().at_mut("Children"),
        Err(Error::InvalidOperation(_))
    ));

    let mut datum = Datum::with_type(DatumType::Table);
    assert!(matches!(datum.clear(), Err(Error::InvalidOperation(_))));
    assert!(matches!(datum.pop_back(), Err(Error::InvalidOperation(_))));
    assert!(matches!(datum.resize(0), Err(Error::InvalidOperation(_))));
    assert!(matches!(datum.remove_at(0), Err(Error::InvalidOperation(_))));
}

#[test]
fn cloned_tables_do_not_share_children() {
    let mut scopes = Scopes::new();
    let a = scopes.create();
    let b = scopes.create();
    let child = scopes.append_scope(a, "Items").unwrap();

    let table = scopes.find(a, "Items").unwrap().clone();
    assert_eq!(table.ty(), DatumType::Table);
    assert!(table.is_empty());

    *scopes.append(b, "Items").unwrap() = table;
    assert!(scopes.find_contained_scope(a, child).is_some());
    assert!(scopes.find_contained_scope(b, child).is_none());

    scopes.clear(a).unwrap();
    assert!(!scopes.contains(child));
    let copy = scopes.clone_scope(b).unwrap();
    assert_eq!(scopes.find(copy, "Items").map(Datum::len), Some(0));

    // Appended scopes still land in the adopted empty table.
    let item = scopes.append_scope(b, "Items").unwrap();
    assert_eq!(scopes.parent(item), Some(b));
}

#[test]
fn contained_scopes_know_their_parent() {
    let mut scopes = Scopes::new();
    let root = scopes.create();
    for name in ["A", "B", "A", "C", "A"] {
        scopes.append_scope(root, name).unwrap();
    }

    for (name, datum) in scopes[root].iter() {
        for (i, child) in datum.as_slice::<ScopeId>().unwrap().iter().enumerate() {
            let (found, index) = scopes.find_contained_scope(root, *child).unwrap();
            assert_eq!(found, scopes.find(root, name).unwrap());
            assert_eq!(index, i);
            assert_eq!(scopes.parent(*child), Some(root));
        }
    }

    let stranger = scopes.create();
    assert!(scopes.find_contained_scope(root, stranger).is_none());
}

#[test]
fn adopt_rejects_cycles() {
    let mut scopes = Scopes::new();
    let a = scopes.create();
    let b = scopes.append_scope(a, "b").unwrap();
    let c = scopes.append_scope(b, "c").unwrap();

    assert!(matches!(
        scopes.adopt(a, a, "x"),
        Err(Error::InvalidOperation(_))
    ));
    assert!(matches!(
        scopes.adopt(c, a, "x"),
        Err(Error::InvalidOperation(_))
    ));
    assert!(matches!(
        scopes.adopt(c, b, "x"),
        Err(Error::InvalidOperation(_))
    ));

    // Nothing changed.
    assert!(scopes.find(c, "x").is_none());
    assert_eq!(scopes.parent(a), None);
    assert_eq!(scopes.parent(b), Some(a));
    assert_eq!(scopes.parent(c), Some(b));
    assert_eq!(scopes.find(a, "b").unwrap().len(), 1);
    assert!(scopes.is_ancestor_of(a, c));
    assert!(scopes.is_descendant_of(c, a));
    assert!(!scopes.is_ancestor_of(c, a));
}

#[test]
fn adopt_moves_between_parents() {
    let mut scopes = Scopes::new();
    let first = scopes.create();
    let second = scopes.create();
    let child = scopes.append_scope(first, "Kids").unwrap();
    scopes.append_scope(child, "Grandkid").unwrap();

    scopes.adopt(second, child, "Adopted").unwrap();

    assert_eq!(scopes.parent(child), Some(second));
    assert!(scopes.find(first, "Kids").unwrap().is_empty());
    assert_eq!(scopes.child(second, "Adopted", 0), Ok(child));
    assert_eq!(scopes.find(child, "Grandkid").unwrap().len(), 1);

    // Roots can be adopted as well.
    let loner = scopes.create();
    scopes.adopt(child, loner, "Adopted").unwrap();
    assert_eq!(scopes.parent(loner), Some(child));
    assert!(scopes.is_ancestor_of(second, loner));

    scopes.append(second, "Value").unwrap().assign(1.0f32).unwrap();
    assert!(matches!(
        scopes.adopt(second, loner, "Value"),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(scopes.parent(loner), Some(child));
}

#[test]
fn adopting_an_owned_child_is_idempotent() {
    let mut scopes = Scopes::new();
    let root = scopes.create();
    let child = scopes.append_scope(root, "Children").unwrap();

    scopes.adopt(root, child, "Children").unwrap();
    scopes.adopt(root, child, "Children").unwrap();

    assert_eq!(scopes[root].len(), 1);
    assert_eq!(scopes.find(root, "Children").unwrap().len(), 1);
    assert_eq!(scopes.parent(child), Some(root));

    // Adopting under another name moves it within the parent.
    scopes.adopt(root, child, "Others").unwrap();
    assert!(scopes.find(root, "Children").unwrap().is_empty());
    assert_eq!(scopes.child(root, "Others", 0), Ok(child));
}

#[test]
fn orphan_and_destroy() {
    let mut scopes = Scopes::new();
    let root = scopes.create();
    let child = scopes.append_scope(root, "Children").unwrap();
    let grandchild = scopes.append_scope(child, "Children").unwrap();

    scopes.orphan(child).unwrap();
    assert_eq!(scopes.parent(child), None);
    assert!(scopes.find(root, "Children").unwrap().is_empty());
    assert_eq!(scopes.parent(grandchild), Some(child));
    assert_eq!(scopes.roots().count(), 2);

    // Orphaning a root does nothing.
    scopes.orphan(root).unwrap();

    scopes.destroy(child).unwrap();
    assert!(!scopes.contains(child));
    assert!(!scopes.contains(grandchild));
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes.orphan(child), Err(Error::StaleScope(child)));
    assert!(scopes.find(child, "Children").is_none());
}

#[test]
fn recycled_slots_reject_old_handles() {
    let mut scopes = Scopes::with_config(Config::default().with_initial_slots(4));
    let old = scopes.create();
    scopes.destroy(old).unwrap();

    let new = scopes.create();
    assert_eq!(new.index(), old.index());
    assert_ne!(new, old);
    assert!(scopes.get(old).is_none());
    assert_eq!(scopes.scope(old).map(|_| ()), Err(Error::StaleScope(old)));
    assert!(scopes.append(old, "x").is_err());
    assert_eq!(old.to_string(), format!("Scope({})", old.index()));
}

#[test]
fn search_walks_up() {
    let mut scopes = Scopes::new();
    let root = scopes.create();
    let middle = scopes.append_scope(root, "Middle").unwrap();
    let leaf = scopes.append_scope(middle, "Leaf").unwrap();

    scopes.append(root, "Gravity").unwrap().assign(9.81f32).unwrap();
    scopes.append(middle, "Name").unwrap().assign(String::from("middle")).unwrap();
    scopes.append(leaf, "Name").unwrap().assign(String::from("leaf")).unwrap();

    let (found, datum) = scopes.search(leaf, "Gravity").unwrap();
    assert_eq!(found, root);
    assert_eq!(*datum, 9.81f32);

    let (found, datum) = scopes.search(leaf, "Name").unwrap();
    assert_eq!(found, leaf);
    assert_eq!(*datum, *"leaf");

    let (found, datum) = scopes.search_mut(middle, "Gravity").unwrap();
    assert_eq!(found, root);
    datum.set(1.62f32, 0).unwrap();
    assert_eq!(scopes.find(root, "Gravity").unwrap().get_float(0), Ok(&1.62));

    assert!(scopes.search(leaf, "Missing").is_none());
    assert!(scopes.find(leaf, "Gravity").is_none());
}

#[test]
fn clear_destroys_children_only() {
    let mut scopes = Scopes::new();
    let root = scopes.create();
    let child = scopes.append_scope(root, "Children").unwrap();
    let grandchild = scopes.append_scope(child, "Children").unwrap();
    let leaf = scopes.append_scope(grandchild, "Children").unwrap();
    scopes.append(child, "Value").unwrap().assign(1).unwrap();

    scopes.clear(child).unwrap();

    assert!(scopes[child].is_empty());
    assert!(!scopes.contains(grandchild));
    assert!(!scopes.contains(leaf));
    assert_eq!(scopes.parent(child), Some(root));
    assert_eq!(scopes.child(root, "Children", 0), Ok(child));
    assert_eq!(scopes.len(), 2);

    // The scope is still usable afterwards.
    scopes.append(child, "Value").unwrap().assign(2).unwrap();
    assert_eq!(names(&scopes, child), ["Value"]);
}

fn build(scopes: &mut Scopes, order: &[&str]) -> ScopeId {
    let id = scopes.create();
    scopes
        .append(id, "this")
        .unwrap()
        .assign(Reference::Scope(id))
        .unwrap();

    for name in order {
        match *name {
            "Health" => scopes.append(id, name).unwrap().assign(100).unwrap(),
            "Name" => scopes.append(id, name).unwrap().assign(String::from("Gnome")).unwrap(),
            "Items" => {
                let item = scopes.append_scope(id, name).unwrap();
                scopes.append(item, "Weight").unwrap().assign(0.5f32).unwrap();
            }
            _ => unreachable!(),
        }
    }
    id
}

#[test]
fn equality_ignores_this() {
    let mut scopes = Scopes::new();
    let a = build(&mut scopes, &["Health", "Name", "Items"]);
    let b = build(&mut scopes, &["Health", "Name", "Items"]);
    let reordered = build(&mut scopes, &["Name", "Health", "Items"]);
    let shorter = build(&mut scopes, &["Health", "Name"]);

    assert_ne!(scopes.find(a, "this"), scopes.find(b, "this"));
    assert_eq!(scopes.equals(a, b), Ok(true));
    assert_eq!(scopes.equals(a, a), Ok(true));
    assert_eq!(scopes.equals(a, reordered), Ok(false));
    assert_eq!(scopes.equals(a, shorter), Ok(false));
    assert_eq!(scopes.equals(shorter, a), Ok(false));

    // Nested scopes are compared by content.
    let item = scopes.child(b, "Items", 0).unwrap();
    scopes.find_mut(item, "Weight").unwrap().set(2.0f32, 0).unwrap();
    assert_eq!(scopes.equals(a, b), Ok(false));
}

#[test]
fn clone_scope_is_deep() {
    let mut scopes = Scopes::new();
    let root = scopes.create();
    let original = build(&mut scopes, &["Health", "Items", "Name"]);
    scopes.adopt(root, original, "Original").unwrap();

    let copy = scopes.clone_scope(original).unwrap();
    assert_eq!(scopes.parent(copy), None);
    assert_eq!(names(&scopes, copy), names(&scopes, original));
    assert_eq!(scopes.equals(copy, original), Ok(true));

    let original_item = scopes.child(original, "Items", 0).unwrap();
    let copied_item = scopes.child(copy, "Items", 0).unwrap();
    assert_ne!(original_item, copied_item);
    assert_eq!(scopes.parent(copied_item), Some(copy));

    scopes.find_mut(copied_item, "Weight").unwrap().set(3.0f32, 0).unwrap();
    assert_eq!(
        scopes.find(original_item, "Weight").unwrap().get_float(0),
        Ok(&0.5)
    );
}

#[test]
fn clone_scope_aliases_external_storage() {
    let mut storage = [1, 2];
    let mut scopes = Scopes::new();
    let root = scopes.create();
    unsafe {
        scopes
            .append(root, "Shared")
            .unwrap()
            .set_storage(storage.as_mut_ptr(), storage.len())
            .unwrap();
    }

    let copy = scopes.clone_scope(root).unwrap();
    scopes.find_mut(copy, "Shared").unwrap().set(5, 1).unwrap();
    assert_eq!(scopes.find(root, "Shared").unwrap().get_integer(1), Ok(&5));

    drop(scopes);
    assert_eq!(storage, [1, 5]);
}

#[test]
fn copy_assign_keeps_place() {
    let mut scopes = Scopes::new();
    let root = scopes.create();
    let target = scopes.append_scope(root, "Target").unwrap();
    let old_child = scopes.append_scope(target, "Old").unwrap();
    let source = build(&mut scopes, &["Name", "Items"]);

    scopes.copy_assign(target, source).unwrap();

    assert!(!scopes.contains(old_child));
    assert_eq!(scopes.parent(target), Some(root));
    assert_eq!(scopes.child(root, "Target", 0), Ok(target));
    assert_eq!(names(&scopes, target), ["this", "Name", "Items"]);
    assert_eq!(scopes.equals(target, source), Ok(true));

    let item = scopes.child(target, "Items", 0).unwrap();
    assert_eq!(scopes.parent(item), Some(target));
    assert_ne!(item, scopes.child(source, "Items", 0).unwrap());

    // A scope may be assigned one of its own children.
    let nested = scopes.child(target, "Items", 0).unwrap();
    scopes.copy_assign(target, nested).unwrap();
    assert_eq!(names(&scopes, target), ["Weight"]);
    assert!(!scopes.contains(nested));
}

#[test]
fn relocate_rewrites_links() {
    let mut scopes = Scopes::new();
    let root = scopes.create();
    scopes.append_scope(root, "Slots").unwrap();
    let source = scopes.append_scope(root, "Slots").unwrap();
    let child = scopes.append_scope(source, "Children").unwrap();
    scopes.append(source, "Value").unwrap().assign(7).unwrap();

    let moved = scopes.relocate(source).unwrap();

    assert_eq!(scopes.child(root, "Slots", 1), Ok(moved));
    assert_eq!(scopes.parent(moved), Some(root));
    assert_eq!(scopes.parent(child), Some(moved));
    assert_eq!(scopes.find(moved, "Value").unwrap().get_integer(0), Ok(&7));

    assert_eq!(scopes.parent(source), None);
    assert!(scopes[source].is_empty());
    assert!(scopes.find_contained_scope(root, source).is_none());
}

#[test]
fn move_assign_takes_over() {
    let mut scopes = Scopes::new();
    let left = scopes.create();
    let right = scopes.create();
    let target = scopes.append_scope(left, "Target").unwrap();
    let doomed = scopes.append_scope(target, "Doomed").unwrap();
    let source = scopes.append_scope(right, "Source").unwrap();
    let child = scopes.append_scope(source, "Child").unwrap();

    scopes.move_assign(target, source).unwrap();

    assert!(!scopes.contains(doomed));
    assert!(scopes.find(left, "Target").unwrap().is_empty());
    assert_eq!(scopes.child(right, "Source", 0), Ok(target));
    assert_eq!(scopes.parent(target), Some(right));
    assert_eq!(scopes.parent(child), Some(target));
    assert_eq!(scopes.parent(source), None);
    assert!(scopes[source].is_empty());

    assert!(matches!(
        scopes.move_assign(right, child),
        Err(Error::InvalidOperation(_))
    ));
    scopes.move_assign(target, target).unwrap();
}

#[test]
fn plain_scopes_have_no_object() {
    let mut scopes = Scopes::new();
    let id = scopes.create();

    assert!(!scopes[id].is_attributed());
    assert_eq!(scopes.to_text(id).unwrap(), "Scope");
    assert!(scopes.object_dyn(id).is_none());
    assert_eq!(scopes.update_external_storage(id), Ok(()));
    assert_eq!(scopes.prescribed_attributes(id).map(<[_]>::len), Ok(0));

    let datum: &mut Datum = scopes.append_auxiliary_attribute(id, "Free").unwrap();
    datum.assign(1).unwrap();
    assert!(scopes.is_auxiliary_attribute(id, "Free"));
    assert_eq!(scopes.auxiliary_attributes(id).map(<[_]>::len), Ok(1));
}
