use reflex_containers::{Additive, Error, Multiplicative, Vector};

#[test]
fn push_back_grows_by_policy() {
    let mut v = Vector::new();
    assert_eq!(v.capacity(), 0);

    v.push_back(1);
    assert_eq!(v.capacity(), 1);
    v.push_back(2);
    assert_eq!(v.capacity(), 2);
    v.push_back(3);
    assert_eq!(v.capacity(), 4);

    let mut v = Vector::new();
    for i in 0..4 {
        v.push_back_with(i, &Additive(3));
    }
    assert_eq!(v.capacity(), 6);

    // A policy that never grows still makes progress.
    let mut v = Vector::new();
    v.push_back_with(0, &|_: usize, _: usize| 0);
    v.push_back_with(1, &Multiplicative(0.0));
    assert_eq!(v.capacity(), 2);
    assert_eq!(v.as_slice(), &[0, 1]);
}

#[test]
fn accessors() {
    let mut v: Vector<i32> = Vector::new();
    assert_eq!(v.front(), Err(Error::Empty));
    assert_eq!(v.back(), Err(Error::Empty));
    assert_eq!(v.at(0), Err(Error::IndexOutOfRange { index: 0, len: 0 }));

    v.push_back(10);
    v.push_back(20);
    *v.back_mut().unwrap() += 1;
    assert_eq!(v.front(), Ok(&10));
    assert_eq!(v.back(), Ok(&21));
    assert_eq!(v[1], 21);
    assert_eq!(v.pop_back(), Some(21));
    assert_eq!(v.len(), 1);
}

#[test]
fn reserve_resize_shrink() {
    let mut v: Vector<String> = Vector::new();
    v.reserve(8);
    assert_eq!(v.capacity(), 8);
    v.reserve(2);
    assert_eq!(v.capacity(), 8);

    v.resize(3);
    assert_eq!(v.len(), 3);
    v.resize(1);
    assert_eq!(v.len(), 1);
    assert_eq!(v.capacity(), 8);

    v.resize(12);
    assert_eq!(v.capacity(), 12);

    v.clear();
    v.shrink_to_fit();
    assert_eq!(v.capacity(), 0);
    assert!(v.is_empty());
}

#[test]
fn remove_and_find() {
    let mut v: Vector<_> = vec!["a", "b", "c", "b"].into();
    assert_eq!(v.index_of(&"b"), Some(1));
    assert_eq!(v.find(&"z"), None);

    assert!(v.remove(&"b"));
    assert_eq!(v.as_slice(), &["a", "c", "b"]);
    assert!(!v.remove(&"z"));

    assert_eq!(v.remove_at(0), Ok("a"));
    assert_eq!(v.remove_at(5), Err(Error::IndexOutOfRange { index: 5, len: 2 }));

    v.insert_at(1, "x").unwrap();
    assert_eq!(v.as_slice(), &["c", "x", "b"]);
    assert!(v.insert_at(9, "y").is_err());
}

#[test]
fn clone_keeps_capacity() {
    let mut v = Vector::with_capacity(5);
    v.push_back(1.5f32);
    let copy = v.clone();
    assert_eq!(copy.capacity(), 5);
    assert_eq!(copy, v);
}
