use reflex_containers::{Error, SList};

#[test]
fn push_and_pop() {
    let mut list = SList::new();
    assert!(list.is_empty());
    assert_eq!(list.pop_front(), None::<i32>);

    list.push_back(2);
    list.push_front(1);
    list.push_back(3);
    assert_eq!(list.len(), 3);
    assert_eq!(list.front(), Some(&1));
    assert_eq!(list.back(), Some(&3));

    assert_eq!(list.pop_back(), Some(3));
    assert_eq!(list.back(), Some(&2));
    assert_eq!(list.pop_front(), Some(1));
    assert_eq!(list.pop_front(), Some(2));
    assert!(list.is_empty());
    assert_eq!(list.back(), None);

    list.push_back(4);
    assert_eq!(list.front(), Some(&4));
}

#[test]
fn insert_after() {
    let mut list: SList<_> = ["a", "c"].into_iter().collect();
    list.insert_after(0, "b").unwrap();
    list.insert_after(2, "d").unwrap();
    assert_eq!(list.back(), Some(&"d"));
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["a", "b", "c", "d"]);

    assert_eq!(
        list.insert_after(4, "e").map(|_| ()),
        Err(Error::IndexOutOfRange { index: 4, len: 4 })
    );
}

#[test]
fn find_and_remove() {
    let mut list: SList<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
    assert!(list.find(&"y".to_string()).is_some());
    assert!(list.remove(&"y".to_string()));
    assert!(!list.remove(&"y".to_string()));
    assert!(list.remove(&"z".to_string()));

    list.push_back("w".into());
    assert_eq!(list.len(), 2);
    assert_eq!(list.back().map(String::as_str), Some("w"));

    for value in list.iter_mut() {
        value.push('!');
    }
    assert_eq!(list.into_iter().collect::<Vec<_>>(), ["x!", "w!"]);
}

#[test]
fn clone_and_eq() {
    let list: SList<_> = (0..5).collect();
    let mut copy = list.clone();
    assert_eq!(list, copy);
    copy.pop_back();
    assert_ne!(list, copy);
}
