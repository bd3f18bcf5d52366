use std::{any::TypeId, ptr::addr_of_mut};

use reflex_object::{Attributed, DatumType, Error, Rtti, Signature, TypeManager};

#[derive(Clone, Default, Rtti, Attributed)]
#[table(name = "Children", size = 2)]
struct Registered {
    #[attribute(name = "Position")]
    position: reflex_object::math::Vec4,
    #[attribute]
    weights: [f32; 3],
}

struct Plain {
    a: i32,
    b: String,
}

#[test]
fn derived_signatures() {
    let signatures = Registered::signatures();
    let summary: Vec<_> = signatures
        .iter()
        .map(|s| (s.name(), s.ty(), s.size(), s.is_table()))
        .collect();

    assert_eq!(
        summary,
        [
            ("Position", DatumType::Vector, 1, false),
            ("weights", DatumType::Float, 3, false),
            ("Children", DatumType::Table, 2, true),
        ]
    );
    assert_eq!(signatures[0].object_type(), Some(TypeId::of::<Registered>()));
    assert_eq!(signatures[2].object_type(), None);
}

#[test]
fn registration() {
    let id = TypeId::of::<Registered>();
    assert!(TypeManager::get_signatures_for_type(id).is_err());

    TypeManager::register::<Registered>().unwrap();
    assert!(TypeManager::contains_type(id));
    assert!(TypeManager::types().contains(&id));
    assert_eq!(
        &*TypeManager::get_signatures_for_type(id).unwrap(),
        &Registered::signatures()[..]
    );
    assert_eq!(
        TypeManager::register::<Registered>(),
        Err(Error::InvalidOperation("type already registered".to_owned()))
    );

    assert!(TypeManager::remove_type(id));
    assert!(!TypeManager::remove_type(id));
    assert!(matches!(
        TypeManager::signatures_of::<Registered>(),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn manual_signatures() {
    let id = TypeId::of::<Plain>();
    let a = unsafe { Signature::field("A", |this: *mut Plain| addr_of_mut!((*this).a)) };
    let b = unsafe { Signature::field("B", |this: *mut Plain| addr_of_mut!((*this).b)) };

    let invalid = [
        vec![a.clone(), a.clone()],
        vec![Signature::table("", 0)],
        vec![Signature::table("this", 1)],
    ];
    for signatures in invalid {
        assert!(matches!(
            TypeManager::add_type(id, signatures),
            Err(Error::InvalidOperation(_))
        ));
    }
    assert!(!TypeManager::contains_type(id));

    TypeManager::add_type(id, vec![a, b, Signature::table("C", 0)]).unwrap();
    let signatures = TypeManager::signatures_of::<Plain>().unwrap();
    assert_eq!(signatures.len(), 3);
    assert_eq!(signatures[1].ty(), DatumType::String);
    assert!(TypeManager::len() >= 1);
}
