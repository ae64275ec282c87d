use super::*;

#[test]
fn second_acquire_for_same_id_is_refused() {
    let set = InFlightSet::new();
    let a = RecordId::from("a");

    let guard = set.try_acquire(&a).expect("first acquire");
    assert!(set.contains(&a));
    assert!(set.try_acquire(&a).is_none());

    let b = set.try_acquire(&RecordId::from("b")).expect("other id");
    assert_eq!(set.len(), 2);

    drop(guard);
    drop(b);
    assert!(set.is_empty());
}

#[test]
fn guard_releases_id_when_dropped_during_unwind() {
    let set = InFlightSet::new();
    let a = RecordId::from("a");
    let cloned = set.clone();
    let id = a.clone();

    let result = std::panic::catch_unwind(move || {
        let _guard = cloned.try_acquire(&id).expect("acquire");
        panic!("fetch blew up");
    });

    assert!(result.is_err());
    assert!(!set.contains(&a));
    assert!(set.try_acquire(&a).is_some());
}
