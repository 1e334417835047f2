use crate::integration::support::{assert_cache_matches_tree, Fixture};
use lognav::ChangeEvent;

#[test]
fn release_removes_every_descendant_and_disarms() {
    let fx = Fixture::new();
    fx.write("one/app.log", "x");
    fx.write("one/sub/deep.log", "x");
    fx.write("two/other.log", "x");
    fx.nav.load_root(&fx.path("one")).unwrap();
    fx.nav.load_root(&fx.path("two")).unwrap();

    assert!(fx.nav.release_file_system_content(&fx.path("one")).unwrap());

    for path in fx.nav.cached_paths() {
        assert!(!path.starts_with(fx.path("one")), "{:?} survived release", path);
    }
    assert_eq!(*fx.source.disarmed.lock(), vec![fx.path("one")]);
    assert!(!fx.source.is_armed(&fx.path("one")));
    assert!(fx.source.is_armed(&fx.path("two")));
    assert_eq!(fx.nav.roots(), vec![fx.path("two")]);
    assert_eq!(*fx.roots.removed.lock(), vec![fx.path("one")]);
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn events_for_released_root_are_ignored_while_siblings_still_apply() {
    let fx = Fixture::new();
    fx.mkdir("one");
    fx.mkdir("two");
    fx.nav.load_root(&fx.path("one")).unwrap();
    fx.nav.load_root(&fx.path("two")).unwrap();
    fx.nav.release_file_system_content(&fx.path("one")).unwrap();

    let late = fx.write("one/late.log", "x");
    fx.apply(ChangeEvent::Created(late.clone()));
    let sibling = fx.write("two/new.log", "x");
    fx.apply(ChangeEvent::Created(sibling.clone()));

    assert!(fx.nav.get(&late).is_none());
    assert!(fx.nav.get(&fx.path("one")).is_none());
    assert!(fx.nav.get_file(&sibling).is_some());
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn release_is_idempotent() {
    let fx = Fixture::new();
    fx.mkdir("one");
    fx.nav.load_root(&fx.path("one")).unwrap();

    assert!(fx.nav.release_file_system_content(&fx.path("one")).unwrap());
    assert!(!fx.nav.release_file_system_content(&fx.path("one")).unwrap());
    assert!(!fx.nav.release_file_system_content(&fx.path("never")).unwrap());
    assert_eq!(fx.roots.removed.lock().len(), 1);
    assert!(fx.nav.cached_paths().is_empty());
}

#[test]
fn released_root_can_be_loaded_again() {
    let fx = Fixture::new();
    fx.write("one/app.log", "x");
    let first = fx.nav.load_root(&fx.path("one")).unwrap();
    fx.nav.release_file_system_content(&fx.path("one")).unwrap();

    let second = fx.nav.load_root(&fx.path("one")).unwrap();
    assert_ne!(first, second);
    assert!(fx.nav.get_file(&fx.path("one/app.log")).is_some());
    assert!(fx.source.is_armed(&fx.path("one")));
    assert_cache_matches_tree(&fx.nav);
}
