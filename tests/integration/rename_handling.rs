use crate::integration::support::{assert_cache_matches_tree, Fixture};
use lognav::{ChangeEvent, ChangeKind, NavError};
use std::fs;

fn rename(fx: &Fixture, from: &str, to: &str) {
    fs::rename(fx.path(from), fx.path(to)).unwrap();
    fx.apply(ChangeEvent::Renamed {
        from: fx.path(from),
        to: fx.path(to),
    });
}

#[test]
fn file_rename_preserves_identity() {
    let fx = Fixture::new();
    fx.write("logs/app.log", "x");
    fx.nav.load_root(&fx.path("logs")).unwrap();
    let before = fx.id_of("logs/app.log").unwrap();

    fs::write(fx.path("logs/app.log"), "grown").unwrap();
    rename(&fx, "logs/app.log", "logs/app2.log");

    let node = fx.nav.get_file(&fx.path("logs/app2.log")).unwrap();
    assert_eq!(node.header.id, before);
    assert_eq!(node.header.name, "app2.log");
    assert_eq!(node.info.path, fx.path("logs/app2.log"));
    assert_eq!(node.info.size, 5);
    assert!(fx.nav.get(&fx.path("logs/app.log")).is_none());
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn file_rename_moves_to_new_sort_position() {
    let fx = Fixture::new();
    for name in ["a.log", "m.log", "z.log"] {
        fx.write(&format!("logs/{}", name), "x");
    }
    fx.nav.load_root(&fx.path("logs")).unwrap();
    assert_eq!(fx.file_names("logs"), vec!["z.log", "m.log", "a.log"]);

    rename(&fx, "logs/a.log", "logs/q.log");
    assert_eq!(fx.file_names("logs"), vec!["z.log", "q.log", "m.log"]);
}

#[test]
fn duplicate_rename_is_a_no_op() {
    let fx = Fixture::new();
    fx.write("logs/app.log", "x");
    fx.nav.load_root(&fx.path("logs")).unwrap();

    rename(&fx, "logs/app.log", "logs/app2.log");
    let once = fx.nav.snapshot();
    fx.apply(ChangeEvent::Renamed {
        from: fx.path("logs/app.log"),
        to: fx.path("logs/app2.log"),
    });

    assert_eq!(fx.nav.snapshot(), once);
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn rename_out_of_filter_removes_node() {
    let fx = Fixture::new();
    fx.write("logs/app.log", "x");
    fx.nav.load_root(&fx.path("logs")).unwrap();

    rename(&fx, "logs/app.log", "logs/app.txt");

    assert!(fx.nav.get(&fx.path("logs/app.log")).is_none());
    assert!(fx.nav.get(&fx.path("logs/app.txt")).is_none());
    assert!(fx.file_names("logs").is_empty());
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn rename_into_filter_adds_node() {
    let fx = Fixture::new();
    fx.write("logs/app.txt", "x");
    fx.nav.load_root(&fx.path("logs")).unwrap();

    rename(&fx, "logs/app.txt", "logs/app.log");

    assert!(fx.nav.get_file(&fx.path("logs/app.log")).is_some());
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn file_move_between_folders_preserves_identity() {
    let fx = Fixture::new();
    fx.write("logs/current/app.log", "x");
    fx.mkdir("logs/archive");
    fx.nav.load_root(&fx.path("logs")).unwrap();
    let before = fx.id_of("logs/current/app.log").unwrap();

    rename(&fx, "logs/current/app.log", "logs/archive/app.log");

    assert_eq!(fx.id_of("logs/archive/app.log"), Some(before));
    assert!(fx.file_names("logs/current").is_empty());
    assert_eq!(fx.file_names("logs/archive"), vec!["app.log"]);
    assert!(!fx.nav.get(&fx.path("logs/current")).unwrap().is_visible());
    assert!(fx.nav.get(&fx.path("logs/archive")).unwrap().is_visible());
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn directory_rename_rebuilds_subtree() {
    let fx = Fixture::new();
    fx.write("logs/old/inner/deep.log", "x");
    fx.write("logs/old/app.log", "x");
    fx.nav.load_root(&fx.path("logs")).unwrap();
    let sentinel = fx.id_of("logs/old/app.log").unwrap();
    let folder = fx.id_of("logs/old").unwrap();

    rename(&fx, "logs/old", "logs/new");

    let rebuilt = fx.id_of("logs/new/app.log").unwrap();
    assert_ne!(rebuilt, sentinel);
    assert_ne!(fx.id_of("logs/new").unwrap(), folder);
    assert!(fx.nav.get(&fx.path("logs/new/inner/deep.log")).is_some());
    for rel in ["logs/old", "logs/old/app.log", "logs/old/inner", "logs/old/inner/deep.log"] {
        assert!(fx.nav.get(&fx.path(rel)).is_none(), "{} still cached", rel);
    }
    assert_eq!(fx.directory_names("logs"), vec!["new"]);
    assert!(fx.nav.get(&fx.path("logs/new")).unwrap().is_visible());
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn directory_move_between_folders() {
    let fx = Fixture::new();
    fx.write("logs/a/batch/x.log", "x");
    fx.mkdir("logs/b");
    fx.nav.load_root(&fx.path("logs")).unwrap();

    rename(&fx, "logs/a/batch", "logs/b/batch");

    assert!(fx.directory_names("logs/a").is_empty());
    assert_eq!(fx.directory_names("logs/b"), vec!["batch"]);
    assert!(fx.nav.get_file(&fx.path("logs/b/batch/x.log")).is_some());
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn rename_with_unknown_source_falls_back_to_create() {
    let fx = Fixture::new();
    fx.mkdir("logs");
    fx.nav.load_root(&fx.path("logs")).unwrap();

    fx.write("logs/dir/app.log", "x");
    fx.apply(ChangeEvent::Renamed {
        from: fx.path("logs/never-seen"),
        to: fx.path("logs/dir"),
    });

    assert!(fx.nav.get_folder(&fx.path("logs/dir")).is_some());
    assert!(fx.nav.get_file(&fx.path("logs/dir/app.log")).is_some());
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn rename_out_of_watched_root_drops_node() {
    let fx = Fixture::new();
    fx.write("logs/app.log", "x");
    fx.mkdir("elsewhere");
    fx.nav.load_root(&fx.path("logs")).unwrap();

    rename(&fx, "logs/app.log", "elsewhere/app.log");

    assert!(fx.nav.get(&fx.path("logs/app.log")).is_none());
    assert!(fx.nav.get(&fx.path("elsewhere/app.log")).is_none());
    assert_cache_matches_tree(&fx.nav);
}

#[test]
fn change_triple_renames_and_rejects_missing_old_path() {
    let fx = Fixture::new();
    fx.write("logs/app.log", "x");
    fx.nav.load_root(&fx.path("logs")).unwrap();
    let before = fx.id_of("logs/app.log").unwrap();

    fs::rename(fx.path("logs/app.log"), fx.path("logs/b.log")).unwrap();
    let err = fx
        .nav
        .handle_change_parts(ChangeKind::Renamed, &fx.path("logs/b.log"), None)
        .unwrap_err();
    assert!(matches!(err, NavError::InvalidArgument(_)));
    assert_eq!(fx.id_of("logs/app.log"), Some(before));

    fx.nav
        .handle_change_parts(
            ChangeKind::Renamed,
            &fx.path("logs/b.log"),
            Some(&fx.path("logs/app.log")),
        )
        .unwrap();
    assert_eq!(fx.id_of("logs/b.log"), Some(before));
    assert!(fx.id_of("logs/app.log").is_none());

    fx.write("logs/c.log", "x");
    fx.nav
        .handle_change_parts(ChangeKind::Created, &fx.path("logs/c.log"), None)
        .unwrap();
    assert_eq!(fx.file_names("logs"), vec!["c.log", "b.log"]);
    assert_cache_matches_tree(&fx.nav);
}
