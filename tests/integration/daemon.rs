//! End-to-end: real `notify` watcher feeding the daemon thread.

use lognav::config::NavigatorConfig;
use lognav::watch::{change_channel, NavigatorDaemon, NotifyChangeSource};
use lognav::Navigator;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    condition()
}

fn start(root: &Path) -> (Arc<Navigator>, Arc<NavigatorDaemon>, std::thread::JoinHandle<usize>) {
    let config = NavigatorConfig::default();
    let (tx, rx) = change_channel();
    let source = Arc::new(NotifyChangeSource::new(tx, config.filter.case_sensitive));
    let navigator = Arc::new(Navigator::new(&config, source).unwrap());
    navigator.load_root(root).unwrap();

    let daemon = Arc::new(NavigatorDaemon::new(Arc::clone(&navigator), config.watch.clone()));
    let handle = Arc::clone(&daemon).spawn(rx).unwrap();
    (navigator, daemon, handle)
}

#[test]
fn watcher_events_reach_the_tree() {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    fs::write(root.join("first.log"), "x").unwrap();
    let (nav, daemon, handle) = start(&root);
    assert!(nav.is_armed(&root));

    // Built outside the root and moved in, so the whole subtree arrives at once.
    let staging = TempDir::new().unwrap();
    fs::create_dir_all(staging.path().join("nested/deeper")).unwrap();
    fs::write(staging.path().join("nested/deeper/new.log"), "x").unwrap();
    fs::rename(staging.path().join("nested"), root.join("nested")).unwrap();
    let created = root.join("nested/deeper/new.log");
    assert!(wait_for(|| nav.get_file(&created).is_some()));

    fs::remove_file(root.join("first.log")).unwrap();
    assert!(wait_for(|| nav.get(&root.join("first.log")).is_none()));

    fs::write(root.join("ignored.txt"), "x").unwrap();
    fs::write(root.join("marker.log"), "x").unwrap();
    assert!(wait_for(|| nav.get_file(&root.join("marker.log")).is_some()));
    assert!(nav.get(&root.join("ignored.txt")).is_none());

    daemon.stop();
    assert!(handle.join().unwrap() > 0);
    assert!(nav.audit().is_consistent());
}

#[test]
fn released_root_stops_delivering_events() {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap();
    let (nav, daemon, handle) = start(&root);

    assert!(nav.release_file_system_content(&root).unwrap());
    assert!(!nav.is_armed(&root));
    fs::write(root.join("late.log"), "x").unwrap();
    std::thread::sleep(Duration::from_millis(200));

    assert!(nav.get(&root.join("late.log")).is_none());
    assert!(nav.cached_paths().is_empty());
    daemon.stop();
    handle.join().unwrap();
}
