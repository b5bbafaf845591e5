mod helpers;

use chrono::Duration;
use helpers::Sandbox;
use waymark::entries::{EntryStore, SaveOutcome};

#[test]
fn save_then_load_round_trips() {
    let sandbox = Sandbox::new();
    let mut store = sandbox.empty_store();
    store.add("/home/me/projects", 12.25).unwrap();
    store.add("/srv/www", 0.1).unwrap();
    store.add("/tmp/with\ttab", 3.0).unwrap();
    assert_eq!(store.save(Duration::hours(24)), SaveOutcome::Written);

    let loaded = EntryStore::load(sandbox.data_path());
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.weight("/home/me/projects"), Some(12.25));
    assert_eq!(loaded.weight("/srv/www"), Some(0.1));
    assert_eq!(loaded.weight("/tmp/with\ttab"), Some(3.0));
}

#[test]
fn load_ignores_on_disk_order() {
    let sandbox = Sandbox::new();
    sandbox.write_data("1\t/light\n\n50\t/heavy\n7.5\t/mid\n");

    let store = EntryStore::load(sandbox.data_path());
    let paths: Vec<String> = store.entries().into_iter().map(|e| e.path).collect();
    assert_eq!(paths, vec!["/heavy", "/mid", "/light"]);
}

#[test]
fn save_creates_missing_data_dir() {
    let sandbox = Sandbox::new();
    assert!(!sandbox.data_path().parent().unwrap().exists());

    let mut store = sandbox.empty_store();
    store.add("/a", 1.0).unwrap();
    assert_eq!(store.save(Duration::hours(24)), SaveOutcome::Written);
    assert!(sandbox.data_path().exists());
    assert!(sandbox.backup_path().exists());
}

#[test]
fn save_leaves_no_temp_files_behind() {
    let sandbox = Sandbox::new();
    let mut store = sandbox.empty_store();
    store.add("/a", 1.0).unwrap();
    store.save(Duration::hours(24));
    store.add("/b", 1.0).unwrap();
    store.save(Duration::hours(24));

    let mut names: Vec<String> = std::fs::read_dir(sandbox.data_path().parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["waymark.txt", "waymark.txt.bak"]);
}

#[test]
fn corrupt_file_is_restored_from_backup() {
    let sandbox = Sandbox::new();
    sandbox.write_data("10\t/good\nthis line is garbage\n");
    sandbox.write_backup("4\t/from/backup\n");

    let store = EntryStore::load(sandbox.data_path());
    assert_eq!(store.len(), 1);
    assert_eq!(store.weight("/from/backup"), Some(4.0));

    // The primary was repaired from the backup.
    let repaired = std::fs::read_to_string(sandbox.data_path()).unwrap();
    assert_eq!(repaired, "4\t/from/backup\n");
}

#[test]
fn corrupt_file_without_backup_starts_empty() {
    let sandbox = Sandbox::new();
    sandbox.write_data("not-a-number\t/x\n");

    let store = EntryStore::load(sandbox.data_path());
    assert!(store.is_empty());
}

#[test]
fn corrupt_file_and_corrupt_backup_start_empty() {
    let sandbox = Sandbox::new();
    sandbox.write_data("garbage\n");
    sandbox.write_backup("more garbage\n");

    let store = EntryStore::load(sandbox.data_path());
    assert!(store.is_empty());
}

#[test]
fn invalid_utf8_triggers_recovery() {
    let sandbox = Sandbox::new();
    std::fs::create_dir_all(sandbox.data_path().parent().unwrap()).unwrap();
    std::fs::write(sandbox.data_path(), b"1\t/bad/\xff\xfe\n").unwrap();
    sandbox.write_backup("2\t/ok\n");

    let store = EntryStore::load(sandbox.data_path());
    assert_eq!(store.weight("/ok"), Some(2.0));
}

#[test]
fn weight_is_sum_of_increments_scaled_by_decay() {
    let sandbox = Sandbox::new();
    let mut store = sandbox.empty_store();
    for inc in [1.0, 2.0, 3.0] {
        store.add("/p", inc).unwrap();
    }
    assert_eq!(store.weight("/p"), Some(6.0));

    store.decay(0.5);
    store.add("/p", 1.0).unwrap();
    assert_eq!(store.weight("/p"), Some(4.0));
}

#[test]
fn purge_drops_missing_directories() {
    let sandbox = Sandbox::new();
    let alive = sandbox.mkdir("alive");
    let gone = sandbox.ghost("gone");

    let mut store = sandbox.empty_store();
    store.add(&alive, 1.0).unwrap();
    store.add(&gone, 5.0).unwrap();

    let removed = store.purge_missing();
    assert_eq!(removed, vec![gone]);
    assert_eq!(store.len(), 1);
    assert!(store.weight(&alive).is_some());
}

#[test]
fn failed_write_keeps_target_untouched() {
    let sandbox = Sandbox::new();
    // A directory we own sits where the data file should go, so the rename fails.
    let target = sandbox.data_path();
    std::fs::create_dir_all(target.join("keep")).unwrap();

    let mut store = sandbox.empty_store();
    store.add("/a", 1.0).unwrap();
    assert_eq!(store.save(Duration::hours(24)), SaveOutcome::Failed);

    assert!(target.is_dir());
    assert!(target.join("keep").is_dir());
    assert!(!sandbox.backup_path().exists());
    let names: Vec<String> = std::fs::read_dir(target.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["waymark.txt"]);
}

#[test]
fn unreadable_target_metadata_is_a_failure_not_a_skip() {
    let sandbox = Sandbox::new();
    sandbox.write_data("1\t/a\n");
    // Parent of the new data path is a regular file: metadata fails with ENOTDIR.
    let mut store = EntryStore::empty(sandbox.data_path().join("waymark.txt"));
    store.add("/b", 1.0).unwrap();

    assert_eq!(store.save(Duration::hours(24)), SaveOutcome::Failed);
    assert_eq!(
        std::fs::read_to_string(sandbox.data_path()).unwrap(),
        "1\t/a\n"
    );
}

#[cfg(unix)]
#[test]
fn foreign_owned_file_is_skipped() {
    // chown needs root; other users cannot build the fixture.
    if unsafe { libc::geteuid() } != 0 {
        return;
    }
    let sandbox = Sandbox::new();
    let mut store = sandbox.empty_store();
    store.add("/a", 1.0).unwrap();
    assert_eq!(store.save(Duration::hours(24)), SaveOutcome::Written);

    std::os::unix::fs::chown(sandbox.data_path(), Some(12345), None).unwrap();
    store.add("/b", 1.0).unwrap();
    assert_eq!(store.save(Duration::hours(24)), SaveOutcome::Skipped);
    assert_eq!(
        std::fs::read_to_string(sandbox.data_path()).unwrap(),
        "1\t/a\n"
    );
}
