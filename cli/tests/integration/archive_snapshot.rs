//! Working directory snapshots read back with `tar` + `flate2`.

#![cfg(unix)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::io::Read;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use stagehand_cli::infra::executor::Executor;

struct Entry {
    kind: tar::EntryType,
    mode: u32,
    link: Option<PathBuf>,
    body: String,
}

fn read_back(bytes: &[u8]) -> BTreeMap<String, Entry> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    let mut entries = BTreeMap::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let name = entry.path().unwrap().to_string_lossy().trim_end_matches('/').to_string();
        let header = entry.header();
        let kind = header.entry_type();
        let mode = header.mode().unwrap() & 0o777;
        let link = entry.link_name().unwrap().map(|l| l.into_owned());
        let mut body = String::new();
        if kind == tar::EntryType::Regular {
            entry.read_to_string(&mut body).unwrap();
        }
        entries.insert(
            name,
            Entry {
                kind,
                mode,
                link,
                body,
            },
        );
    }
    entries
}

/// A stage directory with a nested module, an executable, links pointing
/// inside and outside, and one run log.
fn populate(work: &Path, outside: &Path) {
    std::fs::write(work.join("main.tf"), "resource {}\n").unwrap();
    std::fs::create_dir_all(work.join("modules/bootstrap")).unwrap();
    std::fs::write(work.join("modules/bootstrap/main.tf"), "module {}\n").unwrap();
    let hook = work.join("hook.sh");
    std::fs::write(&hook, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o750)).unwrap();

    symlink("main.tf", work.join("inside-link")).unwrap();
    symlink("../main.tf", work.join("modules/up-link")).unwrap();
    std::fs::write(outside.join("secret.txt"), "outside\n").unwrap();
    symlink(outside.join("secret.txt"), work.join("outside-abs")).unwrap();
    symlink("../../escape", work.join("outside-rel")).unwrap();

    std::fs::write(work.join("logs/4242.log"), "engine output\n").unwrap();
}

#[test]
fn test_archive_keeps_contents_and_modes() {
    let root = tempfile::TempDir::new().unwrap();
    let work = root.path().join("stage");
    let outside = tempfile::TempDir::new().unwrap();
    let exec = Executor::with_binary(&work, PathBuf::from("/bin/sh")).unwrap();
    populate(&work, outside.path());

    let mut bytes = Vec::new();
    exec.archive(&mut bytes, false).unwrap();
    let entries = read_back(&bytes);

    assert_eq!(entries["main.tf"].body, "resource {}\n");
    assert_eq!(entries["modules/bootstrap/main.tf"].body, "module {}\n");
    assert_eq!(entries["modules"].kind, tar::EntryType::Directory);
    assert_eq!(entries["hook.sh"].mode, 0o750);
}

#[test]
fn test_archive_skips_run_logs() {
    let root = tempfile::TempDir::new().unwrap();
    let work = root.path().join("stage");
    let outside = tempfile::TempDir::new().unwrap();
    let exec = Executor::with_binary(&work, PathBuf::from("/bin/sh")).unwrap();
    populate(&work, outside.path());

    let mut bytes = Vec::new();
    exec.archive(&mut bytes, false).unwrap();
    let entries = read_back(&bytes);

    assert!(entries.keys().all(|k| !k.starts_with("logs")), "{:?}", entries.keys());
}

#[test]
fn test_archive_keeps_only_links_that_stay_inside() {
    let root = tempfile::TempDir::new().unwrap();
    let work = root.path().join("stage");
    let outside = tempfile::TempDir::new().unwrap();
    let exec = Executor::with_binary(&work, PathBuf::from("/bin/sh")).unwrap();
    populate(&work, outside.path());

    let mut bytes = Vec::new();
    exec.archive(&mut bytes, false).unwrap();
    let entries = read_back(&bytes);

    let inside = &entries["inside-link"];
    assert_eq!(inside.kind, tar::EntryType::Symlink);
    assert_eq!(inside.link.as_deref(), Some(Path::new("main.tf")));
    assert_eq!(
        entries["modules/up-link"].link.as_deref(),
        Some(Path::new("../main.tf"))
    );
    assert!(!entries.contains_key("outside-abs"));
    assert!(!entries.contains_key("outside-rel"));
    assert!(entries.values().all(|e| e.body != "outside\n"));
}

#[test]
fn test_archive_nests_under_top_level_directory() {
    let root = tempfile::TempDir::new().unwrap();
    let work = root.path().join("stage");
    let outside = tempfile::TempDir::new().unwrap();
    let exec = Executor::with_binary(&work, PathBuf::from("/bin/sh")).unwrap();
    populate(&work, outside.path());

    let mut bytes = Vec::new();
    exec.archive(&mut bytes, true).unwrap();
    let entries = read_back(&bytes);

    assert_eq!(entries["stage"].kind, tar::EntryType::Directory);
    assert!(entries.contains_key("stage/main.tf"));
    assert!(entries.contains_key("stage/inside-link"));
    assert!(entries.keys().all(|k| k.starts_with("stage")), "{:?}", entries.keys());
    assert!(!entries.contains_key("stage/logs"));
}
