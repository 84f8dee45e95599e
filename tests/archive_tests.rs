//! Zip member loading and temp directory cleanup.

use std::path::PathBuf;

use duoframe_core::config::FrameConfig;
use duoframe_core::Engine;
use duoframe_frame::{Error, ErrorKind, Loader, Provenance};
use duoframe_io::archive::{list_members, open_member};
use duoframe_io::{with_member, Error as IoError, FormatOptions};

use test_data_gen::{dir_entries, temp_dir, write_zip, SMALL_CSV};

/// Loader whose extraction dirs land under `root`, so cleanup is observable.
fn loader_in(root: PathBuf) -> Loader {
    Loader::new().with_config(FrameConfig {
        default_engine: Engine::Columnar,
        temp_root: Some(root),
    })
}

#[test]
fn test_member_load_cleans_up_after_success() {
    let work = temp_dir();
    let scratch = temp_dir();
    let archive = write_zip(work.path(), "data.zip", &[("a.csv", SMALL_CSV)]);

    let frame = loader_in(scratch.path().to_path_buf())
        .load_member(&archive, "a.csv", Engine::Legacy, None, &FormatOptions::new())
        .unwrap();

    assert_eq!(frame.shape(), (3, 2));
    assert_eq!(frame.engine(), Engine::Legacy);
    assert!(dir_entries(scratch.path()).is_empty());
}

#[test]
fn test_missing_member_is_member_not_found_and_cleans_up() {
    let work = temp_dir();
    let scratch = temp_dir();
    let archive = write_zip(work.path(), "data.zip", &[("a.csv", SMALL_CSV)]);

    let err = loader_in(scratch.path().to_path_buf())
        .load_member(&archive, "b.csv", Engine::Columnar, None, &FormatOptions::new())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MemberNotFound);
    match &err {
        Error::Io(IoError::MemberNotFound { member, archive: path }) => {
            assert_eq!(member, "b.csv");
            assert_eq!(path, &archive);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(err.to_string().contains("'b.csv' not in zip-file"));
    assert!(dir_entries(scratch.path()).is_empty());
}

#[test]
fn test_reader_failure_inside_archive_still_cleans_up() {
    let work = temp_dir();
    let scratch = temp_dir();
    let archive = write_zip(work.path(), "data.zip", &[("broken.json", "{not json")]);

    let err = loader_in(scratch.path().to_path_buf())
        .load_member(&archive, "broken.json", Engine::Columnar, None, &FormatOptions::new())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Other);
    assert!(dir_entries(scratch.path()).is_empty());
}

#[test]
fn test_member_reader_follows_member_suffix() {
    let work = temp_dir();
    let archive = write_zip(
        work.path(),
        "mixed.zip",
        &[
            ("a.csv", SMALL_CSV),
            ("nested/b.jsonl", "{\"x\": 1}\n{\"x\": 2}\n"),
        ],
    );

    let frame = Loader::new()
        .load_member(&archive, "nested/b.jsonl", Engine::Columnar, None, &FormatOptions::new())
        .unwrap();

    assert_eq!(frame.shape(), (2, 1));
    assert_eq!(
        frame.provenance(),
        &Provenance::Archive {
            archive: archive.clone(),
            member: "nested/b.jsonl".into(),
        }
    );
    // Metadata describes the archive itself.
    let meta = frame.metadata().unwrap();
    assert_eq!(meta.path, archive);
    assert_eq!(meta.size, std::fs::metadata(&archive).unwrap().len());
}

#[test]
fn test_open_member_handle_owns_the_directory() {
    let work = temp_dir();
    let scratch = temp_dir();
    let archive = write_zip(work.path(), "data.zip", &[("a.csv", SMALL_CSV), ("b.csv", SMALL_CSV)]);

    let handle = open_member(&archive, "b.csv", Some(scratch.path())).unwrap();
    let root = handle.root().to_path_buf();
    assert!(handle.path().is_file());
    // The whole archive is extracted, not just the requested member.
    assert!(root.join("a.csv").is_file());
    assert_eq!(handle.member(), "b.csv");

    drop(handle);
    assert!(!root.exists());
    assert!(dir_entries(scratch.path()).is_empty());
}

#[test]
fn test_with_member_removes_dir_even_when_closure_fails() {
    let work = temp_dir();
    let scratch = temp_dir();
    let archive = write_zip(work.path(), "data.zip", &[("a.csv", SMALL_CSV)]);

    let mut seen = None;
    let result: Result<(), IoError> = with_member(&archive, "a.csv", Some(scratch.path()), |p| {
        seen = Some(p.to_path_buf());
        Err(IoError::Schema("boom".into()))
    });

    assert!(result.is_err());
    let seen = seen.unwrap();
    assert!(!seen.exists());
    assert!(dir_entries(scratch.path()).is_empty());
}

#[test]
fn test_list_members_in_archive_order() {
    let work = temp_dir();
    let archive = write_zip(
        work.path(),
        "data.zip",
        &[("z.csv", SMALL_CSV), ("a.csv", SMALL_CSV), ("dir/m.json", "[]")],
    );
    assert_eq!(list_members(&archive).unwrap(), vec!["z.csv", "a.csv", "dir/m.json"]);
}

#[test]
fn test_not_a_zip_is_an_error() {
    let work = temp_dir();
    let fake = test_data_gen::write_file(work.path(), "fake.zip", "plain text");
    let err = Loader::new()
        .load_member(&fake, "a.csv", Engine::Columnar, None, &FormatOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::Io(IoError::Zip(_))));
}
