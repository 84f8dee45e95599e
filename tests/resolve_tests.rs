//! Format resolution: hint, suffix, excel aliases, csv fallback.

use std::path::Path;

use arrow_array::RecordBatch;
use duoframe_io::registry::{CSV, EXCEL};
use duoframe_io::resolve::suffix;
use duoframe_io::{resolve_reader, resolve_writer, Error, FormatOptions, ReaderRegistry, WriterRegistry};

fn reader_name(registry: &ReaderRegistry, path: &str, hint: Option<&str>) -> String {
    resolve_reader(registry, Path::new(path), hint)
        .expect("resolution failed")
        .name
}

fn empty_reader(_: &Path, _: &FormatOptions) -> duoframe_io::Result<RecordBatch> {
    Ok(RecordBatch::new_empty(std::sync::Arc::new(arrow_schema::Schema::empty())))
}

#[test]
fn test_registered_suffixes_resolve_to_their_reader() {
    let registry = ReaderRegistry::new();
    for name in registry.names() {
        if name == EXCEL {
            continue;
        }
        let path = format!("data/file.{}", name);
        assert_eq!(reader_name(&registry, &path, None), name, "suffix .{}", name);
    }
}

#[test]
fn test_excel_suffixes() {
    let registry = ReaderRegistry::new();
    assert_eq!(reader_name(&registry, "book.xls", None), EXCEL);
    assert_eq!(reader_name(&registry, "book.xlsx", None), EXCEL);
    // `.excel` is not an excel suffix, but it does name a registered reader.
    assert_eq!(reader_name(&registry, "book.excel", None), EXCEL);
}

#[test]
fn test_unregistered_or_missing_suffix_falls_back_to_csv() {
    let registry = ReaderRegistry::new();
    assert_eq!(reader_name(&registry, "notes.txt", None), CSV);
    assert_eq!(reader_name(&registry, "dump.dat", None), CSV);
    assert_eq!(reader_name(&registry, "README", None), CSV);
    assert_eq!(reader_name(&registry, "UPPER.JSON", None), CSV);
}

#[test]
fn test_hint_overrides_suffix() {
    let registry = ReaderRegistry::new();
    assert_eq!(reader_name(&registry, "rows.csv", Some("jsonl")), "jsonl");
    assert_eq!(reader_name(&registry, "no_suffix", Some("json")), "json");
}

#[test]
fn test_unknown_hint_is_unsupported_format() {
    let registry = ReaderRegistry::new();
    let err = resolve_reader(&registry, Path::new("rows.csv"), Some("feather")).unwrap_err();
    match err {
        Error::UnsupportedFormat(name) => assert_eq!(name, "feather"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn test_fallback_without_csv_entry_is_unsupported_format() {
    let registry = ReaderRegistry::empty();
    let err = resolve_reader(&registry, Path::new("rows.txt"), None).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(ref n) if n == CSV));
}

#[test]
fn test_custom_reader_is_found_by_suffix() {
    let mut registry = ReaderRegistry::new();
    assert_eq!(reader_name(&registry, "table.tsv", None), CSV);
    registry.register("tsv", empty_reader);
    assert_eq!(reader_name(&registry, "table.tsv", None), "tsv");
}

#[test]
fn test_writer_resolution_mirrors_readers() {
    let writers = WriterRegistry::new();
    let name = |p: &str, h: Option<&str>| {
        resolve_writer(&writers, Path::new(p), h).expect("resolution failed").name
    };
    assert_eq!(name("out.json", None), "json");
    assert_eq!(name("out.ndjson", None), "ndjson");
    assert_eq!(name("out.txt", None), CSV);
    assert_eq!(name("out.txt", Some("jsonl")), "jsonl");
}

#[test]
fn test_suffix_helper() {
    assert_eq!(suffix(Path::new("a.b.csv")).as_deref(), Some(".csv"));
    assert_eq!(suffix(Path::new("dir.d/file")), None);
}
