//! Tests for Parquet reading and writing

#[cfg(feature = "parquet")]
use duoframe_core::Engine;
#[cfg(feature = "parquet")]
use duoframe_frame::{ErrorKind, Frame, Loader};
#[cfg(feature = "parquet")]
use duoframe_io::readers::parquet::ParquetReader;
#[cfg(feature = "parquet")]
use duoframe_io::writers::parquet::ParquetCompression;
#[cfg(feature = "parquet")]
use duoframe_io::{Converted, FormatOptions};
#[cfg(feature = "parquet")]
use test_data_gen::{all_types_row_batch, scores_batch, temp_dir, ticks_batch};

#[test]
#[cfg(feature = "parquet")]
fn test_parquet_write_read_roundtrip() {
    let dir = temp_dir();
    let path = dir.path().join("scores.parquet");
    let frame = Frame::new(scores_batch(0, 50));

    frame.write_to_path(&path, None, &FormatOptions::new()).unwrap();
    let back = Loader::new()
        .load_frame(&path, Engine::Columnar, None, &FormatOptions::new())
        .unwrap();

    assert_eq!(back.shape(), (50, 3));
    assert_eq!(back.to_legacy().unwrap(), frame.to_legacy().unwrap());
}

#[test]
#[cfg(feature = "parquet")]
fn test_parquet_all_types_survive() {
    let rows = all_types_row_batch();
    let frame = Frame::new(rows.clone());
    let bytes = match frame.convert("parquet", &FormatOptions::new()).unwrap() {
        Converted::Bytes(b) => b,
        other => panic!("expected bytes, got {:?}", other),
    };

    let dir = temp_dir();
    let path = dir.path().join("all.parquet");
    std::fs::write(&path, bytes).unwrap();

    let back = Loader::new()
        .load_frame(&path, Engine::Legacy, None, &FormatOptions::new())
        .unwrap();
    assert_eq!(back.to_legacy().unwrap(), rows);
}

#[test]
#[cfg(feature = "parquet")]
fn test_parquet_compression_options() {
    let frame = Frame::new(scores_batch(0, 20));
    for codec in ["none", "snappy", "zstd"] {
        let opts = FormatOptions::new().with("compression", codec);
        let out = frame.convert("parquet", &opts).unwrap();
        assert!(matches!(out, Converted::Bytes(ref b) if b.starts_with(b"PAR1")));
    }
    assert!("brotli-9000".parse::<ParquetCompression>().is_err());
}

#[test]
#[cfg(feature = "parquet")]
fn test_parquet_reader_projection_and_limit() {
    let dir = temp_dir();
    let path = dir.path().join("scores.parquet");
    Frame::new(scores_batch(0, 30))
        .write_to_path(&path, None, &FormatOptions::new().with("row_group_size", 7))
        .unwrap();

    let opts = FormatOptions::new()
        .with("columns", serde_json::json!(["name", "id"]))
        .with("n_rows", 10);
    let frame = Loader::new()
        .load_frame(&path, Engine::Columnar, None, &opts)
        .unwrap();
    assert_eq!(frame.shape(), (10, 2));
    // Projected columns come back in file order.
    assert_eq!(frame.columns(), vec!["id", "name"]);

    let mut reader = ParquetReader::from_path(&path, None, 8).unwrap();
    assert_eq!(reader.schema().fields().len(), 3);
    let mut total = 0;
    while let Some(batch) = reader.next_record_batch().unwrap() {
        total += batch.num_rows();
    }
    assert_eq!(total, 30);
}

#[test]
#[cfg(feature = "parquet")]
fn test_parquet_member_of_archive() {
    let dir = temp_dir();
    let pq = dir.path().join("inner.parquet");
    Frame::new(scores_batch(0, 4))
        .write_to_path(&pq, None, &FormatOptions::new())
        .unwrap();

    let bytes = std::fs::read(&pq).unwrap();
    let archive = dir.path().join("bundle.zip");
    {
        use std::io::Write;
        let mut zip = zip::ZipWriter::new(std::fs::File::create(&archive).unwrap());
        zip.start_file("inner.parquet", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(&bytes).unwrap();
        zip.finish().unwrap();
    }

    let frame = Loader::new()
        .load_member(&archive, "inner.parquet", Engine::Legacy, None, &FormatOptions::new())
        .unwrap();
    assert_eq!(frame.shape(), (4, 3));
}

#[test]
#[cfg(feature = "parquet")]
fn test_parquet_timestamps_append_and_project() {
    let dir = temp_dir();
    let path = dir.path().join("ticks.parquet");
    Frame::new(ticks_batch(19723, 4))
        .write_to_path(&path, None, &FormatOptions::new())
        .unwrap();

    let loader = Loader::new();
    let a = loader
        .load_frame(&path, Engine::Columnar, None, &FormatOptions::new())
        .unwrap();
    let b = loader
        .load_frame(&path, Engine::Columnar, None, &FormatOptions::new())
        .unwrap();

    let both = a.append(&b).unwrap();
    assert_eq!(both.shape(), (8, 2));

    let ts = both.project_timeseries("at", "v").unwrap();
    assert_eq!(ts.len(), 8);
    assert_eq!(
        ts.dates().next(),
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
    );

    let csv = both.convert("csv", &FormatOptions::new()).unwrap();
    assert!(matches!(csv, Converted::Text(ref t) if t.contains("2024-01-04T01:00:00")));

    // The legacy engine has no timestamp type.
    assert!(loader
        .load_frame(&path, Engine::Legacy, None, &FormatOptions::new())
        .is_err());
}

#[test]
#[cfg(feature = "parquet")]
fn test_parquet_zero_sizes_are_invalid_options() {
    let frame = Frame::new(scores_batch(0, 5));
    let err = frame
        .convert("parquet", &FormatOptions::new().with("row_group_size", 0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOption);
    assert!(err.to_string().contains("row_group_size"), "{}", err);

    let dir = temp_dir();
    let path = dir.path().join("scores.parquet");
    frame.write_to_path(&path, None, &FormatOptions::new()).unwrap();

    let err = Loader::new()
        .load_frame(
            &path,
            Engine::Columnar,
            None,
            &FormatOptions::new().with("batch_size", 0),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOption);
    assert!(ParquetReader::from_path(&path, None, 0).is_err());
}
