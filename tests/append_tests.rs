//! Row-wise append: order, associativity, schema checks, engine mixing.

use std::sync::Arc;

use arrow_array::{
    Array, ArrayRef, Float64Array, Int32Array, Int64Array, LargeStringArray, RecordBatch,
    StringArray, TimestampMillisecondArray,
};
use duoframe_core::types::Scalar;
use duoframe_core::{Engine, Error as CoreError};
use duoframe_frame::{Error, ErrorKind, Frame, Provenance};

use test_data_gen::{scores_batch, ticks_batch, DAY_MS, HOUR_MS};

fn ids(frame: &Frame) -> Vec<Scalar> {
    frame.to_legacy().unwrap().column("id").unwrap().values.clone()
}

#[test]
fn test_append_is_self_then_other() {
    let a = Frame::new(scores_batch(0, 2));
    let b = Frame::new(scores_batch(10, 3));

    let ab = a.append(&b).unwrap();
    assert_eq!(ab.shape(), (5, 3));
    assert_eq!(
        ids(&ab),
        vec![
            Scalar::I64(0),
            Scalar::I64(1),
            Scalar::I64(10),
            Scalar::I64(11),
            Scalar::I64(12)
        ]
    );
    // Inputs are untouched.
    assert_eq!(a.shape(), (2, 3));
    assert_eq!(b.shape(), (3, 3));
}

#[test]
fn test_append_is_associative() {
    for engine in Engine::ALL {
        let a = Frame::new(scores_batch(0, 2)).into_engine(engine).unwrap();
        let b = Frame::new(scores_batch(100, 4)).into_engine(engine).unwrap();
        let c = Frame::new(scores_batch(200, 1)).into_engine(engine).unwrap();

        let left = a.append(&b).unwrap().append(&c).unwrap();
        let right = a.append(&b.append(&c).unwrap()).unwrap();

        assert_eq!(left.shape(), (7, 3));
        assert_eq!(left.to_legacy().unwrap().rows().count(), 7);
        assert_eq!(
            left.to_legacy().unwrap().rows().collect::<Vec<_>>(),
            right.to_legacy().unwrap().rows().collect::<Vec<_>>(),
            "engine {}",
            engine
        );
    }
}

#[test]
fn test_append_mixed_engines_uses_left_engine() {
    let legacy = Frame::new(scores_batch(0, 2)).into_engine(Engine::Legacy).unwrap();
    let columnar = Frame::new(scores_batch(5, 2));

    assert_eq!(legacy.append(&columnar).unwrap().engine(), Engine::Legacy);
    assert_eq!(columnar.append(&legacy).unwrap().engine(), Engine::Columnar);
}

#[test]
fn test_append_carries_left_provenance() {
    let a = Frame::with_provenance(scores_batch(0, 1), Provenance::File("a.csv".into()));
    let b = Frame::with_provenance(scores_batch(1, 1), Provenance::File("b.csv".into()));
    assert_eq!(
        a.append(&b).unwrap().provenance(),
        &Provenance::File("a.csv".into())
    );
}

#[test]
fn test_append_nullability_widens() {
    // Rows 0..3 have no null score; row 3 does.
    let no_nulls = Frame::new(scores_batch(0, 3));
    let with_null = Frame::new(scores_batch(3, 1));

    let out = no_nulls.append(&with_null).unwrap();
    let batch = out.to_columnar().unwrap();
    assert!(batch.schema().field_with_name("score").unwrap().is_nullable());
    assert_eq!(batch.column(2).null_count(), 1);
}

#[test]
fn test_append_renamed_column_is_schema_mismatch() {
    let a = Frame::new(
        RecordBatch::try_from_iter(vec![("id", Arc::new(Int64Array::from(vec![1])) as ArrayRef)])
            .unwrap(),
    );
    let b = Frame::new(
        RecordBatch::try_from_iter(vec![("key", Arc::new(Int64Array::from(vec![2])) as ArrayRef)])
            .unwrap(),
    );

    let err = a.append(&b).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
    match err {
        Error::Core(CoreError::SchemaMismatch { left, right }) => {
            assert_eq!(left, vec!["id"]);
            assert_eq!(right, vec!["key"]);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_append_is_not_union_by_name() {
    let a = Frame::new(scores_batch(0, 1));
    let b = Frame::new(
        RecordBatch::try_from_iter(vec![
            ("id", Arc::new(Int64Array::from(vec![1])) as ArrayRef),
            ("name", Arc::new(StringArray::from(vec!["x"])) as ArrayRef),
        ])
        .unwrap(),
    );
    assert_eq!(a.append(&b).unwrap_err().kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn test_append_type_mismatch_is_schema_mismatch() {
    let a = Frame::new(
        RecordBatch::try_from_iter(vec![("n", Arc::new(Int64Array::from(vec![1])) as ArrayRef)])
            .unwrap(),
    );
    let b = Frame::new(
        RecordBatch::try_from_iter(vec![("n", Arc::new(Int32Array::from(vec![2])) as ArrayRef)])
            .unwrap(),
    );
    assert_eq!(a.append(&b).unwrap_err().kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn test_append_accepts_large_utf8_on_the_right() {
    let a = Frame::new(
        RecordBatch::try_from_iter(vec![("s", Arc::new(StringArray::from(vec!["a"])) as ArrayRef)])
            .unwrap(),
    );
    let b = Frame::new(
        RecordBatch::try_from_iter(vec![(
            "s",
            Arc::new(LargeStringArray::from(vec!["b"])) as ArrayRef,
        )])
        .unwrap(),
    );

    let out = a.append(&b).unwrap();
    let rows = out.to_legacy().unwrap();
    assert_eq!(
        rows.column("s").unwrap().values,
        vec![Scalar::Str("a".into()), Scalar::Str("b".into())]
    );
}

#[test]
fn test_append_timestamp_columns_without_legacy_conversion() {
    let a = Frame::new(ticks_batch(0, 2));
    let b = Frame::new(ticks_batch(5, 3));

    let ab = a.append(&b).unwrap();
    assert_eq!(ab.engine(), Engine::Columnar);
    assert_eq!(ab.shape(), (5, 2));

    let batch = ab.to_columnar().unwrap();
    let at = batch
        .column(0)
        .as_any()
        .downcast_ref::<TimestampMillisecondArray>()
        .unwrap();
    assert_eq!(at.value(1), DAY_MS + HOUR_MS);
    assert_eq!(at.value(2), 5 * DAY_MS + HOUR_MS);
}

#[test]
fn test_append_timestamp_against_integer_column_is_mismatch() {
    let ticks = Frame::new(ticks_batch(0, 1));
    let ints = Frame::new(
        RecordBatch::try_from_iter(vec![
            ("at", Arc::new(Int64Array::from(vec![HOUR_MS])) as ArrayRef),
            ("v", Arc::new(Float64Array::from(vec![1.0])) as ArrayRef),
        ])
        .unwrap(),
    );

    let err = ticks.append(&ints).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);

    // Legacy on the left: the mismatch is reported before any conversion.
    let legacy = ints.into_engine(Engine::Legacy).unwrap();
    let err = legacy.append(&ticks).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}
