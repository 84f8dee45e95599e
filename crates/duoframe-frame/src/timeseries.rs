//! `(date, value)` projections of a frame.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use duoframe_core::arrow::row_batch_to_record_batch;
use duoframe_core::schema::DataType;
use duoframe_core::types::{Column, RowBatch, Scalar};
use duoframe_core::Error as CoreError;
use duoframe_io::readers::infer::epoch;

use crate::error::Result;
use crate::frame::Frame;

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Date-ordered pairs taken from two columns of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    value_type: DataType,
    points: Vec<(NaiveDate, Scalar)>,
}

impl TimeSeries {
    /// Sorts `points` by date. Equal dates keep their input order.
    pub fn new(value_type: DataType, mut points: Vec<(NaiveDate, Scalar)>) -> Self {
        points.sort_by_key(|(d, _)| *d);
        Self { value_type, points }
    }

    /// Pair `dates` with `values`, coercing each date. Rows in error messages
    /// are zero-based.
    pub(crate) fn from_columns(
        date_col: &str,
        dates: Vec<Scalar>,
        value_type: DataType,
        values: Vec<Scalar>,
    ) -> Result<Self> {
        let points = dates
            .into_iter()
            .zip(values)
            .enumerate()
            .map(|(row, (d, v))| -> Result<(NaiveDate, Scalar)> {
                let date = coerce_date(&d).ok_or_else(|| {
                    CoreError::Schema(format!(
                        "column '{}' row {}: cannot read {:?} as a date",
                        date_col, row, d
                    ))
                })?;
                Ok((date, v))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(value_type, points))
    }

    pub fn points(&self) -> &[(NaiveDate, Scalar)] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|(d, _)| *d)
    }

    pub fn values(&self) -> impl Iterator<Item = &Scalar> + '_ {
        self.points.iter().map(|(_, v)| v)
    }

    pub fn value_type(&self) -> DataType {
        self.value_type
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Two-column columnar frame: a `Date32` column named `date_name` and the
    /// values under `value_name`.
    pub fn to_frame(&self, date_name: &str, value_name: &str) -> Result<Frame> {
        let epoch = epoch();
        let dates = self
            .points
            .iter()
            .map(|(d, _)| Scalar::Date32((*d - epoch).num_days() as i32))
            .collect();
        let values = self.points.iter().map(|(_, v)| v.clone()).collect();

        let mut date_col = Column::new(date_name, DataType::Date32, dates);
        date_col.nullable = false;
        let batch = RowBatch::try_new(vec![
            date_col,
            Column::new(value_name, self.value_type, values),
        ])?;
        Ok(Frame::new(row_batch_to_record_batch(&batch)?))
    }
}

/// Calendar date of a scalar: `Date32` days, `Date64` millis, or an ISO
/// `YYYY-MM-DD[ HH:MM:SS]` string.
fn coerce_date(v: &Scalar) -> Option<NaiveDate> {
    match v {
        Scalar::Date32(days) => epoch().checked_add_signed(chrono::Duration::days(*days as i64)),
        Scalar::Date64(ms) => DateTime::from_timestamp_millis(*ms).map(|dt| dt.date_naive()),
        Scalar::Str(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, DATE_FMT)
                .ok()
                .or_else(|| NaiveDateTime::parse_from_str(s, DATETIME_FMT).ok().map(|dt| dt.date()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn coerces_supported_date_forms() {
        assert_eq!(coerce_date(&Scalar::Date32(0)), Some(ymd(1970, 1, 1)));
        assert_eq!(coerce_date(&Scalar::Date32(19_723)), Some(ymd(2024, 1, 1)));
        assert_eq!(
            coerce_date(&Scalar::Date64(86_400_000 * 2)),
            Some(ymd(1970, 1, 3))
        );
        assert_eq!(coerce_date(&Scalar::Str("2024-02-29".into())), Some(ymd(2024, 2, 29)));
        assert_eq!(
            coerce_date(&Scalar::Str("2024-02-29 13:45:00".into())),
            Some(ymd(2024, 2, 29))
        );
        assert_eq!(coerce_date(&Scalar::Str("29/02/2024".into())), None);
        assert_eq!(coerce_date(&Scalar::Null), None);
        assert_eq!(coerce_date(&Scalar::I64(5)), None);
    }

    #[test]
    fn sort_is_stable_on_equal_dates() {
        let ts = TimeSeries::new(
            DataType::Int64,
            vec![
                (ymd(2024, 1, 2), Scalar::I64(1)),
                (ymd(2024, 1, 1), Scalar::I64(2)),
                (ymd(2024, 1, 2), Scalar::I64(3)),
            ],
        );
        let values: Vec<_> = ts.values().cloned().collect();
        assert_eq!(values, vec![Scalar::I64(2), Scalar::I64(1), Scalar::I64(3)]);
    }

    #[test]
    fn null_date_is_a_schema_error() {
        let err = TimeSeries::from_columns(
            "d",
            vec![Scalar::Str("2024-01-01".into()), Scalar::Null],
            DataType::Int64,
            vec![Scalar::I64(1), Scalar::I64(2)],
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Schema);
    }

    #[test]
    fn to_frame_names_both_columns() {
        let ts = TimeSeries::new(
            DataType::Float64,
            vec![(ymd(2024, 3, 1), Scalar::F64(1.5)), (ymd(2024, 3, 2), Scalar::Null)],
        );
        let frame = ts.to_frame("date", "close").unwrap();
        assert_eq!(frame.columns(), vec!["date".to_string(), "close".to_string()]);
        assert_eq!(frame.shape(), (2, 2));
    }
}
