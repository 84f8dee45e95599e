//! Column type inference shared by the text-ish readers.
//!
//! Text cells (csv, excel headers) go through `infer_text_column`; already
//! typed scalars (json, excel cells) go through `unify_scalars`.

use chrono::NaiveDate;
use duoframe_core::schema::DataType;
use duoframe_core::types::{Column, Scalar};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Days since the UNIX epoch for an ISO `YYYY-MM-DD` string.
pub fn parse_date32(s: &str) -> Option<i32> {
    let d = NaiveDate::parse_from_str(s, DATE_FORMAT).ok()?;
    i32::try_from((d - epoch()).num_days()).ok()
}

pub fn date32_to_string(days: i32) -> String {
    (epoch() + chrono::Duration::days(days as i64))
        .format(DATE_FORMAT)
        .to_string()
}

/// Build a typed column from raw text cells. `None` cells are nulls.
///
/// Candidates are tried narrowest first: Int64, Float64, Boolean, Date32,
/// then Utf8. With `infer == false` everything stays Utf8.
pub fn infer_text_column(name: String, cells: Vec<Option<String>>, infer: bool) -> Column {
    let present = || cells.iter().flatten();

    let data_type = if !infer || present().next().is_none() {
        DataType::Utf8
    } else if present().all(|s| s.parse::<i64>().is_ok()) {
        DataType::Int64
    } else if present().all(|s| s.parse::<f64>().is_ok()) {
        DataType::Float64
    } else if present().all(|s| parse_bool(s).is_some()) {
        DataType::Boolean
    } else if present().all(|s| parse_date32(s).is_some()) {
        DataType::Date32
    } else {
        DataType::Utf8
    };

    let values = cells
        .into_iter()
        .map(|cell| match cell {
            None => Scalar::Null,
            Some(s) => match data_type {
                DataType::Int64 => s.parse().map(Scalar::I64).unwrap_or(Scalar::Null),
                DataType::Float64 => s.parse().map(Scalar::F64).unwrap_or(Scalar::Null),
                DataType::Boolean => parse_bool(&s).map(Scalar::Bool).unwrap_or(Scalar::Null),
                DataType::Date32 => parse_date32(&s).map(Scalar::Date32).unwrap_or(Scalar::Null),
                _ => Scalar::Str(s),
            },
        })
        .collect();

    Column::new(name, data_type, values)
}

/// Build a column from scalars of possibly mixed types.
///
/// Integers and floats unify to Float64; any other mix is stringified.
pub fn unify_scalars(name: String, values: Vec<Scalar>) -> Column {
    let mut seen: Option<DataType> = None;
    let mut mixed = false;
    for dt in values.iter().filter_map(Scalar::data_type) {
        seen = match seen {
            None => Some(dt),
            Some(prev) if prev == dt => Some(prev),
            Some(prev) if prev.is_numeric() && dt.is_numeric() => Some(DataType::Float64),
            Some(prev) => {
                mixed = true;
                Some(prev)
            }
        };
    }

    let data_type = match (seen, mixed) {
        (None, _) | (_, true) => DataType::Utf8,
        (Some(dt), false) => dt,
    };

    let values = values
        .into_iter()
        .map(|v| match data_type {
            _ if v.is_null() => Scalar::Null,
            DataType::Float64 => v.as_f64().map(Scalar::F64).unwrap_or(Scalar::Null),
            DataType::Utf8 => match v {
                Scalar::Str(_) => v,
                other => Scalar::Str(scalar_to_text(&other)),
            },
            _ => v,
        })
        .collect();

    Column::new(name, data_type, values)
}

pub fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Plain-text rendering used by the csv writer and by stringified mixes.
pub fn scalar_to_text(v: &Scalar) -> String {
    match v {
        Scalar::Null => String::new(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::I32(i) => i.to_string(),
        Scalar::I64(i) => i.to_string(),
        Scalar::F32(f) => f.to_string(),
        Scalar::F64(f) => f.to_string(),
        Scalar::Str(s) => s.clone(),
        Scalar::Bin(b) => format!("[binary {} bytes]", b.len()),
        Scalar::Date32(d) => date32_to_string(*d),
        Scalar::Date64(ms) => chrono::DateTime::from_timestamp_millis(*ms)
            .map(|dt| dt.naive_utc().to_string())
            .unwrap_or_else(|| ms.to_string()),
    }
}
