//! Forgiving field decoders for engine payloads.
//!
//! A single bad number or timestamp must not sink a whole snapshot, so these
//! decode into `Option` and map anything unusable to `None`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number or numeric string -> `Some(Decimal)`; null, missing or junk -> `None`.
pub fn decimal<'de, D>(de: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(de)?;
    Ok(decimal_from_value(&raw))
}

pub fn decimal_from_value(raw: &Value) -> Option<Decimal> {
    match raw {
        // Number's Display keeps the literal digits, so 10.1 stays exactly 10.1
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// ISO-8601 (with or without offset), epoch millis, or `[y, m, d, h, mi, s, nanos]`.
pub fn timestamp<'de, D>(de: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(de)?;
    Ok(timestamp_from_value(&raw))
}

pub fn timestamp_from_value(raw: &Value) -> Option<NaiveDateTime> {
    match raw {
        Value::String(s) => parse_timestamp(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        Value::Array(parts) => from_parts(parts),
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| s.parse::<NaiveDateTime>().ok())
}

fn from_parts(parts: &[Value]) -> Option<NaiveDateTime> {
    let nums: Vec<i64> = parts.iter().map(Value::as_i64).collect::<Option<_>>()?;
    let at = |i: usize| nums.get(i).copied().unwrap_or(0);

    if nums.len() < 5 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        i32::try_from(at(0)).ok()?,
        u32::try_from(at(1)).ok()?,
        u32::try_from(at(2)).ok()?,
    )?;
    date.and_hms_nano_opt(
        u32::try_from(at(3)).ok()?,
        u32::try_from(at(4)).ok()?,
        u32::try_from(at(5)).ok()?,
        u32::try_from(at(6)).ok()?,
    )
}
