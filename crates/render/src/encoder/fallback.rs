//! Base conversions for temporal and decimal values.
//!
//! Temporal values are rendered in ISO 8601 with millisecond precision;
//! a UTC offset is written as `Z`. Durations use the `P{d}DT{h}H{m}M{s}S`
//! form.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use super::Value;
use crate::error::EncodeError;

pub(super) fn default_value(value: &Value) -> Result<Value, EncodeError> {
    let text = match value {
        Value::DateTime(dt) => format_datetime(dt),
        Value::NaiveDateTime(dt) => format_naive_datetime(dt),
        Value::Date(d) => format_date(d),
        Value::Time(t) => format_time(t),
        Value::Duration(d) => format_duration(*d),
        Value::Decimal(d) => d.to_string(),
        other => return Err(EncodeError::unsupported(other.type_name())),
    };
    Ok(Value::Str(text))
}

fn millis_suffix(nanos: u32) -> String {
    let micros = (nanos % 1_000_000_000) / 1_000;
    if micros == 0 {
        String::new()
    } else {
        format!(".{:03}", micros / 1_000)
    }
}

pub fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    let offset = if dt.offset().local_minus_utc() == 0 {
        "Z".to_string()
    } else {
        dt.format("%:z").to_string()
    };
    format!(
        "{}{}{}",
        dt.format("%Y-%m-%dT%H:%M:%S"),
        millis_suffix(dt.nanosecond()),
        offset
    )
}

pub fn format_naive_datetime(dt: &NaiveDateTime) -> String {
    format!(
        "{}{}",
        dt.format("%Y-%m-%dT%H:%M:%S"),
        millis_suffix(dt.nanosecond())
    )
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn format_time(t: &NaiveTime) -> String {
    format!("{}{}", t.format("%H:%M:%S"), millis_suffix(t.nanosecond()))
}

pub fn format_duration(d: TimeDelta) -> String {
    let (sign, d) = if d < TimeDelta::zero() { ("-", -d) } else { ("", d) };

    let total_seconds = d.num_seconds();
    let micros = d.subsec_nanos() / 1_000;
    let days = total_seconds / 86_400;
    let rem = total_seconds % 86_400;
    let (hours, minutes, seconds) = (rem / 3_600, (rem % 3_600) / 60, rem % 60);

    let fraction = if micros == 0 {
        String::new()
    } else {
        format!(".{micros:06}")
    };
    format!("{sign}P{days}DT{hours:02}H{minutes:02}M{seconds:02}{fraction}S")
}
