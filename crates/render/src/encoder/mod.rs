//! JSON response encoder.
//!
//! [`Encoder::default_value`] converts a single non-JSON value one step
//! (first matching rule wins); [`Encoder::convert_for_json`] applies it
//! recursively through lists and maps; [`Encoder::encode`] finishes with a
//! projection onto `serde_json::Value`.

mod fallback;
mod value;

use std::str::FromStr;

use serde_json::{Map, Number};

pub use fallback::{format_date, format_datetime, format_duration, format_naive_datetime, format_time};
pub use value::{
    AsJson, CallableBool, Decimal, DictView, EnumMember, Field, LazyQuery, Opaque, Value, ValueSet,
};

use crate::error::EncodeError;

/// What `convert_for_json` does with a leaf no rule can convert.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum FallbackMode {
    /// Fail with [`EncodeError::Unsupported`].
    #[default]
    Strict,
    /// Return the leaf unchanged. It will still fail when projected to JSON.
    Lenient,
}

impl FromStr for FallbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(FallbackMode::Strict),
            "lenient" => Ok(FallbackMode::Lenient),
            other => Err(format!("unknown fallback mode {other:?} (expected strict or lenient)")),
        }
    }
}

/// Stateless encoder; the fallback mode is fixed at construction.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Encoder {
    mode: FallbackMode,
}

impl Encoder {
    pub fn new(mode: FallbackMode) -> Self {
        Self { mode }
    }

    pub fn strict() -> Self {
        Self::new(FallbackMode::Strict)
    }

    pub fn lenient() -> Self {
        Self::new(FallbackMode::Lenient)
    }

    pub fn mode(&self) -> FallbackMode {
        self.mode
    }

    /// Convert one value a single step towards JSON.
    ///
    /// Native JSON values have no rule of their own and are reported as
    /// unsupported, like any other unknown category.
    pub fn default_value(&self, value: &Value) -> Result<Value, EncodeError> {
        match value {
            Value::Field(Field::Decimal(d)) => Ok(Value::Str(d.to_string())),
            Value::Field(Field::Char(s)) => Ok(Value::Str(s.clone())),
            Value::Field(Field::Integer(i) | Field::Auto(i)) => Ok(Value::Int(*i)),
            Value::Object(obj) => Ok(obj.as_json()),
            Value::Query(query) => Ok(Value::List(query.evaluate())),
            Value::Set(set) => Ok(Value::list(set.iter().cloned())),
            Value::Uuid(uuid) => Ok(Value::Str(uuid.hyphenated().to_string())),
            Value::Bytes(bytes) => Ok(Value::Str(std::str::from_utf8(bytes)?.to_owned())),
            Value::CallableBool(b) => Ok(Value::Bool(b.get())),
            Value::AnonymousUser => Ok(Value::Null),
            Value::Enum(member) => Ok(Value::Str(member.name().to_owned())),
            Value::DictView(view) => Ok(view.to_list()),
            other => fallback::default_value(other),
        }
    }

    /// Normalize `value` into native JSON categories.
    ///
    /// With `recursive`, map keys, map values and list items are converted
    /// too; without it, containers come back as they are.
    pub fn convert_for_json(&self, value: &Value, recursive: bool) -> Result<Value, EncodeError> {
        if recursive {
            match value {
                Value::Map(entries) => {
                    return entries
                        .iter()
                        .map(|(k, v)| {
                            Ok((self.convert_for_json(k, true)?, self.convert_for_json(v, true)?))
                        })
                        .collect::<Result<Vec<_>, EncodeError>>()
                        .map(Value::Map);
                }
                Value::List(items) => {
                    return items
                        .iter()
                        .map(|item| self.convert_for_json(item, true))
                        .collect::<Result<Vec<_>, EncodeError>>()
                        .map(Value::List);
                }
                _ => {}
            }
        }

        if value.is_native() {
            return Ok(value.clone());
        }

        match self.default_value(value) {
            Ok(converted) => self.convert_for_json(&converted, true),
            Err(EncodeError::Unsupported { type_name }) if self.mode == FallbackMode::Lenient => {
                tracing::debug!(%type_name, "passing unencodable value through unchanged");
                Ok(value.clone())
            }
            Err(e) => Err(e),
        }
    }

    /// Encode `value` into a JSON document.
    pub fn encode(&self, value: &Value) -> Result<serde_json::Value, EncodeError> {
        let converted = self.convert_for_json(value, true)?;
        to_json(&converted)
    }

    /// Encode `value` and serialize it to a UTF-8 string.
    pub fn encode_to_string(&self, value: &Value) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(&self.encode(value)?)?)
    }
}

/// Project an already converted value onto plain JSON.
fn to_json(value: &Value) -> Result<serde_json::Value, EncodeError> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Int(i) => Ok(serde_json::Value::from(*i)),
        Value::UInt(u) => Ok(serde_json::Value::from(*u)),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or(EncodeError::NonFiniteFloat(*f)),
        Value::Str(s) => Ok(serde_json::Value::String(s.clone())),
        Value::List(items) => items
            .iter()
            .map(to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(serde_json::Value::Array),
        Value::Map(entries) => {
            let mut map = Map::new();
            for (k, v) in entries {
                map.insert(key_to_string(k)?, to_json(v)?);
            }
            Ok(serde_json::Value::Object(map))
        }
        other => Err(EncodeError::NotJsonRepresentable {
            type_name: other.type_name().to_owned(),
        }),
    }
}

fn key_to_string(key: &Value) -> Result<String, EncodeError> {
    match key {
        Value::Str(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::UInt(u) => Ok(u.to_string()),
        Value::Float(f) => Number::from_f64(*f)
            .map(|n| n.to_string())
            .ok_or(EncodeError::NonFiniteFloat(*f)),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(EncodeError::UnsupportedKey {
            type_name: other.type_name().to_owned(),
        }),
    }
}
