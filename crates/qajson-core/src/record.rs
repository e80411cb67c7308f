//! # Record Mapping
//!
//! The [`Record`] trait and the two small helpers every record uses to
//! implement it: [`Fields`] reads keys out of a JSON object with precise
//! errors, [`Dict`] writes an object back out, skipping absent optionals.
//!
//! Keeping all type checks in [`Fields`] means each record's mapping
//! code is a flat list of field reads and writes that can be audited
//! line-by-line against the schema.

use serde_json::{Map, Number, Value};

use crate::error::ModelError;

/// A QAJSON record with a lossless JSON mapping.
pub trait Record: Sized {
    /// Record type name used in error messages.
    const NAME: &'static str;

    /// Build the record from a JSON object.
    ///
    /// Required keys must be present; optional keys that are absent or
    /// `null` become `None`. Unrecognised keys are ignored. The input is
    /// never modified.
    ///
    /// # Errors
    ///
    /// [`ModelError::MissingField`] for an absent required key,
    /// [`ModelError::InvalidType`] for a key holding the wrong JSON type.
    fn from_json(value: &Value) -> Result<Self, ModelError>;

    /// Render the record as a JSON object.
    ///
    /// Required keys are always present. Optional keys appear iff their
    /// value is `Some`. Keys follow canonical schema order.
    fn to_json(&self) -> Value;
}

/// Short JSON type name for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a list of records as a JSON array, preserving order.
pub(crate) fn list_json<T: Record>(items: &[T]) -> Value {
    Value::Array(items.iter().map(Record::to_json).collect())
}

/// Typed reader over the keys of one JSON object.
pub(crate) struct Fields<'a> {
    record: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Wrap `value`, which must be a JSON object.
    pub(crate) fn of(record: &'static str, value: &'a Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(map) => Ok(Self { record, map }),
            other => Err(ModelError::InvalidType {
                record,
                field: String::new(),
                expected: "object",
                found: json_type(other),
            }),
        }
    }

    fn missing(&self, key: &str) -> ModelError {
        ModelError::MissingField {
            record: self.record,
            field: key.to_string(),
        }
    }

    fn invalid(&self, key: &str, expected: &'static str, found: &Value) -> ModelError {
        ModelError::InvalidType {
            record: self.record,
            field: key.to_string(),
            expected,
            found: json_type(found),
        }
    }

    /// Value of an optional key; `null` counts as absent.
    fn present(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn as_string(&self, key: &str, value: &Value) -> Result<String, ModelError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(key, "string", value))
    }

    fn as_array(&self, key: &str, value: &'a Value) -> Result<&'a Vec<Value>, ModelError> {
        value
            .as_array()
            .ok_or_else(|| self.invalid(key, "array", value))
    }

    /// Raw value of a required key. JSON `null` is accepted.
    pub(crate) fn value(&self, key: &str) -> Result<&'a Value, ModelError> {
        self.map.get(key).ok_or_else(|| self.missing(key))
    }

    pub(crate) fn string(&self, key: &str) -> Result<String, ModelError> {
        let value = self.value(key)?;
        self.as_string(key, value)
    }

    pub(crate) fn opt_string(&self, key: &str) -> Result<Option<String>, ModelError> {
        self.present(key)
            .map(|v| self.as_string(key, v))
            .transpose()
    }

    pub(crate) fn record<T: Record>(&self, key: &str) -> Result<T, ModelError> {
        T::from_json(self.value(key)?)
    }

    pub(crate) fn opt_record<T: Record>(&self, key: &str) -> Result<Option<T>, ModelError> {
        self.present(key).map(T::from_json).transpose()
    }

    /// List that defaults to empty when the key is absent.
    pub(crate) fn list<T: Record>(&self, key: &str) -> Result<Vec<T>, ModelError> {
        Ok(self.opt_list(key)?.unwrap_or_default())
    }

    pub(crate) fn opt_list<T: Record>(&self, key: &str) -> Result<Option<Vec<T>>, ModelError> {
        self.present(key)
            .map(|v| -> Result<Vec<T>, ModelError> {
                self.as_array(key, v)?.iter().map(T::from_json).collect()
            })
            .transpose()
    }

    pub(crate) fn opt_strings(&self, key: &str) -> Result<Option<Vec<String>>, ModelError> {
        self.present(key)
            .map(|v| -> Result<Vec<String>, ModelError> {
                self.as_array(key, v)?
                    .iter()
                    .map(|item| self.as_string(key, item))
                    .collect()
            })
            .transpose()
    }

    pub(crate) fn opt_values(&self, key: &str) -> Result<Option<Vec<Value>>, ModelError> {
        self.present(key)
            .map(|v| self.as_array(key, v).cloned())
            .transpose()
    }

    pub(crate) fn opt_object(&self, key: &str) -> Result<Option<Map<String, Value>>, ModelError> {
        self.present(key)
            .map(|v| {
                v.as_object()
                    .cloned()
                    .ok_or_else(|| self.invalid(key, "object", v))
            })
            .transpose()
    }

    /// Integer field, kept as written. Integral floats such as `3.0` are
    /// accepted, matching the JSON Schema definition of `integer`.
    pub(crate) fn opt_integer(&self, key: &str) -> Result<Option<Number>, ModelError> {
        self.present(key)
            .map(|v| match v {
                Value::Number(n) if is_integral(n) => Ok(n.clone()),
                other => Err(self.invalid(key, "integer", other)),
            })
            .transpose()
    }

    /// Numeric field, kept as written so `50` and `50.0` stay distinct.
    pub(crate) fn opt_number(&self, key: &str) -> Result<Option<Number>, ModelError> {
        self.present(key)
            .map(|v| match v {
                Value::Number(n) => Ok(n.clone()),
                other => Err(self.invalid(key, "number", other)),
            })
            .transpose()
    }
}

/// True for any JSON number without a fractional part.
fn is_integral(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

/// Builder for a record's JSON object.
#[derive(Debug, Default)]
pub(crate) struct Dict(Map<String, Value>);

impl Dict {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Emit a required key.
    pub(crate) fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Emit an optional key only when it holds a value.
    pub(crate) fn optional<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.0.insert(key.to_string(), v.into());
        }
        self
    }

    pub(crate) fn build(self) -> Value {
        Value::Object(self.0)
    }
}

/// Implements `Serialize`/`Deserialize` for records by routing through
/// [`Record::to_json`] and [`Record::from_json`], so serde and the
/// explicit mapping can never disagree.
macro_rules! record_serde {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl serde::Serialize for $ty {
                fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serde::Serialize::serialize(&$crate::record::Record::to_json(self), serializer)
                }
            }

            impl<'de> serde::Deserialize<'de> for $ty {
                fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                    <$ty as $crate::record::Record>::from_json(&value).map_err(serde::de::Error::custom)
                }
            }
        )+
    };
}

pub(crate) use record_serde;
