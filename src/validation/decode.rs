//! Classification of descriptor fields before any rule runs.
//!
//! Every field the rules read is decoded into a [`Field`]: present with the expected shape,
//! present with another shape, or absent. Rules emit their diagnostic from the variant and
//! then fall back to [`Field::valid_or_default`].
use serde_json::{Map, Value};

use crate::{constants::UnixTime, time::parse_timestamp};

/// Outcome of decoding one descriptor field.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Valid(T),
    WrongType,
    Missing,
}

impl<T> Field<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    pub fn valid(self) -> Option<T> {
        match self {
            Field::Valid(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_valid(&self) -> Option<&T> {
        match self {
            Field::Valid(v) => Some(v),
            _ => None,
        }
    }

    pub fn valid_or_default(self) -> T
    where
        T: Default,
    {
        self.valid().unwrap_or_default()
    }
}

fn decode<T>(
    object: &Map<String, Value>,
    key: &str,
    f: impl FnOnce(&Value) -> Option<T>,
) -> Field<T> {
    match object.get(key) {
        None => Field::Missing,
        Some(value) => f(value).map_or(Field::WrongType, Field::Valid),
    }
}

pub fn string(object: &Map<String, Value>, key: &str) -> Field<String> {
    decode(object, key, |v| v.as_str().map(str::to_string))
}

/// A list whose every element is a string
pub fn string_list(object: &Map<String, Value>, key: &str) -> Field<Vec<String>> {
    decode(object, key, as_string_list)
}

/// A timestamp given as unix seconds or as an ISO 8601 string
pub fn timestamp(object: &Map<String, Value>, key: &str) -> Field<UnixTime> {
    decode(object, key, |v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_timestamp(s).ok(),
        _ => None,
    })
}

pub fn mapping<'a>(object: &'a Map<String, Value>, key: &str) -> Field<&'a Map<String, Value>> {
    match object.get(key) {
        None => Field::Missing,
        Some(Value::Object(map)) => Field::Valid(map),
        Some(_) => Field::WrongType,
    }
}

/// Legacy good-sonde count: either a number or a list of sonde ids
pub fn count_or_list(object: &Map<String, Value>, key: &str) -> Field<usize> {
    decode(object, key, |v| match v {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    })
}

/// Sonde id list of one flag. An explicit `null` (a YAML key without value) is an empty list.
pub fn sonde_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Null => Some(Vec::new()),
        other => as_string_list(other),
    }
}

fn as_string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}
