//! Candidate metadata.
//!
//! A flat key/value map deserialized straight from the `metadata` table of a
//! node in the config file. Getters are lenient: a value of the wrong shape
//! reads as zero/false instead of failing.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl MetadataValue {
    /// Read as a duration: numbers are seconds, strings may carry unit
    /// suffixes. Non-positive numbers read as zero; `None` when the value
    /// cannot be a duration or does not fit in one.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            MetadataValue::Int(v) if *v > 0 => Some(Duration::from_secs(*v as u64)),
            MetadataValue::Float(v) if *v > 0.0 => Duration::try_from_secs_f64(*v).ok(),
            MetadataValue::Int(_) | MetadataValue::Float(_) => Some(Duration::ZERO),
            MetadataValue::String(s) => parse_duration(s),
            MetadataValue::Bool(_) => None,
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        MetadataValue::Bool(v)
    }
}

impl From<i32> for MetadataValue {
    fn from(v: i32) -> Self {
        MetadataValue::Int(v as i64)
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        MetadataValue::Int(v)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Float(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        MetadataValue::String(v.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        MetadataValue::String(v)
    }
}

/// Key/value metadata attached to a candidate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    values: HashMap<String, MetadataValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<MetadataValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<MetadataValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Integer value of `key`; numeric strings are parsed, floats truncated.
    pub fn get_int(&self, key: &str) -> i64 {
        match self.values.get(key) {
            Some(MetadataValue::Int(v)) => *v,
            Some(MetadataValue::Float(v)) => *v as i64,
            Some(MetadataValue::Bool(v)) => *v as i64,
            Some(MetadataValue::String(s)) => s.trim().parse().unwrap_or(0),
            None => 0,
        }
    }

    /// Boolean value of `key`.
    pub fn get_bool(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(MetadataValue::Bool(v)) => *v,
            Some(MetadataValue::Int(v)) => *v != 0,
            Some(MetadataValue::Float(v)) => *v != 0.0,
            Some(MetadataValue::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            ),
            None => false,
        }
    }

    /// Duration value of `key`. Numbers are seconds, strings may carry
    /// unit suffixes (`"500ms"`, `"1m30s"`).
    pub fn get_duration(&self, key: &str) -> Duration {
        self.values
            .get(key)
            .and_then(MetadataValue::as_duration)
            .unwrap_or(Duration::ZERO)
    }
}

impl FromIterator<(String, MetadataValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, MetadataValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Parse a duration such as `"10"`, `"250ms"`, `"1.5s"` or `"1h2m3s"`.
///
/// A bare number is taken as seconds. Returns `None` on malformed input.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(secs) = input.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_end == 0 {
            return None;
        }
        let value: f64 = rest[..num_end].parse().ok()?;
        rest = &rest[num_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_end] {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return None,
        };
        rest = &rest[unit_end..];

        total = total.checked_add(Duration::try_from_secs_f64(value * scale).ok()?)?;
    }
    Some(total)
}
