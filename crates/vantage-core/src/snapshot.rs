//! Dashboard statistics snapshot
//!
//! The backend computes one `StatSnapshot` per request. Parsing is tolerant:
//! a missing or malformed field becomes an empty breakdown (or a zero counter)
//! and a malformed entry inside a breakdown is skipped. Only invalid JSON
//! syntax is an error.
//!
//! Breakdowns keep the key order of the JSON object they were read from.
//! That order is the tie-break for every sort in the analytics engine and
//! drives the order of stacked columns, so it is stored as an explicit
//! sequence of pairs rather than a map.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;

/// Ordered category -> value mapping with unique keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown {
    entries: Vec<(String, f64)>,
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs in order. A repeated key keeps its first position and
    /// takes the last value.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut breakdown = Self::new();
        for (key, value) in pairs {
            breakdown.insert(key, value);
        }
        breakdown
    }

    /// Insert or overwrite a value, keeping the original position of the key
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all values
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// Lenient conversion from a JSON value
    ///
    /// Accepts an object (`{"Gold": 5}`), a list of `[key, value]` pairs, or a
    /// list of `{name|label|month, value|count}` objects. Anything else yields
    /// an empty breakdown.
    pub fn from_value(value: &Value) -> Self {
        let mut breakdown = Self::new();
        match value {
            Value::Object(map) => {
                for (key, raw) in map {
                    match number_from_value(raw) {
                        Some(v) => breakdown.insert(key.as_str(), v),
                        None => debug!(key = %key, "Skipping non-numeric breakdown entry"),
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    match pair_from_value(item) {
                        Some((key, v)) => breakdown.insert(key, v),
                        None => debug!("Skipping malformed breakdown entry"),
                    }
                }
            }
            Value::Null => {}
            other => debug!(kind = json_kind(other), "Ignoring malformed breakdown"),
        }
        breakdown
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Breakdown {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

impl<'de> Deserialize<'de> for Breakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Ordered row key -> (column key -> value) mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown2D {
    rows: Vec<(String, Breakdown)>,
}

impl Breakdown2D {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a row, keeping the original position of the key
    pub fn insert(&mut self, key: impl Into<String>, row: Breakdown) {
        let key = key.into();
        match self.rows.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = row,
            None => self.rows.push((key, row)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Breakdown> {
        self.rows.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Breakdown)> + '_ {
        self.rows.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every leaf value
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|(_, r)| r.total()).sum()
    }

    /// Lenient conversion from a JSON object of objects
    pub fn from_value(value: &Value) -> Self {
        let mut breakdown = Self::new();
        match value {
            Value::Object(map) => {
                for (key, inner) in map {
                    if inner.is_object() || inner.is_array() {
                        breakdown.insert(key.as_str(), Breakdown::from_value(inner));
                    } else {
                        debug!(key = %key, "Skipping malformed stacked row");
                    }
                }
            }
            Value::Null => {}
            other => debug!(kind = json_kind(other), "Ignoring malformed stacked breakdown"),
        }
        breakdown
    }
}

impl<K: Into<String>> FromIterator<(K, Breakdown)> for Breakdown2D {
    fn from_iter<I: IntoIterator<Item = (K, Breakdown)>>(iter: I) -> Self {
        let mut breakdown = Self::new();
        for (key, row) in iter {
            breakdown.insert(key, row);
        }
        breakdown
    }
}

impl Serialize for Breakdown2D {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.rows.iter().map(|(k, r)| (k, r)))
    }
}

impl<'de> Deserialize<'de> for Breakdown2D {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Lifecycle status of an OS/DB product
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LifecycleStatus {
    EndOfLife,
    Unapproved,
    /// Anything else, keeping the backend's label (empty when absent)
    Other(String),
}

impl Default for LifecycleStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl LifecycleStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::EndOfLife => "end_of_life",
            Self::Unapproved => "unapproved",
            Self::Other(label) => label.as_str(),
        }
    }

    /// Parse a backend status label; never fails
    pub fn parse(label: &str) -> Self {
        let normalized = label.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "end_of_life" | "eol" => Self::EndOfLife,
            "unapproved" => Self::Unapproved,
            _ => Self::Other(label.trim().to_string()),
        }
    }
}

impl FromStr for LifecycleStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LifecycleStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LifecycleStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Self::parse).unwrap_or_default())
    }
}

/// One OS/DB product row from the detailed list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsDbEntry {
    pub name: String,
    pub value: f64,
    pub status: LifecycleStatus,
}

impl OsDbEntry {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let name = obj.get("name")?.as_str()?.to_string();
        let value = number_from_value(obj.get("value")?)?;
        let status = obj
            .get("status")
            .and_then(Value::as_str)
            .map(LifecycleStatus::parse)
            .unwrap_or_default();
        Some(Self {
            name,
            value,
            status,
        })
    }
}

/// Raw statistics snapshot as served by `GET /api/dashboard/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_cis: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub active_cis: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub inactive_cis: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub recent_imports: u64,
    #[serde(default)]
    pub cis_by_type: Breakdown,
    #[serde(default)]
    pub cis_by_status: Breakdown,
    #[serde(default)]
    pub cis_by_sla: Breakdown,
    #[serde(default)]
    pub cost_by_cost_center: Breakdown,
    #[serde(default)]
    pub cost_by_center_and_type: Breakdown2D,
    #[serde(default)]
    pub cis_by_os_db: Breakdown,
    #[serde(default, deserialize_with = "lenient_details")]
    pub os_db_details: Vec<OsDbEntry>,
    #[serde(default)]
    pub growth_by_month: Breakdown,
}

impl StatSnapshot {
    /// Build from an already-parsed JSON value
    ///
    /// A non-object payload yields an empty snapshot.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            warn!(kind = json_kind(&value), "Snapshot payload is not an object, treating as empty");
            return Self::default();
        }
        match serde_json::from_value(value) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Snapshot could not be read, treating as empty");
                Self::default()
            }
        }
    }

    /// Parse snapshot JSON text. Only a JSON syntax error is reported.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(value))
    }

    /// Load a snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// True when no breakdown carries any entry
    pub fn is_empty(&self) -> bool {
        self.cis_by_type.is_empty()
            && self.cis_by_status.is_empty()
            && self.cis_by_sla.is_empty()
            && self.cost_by_cost_center.is_empty()
            && self.cost_by_center_and_type.is_empty()
            && self.cis_by_os_db.is_empty()
            && self.os_db_details.is_empty()
            && self.growth_by_month.is_empty()
    }
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value)
        .filter(|v| *v >= 0.0)
        .map(|v| {
            if v.fract() != 0.0 {
                debug!(value = v, "Rounding fractional counter");
            }
            v.round() as u64
        })
        .unwrap_or(0))
}

fn lenient_details<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<OsDbEntry>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(|item| {
            let entry = OsDbEntry::from_value(item);
            if entry.is_none() {
                debug!("Skipping malformed OS/DB detail entry");
            }
            entry
        })
        .collect())
}

/// Numbers and numeric strings; NaN and infinities are rejected
fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn pair_from_value(value: &Value) -> Option<(String, f64)> {
    match value {
        Value::Array(pair) if pair.len() == 2 => {
            Some((pair[0].as_str()?.to_string(), number_from_value(&pair[1])?))
        }
        Value::Object(obj) => {
            let key = ["name", "label", "month"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(Value::as_str))?;
            let v = ["value", "count", "amount"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(number_from_value))?;
            Some((key.to_string(), v))
        }
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
