//! Stats Snapshot - parsed `mntr` output
//!
//! Parses the raw reply of the `mntr` four-letter command into a typed
//! key/value snapshot. The server reports one `key<TAB>value` line per
//! counter; values are integers for everything except a few textual fields
//! such as `zk_server_state`.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

// =============================================================================
// Metric Value
// =============================================================================

/// A single reported value: integer when the server output parses as one,
/// otherwise the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Numeric counter or gauge value
    Int(i64),
    /// Non-numeric value (e.g. `zk_server_state` reports `leader`/`follower`)
    Text(String),
}

impl MetricValue {
    /// Numeric view of the value; `None` for textual values.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetricValue::Int(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }

    /// True when the value carries a number.
    pub fn is_int(&self) -> bool {
        matches!(self, MetricValue::Int(_))
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{}", v),
            MetricValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Int(v)
    }
}

// =============================================================================
// Stats Snapshot
// =============================================================================

/// One complete, internally consistent set of metric values produced by a
/// single fetch+parse cycle. Immutable once produced; the cache replaces it
/// wholesale on the next refresh, never merges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatsSnapshot {
    values: HashMap<String, MetricValue>,
}

impl StatsSnapshot {
    /// Parse raw `mntr` output into a snapshot.
    ///
    /// Lines that do not split on a single tab into a non-empty key and a
    /// value are discarded; a torn or garbled reply degrades to fewer
    /// entries, never to a parse failure. Duplicate keys keep the last
    /// occurrence.
    pub fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);

        let mut values = HashMap::new();
        for line in text.lines() {
            match parse_line(line) {
                Some((key, value)) => {
                    values.insert(key.to_string(), value);
                }
                None => {
                    if !line.trim().is_empty() {
                        debug!("discarding malformed stats line: {:?}", line);
                    }
                }
            }
        }

        StatsSnapshot { values }
    }

    /// Look up a metric by name.
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.values.get(name)
    }

    /// Number of parsed entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no entries were parsed (or after a failed refresh).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all parsed entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Split one report line into a trimmed key and coerced value.
///
/// Exactly two tab-separated fields are required and the key must be
/// non-empty after trimming.
fn parse_line(line: &str) -> Option<(&str, MetricValue)> {
    let mut fields = line.split('\t');
    let key = fields.next()?.trim();
    let value = fields.next()?.trim();
    if fields.next().is_some() || key.is_empty() {
        return None;
    }

    let value = match value.parse::<i64>() {
        Ok(n) => MetricValue::Int(n),
        Err(_) => MetricValue::Text(value.to_string()),
    };

    Some((key, value))
}
