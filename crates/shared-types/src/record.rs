use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A related record flattened to a JSON object.
pub type Record = Map<String, Value>;

/// Rows that render themselves as a flat JSON object.
///
/// Each implementation lists its fields explicitly. Timestamps are rendered
/// as RFC 3339 text and enum-like columns as their stored value.
pub trait RecordFields {
    fn record_fields(&self) -> Record;
}

/// Standard textual form of a timestamp, e.g. `2024-03-01T09:30:00Z`.
pub fn render_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Builder used by [`RecordFields`] implementations.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: Record,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a scalar verbatim.
    pub fn value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn uuid(self, name: &str, value: Uuid) -> Self {
        self.value(name, value.to_string())
    }

    pub fn opt_uuid(self, name: &str, value: Option<Uuid>) -> Self {
        self.value(name, value.map(|u| u.to_string()))
    }

    pub fn timestamp(self, name: &str, value: &DateTime<Utc>) -> Self {
        self.value(name, render_timestamp(value))
    }

    pub fn opt_timestamp(self, name: &str, value: Option<&DateTime<Utc>>) -> Self {
        self.value(name, value.map(render_timestamp))
    }

    /// Copy a JSON column verbatim; `None` renders as `null`.
    pub fn json(self, name: &str, value: Option<&Value>) -> Self {
        self.value(name, value.cloned().unwrap_or(Value::Null))
    }

    pub fn build(self) -> Record {
        self.fields
    }
}
