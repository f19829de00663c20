use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::tools::extract::FieldSpec;
use crate::tools::types::Fingerprint;

/// Presence derived from a container's free text.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Online,
    Reachable,
    Offline,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Online => "online",
            Status::Reachable => "reachable",
            Status::Offline => "offline",
        }
    }
}

/// Phrases that classify a container; "online" is checked before "reachable".
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StatusRule {
    pub field: String,
    pub online: String,
    pub reachable: String,
}

impl Default for StatusRule {
    fn default() -> Self {
        Self {
            field: "status".into(),
            online: "status is online".into(),
            reachable: "status is reachable".into(),
        }
    }
}

/// Columns of one record type and which of them carry identity.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub fields: Vec<FieldSpec>,
    /// Ordered subset of `fields` hashed into the fingerprint.
    pub identity: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusRule>,
    pub observed_at_field: String,
}

impl RecordSchema {
    /// Output column names in their fixed export order.
    pub fn columns(&self) -> Vec<String> {
        let mut cols: Vec<String> = self.fields.iter().map(|f| f.name.clone()).collect();
        if let Some(rule) = &self.status {
            cols.push(rule.field.clone());
        }
        cols.push(self.observed_at_field.clone());
        cols
    }
}

/// One extracted result.
///
/// Serializes as a flat object in column order; the fingerprint stays internal.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub(crate) values: Vec<(String, String)>,
    pub(crate) fingerprint: Fingerprint,
    pub(crate) status: Option<Status>,
    pub(crate) observed_at: DateTime<Utc>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn values(&self) -> &[(String, String)] {
        &self.values
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
