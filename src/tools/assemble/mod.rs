//! Record Assembler

mod tests;
pub mod types;
mod utils;

pub use types::*;
pub(crate) use utils::format_timestamp;
use utils::*;

use chrono::{DateTime, Utc};
use url::Url;

use crate::tools::containers::Container;
use crate::tools::extract::extract_field;
use crate::tools::types::Fingerprint;

/// Build a record from one container, stamped with the current time.
pub fn assemble(container: &Container<'_>, schema: &RecordSchema, base: Option<&Url>) -> Option<Record> {
    assemble_at(container, schema, base, Utc::now())
}

/// Build a record from one container.
///
/// Returns `None` when every identity field came back empty; there is
/// nothing worth recording.
pub fn assemble_at(
    container: &Container<'_>,
    schema: &RecordSchema,
    base: Option<&Url>,
    observed_at: DateTime<Utc>,
) -> Option<Record> {
    let el = container.element();

    let mut values: Vec<(String, String)> = schema
        .fields
        .iter()
        .map(|f| (f.name.clone(), extract_field(f, el, base)))
        .collect();

    let identity: Vec<&str> = schema
        .identity
        .iter()
        .map(|name| {
            values
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .unwrap_or("")
        })
        .collect();
    if identity.iter().all(|v| v.is_empty()) {
        return None;
    }
    let fingerprint = Fingerprint::of(&identity);

    let status = schema.status.as_ref().map(|rule| {
        let status = classify_status(el, rule);
        values.push((rule.field.clone(), status.as_str().to_string()));
        status
    });
    values.push((schema.observed_at_field.clone(), format_timestamp(observed_at)));

    Some(Record {
        values,
        fingerprint,
        status,
        observed_at,
    })
}
