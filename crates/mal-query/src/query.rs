//! Validated search and detail queries
//!
//! Raw caller input is normalized parameter by parameter. Recoverable
//! problems (limit out of range, negative offset, unknown fields) are fixed
//! up and logged; only an empty search text or a non-positive id fail.

use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::fields::{Diagnostic, FieldPolicy, FieldSelection};

/// Largest page the search endpoint returns
pub const MAX_LIMIT: u32 = 100;

/// A search request ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    query_text: String,
    limit: u32,
    offset: u64,
    fields: FieldSelection,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<Diagnostic>,
}

impl ListQuery {
    /// Normalize raw search parameters.
    ///
    /// A limit outside `[1, 100]` becomes 100 and is recorded as a
    /// diagnostic. A negative offset becomes 0 with a warning only.
    pub fn build<S: AsRef<str>>(
        raw_text: &str,
        raw_limit: i64,
        raw_offset: i64,
        raw_fields: &[S],
        policy: &FieldPolicy,
    ) -> Result<Self> {
        if raw_text.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let mut diagnostics = Vec::new();

        let limit = match u32::try_from(raw_limit) {
            Ok(limit) if (1..=MAX_LIMIT).contains(&limit) => limit,
            _ => {
                warn!(given = raw_limit, used = MAX_LIMIT, "limit out of range");
                diagnostics.push(Diagnostic::LimitOutOfRange { given: raw_limit });
                MAX_LIMIT
            }
        };

        let offset = u64::try_from(raw_offset).unwrap_or_else(|_| {
            warn!(given = raw_offset, "negative offset, using 0");
            0
        });

        let (fields, field_diagnostics) = policy.select(raw_fields);
        diagnostics.extend(field_diagnostics);

        Ok(Self {
            query_text: raw_text.to_owned(),
            limit,
            offset,
            fields,
            diagnostics,
        })
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn fields(&self) -> &FieldSelection {
        &self.fields
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Query string for the search endpoint. `q` is percent-encoded; the
    /// field list is sent with literal commas.
    pub fn query_string(&self) -> String {
        format!(
            "q={}&limit={}&offset={}&fields={}",
            urlencoding::encode(&self.query_text),
            self.limit,
            self.offset,
            self.fields.to_param(),
        )
    }
}

/// A single-anime request ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailQuery {
    id: u64,
    fields: FieldSelection,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<Diagnostic>,
}

impl DetailQuery {
    /// Validate the id and select fields. Fails before any request is made
    /// when `raw_id <= 0`.
    pub fn build<S: AsRef<str>>(raw_id: i64, raw_fields: &[S], policy: &FieldPolicy) -> Result<Self> {
        let id = match u64::try_from(raw_id) {
            Ok(id) if id > 0 => id,
            _ => return Err(Error::InvalidId(raw_id)),
        };
        let (fields, diagnostics) = policy.select(raw_fields);
        Ok(Self {
            id,
            fields,
            diagnostics,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn fields(&self) -> &FieldSelection {
        &self.fields
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn query_string(&self) -> String {
        format!("fields={}", self.fields.to_param())
    }
}
