//! Field allow-lists
//!
//! Every request asks for the default fields, followed by whichever caller
//! fields the endpoint's optional allow-list accepts. Anything else is
//! dropped and reported as a `Diagnostic` rather than failing the request.

use common::telemetry;
use serde::Serialize;
use tracing::warn;

/// Fields every record carries
pub const DEFAULT_FIELDS: &[&str] = &["id", "title", "main_picture"];

/// Optional fields accepted by the search endpoint
pub const LIST_OPTIONAL_FIELDS: &[&str] = &[
    "alternative_titles",
    "start_date",
    "end_date",
    "synopsis",
    "mean",
    "rank",
    "popularity",
    "num_list_users",
    "num_scoring_users",
    "nsfw",
    "genres",
    "created_at",
    "updated_at",
    "media_type",
    "status",
    "num_episodes",
    "start_season",
    "broadcast",
    "source",
    "average_episode_duration",
    "rating",
    "studios",
];

/// Optional fields only the detail endpoint accepts, on top of the list ones
pub const DETAIL_ONLY_FIELDS: &[&str] = &[
    "pictures",
    "background",
    "related_anime",
    "related_manga",
    "recommendations",
    "statistics",
];

/// A normalization the query builder applied instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Limit outside `[1, 100]`, replaced by 100
    LimitOutOfRange { given: i64 },
    /// Caller field not in the optional allow-list (or a default)
    FieldRejected { field: String },
}

impl Diagnostic {
    /// Parameter or field name the diagnostic is about.
    pub fn subject(&self) -> &str {
        match self {
            Diagnostic::LimitOutOfRange { .. } => "limit",
            Diagnostic::FieldRejected { field } => field,
        }
    }
}

/// Ordered, de-duplicated list of fields sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSelection(Vec<String>);

impl FieldSelection {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f == name)
    }

    /// Comma-joined value of the `fields` query parameter.
    pub fn to_param(&self) -> String {
        self.0.join(",")
    }
}

/// Default and optional fields for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPolicy {
    defaults: Vec<String>,
    optional: Vec<String>,
}

impl FieldPolicy {
    pub fn new<D, O>(defaults: D, optional: O) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            defaults: defaults.into_iter().map(Into::into).collect(),
            optional: optional.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy of the search endpoint.
    pub fn anime_list() -> Self {
        Self::new(DEFAULT_FIELDS.iter().copied(), LIST_OPTIONAL_FIELDS.iter().copied())
    }

    /// Policy of the single-anime endpoint.
    pub fn anime_details() -> Self {
        Self::new(
            DEFAULT_FIELDS.iter().copied(),
            LIST_OPTIONAL_FIELDS
                .iter()
                .chain(DETAIL_ONLY_FIELDS)
                .copied(),
        )
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    pub fn is_optional(&self, name: &str) -> bool {
        self.optional.iter().any(|f| f == name)
    }

    /// Defaults followed by the accepted caller fields in first-seen order.
    ///
    /// Repeats of an accepted field are skipped silently. Every other field
    /// that is not in the optional allow-list, defaults included, is dropped
    /// with a `FieldRejected` diagnostic.
    pub fn select<S: AsRef<str>>(&self, raw_fields: &[S]) -> (FieldSelection, Vec<Diagnostic>) {
        let mut selected = self.defaults.clone();
        let mut diagnostics = Vec::new();

        for field in raw_fields {
            let field = field.as_ref();
            if self.is_optional(field) && !self.defaults.iter().any(|d| d == field) {
                if !selected.iter().any(|s| s == field) {
                    selected.push(field.to_owned());
                }
                continue;
            }
            warn!(field, "dropping field outside the allow-list");
            telemetry::record_field_rejection();
            diagnostics.push(Diagnostic::FieldRejected {
                field: field.to_owned(),
            });
        }

        (FieldSelection(selected), diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(selection: &FieldSelection) -> Vec<&str> {
        selection.as_slice().iter().map(String::as_str).collect()
    }

    #[test]
    fn no_caller_fields_yields_defaults() {
        let (selection, diagnostics) = FieldPolicy::anime_list().select::<&str>(&[]);
        assert_eq!(names(&selection), ["id", "title", "main_picture"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn accepted_fields_keep_first_seen_order() {
        let (selection, diagnostics) =
            FieldPolicy::anime_list().select(&["rank", "synopsis", "mean", "synopsis"]);
        assert_eq!(
            names(&selection),
            ["id", "title", "main_picture", "rank", "synopsis", "mean"]
        );
        assert!(diagnostics.is_empty(), "repeats are not diagnostics");
    }

    #[test]
    fn unknown_and_default_fields_are_rejected() {
        let (selection, diagnostics) =
            FieldPolicy::anime_list().select(&["title", "bogus_field", "genres"]);
        assert_eq!(names(&selection), ["id", "title", "main_picture", "genres"]);
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::FieldRejected { field: "title".into() },
                Diagnostic::FieldRejected { field: "bogus_field".into() },
            ]
        );
    }

    #[test]
    fn detail_policy_accepts_detail_only_fields() {
        let (selection, diagnostics) =
            FieldPolicy::anime_details().select(&["statistics", "related_anime", "studios"]);
        assert_eq!(
            names(&selection),
            ["id", "title", "main_picture", "statistics", "related_anime", "studios"]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn list_policy_rejects_detail_only_fields() {
        for field in DETAIL_ONLY_FIELDS {
            let (selection, diagnostics) = FieldPolicy::anime_list().select(&[*field]);
            assert!(!selection.contains(field));
            assert_eq!(diagnostics.len(), 1, "{field}");
        }
    }

    #[test]
    fn field_param_is_comma_joined() {
        let (selection, _) = FieldPolicy::anime_list().select(&["synopsis"]);
        assert_eq!(selection.to_param(), "id,title,main_picture,synopsis");
    }

    #[test]
    fn custom_policy() {
        let policy = FieldPolicy::new(["id"], ["name"]);
        let (selection, diagnostics) = policy.select(&["name", "title"]);
        assert_eq!(names(&selection), ["id", "name"]);
        assert_eq!(diagnostics[0].subject(), "title");
    }
}
