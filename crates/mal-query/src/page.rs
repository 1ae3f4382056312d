//! One page of search results

use serde::{Deserialize, Serialize};

use crate::query::ListQuery;
use crate::record::ShapedRecord;

/// Provider links to the neighbouring pages. Never followed automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

/// Shaped records of a search together with the query that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    pub query: ListQuery,
    pub records: Vec<ShapedRecord>,
    pub paging: Paging,
}

impl ResultPage {
    pub fn has_next(&self) -> bool {
        self.paging.next.is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
