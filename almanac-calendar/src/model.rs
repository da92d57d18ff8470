use serde::{Deserialize, Serialize};

/// One card on a listing page, before its detail page is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    pub title: String,
    /// Raw text, no guaranteed format.
    pub listing_date: String,
    /// Already normalized; may be empty.
    pub listing_time: String,
    /// Absolute URL of the detail page.
    pub detail_url: String,
}

/// Fields read from a detail page. A failed fetch leaves all of them empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailResult {
    pub description: String,
    pub date: String,
    pub time: String,
}

/// A merged event as written to the output document.
///
/// `time` and `description` are omitted from the JSON when absent, never
/// written as `""` or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The persisted document: `{ "events": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOutput {
    pub events: Vec<EventRecord>,
}
