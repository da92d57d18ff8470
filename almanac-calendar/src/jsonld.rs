//! Structured event metadata embedded as JSON-LD `<script>` blocks.
//!
//! Blocks are scanned in document order and the last `Event` node wins,
//! both within a block and across blocks. Unparseable blocks are skipped,
//! and so is any block holding a `null` node or a non-string `@type`, even
//! when it also contains a valid `Event`.

use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

use crate::time::normalize_time;

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("static selector")
});

/// Date and time read from a page's structured metadata; either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredEvent {
    /// `YYYY-MM-DD` when found.
    pub date: String,
    /// `HH:MM`, already passed through [`normalize_time`].
    pub time: String,
}

/// A JSON-LD block holds either one node or a list of nodes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LdBlock {
    Many(Vec<Value>),
    One(Value),
}

impl LdBlock {
    fn into_nodes(self) -> Vec<Value> {
        match self {
            LdBlock::Many(nodes) => nodes,
            LdBlock::One(node) => vec![node],
        }
    }
}

/// How one node of a block is treated during selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Event,
    Other,
    /// A `null` node or a set, non-string `@type`: the whole block is dropped.
    Malformed,
}

fn classify(node: &Value) -> NodeKind {
    let Value::Object(fields) = node else {
        return match node {
            Value::Null => NodeKind::Malformed,
            _ => NodeKind::Other,
        };
    };
    match fields.get("@type") {
        Some(Value::String(kind)) if kind.to_lowercase() == "event" => NodeKind::Event,
        None | Some(Value::Null) | Some(Value::Bool(false)) | Some(Value::String(_)) => {
            NodeKind::Other
        }
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => NodeKind::Other,
        Some(_) => NodeKind::Malformed,
    }
}

/// Last `Event` node of a block, or `None` when the block must be ignored.
fn select_event(nodes: &[Value]) -> Option<Option<&Value>> {
    let mut selected = None;
    for node in nodes {
        match classify(node) {
            NodeKind::Event => selected = Some(node),
            NodeKind::Other => {}
            NodeKind::Malformed => return None,
        }
    }
    Some(selected)
}

fn start_date(node: &Value) -> Option<&str> {
    node.get("startDate")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Scan a parsed page for JSON-LD `Event` metadata.
///
/// ```
/// use almanac_calendar::jsonld::extract_structured_event;
/// use scraper::Html;
///
/// let page = Html::parse_document(
///     r#"<script type="application/ld+json">{"@type":"Event","startDate":"2025-03-10T18:30:00"}</script>"#,
/// );
/// let found = extract_structured_event(&page);
/// assert_eq!(found.date, "2025-03-10");
/// assert_eq!(found.time, "18:30");
/// ```
pub fn extract_structured_event(document: &Html) -> StructuredEvent {
    let mut found = StructuredEvent::default();

    for script in document.select(&LD_JSON) {
        let raw: String = script.text().collect();
        let block = match serde_json::from_str::<LdBlock>(&raw) {
            Ok(block) => block,
            Err(err) => {
                tracing::trace!(error = %err, "calendar.jsonld.skip_block");
                continue;
            }
        };

        let nodes = block.into_nodes();
        let Some(selected) = select_event(&nodes) else {
            tracing::trace!("calendar.jsonld.malformed_block");
            continue;
        };

        if let Some(start) = selected.and_then(start_date) {
            apply_start_date(start, &mut found);
        }
    }

    found
}

/// `2025-03-10T18:30:00` sets the date and, when a time part exists, the time.
fn apply_start_date(start: &str, found: &mut StructuredEvent) {
    let mut parts = start.split('T');
    found.date = parts.next().unwrap_or_default().to_string();
    if let Some(clock) = parts.next().filter(|t| !t.is_empty()) {
        let hh_mm: String = clock.chars().take(5).collect();
        found.time = normalize_time(&hh_mm);
    }
}
