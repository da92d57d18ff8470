use scraper::Html;

use crate::jsonld::extract_structured_event;
use crate::model::DetailResult;
use crate::selectors::SiteSelectors;
use crate::text::clean_description;

/// Read description and structured date/time from a fetched detail page.
///
/// Missing pieces are left empty; nothing here can fail.
pub fn parse_detail(html: &str, selectors: &SiteSelectors) -> DetailResult {
    let document = Html::parse_document(html);

    let description = document
        .select(&selectors.description)
        .next()
        .map(|el| clean_description(&el.inner_html()))
        .unwrap_or_default();

    let structured = extract_structured_event(&document);

    DetailResult {
        description,
        date: structured.date,
        time: structured.time,
    }
}
