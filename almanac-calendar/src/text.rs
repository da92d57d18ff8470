use scraper::Html;

/// Flatten an HTML fragment to its text content, trimmed at both ends.
///
/// Internal whitespace and line breaks are kept as they appear in the markup.
///
/// ```
/// use almanac_calendar::text::clean_description;
///
/// assert_eq!(clean_description("<p>Talk on <b>graphs</b>.</p>"), "Talk on graphs.");
/// assert_eq!(clean_description(""), "");
/// ```
pub fn clean_description(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        return String::new();
    }
    let parsed = Html::parse_fragment(fragment);
    let text: String = parsed.root_element().text().collect();
    text.trim().to_string()
}
