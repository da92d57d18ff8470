use scraper::Html;

use crate::model::{DetailResult, EventCard, EventRecord};
use crate::selectors::{SiteSelectors, text_of};
use crate::time::normalize_time;

/// Extract every event card from a listing page, in document order.
pub fn parse_listing(html: &str, selectors: &SiteSelectors, origin: &str) -> Vec<EventCard> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.card)
        .map(|card| {
            let href = card.value().attr("href").unwrap_or_default();
            EventCard {
                title: text_of(card, &selectors.title),
                listing_date: text_of(card, &selectors.date),
                listing_time: normalize_time(&text_of(card, &selectors.time)),
                detail_url: resolve_detail_url(origin, href),
            }
        })
        .collect()
}

/// Links starting with `http` are kept, anything else is prefixed with `origin`.
pub fn resolve_detail_url(origin: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http") {
        return href.to_string();
    }
    let origin = origin.trim_end_matches('/');
    if href.is_empty() || href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/{href}")
    }
}

/// Combine a card with its detail result.
///
/// Detail values win when non-empty (a placeholder detail time counts as
/// empty); the chosen time is normalized once more, and empty
/// `time`/`description` are dropped from the record.
pub fn merge(card: EventCard, detail: DetailResult) -> EventRecord {
    let date = if detail.date.is_empty() {
        card.listing_date
    } else {
        detail.date
    };

    let detail_time = normalize_time(&detail.time);
    let time = if detail_time.is_empty() {
        normalize_time(&card.listing_time)
    } else {
        detail_time
    };

    EventRecord {
        title: card.title,
        date,
        time: non_empty(time),
        description: non_empty(detail.description),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.du.edu";

    fn card(date: &str, time: &str) -> EventCard {
        EventCard {
            title: "Guest Lecture".into(),
            listing_date: date.into(),
            listing_time: time.into(),
            detail_url: format!("{ORIGIN}/events/42"),
        }
    }

    #[test]
    fn parses_cards_in_order() {
        let html = r#"<html><body>
            <a class="event-card" href="/events/1"><h3> First </h3><p class="date"> Mar 10 </p><p class="time">06:00</p></a>
            <a class="event-card" href="https://other.example.org/e/2"><h3>Second</h3><p class="date">Mar 11</p><p class="time"> 5:30 PM </p></a>
            <a class="event-card"><h3>Third</h3></a>
        </body></html>"#;

        let cards = parse_listing(html, &SiteSelectors::default(), ORIGIN);
        assert_eq!(cards.len(), 3);

        assert_eq!(cards[0].title, "First");
        assert_eq!(cards[0].listing_date, "Mar 10");
        assert_eq!(cards[0].listing_time, "");
        assert_eq!(cards[0].detail_url, "https://www.du.edu/events/1");

        assert_eq!(cards[1].listing_time, "5:30 PM");
        assert_eq!(cards[1].detail_url, "https://other.example.org/e/2");

        assert_eq!(cards[2].listing_date, "");
        assert_eq!(cards[2].detail_url, "https://www.du.edu");
    }

    #[test]
    fn page_without_cards_is_empty() {
        let html = "<html><body>No events</body></html>";
        let cards = parse_listing(html, &SiteSelectors::default(), ORIGIN);
        assert!(cards.is_empty());
    }

    #[test]
    fn resolves_links() {
        assert_eq!(resolve_detail_url(ORIGIN, "/events/42"), "https://www.du.edu/events/42");
        assert_eq!(resolve_detail_url("https://www.du.edu/", "/events/42"), "https://www.du.edu/events/42");
        assert_eq!(resolve_detail_url(ORIGIN, "events/42"), "https://www.du.edu/events/42");
        assert_eq!(resolve_detail_url(ORIGIN, "http://x.org/a"), "http://x.org/a");
        assert_eq!(resolve_detail_url(ORIGIN, ""), "https://www.du.edu");
    }

    #[test]
    fn detail_values_take_precedence() {
        let detail = DetailResult {
            description: "Talk.".into(),
            date: "2025-03-10".into(),
            time: "18:30".into(),
        };
        let record = merge(card("March 9", "17:00"), detail);
        assert_eq!(record.date, "2025-03-10");
        assert_eq!(record.time.as_deref(), Some("18:30"));
        assert_eq!(record.description.as_deref(), Some("Talk."));
    }

    #[test]
    fn empty_detail_falls_back_to_listing() {
        let record = merge(card("2025-03-09", "17:00"), DetailResult::default());
        assert_eq!(record.date, "2025-03-09");
        assert_eq!(record.time.as_deref(), Some("17:00"));
        assert_eq!(record.description, None);
    }

    #[test]
    fn empty_times_are_omitted() {
        let record = merge(card("2025-03-09", ""), DetailResult::default());
        assert_eq!(record.time, None);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("time").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn winning_time_is_renormalized() {
        // a placeholder that slipped through either side is still dropped
        let record = merge(card("2025-03-09", " 07:00 "), DetailResult::default());
        assert_eq!(record.time, None);

        let detail = DetailResult {
            time: "06:00".into(),
            ..Default::default()
        };
        assert_eq!(merge(card("2025-03-09", ""), detail).time, None);
    }

    #[test]
    fn placeholder_detail_time_falls_back_to_listing_time() {
        let detail = DetailResult {
            date: "2025-03-10".into(),
            time: "07:00".into(),
            ..Default::default()
        };
        let record = merge(card("2025-03-09", "17:00"), detail);
        assert_eq!(record.date, "2025-03-10");
        assert_eq!(record.time.as_deref(), Some("17:00"));
    }
}
