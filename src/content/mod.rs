//! Display strings derived from a [`FeedItem`].
//!
//! Everything here is pure: the current time is passed in so callers (and
//! tests) control what "2h ago" means.

use chrono::{DateTime, Utc};
use scraper::Html;

use crate::domain::{FeedItem, ItemTime};

pub const SEPARATOR: &str = "──────";

/// Relative age of `then`, seen from `now`.
///
/// Whole hours are counted, then whole days. Thirty days or more are
/// reported in 30-day months. Timestamps in the future count as zero
/// elapsed time.
pub fn humanize(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let hours = (now - then).num_hours().max(0);
    let days = hours / 24;

    if days >= 30 {
        format!("{}mon ago", days / 30)
    } else if days == 0 {
        format!("{}h ago", hours % 24)
    } else {
        format!("{}d ago", days)
    }
}

/// Text to show for a timestamp, or `None` when the feed had none.
pub fn describe_time(now: DateTime<Utc>, time: &ItemTime) -> Option<String> {
    match time {
        ItemTime::Parsed(t) => Some(humanize(now, *t)),
        ItemTime::RawText(raw) => Some(raw.clone()),
        ItemTime::Absent => None,
    }
}

/// Text content of an HTML fragment, tags and attributes dropped.
///
/// Input the parser cannot recover anything from (for example a lone `<b`)
/// is returned untouched.
pub fn strip_html(source: &str) -> String {
    match try_strip_html(source) {
        Some(text) => text,
        None => {
            tracing::trace!(len = source.len(), "html parse failed, keeping raw text");
            source.to_string()
        }
    }
}

fn try_strip_html(source: &str) -> Option<String> {
    let fragment = Html::parse_fragment(source);
    let text: String = fragment.root_element().text().collect();

    let unrecovered = text.trim().is_empty() && !source.trim().is_empty();
    if !fragment.errors.is_empty() && unrecovered {
        return None;
    }
    Some(text)
}

/// List row: `"<title> [<age>]"`. Items without a date get the bare title.
pub fn label(item: &FeedItem, now: DateTime<Utc>) -> String {
    match describe_time(now, &item.published) {
        Some(age) => format!("{} [{}]", item.display_title(), age),
        None => item.display_title().to_string(),
    }
}

/// Selector side pane.
pub fn preview(item: &FeedItem, now: DateTime<Utc>) -> String {
    let mut lines = vec![format!("■ {}", item.display_title()), String::new()];

    if let Some(author) = item.author.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("by {}", author));
    }
    if let Some(published) = describe_time(now, &item.published) {
        lines.push(format!("published {}", published));
    }
    if let Some(updated) = describe_time(now, &item.updated) {
        lines.push(format!("updated {}", updated));
    }

    lines.push(String::new());
    lines.push(strip_html(&item.description));
    lines.join("\n")
}

/// Pager body.
pub fn full_content(item: &FeedItem, now: DateTime<Utc>) -> String {
    let mut lines = Vec::new();

    if let Some(author) = item.author.as_deref().filter(|a| !a.is_empty()) {
        lines.push(author.to_string());
    }
    if let Some(published) = describe_time(now, &item.published) {
        lines.push(format!("published {}", published));
    }
    if let Some(updated) = describe_time(now, &item.updated) {
        lines.push(format!("updated {}", updated));
    }

    lines.push(SEPARATOR.to_string());
    lines.push(strip_html(&item.description));
    lines.push(SEPARATOR.to_string());
    lines.push(strip_html(&item.content));
    lines.push(SEPARATOR.to_string());
    lines.push(item.links.join("\n"));

    lines.join("\n")
}
