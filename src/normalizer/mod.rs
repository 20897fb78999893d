use feed_rs::model::Entry;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{Result, RunnelError};
use crate::domain::{FeedItem, ItemTime};

/// Turns RSS 0.9x/1.0/2.0, Atom and JSON Feed documents into [`FeedItem`]s.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Entries come back in document order.
    pub fn normalize(&self, body: &[u8]) -> Result<Vec<FeedItem>> {
        let feed = parser::parse(body).map_err(|e| RunnelError::FeedParse(e.to_string()))?;
        Ok(feed.entries.into_iter().map(to_item).collect())
    }
}

fn to_item(entry: Entry) -> FeedItem {
    let links: Vec<String> = entry.links.into_iter().map(|l| l.href).collect();

    // Description and content keep their markup; the renderer strips it.
    FeedItem {
        title: entry
            .title
            .map(|t| decode_html_entities(&t.content).to_string())
            .unwrap_or_default(),
        description: entry.summary.map(|s| s.content).unwrap_or_default(),
        content: entry.content.and_then(|c| c.body).unwrap_or_default(),
        link: links.first().cloned().unwrap_or_default(),
        author: entry
            .authors
            .into_iter()
            .map(|a| a.name)
            .find(|name| !name.trim().is_empty()),
        published: ItemTime::from(entry.published),
        updated: ItemTime::from(entry.updated),
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <description>A test feed</description>
    <item>
      <title>Fish &amp;amp; Chips</title>
      <link>https://example.com/item1</link>
      <guid>item-1</guid>
      <author>jane@example.com (Jane)</author>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
      <description><![CDATA[<p>This is <b>item 1</b></p>]]></description>
    </item>
    <item>
      <title>Test Item 2</title>
      <link>https://example.com/item2</link>
      <guid>item-2</guid>
      <description>This is item 2</description>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test Feed</title>
  <subtitle>An Atom test feed</subtitle>
  <entry>
    <title>Atom Entry 1</title>
    <link href="https://example.com/atom1"/>
    <link rel="related" href="https://example.com/related"/>
    <id>atom-entry-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <author><name>Alice</name></author>
    <summary>This is Atom entry 1</summary>
    <content type="html">&lt;p&gt;Full body&lt;/p&gt;</content>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss() {
        let items = Normalizer::new().normalize(RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Fish & Chips");
        assert_eq!(items[0].link, "https://example.com/item1");
        assert_eq!(items[0].description, "<p>This is <b>item 1</b></p>");
        assert_eq!(
            items[0].published,
            ItemTime::Parsed(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(items[1].title, "Test Item 2");
        assert_eq!(items[1].published, ItemTime::Absent);
        assert_eq!(items[1].author, None);
        assert!(items[1].content.is_empty());
    }

    #[test]
    fn test_parse_atom() {
        let items = Normalizer::new().normalize(ATOM_SAMPLE.as_bytes()).unwrap();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.title, "Atom Entry 1");
        assert_eq!(item.link, "https://example.com/atom1");
        assert_eq!(
            item.links,
            vec!["https://example.com/atom1", "https://example.com/related"]
        );
        assert_eq!(item.author.as_deref(), Some("Alice"));
        assert_eq!(item.description, "This is Atom entry 1");
        assert_eq!(item.content, "<p>Full body</p>");
        assert!(item.updated.parsed().is_some());
    }

    #[test]
    fn test_rejects_non_feed() {
        let err = Normalizer::new().normalize(b"not a feed").unwrap_err();
        assert!(matches!(err, RunnelError::FeedParse(_)));
    }
}
