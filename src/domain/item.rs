use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A publication or update timestamp as delivered by the feed.
///
/// Feeds either carry a date we could parse, a date string we could not
/// make sense of, or nothing at all. Keeping the three cases apart means an
/// empty raw string never collapses into "no date".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemTime {
    Parsed(DateTime<Utc>),
    RawText(String),
    #[default]
    Absent,
}

impl ItemTime {
    pub fn is_absent(&self) -> bool {
        matches!(self, ItemTime::Absent)
    }

    pub fn parsed(&self) -> Option<DateTime<Utc>> {
        match self {
            ItemTime::Parsed(t) => Some(*t),
            _ => None,
        }
    }
}

impl From<Option<DateTime<Utc>>> for ItemTime {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map(ItemTime::Parsed).unwrap_or_default()
    }
}

/// One entry of a syndicated feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub content: String,
    pub link: String,
    pub author: Option<String>,
    pub published: ItemTime,
    pub updated: ItemTime,
    pub links: Vec<String>,
}

impl FeedItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    pub fn has_link(&self) -> bool {
        !self.link.trim().is_empty()
    }
}
