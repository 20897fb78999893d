pub mod item;

pub use item::{FeedItem, ItemTime};
