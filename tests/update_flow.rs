//! Integration tests for the update → cache → selector path.
//!
//! Each test works in its own temporary directory and swaps the HTTP client
//! for an in-memory fetcher, so nothing touches the network or the user's
//! real cache.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tempfile::TempDir;

use runnel::app::{AppContext, Result, RunnelError};
use runnel::cache::{FeedCache, ItemCache};
use runnel::cli::commands;
use runnel::domain::FeedItem;
use runnel::fetcher::Fetcher;
use runnel::tui::app::{SelectMode, SelectorState, SelectorStep};
use runnel::tui::event::SelectorAction;

struct StaticFetcher {
    bodies: HashMap<String, String>,
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.bodies
            .get(url)
            .map(|body| body.clone().into_bytes())
            .ok_or_else(|| RunnelError::Other(format!("unreachable: {url}")))
    }
}

fn rss(titles: &[&str]) -> String {
    let items: String = titles
        .iter()
        .map(|t| {
            format!(
                "<item><title>{t}</title><link>https://example.com/{t}</link>\
                 <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate></item>"
            )
        })
        .collect();
    format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>feed</title>{items}</channel></rss>"#)
}

fn context(dir: &TempDir, bodies: &[(&str, String)]) -> AppContext {
    let fetcher = Arc::new(StaticFetcher {
        bodies: bodies
            .iter()
            .map(|(url, body)| (url.to_string(), body.clone()))
            .collect(),
    });
    AppContext::with_fetcher(
        dir.path().join("cache").join("cache.json"),
        dir.path().join("config").join("urls.txt"),
        fetcher,
        4,
    )
}

fn titles(items: &[FeedItem]) -> Vec<&str> {
    items.iter().map(|item| item.title.as_str()).collect()
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn update_caches_items_in_subscription_order() {
    let dir = TempDir::new().unwrap();
    let ctx = context(
        &dir,
        &[
            ("https://a.example/feed", rss(&["a1", "a2"])),
            ("https://b.example/feed", rss(&["b1"])),
        ],
    );
    ctx.sources.add("https://b.example/feed").unwrap();
    ctx.sources.add("https://a.example/feed").unwrap();

    let report = commands::update(&ctx).await.unwrap();

    assert_eq!(report.feeds, 2);
    assert_eq!(report.failed, 0);
    assert!(report.exported);
    let cached = ctx.cache.import().unwrap().unwrap();
    assert_eq!(titles(&cached), vec!["b1", "a1", "a2"]);
}

#[tokio::test]
async fn update_skips_failed_feeds() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, &[("https://a.example/feed", rss(&["a1"]))]);
    ctx.sources.add("https://down.example/feed").unwrap();
    ctx.sources.add("https://a.example/feed").unwrap();

    let report = commands::update(&ctx).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.items, 1);
    assert_eq!(titles(&ctx.cache.import().unwrap().unwrap()), vec!["a1"]);
}

#[tokio::test]
async fn update_keeps_cache_when_every_feed_fails() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, &[]);
    ctx.cache.export(&[FeedItem::new("kept")]).unwrap();
    let before = std::fs::read(ctx.cache.path()).unwrap();
    ctx.sources.add("https://down.example/feed").unwrap();

    let report = commands::update(&ctx).await.unwrap();

    assert!(!report.exported);
    assert_eq!(std::fs::read(ctx.cache.path()).unwrap(), before);
}

#[tokio::test]
async fn update_without_subscriptions_does_nothing() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, &[]);

    let report = commands::update(&ctx).await.unwrap();

    assert_eq!(report.feeds, 0);
    assert!(ctx.cache.import().unwrap().is_none());
}

// ============================================================================
// Selector over the cache
// ============================================================================

#[test]
fn aborting_the_selector_leaves_cache_untouched() {
    let dir = TempDir::new().unwrap();
    let cache = FeedCache::new(dir.path().join("cache.json"));
    cache
        .export(&[FeedItem::new("Go Weekly"), FeedItem::new("Golang News")])
        .unwrap();
    let before = std::fs::read(cache.path()).unwrap();

    let items = cache.import().unwrap().unwrap();
    let mut state = SelectorState::new(&items, SelectMode::Single, Utc::now());
    state.handle_action(SelectorAction::Insert('G'));
    state.handle_action(SelectorAction::Down);
    assert_eq!(state.handle_action(SelectorAction::Abort), SelectorStep::Abort);

    assert_eq!(std::fs::read(cache.path()).unwrap(), before);
    assert_eq!(cache.import().unwrap().unwrap(), items);
}

#[test]
fn selected_index_points_into_imported_collection() {
    let dir = TempDir::new().unwrap();
    let cache = FeedCache::new(dir.path().join("cache.json"));
    cache
        .export(&[
            FeedItem::new("Go Weekly"),
            FeedItem::new("Python Weekly"),
            FeedItem::new("Golang News"),
        ])
        .unwrap();

    let items = cache.import().unwrap().unwrap();
    let mut state = SelectorState::new(&items, SelectMode::Single, Utc::now());
    for c in "News".chars() {
        state.handle_action(SelectorAction::Insert(c));
    }

    assert_eq!(state.handle_action(SelectorAction::Accept), SelectorStep::Accept);
    let chosen = state.selection();
    assert_eq!(chosen, vec![2]);
    assert_eq!(items[chosen[0]].title, "Golang News");
}
