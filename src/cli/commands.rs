use std::path::Path;

use crate::app::{AppContext, Result, RunnelError};
use crate::cache::ItemCache;
use crate::config::Config;
use crate::domain::FeedItem;
use crate::sources::{parse_opml, OpmlFeed};
use crate::tui::{self, app::Selection};

/// Outcome of one `update` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub feeds: usize,
    pub failed: usize,
    pub items: usize,
    pub exported: bool,
}

/// Browse the cache, reading items until the user aborts.
pub fn read(ctx: &AppContext, config: &Config) -> Result<()> {
    let Some(items) = load_cached(ctx)? else {
        return Ok(());
    };
    tui::browse(&items, config)
}

/// Pick items and open each chosen link in the browser.
pub fn open(ctx: &AppContext, config: &Config) -> Result<()> {
    let Some(items) = load_cached(ctx)? else {
        return Ok(());
    };

    let chosen = match tui::choose_many(&items, config)? {
        Selection::Chosen(indices) => indices,
        Selection::Aborted => return Ok(()),
    };

    for item in chosen.iter().filter_map(|&i| items.get(i)) {
        if !item.has_link() {
            eprintln!("No link for: {}", item.display_title());
            continue;
        }
        tracing::info!(url = %item.link, "opening link in browser");
        if let Err(e) = open::that(&item.link) {
            eprintln!("Failed to open {}: {}", item.link, e);
        }
    }
    Ok(())
}

fn load_cached(ctx: &AppContext) -> Result<Option<Vec<FeedItem>>> {
    let items = ctx.cache.import()?;
    if items.is_none() {
        println!("Nothing cached yet. Run `runnel update` to fetch your feeds.");
    }
    Ok(items)
}

/// Fetch every subscription and replace the cache with the result.
///
/// Feeds that fail are reported and skipped. The cache is left alone when
/// every feed failed, so a network outage does not wipe it.
pub async fn update(ctx: &AppContext) -> Result<UpdateReport> {
    let urls = ctx.sources.load()?;
    if urls.is_empty() {
        println!("No feeds to update. Add one with `runnel add <url>`.");
        return Ok(UpdateReport::default());
    }

    println!("Updating {} feeds...", urls.len());
    let results = ctx
        .parallel_fetcher
        .fetch_all(urls, &ctx.normalizer)
        .await;

    let mut report = UpdateReport {
        feeds: results.len(),
        ..UpdateReport::default()
    };
    let mut items = Vec::new();

    for (url, result) in results {
        match result {
            Ok(feed_items) => {
                println!("  {} items from {}", feed_items.len(), url);
                items.extend(feed_items);
            }
            Err(e) => {
                report.failed += 1;
                tracing::warn!(%url, error = %e, "feed update failed");
                eprintln!("  Error updating {}: {}", url, e);
            }
        }
    }
    report.items = items.len();

    if report.failed < report.feeds {
        ctx.cache.export(&items)?;
        report.exported = true;
        println!(
            "Update complete: {} items cached, {} errors",
            report.items, report.failed
        );
    } else {
        println!("Every feed failed; keeping the previous cache");
    }

    Ok(report)
}

pub fn add(ctx: &AppContext, url: &str) -> Result<()> {
    let url = ctx.sources.add(url)?;
    println!("Added feed: {}", url);
    Ok(())
}

pub fn edit(ctx: &AppContext, editor: &str) -> Result<()> {
    ctx.sources.edit(editor)
}

/// Subscribe to the feeds listed in an OPML file.
pub fn import_opml(ctx: &AppContext, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let feeds = parse_opml(&content);

    if feeds.is_empty() {
        println!("No feeds found in OPML file");
        return Ok(());
    }

    println!("Found {} feeds in OPML file", feeds.len());
    let (added, rejected) = ctx
        .sources
        .add_all(feeds.iter().map(|feed| feed.url.as_str()))?;

    for line in import_summary(&feeds, &rejected) {
        println!("{}", line);
    }
    println!(
        "\nImport complete: {} added, {} skipped",
        added,
        rejected.len()
    );
    Ok(())
}

/// One line per OPML entry: `+` for a new subscription, `!` for a skipped one.
///
/// `rejected` lists the skipped urls in document order. A url repeated in the
/// file is added at its first occurrence, so rejections are paired from the end.
fn import_summary(feeds: &[OpmlFeed], rejected: &[(String, RunnelError)]) -> Vec<String> {
    let mut pending = rejected.iter().rev().peekable();
    let mut lines: Vec<String> = feeds
        .iter()
        .rev()
        .map(|feed| match pending.next_if(|(url, _)| *url == feed.url) {
            Some((_, reason)) => format!("  ! {} ({}) - {}", feed.title, feed.url, reason),
            None => format!("  + {}", feed.title),
        })
        .collect();
    lines.reverse();
    lines
}

pub fn list(ctx: &AppContext) -> Result<()> {
    let urls = ctx.sources.load()?;
    if urls.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for url in urls {
        println!("{}", url);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(title: &str, url: &str) -> OpmlFeed {
        OpmlFeed {
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_import_summary_names_feeds_by_title() {
        let feeds = vec![
            feed("Rust Blog", "https://blog.rust-lang.org/feed.xml"),
            feed("Broken", "not a url"),
        ];
        let rejected = vec![(
            "not a url".to_string(),
            RunnelError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase),
        )];

        let lines = import_summary(&feeds, &rejected);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "  + Rust Blog");
        assert!(lines[1].starts_with("  ! Broken (not a url) - "));
    }

    #[test]
    fn test_import_summary_repeated_url_skips_later_entry() {
        let url = "https://example.com/feed.xml";
        let feeds = vec![feed("First", url), feed("Again", url)];
        let rejected = vec![(
            url.to_string(),
            RunnelError::DuplicateSource(url.to_string()),
        )];

        let lines = import_summary(&feeds, &rejected);

        assert_eq!(lines[0], "  + First");
        assert!(lines[1].starts_with("  ! Again"));
    }
}
