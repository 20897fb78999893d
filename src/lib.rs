//! # Runnel
//!
//! A command-line feed reader: fetch your subscriptions once, then find and
//! read items offline from a local cache.
//!
//! ## Architecture
//!
//! ```text
//! Sources → Fetcher → Normalizer → Cache → Selector ⇄ Pager
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Subscribe to a feed
//! runnel add https://blog.rust-lang.org/feed.xml
//!
//! # Fetch everything and replace the cache
//! runnel update
//!
//! # Browse and read (also the default with no subcommand)
//! runnel read
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the cache,
/// the subscription list, the fetcher and the normalizer.
pub mod app;

/// Versioned JSON snapshot of the last fetched collection.
pub mod cache;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management for the TUI.
///
/// Loads from `~/.config/runnel/config.toml`, supporting:
/// - Custom colors (named or hex)
/// - Custom keybindings for the selector and the pager
pub mod config;

/// Display strings derived from a feed item: list labels, previews, full
/// bodies.
pub mod content;

/// Core domain models.
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent fetching with semaphore
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0
/// into [`FeedItem`](domain::FeedItem)s.
pub mod normalizer;

/// The subscribed URL list and OPML import.
pub mod sources;

/// Terminal user interface: a fuzzy item selector and a pager.
pub mod tui;
