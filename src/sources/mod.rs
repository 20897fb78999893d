//! The list of subscribed feed URLs.
//!
//! Stored as plain text, one URL per line, so it can be edited by hand.
//! Blank lines and lines starting with `#` are ignored.

pub mod opml;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use url::Url;

use crate::app::{Result, RunnelError};
use crate::config::Config;

pub use opml::{parse_opml, OpmlFeed};

pub struct Sources {
    path: PathBuf,
}

impl Sources {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join("urls.txt"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Subscribed URLs in file order. A missing file means no subscriptions.
    pub fn load(&self) -> Result<Vec<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect())
    }

    /// Validate `url` and append it. Returns the URL as stored.
    pub fn add(&self, url: &str) -> Result<String> {
        let url = validate_url(url)?;
        if self.load()?.iter().any(|existing| existing == &url) {
            return Err(RunnelError::DuplicateSource(url));
        }

        self.append(&[url.as_str()])?;
        tracing::info!(%url, path = %self.path.display(), "added subscription");
        Ok(url)
    }

    /// Add every valid, not yet subscribed URL in one write.
    ///
    /// Returns how many were added and the URLs that were rejected, with
    /// the reason.
    pub fn add_all<'a, I>(&self, urls: I) -> Result<(usize, Vec<(String, RunnelError)>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut known = self.load()?;
        let mut fresh = Vec::new();
        let mut rejected = Vec::new();

        for raw in urls {
            match validate_url(raw) {
                Ok(url) if known.contains(&url) => {
                    rejected.push((raw.to_string(), RunnelError::DuplicateSource(url)));
                }
                Ok(url) => {
                    known.push(url.clone());
                    fresh.push(url);
                }
                Err(e) => rejected.push((raw.to_string(), e)),
            }
        }

        let refs: Vec<&str> = fresh.iter().map(String::as_str).collect();
        self.append(&refs)?;
        Ok((fresh.len(), rejected))
    }

    /// Open the list in `editor` and wait for it to exit.
    pub fn edit(&self, editor: &str) -> Result<()> {
        if editor.trim().is_empty() {
            return Err(RunnelError::Editor {
                editor: editor.to_string(),
                reason: "no editor given".into(),
            });
        }
        self.ensure_parent()?;

        let status = Command::new(editor)
            .arg(&self.path)
            .status()
            .map_err(|e| RunnelError::Editor {
                editor: editor.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(RunnelError::Editor {
                editor: editor.to_string(),
                reason: status.to_string(),
            });
        }
        Ok(())
    }

    fn append(&self, urls: &[&str]) -> Result<()> {
        if urls.is_empty() {
            return Ok(());
        }
        self.ensure_parent()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        for url in urls {
            writeln!(file, "{}", url)?;
        }
        Ok(())
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

/// Accept absolute http(s) URLs only.
pub fn validate_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(RunnelError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sources(dir: &TempDir) -> Sources {
        Sources::new(dir.path().join("runnel").join("urls.txt"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(sources(&dir).load().unwrap().is_empty());
    }

    #[test]
    fn test_load_skips_blanks_and_comments() {
        let dir = TempDir::new().unwrap();
        let sources = Sources::new(dir.path().join("urls.txt"));
        fs::write(
            sources.path(),
            "# news\nhttps://a.example/feed\n\n   \n  https://b.example/rss  \n#https://c.example\n",
        )
        .unwrap();

        assert_eq!(
            sources.load().unwrap(),
            vec!["https://a.example/feed", "https://b.example/rss"]
        );
    }

    #[test]
    fn test_add_creates_file_and_appends() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);

        sources.add("https://a.example/feed").unwrap();
        sources.add("https://b.example/feed").unwrap();

        assert_eq!(
            sources.load().unwrap(),
            vec!["https://a.example/feed", "https://b.example/feed"]
        );
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        sources.add("https://a.example/feed").unwrap();

        let err = sources.add("https://a.example/feed").unwrap_err();
        assert!(matches!(err, RunnelError::DuplicateSource(_)));
        assert_eq!(sources.load().unwrap().len(), 1);
    }

    #[test]
    fn test_add_rejects_invalid_urls() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);

        assert!(matches!(
            sources.add("not a url").unwrap_err(),
            RunnelError::InvalidUrl(_)
        ));
        assert!(matches!(
            sources.add("ftp://example.com/feed").unwrap_err(),
            RunnelError::UnsupportedScheme(_)
        ));
        assert!(!sources.path().exists());
    }

    #[test]
    fn test_add_all_reports_rejections() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        sources.add("https://a.example/feed").unwrap();

        let (added, rejected) = sources
            .add_all([
                "https://a.example/feed",
                "https://b.example/feed",
                "https://b.example/feed",
                "mailto:someone@example.com",
            ])
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(rejected.len(), 3);
        assert_eq!(
            sources.load().unwrap(),
            vec!["https://a.example/feed", "https://b.example/feed"]
        );
    }

    #[test]
    fn test_edit_requires_editor() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            sources(&dir).edit("  ").unwrap_err(),
            RunnelError::Editor { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_reports_failing_editor() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        assert!(sources.edit("true").is_ok());
        assert!(matches!(
            sources.edit("false").unwrap_err(),
            RunnelError::Editor { .. }
        ));
    }
}
