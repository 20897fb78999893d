use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::app::{Result, RunnelError};
use crate::domain::FeedItem;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

pub const DEFAULT_WORKERS: usize = 10;

pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Fetch and normalize every url, at most `workers` at a time.
    ///
    /// Results come back in the order of `urls`, one per url.
    pub async fn fetch_all(
        &self,
        urls: Vec<String>,
        normalizer: &Normalizer,
    ) -> Vec<(String, Result<Vec<FeedItem>>)> {
        let mut handles = Vec::with_capacity(urls.len());

        for url in &urls {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();
            let normalizer = normalizer.clone();
            let url = url.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| RunnelError::Other(e.to_string()))?;
                fetch_single_feed(fetcher.as_ref(), &url, &normalizer).await
            });

            handles.push(handle);
        }

        let joined = join_all(handles).await;

        urls.into_iter()
            .zip(joined)
            .map(|(url, joined)| {
                let result = joined.unwrap_or_else(|e| {
                    tracing::error!(%url, "Task join error: {}", e);
                    Err(RunnelError::Other(format!("fetch task failed: {}", e)))
                });
                (url, result)
            })
            .collect()
    }
}

async fn fetch_single_feed(
    fetcher: &(dyn Fetcher + Send + Sync),
    url: &str,
    normalizer: &Normalizer,
) -> Result<Vec<FeedItem>> {
    let body = fetcher.fetch(url).await?;
    let items = normalizer.normalize(&body)?;
    tracing::info!("Fetched {} items from {}", items.len(), url);
    Ok(items)
}
