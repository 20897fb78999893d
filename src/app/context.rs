use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::Result;
use crate::cache::FeedCache;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::{ParallelFetcher, DEFAULT_WORKERS};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::sources::Sources;

pub struct AppContext {
    pub cache: FeedCache,
    pub sources: Sources,
    pub parallel_fetcher: ParallelFetcher,
    pub normalizer: Normalizer,
}

impl AppContext {
    pub fn new() -> Result<Self> {
        Self::with_workers(DEFAULT_WORKERS)
    }

    pub fn with_workers(workers: usize) -> Result<Self> {
        Self::with_paths(FeedCache::default_path()?, Sources::default_path()?, workers)
    }

    pub fn with_paths(cache_path: PathBuf, sources_path: PathBuf, workers: usize) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new()?);
        Ok(Self::with_fetcher(cache_path, sources_path, fetcher, workers))
    }

    pub fn with_fetcher(
        cache_path: PathBuf,
        sources_path: PathBuf,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        workers: usize,
    ) -> Self {
        Self {
            cache: FeedCache::new(cache_path),
            sources: Sources::new(sources_path),
            parallel_fetcher: ParallelFetcher::with_workers(fetcher, workers),
            normalizer: Normalizer::new(),
        }
    }
}
