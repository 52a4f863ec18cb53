use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use chrono::{Local, NaiveDate};
use infodarts_core::{parse_feed, parse_ranking, Capability, ContentOutcome, RankingOutcome};
use log::{debug, error};

use crate::cache::{self, Cache};
use crate::source::{Fetcher, LoadError, Source};

#[derive(Debug, Clone)]
pub struct AdsConfig {
    pub client: String,
    pub slots: Vec<String>,
}

impl AdsConfig {
    pub fn script_src(&self) -> String {
        format!(
            "https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js?client={}",
            self.client
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Clock {
    Local,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(self) -> NaiveDate {
        match self {
            Clock::Local => Local::now().date_naive(),
            Clock::Fixed(date) => date,
        }
    }
}

pub struct Config {
    pub content_dir: PathBuf,
    pub feed: Source,
    pub ranking: Source,
    pub cache: cache::Config,
    pub ads: AdsConfig,
    pub clock: Clock,
}

/// Shared by every request: where documents live and how to read them.
#[derive(Debug)]
pub struct Context {
    pub content_dir: PathBuf,
    pub feed: Source,
    pub ranking: Source,
    pub ads: AdsConfig,
    pub clock: Clock,
    fetcher: Capability<Fetcher>,
    cache: Arc<Cache<String, Bytes>>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            content_dir: config.content_dir,
            feed: config.feed,
            ranking: config.ranking,
            ads: config.ads,
            clock: config.clock,
            fetcher: Capability::new("fetcher"),
            cache: Cache::new(config.cache),
        }
    }

    async fn fetch(&self, source: &Source) -> Result<Bytes, LoadError> {
        let key = source.to_string();
        if let Some(bytes) = self.cache.get(&key) {
            debug!("Serving {key} from cache");
            return Ok(Bytes::clone(&bytes));
        }

        let fetcher = self
            .fetcher
            .ensure_ready(|| Fetcher::prepare(&self.content_dir))
            .await?;

        let bytes = fetcher.fetch(source).await?;
        Arc::clone(&self.cache).insert(key, bytes.clone());

        Ok(bytes)
    }

    pub async fn load_content(&self) -> ContentOutcome {
        let loaded = match self.fetch(&self.feed).await {
            Ok(bytes) => parse_feed(bytes).map_err(LoadError::from),
            Err(err) => Err(err),
        };

        match loaded {
            Ok(feed) => ContentOutcome::Loaded(feed),
            Err(err) => {
                error!("Error loading content feed from {}: {err}", self.feed);
                ContentOutcome::Failed
            }
        }
    }

    pub async fn load_ranking(&self) -> RankingOutcome {
        let loaded = match self.fetch(&self.ranking).await {
            Ok(bytes) => parse_ranking(bytes).map_err(LoadError::from),
            Err(err) => Err(err),
        };

        match loaded {
            Ok(rows) => RankingOutcome::Loaded(rows),
            // The fetcher is the spreadsheet reader's on-demand capability:
            // failing to build it is reported as the reader being unavailable.
            Err(err @ LoadError::Unavailable(_)) => {
                error!("Ranking reader unavailable: {err}");
                RankingOutcome::Unavailable
            }
            Err(err) => {
                error!("Error loading ranking from {}: {err}", self.ranking);
                RankingOutcome::Failed
            }
        }
    }
}
