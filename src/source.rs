use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use axum::body::Bytes;
use infodarts_core::{CapabilityError, FeedError, RankingError};
use log::debug;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

/// Where a document comes from: an HTTP(S) URL or a path relative to the
/// content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Remote(Url),
    Local(PathBuf),
}

#[derive(Debug, Error)]
#[error("invalid source URL `{0}`")]
pub struct InvalidSource(String);

impl FromStr for Source {
    type Err = InvalidSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            return Url::parse(s)
                .map(Source::Remote)
                .map_err(|_| InvalidSource(s.to_string()));
        }

        Ok(Source::Local(PathBuf::from(s)))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{url}"),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Unavailable(#[from] CapabilityError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream answered {0}")]
    Status(StatusCode),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("{0}")]
    Ranking(#[from] RankingError),
}

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("content directory {} is not usable: {source}", path.display())]
    ContentDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads sources. Built on first use, since both the HTTP client and the
/// content directory can fail to come up.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    root: PathBuf,
}

impl Fetcher {
    pub async fn prepare(content_dir: &Path) -> Result<Self, PrepareError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let root = tokio::fs::canonicalize(content_dir)
            .await
            .map_err(|source| PrepareError::ContentDir {
                path: content_dir.to_path_buf(),
                source,
            })?;

        Ok(Self { client, root })
    }

    pub async fn fetch(&self, source: &Source) -> Result<Bytes, LoadError> {
        match source {
            Source::Remote(url) => {
                debug!("Sending HTTP request to {url}");
                let response = self.client.get(url.clone()).send().await?;

                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status(status));
                }

                Ok(response.bytes().await?)
            }
            Source::Local(path) => {
                let path = self.root.join(path);
                debug!("Reading {}", path.display());
                tokio::fs::read(&path)
                    .await
                    .map(Bytes::from)
                    .map_err(|source| LoadError::Read { path, source })
            }
        }
    }
}
