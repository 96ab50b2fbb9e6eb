//! Errors raised while assembling a transit network.

use std::io;
use std::path::PathBuf;

use super::ConfigError;
use crate::domain::{FeedId, NotFoundError};
use crate::feed::FeedError;

/// Building the network failed; nothing built so far is usable.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "error while constructing transit network for feed {feed}: {source}. Is your GTFS feed valid?"
    )]
    InvalidFeed {
        feed: FeedId,
        #[source]
        source: FeedError,
    },

    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}
