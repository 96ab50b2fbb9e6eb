//! Network construction.
//!
//! [`TransitNetworkBuilder`] loads feeds one at a time through a
//! [`FeedReader`], optionally runs [`interpolate_transfers`], and is then
//! frozen into a read-only [`TransitNetwork`].

mod config;
mod error;
mod feed_reader;
mod interpolate;
mod network;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

pub use config::{BuildConfig, ConfigError};
pub use error::BuildError;
pub use feed_reader::FeedReader;
pub use interpolate::{InterpolationReport, interpolate_transfers};
pub use network::{TransitNetwork, TransitNetworkBuilder, build};

/// Read and deserialize a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, BuildError> {
    let text = fs::read_to_string(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| BuildError::Json {
        path: path.to_path_buf(),
        source,
    })
}
