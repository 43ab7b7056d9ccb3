//! The asset inventory boundary.
//!
//! [`AssetSource`] abstracts the external inventory that supplies raw asset
//! records. The engine fetches once per request and filters the result in
//! memory for each scoring domain; see [`AssetSnapshot`].

use std::sync::Arc;

use thiserror::Error;

use crate::Asset;

/// Errors reported by an [`AssetSource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetSourceError {
    /// The inventory could not be reached or refused to answer.
    #[error("asset inventory unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
    /// The inventory answered with records the engine cannot interpret.
    #[error("asset inventory returned malformed data: {message}")]
    Malformed {
        /// Description of the offending payload.
        message: String,
    },
    /// The request exceeded its time budget.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The inventory answered with a non-success HTTP status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// A transport-level failure occurred.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Error description.
        message: String,
    },
}

/// Fetch the full, unfiltered asset inventory.
///
/// The call is treated as blocking I/O with no retry. Implementations must be
/// thread-safe so one source can back concurrent analyses.
///
/// # Examples
///
/// ```rust
/// use hysite_core::{Asset, AssetCategory, AssetSource, AssetSourceError};
///
/// struct OnePlant;
///
/// impl AssetSource for OnePlant {
///     fn fetch_assets(&self) -> Result<Vec<Asset>, AssetSourceError> {
///         Ok(vec![Asset::new(AssetCategory::HydrogenPlant, 12.97, 77.59)])
///     }
/// }
///
/// let assets = OnePlant.fetch_assets()?;
/// assert_eq!(assets.len(), 1);
/// # Ok::<(), AssetSourceError>(())
/// ```
pub trait AssetSource: Send + Sync {
    /// Return every asset known to the inventory.
    fn fetch_assets(&self) -> Result<Vec<Asset>, AssetSourceError>;
}

impl<T: AssetSource + ?Sized> AssetSource for &T {
    fn fetch_assets(&self) -> Result<Vec<Asset>, AssetSourceError> {
        (**self).fetch_assets()
    }
}

impl<T: AssetSource + ?Sized> AssetSource for Box<T> {
    fn fetch_assets(&self) -> Result<Vec<Asset>, AssetSourceError> {
        (**self).fetch_assets()
    }
}

impl<T: AssetSource + ?Sized> AssetSource for Arc<T> {
    fn fetch_assets(&self) -> Result<Vec<Asset>, AssetSourceError> {
        (**self).fetch_assets()
    }
}

/// The outcome of a single inventory fetch, shared by all three scorers.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSnapshot {
    result: Result<Vec<Asset>, AssetSourceError>,
}

impl AssetSnapshot {
    /// Fetch the inventory once.
    pub fn fetch<S: AssetSource + ?Sized>(source: &S) -> Self {
        let result = source.fetch_assets();
        match &result {
            Ok(assets) => log::debug!("asset inventory returned {} records", assets.len()),
            Err(err) => log::warn!("asset inventory fetch failed: {err}"),
        }
        Self { result }
    }

    /// Wrap an already fetched asset list.
    #[must_use]
    pub const fn from_assets(assets: Vec<Asset>) -> Self {
        Self { result: Ok(assets) }
    }

    /// Record a failed fetch.
    #[must_use]
    pub const fn from_error(error: AssetSourceError) -> Self {
        Self { result: Err(error) }
    }

    /// Borrow the fetched assets or the fetch error.
    ///
    /// # Errors
    /// Returns the [`AssetSourceError`] reported by the inventory.
    pub fn assets(&self) -> Result<&[Asset], &AssetSourceError> {
        self.result.as_deref()
    }
}
