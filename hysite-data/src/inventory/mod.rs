//! Asset inventory adapter.
//!
//! [`HttpAssetSource`] implements the synchronous
//! [`AssetSource`](hysite_core::AssetSource) trait over the inventory's JSON
//! listing endpoint.
//!
//! # Example
//!
//! ```no_run
//! use hysite_core::AssetSource;
//! use hysite_data::inventory::HttpAssetSource;
//!
//! let source = HttpAssetSource::new("http://localhost:8000/api/assets/list/")?;
//! let assets = source.fetch_assets()?;
//! println!("{} assets", assets.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod source;
pub mod wire;

pub use source::{
    DEFAULT_ASSETS_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpAssetSource,
    HttpAssetSourceConfig,
};
