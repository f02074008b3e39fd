//! # Effigy Asset
//!
//! Asset plumbing shared by the model loaders:
//! - Byte fetching for the URL shapes model configs use (`data:`,
//!   `file:`, plain paths, `http:`)
//! - A generic keyed request cache with single-flight async loads and
//!   explicit eviction
//!
//! The cache memoizes outcomes, not requests: a failed load stays cached
//! and is shared with later callers until its entry is evicted.

pub mod cache;
pub mod error;
pub mod source;

pub use cache::{LoadOutcome, RequestCache};
pub use error::AssetError;
pub use source::{display_url, fetch_asset_bytes};
