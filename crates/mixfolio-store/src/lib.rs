#![forbid(unsafe_code)]

use async_trait::async_trait;

mod backend_http;
mod backend_local;
mod catalog;
mod error;
mod fake;
mod key;
mod resolver;
mod retry;

pub use backend_http::HttpObjectStore;
pub use backend_local::LocalFsStore;
pub use catalog::{
    parse_catalog_document, CatalogDocument, CatalogLoad, CatalogLoadFailure, CatalogLoader,
    CatalogSource,
};
pub use error::{StoreError, StoreErrorCode};
pub use fake::FakeAssetStore;
pub use key::AssetKey;
pub use resolver::{AssetRequest, AssetResolver, ResolveError, ResolvedAsset};
pub use retry::{BackoffPolicy, RetryPolicy};

pub const CRATE_NAME: &str = "mixfolio-store";

/// Read-only object storage holding audio assets as flat
/// `{logical_id}{extension}` keys.
#[async_trait]
pub trait AssetStore: Send + Sync + 'static {
    fn backend_tag(&self) -> &'static str;

    /// `Ok(false)` means the object legitimately does not exist; any other
    /// storage trouble is an `Err`.
    async fn exists(&self, key: &AssetKey) -> Result<bool, StoreError>;

    async fn read(&self, key: &AssetKey) -> Result<Vec<u8>, StoreError>;
}
