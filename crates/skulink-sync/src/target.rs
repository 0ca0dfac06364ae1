//! The source and target contracts the engine drives.
//!
//! A channel (one per platform, under [`crate::channels`]) owns a client and
//! an adapter and implements both sides: pulling a catalog into canonical
//! form, and being reconciled into.

use async_trait::async_trait;
use skulink_core::{CanonicalProduct, Platform};

use crate::error::SyncError;
use crate::plan::ProductUpdate;
use crate::remote::SkuIndex;

/// A platform catalog that can be pulled into canonical form.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn platform(&self) -> Platform;

    /// Fetches every product and converts it. Records the adapter skips are
    /// logged and dropped here, never surfaced as errors.
    async fn fetch_catalog(&self) -> Result<Vec<CanonicalProduct>, SyncError>;
}

/// A platform catalog the engine can reconcile canonical products into.
#[async_trait]
pub trait CatalogTarget: Send + Sync {
    fn platform(&self) -> Platform;

    /// Resolves which of `skus` already exist remotely. One batched lookup
    /// per run; SKUs with no remote row are simply absent from the index.
    async fn lookup_by_skus(&self, skus: &[String]) -> Result<SkuIndex, SyncError>;

    /// Creates the whole product remotely and returns the new parent id.
    async fn create(&self, product: &CanonicalProduct) -> Result<String, SyncError>;

    /// Applies a minimal update plan against an existing remote parent.
    async fn update(
        &self,
        product: &CanonicalProduct,
        update: &ProductUpdate,
    ) -> Result<(), SyncError>;
}
