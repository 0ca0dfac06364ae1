//! The reconciler: routes canonical products against remote state by SKU,
//! plans minimal per-variant mutations, and pushes them with per-product
//! failure isolation.

pub mod channels;
pub mod engine;
pub mod error;
pub mod plan;
pub mod remote;
pub mod report;
pub mod target;

pub use channels::{EbayChannel, ShopifyChannel, WooChannel};
pub use engine::{sync_catalog, SyncOptions};
pub use error::SyncError;
pub use plan::{plan_product, InventoryTarget, PlannedAction, ProductUpdate, VariantChange};
pub use remote::{RemoteVariant, SkuIndex};
pub use report::{OutcomeStatus, ProductOutcome, SyncReport};
pub use target::{CatalogSource, CatalogTarget};
