//! The bidirectional adapter contract every platform implements.

use thiserror::Error;

use crate::meta::Platform;
use crate::product::CanonicalProduct;

/// Outcome of converting one platform record into canonical form.
///
/// `Skipped` is a non-error outcome for record shapes this system
/// deliberately does not handle (grouped products, bare variation rows,
/// records with no variants). Callers log a warning with the platform,
/// record id and reason, then move on; a skip never aborts a batch.
#[derive(Debug, Clone)]
pub enum Conversion {
    Converted(Box<CanonicalProduct>),
    Skipped { id: String, reason: String },
}

impl Conversion {
    /// Unwraps the converted product, if this record converted.
    #[must_use]
    pub fn into_product(self) -> Option<CanonicalProduct> {
        match self {
            Conversion::Converted(product) => Some(*product),
            Conversion::Skipped { .. } => None,
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Conversion::Skipped { .. })
    }
}

/// A pure, synchronous, bidirectional mapping between one platform's wire
/// shape and the canonical model.
///
/// Implementations hold no mutable state and perform no I/O; transport
/// belongs to the platform clients. For any record `R` the composition
/// `from_platform(to_platform(from_platform(R)))` must reproduce the same
/// canonical IDs, SKUs, prices and inventory as `from_platform(R)`, and
/// `to_platform` must be deterministic given the same canonical input and
/// prior meta.
pub trait PlatformAdapter {
    /// The platform's native record type.
    type Record;

    fn platform(&self) -> Platform;

    /// Converts a platform record into canonical form, or skips it.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the record's data is malformed beyond
    /// the documented degradation rules (e.g. an unparseable price).
    fn from_platform(&self, record: Self::Record) -> Result<Conversion, AdapterError>;

    /// Renders a canonical product into the platform's wire shape.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when embedded metadata cannot be serialized.
    fn to_platform(&self, product: &CanonicalProduct) -> Result<Self::Record, AdapterError>;
}

/// Errors shared by all platform adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid price {value:?} on {platform} record {record_id}")]
    InvalidPrice {
        platform: Platform,
        record_id: String,
        value: String,
    },
    #[error("failed to serialize embedded metadata for {context}: {source}")]
    MetaEncode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
