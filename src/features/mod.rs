//! Feature preparation: normalization and fitted preprocessing.
//!
//! Two stages turn a raw [`FeatureRecord`](crate::record::FeatureRecord)
//! into model-ready input:
//!
//! - [`normalizer`]: fills defaults for absent optional fields and rejects
//!   coarse-type mismatches on required fields.
//! - [`transformer`]: applies the fitted encoding (standard scaling,
//!   one-hot with an unknown bucket) producing [`TransformedFeatures`].

pub mod normalizer;
pub mod transformer;

pub use normalizer::normalize;
pub use transformer::{ColumnEncoder, FittedTransformer, TransformedFeatures};
