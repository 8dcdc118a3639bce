//! Distribution metadata.

use serde::{Deserialize, Serialize};

/// Identity of the scanned distribution and the import roots it provides.
///
/// Built once per run by [`crate::distribution::DistributionResolver`] and never
/// modified afterwards. Serialized as the `meta` object of the JSON catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionMetadata
{
    pub name: String,
    pub version: String,
    /// Site directory the distribution is installed into (best effort).
    #[serde(rename = "location")]
    pub install_location: Option<String>,
    /// Unique, order-stable top-level import names.
    #[serde(rename = "roots")]
    pub import_roots: Vec<String>,
}
