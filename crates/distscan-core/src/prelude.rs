//! Common module for library exports

pub use crate::catalog::{scan_distribution, ScanOptions, Scanner};
pub use crate::distribution::{Distribution, DistributionResolver, MetadataStore, SitePackages};
pub use crate::error::{ScanError, ScanResult};
pub use crate::render::{to_json, to_markdown};
pub use crate::symbols::NameFilter;
pub use crate::types::{Catalog, DistributionMetadata, ModuleReport, Symbol, SymbolKind};
pub use crate::walker::{create_walker, ModuleWalker, WalkMode};
