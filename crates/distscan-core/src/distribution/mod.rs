//! # Distribution Resolver
//!
//! Maps a distribution name to [`DistributionMetadata`]: name, version, install
//! location and the import roots the distribution provides.
//!
//! Roots come from `top_level.txt` when it lists any. Otherwise they are inferred
//! from the installed file manifest:
//!
//! - `X.py` directly in the install location provides root `X`,
//! - `Y/__init__.py` provides root `Y`.
//!
//! Anything else (namespace packages, compiled-only modules, data files) is not
//! inferred. An empty root list is not an error here; the assembler records it.

mod site_packages;
mod store;

use std::collections::BTreeSet;

pub use site_packages::{normalize_name, InstalledDistribution, SitePackages};
pub use store::{Distribution, MetadataStore};
use tracing::{debug, info, warn};

use crate::error::ScanResult;
use crate::types::module_name::{PACKAGE_INIT, SOURCE_EXTENSION};
use crate::types::DistributionMetadata;

/// File listing the import roots a distribution declares.
pub const TOP_LEVEL_MANIFEST: &str = "top_level.txt";

/// Version reported when the metadata carries none.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Resolves distribution names against a [`MetadataStore`].
pub struct DistributionResolver<'a>
{
    store: &'a dyn MetadataStore,
}

impl<'a> DistributionResolver<'a>
{
    pub fn new(store: &'a dyn MetadataStore) -> Self
    {
        Self { store }
    }

    /// Look up `name` and derive its metadata.
    ///
    /// ## Errors
    ///
    /// Only [`crate::error::ScanError::DistributionNotFound`].
    pub fn resolve(&self, name: &str) -> ScanResult<DistributionMetadata>
    {
        let dist = self.store.distribution(name)?;
        let files = dist.files();

        let import_roots = match dist.read_text(TOP_LEVEL_MANIFEST).map(|text| declared_roots(&text)) {
            Some(roots) if !roots.is_empty() => {
                debug!(?roots, "using declared import roots");
                roots
            }
            _ => {
                let roots = infer_roots(files.as_deref().unwrap_or_default());
                debug!(?roots, "inferred import roots from file manifest");
                roots
            }
        };
        if import_roots.is_empty() {
            warn!(name, "no import roots found");
        }

        let install_location = files
            .as_ref()
            .and_then(|files| files.first())
            .and_then(|first| {
                let located = dist.locate_file(first);
                located
                    .parent()
                    .and_then(|parent| parent.parent())
                    .map(|location| location.to_string_lossy().into_owned())
            });

        let metadata = DistributionMetadata {
            name: dist.name().unwrap_or_else(|| name.to_string()),
            version: dist.version().unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            install_location,
            import_roots,
        };
        info!(
            name = %metadata.name,
            version = %metadata.version,
            roots = metadata.import_roots.len(),
            "resolved distribution"
        );
        Ok(metadata)
    }
}

/// Lines of a `top_level.txt`, trimmed, without blanks, first occurrence kept.
pub fn declared_roots(text: &str) -> Vec<String>
{
    let mut seen = BTreeSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

/// Import roots implied by a file manifest, deduplicated and sorted.
pub fn infer_roots<S: AsRef<str>>(files: &[S]) -> Vec<String>
{
    let init_file = format!("{PACKAGE_INIT}.{SOURCE_EXTENSION}");
    let roots: BTreeSet<String> = files
        .iter()
        .filter_map(|file| {
            let segments: Vec<&str> = file.as_ref().split('/').collect();
            match segments.as_slice() {
                [single] => single
                    .strip_suffix(SOURCE_EXTENSION)
                    .and_then(|stem| stem.strip_suffix('.'))
                    .filter(|stem| !stem.is_empty())
                    .map(str::to_string),
                [package, init] if *init == init_file && !package.is_empty() => Some((*package).to_string()),
                _ => None,
            }
        })
        .collect();
    roots.into_iter().collect()
}
