//! Metadata store abstraction.
//!
//! The resolver only needs a handful of questions answered about an installed
//! distribution. These traits keep it independent of where the answers come from,
//! so tests can supply an in-memory store.

use std::path::PathBuf;

use crate::error::ScanResult;

/// Looks up installed distributions by name.
pub trait MetadataStore
{
    /// Find the distribution called `name`.
    ///
    /// ## Errors
    ///
    /// Returns [`crate::error::ScanError::DistributionNotFound`] when nothing matches.
    fn distribution(&self, name: &str) -> ScanResult<Box<dyn Distribution>>;
}

/// One installed distribution.
pub trait Distribution
{
    /// Declared project name, if the metadata carries one.
    fn name(&self) -> Option<String>;

    /// Declared version, if the metadata carries one.
    fn version(&self) -> Option<String>;

    /// Contents of a file in the metadata directory, e.g. `top_level.txt`.
    fn read_text(&self, file: &str) -> Option<String>;

    /// Installed files, as `/`-separated paths relative to the install location.
    ///
    /// `None` when the distribution records no file manifest.
    fn files(&self) -> Option<Vec<String>>;

    /// Absolute location of a manifest path.
    fn locate_file(&self, path: &str) -> PathBuf;
}
