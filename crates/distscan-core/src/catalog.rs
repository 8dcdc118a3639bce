//! # Report Assembler
//!
//! Drives one catalog run: resolve the distribution, walk every import root with
//! the selected walker, and wrap the sorted reports into a [`Catalog`].

use std::path::PathBuf;

use tracing::{info, warn};

use crate::distribution::{DistributionResolver, MetadataStore, SitePackages};
use crate::error::{ScanError, ScanResult};
use crate::interpreter::Interpreter;
use crate::symbols::NameFilter;
use crate::types::{Catalog, ModuleReport};
use crate::walker::{create_walker, ModuleWalker, WalkMode};

/// Module name of the report recorded when a distribution has no import roots.
pub const NO_ROOTS_MODULE: &str = "(no top-level packages found)";

/// Default Python executable.
pub const DEFAULT_PYTHON: &str = "python3";

/// Options for [`scan_distribution`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions
{
    /// Import modules (reflective) or parse their sources (static).
    pub mode: WalkMode,
    /// Keep names starting with an underscore.
    pub include_private: bool,
    /// Python executable used for reflective walks and `sys.path` discovery.
    pub python: PathBuf,
    /// Site directories to search. When empty, the interpreter's `sys.path` is used.
    pub search_paths: Vec<PathBuf>,
}

impl Default for ScanOptions
{
    fn default() -> Self
    {
        Self {
            mode: WalkMode::default(),
            include_private: false,
            python: PathBuf::from(DEFAULT_PYTHON),
            search_paths: Vec::new(),
        }
    }
}

/// Assembles a [`Catalog`] from a metadata store and a walker.
pub struct Scanner<'a>
{
    resolver: DistributionResolver<'a>,
    walker: &'a dyn ModuleWalker,
}

impl<'a> Scanner<'a>
{
    pub fn new(store: &'a dyn MetadataStore, walker: &'a dyn ModuleWalker) -> Self
    {
        Self {
            resolver: DistributionResolver::new(store),
            walker,
        }
    }

    /// Catalog the distribution called `name`.
    ///
    /// ## Errors
    ///
    /// Only [`ScanError::DistributionNotFound`]. Every per-module problem is
    /// recorded in the returned catalog instead.
    pub fn scan(&self, name: &str) -> ScanResult<Catalog>
    {
        let metadata = self.resolver.resolve(name)?;

        if metadata.import_roots.is_empty() {
            let report = ModuleReport::failed(NO_ROOTS_MODULE, ScanError::RootInferenceFailed);
            return Ok(Catalog::new(metadata, vec![report]));
        }

        let mut reports = Vec::new();
        for root in &metadata.import_roots {
            let before = reports.len();
            reports.extend(self.walker.enumerate_modules(root));
            info!(root = %root, mode = %self.walker.mode(), modules = reports.len() - before, "walked import root");
        }

        let catalog = Catalog::new(metadata, reports);
        info!(
            modules = catalog.reports.len(),
            symbols = catalog.symbol_count(),
            failures = catalog.failure_count(),
            "catalog assembled"
        );
        Ok(catalog)
    }
}

/// Catalog an installed distribution.
///
/// Site directories come from `options.search_paths`, or from the interpreter's
/// `sys.path` when none are given. If the interpreter cannot be queried either,
/// nothing is searched and the distribution is reported as not found.
///
/// ```rust,no_run
/// use distscan_core::{scan_distribution, ScanOptions};
/// use distscan_core::walker::WalkMode;
///
/// let options = ScanOptions {
///     mode: WalkMode::Static,
///     ..ScanOptions::default()
/// };
/// let catalog = scan_distribution("requests", &options)?;
/// println!("{} modules", catalog.reports.len());
/// # Ok::<(), distscan_core::error::ScanError>(())
/// ```
pub fn scan_distribution(name: &str, options: &ScanOptions) -> ScanResult<Catalog>
{
    let interpreter = Interpreter::new(&options.python).with_extra_paths(options.search_paths.clone());

    let search_paths = if options.search_paths.is_empty() {
        match interpreter.sys_path() {
            Ok(paths) => paths.to_vec(),
            Err(e) => {
                warn!(error = %e, "could not discover search paths from the interpreter");
                Vec::new()
            }
        }
    } else {
        options.search_paths.clone()
    };

    let store = SitePackages::new(search_paths.clone());
    let walker = create_walker(
        options.mode,
        interpreter,
        search_paths,
        NameFilter::new(options.include_private),
    );
    Scanner::new(&store, walker.as_ref()).scan(name)
}
