//! # distscan-core
//!
//! Catalogs the public surface of an installed Python distribution.
//!
//! Given a distribution name, this crate finds every module the distribution
//! provides and lists the functions and classes each one exposes, with their
//! signatures, first documentation lines and source locations.
//!
//! ## Pipeline
//!
//! 1. [`distribution::DistributionResolver`] looks the name up in the site
//!    directories and derives the import roots.
//! 2. A [`walker::ModuleWalker`] visits each root and its descendants:
//!    - **reflective**: imports modules in a Python subprocess,
//!    - **static**: parses `.py` files without running them.
//! 3. [`symbols::extract_symbols`] filters and renders members the same way for
//!    both walkers.
//! 4. [`catalog::Scanner`] sorts everything into a [`types::Catalog`], which
//!    [`render`] turns into JSON or Markdown.
//!
//! ## Failure isolation
//!
//! Only an unknown distribution aborts a run. Modules that fail to import or
//! parse are recorded with their error and the scan moves on.

pub mod catalog;
pub mod distribution;
pub mod error;
pub mod interpreter;
pub mod prelude;
pub mod render;
pub mod symbols;
pub mod syntax;
pub mod types;
pub mod walker;

pub use catalog::{scan_distribution, ScanOptions, Scanner};
// Re-export commonly used types
pub use error::{ScanError, ScanResult};
pub use types::{Catalog, DistributionMetadata, ModuleReport, Symbol, SymbolKind};
pub use walker::{ModuleWalker, WalkMode};
