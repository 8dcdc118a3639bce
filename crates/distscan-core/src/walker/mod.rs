//! # Module Walkers
//!
//! A walker visits every module under one import root and produces one
//! [`ModuleReport`] per module.
//!
//! Two implementations exist:
//!
//! - [`ReflectiveWalker`]: imports each module in a Python interpreter subprocess
//!   and reads the live namespace. Most accurate, but runs package code.
//! - [`StaticWalker`]: reads `.py` files from disk and parses them. Never runs
//!   package code, and only sees what is written literally in the source.
//!
//! Both walkers feed [`crate::symbols::extract_symbols`], so a module's symbols
//! are filtered, ordered and rendered the same way in either mode.
//!
//! ## Failure isolation
//!
//! A walker never returns an error. A module that fails to import or parse
//! becomes a report with an error string and no symbols, and the walk goes on
//! with the next module.

mod reflective;
mod static_walk;

use std::fmt;
use std::path::PathBuf;

pub use reflective::{collect_reports, ReflectiveWalker, PROBE_MARKER, WALK_FAILURE_SUFFIX};
pub use static_walk::{scan_source_file, StaticWalker};

use crate::interpreter::Interpreter;
use crate::symbols::NameFilter;
use crate::types::ModuleReport;

/// Visits the modules of one import root.
pub trait ModuleWalker
{
    /// Reports for `root` and all of its descendant modules.
    ///
    /// Order is unspecified; the assembler sorts reports by module name.
    fn enumerate_modules(&self, root: &str) -> Vec<ModuleReport>;

    /// Which mode this walker implements.
    fn mode(&self) -> WalkMode;
}

/// How modules are cataloged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkMode
{
    /// Import modules and inspect them (default).
    #[default]
    Reflective,
    /// Parse source files without executing them.
    Static,
}

impl fmt::Display for WalkMode
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            WalkMode::Reflective => write!(f, "reflective"),
            WalkMode::Static => write!(f, "static"),
        }
    }
}

/// Create the walker for `mode`.
///
/// `search_paths` are the directories the static walker looks in for each root,
/// in order. The reflective walker ignores them and relies on the interpreter's
/// own import path (which already includes any explicitly configured paths).
///
/// ## Example
///
/// ```rust,no_run
/// use distscan_core::interpreter::Interpreter;
/// use distscan_core::symbols::NameFilter;
/// use distscan_core::walker::{create_walker, WalkMode};
///
/// let walker = create_walker(WalkMode::Static, Interpreter::new("python3"), Vec::new(), NameFilter::default());
/// let reports = walker.enumerate_modules("demo_pkg");
/// ```
pub fn create_walker(
    mode: WalkMode,
    interpreter: Interpreter,
    search_paths: Vec<PathBuf>,
    filter: NameFilter,
) -> Box<dyn ModuleWalker>
{
    match mode {
        WalkMode::Reflective => Box::new(ReflectiveWalker::new(interpreter, filter)),
        WalkMode::Static => Box::new(StaticWalker::new(search_paths, filter)),
    }
}
