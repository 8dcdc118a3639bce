//! # Error Types
//!
//! General error handling for the catalog pipeline.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Only [`ScanError::DistributionNotFound`] is ever returned to the caller of
//! [`crate::scan_distribution`]. Every other variant is raised inside a walker
//! and turned into the text of a [`crate::types::ModuleReport`], so the produced
//! catalog stays complete even when every module failed.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for catalog operations
///
/// ## Error Categories
///
/// 1. **Fatal**: DistributionNotFound
/// 2. **Per distribution**: RootInferenceFailed
/// 3. **Per module**: ModuleLoadFailed, ModuleParseFailed, RootNotLocated
/// 4. **Environment**: Interpreter, Io, Json, InvalidArgument
#[derive(Error, Debug)]
pub enum ScanError
{
    /// No metadata directory matched the requested distribution name
    ///
    /// This is the only condition that aborts a run. It happens when:
    /// - The distribution is not installed in any of the searched site directories
    /// - The name is misspelled (names are compared after PEP 503 normalization)
    /// - No search directories were configured and the interpreter could not report any
    #[error("No package metadata was found for {0}")]
    DistributionNotFound(String),

    /// Neither `top_level.txt` nor the file manifest yielded an import root
    #[error("Missing top_level.txt and could not infer import roots from files.")]
    RootInferenceFailed,

    /// Importing a module raised, or the probe process died while importing it
    ///
    /// The reason is the `repr` of the raised exception as reported by the probe.
    #[error("{reason}")]
    ModuleLoadFailed
    {
        /// Dotted module name
        module: String,
        /// Failure description
        reason: String,
    },

    /// A source file could not be tokenized or parsed
    #[error("SyntaxError: {message} ({}, line {line})", path.display())]
    ModuleParseFailed
    {
        /// File being parsed
        path: PathBuf,
        /// One-based line of the offending token
        line: usize,
        /// Parser message
        message: String,
    },

    /// Static mode found neither a package directory nor a single-file module
    #[error("could not locate a package directory or module file for '{0}'")]
    RootNotLocated(String),

    /// The Python interpreter could not be started or returned unusable output
    #[error("Python interpreter error: {0}")]
    Interpreter(String),

    /// Invalid argument passed to a library function
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error (reading metadata, source files, writing output)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScanError
{
    /// Whether this error must abort the whole run.
    #[must_use]
    pub fn is_fatal(&self) -> bool
    {
        matches!(self, ScanError::DistributionNotFound(_))
    }
}

/// Convenience type alias for `Result<T, ScanError>`
///
/// ```rust
/// use distscan_core::error::ScanResult;
/// fn foo() -> ScanResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type ScanResult<T> = std::result::Result<T, ScanError>;
