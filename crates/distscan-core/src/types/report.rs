//! Per-module results and the terminal catalog.

use serde::{Deserialize, Serialize};

use super::{DistributionMetadata, Symbol};

/// Result of visiting one module: either its symbols or a failure description.
///
/// A module that failed to load or parse always has an empty symbol list, so
/// "no public symbols" and "errored" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReport
{
    /// Dotted module path.
    pub module: String,
    pub error: Option<String>,
    #[serde(rename = "items")]
    pub symbols: Vec<Symbol>,
}

impl ModuleReport
{
    /// Report for a module that was visited successfully.
    pub fn with_symbols(module: impl Into<String>, symbols: Vec<Symbol>) -> Self
    {
        Self {
            module: module.into(),
            error: None,
            symbols,
        }
    }

    /// Report for a module that could not be loaded or parsed.
    pub fn failed(module: impl Into<String>, error: impl ToString) -> Self
    {
        Self {
            module: module.into(),
            error: Some(error.to_string()),
            symbols: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool
    {
        self.error.is_some()
    }
}

/// Terminal artifact of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog
{
    #[serde(rename = "meta")]
    pub metadata: DistributionMetadata,
    /// Sorted by module name, ascending.
    pub reports: Vec<ModuleReport>,
}

impl Catalog
{
    /// Wrap reports, sorting them by module name.
    ///
    /// The sort is stable, so reports sharing a name keep their traversal order.
    pub fn new(metadata: DistributionMetadata, mut reports: Vec<ModuleReport>) -> Self
    {
        reports.sort_by(|a, b| a.module.cmp(&b.module));
        Self { metadata, reports }
    }

    /// Number of reports carrying an error.
    #[must_use]
    pub fn failure_count(&self) -> usize
    {
        self.reports.iter().filter(|report| report.is_failure()).count()
    }

    /// Total number of symbols across all reports.
    #[must_use]
    pub fn symbol_count(&self) -> usize
    {
        self.reports.iter().map(|report| report.symbols.len()).sum()
    }
}
