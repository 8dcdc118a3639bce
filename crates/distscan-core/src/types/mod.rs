//! Catalog data model.

pub mod metadata;
pub mod module_name;
pub mod report;
pub mod symbol;

pub use metadata::DistributionMetadata;
pub use module_name::ModuleName;
pub use report::{Catalog, ModuleReport};
pub use symbol::{ParamKind, Parameter, Symbol, SymbolKind};
