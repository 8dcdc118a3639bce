//! Dotted module names.

use std::fmt;
use std::path::{Component, Path};

use smallvec::SmallVec;

/// Source file extension of Python modules.
pub const SOURCE_EXTENSION: &str = "py";

/// File stem marking a directory as a regular package.
pub const PACKAGE_INIT: &str = "__init__";

/// An absolute, non-empty dotted module name such as `pkg.sub.mod`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleName(SmallVec<[String; 4]>);

impl ModuleName
{
    /// Build from a single top-level name.
    pub fn root(name: impl Into<String>) -> Self
    {
        let mut segments = SmallVec::new();
        segments.push(name.into());
        Self(segments)
    }

    /// Dotted name of a source file located at `relative` inside the package
    /// directory of `root`.
    ///
    /// `pkg/__init__.py` names the package itself, so `("pkg", "sub/__init__.py")`
    /// yields `pkg.sub` and `("pkg", "__init__.py")` yields `pkg`. Returns `None`
    /// when the path is not a `.py` file or has a segment that is not valid UTF-8.
    pub fn for_source_file(root: &str, relative: &Path) -> Option<Self>
    {
        if relative.extension()? != SOURCE_EXTENSION {
            return None;
        }

        let mut name = Self::root(root);
        let without_extension = relative.with_extension("");
        for component in without_extension.components() {
            match component {
                Component::Normal(segment) => name.0.push(segment.to_str()?.to_string()),
                _ => return None,
            }
        }

        if name.0.len() > 1 && name.last() == PACKAGE_INIT {
            name.0.pop();
        }
        Some(name)
    }

    /// Last segment.
    pub fn last(&self) -> &str
    {
        &self.0[self.0.len() - 1]
    }

    pub fn segments(&self) -> &[String]
    {
        &self.0
    }

    pub fn as_dotted(&self) -> String
    {
        self.0.join(".")
    }
}

impl fmt::Display for ModuleName
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.as_dotted())
    }
}

#[cfg(test)]
mod tests
{
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_init_file_names_the_package()
    {
        let name = ModuleName::for_source_file("pkg", &PathBuf::from("__init__.py")).unwrap();
        assert_eq!(name.to_string(), "pkg");

        let name = ModuleName::for_source_file("pkg", &PathBuf::from("sub/__init__.py")).unwrap();
        assert_eq!(name.to_string(), "pkg.sub");
    }

    #[test]
    fn test_plain_module_file()
    {
        let name = ModuleName::for_source_file("pkg", &PathBuf::from("sub/helpers.py")).unwrap();
        assert_eq!(name.to_string(), "pkg.sub.helpers");
        assert_eq!(name.segments(), ["pkg", "sub", "helpers"]);
        assert_eq!(name.last(), "helpers");
    }

    #[test]
    fn test_non_source_file_is_rejected()
    {
        assert!(ModuleName::for_source_file("pkg", &PathBuf::from("data.json")).is_none());
        assert!(ModuleName::for_source_file("pkg", &PathBuf::from("README")).is_none());
    }
}
