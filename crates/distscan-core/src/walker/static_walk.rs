//! Static (no-execution) module walker.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace, warn};
use walkdir::{DirEntry, WalkDir};

use super::{ModuleWalker, WalkMode};
use crate::error::{ScanError, ScanResult};
use crate::symbols::{extract_symbols, Member, MemberKind, NameFilter, SignatureSource};
use crate::syntax::{parse_module, Definition, DefinitionKind};
use crate::types::module_name::{PACKAGE_INIT, SOURCE_EXTENSION};
use crate::types::{ModuleName, ModuleReport};

/// Directory that holds bytecode caches and never contains importable sources.
const BYTECODE_CACHE_DIR: &str = "__pycache__";

/// Where an import root lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RootLocation
{
    /// `<dir>/<root>/__init__.py` exists.
    Package(PathBuf),
    /// `<dir>/<root>.py` exists.
    Module(PathBuf),
}

/// Catalogs modules by parsing their source files.
///
/// Package code is never executed. Namespace subdirectories (no `__init__.py`)
/// inside a package are walked as well, since their `.py` files are importable.
#[derive(Debug, Clone)]
pub struct StaticWalker
{
    search_paths: Vec<PathBuf>,
    filter: NameFilter,
}

impl StaticWalker
{
    pub fn new(search_paths: Vec<PathBuf>, filter: NameFilter) -> Self
    {
        Self { search_paths, filter }
    }

    /// First search directory holding the root, as a package or a single file.
    fn locate(&self, root: &str) -> Option<RootLocation>
    {
        self.search_paths.iter().find_map(|dir| {
            let package = dir.join(root);
            if package.join(format!("{PACKAGE_INIT}.{SOURCE_EXTENSION}")).is_file() {
                return Some(RootLocation::Package(package));
            }
            let module = dir.join(format!("{root}.{SOURCE_EXTENSION}"));
            module.is_file().then_some(RootLocation::Module(module))
        })
    }

    fn walk_package(&self, root: &str, package_dir: &Path) -> Vec<ModuleReport>
    {
        let sources = match collect_sources(package_dir) {
            Ok(sources) => sources,
            Err(e) => return vec![ModuleReport::failed(root, ScanError::Io(e))],
        };

        let mut modules: BTreeMap<ModuleName, PathBuf> = BTreeMap::new();
        for relative in sources {
            let Some(name) = ModuleName::for_source_file(root, &relative) else {
                warn!(path = %relative.display(), "skipping source file with a non UTF-8 name");
                continue;
            };
            let is_package_init = relative.file_stem().is_some_and(|stem| stem == PACKAGE_INIT);
            match modules.get(&name) {
                Some(existing) => {
                    let existing_is_init = existing.file_stem().is_some_and(|stem| stem == PACKAGE_INIT);
                    warn!(module = %name, "module file shadowed by a package with the same name");
                    if is_package_init && !existing_is_init {
                        modules.insert(name, package_dir.join(relative));
                    }
                }
                None => {
                    modules.insert(name, package_dir.join(relative));
                }
            }
        }

        modules
            .into_iter()
            .map(|(name, path)| scan_source_file(&name.as_dotted(), &path, self.filter))
            .collect()
    }
}

impl ModuleWalker for StaticWalker
{
    fn enumerate_modules(&self, root: &str) -> Vec<ModuleReport>
    {
        match self.locate(root) {
            Some(RootLocation::Package(dir)) => {
                info!(root, dir = %dir.display(), "walking package sources");
                self.walk_package(root, &dir)
            }
            Some(RootLocation::Module(file)) => {
                info!(root, file = %file.display(), "parsing single-file module");
                vec![scan_source_file(root, &file, self.filter)]
            }
            None => {
                warn!(root, "import root not found in any search path");
                vec![ModuleReport::failed(root, ScanError::RootNotLocated(root.to_string()))]
            }
        }
    }

    fn mode(&self) -> WalkMode
    {
        WalkMode::Static
    }
}

/// Parse one source file into a report for `module`.
pub fn scan_source_file(module: &str, path: &Path, filter: NameFilter) -> ModuleReport
{
    debug!(module, path = %path.display(), "parsing module source");
    match parse_members(path) {
        Ok(members) => ModuleReport::with_symbols(module, extract_symbols(members, filter)),
        Err(e) => {
            warn!(module, error = %e, "module could not be parsed");
            ModuleReport::failed(module, e)
        }
    }
}

fn parse_members(path: &Path) -> ScanResult<Vec<Member>>
{
    let source = fs::read_to_string(path)?;
    let parsed = parse_module(&source).map_err(|e| ScanError::ModuleParseFailed {
        path: path.to_path_buf(),
        line: e.line,
        message: e.message,
    })?;

    let defined_in = path.to_string_lossy().into_owned();
    Ok(parsed
        .definitions
        .into_iter()
        .map(|definition| member_from_definition(definition, &defined_in))
        .collect())
}

fn member_from_definition(definition: Definition, defined_in: &str) -> Member
{
    let (kind, signature) = match definition.kind {
        DefinitionKind::Function => (MemberKind::Function, SignatureSource::Parameters(definition.params)),
        DefinitionKind::Class => (MemberKind::Class, SignatureSource::RequiresExecution),
    };
    Member {
        name: definition.name,
        kind,
        signature,
        doc: definition.docstring,
        defined_in: Some(defined_in.to_string()),
        line_no: u32::try_from(definition.line).ok(),
    }
}

/// Gather `.py` files below `package_dir`, as paths relative to it.
///
/// Siblings are visited in file-name order and symlinks are followed. Hidden
/// directories and bytecode caches are pruned. Unreadable entries below the
/// starting directory are logged and skipped.
fn collect_sources(package_dir: &Path) -> std::io::Result<Vec<PathBuf>>
{
    let mut sources = Vec::new();
    let entries = WalkDir::new(package_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "could not read directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !entry.path().extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(package_dir) {
            sources.push(relative.to_path_buf());
        }
    }
    Ok(sources)
}

fn is_skipped_dir(entry: &DirEntry) -> bool
{
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name();
    let skipped = name == BYTECODE_CACHE_DIR || name.to_string_lossy().starts_with('.');
    if skipped {
        trace!(dir = %entry.path().display(), "skipping directory");
    }
    skipped
}

#[cfg(test)]
mod tests
{
    use tempfile::TempDir;

    use super::*;
    use crate::symbols::CLASS_SIGNATURE_PLACEHOLDER;
    use crate::types::SymbolKind;

    fn write(dir: &Path, relative: &str, contents: &str)
    {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn walker(dir: &TempDir) -> StaticWalker
    {
        StaticWalker::new(vec![dir.path().to_path_buf()], NameFilter::default())
    }

    #[test]
    fn test_walks_package_tree()
    {
        let site = TempDir::new().unwrap();
        write(site.path(), "pkg/__init__.py", "def top():\n    pass\n");
        write(site.path(), "pkg/sub/__init__.py", "");
        write(site.path(), "pkg/sub/leaf.py", "class Leaf:\n    pass\n");
        write(site.path(), "pkg/__pycache__/cached.py", "def nope(): pass\n");
        write(site.path(), "pkg/.hidden/secret.py", "def nope(): pass\n");
        write(site.path(), "pkg/sub/.git/hooks.py", "def nope(): pass\n");
        write(site.path(), "pkg/sub/__pycache__/leaf.py", "def nope(): pass\n");
        write(site.path(), "pkg/data.txt", "not python");

        let reports = walker(&site).enumerate_modules("pkg");
        let modules: Vec<&str> = reports.iter().map(|report| report.module.as_str()).collect();
        assert_eq!(modules, ["pkg", "pkg.sub", "pkg.sub.leaf"]);

        let leaf = &reports[2];
        assert_eq!(leaf.symbols[0].kind, SymbolKind::Class);
        assert_eq!(leaf.symbols[0].signature, CLASS_SIGNATURE_PLACEHOLDER);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_subpackage_is_walked()
    {
        let site = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        write(site.path(), "pkg/__init__.py", "");
        write(elsewhere.path(), "linked/__init__.py", "def through_link(): pass\n");
        std::os::unix::fs::symlink(elsewhere.path().join("linked"), site.path().join("pkg/linked")).unwrap();

        let reports = walker(&site).enumerate_modules("pkg");
        let linked = reports.iter().find(|report| report.module == "pkg.linked").unwrap();
        assert_eq!(linked.symbols[0].name, "through_link");
    }

    #[test]
    fn test_single_file_module()
    {
        let site = TempDir::new().unwrap();
        write(site.path(), "solo.py", "def go(a, *rest):\n    \"\"\"Go.\"\"\"\n");

        let reports = walker(&site).enumerate_modules("solo");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].module, "solo");
        assert_eq!(reports[0].symbols[0].signature, "(a, *rest)");
        assert_eq!(reports[0].symbols[0].doc_head, "Go.");
        assert_eq!(reports[0].symbols[0].line_no, Some(1));
    }

    #[test]
    fn test_package_directory_wins_over_module_file()
    {
        let site = TempDir::new().unwrap();
        write(site.path(), "pkg/__init__.py", "");
        write(site.path(), "pkg/dup.py", "def from_file(): pass\n");
        write(site.path(), "pkg/dup/__init__.py", "def from_package(): pass\n");

        let reports = walker(&site).enumerate_modules("pkg");
        let dup = reports.iter().find(|report| report.module == "pkg.dup").unwrap();
        assert_eq!(dup.symbols[0].name, "from_package");
        assert_eq!(reports.iter().filter(|report| report.module == "pkg.dup").count(), 1);
    }

    #[test]
    fn test_parse_failure_is_isolated()
    {
        let site = TempDir::new().unwrap();
        write(site.path(), "pkg/__init__.py", "");
        write(site.path(), "pkg/bad.py", "def broken(:\n");
        write(site.path(), "pkg/good.py", "def fine(): pass\n");

        let reports = walker(&site).enumerate_modules("pkg");
        let bad = reports.iter().find(|report| report.module == "pkg.bad").unwrap();
        assert!(bad.error.as_deref().unwrap().starts_with("SyntaxError:"));
        assert!(bad.symbols.is_empty());

        let good = reports.iter().find(|report| report.module == "pkg.good").unwrap();
        assert!(good.error.is_none());
        assert_eq!(good.symbols[0].name, "fine");
    }

    #[test]
    fn test_missing_root_is_reported()
    {
        let site = TempDir::new().unwrap();
        let reports = walker(&site).enumerate_modules("ghost");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].module, "ghost");
        assert!(reports[0].error.as_deref().unwrap().contains("ghost"));
    }

    #[test]
    fn test_first_search_path_wins()
    {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write(first.path(), "pkg.py", "def one(): pass\n");
        write(second.path(), "pkg/__init__.py", "def two(): pass\n");

        let walker = StaticWalker::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            NameFilter::default(),
        );
        let reports = walker.enumerate_modules("pkg");
        assert_eq!(reports[0].symbols[0].name, "one");
    }
}
