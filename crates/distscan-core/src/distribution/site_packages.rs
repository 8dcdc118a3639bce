//! Installed-distribution lookup in site directories.
//!
//! Understands the two on-disk metadata layouts pip and setuptools produce:
//!
//! - `name-version.dist-info/` with `METADATA` and a `RECORD` file manifest,
//! - `name-version.egg-info/` with `PKG-INFO` and `installed-files.txt`
//!   (or a single `name-version.egg-info` file holding the `PKG-INFO` text).

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use super::store::{Distribution, MetadataStore};
use crate::error::{ScanError, ScanResult};

const DIST_INFO_SUFFIX: &str = ".dist-info";
const EGG_INFO_SUFFIX: &str = ".egg-info";

/// Metadata store backed by site directories, searched in order.
#[derive(Debug, Clone)]
pub struct SitePackages
{
    dirs: Vec<PathBuf>,
}

impl SitePackages
{
    pub fn new(dirs: Vec<PathBuf>) -> Self
    {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf]
    {
        &self.dirs
    }
}

impl MetadataStore for SitePackages
{
    fn distribution(&self, name: &str) -> ScanResult<Box<dyn Distribution>>
    {
        let wanted = normalize_name(name);
        for dir in &self.dirs {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping unreadable site directory");
                    continue;
                }
            };
            let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
            entries.sort_by_key(|entry| entry.file_name());

            for entry in entries {
                let file_name = entry.file_name();
                let Some(file_name) = file_name.to_str() else {
                    continue;
                };
                let Some((stem, layout)) = metadata_stem(file_name) else {
                    continue;
                };
                let project = stem.split_once('-').map_or(stem, |(project, _)| project);
                if normalize_name(project) != wanted {
                    continue;
                }

                debug!(name, metadata = %entry.path().display(), "found distribution metadata");
                return Ok(Box::new(InstalledDistribution {
                    site: dir.clone(),
                    metadata_path: entry.path(),
                    layout,
                }));
            }
        }
        Err(ScanError::DistributionNotFound(name.to_string()))
    }
}

/// Project name normalization: case-insensitive, with runs of `-`, `_` and `.`
/// treated as one separator.
pub fn normalize_name(name: &str) -> String
{
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('_');
            }
            in_separator = true;
        } else {
            normalized.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    normalized
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout
{
    DistInfo,
    EggInfo,
}

fn metadata_stem(file_name: &str) -> Option<(&str, Layout)>
{
    if let Some(stem) = file_name.strip_suffix(DIST_INFO_SUFFIX) {
        return Some((stem, Layout::DistInfo));
    }
    file_name.strip_suffix(EGG_INFO_SUFFIX).map(|stem| (stem, Layout::EggInfo))
}

/// A distribution found in a site directory.
#[derive(Debug, Clone)]
pub struct InstalledDistribution
{
    site: PathBuf,
    metadata_path: PathBuf,
    layout: Layout,
}

impl InstalledDistribution
{
    fn header(&self, key: &str) -> Option<String>
    {
        let text = match self.layout {
            Layout::DistInfo => self.read_text("METADATA")?,
            Layout::EggInfo if self.metadata_path.is_file() => fs::read_to_string(&self.metadata_path).ok()?,
            Layout::EggInfo => self.read_text("PKG-INFO")?,
        };
        metadata_header(&text, key)
    }

    /// Version from the metadata directory name, e.g. `demo_pkg-1.2.dist-info`.
    fn version_from_dir_name(&self) -> Option<String>
    {
        let file_name = self.metadata_path.file_name()?.to_str()?;
        let (stem, _) = metadata_stem(file_name)?;
        let (_, rest) = stem.split_once('-')?;
        let version = rest.split('-').next()?;
        (!version.is_empty()).then(|| version.to_string())
    }

    fn record_files(&self) -> Option<Vec<String>>
    {
        let record = self.read_text("RECORD")?;
        Some(
            record
                .lines()
                .filter_map(first_csv_field)
                .filter(|path| !path.is_empty())
                .collect(),
        )
    }

    fn installed_files(&self) -> Option<Vec<String>>
    {
        let listing = self.read_text("installed-files.txt")?;
        let egg_dir = self.metadata_path.file_name()?;
        Some(
            listing
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| site_relative(&Path::new(egg_dir).join(line)))
                .collect(),
        )
    }
}

impl Distribution for InstalledDistribution
{
    fn name(&self) -> Option<String>
    {
        self.header("Name")
    }

    fn version(&self) -> Option<String>
    {
        self.header("Version").or_else(|| self.version_from_dir_name())
    }

    fn read_text(&self, file: &str) -> Option<String>
    {
        if !self.metadata_path.is_dir() {
            return None;
        }
        let path = self.metadata_path.join(file);
        let text = fs::read_to_string(&path).ok();
        trace!(path = %path.display(), found = text.is_some(), "read metadata file");
        text
    }

    fn files(&self) -> Option<Vec<String>>
    {
        match self.layout {
            Layout::DistInfo => self.record_files(),
            Layout::EggInfo => self.installed_files(),
        }
    }

    fn locate_file(&self, path: &str) -> PathBuf
    {
        self.site.join(path)
    }
}

/// Value of the first `Key: value` header, before the message body.
fn metadata_header(text: &str, key: &str) -> Option<String>
{
    text.lines()
        .take_while(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case(key))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// First field of a `RECORD` line. Quoted fields may contain commas and `""`.
fn first_csv_field(line: &str) -> Option<String>
{
    let line = line.trim_end_matches('\r');
    if line.is_empty() {
        return None;
    }
    let Some(quoted) = line.strip_prefix('"') else {
        return Some(line.split(',').next().unwrap_or_default().to_string());
    };

    let mut field = String::new();
    let mut chars = quoted.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                field.push('"');
                chars.next();
            } else {
                break;
            }
        } else {
            field.push(c);
        }
    }
    Some(field)
}

/// Lexically normalize a path relative to the site directory into `/`-separated form.
fn site_relative(path: &Path) -> String
{
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            _ => {}
        }
    }
    parts.join("/")
}

#[cfg(test)]
mod tests
{
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, relative: &str, contents: &str)
    {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_normalize_name()
    {
        assert_eq!(normalize_name("Demo-Pkg"), "demo_pkg");
        assert_eq!(normalize_name("demo__pkg"), "demo_pkg");
        assert_eq!(normalize_name("zope.interface"), "zope_interface");
        assert_eq!(normalize_name("a-_.b"), "a_b");
    }

    #[test]
    fn test_dist_info_lookup()
    {
        let site = TempDir::new().unwrap();
        write(
            site.path(),
            "demo_pkg-1.2.dist-info/METADATA",
            "Metadata-Version: 2.1\nName: Demo-Pkg\nVersion: 1.2\n\nLong description\nVersion: nope\n",
        );
        write(
            site.path(),
            "demo_pkg-1.2.dist-info/RECORD",
            "demo_pkg/__init__.py,sha256=abc,10\n\"demo_pkg/odd,name.py\",,\ndemo_pkg-1.2.dist-info/RECORD,,\n",
        );

        let store = SitePackages::new(vec![site.path().to_path_buf()]);
        let dist = store.distribution("demo-pkg").unwrap();
        assert_eq!(dist.name().as_deref(), Some("Demo-Pkg"));
        assert_eq!(dist.version().as_deref(), Some("1.2"));
        assert_eq!(
            dist.files().unwrap(),
            ["demo_pkg/__init__.py", "demo_pkg/odd,name.py", "demo_pkg-1.2.dist-info/RECORD"]
        );
        assert_eq!(dist.locate_file("demo_pkg/__init__.py"), site.path().join("demo_pkg/__init__.py"));
        assert!(dist.read_text("top_level.txt").is_none());
    }

    #[test]
    fn test_egg_info_lookup()
    {
        let site = TempDir::new().unwrap();
        write(site.path(), "legacy-0.3-py3.11.egg-info/PKG-INFO", "Name: legacy\n");
        write(
            site.path(),
            "legacy-0.3-py3.11.egg-info/installed-files.txt",
            "../legacy/__init__.py\n../legacy/core.py\nPKG-INFO\n",
        );

        let store = SitePackages::new(vec![site.path().to_path_buf()]);
        let dist = store.distribution("Legacy").unwrap();
        assert_eq!(dist.version().as_deref(), Some("0.3"));
        assert_eq!(
            dist.files().unwrap(),
            ["legacy/__init__.py", "legacy/core.py", "legacy-0.3-py3.11.egg-info/PKG-INFO"]
        );
    }

    #[test]
    fn test_first_site_directory_wins()
    {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write(first.path(), "dup-1.0.dist-info/METADATA", "Name: dup\nVersion: 1.0\n");
        write(second.path(), "dup-2.0.dist-info/METADATA", "Name: dup\nVersion: 2.0\n");

        let store = SitePackages::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(store.distribution("dup").unwrap().version().as_deref(), Some("1.0"));
    }

    #[test]
    fn test_unknown_distribution()
    {
        let site = TempDir::new().unwrap();
        let store = SitePackages::new(vec![site.path().to_path_buf(), PathBuf::from("/nonexistent/site")]);
        let err = store.distribution("ghost").err().unwrap();
        assert!(matches!(err, ScanError::DistributionNotFound(ref name) if name == "ghost"));
        assert_eq!(err.to_string(), "No package metadata was found for ghost");
    }

    #[test]
    fn test_first_csv_field()
    {
        assert_eq!(first_csv_field("a/b.py,sha256=x,1").as_deref(), Some("a/b.py"));
        assert_eq!(first_csv_field("\"a \"\"q\"\".py\",,").as_deref(), Some("a \"q\".py"));
        assert_eq!(first_csv_field(""), None);
    }
}
