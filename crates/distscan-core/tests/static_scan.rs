//! End-to-end static scans over a temporary site directory

use std::fs;
use std::path::Path;

use distscan_core::render::{to_json, to_markdown};
use distscan_core::{scan_distribution, ScanOptions, SymbolKind, WalkMode};
use tempfile::TempDir;

fn write(dir: &Path, relative: &str, contents: &str)
{
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn static_options(site: &TempDir, include_private: bool) -> ScanOptions
{
    ScanOptions {
        mode: WalkMode::Static,
        include_private,
        search_paths: vec![site.path().to_path_buf()],
        ..ScanOptions::default()
    }
}

fn demo_site() -> TempDir
{
    let site = TempDir::new().unwrap();
    write(site.path(), "demo_pkg-1.0.dist-info/METADATA", "Metadata-Version: 2.1\nName: demo_pkg\nVersion: 1.0\n");
    write(site.path(), "demo_pkg-1.0.dist-info/top_level.txt", "demo_pkg\n");
    write(
        site.path(),
        "demo_pkg-1.0.dist-info/RECORD",
        "demo_pkg/__init__.py,,\ndemo_pkg-1.0.dist-info/METADATA,,\n",
    );
    write(
        site.path(),
        "demo_pkg/__init__.py",
        "def add(x, y):\n    \"\"\"Adds two numbers.\"\"\"\n    return x + y\n",
    );
    site
}

#[test]
fn test_demo_package_catalog()
{
    let site = demo_site();
    let catalog = scan_distribution("demo_pkg", &static_options(&site, false)).unwrap();

    assert_eq!(catalog.metadata.name, "demo_pkg");
    assert_eq!(catalog.metadata.version, "1.0");
    assert_eq!(catalog.metadata.import_roots, ["demo_pkg"]);
    assert_eq!(
        catalog.metadata.install_location.as_deref(),
        Some(site.path().to_string_lossy().as_ref())
    );

    assert_eq!(catalog.reports.len(), 1);
    let report = &catalog.reports[0];
    assert_eq!(report.module, "demo_pkg");
    assert!(report.error.is_none());
    assert_eq!(report.symbols.len(), 1);

    let add = &report.symbols[0];
    assert_eq!(add.name, "add");
    assert_eq!(add.kind, SymbolKind::Function);
    assert_eq!(add.signature, "(x, y)");
    assert_eq!(add.doc_head, "Adds two numbers.");
    assert_eq!(add.line_no, Some(1));
    assert!(add.defined_in.as_deref().unwrap().ends_with("__init__.py"));
}

#[test]
fn test_failures_are_isolated_and_reports_sorted()
{
    let site = TempDir::new().unwrap();
    write(site.path(), "mixed-2.0.dist-info/METADATA", "Name: mixed\nVersion: 2.0\n");
    write(
        site.path(),
        "mixed-2.0.dist-info/RECORD",
        "mixed/__init__.py,,\nmixed/zeta.py,,\nmixed/alpha.py,,\nmixed/broken.py,,\nhelpers.py,,\n",
    );
    write(site.path(), "mixed/__init__.py", "");
    write(site.path(), "mixed/zeta.py", "class Zeta:\n    \"\"\"Last letter.\"\"\"\n");
    write(site.path(), "mixed/alpha.py", "def _hidden():\n    pass\n\ndef shown(a, *, b):\n    pass\n");
    write(site.path(), "mixed/broken.py", "def broken(\n");
    write(site.path(), "helpers.py", "async def fetch(url, **kw):\n    pass\n");

    let catalog = scan_distribution("mixed", &static_options(&site, false)).unwrap();
    assert_eq!(catalog.metadata.import_roots, ["helpers", "mixed"]);

    let modules: Vec<&str> = catalog.reports.iter().map(|report| report.module.as_str()).collect();
    assert_eq!(modules, ["helpers", "mixed", "mixed.alpha", "mixed.broken", "mixed.zeta"]);

    let broken = &catalog.reports[3];
    assert!(broken.error.is_some());
    assert!(broken.symbols.is_empty());

    let alpha = &catalog.reports[2];
    assert_eq!(alpha.symbols.len(), 1);
    assert_eq!(alpha.symbols[0].signature, "(a, b)");

    assert_eq!(catalog.reports[0].symbols[0].signature, "(url, **kw)");
    assert_eq!(catalog.reports[4].symbols[0].kind, SymbolKind::Class);

    let with_private = scan_distribution("mixed", &static_options(&site, true)).unwrap();
    let alpha = with_private.reports.iter().find(|report| report.module == "mixed.alpha").unwrap();
    let names: Vec<&str> = alpha.symbols.iter().map(|symbol| symbol.name.as_str()).collect();
    assert_eq!(names, ["_hidden", "shown"]);
}

#[test]
fn test_static_scan_is_deterministic()
{
    let site = demo_site();
    let options = static_options(&site, false);
    let first = scan_distribution("demo_pkg", &options).unwrap();
    let second = scan_distribution("demo_pkg", &options).unwrap();

    assert_eq!(to_json(&first).unwrap(), to_json(&second).unwrap());
    assert_eq!(to_markdown(&first), to_markdown(&second));
}

#[test]
fn test_distribution_without_roots()
{
    let site = TempDir::new().unwrap();
    write(site.path(), "data_only-0.1.dist-info/METADATA", "Name: data_only\nVersion: 0.1\n");
    write(site.path(), "data_only-0.1.dist-info/RECORD", "share/data_only/table.csv,,\n");

    let catalog = scan_distribution("data-only", &static_options(&site, false)).unwrap();
    assert!(catalog.metadata.import_roots.is_empty());
    assert_eq!(catalog.reports.len(), 1);
    assert_eq!(catalog.reports[0].module, "(no top-level packages found)");
    assert!(catalog.reports[0].error.is_some());
}

#[test]
fn test_unknown_distribution_is_fatal()
{
    let site = demo_site();
    let err = scan_distribution("not-installed", &static_options(&site, false)).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.to_string(), "No package metadata was found for not-installed");
}
