//! Command-line behavior of the `distscan` binary

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn write(dir: &Path, relative: &str, contents: &str)
{
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn demo_site() -> TempDir
{
    let site = TempDir::new().unwrap();
    write(site.path(), "demo_pkg-1.0.dist-info/METADATA", "Name: demo_pkg\nVersion: 1.0\n");
    write(site.path(), "demo_pkg-1.0.dist-info/RECORD", "demo_pkg/__init__.py,,\n");
    write(
        site.path(),
        "demo_pkg/__init__.py",
        "def add(x, y):\n    \"\"\"Adds two numbers.\"\"\"\n    return x + y\n",
    );
    site
}

fn python_available() -> bool
{
    Command::new("python3")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn distscan() -> Command
{
    let mut command = Command::new(env!("CARGO_BIN_EXE_distscan"));
    command.env_remove("DISTSCAN_LOG_FORMAT").env_remove("DISTSCAN_LOG_FILE");
    command
}

#[test]
fn test_static_scan_prints_json_to_stdout()
{
    let site = demo_site();
    let output = distscan()
        .args(["--dist", "demo_pkg", "--ast", "--search-path"])
        .arg(site.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["meta"]["version"], "1.0");
    assert_eq!(json["reports"][0]["module"], "demo_pkg");
    assert_eq!(json["reports"][0]["items"][0]["signature"], "(x, y)");
}

#[test]
fn test_quiet_run_writes_files_only()
{
    let site = demo_site();
    let out = TempDir::new().unwrap();
    let json_path = out.path().join("catalog.json");
    let md_path = out.path().join("catalog.md");

    let output = distscan()
        .args(["--dist", "demo-pkg", "--ast", "--quiet", "--search-path"])
        .arg(site.path())
        .arg("--json")
        .arg(&json_path)
        .arg("--md")
        .arg(&md_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["meta"]["roots"][0], "demo_pkg");

    let markdown = fs::read_to_string(&md_path).unwrap();
    assert!(markdown.starts_with("# Distribution Catalog: `demo_pkg`"));
    assert!(markdown.contains("| `add` | function | `(x, y)` | Adds two numbers. |"));
}

#[test]
fn test_unknown_distribution_exits_with_failure()
{
    let site = demo_site();
    let output = distscan()
        .args(["--dist", "missing", "--ast", "--search-path"])
        .arg(site.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No package metadata was found for missing"));
}

#[test]
fn test_working_directory_does_not_shadow_installed_package()
{
    if !python_available() {
        eprintln!("python3 not found; skipping");
        return;
    }

    let site = TempDir::new().unwrap();
    write(site.path(), "shadow_demo-1.0.dist-info/METADATA", "Name: shadow_demo\nVersion: 1.0\n");
    write(site.path(), "shadow_demo-1.0.dist-info/top_level.txt", "shadow_demo\n");
    write(site.path(), "shadow_demo/__init__.py", "def installed():\n    pass\n");

    let checkout = TempDir::new().unwrap();
    write(checkout.path(), "shadow_demo.py", "def local_checkout():\n    pass\n");

    let names = |mode: &[&str]| {
        let output = distscan()
            .current_dir(checkout.path())
            .args(["--dist", "shadow_demo", "--python", "python3", "--search-path"])
            .arg(site.path())
            .args(mode)
            .output()
            .unwrap();
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["reports"][0]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap().to_string())
            .collect::<Vec<_>>()
    };

    assert_eq!(names(&[]), ["installed"]);
    assert_eq!(names(&["--ast"]), ["installed"]);
}
