use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use distscan_core::render::{to_json, to_markdown};
use distscan_core::{scan_distribution, ScanOptions, ScanResult, WalkMode};
use distscan_utils::{error, info, init_logging, LogLevel, Settings};

/// Catalog the importable modules, functions and classes of an installed Python distribution.
#[derive(Parser, Debug)]
#[command(name = "distscan")]
#[command(version)]
#[command(about = "Scan a Python distribution (pip name) and catalog its importable modules", long_about = None)]
struct Cli
{
    /// Distribution name (pip install name), e.g. requests
    #[arg(long)]
    dist: String,
    /// Parse source files instead of importing them (no package code runs)
    #[arg(long, default_value_t = false)]
    ast: bool,
    /// Include names starting with an underscore
    #[arg(long, default_value_t = false)]
    include_private: bool,
    /// Write the JSON catalog to this file
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,
    /// Write a Markdown report to this file
    #[arg(long, value_name = "PATH")]
    md: Option<PathBuf>,
    /// Do not print the JSON catalog to stdout
    #[arg(long, default_value_t = false)]
    quiet: bool,
    /// Python executable [env: DISTSCAN_PYTHON, default: python3]
    #[arg(long, value_name = "EXECUTABLE")]
    python: Option<PathBuf>,
    /// Site directory to search (repeatable) [env: DISTSCAN_PATH, default: sys.path]
    #[arg(long = "search-path", value_name = "DIR")]
    search_paths: Vec<PathBuf>,
    /// Log level: error, warn, info, debug or trace [default: RUST_LOG or warn]
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

impl Cli
{
    /// Command-line values take precedence over the environment.
    fn scan_options(&self, settings: &Settings) -> ScanOptions
    {
        ScanOptions {
            mode: if self.ast { WalkMode::Static } else { WalkMode::Reflective },
            include_private: self.include_private,
            python: self.python.clone().unwrap_or_else(|| settings.python.clone()),
            search_paths: if self.search_paths.is_empty() {
                settings.search_paths.clone()
            } else {
                self.search_paths.clone()
            },
        }
    }
}

fn main()
{
    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let _log_guard = match init_logging(&settings, cli.log_level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &settings) {
        error!(error = %e, "scan failed");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli, settings: &Settings) -> ScanResult<()>
{
    let options = cli.scan_options(settings);
    info!(dist = %cli.dist, mode = %options.mode, "scanning distribution");

    let catalog = scan_distribution(&cli.dist, &options)?;
    let json = to_json(&catalog)?;

    if !cli.quiet {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}")?;
        stdout.flush()?;
    }
    if let Some(path) = &cli.md {
        write_output(path, &to_markdown(&catalog))?;
    }
    if let Some(path) = &cli.json {
        write_output(path, &json)?;
    }
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> ScanResult<()>
{
    fs::write(path, contents)?;
    info!(path = %path.display(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_flags_override_settings()
    {
        let cli = Cli::parse_from([
            "distscan",
            "--dist",
            "demo",
            "--ast",
            "--python",
            "/opt/python",
            "--search-path",
            "/a",
            "--search-path",
            "/b",
        ]);
        let settings = Settings {
            python: PathBuf::from("python3"),
            search_paths: vec![PathBuf::from("/env")],
            ..Settings::default()
        };

        let options = cli.scan_options(&settings);
        assert_eq!(options.mode, WalkMode::Static);
        assert_eq!(options.python, PathBuf::from("/opt/python"));
        assert_eq!(options.search_paths, [PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(!options.include_private);
    }

    #[test]
    fn test_settings_fill_missing_flags()
    {
        let cli = Cli::parse_from(["distscan", "--dist", "demo", "--include-private", "--log-level", "debug"]);
        let settings = Settings {
            python: PathBuf::from("/usr/bin/python3.11"),
            search_paths: vec![PathBuf::from("/env")],
            ..Settings::default()
        };

        let options = cli.scan_options(&settings);
        assert_eq!(options.mode, WalkMode::Reflective);
        assert_eq!(options.python, PathBuf::from("/usr/bin/python3.11"));
        assert_eq!(options.search_paths, [PathBuf::from("/env")]);
        assert!(options.include_private);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn test_dist_is_required()
    {
        assert!(Cli::try_parse_from(["distscan", "--ast"]).is_err());
    }
}
