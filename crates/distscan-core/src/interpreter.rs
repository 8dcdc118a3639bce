//! # Python Interpreter
//!
//! Runs short scripts in a Python interpreter subprocess.
//!
//! Every script runs in a fresh process, so a module that crashes the interpreter
//! or calls `sys.exit` while being imported cannot take the catalog run down
//! with it. Output is captured in full and handed back as [`ScriptOutput`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{ScanError, ScanResult};

const SYS_PATH_SCRIPT: &str = "import json, sys; print(json.dumps(sys.path))";

/// Captured result of one interpreter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutput
{
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `None` when the process was killed by a signal.
    pub status: Option<i32>,
}

impl ScriptOutput
{
    #[must_use]
    pub fn success(&self) -> bool
    {
        self.status == Some(0)
    }

    /// Short description of how the process ended, e.g. `exit status 1: ImportError`.
    #[must_use]
    pub fn exit_summary(&self) -> String
    {
        let status = match self.status {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        };
        match self.last_stderr_line() {
            Some(line) => format!("{status}: {line}"),
            None => status,
        }
    }

    /// Last non-blank line written to stderr.
    #[must_use]
    pub fn last_stderr_line(&self) -> Option<&str>
    {
        self.stderr.lines().map(str::trim).filter(|line| !line.is_empty()).last()
    }
}

impl From<Output> for ScriptOutput
{
    fn from(output: Output) -> Self
    {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        }
    }
}

/// Handle on a Python executable.
///
/// `extra_paths` are prepended to `PYTHONPATH` for every script, which makes them
/// importable in reflective mode and puts them on the reported `sys.path`.
#[derive(Debug)]
pub struct Interpreter
{
    executable: PathBuf,
    extra_paths: Vec<PathBuf>,
    sys_path: OnceCell<Vec<PathBuf>>,
}

impl Interpreter
{
    pub fn new(executable: impl Into<PathBuf>) -> Self
    {
        Self {
            executable: executable.into(),
            extra_paths: Vec::new(),
            sys_path: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn with_extra_paths(mut self, paths: Vec<PathBuf>) -> Self
    {
        self.extra_paths = paths;
        self
    }

    pub fn executable(&self) -> &Path
    {
        &self.executable
    }

    /// The interpreter's import path: existing directories only, queried once.
    pub fn sys_path(&self) -> ScanResult<&[PathBuf]>
    {
        self.sys_path
            .get_or_try_init(|| self.query_sys_path())
            .map(Vec::as_slice)
    }

    fn query_sys_path(&self) -> ScanResult<Vec<PathBuf>>
    {
        let output = self.run_script(SYS_PATH_SCRIPT, &[])?;
        if !output.success() {
            return Err(ScanError::Interpreter(format!(
                "could not query sys.path ({})",
                output.exit_summary()
            )));
        }

        let entries: Vec<String> = serde_json::from_str(output.stdout.trim())?;
        let dirs: Vec<PathBuf> = entries
            .into_iter()
            .filter(|entry| !entry.is_empty())
            .map(PathBuf::from)
            .filter(|path| path.is_dir())
            .collect();
        info!(count = dirs.len(), "discovered interpreter search paths");
        Ok(dirs)
    }

    /// Run `script` with `python -c`, passing `args` as `sys.argv[1..]`.
    ///
    /// Only a failure to start the process is an error; a non-zero exit is
    /// reported through [`ScriptOutput::status`].
    pub fn run_script(&self, script: &str, args: &[&str]) -> ScanResult<ScriptOutput>
    {
        debug!(python = %self.executable.display(), ?args, "running interpreter script");
        let output = self
            .command()?
            .arg("-c")
            .arg(script)
            .args(args)
            .output()
            .map_err(|e| {
                ScanError::Interpreter(format!("failed to start '{}': {e}", self.executable.display()))
            })?;
        Ok(ScriptOutput::from(output))
    }

    fn command(&self) -> ScanResult<Command>
    {
        let mut command = Command::new(&self.executable);
        command
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(python_path) = self.python_path()? {
            command.env("PYTHONPATH", python_path);
        }
        Ok(command)
    }

    fn python_path(&self) -> ScanResult<Option<OsString>>
    {
        if self.extra_paths.is_empty() {
            return Ok(None);
        }
        let mut paths = self.extra_paths.clone();
        if let Some(existing) = std::env::var_os("PYTHONPATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        std::env::join_paths(paths)
            .map(Some)
            .map_err(|e| ScanError::InvalidArgument(format!("search path: {e}")))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_exit_summary_uses_last_stderr_line()
    {
        let output = ScriptOutput {
            stdout: String::new(),
            stderr: "Traceback (most recent call last):\n  ...\nRuntimeError: boom\n\n".to_string(),
            status: Some(1),
        };
        assert!(!output.success());
        assert_eq!(output.exit_summary(), "exit status 1: RuntimeError: boom");
    }

    #[test]
    fn test_exit_summary_for_signal()
    {
        let output = ScriptOutput {
            status: None,
            ..ScriptOutput::default()
        };
        assert_eq!(output.exit_summary(), "terminated by signal");
    }

    #[test]
    fn test_missing_executable_is_an_interpreter_error()
    {
        let interpreter = Interpreter::new("/nonexistent/distscan-python");
        let err = interpreter.run_script("pass", &[]).unwrap_err();
        assert!(matches!(err, ScanError::Interpreter(_)));
        assert!(interpreter.sys_path().is_err());
    }

    #[test]
    fn test_python_path_prepends_extra_paths()
    {
        let interpreter = Interpreter::new("python3").with_extra_paths(vec![PathBuf::from("/opt/site")]);
        let joined = interpreter.python_path().unwrap().unwrap();
        let paths: Vec<PathBuf> = std::env::split_paths(&joined).collect();
        assert_eq!(paths[0], PathBuf::from("/opt/site"));
        assert!(Interpreter::new("python3").python_path().unwrap().is_none());
    }
}
