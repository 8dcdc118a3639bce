//! Reflective (importing) module walker.
//!
//! Each import root is handled by one run of an embedded probe script. The probe
//! imports the root, walks its subpackages with `pkgutil.iter_modules`, and
//! writes one JSON event per line to stdout, prefixed with [`PROBE_MARKER`]:
//!
//! ```text
//! @@distscan@@ {"event": "enter", "module": "pkg.sub"}
//! @@distscan@@ {"event": "report", "module": "pkg.sub", "members": [...]}
//! @@distscan@@ {"event": "report", "module": "pkg.bad", "error": "ImportError('x')"}
//! @@distscan@@ {"event": "walk_error", "error": "..."}
//! @@distscan@@ {"event": "done"}
//! ```
//!
//! Whatever package code prints goes to stderr, so stdout only carries events.
//! If the process dies between `enter` and `report`, the entered module is
//! reported as failed and the rest of that root is not visited.

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{ModuleWalker, WalkMode};
use crate::error::ScanError;
use crate::interpreter::{Interpreter, ScriptOutput};
use crate::symbols::{extract_symbols, Member, MemberKind, NameFilter, SignatureSource};
use crate::types::{ModuleReport, ParamKind, Parameter};

/// Prefix of every event line the probe writes.
pub const PROBE_MARKER: &str = "@@distscan@@ ";

/// Appended to the root name for reports about the subpackage walk itself.
pub const WALK_FAILURE_SUFFIX: &str = "__walk__";

const PROBE_SCRIPT: &str = include_str!("probe.py");

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ProbeEvent
{
    Enter
    {
        module: String,
    },
    Report
    {
        module: String,
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        members: Vec<ProbeMember>,
    },
    WalkError
    {
        error: String,
    },
    Done,
}

#[derive(Debug, Deserialize)]
struct ProbeMember
{
    name: String,
    kind: MemberKind,
    #[serde(default)]
    params: Option<Vec<(String, ParamKind)>>,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    line: Option<u32>,
}

impl From<ProbeMember> for Member
{
    fn from(member: ProbeMember) -> Self
    {
        let signature = match member.params {
            Some(params) => SignatureSource::Parameters(
                params
                    .into_iter()
                    .map(|(name, kind)| Parameter::new(name, kind))
                    .collect(),
            ),
            None => SignatureSource::Unavailable,
        };
        Member {
            name: member.name,
            kind: member.kind,
            signature,
            doc: member.doc,
            defined_in: member.file,
            line_no: member.line,
        }
    }
}

/// Catalogs modules by importing them in an interpreter subprocess.
#[derive(Debug)]
pub struct ReflectiveWalker
{
    interpreter: Interpreter,
    filter: NameFilter,
}

impl ReflectiveWalker
{
    pub fn new(interpreter: Interpreter, filter: NameFilter) -> Self
    {
        Self { interpreter, filter }
    }
}

impl ModuleWalker for ReflectiveWalker
{
    fn enumerate_modules(&self, root: &str) -> Vec<ModuleReport>
    {
        info!(root, "importing root in probe interpreter");
        match self.interpreter.run_script(PROBE_SCRIPT, &[root]) {
            Ok(output) => collect_reports(root, &output, self.filter),
            Err(e) => {
                warn!(root, error = %e, "probe could not be started");
                vec![ModuleReport::failed(root, e)]
            }
        }
    }

    fn mode(&self) -> WalkMode
    {
        WalkMode::Reflective
    }
}

/// Turn the captured output of one probe run into module reports.
///
/// Lines without [`PROBE_MARKER`] are ignored, as are marked lines that do not
/// decode. A module entered but never reported gets a failure report, even when
/// the run went on to finish. A run that ended without a `done` event and with
/// no import in flight fails the walk itself, or the root if nothing was
/// reported. Only the first subpackage walk failure is kept.
pub fn collect_reports(root: &str, output: &ScriptOutput, filter: NameFilter) -> Vec<ModuleReport>
{
    let mut reports = Vec::new();
    let mut in_flight: Option<String> = None;
    let mut finished = false;

    for line in output.stdout.lines() {
        let Some(payload) = line.strip_prefix(PROBE_MARKER) else {
            continue;
        };
        let event = match serde_json::from_str::<ProbeEvent>(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(root, error = %e, "discarding undecodable probe event");
                continue;
            }
        };

        match event {
            ProbeEvent::Enter { module } => {
                debug!(%module, "probe importing module");
                in_flight = Some(module);
            }
            ProbeEvent::Report { module, error, members } => {
                if in_flight.as_deref() == Some(module.as_str()) {
                    in_flight = None;
                }
                reports.push(match error {
                    Some(reason) => {
                        warn!(%module, %reason, "module failed to import");
                        let error = ScanError::ModuleLoadFailed {
                            module: module.clone(),
                            reason,
                        };
                        ModuleReport::failed(module, error)
                    }
                    None => {
                        let symbols = extract_symbols(members.into_iter().map(Member::from), filter);
                        ModuleReport::with_symbols(module, symbols)
                    }
                });
            }
            ProbeEvent::WalkError { error } => {
                warn!(root, %error, "subpackage walk failed");
                let module = walk_failure_module(root);
                if !reports.iter().any(|report: &ModuleReport| report.module == module) {
                    reports.push(ModuleReport::failed(module, error));
                }
            }
            ProbeEvent::Done => finished = true,
        }
    }

    let summary = output.exit_summary();
    if let Some(module) = in_flight {
        warn!(root, %module, %summary, "probe never reported an entered module");
        let reason = if finished {
            format!("module was not reported ({summary})")
        } else {
            format!("interpreter died while importing {module} ({summary})")
        };
        let error = ScanError::ModuleLoadFailed {
            module: module.clone(),
            reason,
        };
        reports.push(ModuleReport::failed(module, error));
    } else if !finished {
        warn!(root, %summary, "probe ended before finishing the walk");
        let module = if reports.is_empty() {
            root.to_string()
        } else {
            walk_failure_module(root)
        };
        let error = ScanError::ModuleLoadFailed {
            module: module.clone(),
            reason: format!("probe failed ({summary})"),
        };
        reports.push(ModuleReport::failed(module, error));
    }

    reports
}

fn walk_failure_module(root: &str) -> String
{
    format!("{root}.{WALK_FAILURE_SUFFIX}")
}
