//! # Symbol Extraction
//!
//! Turns member descriptions into catalog [`Symbol`]s.
//!
//! Both walkers feed this module: the reflective walker with members reported by
//! the Python probe, the static walker with definitions found by the parser. The
//! shared path is what keeps the two modes diff-comparable:
//!
//! - the private-name filter is applied here,
//! - members that are neither functions nor classes are dropped here,
//! - signatures are rendered by one function ([`render_signature`]),
//! - documentation is cleaned and cut down by one function ([`doc_head`]),
//! - output order is by name, ascending and case-sensitive.
//!
//! Introspection failures only ever degrade a field: an unavailable signature
//! becomes [`SIGNATURE_UNAVAILABLE`], a missing doc an empty string, and missing
//! file or line information stays `None`.

mod doc;
mod signature;

pub use doc::{clean_doc, doc_head};
use serde::Deserialize;
pub use signature::{render_signature, CLASS_SIGNATURE_PLACEHOLDER, SIGNATURE_UNAVAILABLE};
use tracing::{debug, trace};

use crate::types::{Parameter, Symbol, SymbolKind};

/// Raw member classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind
{
    /// User-defined function (including coroutine functions).
    Function,
    /// Built-in function or method implemented natively.
    Builtin,
    /// Type object.
    Class,
    /// Anything else: modules, constants, instances, descriptors.
    Other,
}

impl MemberKind
{
    fn symbol_kind(self) -> Option<SymbolKind>
    {
        match self {
            MemberKind::Function | MemberKind::Builtin => Some(SymbolKind::Function),
            MemberKind::Class => Some(SymbolKind::Class),
            MemberKind::Other => None,
        }
    }
}

/// Where a member's signature comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureSource
{
    /// Parameters are known, in declaration order.
    Parameters(Vec<Parameter>),
    /// Introspection was attempted and is unsupported for this member.
    Unavailable,
    /// The signature can only be resolved by executing code (static classes).
    RequiresExecution,
}

/// One member of a module namespace, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member
{
    pub name: String,
    pub kind: MemberKind,
    pub signature: SignatureSource,
    /// Raw documentation text.
    pub doc: Option<String>,
    pub defined_in: Option<String>,
    pub line_no: Option<u32>,
}

/// Private-by-convention name filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameFilter
{
    include_private: bool,
}

impl NameFilter
{
    #[must_use]
    pub fn new(include_private: bool) -> Self
    {
        Self { include_private }
    }

    /// Names starting with an underscore are private unless explicitly included.
    #[must_use]
    pub fn keeps(&self, name: &str) -> bool
    {
        self.include_private || !name.starts_with('_')
    }
}

/// Build the symbol list of one module.
///
/// Never fails: members are filtered and classified, and each field degrades to
/// its placeholder independently.
pub fn extract_symbols<I>(members: I, filter: NameFilter) -> Vec<Symbol>
where
    I: IntoIterator<Item = Member>,
{
    let mut symbols: Vec<Symbol> = members
        .into_iter()
        .filter(|member| filter.keeps(&member.name))
        .filter_map(|member| {
            let Some(kind) = member.kind.symbol_kind() else {
                trace!(member = %member.name, "skipping member that is neither function nor class");
                return None;
            };

            let signature = match &member.signature {
                SignatureSource::Parameters(params) => render_signature(params),
                SignatureSource::Unavailable => {
                    debug!(member = %member.name, "signature introspection unavailable");
                    SIGNATURE_UNAVAILABLE.to_string()
                }
                SignatureSource::RequiresExecution => CLASS_SIGNATURE_PLACEHOLDER.to_string(),
            };

            Some(Symbol {
                doc_head: doc_head(member.doc.as_deref()),
                name: member.name,
                kind,
                signature,
                defined_in: member.defined_in,
                line_no: member.line_no,
            })
        })
        .collect();

    symbols.sort_by(|a, b| a.name.cmp(&b.name));
    symbols
}
