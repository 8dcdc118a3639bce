//! Textual call signatures.

use crate::types::Parameter;

/// Signature used when a member's parameters cannot be introspected.
pub const SIGNATURE_UNAVAILABLE: &str = "(signature unavailable)";

/// Signature of classes cataloged without executing code.
pub const CLASS_SIGNATURE_PLACEHOLDER: &str = "(inspect via import for full signature)";

/// Render parameter names in declaration order, e.g. `(a, b, *rest, key, **extra)`.
///
/// Only names and variadic markers are rendered. Defaults, annotations and the
/// bare `*` and `/` separators are omitted because a parser cannot reproduce
/// their runtime representation.
pub fn render_signature(params: &[Parameter]) -> String
{
    let rendered: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("({})", rendered.join(", "))
}
