//! XPath literal escaping
//!
//! XPath 1.0 has no escape sequences inside string literals, so a value that
//! contains both quote characters can only be expressed as a `concat(...)`
//! call. [`escape_literal`] picks the simplest form that round-trips.

use tracing::trace;

const APOSTROPHE: char = '\'';
const QUOTE: char = '"';

/// Apostrophe as a standalone `concat` argument.
const APOSTROPHE_ARG: &str = "\"'\"";

/// Returns an XPath expression evaluating to exactly `raw`.
///
/// - no apostrophe: `'raw'`
/// - no double quote: `"raw"`
/// - both: `concat('a', "'", 'b"c')`
pub fn escape_literal(raw: &str) -> String {
    if needs_concat(raw) {
        return concat_literal(raw);
    }

    if raw.contains(APOSTROPHE) {
        format!("\"{raw}\"")
    } else {
        format!("'{raw}'")
    }
}

/// Whether `raw` contains both quote characters and so needs the `concat` form.
pub fn needs_concat(raw: &str) -> bool {
    raw.contains(APOSTROPHE) && raw.contains(QUOTE)
}

fn concat_literal(raw: &str) -> String {
    trace!("escaping literal with mixed quotes via concat()");

    let mut parts = Vec::new();
    let mut segments = raw.split(APOSTROPHE).peekable();
    while let Some(segment) = segments.next() {
        parts.push(format!("'{segment}'"));
        if segments.peek().is_some() {
            parts.push(APOSTROPHE_ARG.to_string());
        }
    }

    format!("concat({})", parts.join(", "))
}
