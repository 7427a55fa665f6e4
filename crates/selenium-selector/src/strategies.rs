//! XPath generation rules, one per string-valued strategy
//!
//! Every comparison value goes through [`escape_literal`], so arbitrary text
//! (quotes included) cannot break out of the generated expression. The
//! exception is [`tag_name`], whose value is a node test, not a literal.

use xpath_escaper::escape_literal;

const PREFIX: &str = "descendant-or-self::";

/// Element whose `class` attribute contains `class` as a whole token.
///
/// Both the attribute and the value are padded with spaces so `btn` does not
/// match `btn-outline`.
pub fn class_name(class: &str) -> String {
    let literal = escape_literal(&format!(" {class} "));
    format!(
        "{PREFIX}*[@class and contains(concat(' ', normalize-space(@class), ' '), {literal})]"
    )
}

pub fn id(value: &str) -> String {
    format!("{PREFIX}*[@id = {}]", escape_literal(value))
}

pub fn name(value: &str) -> String {
    format!("{PREFIX}*[@name = {}]", escape_literal(value))
}

pub fn id_or_name(value: &str) -> String {
    let literal = escape_literal(value);
    format!("{PREFIX}*[@id = {literal} or @name = {literal}]")
}

/// Raw node test; `tag` is not validated or escaped.
pub fn tag_name(tag: &str) -> String {
    format!("{PREFIX}{tag}")
}

pub fn link_text(text: &str) -> String {
    format!(
        "{PREFIX}a[./@href][normalize-space(string(.)) = {}]",
        escape_literal(text)
    )
}

pub fn partial_link_text(text: &str) -> String {
    format!(
        "{PREFIX}a[./@href][contains(normalize-space(string(.)), {})]",
        escape_literal(text)
    )
}

/// Form controls labelled `text`, through either association mechanism:
/// explicit (`<label for="x">` plus `id="x"`) or implicit (input nested in
/// the label).
pub fn label(text: &str) -> String {
    let literal = escape_literal(text);
    let explicit =
        format!("{PREFIX}*[@id = (//label[normalize-space(string(.)) = {literal}]/@for)]");
    let implicit = format!("{PREFIX}label[normalize-space(string(.)) = {literal}]//input");
    [explicit, implicit].join("|")
}
