use sxd_document::Package;
use sxd_xpath::{evaluate_xpath, Value};
use xpath_escaper::escape_literal;

fn evaluate_literal(raw: &str) -> String {
    let package = Package::new();
    let document = package.as_document();
    let expression = escape_literal(raw);

    match evaluate_xpath(&document, &expression) {
        Ok(Value::String(value)) => value,
        Ok(other) => panic!("{expression} evaluated to non-string {other:?}"),
        Err(err) => panic!("{expression} failed to evaluate: {err:?}"),
    }
}

#[test]
fn evaluates_back_to_original_string() {
    let samples = [
        "",
        "plain",
        "  padded  ",
        "it's",
        "say \"hi\"",
        "it's \"quoted\"",
        "'\"'\"",
        "''",
        "\"'",
        "trailing'",
        "'leading\"",
    ];

    for raw in samples {
        assert_eq!(evaluate_literal(raw), raw, "round-trip of {raw:?}");
    }
}

#[test]
fn unicode_survives_escaping() {
    let raw = "caf\u{e9} l'\u{e9}t\u{e9} \"\u{2603}\"";
    assert_eq!(evaluate_literal(raw), raw);
}
