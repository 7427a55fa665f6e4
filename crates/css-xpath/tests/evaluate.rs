use css_xpath::css_to_xpath;
use sxd_document::parser;
use sxd_xpath::nodeset::Node;
use sxd_xpath::{evaluate_xpath, Value};

const PAGE: &str = r#"<html>
  <body id="body">
    <ul id="nav" class="menu main">
      <li id="home" class="item active">Home</li>
      <li id="about" class="item">About</li>
      <li id="contact" class="item-disabled" lang="en-GB">Contact</li>
    </ul>
    <div id="wrap">
      <p id="p1">First</p>
      <span id="s1"><p id="nested">Nested</p></span>
      <p id="p2" title="it's here">Second</p>
    </div>
    <a id="link" href="https://example.com/logo.png">Logo</a>
  </body>
</html>"#;

fn select_ids(css: &str) -> Vec<String> {
    let package = parser::parse(PAGE).expect("test document is well-formed");
    let document = package.as_document();
    let xpath = css_to_xpath(css).expect("selector compiles");

    match evaluate_xpath(&document, &xpath) {
        Ok(Value::Nodeset(nodes)) => nodes
            .document_order()
            .into_iter()
            .filter_map(|node| match node {
                Node::Element(element) => element.attribute_value("id").map(str::to_string),
                _ => None,
            })
            .collect(),
        Ok(other) => panic!("{xpath} returned {other:?}"),
        Err(err) => panic!("{xpath} failed: {err:?}"),
    }
}

#[test]
fn class_matches_whole_tokens_only() {
    assert_eq!(select_ids(".item"), vec!["home", "about"]);
    assert_eq!(select_ids("ul.main"), vec!["nav"]);
}

#[test]
fn child_and_descendant_differ() {
    assert_eq!(select_ids("#wrap p"), vec!["p1", "nested", "p2"]);
    assert_eq!(select_ids("#wrap > p"), vec!["p1", "p2"]);
}

#[test]
fn sibling_combinators() {
    assert_eq!(select_ids("#p1 + span"), vec!["s1"]);
    assert!(select_ids("#p1 + p").is_empty());
    assert_eq!(select_ids("#p1 ~ p"), vec!["p2"]);
}

#[test]
fn attribute_operators() {
    assert_eq!(select_ids("[lang|=en]"), vec!["contact"]);
    assert_eq!(select_ids("a[href$='.png']"), vec!["link"]);
    assert_eq!(select_ids("a[href^=https]"), vec!["link"]);
    assert_eq!(select_ids("[title*=\"it's\"]"), vec!["p2"]);
    assert_eq!(select_ids("[class~=menu]"), vec!["nav"]);
}

#[test]
fn structural_pseudo_classes() {
    assert_eq!(select_ids("li:first-child"), vec!["home"]);
    assert_eq!(select_ids("li:last-child"), vec!["contact"]);
    assert_eq!(select_ids("li:not(.item)"), vec!["contact"]);
    assert_eq!(select_ids("p:contains('Nest')"), vec!["nested"]);
}

#[test]
fn groups_union_in_document_order() {
    assert_eq!(select_ids("#link, #home"), vec!["home", "link"]);
}
