//! Selector AST to XPath translation

use tracing::debug;
use xpath_escaper::escape_literal;

use crate::errors::CssError;
use crate::parser::{
    parse, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, PseudoClass,
    SimpleSelector,
};
use crate::xpath::XPathExpr;

/// Prefix making every selector relative to the context node, inclusive
pub const DEFAULT_PREFIX: &str = "descendant-or-self::";

/// CSS to XPath translator
///
/// In HTML mode (the default) element and attribute names are lowercased,
/// matching how HTML parsers normalize them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssTranslator {
    html: bool,
}

impl Default for CssTranslator {
    fn default() -> Self {
        Self { html: true }
    }
}

impl CssTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translator that keeps names case-sensitive
    pub fn xml() -> Self {
        Self { html: false }
    }

    pub fn with_html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    pub fn is_html(&self) -> bool {
        self.html
    }

    /// Compiles `css` using [`DEFAULT_PREFIX`].
    pub fn css_to_xpath(&self, css: &str) -> Result<String, CssError> {
        self.css_to_xpath_with_prefix(css, DEFAULT_PREFIX)
    }

    /// Compiles `css`, prefixing every selector of the group with `prefix`.
    pub fn css_to_xpath_with_prefix(&self, css: &str, prefix: &str) -> Result<String, CssError> {
        let group = parse(css)?;
        let xpaths = group
            .selectors
            .iter()
            .map(|selector| {
                self.complex_to_xpath(selector)
                    .map(|xpath| format!("{prefix}{xpath}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let xpath = xpaths.join(" | ");
        debug!(css, xpath = %xpath, "compiled CSS selector");
        Ok(xpath)
    }

    fn complex_to_xpath(&self, complex: &ComplexSelector) -> Result<XPathExpr, CssError> {
        let mut xpath = self.compound_to_xpath(&complex.head)?;

        for (combinator, compound) in &complex.tail {
            let right = self.compound_to_xpath(compound)?;
            xpath = match combinator {
                Combinator::Descendant => xpath.join("/descendant-or-self::*/", right),
                Combinator::Child => xpath.join("/", right),
                Combinator::NextSibling => {
                    let mut joined = xpath.join("/following-sibling::", right);
                    joined.add_name_test().add_condition("position() = 1");
                    joined
                }
                Combinator::SubsequentSibling => xpath.join("/following-sibling::", right),
            };
        }

        Ok(xpath)
    }

    fn compound_to_xpath(&self, compound: &CompoundSelector) -> Result<XPathExpr, CssError> {
        let mut xpath = self.element_to_xpath(compound.element.as_deref());
        for simple in &compound.simple_selectors {
            self.apply_simple(&mut xpath, simple)?;
        }
        Ok(xpath)
    }

    fn element_to_xpath(&self, element: Option<&str>) -> XPathExpr {
        let name = self.normalize_name(element.unwrap_or("*"));
        if name == "*" || is_safe_name(&name) {
            return XPathExpr::new("", name, "");
        }

        let mut xpath = XPathExpr::any();
        xpath.add_condition(format!("name() = {}", escape_literal(&name)));
        xpath
    }

    fn normalize_name(&self, name: &str) -> String {
        if self.html {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        }
    }

    fn attribute(&self, name: &str) -> String {
        let name = self.normalize_name(name);
        if is_safe_name(&name) {
            format!("@{name}")
        } else {
            format!("attribute::*[name() = {}]", escape_literal(&name))
        }
    }

    fn apply_simple(&self, xpath: &mut XPathExpr, simple: &SimpleSelector) -> Result<(), CssError> {
        match simple {
            SimpleSelector::Id(id) => {
                xpath.add_condition(format!("@id = {}", escape_literal(id)));
            }
            SimpleSelector::Class(class) => {
                xpath.add_condition(includes_condition("@class", class));
            }
            SimpleSelector::Attribute(attribute) => {
                xpath.add_condition(self.attribute_condition(attribute));
            }
            SimpleSelector::PseudoClass(pseudo) => {
                let condition = self.pseudo_class_condition(xpath, pseudo)?;
                xpath.add_condition(condition);
            }
        }
        Ok(())
    }

    fn attribute_condition(&self, selector: &AttributeSelector) -> String {
        let attr = self.attribute(selector.name());
        match selector {
            AttributeSelector::Exists(_) => attr,
            AttributeSelector::Equals(_, value) => {
                format!("{attr} = {}", escape_literal(value))
            }
            AttributeSelector::Includes(_, value) => includes_condition(&attr, value),
            AttributeSelector::DashMatch(_, value) => format!(
                "{attr} and ({attr} = {} or starts-with({attr}, {}))",
                escape_literal(value),
                escape_literal(&format!("{value}-"))
            ),
            AttributeSelector::PrefixMatch(_, value) if !value.is_empty() => {
                format!("{attr} and starts-with({attr}, {})", escape_literal(value))
            }
            AttributeSelector::SuffixMatch(_, value) if !value.is_empty() => format!(
                "{attr} and substring({attr}, string-length({attr})-{}) = {}",
                value.chars().count() - 1,
                escape_literal(value)
            ),
            AttributeSelector::SubstringMatch(_, value) if !value.is_empty() => {
                format!("{attr} and contains({attr}, {})", escape_literal(value))
            }
            // Empty prefix/suffix/substring never match.
            AttributeSelector::PrefixMatch(..)
            | AttributeSelector::SuffixMatch(..)
            | AttributeSelector::SubstringMatch(..) => "0".to_string(),
        }
    }

    fn pseudo_class_condition(
        &self,
        xpath: &XPathExpr,
        pseudo: &PseudoClass,
    ) -> Result<String, CssError> {
        let condition = match pseudo {
            PseudoClass::Root => "not(parent::*)".to_string(),
            PseudoClass::FirstChild => "count(preceding-sibling::*) = 0".to_string(),
            PseudoClass::LastChild => "count(following-sibling::*) = 0".to_string(),
            PseudoClass::FirstOfType => format!(
                "count(preceding-sibling::{}) = 0",
                require_element(xpath, "first-of-type")?
            ),
            PseudoClass::LastOfType => format!(
                "count(following-sibling::{}) = 0",
                require_element(xpath, "last-of-type")?
            ),
            PseudoClass::OnlyChild => "count(parent::*/child::*) = 1".to_string(),
            PseudoClass::OnlyOfType => format!(
                "count(parent::*/child::{}) = 1",
                require_element(xpath, "only-of-type")?
            ),
            PseudoClass::Empty => "not(*) and not(string-length())".to_string(),
            PseudoClass::Link => {
                "@href and (name(.) = 'a' or name(.) = 'link' or name(.) = 'area')".to_string()
            }
            PseudoClass::Checked => "(@checked and (name(.) = 'input' or name(.) = 'command') \
                 and (@type = 'checkbox' or @type = 'radio')) \
                 or (@selected and name(.) = 'option')"
                .to_string(),
            PseudoClass::Disabled => "@disabled".to_string(),
            PseudoClass::Enabled => "not(@disabled)".to_string(),
            PseudoClass::NeverMatch => "0".to_string(),
            PseudoClass::Contains(text) => {
                format!("contains(string(.), {})", escape_literal(text))
            }
            PseudoClass::Not(inner) => {
                let mut negated = self.compound_to_xpath(inner)?;
                negated.add_name_test();
                if negated.condition().is_empty() {
                    // :not(*) excludes everything
                    "0".to_string()
                } else {
                    format!("not({})", negated.condition())
                }
            }
        };
        Ok(condition)
    }
}

/// Whitespace-separated token match, as used by `.class` and `[attr~=value]`
fn includes_condition(attr: &str, value: &str) -> String {
    if value.is_empty() {
        return "0".to_string();
    }
    format!(
        "{attr} and contains(concat(' ', normalize-space({attr}), ' '), {})",
        escape_literal(&format!(" {value} "))
    )
}

fn require_element<'a>(xpath: &'a XPathExpr, pseudo: &'static str) -> Result<&'a str, CssError> {
    match xpath.element() {
        "*" => Err(CssError::ElementNameRequired(pseudo)),
        element => Ok(element),
    }
}

/// Names usable verbatim as an XPath name test: `[a-zA-Z_][a-zA-Z0-9_.-]*`
fn is_safe_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xpath(css: &str) -> String {
        CssTranslator::default().css_to_xpath(css).unwrap()
    }

    #[test]
    fn test_simple_selectors() {
        assert_eq!(xpath("div"), "descendant-or-self::div");
        assert_eq!(xpath("*"), "descendant-or-self::*");
        assert_eq!(xpath("#main"), "descendant-or-self::*[@id = 'main']");
        assert_eq!(
            xpath(".btn"),
            "descendant-or-self::*[@class and contains(concat(' ', normalize-space(@class), ' '), ' btn ')]"
        );
        assert_eq!(
            xpath("a.btn#go"),
            "descendant-or-self::a[(@class and contains(concat(' ', normalize-space(@class), ' '), ' btn ')) and (@id = 'go')]"
        );
    }

    #[test]
    fn test_html_mode_lowercases_names() {
        assert_eq!(xpath("DIV[Title]"), "descendant-or-self::div[@title]");
        assert_eq!(
            CssTranslator::xml().css_to_xpath("DIV[Title]").unwrap(),
            "descendant-or-self::DIV[@Title]"
        );
    }

    #[test]
    fn test_combinators() {
        assert_eq!(
            xpath("ul li"),
            "descendant-or-self::ul/descendant-or-self::*/li"
        );
        assert_eq!(xpath("ul > li"), "descendant-or-self::ul/li");
        assert_eq!(
            xpath("h1 + p"),
            "descendant-or-self::h1/following-sibling::*[(name() = 'p') and (position() = 1)]"
        );
        assert_eq!(xpath("h1 ~ p"), "descendant-or-self::h1/following-sibling::p");
    }

    #[test]
    fn test_group_becomes_union() {
        assert_eq!(
            xpath("a, b"),
            "descendant-or-self::a | descendant-or-self::b"
        );
    }

    #[test]
    fn test_attribute_selectors() {
        assert_eq!(xpath("[href]"), "descendant-or-self::*[@href]");
        assert_eq!(
            xpath("input[type='text']"),
            "descendant-or-self::input[@type = 'text']"
        );
        assert_eq!(
            xpath("[lang|=en]"),
            "descendant-or-self::*[@lang and (@lang = 'en' or starts-with(@lang, 'en-'))]"
        );
        assert_eq!(
            xpath("[href^=https]"),
            "descendant-or-self::*[@href and starts-with(@href, 'https')]"
        );
        assert_eq!(
            xpath("[src$='.png']"),
            "descendant-or-self::*[@src and substring(@src, string-length(@src)-3) = '.png']"
        );
        assert_eq!(
            xpath("[title*=\"it's\"]"),
            "descendant-or-self::*[@title and contains(@title, \"it's\")]"
        );
        assert_eq!(xpath("[href^='']"), "descendant-or-self::*[0]");
    }

    #[test]
    fn test_unsafe_names() {
        assert_eq!(
            xpath(r"[data\:x]"),
            "descendant-or-self::*[attribute::*[name() = 'data:x']]"
        );
        assert_eq!(
            xpath(r"my\:tag"),
            "descendant-or-self::*[name() = 'my:tag']"
        );
    }

    #[test]
    fn test_pseudo_classes() {
        assert_eq!(
            xpath("li:first-child"),
            "descendant-or-self::li[count(preceding-sibling::*) = 0]"
        );
        assert_eq!(
            xpath("p:last-of-type"),
            "descendant-or-self::p[count(following-sibling::p) = 0]"
        );
        assert_eq!(xpath(":root"), "descendant-or-self::*[not(parent::*)]");
        assert_eq!(xpath("a:hover"), "descendant-or-self::a[0]");
        assert_eq!(
            xpath("li:not(.done)"),
            "descendant-or-self::li[not(@class and contains(concat(' ', normalize-space(@class), ' '), ' done '))]"
        );
        assert_eq!(
            xpath("*:not(p)"),
            "descendant-or-self::*[not(name() = 'p')]"
        );
        assert_eq!(
            xpath("p:contains('hi')"),
            "descendant-or-self::p[contains(string(.), 'hi')]"
        );
    }

    #[test]
    fn test_type_pseudo_requires_element() {
        assert_eq!(
            CssTranslator::default().css_to_xpath(":first-of-type"),
            Err(CssError::ElementNameRequired("first-of-type"))
        );
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(
            CssTranslator::default()
                .css_to_xpath_with_prefix("a", "//")
                .unwrap(),
            "//a"
        );
    }
}
