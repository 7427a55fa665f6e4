//! Selector parser
//!
//! Recursive descent over the token stream produced by [`crate::tokenizer`].
//! Compound selectors are kept in source (left-to-right) order because the
//! XPath they compile to is also written left to right.

use crate::errors::CssError;
use crate::tokenizer::{tokenize, Token, TokenKind};

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`
    Exists(String),

    /// `[attr=value]`
    Equals(String, String),

    /// `[attr~=value]`, whitespace-separated word match
    Includes(String, String),

    /// `[attr|=value]`, exact or `value-` prefix
    DashMatch(String, String),

    /// `[attr^=value]`
    PrefixMatch(String, String),

    /// `[attr$=value]`
    SuffixMatch(String, String),

    /// `[attr*=value]`
    SubstringMatch(String, String),
}

impl AttributeSelector {
    pub fn name(&self) -> &str {
        match self {
            AttributeSelector::Exists(name)
            | AttributeSelector::Equals(name, _)
            | AttributeSelector::Includes(name, _)
            | AttributeSelector::DashMatch(name, _)
            | AttributeSelector::PrefixMatch(name, _)
            | AttributeSelector::SuffixMatch(name, _)
            | AttributeSelector::SubstringMatch(name, _) => name,
        }
    }
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    Root,
    FirstChild,
    LastChild,
    FirstOfType,
    LastOfType,
    OnlyChild,
    OnlyOfType,
    Empty,

    /// `a`, `link` or `area` with an `href`
    Link,
    Checked,
    Disabled,
    Enabled,

    /// User-interaction states (`:hover`, `:focus`, ...) never hold in a
    /// static document.
    NeverMatch,

    /// `:not(compound)`
    Not(Box<CompoundSelector>),

    /// `:contains("text")`, substring of the element's string value
    Contains(String),
}

/// A single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Id(String),
    Class(String),
    Attribute(AttributeSelector),
    PseudoClass(PseudoClass),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// An optional type selector (`None` means any element) followed by simple
/// selectors that all apply to the same element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub element: Option<String>,
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B`
    Descendant,

    /// `A > B`
    Child,

    /// `A + B`
    NextSibling,

    /// `A ~ B`
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// `head` is the leftmost compound; `tail` holds each following combinator
/// and compound in source order. The subject is the last compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub head: CompoundSelector,
    pub tail: Vec<(Combinator, CompoundSelector)>,
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorGroup {
    pub selectors: Vec<ComplexSelector>,
}

/// Parses a selector list.
pub fn parse(input: &str) -> Result<SelectorGroup, CssError> {
    if input.trim().is_empty() {
        return Err(CssError::Empty);
    }

    let tokens = tokenize(input)?;
    Parser { tokens, index: 0 }.parse_group()
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.index).map(|token| &token.kind)
    }

    fn peek_is_delim(&self, delim: char) -> bool {
        self.peek_kind() == Some(&TokenKind::Delim(delim))
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    /// Skips whitespace, returning whether any was present
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek_kind() == Some(&TokenKind::Whitespace) {
            self.index += 1;
            skipped = true;
        }
        skipped
    }

    fn unexpected(token: &Token, expected: &'static str) -> CssError {
        CssError::UnexpectedToken {
            found: token.describe(),
            position: token.position,
            expected,
        }
    }

    /// Error for whatever sits at the cursor (or the end of input)
    fn unexpected_here(&self, expected: &'static str) -> CssError {
        match self.tokens.get(self.index) {
            Some(token) => Self::unexpected(token, expected),
            None => CssError::UnexpectedEnd { expected },
        }
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<String, CssError> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            Some(token) => Err(Self::unexpected(&token, expected)),
            None => Err(CssError::UnexpectedEnd { expected }),
        }
    }

    fn expect_delim(&mut self, delim: char, expected: &'static str) -> Result<(), CssError> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Delim(c),
                ..
            }) if c == delim => Ok(()),
            Some(token) => Err(Self::unexpected(&token, expected)),
            None => Err(CssError::UnexpectedEnd { expected }),
        }
    }

    fn parse_group(&mut self) -> Result<SelectorGroup, CssError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.next() {
                None => break,
                Some(Token {
                    kind: TokenKind::Delim(','),
                    ..
                }) => continue,
                Some(token) => return Err(Self::unexpected(&token, "',' or end of selector")),
            }
        }
        Ok(SelectorGroup { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, CssError> {
        let head = self
            .parse_compound()?
            .ok_or_else(|| self.unexpected_here("selector"))?;

        let mut tail = Vec::new();
        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek_kind() {
                Some(TokenKind::Delim('>')) => Combinator::Child,
                Some(TokenKind::Delim('+')) => Combinator::NextSibling,
                Some(TokenKind::Delim('~')) => Combinator::SubsequentSibling,
                None | Some(TokenKind::Delim(',')) => break,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => break,
            };

            if combinator != Combinator::Descendant {
                self.index += 1;
                self.skip_whitespace();
            }

            let compound = self
                .parse_compound()?
                .ok_or_else(|| self.unexpected_here("selector after combinator"))?;
            tail.push((combinator, compound));
        }

        Ok(ComplexSelector { head, tail })
    }

    /// Returns `None` when no compound selector starts at the cursor.
    fn parse_compound(&mut self) -> Result<Option<CompoundSelector>, CssError> {
        let element = match self.peek_kind().cloned() {
            Some(TokenKind::Ident(name)) => {
                self.index += 1;
                Some(name)
            }
            Some(TokenKind::Delim('*')) => {
                self.index += 1;
                Some("*".to_string())
            }
            _ => None,
        };

        let mut simple_selectors = Vec::new();
        loop {
            match self.peek_kind().cloned() {
                Some(TokenKind::Hash(id)) => {
                    self.index += 1;
                    simple_selectors.push(SimpleSelector::Id(id));
                }
                Some(TokenKind::Delim('.')) => {
                    self.index += 1;
                    let class = self.expect_ident("class name")?;
                    simple_selectors.push(SimpleSelector::Class(class));
                }
                Some(TokenKind::Delim('[')) => {
                    self.index += 1;
                    let attribute = self.parse_attribute()?;
                    simple_selectors.push(SimpleSelector::Attribute(attribute));
                }
                Some(TokenKind::Delim(':')) => {
                    self.index += 1;
                    let pseudo = self.parse_pseudo_class()?;
                    simple_selectors.push(SimpleSelector::PseudoClass(pseudo));
                }
                _ => break,
            }
        }

        if element.is_none() && simple_selectors.is_empty() {
            return Ok(None);
        }

        Ok(Some(CompoundSelector {
            element,
            simple_selectors,
        }))
    }

    /// Parses the part after `[`
    fn parse_attribute(&mut self) -> Result<AttributeSelector, CssError> {
        self.skip_whitespace();
        let name = self.expect_ident("attribute name")?;
        self.skip_whitespace();

        let operator = match self.next() {
            Some(Token {
                kind: TokenKind::Delim(']'),
                ..
            }) => return Ok(AttributeSelector::Exists(name)),
            Some(Token {
                kind: TokenKind::Delim('='),
                ..
            }) => '=',
            Some(Token {
                kind: TokenKind::Delim(op @ ('~' | '|' | '^' | '$' | '*')),
                ..
            }) => {
                self.expect_delim('=', "'=' after attribute operator")?;
                op
            }
            Some(token) => return Err(Self::unexpected(&token, "']' or attribute operator")),
            None => {
                return Err(CssError::UnexpectedEnd {
                    expected: "']' or attribute operator",
                })
            }
        };

        self.skip_whitespace();
        let value = match self.next() {
            Some(Token {
                kind: TokenKind::Ident(value) | TokenKind::String(value) | TokenKind::Number(value),
                ..
            }) => value,
            Some(token) => return Err(Self::unexpected(&token, "attribute value")),
            None => {
                return Err(CssError::UnexpectedEnd {
                    expected: "attribute value",
                })
            }
        };
        self.skip_whitespace();
        self.expect_delim(']', "']'")?;

        Ok(match operator {
            '=' => AttributeSelector::Equals(name, value),
            '~' => AttributeSelector::Includes(name, value),
            '|' => AttributeSelector::DashMatch(name, value),
            '^' => AttributeSelector::PrefixMatch(name, value),
            '$' => AttributeSelector::SuffixMatch(name, value),
            _ => AttributeSelector::SubstringMatch(name, value),
        })
    }

    /// Parses the part after `:`
    fn parse_pseudo_class(&mut self) -> Result<PseudoClass, CssError> {
        if self.peek_is_delim(':') {
            self.index += 1;
            let name = self.expect_ident("pseudo-element name")?;
            return Err(CssError::UnsupportedPseudoElement(name));
        }

        let name = self
            .expect_ident("pseudo-class name")?
            .to_ascii_lowercase();

        if self.peek_is_delim('(') {
            self.index += 1;
            self.skip_whitespace();
            let pseudo = match name.as_str() {
                "not" => {
                    let inner = self
                        .parse_compound()?
                        .ok_or_else(|| self.unexpected_here("selector inside :not()"))?;
                    PseudoClass::Not(Box::new(inner))
                }
                "contains" => match self.next() {
                    Some(Token {
                        kind: TokenKind::String(text) | TokenKind::Ident(text),
                        ..
                    }) => PseudoClass::Contains(text),
                    Some(token) => return Err(Self::unexpected(&token, "string")),
                    None => return Err(CssError::UnexpectedEnd { expected: "string" }),
                },
                _ => return Err(CssError::UnsupportedPseudoClass(format!("{name}()"))),
            };
            self.skip_whitespace();
            self.expect_delim(')', "')'")?;
            return Ok(pseudo);
        }

        let pseudo = match name.as_str() {
            "root" => PseudoClass::Root,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-child" => PseudoClass::OnlyChild,
            "only-of-type" => PseudoClass::OnlyOfType,
            "empty" => PseudoClass::Empty,
            "link" => PseudoClass::Link,
            "checked" => PseudoClass::Checked,
            "disabled" => PseudoClass::Disabled,
            "enabled" => PseudoClass::Enabled,
            "hover" | "active" | "focus" | "visited" | "target" => PseudoClass::NeverMatch,
            _ => return Err(CssError::UnsupportedPseudoClass(name)),
        };
        Ok(pseudo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(input: &str) -> ComplexSelector {
        let mut group = parse(input).unwrap();
        assert_eq!(group.selectors.len(), 1);
        group.selectors.remove(0)
    }

    #[test]
    fn test_compound() {
        let selector = single("input#email.wide[type=text]:first-child");
        assert!(selector.tail.is_empty());
        assert_eq!(selector.head.element.as_deref(), Some("input"));
        assert_eq!(
            selector.head.simple_selectors,
            vec![
                SimpleSelector::Id("email".into()),
                SimpleSelector::Class("wide".into()),
                SimpleSelector::Attribute(AttributeSelector::Equals(
                    "type".into(),
                    "text".into()
                )),
                SimpleSelector::PseudoClass(PseudoClass::FirstChild),
            ]
        );
    }

    #[test]
    fn test_combinators_in_source_order() {
        let selector = single("form > fieldset  input + label ~ span");
        let combinators: Vec<_> = selector.tail.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            combinators,
            vec![
                Combinator::Child,
                Combinator::Descendant,
                Combinator::NextSibling,
                Combinator::SubsequentSibling,
            ]
        );
        assert_eq!(selector.head.element.as_deref(), Some("form"));
        let (_, last) = selector.tail.last().unwrap();
        assert_eq!(last.element.as_deref(), Some("span"));
    }

    #[test]
    fn test_group() {
        let group = parse(" a , .b,#c ").unwrap();
        assert_eq!(group.selectors.len(), 3);
    }

    #[test]
    fn test_attribute_operators() {
        let cases = [
            ("[a]", AttributeSelector::Exists("a".into())),
            ("[a~=b]", AttributeSelector::Includes("a".into(), "b".into())),
            ("[a|='b']", AttributeSelector::DashMatch("a".into(), "b".into())),
            ("[a^=\"b\"]", AttributeSelector::PrefixMatch("a".into(), "b".into())),
            ("[ a $= b ]", AttributeSelector::SuffixMatch("a".into(), "b".into())),
            ("[a*=b]", AttributeSelector::SubstringMatch("a".into(), "b".into())),
            ("[tabindex=2]", AttributeSelector::Equals("tabindex".into(), "2".into())),
        ];
        for (input, expected) in cases {
            let selector = single(input);
            assert_eq!(
                selector.head.simple_selectors,
                vec![SimpleSelector::Attribute(expected)],
                "{input}"
            );
        }
    }

    #[test]
    fn test_not_and_contains() {
        let selector = single("li:not(.done):contains('Buy milk')");
        assert_eq!(
            selector.head.simple_selectors,
            vec![
                SimpleSelector::PseudoClass(PseudoClass::Not(Box::new(CompoundSelector {
                    element: None,
                    simple_selectors: vec![SimpleSelector::Class("done".into())],
                }))),
                SimpleSelector::PseudoClass(PseudoClass::Contains("Buy milk".into())),
            ]
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("   "), Err(CssError::Empty));
        assert!(matches!(
            parse("> a"),
            Err(CssError::UnexpectedToken { position: 0, .. })
        ));
        assert_eq!(
            parse("a >"),
            Err(CssError::UnexpectedEnd {
                expected: "selector after combinator"
            })
        );
        assert!(matches!(parse("a,"), Err(CssError::UnexpectedEnd { .. })));
        assert!(matches!(parse("[a=b"), Err(CssError::UnexpectedEnd { .. })));
        assert_eq!(
            parse("a::before"),
            Err(CssError::UnsupportedPseudoElement("before".into()))
        );
        assert_eq!(
            parse("li:nth-child(2)"),
            Err(CssError::UnsupportedPseudoClass("nth-child()".into()))
        );
        assert_eq!(
            parse("a:bogus"),
            Err(CssError::UnsupportedPseudoClass("bogus".into()))
        );
    }
}
