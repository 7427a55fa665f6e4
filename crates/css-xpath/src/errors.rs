//! Error types for CSS compilation

use thiserror::Error;

/// CSS compilation error enumeration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CssError {
    /// Selector is empty or whitespace only
    #[error("Empty CSS selector")]
    Empty,

    /// Token that does not fit the grammar at this point
    #[error("Unexpected '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        position: usize,
        expected: &'static str,
    },

    /// Input ended in the middle of a selector
    #[error("Unexpected end of selector, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// Quoted string without its closing quote
    #[error("Unterminated string starting at position {0}")]
    UnterminatedString(usize),

    /// Pseudo-class the compiler has no XPath form for
    #[error("Pseudo-class ':{0}' is not supported")]
    UnsupportedPseudoClass(String),

    /// Pseudo-elements never select elements
    #[error("Pseudo-element '::{0}' is not supported")]
    UnsupportedPseudoElement(String),

    /// `*:first-of-type` and friends
    #[error("'*:{0}' is not implemented, an element name is required")]
    ElementNameRequired(&'static str),
}

impl CssError {
    pub fn code(&self) -> &'static str {
        match self {
            CssError::Empty => "empty_selector",
            CssError::UnexpectedToken { .. }
            | CssError::UnexpectedEnd { .. }
            | CssError::UnterminatedString(_) => "syntax_error",
            CssError::UnsupportedPseudoClass(_)
            | CssError::UnsupportedPseudoElement(_)
            | CssError::ElementNameRequired(_) => "unsupported",
        }
    }

    /// Whether the selector is valid CSS this compiler cannot express
    pub fn is_unsupported(&self) -> bool {
        self.code() == "unsupported"
    }
}
