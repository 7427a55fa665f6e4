//! Selector tokenizer
//!
//! A reduced form of the CSS Syntax Level 3 tokenizer: only the token kinds
//! that can appear in a selector are produced. Positions are byte offsets
//! into the original input so errors can point at the offending character.

use crate::errors::CssError;

/// Token kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier with escapes resolved (`div`, `nav-item`)
    Ident(String),

    /// `#` followed by a name (`#main`)
    Hash(String),

    /// Quoted string with escapes resolved
    String(String),

    /// Run of digits, optionally with a fractional part
    Number(String),

    /// Any other single character (`.`, `*`, `[`, `>`, `,`, ...)
    Delim(char),

    /// One or more whitespace characters
    Whitespace,
}

/// Token with its byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    /// Short human readable form used in error messages
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Hash(name) => format!("#{name}"),
            TokenKind::String(value) => format!("\"{value}\""),
            TokenKind::Number(value) => value.clone(),
            TokenKind::Delim(c) => c.to_string(),
            TokenKind::Whitespace => "whitespace".to_string(),
        }
    }
}

/// Splits `input` into selector tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CssError> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

struct Tokenizer<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    index: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            index: 0,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).map(|&(_, c)| c)
    }

    fn position(&self) -> usize {
        self.chars
            .get(self.index)
            .map_or(self.input.len(), |&(position, _)| position)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.index += 1;
        Some(c)
    }

    fn next_token(&mut self) -> Result<Option<Token>, CssError> {
        let position = self.position();
        let Some(c) = self.peek(0) else {
            return Ok(None);
        };

        let kind = match c {
            c if c.is_whitespace() => {
                while self.peek(0).is_some_and(char::is_whitespace) {
                    self.index += 1;
                }
                TokenKind::Whitespace
            }
            '"' | '\'' => {
                self.index += 1;
                TokenKind::String(self.consume_string(c, position)?)
            }
            '#' if self.starts_name(1) => {
                self.index += 1;
                TokenKind::Hash(self.consume_name())
            }
            c if c.is_ascii_digit() => TokenKind::Number(self.consume_number()),
            _ if self.starts_ident() => TokenKind::Ident(self.consume_name()),
            _ => {
                self.index += 1;
                TokenKind::Delim(c)
            }
        };

        Ok(Some(Token { kind, position }))
    }

    /// Whether a valid escape (`\` not followed by a newline) starts at `offset`
    fn starts_escape(&self, offset: usize) -> bool {
        self.peek(offset) == Some('\\') && self.peek(offset + 1).is_some_and(|c| c != '\n')
    }

    fn starts_name(&self, offset: usize) -> bool {
        self.peek(offset).is_some_and(is_ident_char) || self.starts_escape(offset)
    }

    /// [§ 4.3.9 would start an identifier](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn starts_ident(&self) -> bool {
        match self.peek(0) {
            Some('-') => {
                self.peek(1)
                    .is_some_and(|c| is_ident_start_char(c) || c == '-')
                    || self.starts_escape(1)
            }
            Some(c) if is_ident_start_char(c) => true,
            Some('\\') => self.starts_escape(0),
            _ => false,
        }
    }

    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            match self.peek(0) {
                Some(c) if is_ident_char(c) => {
                    name.push(c);
                    self.index += 1;
                }
                Some('\\') if self.starts_escape(0) => {
                    self.index += 1;
                    name.push(self.consume_escape());
                }
                _ => return name,
            }
        }
    }

    fn consume_number(&mut self) -> String {
        let mut number = String::new();
        while let Some(c) = self.peek(0).filter(char::is_ascii_digit) {
            number.push(c);
            self.index += 1;
        }
        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            number.push('.');
            self.index += 1;
            while let Some(c) = self.peek(0).filter(char::is_ascii_digit) {
                number.push(c);
                self.index += 1;
            }
        }
        number
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// The backslash has already been consumed.
    fn consume_escape(&mut self) -> char {
        let mut hex = String::new();
        while hex.len() < 6 {
            match self.peek(0) {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.index += 1;
                }
                _ => break,
            }
        }

        if hex.is_empty() {
            return self.bump().unwrap_or('\u{FFFD}');
        }

        // A single whitespace terminates a hex escape.
        if self.peek(0).is_some_and(char::is_whitespace) {
            self.index += 1;
        }

        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .filter(|&c| c != '\0')
            .unwrap_or('\u{FFFD}')
    }

    fn consume_string(&mut self, quote: char, start: usize) -> Result<String, CssError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(CssError::UnterminatedString(start)),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.peek(0) {
                    None => {}
                    // Escaped newline is a line continuation.
                    Some('\n') => self.index += 1,
                    Some(_) => value.push(self.consume_escape()),
                },
                Some(c) => value.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_compound_selector_tokens() {
        assert_eq!(
            kinds("div#main.nav-item"),
            vec![
                TokenKind::Ident("div".into()),
                TokenKind::Hash("main".into()),
                TokenKind::Delim('.'),
                TokenKind::Ident("nav-item".into()),
            ]
        );
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(
            kinds("a  >\tb"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Whitespace,
                TokenKind::Delim('>'),
                TokenKind::Whitespace,
                TokenKind::Ident("b".into()),
            ]
        );
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds(r#"[title="it's \"x\""]"#),
            vec![
                TokenKind::Delim('['),
                TokenKind::Ident("title".into()),
                TokenKind::Delim('='),
                TokenKind::String("it's \"x\"".into()),
                TokenKind::Delim(']'),
            ]
        );
        assert_eq!(kinds(r"#foo\:bar"), vec![TokenKind::Hash("foo:bar".into())]);
        assert_eq!(kinds(r"\31 23"), vec![TokenKind::Ident("123".into())]);
    }

    #[test]
    fn test_hash_may_start_with_digit() {
        assert_eq!(kinds("#1a"), vec![TokenKind::Hash("1a".into())]);
        assert_eq!(kinds("#"), vec![TokenKind::Delim('#')]);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            tokenize("[a='oops"),
            Err(CssError::UnterminatedString(3))
        );
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let tokens = tokenize("é > b").unwrap();
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[1].position, 2);
        assert_eq!(tokens[2].position, 3);
    }
}
