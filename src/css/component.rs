//! The component-value builder.
//!
//! Repeatedly consumes one *component value* from a token stream: a plain
//! token, a function (tokens up to the matching `)`), or a simple block
//! (tokens up to the matching closing bracket). Nesting is recursive and
//! mirrors brackets exactly — an unmatched bracket is never an error here,
//! it just means the function/block runs to end-of-input.

use crate::css::token::{Token, TokenKind, Tokenizer};
use crate::offset::FileOffset;

#[derive(Debug, Clone, PartialEq, Copy)]
pub enum BlockKind {
    Square,
    Paren,
    Curly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub values: Vec<ComponentValue>,
    pub offset: FileOffset,
}

impl Function {
    pub fn offset_usize(&self) -> usize {
        match self.offset {
            FileOffset::Offset(o) => o,
            FileOffset::EndOfString => usize::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleBlock {
    pub kind: BlockKind,
    pub values: Vec<ComponentValue>,
    pub offset: FileOffset,
}

impl SimpleBlock {
    pub fn offset_usize(&self) -> usize {
        match self.offset {
            FileOffset::Offset(o) => o,
            FileOffset::EndOfString => usize::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    Token(Token),
    Function(Function),
    Block(SimpleBlock),
}

impl ComponentValue {
    pub fn offset(&self) -> FileOffset {
        match self {
            ComponentValue::Token(t) => t.offset,
            ComponentValue::Function(f) => f.offset,
            ComponentValue::Block(b) => b.offset,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            ComponentValue::Token(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, ComponentValue::Token(t) if matches!(t.kind, TokenKind::Whitespace(_)))
    }
}

/// Consumes component values from a token stream, one at a time.
pub struct ComponentValueParser<'a> {
    tokenizer: Tokenizer<'a>,
    lookahead: Option<Token>,
}

impl<'a> ComponentValueParser<'a> {
    pub fn new(input: &'a str) -> ComponentValueParser<'a> {
        ComponentValueParser { tokenizer: Tokenizer::new(input), lookahead: None }
    }

    fn next_token(&mut self) -> Token {
        self.lookahead.take().unwrap_or_else(|| self.tokenizer.next())
    }

    pub fn is_eof(&mut self) -> bool {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.tokenizer.next());
        }
        matches!(self.lookahead.as_ref().unwrap().kind, TokenKind::Eof)
    }

    /// Consumes and returns the next component value, or `None` at EOF.
    pub fn next_component_value(&mut self) -> Option<ComponentValue> {
        let tok = self.next_token();
        self.component_value_from(tok)
    }

    fn component_value_from(&mut self, tok: Token) -> Option<ComponentValue> {
        match tok.kind {
            TokenKind::Eof => None,
            TokenKind::Function(name) => {
                let values = self.consume_until(closing_for_function());
                Some(ComponentValue::Function(Function { name, values, offset: tok.offset }))
            }
            TokenKind::OpenSquare => {
                let values = self.consume_until(TokenKind::CloseSquare);
                Some(ComponentValue::Block(SimpleBlock {
                    kind: BlockKind::Square,
                    values,
                    offset: tok.offset,
                }))
            }
            TokenKind::OpenParen => {
                let values = self.consume_until(TokenKind::CloseParen);
                Some(ComponentValue::Block(SimpleBlock {
                    kind: BlockKind::Paren,
                    values,
                    offset: tok.offset,
                }))
            }
            TokenKind::OpenCurly => {
                let values = self.consume_until(TokenKind::CloseCurly);
                Some(ComponentValue::Block(SimpleBlock {
                    kind: BlockKind::Curly,
                    values,
                    offset: tok.offset,
                }))
            }
            _ => Some(ComponentValue::Token(tok)),
        }
    }

    /// Consumes component values until the given closing token kind (or
    /// EOF, which is not an error — the block/function just ends early).
    fn consume_until(&mut self, closing: TokenKind) -> Vec<ComponentValue> {
        let mut out = Vec::new();
        loop {
            let tok = self.next_token();
            if matches!(tok.kind, TokenKind::Eof) {
                break;
            }
            if std::mem::discriminant(&tok.kind) == std::mem::discriminant(&closing) {
                break;
            }
            if let Some(cv) = self.component_value_from(tok) {
                out.push(cv);
            }
        }
        out
    }
}

fn closing_for_function() -> TokenKind {
    TokenKind::CloseParen
}

impl Iterator for ComponentValueParser<'_> {
    type Item = ComponentValue;

    fn next(&mut self) -> Option<ComponentValue> {
        self.next_component_value()
    }
}

/// Parses every component value out of `input`, ignoring leading/trailing
/// whitespace, and returns the single resulting value. Used by the small
/// per-value parsers (length, color, paint, ...) that only ever look at one
/// component value. If `input` doesn't contain exactly one (ignoring
/// whitespace), the first one found is returned — callers that care about
/// "exhausted" do their own trailing-token check.
pub fn parse_one_component_value(input: &str) -> ComponentValue {
    let mut p = ComponentValueParser::new(input);
    loop {
        match p.next_component_value() {
            Some(cv) if cv.is_whitespace() => continue,
            Some(cv) => return cv,
            None => {
                return ComponentValue::Token(Token {
                    kind: TokenKind::Eof,
                    offset: FileOffset::EndOfString,
                })
            }
        }
    }
}

/// Parses all component values in `input`, preserving whitespace tokens.
pub fn parse_component_values(input: &str) -> Vec<ComponentValue> {
    ComponentValueParser::new(input).collect()
}

/// Parses all component values, dropping whitespace tokens — convenient for
/// grammar parsers that only care about significant tokens and track
/// "was there whitespace here" separately where it matters (selectors).
pub fn parse_component_values_no_ws(input: &str) -> Vec<ComponentValue> {
    parse_component_values(input)
        .into_iter()
        .filter(|cv| !cv.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_consumes_to_matching_paren() {
        let cvs = parse_component_values_no_ws("rgb(1, 2, 3) foo");
        assert_eq!(cvs.len(), 2);
        match &cvs[0] {
            ComponentValue::Function(f) => {
                assert_eq!(f.name, "rgb");
                // "1, 2, 3" tokenizes to: 1 , ws 2 , ws 3 — filtering only
                // applies at the outer iterator, nested whitespace survives.
                assert_eq!(f.values.len(), 7);
            }
            _ => panic!("expected function"),
        }
    }

    #[test]
    fn unterminated_function_is_not_an_error() {
        let cvs = parse_component_values_no_ws("rgb(1, 2");
        assert_eq!(cvs.len(), 1);
        match &cvs[0] {
            ComponentValue::Function(f) => assert_eq!(f.values.len(), 4),
            _ => panic!("expected function"),
        }
    }

    #[test]
    fn nested_blocks() {
        let cvs = parse_component_values_no_ws("[a [b] c]");
        assert_eq!(cvs.len(), 1);
        match &cvs[0] {
            ComponentValue::Block(b) => assert_eq!(b.values.len(), 3),
            _ => panic!("expected block"),
        }
    }
}
