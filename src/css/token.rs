//! The CSS tokenizer.
//!
//! A direct, from-scratch implementation of the tokenizing algorithm in
//! [CSS Syntax Level 3](https://www.w3.org/TR/css-syntax-3/#tokenization).
//! It never returns a `Result`: every pathological input degrades to a
//! `bad-*`, `error`, or `delim` token instead of failing the whole parse —
//! the tokenizer is total over any byte-valid UTF-8 input.

use crate::css::length::LengthUnit;
use crate::offset::FileOffset;

#[derive(Debug, Clone, PartialEq)]
pub enum NumberKind {
    Integer,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    Id,
    Unrestricted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorTokenKind {
    EofInString,
    EofInComment,
    EofInUrl,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Function(String),
    AtKeyword(String),
    Hash { value: String, kind: HashKind },
    QuotedString(String),
    BadString(String),
    Url(String),
    BadUrl,
    Delim(char),
    Number { value: f64, repr: String, kind: NumberKind },
    Percentage { value: f64, repr: String, kind: NumberKind },
    Dimension {
        value: f64,
        repr: String,
        unit: String,
        resolved_unit: Option<LengthUnit>,
        kind: NumberKind,
    },
    Whitespace(String),
    Cdo,
    Cdc,
    Colon,
    Semicolon,
    Comma,
    OpenSquare,
    CloseSquare,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    Error(ErrorTokenKind),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: FileOffset,
}

/// A single-pass, no-lookahead-beyond-three-code-points tokenizer over a
/// string slice.
pub struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    eof_emitted: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Tokenizer<'a> {
        Tokenizer {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            eof_emitted: false,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek_at(&self, delta: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(delta)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    /// Produces the next token. Once the input is exhausted, keeps
    /// returning an `eof` token forever.
    pub fn next(&mut self) -> Token {
        let start = self.pos;

        if self.is_eof() {
            return Token {
                kind: TokenKind::Eof,
                offset: FileOffset::EndOfString,
            };
        }

        // Comments: consumed and discarded, but an unterminated comment
        // halts tokenization with a single error token.
        if self.starts_with("/*") {
            self.pos += 2;
            if let Some(end) = self.input[self.pos..].find("*/") {
                self.pos += end + 2;
                return self.next();
            } else {
                self.pos = self.bytes.len();
                return Token {
                    kind: TokenKind::Error(ErrorTokenKind::EofInComment),
                    offset: FileOffset::offset(start),
                };
            }
        }

        let c = self.peek().unwrap();

        match c {
            ' ' | '\t' | '\n' | '\r' | '\x0C' => self.consume_whitespace(start),
            '"' | '\'' => self.consume_string(start, c),
            '#' => self.consume_hash(start),
            '(' => {
                self.advance();
                Token { kind: TokenKind::OpenParen, offset: FileOffset::offset(start) }
            }
            ')' => {
                self.advance();
                Token { kind: TokenKind::CloseParen, offset: FileOffset::offset(start) }
            }
            '[' => {
                self.advance();
                Token { kind: TokenKind::OpenSquare, offset: FileOffset::offset(start) }
            }
            ']' => {
                self.advance();
                Token { kind: TokenKind::CloseSquare, offset: FileOffset::offset(start) }
            }
            '{' => {
                self.advance();
                Token { kind: TokenKind::OpenCurly, offset: FileOffset::offset(start) }
            }
            '}' => {
                self.advance();
                Token { kind: TokenKind::CloseCurly, offset: FileOffset::offset(start) }
            }
            ':' => {
                self.advance();
                Token { kind: TokenKind::Colon, offset: FileOffset::offset(start) }
            }
            ';' => {
                self.advance();
                Token { kind: TokenKind::Semicolon, offset: FileOffset::offset(start) }
            }
            ',' => {
                self.advance();
                Token { kind: TokenKind::Comma, offset: FileOffset::offset(start) }
            }
            '+' | '.' if self.starts_number() => self.consume_numeric(start),
            '-' if self.starts_with("-->") => {
                self.pos += 3;
                Token { kind: TokenKind::Cdc, offset: FileOffset::offset(start) }
            }
            '-' if self.starts_number() => self.consume_numeric(start),
            '-' if self.would_start_identifier(0) => self.consume_ident_like(start),
            '<' if self.starts_with("<!--") => {
                self.pos += 4;
                Token { kind: TokenKind::Cdo, offset: FileOffset::offset(start) }
            }
            '@' => {
                self.advance();
                if self.would_start_identifier(0) {
                    let name = self.consume_name();
                    Token { kind: TokenKind::AtKeyword(name), offset: FileOffset::offset(start) }
                } else {
                    Token { kind: TokenKind::Delim('@'), offset: FileOffset::offset(start) }
                }
            }
            '\\' if self.valid_escape(0) => self.consume_ident_like(start),
            c if is_digit(c) => self.consume_numeric(start),
            c if is_name_start(c) => self.consume_ident_like(start),
            c => {
                self.advance();
                Token { kind: TokenKind::Delim(c), offset: FileOffset::offset(start) }
            }
        }
    }

    fn consume_whitespace(&mut self, start: usize) -> Token {
        let s = self.pos;
        while matches!(self.peek(), Some(' ') | Some('\t') | Some('\n') | Some('\r') | Some('\x0C'))
        {
            self.advance();
        }
        Token {
            kind: TokenKind::Whitespace(self.input[s..self.pos].to_string()),
            offset: FileOffset::offset(start),
        }
    }

    fn consume_string(&mut self, start: usize, quote: char) -> Token {
        self.advance(); // consume quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return Token {
                        kind: TokenKind::QuotedString(value),
                        offset: FileOffset::offset(start),
                    };
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Token {
                        kind: TokenKind::QuotedString(value),
                        offset: FileOffset::offset(start),
                    };
                }
                Some('\n') => {
                    // Unescaped newline: bad-string, resume at the newline.
                    return Token {
                        kind: TokenKind::BadString(value),
                        offset: FileOffset::offset(start),
                    };
                }
                Some('\\') => {
                    if self.peek_at(1) == Some('\n') {
                        self.advance();
                        self.advance();
                    } else if self.valid_escape(0) {
                        self.advance();
                        value.push(self.consume_escaped());
                    } else {
                        self.advance();
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
    }

    fn consume_hash(&mut self, start: usize) -> Token {
        self.advance(); // '#'
        if self.would_start_identifier(0) || self.valid_escape(0) {
            let is_id = self.would_start_identifier(0);
            let name = self.consume_name();
            Token {
                kind: TokenKind::Hash {
                    value: name,
                    kind: if is_id { HashKind::Id } else { HashKind::Unrestricted },
                },
                offset: FileOffset::offset(start),
            }
        } else if matches!(self.peek(), Some(c) if is_name_char(c)) {
            let name = self.consume_name();
            Token {
                kind: TokenKind::Hash { value: name, kind: HashKind::Unrestricted },
                offset: FileOffset::offset(start),
            }
        } else {
            Token { kind: TokenKind::Delim('#'), offset: FileOffset::offset(start) }
        }
    }

    fn consume_name(&mut self) -> String {
        let mut s = String::new();
        loop {
            match self.peek() {
                Some(c) if is_name_char(c) => {
                    self.advance();
                    s.push(c);
                }
                Some('\\') if self.valid_escape(0) => {
                    self.advance();
                    s.push(self.consume_escaped());
                }
                _ => break,
            }
        }
        s
    }

    /// Consumes one escape sequence, assuming the leading `\` has already
    /// been consumed.
    fn consume_escaped(&mut self) -> char {
        match self.peek() {
            None => '\u{FFFD}',
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = String::new();
                while hex.len() < 6 {
                    match self.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            hex.push(c);
                            self.advance();
                        }
                        _ => break,
                    }
                }
                // A single trailing whitespace is consumed.
                if matches!(self.peek(), Some(' ') | Some('\t') | Some('\n') | Some('\r') | Some('\x0C'))
                {
                    self.advance();
                }
                let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
                if code == 0 || code > 0x10FFFF || (0xD800..=0xDFFF).contains(&code) {
                    '\u{FFFD}'
                } else {
                    char::from_u32(code).unwrap_or('\u{FFFD}')
                }
            }
            Some(c) => {
                self.advance();
                c
            }
        }
    }

    fn valid_escape(&self, delta: usize) -> bool {
        self.peek_at(delta) == Some('\\') && self.peek_at(delta + 1) != Some('\n') && self.peek_at(delta + 1).is_some()
    }

    fn would_start_identifier(&self, delta: usize) -> bool {
        match self.peek_at(delta) {
            Some('-') => match self.peek_at(delta + 1) {
                Some('-') => true,
                Some(c) if is_name_start(c) => true,
                _ => self.valid_escape(delta + 1),
            },
            Some(c) if is_name_start(c) => true,
            Some('\\') => self.valid_escape(delta),
            _ => false,
        }
    }

    fn starts_number(&self) -> bool {
        let mut i = 0;
        if matches!(self.peek_at(i), Some('+') | Some('-')) {
            i += 1;
        }
        match self.peek_at(i) {
            Some(c) if is_digit(c) => true,
            Some('.') => matches!(self.peek_at(i + 1), Some(c) if is_digit(c)),
            _ => false,
        }
    }

    fn consume_numeric(&mut self, start: usize) -> Token {
        let s = self.pos;
        let mut is_integer = true;

        if matches!(self.peek(), Some('+') | Some('-')) {
            self.advance();
        }
        while matches!(self.peek(), Some(c) if is_digit(c)) {
            self.advance();
        }
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some(c) if is_digit(c)) {
            is_integer = false;
            self.advance();
            while matches!(self.peek(), Some(c) if is_digit(c)) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut j = 1;
            if matches!(self.peek_at(j), Some('+') | Some('-')) {
                j += 1;
            }
            if matches!(self.peek_at(j), Some(c) if is_digit(c)) {
                is_integer = false;
                for _ in 0..j {
                    self.advance();
                }
                while matches!(self.peek(), Some(c) if is_digit(c)) {
                    self.advance();
                }
            }
        }

        let repr = self.input[s..self.pos].to_string();
        let value: f64 = repr.parse().unwrap_or_else(|_| {
            // Overflow: sign determines +/- infinity; malformed reprs don't
            // reach this parser by construction.
            if repr.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        });
        let kind = if is_integer { NumberKind::Integer } else { NumberKind::Number };

        if self.would_start_identifier(0) {
            let unit = self.consume_name();
            let resolved_unit = LengthUnit::from_css_name(&unit);
            Token {
                kind: TokenKind::Dimension { value, repr, unit, resolved_unit, kind },
                offset: FileOffset::offset(start),
            }
        } else if self.peek() == Some('%') {
            self.advance();
            Token {
                kind: TokenKind::Percentage { value, repr, kind },
                offset: FileOffset::offset(start),
            }
        } else {
            Token { kind: TokenKind::Number { value, repr, kind }, offset: FileOffset::offset(start) }
        }
    }

    fn consume_ident_like(&mut self, start: usize) -> Token {
        let name = self.consume_name();
        if name.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            self.advance();
            // Skip leading whitespace.
            while matches!(self.peek(), Some(' ') | Some('\t') | Some('\n') | Some('\r') | Some('\x0C'))
            {
                self.advance();
            }
            if matches!(self.peek(), Some('"') | Some('\'')) {
                // url(<string-token>) form: parsed by the component-value
                // builder as Function("url") containing a string; back up.
                return Token { kind: TokenKind::Function(name), offset: FileOffset::offset(start) };
            }
            self.consume_url(start)
        } else if self.peek() == Some('(') {
            self.advance();
            Token { kind: TokenKind::Function(name), offset: FileOffset::offset(start) }
        } else {
            Token { kind: TokenKind::Ident(name), offset: FileOffset::offset(start) }
        }
    }

    fn consume_url(&mut self, start: usize) -> Token {
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return Token { kind: TokenKind::Url(value), offset: FileOffset::offset(start) };
                }
                Some(')') => {
                    self.advance();
                    return Token { kind: TokenKind::Url(value), offset: FileOffset::offset(start) };
                }
                Some(' ') | Some('\t') | Some('\n') | Some('\r') | Some('\x0C') => {
                    while matches!(
                        self.peek(),
                        Some(' ') | Some('\t') | Some('\n') | Some('\r') | Some('\x0C')
                    ) {
                        self.advance();
                    }
                    if self.peek() == Some(')') || self.peek().is_none() {
                        self.advance();
                        return Token { kind: TokenKind::Url(value), offset: FileOffset::offset(start) };
                    }
                    return self.consume_bad_url(start);
                }
                Some('"') | Some('\'') | Some('(') => {
                    return self.consume_bad_url(start);
                }
                Some(c) if c.is_control() => {
                    return self.consume_bad_url(start);
                }
                Some('\\') => {
                    if self.valid_escape(0) {
                        self.advance();
                        value.push(self.consume_escaped());
                    } else {
                        return self.consume_bad_url(start);
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
    }

    fn consume_bad_url(&mut self, start: usize) -> Token {
        loop {
            match self.peek() {
                None => break,
                Some(')') => {
                    self.advance();
                    break;
                }
                Some('\\') if self.valid_escape(0) => {
                    self.advance();
                    self.consume_escaped();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        Token { kind: TokenKind::BadUrl, offset: FileOffset::offset(start) }
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic() || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || is_digit(c) || c == '-'
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.eof_emitted {
            return None;
        }
        let token = Tokenizer::next(self);
        if matches!(token.kind, TokenKind::Eof) {
            self.eof_emitted = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut t = Tokenizer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = t.next();
            let done = matches!(tok.kind, TokenKind::Eof);
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn whitespace_coalesces() {
        let ks = kinds("a   \tb");
        assert_eq!(
            ks,
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Whitespace("   \t".into()),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_comment_halts() {
        let ks = kinds("a /* oops");
        assert_eq!(
            ks,
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Whitespace(" ".into()),
                TokenKind::Error(ErrorTokenKind::EofInComment),
            ]
        );
    }

    #[test]
    fn newline_in_string_is_bad_string() {
        let mut t = Tokenizer::new("\"abc\ndef\"");
        let tok = t.next();
        assert_eq!(tok.kind, TokenKind::BadString("abc".into()));
        // Tokenization resumes right at the newline.
        let tok2 = t.next();
        assert_eq!(tok2.kind, TokenKind::Whitespace("\n".into()));
    }

    #[test]
    fn hash_id_vs_unrestricted() {
        let ks = kinds("#foo #1bad");
        assert_eq!(
            ks[0],
            TokenKind::Hash { value: "foo".into(), kind: HashKind::Id }
        );
        assert_eq!(
            ks[2],
            TokenKind::Hash { value: "1bad".into(), kind: HashKind::Unrestricted }
        );
    }

    #[test]
    fn dimension_and_percentage() {
        let ks = kinds("10px 50%");
        assert!(matches!(
            ks[0],
            TokenKind::Dimension { ref unit, .. } if unit == "px"
        ));
        assert!(matches!(ks[2], TokenKind::Percentage { .. }));
    }

    #[test]
    fn url_token_and_bad_url() {
        let ks = kinds("url(foo.png) url(bad 'x)");
        assert_eq!(ks[0], TokenKind::Url("foo.png".into()));
        assert!(ks.iter().any(|k| *k == TokenKind::BadUrl));
    }

    #[test]
    fn function_vs_ident() {
        let ks = kinds("rgb( foo");
        assert_eq!(ks[0], TokenKind::Function("rgb".into()));
        assert_eq!(ks[2], TokenKind::Ident("foo".into()));
    }

    #[test]
    fn cdo_cdc() {
        let ks = kinds("<!-- -->");
        assert_eq!(ks[0], TokenKind::Cdo);
        assert_eq!(ks[2], TokenKind::Cdc);
    }

    #[test]
    fn eof_repeats() {
        let mut t = Tokenizer::new("");
        assert_eq!(t.next().kind, TokenKind::Eof);
        assert_eq!(t.next().kind, TokenKind::Eof);
    }

    #[test]
    fn offsets_nondecreasing() {
        let mut t = Tokenizer::new("abc def ghi");
        let mut last = 0usize;
        loop {
            let tok = t.next();
            if let FileOffset::Offset(o) = tok.offset {
                assert!(o >= last);
                last = o;
            }
            if matches!(tok.kind, TokenKind::Eof) {
                break;
            }
        }
    }

    proptest::proptest! {
        /// A number token's preserved `repr` reparses to the same `value`
        /// it was tokenized with
        /// (modulo the documented ±∞ overflow case, which doesn't arise for
        /// values in this generator's range).
        #[test]
        fn number_repr_round_trips(n in -1_000_000i64..1_000_000i64) {
            let input = n.to_string();
            let mut t = Tokenizer::new(&input);
            let tok = t.next();
            if let TokenKind::Number { value, repr, .. } = tok.kind {
                proptest::prop_assert_eq!(repr.parse::<f64>().unwrap(), value);
                proptest::prop_assert_eq!(value, n as f64);
            } else {
                panic!("expected a Number token, got {:?}", tok.kind);
            }
        }

        /// Tokenizing never panics and always terminates in an eof token,
        /// for any byte-valid UTF-8 input.
        #[test]
        fn tokenizer_is_total(s in "\\PC*") {
            let mut t = Tokenizer::new(&s);
            let mut steps = 0;
            loop {
                let tok = t.next();
                steps += 1;
                proptest::prop_assert!(steps < 100_000, "tokenizer did not reach eof");
                if matches!(tok.kind, TokenKind::Eof) {
                    break;
                }
            }
        }
    }
}
