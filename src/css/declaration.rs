//! The declaration-list parser. Used both for a style attribute's value
//! and for the body of a qualified rule. Malformed declarations are
//! dropped with a warning; they never abort the whole list.

use crate::css::component::{ComponentValue, ComponentValueParser};
use crate::css::token::TokenKind;
use crate::error::ParseError;
use crate::offset::FileOffset;

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: Vec<ComponentValue>,
    pub important: bool,
    pub offset: FileOffset,
}

/// Parses a `;`-separated declaration list, returning the declarations that
/// parsed successfully alongside one [`ParseError`] per declaration that
/// didn't. Order of `declarations` matches source order; later same-named
/// declarations override earlier ones per normal cascade-within-a-list
/// rules, but this function doesn't dedupe — callers apply that when
/// writing into the property registry.
pub fn parse_declaration_list(input: &str) -> (Vec<Declaration>, Vec<ParseError>) {
    let segments = split_top_level(input);
    parse_declaration_list_from_segments(segments)
}

/// Same as [`parse_declaration_list`], but over component values already
/// produced by a containing parse (e.g. a qualified rule's `{}` body) rather
/// than raw text.
pub fn parse_declaration_list_from_values(values: &[ComponentValue]) -> (Vec<Declaration>, Vec<ParseError>) {
    let segments = split_top_level_values(values);
    parse_declaration_list_from_segments(segments)
}

fn parse_declaration_list_from_segments(segments: Vec<Vec<ComponentValue>>) -> (Vec<Declaration>, Vec<ParseError>) {
    let mut decls = Vec::new();
    let mut errors = Vec::new();
    for seg in segments {
        match parse_one_declaration(&seg) {
            Ok(Some(d)) => decls.push(d),
            Ok(None) => {} // blank segment, not an error
            Err(e) => errors.push(e),
        }
    }
    (decls, errors)
}

fn split_top_level(input: &str) -> Vec<Vec<ComponentValue>> {
    split_top_level_values(&ComponentValueParser::new(input).collect::<Vec<_>>())
}

fn split_top_level_values(values: &[ComponentValue]) -> Vec<Vec<ComponentValue>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for cv in values {
        if matches!(cv, ComponentValue::Token(t) if matches!(t.kind, TokenKind::Semicolon)) {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(cv.clone());
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn trim_whitespace(values: &[ComponentValue]) -> &[ComponentValue] {
    let start = values.iter().position(|v| !v.is_whitespace()).unwrap_or(values.len());
    let end = values.iter().rposition(|v| !v.is_whitespace()).map(|i| i + 1).unwrap_or(start);
    &values[start..end]
}

fn parse_one_declaration(segment: &[ComponentValue]) -> Result<Option<Declaration>, ParseError> {
    let trimmed = trim_whitespace(segment);
    if trimmed.is_empty() {
        return Ok(None);
    }

    let offset = trimmed[0].offset();

    let name = match &trimmed[0] {
        ComponentValue::Token(t) => match &t.kind {
            TokenKind::Ident(id) => id.clone(),
            TokenKind::AtKeyword(_) => {
                return Err(ParseError::new("at-rules are not declarations", offset));
            }
            _ => return Err(ParseError::new("expected a property name", offset)),
        },
        _ => return Err(ParseError::new("expected a property name", offset)),
    };

    let rest = trim_whitespace(&trimmed[1..]);
    let colon_pos = rest
        .iter()
        .position(|v| matches!(v, ComponentValue::Token(t) if matches!(t.kind, TokenKind::Colon)))
        .ok_or_else(|| ParseError::new(format!("declaration '{}' is missing a colon", name), offset))?;
    if colon_pos != 0 {
        return Err(ParseError::new(format!("unexpected tokens before ':' in '{}'", name), offset));
    }

    let mut value = trim_whitespace(&rest[1..]).to_vec();
    if value.is_empty() {
        return Err(ParseError::new(format!("declaration '{}' has an empty value", name), offset));
    }

    let important = strip_important(&mut value);

    Ok(Some(Declaration { name, value, important, offset }))
}

/// Detects and removes a trailing `!important` (tokenized as `Delim('!')`
/// followed by an `important` ident, with optional whitespace throughout).
fn strip_important(value: &mut Vec<ComponentValue>) -> bool {
    let trimmed_end = value.iter().rposition(|v| !v.is_whitespace()).map(|i| i + 1);
    let Some(end) = trimmed_end else { return false };
    let is_important_ident = matches!(
        &value[end - 1],
        ComponentValue::Token(t) if matches!(&t.kind, TokenKind::Ident(id) if id.eq_ignore_ascii_case("important"))
    );
    if !is_important_ident || end < 2 {
        value.truncate(end);
        return false;
    }

    let mut i = end - 1;
    while i > 0 && value[i - 1].is_whitespace() {
        i -= 1;
    }
    if i == 0 {
        value.truncate(end);
        return false;
    }
    let is_bang = matches!(
        &value[i - 1],
        ComponentValue::Token(t) if matches!(t.kind, TokenKind::Delim('!'))
    );
    if is_bang {
        value.truncate(i - 1);
        while matches!(value.last(), Some(v) if v.is_whitespace()) {
            value.pop();
        }
        true
    } else {
        value.truncate(end);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_declaration() {
        let (decls, errs) = parse_declaration_list("fill: red; stroke-width: 2");
        assert!(errs.is_empty());
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name, "fill");
        assert_eq!(decls[1].name, "stroke-width");
        assert!(!decls[0].important);
    }

    #[test]
    fn important_is_detected_and_stripped() {
        let (decls, _) = parse_declaration_list("fill: red !important");
        assert_eq!(decls.len(), 1);
        assert!(decls[0].important);
        assert_eq!(decls[0].value.len(), 1);
    }

    #[test]
    fn important_with_odd_spacing() {
        let (decls, _) = parse_declaration_list("fill: red ! IMPORTANT");
        assert!(decls[0].important);
    }

    #[test]
    fn garbage_declaration_is_skipped_not_fatal() {
        let (decls, errs) = parse_declaration_list("fill red; stroke: blue");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "stroke");
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn trailing_semicolon_and_blank_segments_are_fine() {
        let (decls, errs) = parse_declaration_list("fill: red;; ;stroke: blue;");
        assert!(errs.is_empty());
        assert_eq!(decls.len(), 2);
    }

    #[test]
    fn empty_value_errors() {
        let (decls, errs) = parse_declaration_list("fill:");
        assert!(decls.is_empty());
        assert_eq!(errs.len(), 1);
    }

    proptest::proptest! {
        /// Splicing arbitrary junk segments between two valid declarations
        /// never changes those two declarations' names or values.
        #[test]
        fn garbage_segments_do_not_disturb_valid_declarations(junk in "[a-zA-Z0-9 !@#$%^&*()]{0,20}") {
            let input = format!("fill: red; {}; stroke: blue", junk);
            let (decls, _errs) = parse_declaration_list(&input);
            let names: Vec<&str> = decls.iter().map(|d| d.name.as_str()).collect();
            proptest::prop_assert!(names.contains(&"fill"));
            proptest::prop_assert!(names.contains(&"stroke"));
        }
    }
}
