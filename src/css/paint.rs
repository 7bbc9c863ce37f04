//! Paint servers: the value space for `fill`/`stroke`, covering `none`, a
//! bare color, a `url(#id)` paint server reference with an optional
//! fallback, and the `context-fill`/`context-stroke` keywords used inside
//! markers.

use crate::css::color::{parse_color, Color};
use crate::css::component::ComponentValue;
use crate::css::token::TokenKind;
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    None,
    Color(Color),
    ContextFill,
    ContextStroke,
    /// `url(#id)`, with an optional fallback paint if the reference can't be
    /// resolved.
    Reference {
        iri: String,
        fallback: Option<Box<FallbackPaint>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FallbackPaint {
    None,
    Color(Color),
}

pub fn parse_paint(values: &[ComponentValue]) -> Result<Paint, ParseError> {
    let toks: Vec<&ComponentValue> = values.iter().filter(|v| !v.is_whitespace()).collect();
    if toks.is_empty() {
        return Err(ParseError::new(
            "empty paint value",
            crate::offset::FileOffset::EndOfString,
        ));
    }

    if let ComponentValue::Token(t) = toks[0] {
        if let TokenKind::Ident(id) = &t.kind {
            if id.eq_ignore_ascii_case("none") {
                return Ok(Paint::None);
            }
            if id.eq_ignore_ascii_case("context-fill") {
                return Ok(Paint::ContextFill);
            }
            if id.eq_ignore_ascii_case("context-stroke") {
                return Ok(Paint::ContextStroke);
            }
        }
        if let TokenKind::Url(url) = &t.kind {
            let fallback = parse_fallback(&toks[1..])?;
            return Ok(Paint::Reference { iri: url.clone(), fallback: fallback.map(Box::new) });
        }
    }
    if let ComponentValue::Function(f) = toks[0] {
        if f.name.eq_ignore_ascii_case("url") {
            let iri = url_function_argument(f)?;
            let fallback = parse_fallback(&toks[1..])?;
            return Ok(Paint::Reference { iri, fallback: fallback.map(Box::new) });
        }
    }

    let color = parse_color(toks[0])?;
    Ok(Paint::Color(color))
}

fn url_function_argument(f: &crate::css::component::Function) -> Result<String, ParseError> {
    for v in &f.values {
        if let ComponentValue::Token(t) = v {
            if let TokenKind::QuotedString(s) = &t.kind {
                return Ok(s.clone());
            }
        }
    }
    Err(ParseError::new("url() missing a string argument", f.offset))
}

fn parse_fallback(rest: &[&ComponentValue]) -> Result<Option<FallbackPaint>, ParseError> {
    if rest.is_empty() {
        return Ok(None);
    }
    if let ComponentValue::Token(t) = rest[0] {
        if let TokenKind::Ident(id) = &t.kind {
            if id.eq_ignore_ascii_case("none") {
                return Ok(Some(FallbackPaint::None));
            }
        }
    }
    Ok(Some(FallbackPaint::Color(parse_color(rest[0])?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::component::parse_component_values;
    use crate::css::color::Rgba;

    fn parse(s: &str) -> Result<Paint, ParseError> {
        parse_paint(&parse_component_values(s))
    }

    #[test]
    fn none_keyword() {
        assert_eq!(parse("none").unwrap(), Paint::None);
    }

    #[test]
    fn plain_color() {
        assert_eq!(parse("red").unwrap(), Paint::Color(Color::Rgba(Rgba::new(255, 0, 0, 255))));
    }

    #[test]
    fn url_with_fallback() {
        let p = parse("url(#grad) blue").unwrap();
        match p {
            Paint::Reference { iri, fallback } => {
                assert_eq!(iri, "#grad");
                assert_eq!(
                    *fallback.unwrap(),
                    FallbackPaint::Color(Color::Rgba(Rgba::new(0, 0, 255, 255)))
                );
            }
            _ => panic!("expected reference"),
        }
    }

    #[test]
    fn url_with_none_fallback() {
        let p = parse("url(#grad) none").unwrap();
        match p {
            Paint::Reference { fallback, .. } => {
                assert_eq!(*fallback.unwrap(), FallbackPaint::None);
            }
            _ => panic!("expected reference"),
        }
    }

    #[test]
    fn context_fill_keyword() {
        assert_eq!(parse("context-fill").unwrap(), Paint::ContextFill);
    }
}
