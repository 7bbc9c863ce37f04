//! An+B microsyntax: the grammar used by `:nth-child` and friends, plus
//! its evaluation rule.

use crate::css::component::ComponentValue;
use crate::css::token::{NumberKind, TokenKind};
use crate::error::ParseError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AnbValue {
    pub a: i32,
    pub b: i32,
}

impl AnbValue {
    pub fn new(a: i32, b: i32) -> AnbValue {
        AnbValue { a, b }
    }

    /// Evaluates against a 1-based index: if `a == 0`, match iff
    /// `index == b`; else match iff `index >= 0` and `(index - b) % a == 0`.
    pub fn matches(&self, index: i32) -> bool {
        if self.a == 0 {
            index == self.b
        } else {
            index >= 0 && (index - self.b) % self.a == 0
        }
    }
}

/// Parses the content of an An+B argument list (already split out of the
/// surrounding `nth-child(...)` parens) per CSS Syntax §9.
pub fn parse_anb(values: &[ComponentValue]) -> Result<AnbValue, ParseError> {
    let toks: Vec<&ComponentValue> = values.iter().filter(|v| !v.is_whitespace()).collect();
    if toks.is_empty() {
        return Err(ParseError::new(
            "empty An+B",
            crate::offset::FileOffset::EndOfString,
        ));
    }

    // "odd" / "even"
    if toks.len() == 1 {
        if let ComponentValue::Token(t) = toks[0] {
            if let TokenKind::Ident(id) = &t.kind {
                if id.eq_ignore_ascii_case("odd") {
                    return Ok(AnbValue::new(2, 1));
                }
                if id.eq_ignore_ascii_case("even") {
                    return Ok(AnbValue::new(2, 0));
                }
            }
        }
    }

    // Single integer: "<integer>"
    if toks.len() == 1 {
        if let ComponentValue::Token(t) = toks[0] {
            if let TokenKind::Number { value, kind: NumberKind::Integer, .. } = t.kind {
                return Ok(AnbValue::new(0, value as i32));
            }
        }
    }

    // Single dimension/ident forms: "<n-dimension>", "<ndash-digit-ident>",
    // "<dashn-dimension>", "n", "-n", "+n", "n-1", "-n-1", etc. We normalize
    // by re-serializing the remaining tokens to a compact string and
    // matching the textual grammar, which is both simpler and matches the
    // reference grammar's intent closer than chasing every token split.
    let text = render_compact(&toks);
    parse_anb_text(&text)
}

fn render_compact(toks: &[&ComponentValue]) -> String {
    let mut s = String::new();
    for cv in toks {
        match cv {
            ComponentValue::Token(t) => match &t.kind {
                TokenKind::Ident(id) => s.push_str(id),
                TokenKind::Number { repr, .. } => s.push_str(repr),
                TokenKind::Dimension { repr, unit, .. } => {
                    s.push_str(repr);
                    s.push_str(unit);
                }
                TokenKind::Delim(c) => s.push(*c),
                _ => {}
            },
            _ => {}
        }
    }
    s
}

fn parse_anb_text(input: &str) -> Result<AnbValue, ParseError> {
    let s = input.trim();
    let lower = s.to_ascii_lowercase();

    let fail = || ParseError::new(format!("invalid An+B: '{}'", s), crate::offset::FileOffset::EndOfString);

    if lower == "odd" {
        return Ok(AnbValue::new(2, 1));
    }
    if lower == "even" {
        return Ok(AnbValue::new(2, 0));
    }
    if let Ok(b) = lower.parse::<i32>() {
        return Ok(AnbValue::new(0, b));
    }

    // Find the 'n' that separates the A coefficient from the B offset.
    let n_pos = lower.find('n').ok_or_else(fail)?;
    let (a_part, rest) = lower.split_at(n_pos);
    let rest = &rest[1..]; // skip 'n'

    let a = parse_a_coefficient(a_part).ok_or_else(fail)?;

    let b = if rest.is_empty() {
        0
    } else {
        let rest = rest.trim();
        if let Some(stripped) = rest.strip_prefix('+') {
            stripped.trim().parse::<i32>().map_err(|_| fail())?
        } else if let Some(stripped) = rest.strip_prefix('-') {
            -stripped.trim().parse::<i32>().map_err(|_| fail())?
        } else {
            rest.parse::<i32>().map_err(|_| fail())?
        }
    };

    Ok(AnbValue::new(a, b))
}

fn parse_a_coefficient(s: &str) -> Option<i32> {
    match s {
        "" | "+" => Some(1),
        "-" => Some(-1),
        s => s.parse::<i32>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(a: i32, b: i32, indices: &[i32]) -> Vec<i32> {
        let v = AnbValue::new(a, b);
        indices.iter().copied().filter(|i| v.matches(*i)).collect()
    }

    #[test]
    fn odd_even() {
        assert_eq!(parse_anb_text("odd").unwrap(), AnbValue::new(2, 1));
        assert_eq!(parse_anb_text("even").unwrap(), AnbValue::new(2, 0));
    }

    #[test]
    fn plain_integer() {
        assert_eq!(parse_anb_text("3").unwrap(), AnbValue::new(0, 3));
    }

    #[test]
    fn n_forms() {
        assert_eq!(parse_anb_text("n").unwrap(), AnbValue::new(1, 0));
        assert_eq!(parse_anb_text("2n").unwrap(), AnbValue::new(2, 0));
        assert_eq!(parse_anb_text("2n+1").unwrap(), AnbValue::new(2, 1));
        assert_eq!(parse_anb_text("-n+3").unwrap(), AnbValue::new(-1, 3));
        assert_eq!(parse_anb_text("-2n-1").unwrap(), AnbValue::new(-2, -1));
    }

    #[test]
    fn evaluation_matches_expected_indices() {
        assert_eq!(eval(2, 0, &[1, 2, 3, 4, 5, 6]), vec![2, 4, 6]);
        assert_eq!(eval(2, 1, &[1, 2, 3, 4, 5, 6]), vec![1, 3, 5]);
        assert_eq!(eval(0, 0, &[1, 2, 3]), Vec::<i32>::new());
        assert_eq!(eval(3, -1, &[1, 2, 3, 4, 5, 6, 7]), vec![2, 5]);
    }
}
