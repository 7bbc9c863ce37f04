//! Scalar value parsers that don't warrant their own module: line caps,
//! line joins, dasharray lists, and bare number/alpha parsing.

use crate::css::component::ComponentValue;
use crate::css::length::{parse_length, Length, LengthParseOptions, LengthUnit};
use crate::css::token::TokenKind;
use crate::error::ParseError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

pub fn parse_line_cap(cv: &ComponentValue) -> Result<LineCap, ParseError> {
    match cv.as_token().map(|t| &t.kind) {
        Some(TokenKind::Ident(id)) if id.eq_ignore_ascii_case("butt") => Ok(LineCap::Butt),
        Some(TokenKind::Ident(id)) if id.eq_ignore_ascii_case("round") => Ok(LineCap::Round),
        Some(TokenKind::Ident(id)) if id.eq_ignore_ascii_case("square") => Ok(LineCap::Square),
        _ => Err(ParseError::new("expected butt|round|square", cv.offset())),
    }
}

/// The full `stroke-linejoin` set — `miter-clip` and `arcs` are the two
/// variants beyond SVG2's widely-implemented `miter`/`round`/`bevel` trio
/// (CSS Fill and Stroke Module Level 3 §9).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    MiterClip,
    Round,
    Bevel,
    Arcs,
}

pub fn parse_line_join(cv: &ComponentValue) -> Result<LineJoin, ParseError> {
    match cv.as_token().map(|t| &t.kind) {
        Some(TokenKind::Ident(id)) if id.eq_ignore_ascii_case("miter") => Ok(LineJoin::Miter),
        Some(TokenKind::Ident(id)) if id.eq_ignore_ascii_case("miter-clip") => Ok(LineJoin::MiterClip),
        Some(TokenKind::Ident(id)) if id.eq_ignore_ascii_case("round") => Ok(LineJoin::Round),
        Some(TokenKind::Ident(id)) if id.eq_ignore_ascii_case("bevel") => Ok(LineJoin::Bevel),
        Some(TokenKind::Ident(id)) if id.eq_ignore_ascii_case("arcs") => Ok(LineJoin::Arcs),
        _ => Err(ParseError::new("expected miter|miter-clip|round|bevel|arcs", cv.offset())),
    }
}

/// `stroke-dasharray`: `none`, or a comma/whitespace-separated list of
/// lengths/percentages. An odd-length list is duplicated per the SVG
/// rendering-model rule so consumers never need to special-case parity.
#[derive(Debug, Clone, PartialEq)]
pub enum DashArray {
    None,
    Dashes(Vec<Length>),
}

pub fn parse_dasharray(values: &[ComponentValue]) -> Result<DashArray, ParseError> {
    let toks: Vec<&ComponentValue> = values.iter().filter(|v| !v.is_whitespace()).collect();
    if toks.is_empty() {
        return Err(ParseError::new(
            "empty dasharray",
            crate::offset::FileOffset::EndOfString,
        ));
    }
    if toks.len() == 1 {
        if let Some(TokenKind::Ident(id)) = toks[0].as_token().map(|t| &t.kind) {
            if id.eq_ignore_ascii_case("none") {
                return Ok(DashArray::None);
            }
        }
    }

    let mut lengths = Vec::new();
    for cv in &toks {
        if matches!(cv.as_token().map(|t| &t.kind), Some(TokenKind::Comma)) {
            continue;
        }
        let len = parse_length(cv, LengthParseOptions { allow_user_units: true })?;
        if len.value < 0.0 {
            return Err(ParseError::new("dasharray values must be non-negative", cv.offset()));
        }
        lengths.push(len);
    }
    if lengths.is_empty() {
        return Err(ParseError::new(
            "dasharray has no lengths",
            crate::offset::FileOffset::EndOfString,
        ));
    }
    if lengths.len() % 2 == 1 {
        let doubled = lengths.clone();
        lengths.extend(doubled);
    }
    Ok(DashArray::Dashes(lengths))
}

/// A bare, unitless number (e.g. `stroke-miterlimit`, `opacity`'s numeric
/// form, `fill-opacity`). Percentages divide by 100.
pub fn parse_number(cv: &ComponentValue) -> Result<f64, ParseError> {
    match cv.as_token().map(|t| &t.kind) {
        Some(TokenKind::Number { value, .. }) => Ok(*value),
        Some(TokenKind::Percentage { value, .. }) => Ok(value / 100.0),
        _ => Err(ParseError::new("expected a number", cv.offset())),
    }
}

/// An alpha value (`opacity`, `fill-opacity`, `stroke-opacity`): a number or
/// percentage, clamped into `[0, 1]`.
pub fn parse_alpha(cv: &ComponentValue) -> Result<f64, ParseError> {
    parse_number(cv).map(|v| v.clamp(0.0, 1.0))
}

/// `stroke-width` and similar: a length that defaults to user units when no
/// unit is given.
pub fn parse_stroke_width(cv: &ComponentValue) -> Result<Length, ParseError> {
    let len = parse_length(cv, LengthParseOptions { allow_user_units: true })?;
    if len.value < 0.0 {
        return Err(ParseError::new("stroke-width must be non-negative", cv.offset()));
    }
    Ok(len)
}

pub fn is_user_unit_zero(len: &Length) -> bool {
    len.unit == LengthUnit::None && len.value == 0.0
}

/// `patternUnits`/`patternContentUnits`/`gradientUnits`/`maskUnits`/
/// `filterUnits` all share this one enum. A per-attribute newtype would
/// normally carry each attribute's own default; collapsed here to a single
/// shared type since this crate stores the parsed value rather than
/// threading a distinct per-attribute default through the cascade.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordUnits {
    UserSpaceOnUse,
    ObjectBoundingBox,
}

pub fn parse_coord_units(raw: &str) -> Result<CoordUnits, ParseError> {
    match raw.trim() {
        s if s.eq_ignore_ascii_case("userSpaceOnUse") => Ok(CoordUnits::UserSpaceOnUse),
        s if s.eq_ignore_ascii_case("objectBoundingBox") => Ok(CoordUnits::ObjectBoundingBox),
        _ => Err(ParseError::new(
            "expected userSpaceOnUse|objectBoundingBox",
            crate::offset::FileOffset::EndOfString,
        )),
    }
}

/// `spreadMethod` on `<linearGradient>`/`<radialGradient>`, grounded on the
/// teacher's `gradient.rs::SpreadMethod`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SpreadMethod {
    #[default]
    Pad,
    Reflect,
    Repeat,
}

pub fn parse_spread_method(raw: &str) -> Result<SpreadMethod, ParseError> {
    match raw.trim() {
        s if s.eq_ignore_ascii_case("pad") => Ok(SpreadMethod::Pad),
        s if s.eq_ignore_ascii_case("reflect") => Ok(SpreadMethod::Reflect),
        s if s.eq_ignore_ascii_case("repeat") => Ok(SpreadMethod::Repeat),
        _ => Err(ParseError::new("expected pad|reflect|repeat", crate::offset::FileOffset::EndOfString)),
    }
}

/// `points` on `<polyline>`/`<polygon>`: a comma/whitespace-separated list
/// of numbers, taken two at a time as (x, y) pairs. A trailing unpaired
/// number is dropped, matching the SVG2 grammar's "WSP list-of-points"
/// tolerance for malformed authored content rather than erroring the whole
/// element out.
pub fn parse_points(raw: &str) -> Vec<(f64, f64)> {
    let nums: Vec<f64> = raw
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .collect();
    nums.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::component::{parse_component_values, parse_one_component_value};

    #[test]
    fn line_cap_variants() {
        assert_eq!(parse_line_cap(&parse_one_component_value("round")).unwrap(), LineCap::Round);
        assert!(parse_line_cap(&parse_one_component_value("bogus")).is_err());
    }

    #[test]
    fn line_join_variants() {
        assert_eq!(parse_line_join(&parse_one_component_value("bevel")).unwrap(), LineJoin::Bevel);
        assert_eq!(parse_line_join(&parse_one_component_value("miter-clip")).unwrap(), LineJoin::MiterClip);
        assert_eq!(parse_line_join(&parse_one_component_value("arcs")).unwrap(), LineJoin::Arcs);
    }

    #[test]
    fn dasharray_none() {
        assert_eq!(parse_dasharray(&parse_component_values("none")).unwrap(), DashArray::None);
    }

    #[test]
    fn dasharray_odd_length_doubles() {
        let d = parse_dasharray(&parse_component_values("5, 3, 2")).unwrap();
        match d {
            DashArray::Dashes(lengths) => assert_eq!(lengths.len(), 6),
            _ => panic!("expected dashes"),
        }
    }

    #[test]
    fn alpha_clamped() {
        assert_eq!(parse_alpha(&parse_one_component_value("150%")).unwrap(), 1.0);
        assert_eq!(parse_alpha(&parse_one_component_value("-1")).unwrap(), 0.0);
    }

    #[test]
    fn coord_units_variants() {
        assert_eq!(parse_coord_units("userSpaceOnUse").unwrap(), CoordUnits::UserSpaceOnUse);
        assert_eq!(parse_coord_units("objectBoundingBox").unwrap(), CoordUnits::ObjectBoundingBox);
        assert!(parse_coord_units("bogus").is_err());
    }

    #[test]
    fn spread_method_variants() {
        assert_eq!(parse_spread_method("reflect").unwrap(), SpreadMethod::Reflect);
        assert_eq!(SpreadMethod::default(), SpreadMethod::Pad);
    }

    #[test]
    fn points_parses_pairs_and_drops_trailing_odd() {
        assert_eq!(parse_points("0,0 10,0 10,10"), vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(parse_points("1 2 3"), vec![(1.0, 2.0)]);
        assert_eq!(parse_points("  1,2   3,4  "), vec![(1.0, 2.0), (3.0, 4.0)]);
    }
}
