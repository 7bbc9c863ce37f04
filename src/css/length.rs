//! Length and percentage values.

use crate::css::component::ComponentValue;
use crate::css::token::{NumberKind, TokenKind};
use crate::error::ParseError;
use crate::offset::FileOffset;

/// The closed set of CSS length units this engine understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LengthUnit {
    /// User units (no suffix).
    None,
    Percent,
    Cm,
    Mm,
    Q,
    In,
    Pc,
    Pt,
    Px,
    Em,
    Ex,
    Ch,
    Rem,
    Vw,
    Vh,
    Vmin,
    Vmax,
}

impl LengthUnit {
    /// Resolves a CSS unit identifier (case-insensitive) to a recognized
    /// unit, or `None` if the identifier isn't one of the closed set.
    pub fn from_css_name(name: &str) -> Option<LengthUnit> {
        use LengthUnit::*;
        Some(match () {
            _ if name.eq_ignore_ascii_case("cm") => Cm,
            _ if name.eq_ignore_ascii_case("mm") => Mm,
            _ if name.eq_ignore_ascii_case("q") => Q,
            _ if name.eq_ignore_ascii_case("in") => In,
            _ if name.eq_ignore_ascii_case("pc") => Pc,
            _ if name.eq_ignore_ascii_case("pt") => Pt,
            _ if name.eq_ignore_ascii_case("px") => Px,
            _ if name.eq_ignore_ascii_case("em") => Em,
            _ if name.eq_ignore_ascii_case("ex") => Ex,
            _ if name.eq_ignore_ascii_case("ch") => Ch,
            _ if name.eq_ignore_ascii_case("rem") => Rem,
            _ if name.eq_ignore_ascii_case("vw") => Vw,
            _ if name.eq_ignore_ascii_case("vh") => Vh,
            _ if name.eq_ignore_ascii_case("vmin") => Vmin,
            _ if name.eq_ignore_ascii_case("vmax") => Vmax,
            _ => return None,
        })
    }
}

/// A parsed length or percentage value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f64, unit: LengthUnit) -> Length {
        Length { value, unit }
    }
}

/// Which extent of the viewbox a percentage/`vw`/`vh`/etc. length resolves
/// against.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Extent {
    X,
    Y,
    /// `sqrt(w² + h²) / sqrt(2)`, used for properties like `stroke-width`
    /// that aren't tied to one axis.
    Mixed,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewbox {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontMetrics {
    pub font_size: f64,
    pub root_font_size: f64,
    pub ex_unit_in_em: f64,
    pub ch_unit_in_em: f64,
}

const CM_PER_IN: f64 = 2.54;
const PX_PER_IN: f64 = 96.0;
const PT_PER_IN: f64 = 72.0;
const PC_PER_IN: f64 = 6.0;

impl Length {
    /// Converts to pixels, given the viewbox/font context a relative unit
    /// needs. `None` units (user units) and `px` are identity.
    pub fn to_pixels(&self, viewbox: Viewbox, fonts: FontMetrics, extent: Extent) -> f64 {
        use LengthUnit::*;

        let extent_px = || match extent {
            Extent::X => viewbox.width,
            Extent::Y => viewbox.height,
            Extent::Mixed => {
                (viewbox.width * viewbox.width + viewbox.height * viewbox.height).sqrt()
                    / std::f64::consts::SQRT_2
            }
        };

        match self.unit {
            None => self.value,
            Px => self.value,
            Percent => self.value / 100.0 * extent_px(),
            In => self.value * PX_PER_IN,
            Cm => self.value / CM_PER_IN * PX_PER_IN,
            Mm => self.value / CM_PER_IN / 10.0 * PX_PER_IN,
            Q => self.value / CM_PER_IN / 40.0 * PX_PER_IN,
            Pt => self.value / PT_PER_IN * PX_PER_IN,
            Pc => self.value / PC_PER_IN * PX_PER_IN,
            Em => self.value * fonts.font_size,
            Ex => self.value * fonts.font_size * fonts.ex_unit_in_em,
            Ch => self.value * fonts.font_size * fonts.ch_unit_in_em,
            Rem => self.value * fonts.root_font_size,
            Vw => self.value / 100.0 * viewbox.width,
            Vh => self.value / 100.0 * viewbox.height,
            Vmin => self.value / 100.0 * viewbox.width.min(viewbox.height),
            Vmax => self.value / 100.0 * viewbox.width.max(viewbox.height),
        }
    }
}

/// Options controlling how bare numbers are accepted ("unit-optional"
/// mode).
#[derive(Debug, Copy, Clone, Default)]
pub struct LengthParseOptions {
    /// Accept a bare number (other than `0`) as a `None`-unit length.
    pub allow_user_units: bool,
}

/// Parses a single component value as a length or percentage.
///
/// - a dimension with a recognized unit → that unit;
/// - a percentage → `Percent`;
/// - a number → only if `options.allow_user_units` or the value is
///   literally zero (zero is always unitless, even with unit-optional off).
pub fn parse_length(cv: &ComponentValue, options: LengthParseOptions) -> Result<Length, ParseError> {
    match cv {
        ComponentValue::Token(tok) => match &tok.kind {
            TokenKind::Dimension { value, unit, resolved_unit, .. } => match resolved_unit {
                Some(u) => Ok(Length::new(*value, *u)),
                None => Err(ParseError::new(
                    format!("invalid unit '{}'", unit),
                    tok.offset,
                )),
            },
            TokenKind::Percentage { value, .. } => Ok(Length::new(*value, LengthUnit::Percent)),
            TokenKind::Number { value, .. } => {
                if *value == 0.0 || options.allow_user_units {
                    Ok(Length::new(*value, LengthUnit::None))
                } else {
                    Err(ParseError::new("invalid unit", tok.offset))
                }
            }
            _ => Err(ParseError::new("expected a length", tok.offset)),
        },
        ComponentValue::Function(f) => {
            Err(ParseError::new("expected a length", FileOffset::offset(f.offset_usize())))
        }
        ComponentValue::Block(b) => {
            Err(ParseError::new("expected a length", FileOffset::offset(b.offset_usize())))
        }
    }
}

/// Whether a token kind can be the *integer part* of the kind produced for
/// zero vs. non-zero reprs; used only by tests exercising boundary cases.
pub fn is_integer_kind(k: &NumberKind) -> bool {
    matches!(k, NumberKind::Integer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::component::parse_one_component_value;

    fn parse(s: &str, opts: LengthParseOptions) -> Result<Length, ParseError> {
        let cv = parse_one_component_value(s);
        parse_length(&cv, opts)
    }

    #[test]
    fn parses_dimension() {
        let l = parse("10px", LengthParseOptions::default()).unwrap();
        assert_eq!(l, Length::new(10.0, LengthUnit::Px));
    }

    #[test]
    fn zero_is_always_unitless() {
        let l = parse("0", LengthParseOptions::default()).unwrap();
        assert_eq!(l, Length::new(0.0, LengthUnit::None));
    }

    #[test]
    fn bare_number_needs_unit_optional() {
        assert!(parse("1", LengthParseOptions::default()).is_err());
        let opts = LengthParseOptions { allow_user_units: true };
        assert_eq!(parse("1", opts).unwrap(), Length::new(1.0, LengthUnit::None));
    }

    #[test]
    fn unrecognized_unit_errors() {
        assert!(parse("1pp", LengthParseOptions::default()).is_err());
    }

    #[test]
    fn negative_vmin() {
        let l = parse("-17vmin", LengthParseOptions::default()).unwrap();
        assert_eq!(l, Length::new(-17.0, LengthUnit::Vmin));
    }
}
