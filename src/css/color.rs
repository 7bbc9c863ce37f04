//! Color values: named colors, hex notation, and the `rgb()`/`hsl()`
//! function families.

use crate::css::component::ComponentValue;
use crate::css::token::TokenKind;
use crate::error::ParseError;
use crate::offset::FileOffset;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba { r, g, b, a }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    Rgba(Rgba),
    CurrentColor,
}

impl Color {
    pub const BLACK: Color = Color::Rgba(Rgba::new(0, 0, 0, 255));
    pub const TRANSPARENT: Color = Color::Rgba(Rgba::new(0, 0, 0, 0));
}

fn offset_of(cv: &ComponentValue) -> FileOffset {
    cv.offset()
}

/// Parses a single component value as a CSS color.
pub fn parse_color(cv: &ComponentValue) -> Result<Color, ParseError> {
    match cv {
        ComponentValue::Token(tok) => match &tok.kind {
            TokenKind::Ident(name) => {
                if name.eq_ignore_ascii_case("currentcolor") {
                    Ok(Color::CurrentColor)
                } else if name.eq_ignore_ascii_case("transparent") {
                    Ok(Color::TRANSPARENT)
                } else if let Some(rgb) = named_color(name) {
                    Ok(Color::Rgba(rgb))
                } else {
                    Err(ParseError::new(format!("unknown color name '{}'", name), tok.offset))
                }
            }
            TokenKind::Hash { value, .. } => parse_hex(value, tok.offset),
            _ => Err(ParseError::new("expected a color", tok.offset)),
        },
        ComponentValue::Function(f) => {
            let name = f.name.to_ascii_lowercase();
            let args = split_args(&f.values);
            match name.as_str() {
                "rgb" | "rgba" => parse_rgb_function(&args, offset_of(cv)),
                "hsl" | "hsla" => parse_hsl_function(&args, offset_of(cv)),
                _ => Err(ParseError::new(format!("'{}' is not implemented", name), offset_of(cv))),
            }
        }
        ComponentValue::Block(_) => Err(ParseError::new("expected a color", offset_of(cv))),
    }
}

fn parse_hex(name: &str, offset: FileOffset) -> Result<Color, ParseError> {
    let is_hex = name.chars().all(|c| c.is_ascii_hexdigit());
    if !is_hex {
        return Err(ParseError::new("not a hex number", offset));
    }
    let expand = |c: char| -> u8 { (c.to_digit(16).unwrap() * 17) as u8 };
    let pair = |s: &str| -> u8 { u8::from_str_radix(s, 16).unwrap() };

    match name.len() {
        3 => {
            let mut cs = name.chars();
            let r = expand(cs.next().unwrap());
            let g = expand(cs.next().unwrap());
            let b = expand(cs.next().unwrap());
            Ok(Color::Rgba(Rgba::new(r, g, b, 255)))
        }
        4 => {
            let mut cs = name.chars();
            let r = expand(cs.next().unwrap());
            let g = expand(cs.next().unwrap());
            let b = expand(cs.next().unwrap());
            let a = expand(cs.next().unwrap());
            Ok(Color::Rgba(Rgba::new(r, g, b, a)))
        }
        6 => Ok(Color::Rgba(Rgba::new(
            pair(&name[0..2]),
            pair(&name[2..4]),
            pair(&name[4..6]),
            255,
        ))),
        8 => Ok(Color::Rgba(Rgba::new(
            pair(&name[0..2]),
            pair(&name[2..4]),
            pair(&name[4..6]),
            pair(&name[6..8]),
        ))),
        _ => Err(ParseError::new("not a hex number", offset)),
    }
}

/// Splits a function's argument list on top-level commas, dropping
/// whitespace on either side of each argument (both legacy comma-separated
/// and modern space-separated forms are tolerated by treating commas *and*
/// runs of whitespace as separators when no commas are present).
fn split_args(values: &[ComponentValue]) -> Vec<Vec<ComponentValue>> {
    let has_comma = values.iter().any(|v| {
        matches!(v, ComponentValue::Token(t) if matches!(t.kind, TokenKind::Comma))
    });

    let mut groups = Vec::new();
    let mut current = Vec::new();
    for v in values {
        let is_sep = if has_comma {
            matches!(v, ComponentValue::Token(t) if matches!(t.kind, TokenKind::Comma))
        } else {
            v.is_whitespace()
        };
        if is_sep {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else if !v.is_whitespace() {
            current.push(v.clone());
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

fn number_or_percentage(values: &[ComponentValue], max: f64) -> Option<f64> {
    if values.len() != 1 {
        return None;
    }
    match &values[0] {
        ComponentValue::Token(t) => match &t.kind {
            TokenKind::Number { value, .. } => Some(*value),
            TokenKind::Percentage { value, .. } => Some(value / 100.0 * max),
            _ => None,
        },
        _ => None,
    }
}

fn alpha_value(values: &[ComponentValue]) -> Option<f64> {
    if values.len() != 1 {
        return None;
    }
    match &values[0] {
        ComponentValue::Token(t) => match &t.kind {
            TokenKind::Number { value, .. } => Some(value.clamp(0.0, 1.0)),
            TokenKind::Percentage { value, .. } => Some((value / 100.0).clamp(0.0, 1.0)),
            _ => None,
        },
        _ => None,
    }
}

fn parse_rgb_function(args: &[Vec<ComponentValue>], offset: FileOffset) -> Result<Color, ParseError> {
    if args.len() != 3 && args.len() != 4 {
        return Err(ParseError::new("rgb() takes 3 or 4 arguments", offset));
    }
    let r = number_or_percentage(&args[0], 255.0).ok_or_else(|| ParseError::new("invalid red component", offset))?;
    let g = number_or_percentage(&args[1], 255.0).ok_or_else(|| ParseError::new("invalid green component", offset))?;
    let b = number_or_percentage(&args[2], 255.0).ok_or_else(|| ParseError::new("invalid blue component", offset))?;
    let a = if args.len() == 4 {
        alpha_value(&args[3]).ok_or_else(|| ParseError::new("invalid alpha component", offset))?
    } else {
        1.0
    };
    Ok(Color::Rgba(Rgba::new(
        r.round().clamp(0.0, 255.0) as u8,
        g.round().clamp(0.0, 255.0) as u8,
        b.round().clamp(0.0, 255.0) as u8,
        (a * 255.0).round().clamp(0.0, 255.0) as u8,
    )))
}

fn parse_hsl_function(args: &[Vec<ComponentValue>], offset: FileOffset) -> Result<Color, ParseError> {
    if args.len() != 3 && args.len() != 4 {
        return Err(ParseError::new("hsl() takes 3 or 4 arguments", offset));
    }
    let h = match args[0].as_slice() {
        [ComponentValue::Token(t)] => match &t.kind {
            TokenKind::Number { value, .. } => *value,
            TokenKind::Dimension { value, unit, .. } if unit.eq_ignore_ascii_case("deg") => *value,
            _ => return Err(ParseError::new("invalid hue", offset)),
        },
        _ => return Err(ParseError::new("invalid hue", offset)),
    };
    let s = percentage_0_1(&args[1]).ok_or_else(|| ParseError::new("invalid saturation", offset))?;
    let l = percentage_0_1(&args[2]).ok_or_else(|| ParseError::new("invalid lightness", offset))?;
    let a = if args.len() == 4 {
        alpha_value(&args[3]).ok_or_else(|| ParseError::new("invalid alpha component", offset))?
    } else {
        1.0
    };

    let (r, g, b) = hsl_to_rgb(h, s, l);
    Ok(Color::Rgba(Rgba::new(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
        (a * 255.0).round() as u8,
    )))
}

fn percentage_0_1(values: &[ComponentValue]) -> Option<f64> {
    if values.len() != 1 {
        return None;
    }
    match &values[0] {
        ComponentValue::Token(t) => match &t.kind {
            TokenKind::Percentage { value, .. } => Some((value / 100.0).clamp(0.0, 1.0)),
            _ => None,
        },
        _ => None,
    }
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = ((h % 360.0) + 360.0) % 360.0;
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hk = h / 360.0;
    let t = |mut tc: f64| {
        if tc < 0.0 {
            tc += 1.0;
        }
        if tc > 1.0 {
            tc -= 1.0;
        }
        if tc < 1.0 / 6.0 {
            p + (q - p) * 6.0 * tc
        } else if tc < 1.0 / 2.0 {
            q
        } else if tc < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - tc) * 6.0
        } else {
            p
        }
    };
    (t(hk + 1.0 / 3.0), t(hk), t(hk - 1.0 / 3.0))
}

macro_rules! named_colors {
    ($(($name:literal, $r:expr, $g:expr, $b:expr)),* $(,)?) => {
        fn named_color(name: &str) -> Option<Rgba> {
            $(
                if name.eq_ignore_ascii_case($name) {
                    return Some(Rgba::new($r, $g, $b, 255));
                }
            )*
            None
        }
    };
}

named_colors! {
    ("aliceblue", 240, 248, 255), ("antiquewhite", 250, 235, 215), ("aqua", 0, 255, 255),
    ("aquamarine", 127, 255, 212), ("azure", 240, 255, 255), ("beige", 245, 245, 220),
    ("bisque", 255, 228, 196), ("black", 0, 0, 0), ("blanchedalmond", 255, 235, 205),
    ("blue", 0, 0, 255), ("blueviolet", 138, 43, 226), ("brown", 165, 42, 42),
    ("burlywood", 222, 184, 135), ("cadetblue", 95, 158, 160), ("chartreuse", 127, 255, 0),
    ("chocolate", 210, 105, 30), ("coral", 255, 127, 80), ("cornflowerblue", 100, 149, 237),
    ("cornsilk", 255, 248, 220), ("crimson", 220, 20, 60), ("cyan", 0, 255, 255),
    ("darkblue", 0, 0, 139), ("darkcyan", 0, 139, 139), ("darkgoldenrod", 184, 134, 11),
    ("darkgray", 169, 169, 169), ("darkgreen", 0, 100, 0), ("darkgrey", 169, 169, 169),
    ("darkkhaki", 189, 183, 107), ("darkmagenta", 139, 0, 139), ("darkolivegreen", 85, 107, 47),
    ("darkorange", 255, 140, 0), ("darkorchid", 153, 50, 204), ("darkred", 139, 0, 0),
    ("darksalmon", 233, 150, 122), ("darkseagreen", 143, 188, 143), ("darkslateblue", 72, 61, 139),
    ("darkslategray", 47, 79, 79), ("darkslategrey", 47, 79, 79), ("darkturquoise", 0, 206, 209),
    ("darkviolet", 148, 0, 211), ("deeppink", 255, 20, 147), ("deepskyblue", 0, 191, 255),
    ("dimgray", 105, 105, 105), ("dimgrey", 105, 105, 105), ("dodgerblue", 30, 144, 255),
    ("firebrick", 178, 34, 34), ("floralwhite", 255, 250, 240), ("forestgreen", 34, 139, 34),
    ("fuchsia", 255, 0, 255), ("gainsboro", 220, 220, 220), ("ghostwhite", 248, 248, 255),
    ("gold", 255, 215, 0), ("goldenrod", 218, 165, 32), ("gray", 128, 128, 128),
    ("grey", 128, 128, 128), ("green", 0, 128, 0), ("greenyellow", 173, 255, 47),
    ("honeydew", 240, 255, 240), ("hotpink", 255, 105, 180), ("indianred", 205, 92, 92),
    ("indigo", 75, 0, 130), ("ivory", 255, 255, 240), ("khaki", 240, 230, 140),
    ("lavender", 230, 230, 250), ("lavenderblush", 255, 240, 245), ("lawngreen", 124, 252, 0),
    ("lemonchiffon", 255, 250, 205), ("lightblue", 173, 216, 230), ("lightcoral", 240, 128, 128),
    ("lightcyan", 224, 255, 255), ("lightgoldenrodyellow", 250, 250, 210), ("lightgray", 211, 211, 211),
    ("lightgreen", 144, 238, 144), ("lightgrey", 211, 211, 211), ("lightpink", 255, 182, 193),
    ("lightsalmon", 255, 160, 122), ("lightseagreen", 32, 178, 170), ("lightskyblue", 135, 206, 250),
    ("lightslategray", 119, 136, 153), ("lightslategrey", 119, 136, 153), ("lightsteelblue", 176, 196, 222),
    ("lightyellow", 255, 255, 224), ("lime", 0, 255, 0), ("limegreen", 50, 205, 50),
    ("linen", 250, 240, 230), ("magenta", 255, 0, 255), ("maroon", 128, 0, 0),
    ("mediumaquamarine", 102, 205, 170), ("mediumblue", 0, 0, 205), ("mediumorchid", 186, 85, 211),
    ("mediumpurple", 147, 112, 219), ("mediumseagreen", 60, 179, 113), ("mediumslateblue", 123, 104, 238),
    ("mediumspringgreen", 0, 250, 154), ("mediumturquoise", 72, 209, 204), ("mediumvioletred", 199, 21, 133),
    ("midnightblue", 25, 25, 112), ("mintcream", 245, 255, 250), ("mistyrose", 255, 228, 225),
    ("moccasin", 255, 228, 181), ("navajowhite", 255, 222, 173), ("navy", 0, 0, 128),
    ("oldlace", 253, 245, 230), ("olive", 128, 128, 0), ("olivedrab", 107, 142, 35),
    ("orange", 255, 165, 0), ("orangered", 255, 69, 0), ("orchid", 218, 112, 214),
    ("palegoldenrod", 238, 232, 170), ("palegreen", 152, 251, 152), ("paleturquoise", 175, 238, 238),
    ("palevioletred", 219, 112, 147), ("papayawhip", 255, 239, 213), ("peachpuff", 255, 218, 185),
    ("peru", 205, 133, 63), ("pink", 255, 192, 203), ("plum", 221, 160, 221),
    ("powderblue", 176, 224, 230), ("purple", 128, 0, 128), ("rebeccapurple", 102, 51, 153),
    ("red", 255, 0, 0), ("rosybrown", 188, 143, 143), ("royalblue", 65, 105, 225),
    ("saddlebrown", 139, 69, 19), ("salmon", 250, 128, 114), ("sandybrown", 244, 164, 96),
    ("seagreen", 46, 139, 87), ("seashell", 255, 245, 238), ("sienna", 160, 82, 45),
    ("silver", 192, 192, 192), ("skyblue", 135, 206, 235), ("slateblue", 106, 90, 205),
    ("slategray", 112, 128, 144), ("slategrey", 112, 128, 144), ("snow", 255, 250, 250),
    ("springgreen", 0, 255, 127), ("steelblue", 70, 130, 180), ("tan", 210, 180, 140),
    ("teal", 0, 128, 128), ("thistle", 216, 191, 216), ("tomato", 255, 99, 71),
    ("turquoise", 64, 224, 208), ("violet", 238, 130, 238), ("wheat", 245, 222, 179),
    ("white", 255, 255, 255), ("whitesmoke", 245, 245, 245), ("yellow", 255, 255, 0),
    ("yellowgreen", 154, 205, 50),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::component::parse_one_component_value;

    fn parse(s: &str) -> Result<Color, ParseError> {
        parse_color(&parse_one_component_value(s))
    }

    #[test]
    fn hex_triple_expansion() {
        assert_eq!(parse("#ABC").unwrap(), Color::Rgba(Rgba::new(0xAA, 0xBB, 0xCC, 0xFF)));
    }

    #[test]
    fn hex_quad_and_long_forms() {
        assert_eq!(parse("#ABCD").unwrap(), Color::Rgba(Rgba::new(0xAA, 0xBB, 0xCC, 0xDD)));
        assert_eq!(parse("#aabbcc").unwrap(), Color::Rgba(Rgba::new(0xAA, 0xBB, 0xCC, 0xFF)));
        assert_eq!(parse("#aabbccdd").unwrap(), Color::Rgba(Rgba::new(0xAA, 0xBB, 0xCC, 0xDD)));
    }

    #[test]
    fn empty_hash_errors() {
        assert!(parse("#").is_err());
    }

    #[test]
    fn named_colors_are_case_insensitive() {
        assert_eq!(parse("RED").unwrap(), Color::Rgba(Rgba::new(255, 0, 0, 255)));
        assert_eq!(parse("CurrentColor").unwrap(), Color::CurrentColor);
    }

    #[test]
    fn rgb_function_legacy_and_modern() {
        assert_eq!(
            parse("rgb(255, 0, 0)").unwrap(),
            Color::Rgba(Rgba::new(255, 0, 0, 255))
        );
        assert_eq!(
            parse("rgba(0, 255, 0, 0.5)").unwrap(),
            Color::Rgba(Rgba::new(0, 255, 0, 128))
        );
    }

    #[test]
    fn unimplemented_function_is_not_a_crash() {
        assert!(parse("calc(1 + 2)").is_err());
    }
}
