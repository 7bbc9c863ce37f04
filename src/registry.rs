//! The property registry — per-element cascaded property storage, fusing
//! presentation attributes, inline style, and stylesheet declarations
//! under the cascade.
//!
//! The property table itself (names, initial values, the per-property
//! parser to dispatch to) is built with [`define_properties!`], a macro
//! table that keeps each property's name, parser, and inheritance flag
//! declared together in one place instead of scattered across matching
//! `match` arms.

use once_cell::sync::Lazy;

use crate::css::color::{parse_color, Color};
use crate::css::component::{parse_component_values, ComponentValue};
use crate::css::declaration::Declaration;
use crate::css::length::{parse_length, Length, LengthParseOptions, LengthUnit};
use crate::css::paint::{parse_paint, Paint};
use crate::css::selector::Specificity;
use crate::css::token::TokenKind;
use crate::css::value::{
    parse_alpha, parse_dasharray, parse_line_cap, parse_line_join, parse_number, DashArray, LineCap,
    LineJoin,
};
use crate::error::ParseError;
use crate::offset::FileOffset;
use crate::store::{ElementId, Store};

/// Cascade precedence band, lowest to highest:
/// `!important` inline > `!important` stylesheet > inline style >
/// stylesheet(specificity, source-order) > presentation attribute > initial.
///
/// Declared in exactly that ascending order so the derived `Ord` is the
/// cascade comparison: comparing two ranks first compares which variant
/// (band) they're in, then — only within the `Stylesheet`/`ImportantStylesheet`
/// bands — the `(Specificity, source_order)` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    Initial,
    PresentationAttribute,
    Stylesheet(Specificity, usize),
    InlineStyle,
    ImportantStylesheet(Specificity, usize),
    ImportantInline,
}

pub fn promote_to_important(rank: Rank) -> Rank {
    match rank {
        Rank::Stylesheet(s, o) => Rank::ImportantStylesheet(s, o),
        Rank::InlineStyle => Rank::ImportantInline,
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExplicitState {
    /// No explicit value, keyword, or inherited-ness was ever recorded.
    /// Behaves like `Unset` on read.
    #[default]
    Unset,
    Value,
    Initial,
    Inherit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Color(Color),
    Paint(Paint),
    Number(f64),
    Length(Length),
    LineCap(LineCap),
    LineJoin(LineJoin),
    DashArray(DashArray),
}

macro_rules! define_properties {
    ($(($variant:ident, $css_name:literal, $initial:expr)),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum PropertyName {
            $($variant),*
        }

        impl PropertyName {
            pub const COUNT: usize = define_properties!(@count $($variant)*);

            pub fn from_str(name: &str) -> Option<PropertyName> {
                $(if name.eq_ignore_ascii_case($css_name) { return Some(PropertyName::$variant); })*
                None
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(PropertyName::$variant => $css_name),*
                }
            }

            fn slot_index(&self) -> usize {
                match self {
                    $(PropertyName::$variant => define_properties!(@index self, $variant, $($variant)*)),*
                }
            }

            pub fn initial_value(&self) -> PropertyValue {
                match self {
                    $(PropertyName::$variant => $initial),*
                }
            }
        }
    };
    (@count $($variant:ident)*) => {
        [$(stringify!($variant)),*].len()
    };
    (@index $self_expr:expr, $target:ident, $($variant:ident)*) => {{
        let names = [$(stringify!($variant)),*];
        names.iter().position(|n| *n == stringify!($target)).unwrap()
    }};
}

define_properties! {
    (Color, "color", PropertyValue::Color(Color::BLACK)),
    (Fill, "fill", PropertyValue::Paint(Paint::Color(Color::BLACK))),
    (Stroke, "stroke", PropertyValue::Paint(Paint::None)),
    (StrokeOpacity, "stroke-opacity", PropertyValue::Number(1.0)),
    (StrokeWidth, "stroke-width", PropertyValue::Length(Length::new(1.0, LengthUnit::Px))),
    (StrokeLinecap, "stroke-linecap", PropertyValue::LineCap(LineCap::Butt)),
    (StrokeLinejoin, "stroke-linejoin", PropertyValue::LineJoin(LineJoin::Miter)),
    (StrokeMiterlimit, "stroke-miterlimit", PropertyValue::Number(4.0)),
    (StrokeDasharray, "stroke-dasharray", PropertyValue::DashArray(DashArray::None)),
    (StrokeDashoffset, "stroke-dashoffset", PropertyValue::Length(Length::new(0.0, LengthUnit::None))),
}

/// Every property this registry knows is inherited (true of every SVG
/// presentation property in this crate's supported set).
fn is_inherited(_name: PropertyName) -> bool {
    true
}

/// Presentation attributes that exist on elements but are not CSS
/// properties routed through this registry — handled by the element type
/// instead.
const NON_PROPERTY_PRESENTATION_ATTRIBUTES: &[&str] =
    &["cx", "cy", "height", "width", "x", "y", "r", "rx", "ry", "d", "transform"];

pub fn is_presentation_attribute_name(name: &str) -> bool {
    PropertyName::from_str(name).is_some()
        || NON_PROPERTY_PRESENTATION_ATTRIBUTES.iter().any(|n| name.eq_ignore_ascii_case(n))
}

#[derive(Debug, Clone, Default)]
struct Slot {
    value: Option<PropertyValue>,
    rank: Option<Rank>,
    state: ExplicitState,
}

/// A single element's fixed set of cascaded property slots, plus the
/// unparsed-presentation-property overflow map.
#[derive(Debug, Clone)]
pub struct PropertyRegistry {
    slots: [Slot; PropertyName::COUNT],
    unparsed: Vec<(String, Vec<ComponentValue>, Rank)>,
}

impl PropertyRegistry {
    pub fn new() -> PropertyRegistry {
        PropertyRegistry {
            slots: std::array::from_fn(|_| Slot::default()),
            unparsed: Vec::new(),
        }
    }

    fn slot(&self, name: PropertyName) -> &Slot {
        &self.slots[name.slot_index()]
    }

    fn slot_mut(&mut self, name: PropertyName) -> &mut Slot {
        &mut self.slots[name.slot_index()]
    }

    /// Contract for write: a new value is accepted only if
    /// its rank is `>=` the slot's current rank; equal ranks overwrite
    /// (the later call wins, matching source order).
    pub fn set_value(&mut self, name: PropertyName, value: PropertyValue, rank: Rank) {
        let slot = self.slot_mut(name);
        if slot.rank.map_or(true, |current| rank >= current) {
            slot.value = Some(value);
            slot.rank = Some(rank);
            slot.state = ExplicitState::Value;
        }
    }

    pub fn set_keyword(&mut self, name: PropertyName, state: ExplicitState, rank: Rank) {
        let slot = self.slot_mut(name);
        if slot.rank.map_or(true, |current| rank >= current) {
            slot.value = None;
            slot.rank = Some(rank);
            slot.state = state;
        }
    }

    fn set_unparsed(&mut self, name: String, value: Vec<ComponentValue>, rank: Rank) {
        if let Some(existing) = self.unparsed.iter_mut().find(|(n, _, _)| *n == name) {
            if rank >= existing.2 {
                existing.1 = value;
                existing.2 = rank;
            }
            return;
        }
        self.unparsed.push((name, value, rank));
    }

    pub fn unparsed_properties(&self) -> &[(String, Vec<ComponentValue>, Rank)] {
        &self.unparsed
    }

    /// Routes a parsed `Declaration` to the per-property parser and writes
    /// the result through [`Self::set_value`], handling CSS-wide keywords
    /// first. Returns the unrecognized-but-presentation-attribute case by
    /// stashing it in the unparsed map instead of erroring.
    pub fn apply_declaration(&mut self, decl: &Declaration, rank: Rank) -> Result<(), ParseError> {
        let rank = if decl.important { promote_to_important(rank) } else { rank };
        match PropertyName::from_str(&decl.name) {
            Some(name) => self.apply_property_value(name, &decl.value, rank, decl.offset),
            None if is_presentation_attribute_name(&decl.name) => {
                self.set_unparsed(decl.name.clone(), decl.value.clone(), rank);
                Ok(())
            }
            None => Err(ParseError::new(format!("unknown property '{}'", decl.name), decl.offset)),
        }
    }

    /// Presentation-attribute parse path: a single CSS
    /// value with rank 0, unit-optional. Returns `Ok(false)` when `name`
    /// isn't a registry property at all (the element type should try its
    /// own attribute handling instead).
    pub fn try_set_presentation_attribute(&mut self, name: &str, raw_value: &str) -> Result<bool, ParseError> {
        let Some(prop) = PropertyName::from_str(name) else { return Ok(false) };
        let values = parse_component_values(raw_value);
        self.apply_property_value(prop, &values, Rank::PresentationAttribute, FileOffset::EndOfString)?;
        Ok(true)
    }

    fn apply_property_value(
        &mut self,
        name: PropertyName,
        values: &[ComponentValue],
        rank: Rank,
        offset: FileOffset,
    ) -> Result<(), ParseError> {
        let significant: Vec<&ComponentValue> = values.iter().filter(|v| !v.is_whitespace()).collect();
        if significant.len() == 1 {
            if let Some(TokenKind::Ident(id)) = significant[0].as_token().map(|t| &t.kind) {
                if id.eq_ignore_ascii_case("initial") {
                    self.set_keyword(name, ExplicitState::Initial, rank);
                    return Ok(());
                }
                if id.eq_ignore_ascii_case("inherit") {
                    self.set_keyword(name, ExplicitState::Inherit, rank);
                    return Ok(());
                }
                if id.eq_ignore_ascii_case("unset") {
                    self.set_keyword(name, ExplicitState::Unset, rank);
                    return Ok(());
                }
            }
        }

        let single = |offset: FileOffset| -> Result<&ComponentValue, ParseError> {
            significant.first().copied().ok_or_else(|| ParseError::new("empty value", offset))
        };
        let opts = LengthParseOptions { allow_user_units: true };

        let value = match name {
            PropertyName::Color => PropertyValue::Color(parse_color(single(offset)?)?),
            PropertyName::Fill | PropertyName::Stroke => PropertyValue::Paint(parse_paint(values)?),
            PropertyName::StrokeOpacity => PropertyValue::Number(parse_alpha(single(offset)?)?),
            PropertyName::StrokeWidth | PropertyName::StrokeDashoffset => {
                let len = parse_length(single(offset)?, opts)?;
                PropertyValue::Length(len)
            }
            PropertyName::StrokeLinecap => PropertyValue::LineCap(parse_line_cap(single(offset)?)?),
            PropertyName::StrokeLinejoin => PropertyValue::LineJoin(parse_line_join(single(offset)?)?),
            PropertyName::StrokeMiterlimit => PropertyValue::Number(parse_number(single(offset)?)?),
            PropertyName::StrokeDasharray => PropertyValue::DashArray(parse_dasharray(values)?),
        };
        self.set_value(name, value, rank);
        Ok(())
    }
}

impl Default for PropertyRegistry {
    fn default() -> PropertyRegistry {
        PropertyRegistry::new()
    }
}

/// Read contract: the stored value, else the inherited
/// value from the nearest ancestor whose slot is set, else the property's
/// initial value.
pub fn get_computed(store: &Store, element: ElementId, name: PropertyName) -> PropertyValue {
    let mut cursor = Some(element);
    while let Some(id) = cursor {
        let rec = store.get(id);
        let slot = rec.registry.slot(name);
        match slot.state {
            ExplicitState::Value => {
                return slot.value.clone().unwrap_or_else(|| name.initial_value());
            }
            ExplicitState::Initial => return name.initial_value(),
            ExplicitState::Inherit | ExplicitState::Unset => {
                if !is_inherited(name) {
                    return name.initial_value();
                }
                cursor = rec.links.parent;
            }
        }
    }
    name.initial_value()
}

/// A static lookup used only to document/verify the property table is
/// complete at startup; not on any hot path.
static PROPERTY_NAMES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    (0..PropertyName::COUNT)
        .filter_map(|i| ALL_PROPERTIES.get(i).map(|p| p.as_str()))
        .collect()
});

const ALL_PROPERTIES: [PropertyName; PropertyName::COUNT] = [
    PropertyName::Color,
    PropertyName::Fill,
    PropertyName::Stroke,
    PropertyName::StrokeOpacity,
    PropertyName::StrokeWidth,
    PropertyName::StrokeLinecap,
    PropertyName::StrokeLinejoin,
    PropertyName::StrokeMiterlimit,
    PropertyName::StrokeDasharray,
    PropertyName::StrokeDashoffset,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_table_is_complete() {
        assert_eq!(PROPERTY_NAMES.len(), PropertyName::COUNT);
        assert!(PROPERTY_NAMES.contains(&"stroke-dasharray"));
    }

    #[test]
    fn higher_rank_wins_lower_rank_does_not_overwrite() {
        let mut reg = PropertyRegistry::new();
        reg.set_value(
            PropertyName::StrokeOpacity,
            PropertyValue::Number(0.5),
            Rank::Stylesheet(Specificity::ZERO, 0),
        );
        reg.set_value(PropertyName::StrokeOpacity, PropertyValue::Number(0.1), Rank::PresentationAttribute);
        assert_eq!(reg.slot(PropertyName::StrokeOpacity).value, Some(PropertyValue::Number(0.5)));
    }

    #[test]
    fn equal_rank_later_write_wins() {
        let mut reg = PropertyRegistry::new();
        let rank = Rank::Stylesheet(Specificity::ZERO, 0);
        reg.set_value(PropertyName::StrokeOpacity, PropertyValue::Number(0.5), rank);
        reg.set_value(PropertyName::StrokeOpacity, PropertyValue::Number(0.9), rank);
        assert_eq!(reg.slot(PropertyName::StrokeOpacity).value, Some(PropertyValue::Number(0.9)));
    }

    #[test]
    fn important_beats_higher_specificity_non_important() {
        let mut reg = PropertyRegistry::new();
        reg.set_value(
            PropertyName::Color,
            PropertyValue::Color(Color::BLACK),
            Rank::Stylesheet(Specificity { a: 5, b: 0, c: 0 }, 3),
        );
        reg.set_value(
            PropertyName::Color,
            PropertyValue::Color(Color::TRANSPARENT),
            Rank::ImportantStylesheet(Specificity::ZERO, 0),
        );
        assert_eq!(reg.slot(PropertyName::Color).value, Some(PropertyValue::Color(Color::TRANSPARENT)));
    }

    #[test]
    fn unknown_but_presentation_attribute_goes_to_unparsed_map() {
        let mut reg = PropertyRegistry::new();
        let decl = crate::css::declaration::parse_declaration_list("width: 10").0;
        reg.apply_declaration(&decl[0], Rank::PresentationAttribute).unwrap();
        assert_eq!(reg.unparsed_properties().len(), 1);
        assert_eq!(reg.unparsed_properties()[0].0, "width");
    }

    #[test]
    fn truly_unknown_declaration_is_an_error() {
        let mut reg = PropertyRegistry::new();
        let decl = crate::css::declaration::parse_declaration_list("frobnicate: 10").0;
        assert!(reg.apply_declaration(&decl[0], Rank::PresentationAttribute).is_err());
    }
}
