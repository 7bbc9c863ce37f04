//! XML ingest — turns an SVG document's XML text into a populated
//! [`Store`]. Driven by `quick-xml`'s pull parser rather than a
//! DOM-building XML library, since nothing downstream needs the whole
//! document held in a separate tree before element dispatch runs: the tag
//! decides the factory, and the attributes decide what gets set on it.
//!
//! Namespace handling is deliberately narrow: only the default (no-prefix)
//! namespace and `xlink:` are understood. An element in any other namespace
//! is dropped with a warning if it isn't the document root, and is a fatal
//! [`LoadingError::NoSvgRoot`] if it is.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::css::rule::parse_stylesheet;
use crate::css::value::{parse_coord_units, parse_spread_method, CoordUnits, SpreadMethod};
use crate::error::{LoadingError, ParseError, Warning};
use crate::registry::Rank;
use crate::store::{ElementData, ElementId, ElementRecord, Store, TypeTag};
use crate::strings::SharedString;

/// Reads an SVG-attribute-family coord-units value (`patternUnits`,
/// `gradientUnits`, ...), falling back to the per-attribute default the SVG
/// spec gives that attribute when absent or unparseable.
fn coord_units_attr(rec: &ElementRecord, name: &str, default: CoordUnits) -> CoordUnits {
    rec.get_attribute(&(None, SharedString::from(name)))
        .and_then(|raw| parse_coord_units(raw).ok())
        .unwrap_or(default)
}

fn spread_method_attr(rec: &ElementRecord) -> SpreadMethod {
    rec.get_attribute(&(None, SharedString::from("spreadMethod")))
        .and_then(|raw| parse_spread_method(raw).ok())
        .unwrap_or_default()
}

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Options controlling how attributes are interpreted while ingesting.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Accept a bare number (no unit suffix) on a presentation attribute
    /// like `width`/`cx`.
    pub allow_user_units: bool,
    /// When set, attributes outside the known presentation-attribute and
    /// generic (`id`/`class`/`style`) set are dropped instead of being
    /// retained as opaque custom attributes.
    pub disable_user_attributes: bool,
}

fn tag_to_type(local_name: &str) -> TypeTag {
    match local_name {
        "svg" => TypeTag::Svg,
        "g" => TypeTag::G,
        "rect" => TypeTag::Rect,
        "circle" => TypeTag::Circle,
        "ellipse" => TypeTag::Ellipse,
        "line" => TypeTag::Line,
        "polyline" => TypeTag::Polyline,
        "polygon" => TypeTag::Polygon,
        "path" => TypeTag::Path,
        "text" => TypeTag::Text,
        "style" => TypeTag::Style,
        "defs" => TypeTag::Defs,
        "use" => TypeTag::Use,
        "pattern" => TypeTag::Pattern,
        "linearGradient" => TypeTag::LinearGradient,
        "radialGradient" => TypeTag::RadialGradient,
        "stop" => TypeTag::Stop,
        other => TypeTag::Unknown(other.to_string()),
    }
}

/// Splits a qualified attribute/tag name into `(prefix, local)`; a name with
/// no `:` has no prefix.
fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

struct Ingest<'a> {
    store: Store,
    options: IngestOptions,
    warnings: Vec<Warning>,
    stack: Vec<ElementId>,
    root: Option<ElementId>,
    reader: Reader<&'a [u8]>,
    pending_style_text: Option<(ElementId, String)>,
}

/// Parses `input` into a [`Store`] rooted at an `<svg>` element. Returns the
/// populated store, the root's [`ElementId`], and any non-fatal warnings
/// collected along the way: unrecognized elements become
/// `Unknown` type tags rather than errors, malformed presentation
/// attributes are dropped with a warning, and only a missing/misnamespaced
/// root or genuinely unparseable XML is fatal.
pub fn parse_document(input: &str, options: IngestOptions) -> Result<(Store, ElementId, Vec<Warning>), LoadingError> {
    let reader = Reader::from_str(input);

    let mut ingest = Ingest {
        store: Store::new(),
        options,
        warnings: Vec::new(),
        stack: Vec::new(),
        root: None,
        reader,
        pending_style_text: None,
    };
    ingest.run()?;

    let root = ingest.root.ok_or(LoadingError::NoSvgRoot)?;
    Ok((ingest.store, root, ingest.warnings))
}

impl<'a> Ingest<'a> {
    fn run(&mut self) -> Result<(), LoadingError> {
        loop {
            let event = self.reader.read_event().map_err(|e| LoadingError::XmlParseError(e.to_string()))?;
            match event {
                Event::Start(start) => self.handle_start(&start, false)?,
                Event::Empty(start) => self.handle_start(&start, true)?,
                Event::End(_) => self.handle_end(),
                Event::Text(text) => {
                    if let Some((_, buf)) = &mut self.pending_style_text {
                        let unescaped = text.unescape().unwrap_or_default();
                        buf.push_str(&unescaped);
                    }
                }
                Event::CData(cdata) => {
                    if let Some((_, buf)) = &mut self.pending_style_text {
                        buf.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_start(&mut self, start: &BytesStart, self_closing: bool) -> Result<(), LoadingError> {
        let raw_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let (prefix, local) = split_qname(&raw_name);

        let is_root = self.root.is_none();
        if let Some(p) = prefix {
            if p != "xlink" {
                if is_root {
                    return Err(LoadingError::NoSvgRoot);
                }
                self.warnings.push(Warning {
                    reason: format!("element '{}' is outside the recognized namespace subset", raw_name),
                    offset: crate::offset::FileOffset::EndOfString,
                });
                if !self_closing {
                    self.stack.push(self.skip_marker());
                }
                return Ok(());
            }
        }

        if is_root && local != "svg" {
            return Err(LoadingError::NoSvgRoot);
        }
        if is_root {
            if let Some(xmlns) = start
                .attributes()
                .flatten()
                .find(|a| a.key.as_ref() == b"xmlns")
            {
                let value = String::from_utf8_lossy(&xmlns.value).into_owned();
                if value != SVG_NAMESPACE {
                    return Err(LoadingError::NoSvgRoot);
                }
            }
        }

        let type_tag = tag_to_type(local);
        let element = self.store.create(type_tag.clone());

        for attr in start.attributes().flatten() {
            let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().unwrap_or_default().into_owned();
            if name == "xmlns" || name.starts_with("xmlns:") {
                continue;
            }
            self.apply_attribute(element, &name, &value);
        }
        self.finalize_element_data(element, &type_tag);

        if let Some(&parent) = self.stack.last() {
            let _ = self.store.append_child(parent, element);
        } else {
            self.root = Some(element);
        }

        if matches!(type_tag, TypeTag::Style) {
            self.pending_style_text = Some((element, String::new()));
        }

        if !self_closing {
            self.stack.push(element);
        } else if matches!(type_tag, TypeTag::Style) {
            self.finish_style_element();
        }

        Ok(())
    }

    fn handle_end(&mut self) {
        if self.pending_style_text.is_some() {
            self.finish_style_element();
        }
        self.stack.pop();
    }

    fn finish_style_element(&mut self) {
        let Some((element, text)) = self.pending_style_text.take() else { return };
        let (sheet, errors) = parse_stylesheet(&text);
        for e in errors {
            self.warnings.push(e.into());
        }
        self.store.get_mut(element).data = ElementData::Stylesheet(sheet);
    }

    /// Placeholder element used only to keep the stack depth correct while
    /// skipping a subtree outside the recognized namespace subset; never
    /// linked into the document tree.
    fn skip_marker(&mut self) -> ElementId {
        self.store.create(TypeTag::Unknown("__skipped__".to_string()))
    }

    fn apply_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let (prefix, local) = split_qname(name);
        match (prefix, local) {
            (None, "id") => self.store.get_mut(element).id = SharedString::from(value),
            (None, "class") => self.store.get_mut(element).class = SharedString::from(value),
            (None, "style") => self.apply_inline_style(element, value),
            (Some("xlink"), "href") => self.set_generic_attribute(element, None, "href", value),
            (Some(_other), _) => {}
            (None, local) => {
                let applied = self
                    .store
                    .get_mut(element)
                    .registry
                    .try_set_presentation_attribute(local, value);
                match applied {
                    Ok(true) => {}
                    Ok(false) => {
                        if !self.options.disable_user_attributes {
                            self.set_generic_attribute(element, None, local, value);
                        }
                    }
                    Err(e) => self.warnings.push(e.into()),
                }
            }
        }
    }

    fn apply_inline_style(&mut self, element: ElementId, value: &str) {
        let (decls, errors) = crate::css::declaration::parse_declaration_list(value);
        for e in errors {
            self.warnings.push(e.into());
        }
        let registry = &mut self.store.get_mut(element).registry;
        for decl in &decls {
            if let Err(e) = registry.apply_declaration(decl, Rank::InlineStyle) {
                self.warnings.push(e.into());
            }
        }
    }

    fn set_generic_attribute(&mut self, element: ElementId, ns: Option<&str>, local: &str, value: &str) {
        let key = (ns.map(SharedString::from), SharedString::from(local));
        self.store.get_mut(element).attributes.insert(key, SharedString::from(value));
    }

    /// Reads back the generic (non-registry) attributes a shape element
    /// needs for its typed geometry, into its à la carte `ElementData`.
    /// Unset attributes default to `0` (`rx`/`ry` to unset), matching SVG's
    /// own presentation-attribute defaults.
    fn finalize_element_data(&mut self, element: ElementId, type_tag: &TypeTag) {
        let opts = crate::css::length::LengthParseOptions { allow_user_units: true };
        let length_attr = |rec: &crate::store::ElementRecord, name: &str| -> crate::css::length::Length {
            rec.get_attribute(&(None, SharedString::from(name)))
                .and_then(|raw| {
                    let values = crate::css::component::parse_component_values(raw);
                    let significant: Vec<_> = values.iter().filter(|v| !v.is_whitespace()).collect();
                    significant.first().and_then(|cv| crate::css::length::parse_length(cv, opts).ok())
                })
                .unwrap_or(crate::css::length::Length::new(0.0, crate::css::length::LengthUnit::None))
        };
        let optional_length_attr = |rec: &crate::store::ElementRecord, name: &str| -> Option<crate::css::length::Length> {
            rec.get_attribute(&(None, SharedString::from(name))).and_then(|raw| {
                let values = crate::css::component::parse_component_values(raw);
                let significant: Vec<_> = values.iter().filter(|v| !v.is_whitespace()).collect();
                significant.first().and_then(|cv| crate::css::length::parse_length(cv, opts).ok())
            })
        };

        let data = match type_tag {
            TypeTag::Circle => {
                let rec = self.store.get(element);
                ElementData::Circle {
                    cx: length_attr(rec, "cx"),
                    cy: length_attr(rec, "cy"),
                    r: length_attr(rec, "r"),
                }
            }
            TypeTag::Ellipse => {
                let rec = self.store.get(element);
                ElementData::Ellipse {
                    cx: length_attr(rec, "cx"),
                    cy: length_attr(rec, "cy"),
                    rx: length_attr(rec, "rx"),
                    ry: length_attr(rec, "ry"),
                }
            }
            TypeTag::Rect => {
                let rec = self.store.get(element);
                ElementData::Rect {
                    x: length_attr(rec, "x"),
                    y: length_attr(rec, "y"),
                    width: length_attr(rec, "width"),
                    height: length_attr(rec, "height"),
                    rx: optional_length_attr(rec, "rx"),
                    ry: optional_length_attr(rec, "ry"),
                }
            }
            TypeTag::Line => {
                let rec = self.store.get(element);
                ElementData::Line {
                    x1: length_attr(rec, "x1"),
                    y1: length_attr(rec, "y1"),
                    x2: length_attr(rec, "x2"),
                    y2: length_attr(rec, "y2"),
                }
            }
            TypeTag::Polyline | TypeTag::Polygon => {
                let rec = self.store.get(element);
                let points = rec
                    .get_attribute(&(None, SharedString::from("points")))
                    .map(crate::css::value::parse_points)
                    .unwrap_or_default();
                ElementData::Points(points)
            }
            TypeTag::Pattern => {
                let rec = self.store.get(element);
                ElementData::Pattern {
                    units: coord_units_attr(rec, "patternUnits", CoordUnits::ObjectBoundingBox),
                    content_units: coord_units_attr(rec, "patternContentUnits", CoordUnits::UserSpaceOnUse),
                    x: length_attr(rec, "x"),
                    y: length_attr(rec, "y"),
                    width: length_attr(rec, "width"),
                    height: length_attr(rec, "height"),
                }
            }
            TypeTag::LinearGradient => {
                let rec = self.store.get(element);
                ElementData::LinearGradient {
                    units: coord_units_attr(rec, "gradientUnits", CoordUnits::ObjectBoundingBox),
                    spread: spread_method_attr(rec),
                    x1: length_attr(rec, "x1"),
                    y1: length_attr(rec, "y1"),
                    x2: length_attr(rec, "x2"),
                    y2: length_attr(rec, "y2"),
                }
            }
            TypeTag::RadialGradient => {
                let rec = self.store.get(element);
                ElementData::RadialGradient {
                    units: coord_units_attr(rec, "gradientUnits", CoordUnits::ObjectBoundingBox),
                    spread: spread_method_attr(rec),
                    cx: length_attr(rec, "cx"),
                    cy: length_attr(rec, "cy"),
                    r: length_attr(rec, "r"),
                    fx: optional_length_attr(rec, "fx"),
                    fy: optional_length_attr(rec, "fy"),
                }
            }
            TypeTag::Stop => {
                let rec = self.store.get(element);
                ElementData::Stop { offset: length_attr(rec, "offset") }
            }
            _ => return,
        };
        self.store.get_mut(element).data = data;
    }
}

/// Not used during live ingest (every `ParseError` is converted to a
/// `Warning` at the point it's produced); kept for callers that want to
/// resolve a batch of them against a `LineColLookup` at once.
pub fn resolve_all(input: &str, errors: &[ParseError]) -> Vec<(ParseError, crate::offset::LineCol)> {
    let lookup = crate::offset::LineColLookup::new(input);
    errors.iter().map(|e| (e.clone(), lookup.resolve(e.offset))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{get_computed, PropertyName, PropertyValue};

    #[test]
    fn parses_root_and_children() {
        let (store, root, warnings) =
            parse_document(r#"<svg><g><circle cx="1" cy="2" r="3"/></g></svg>"#, IngestOptions::default())
                .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(store.get(root).type_string(), "svg");
        let g = store.children(root).next().unwrap();
        let circle = store.children(g).next().unwrap();
        assert!(matches!(store.get(circle).data, ElementData::Circle { .. }));
    }

    #[test]
    fn missing_root_is_fatal() {
        let result = parse_document("<rect/>", IngestOptions::default());
        assert_eq!(result.unwrap_err(), LoadingError::NoSvgRoot);
    }

    #[test]
    fn id_class_and_style_route_correctly() {
        let (store, root, _) = parse_document(
            r#"<svg id="doc"><rect class="a b" style="fill: blue"/></svg>"#,
            IngestOptions::default(),
        )
        .unwrap();
        assert_eq!(store.get(root).id.as_str(), "doc");
        let rect = store.children(root).next().unwrap();
        assert!(store.get(rect).has_class("a"));
        assert_eq!(
            get_computed(&store, rect, PropertyName::Fill),
            PropertyValue::Paint(crate::css::paint::Paint::Color(crate::css::color::Color::Rgba(
                crate::css::color::Rgba::new(0, 0, 255, 255)
            )))
        );
    }

    #[test]
    fn presentation_attribute_sets_registry_property() {
        let (store, root, _) = parse_document(r#"<svg><rect fill="red"/></svg>"#, IngestOptions::default()).unwrap();
        let rect = store.children(root).next().unwrap();
        assert_eq!(
            get_computed(&store, rect, PropertyName::Fill),
            PropertyValue::Paint(crate::css::paint::Paint::Color(crate::css::color::Color::Rgba(
                crate::css::color::Rgba::new(255, 0, 0, 255)
            )))
        );
    }

    #[test]
    fn style_element_text_becomes_a_stylesheet() {
        let (store, root, _) =
            parse_document("<svg><style>circle { fill: green; }</style></svg>", IngestOptions::default()).unwrap();
        let style_el = store.children(root).next().unwrap();
        match &store.get(style_el).data {
            ElementData::Stylesheet(sheet) => assert_eq!(sheet.rules.len(), 1),
            other => panic!("expected a stylesheet, got {:?}", other),
        }
    }

    #[test]
    fn polygon_points_are_parsed() {
        let (store, root, _) =
            parse_document(r#"<svg><polygon points="0,0 10,0 5,10"/></svg>"#, IngestOptions::default()).unwrap();
        let polygon = store.children(root).next().unwrap();
        match &store.get(polygon).data {
            ElementData::Points(pts) => assert_eq!(pts, &vec![(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]),
            other => panic!("expected points, got {:?}", other),
        }
    }

    #[test]
    fn pattern_units_default_when_absent_and_override_when_present() {
        let (store, root, _) = parse_document(
            r#"<svg><pattern id="p" patternUnits="userSpaceOnUse" width="10" height="10"/></svg>"#,
            IngestOptions::default(),
        )
        .unwrap();
        let pattern = store.children(root).next().unwrap();
        match &store.get(pattern).data {
            ElementData::Pattern { units, content_units, .. } => {
                assert_eq!(*units, crate::css::value::CoordUnits::UserSpaceOnUse);
                assert_eq!(*content_units, crate::css::value::CoordUnits::UserSpaceOnUse);
            }
            other => panic!("expected a pattern, got {:?}", other),
        }
    }

    #[test]
    fn gradient_spread_method_and_defaults() {
        let (store, root, _) = parse_document(
            r#"<svg><linearGradient id="g" spreadMethod="reflect" x2="1"/></svg>"#,
            IngestOptions::default(),
        )
        .unwrap();
        let gradient = store.children(root).next().unwrap();
        match &store.get(gradient).data {
            ElementData::LinearGradient { spread, units, .. } => {
                assert_eq!(*spread, crate::css::value::SpreadMethod::Reflect);
                assert_eq!(*units, crate::css::value::CoordUnits::ObjectBoundingBox);
            }
            other => panic!("expected a linear gradient, got {:?}", other),
        }
    }

    #[test]
    fn foreign_namespace_element_is_dropped_with_a_warning() {
        let (store, root, warnings) = parse_document(
            r#"<svg><g><foo:bar xmlns:foo="urn:example"/></g></svg>"#,
            IngestOptions::default(),
        )
        .unwrap();
        assert_eq!(warnings.len(), 1);
        let g = store.children(root).next().unwrap();
        assert_eq!(store.children(g).count(), 0);
    }
}
