//! The element store — a flat, `slab`-backed entity
//! database rather than boxed polymorphic tree nodes. `ElementId` is a
//! `slab` key; `slab` never hands back a stale index for a live slot, so it
//! already gives this crate's single-store, destroy-the-whole-document
//! lifecycle everything a generation counter would.

use std::collections::HashMap;

use slab::Slab;

use crate::css::rule::Stylesheet;
use crate::css::length::Length;
use crate::css::value::{CoordUnits, SpreadMethod};
use crate::registry::PropertyRegistry;
use crate::strings::SharedString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    fn from_slab_key(key: usize) -> ElementId {
        ElementId(key)
    }

    fn slab_key(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeLinks {
    pub parent: Option<ElementId>,
    pub first_child: Option<ElementId>,
    pub last_child: Option<ElementId>,
    pub previous_sibling: Option<ElementId>,
    pub next_sibling: Option<ElementId>,
}

/// The recognized SVG element kinds, the target of the tag-name→factory
/// dispatch table, plus a catch-all for anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Svg,
    G,
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
    Path,
    Text,
    Style,
    Defs,
    Use,
    Pattern,
    LinearGradient,
    RadialGradient,
    Stop,
    Unknown(String),
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::Svg => "svg",
            TypeTag::G => "g",
            TypeTag::Rect => "rect",
            TypeTag::Circle => "circle",
            TypeTag::Ellipse => "ellipse",
            TypeTag::Line => "line",
            TypeTag::Polyline => "polyline",
            TypeTag::Polygon => "polygon",
            TypeTag::Path => "path",
            TypeTag::Text => "text",
            TypeTag::Style => "style",
            TypeTag::Defs => "defs",
            TypeTag::Use => "use",
            TypeTag::Pattern => "pattern",
            TypeTag::LinearGradient => "linearGradient",
            TypeTag::RadialGradient => "radialGradient",
            TypeTag::Stop => "stop",
            TypeTag::Unknown(tag) => tag,
        }
    }
}

/// Per-element-kind data attached à la carte: only a `<pattern>` carries
/// pattern-unit data, only a gradient carries stop data, and so on.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ElementData {
    #[default]
    None,
    Circle {
        cx: Length,
        cy: Length,
        r: Length,
    },
    Ellipse {
        cx: Length,
        cy: Length,
        rx: Length,
        ry: Length,
    },
    Rect {
        x: Length,
        y: Length,
        width: Length,
        height: Length,
        rx: Option<Length>,
        ry: Option<Length>,
    },
    Line {
        x1: Length,
        y1: Length,
        x2: Length,
        y2: Length,
    },
    /// `<polyline>`/`<polygon>`'s `points` attribute, already parsed into
    /// (x, y) pairs.
    Points(Vec<(f64, f64)>),
    Pattern {
        units: CoordUnits,
        content_units: CoordUnits,
        x: Length,
        y: Length,
        width: Length,
        height: Length,
    },
    LinearGradient {
        units: CoordUnits,
        spread: SpreadMethod,
        x1: Length,
        y1: Length,
        x2: Length,
        y2: Length,
    },
    RadialGradient {
        units: CoordUnits,
        spread: SpreadMethod,
        cx: Length,
        cy: Length,
        r: Length,
        fx: Option<Length>,
        fy: Option<Length>,
    },
    /// `<stop offset="...">`; `stop-color`/`stop-opacity` are not part of
    /// this crate's supported property set, so only the position is stored
    /// here.
    Stop {
        offset: Length,
    },
    Stylesheet(Stylesheet),
}

/// An attribute name, namespace-qualified (`xlink:href` normalizes to
/// `(Some("xlink"), "href")`, a bare `fill` to `(None, "fill")`).
pub type AttributeKey = (Option<SharedString>, SharedString);

#[derive(Debug, Clone)]
pub struct ElementRecord {
    pub links: TreeLinks,
    pub type_tag: TypeTag,
    pub id: SharedString,
    pub class: SharedString,
    pub attributes: HashMap<AttributeKey, SharedString>,
    pub registry: PropertyRegistry,
    pub data: ElementData,
}

impl ElementRecord {
    fn new(type_tag: TypeTag) -> ElementRecord {
        ElementRecord {
            links: TreeLinks::default(),
            type_tag,
            id: SharedString::new(""),
            class: SharedString::new(""),
            attributes: HashMap::new(),
            registry: PropertyRegistry::new(),
            data: ElementData::None,
        }
    }

    pub fn type_string(&self) -> &str {
        self.type_tag.as_str()
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.class.as_str().split_ascii_whitespace()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class_names().any(|c| c == name)
    }

    pub fn get_attribute(&self, key: &AttributeKey) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced node is not a child of the given parent.
    NotAChild,
    /// The operation would make a node its own ancestor.
    WouldCreateCycle,
}

/// The flat entity/component database.
#[derive(Debug, Default)]
pub struct Store {
    slab: Slab<ElementRecord>,
}

impl Store {
    pub fn new() -> Store {
        Store { slab: Slab::new() }
    }

    pub fn create(&mut self, type_tag: TypeTag) -> ElementId {
        ElementId::from_slab_key(self.slab.insert(ElementRecord::new(type_tag)))
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.slab.contains(id.slab_key())
    }

    pub fn get(&self, id: ElementId) -> &ElementRecord {
        &self.slab[id.slab_key()]
    }

    pub fn get_mut(&mut self, id: ElementId) -> &mut ElementRecord {
        &mut self.slab[id.slab_key()]
    }

    pub fn try_get(&self, id: ElementId) -> Option<&ElementRecord> {
        self.slab.get(id.slab_key())
    }

    pub fn try_get_mut(&mut self, id: ElementId) -> Option<&mut ElementRecord> {
        self.slab.get_mut(id.slab_key())
    }

    pub fn links(&self, id: ElementId) -> TreeLinks {
        self.get(id).links
    }

    /// Removes every component of `id`, including its tree links. Does not
    /// cascade to children: callers that want to drop a subtree remove each
    /// descendant first (the DOM facade's `remove` does this).
    pub fn destroy(&mut self, id: ElementId) {
        if self.contains(id) {
            self.detach(id);
            self.slab.remove(id.slab_key());
        }
    }

    /// Unlinks `id` from its current parent/siblings, if any, leaving its
    /// own subtree intact. Idempotent: detaching an already-detached node
    /// is a no-op.
    pub fn detach(&mut self, id: ElementId) {
        let links = self.links(id);
        let Some(parent) = links.parent else { return };

        match links.previous_sibling {
            Some(prev) => self.get_mut(prev).links.next_sibling = links.next_sibling,
            None => self.get_mut(parent).links.first_child = links.next_sibling,
        }
        match links.next_sibling {
            Some(next) => self.get_mut(next).links.previous_sibling = links.previous_sibling,
            None => self.get_mut(parent).links.last_child = links.previous_sibling,
        }

        let rec = self.get_mut(id);
        rec.links.parent = None;
        rec.links.previous_sibling = None;
        rec.links.next_sibling = None;
    }

    fn is_ancestor_of(&self, candidate: ElementId, node: ElementId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == candidate {
                return true;
            }
            cur = self.links(n).parent;
        }
        false
    }

    /// Inserts `new_node` as a child of `parent`, immediately before
    /// `reference` (or at the end, if `reference` is `None`). Detaches
    /// `new_node` from its previous location first.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        new_node: ElementId,
        reference: Option<ElementId>,
    ) -> Result<(), StoreError> {
        if new_node == parent || self.is_ancestor_of(new_node, parent) {
            return Err(StoreError::WouldCreateCycle);
        }
        if let Some(reference) = reference {
            if self.links(reference).parent != Some(parent) {
                return Err(StoreError::NotAChild);
            }
        }

        self.detach(new_node);

        let prev = match reference {
            Some(r) => self.links(r).previous_sibling,
            None => self.links(parent).last_child,
        };

        match prev {
            Some(p) => self.get_mut(p).links.next_sibling = Some(new_node),
            None => self.get_mut(parent).links.first_child = Some(new_node),
        }
        match reference {
            Some(r) => self.get_mut(r).links.previous_sibling = Some(new_node),
            None => self.get_mut(parent).links.last_child = Some(new_node),
        }

        let rec = self.get_mut(new_node);
        rec.links.parent = Some(parent);
        rec.links.previous_sibling = prev;
        rec.links.next_sibling = reference;

        Ok(())
    }

    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), StoreError> {
        self.insert_before(parent, child, None)
    }

    pub fn replace_child(
        &mut self,
        parent: ElementId,
        new_node: ElementId,
        old_node: ElementId,
    ) -> Result<(), StoreError> {
        if self.links(old_node).parent != Some(parent) {
            return Err(StoreError::NotAChild);
        }
        let reference = self.links(old_node).next_sibling;
        self.detach(old_node);
        self.insert_before(parent, new_node, reference)
    }

    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), StoreError> {
        if self.links(child).parent != Some(parent) {
            return Err(StoreError::NotAChild);
        }
        self.detach(child);
        Ok(())
    }

    pub fn children(&self, parent: ElementId) -> ChildrenIter<'_> {
        ChildrenIter { store: self, next: self.links(parent).first_child }
    }
}

pub struct ChildrenIter<'a> {
    store: &'a Store,
    next: Option<ElementId>,
}

impl<'a> Iterator for ChildrenIter<'a> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        self.next = self.store.links(current).next_sibling;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(store: &mut Store) -> ElementId {
        store.create(TypeTag::Rect)
    }

    #[test]
    fn append_and_iterate_children() {
        let mut store = Store::new();
        let parent = store.create(TypeTag::G);
        let a = leaf(&mut store);
        let b = leaf(&mut store);
        store.append_child(parent, a).unwrap();
        store.append_child(parent, b).unwrap();

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(store.links(a).previous_sibling, None);
        assert_eq!(store.links(a).next_sibling, Some(b));
        assert_eq!(store.links(b).previous_sibling, Some(a));
        assert_eq!(store.links(parent).first_child, Some(a));
        assert_eq!(store.links(parent).last_child, Some(b));
    }

    #[test]
    fn insert_before_reference() {
        let mut store = Store::new();
        let parent = store.create(TypeTag::G);
        let a = leaf(&mut store);
        let b = leaf(&mut store);
        let c = leaf(&mut store);
        store.append_child(parent, a).unwrap();
        store.append_child(parent, c).unwrap();
        store.insert_before(parent, b, Some(c)).unwrap();

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![a, b, c]);
    }

    #[test]
    fn reinsertion_detaches_from_previous_parent() {
        let mut store = Store::new();
        let p1 = store.create(TypeTag::G);
        let p2 = store.create(TypeTag::G);
        let a = leaf(&mut store);
        store.append_child(p1, a).unwrap();
        store.append_child(p2, a).unwrap();

        assert_eq!(store.children(p1).collect::<Vec<_>>(), vec![]);
        assert_eq!(store.children(p2).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn remove_child_unlinks_but_keeps_entity() {
        let mut store = Store::new();
        let parent = store.create(TypeTag::G);
        let a = leaf(&mut store);
        store.append_child(parent, a).unwrap();
        store.remove_child(parent, a).unwrap();

        assert_eq!(store.children(parent).collect::<Vec<_>>(), vec![]);
        assert!(store.contains(a));
        assert_eq!(store.links(a).parent, None);
    }

    #[test]
    fn replace_child_preserves_position() {
        let mut store = Store::new();
        let parent = store.create(TypeTag::G);
        let a = leaf(&mut store);
        let b = leaf(&mut store);
        let c = leaf(&mut store);
        store.append_child(parent, a).unwrap();
        store.append_child(parent, b).unwrap();
        store.append_child(parent, c).unwrap();
        let d = leaf(&mut store);
        store.replace_child(parent, d, b).unwrap();

        assert_eq!(store.children(parent).collect::<Vec<_>>(), vec![a, d, c]);
    }

    #[test]
    fn cycle_insertion_is_rejected() {
        let mut store = Store::new();
        let a = store.create(TypeTag::G);
        let b = store.create(TypeTag::G);
        store.append_child(a, b).unwrap();
        assert_eq!(store.insert_before(b, a, None), Err(StoreError::WouldCreateCycle));
    }

    #[test]
    fn destroy_removes_entity() {
        let mut store = Store::new();
        let parent = store.create(TypeTag::G);
        let a = leaf(&mut store);
        store.append_child(parent, a).unwrap();
        store.destroy(a);
        assert!(!store.contains(a));
        assert_eq!(store.children(parent).collect::<Vec<_>>(), vec![]);
    }
}
