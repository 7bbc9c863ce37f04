//! The DOM facade — a thin, cloneable handle over a [`Store`] +
//! [`ElementId`] pair, the public surface a caller actually holds onto
//! (rather than the raw store and id). Cheap to clone, delegates tree
//! mutation straight to the store, and exposes `query_selector` by driving
//! the matcher itself rather than asking the store to know about
//! selectors.

use std::cell::RefCell;
use std::rc::Rc;

use crate::css::selector::parse_selector_list;
use crate::error::ParseError;
use crate::matcher::matches_selector_list;
use crate::registry::{get_computed, PropertyName, PropertyValue};
use crate::store::{ElementId, Store, StoreError, TypeTag};
use crate::strings::SharedString;

/// A document: one [`Store`] plus the id of its root `<svg>` element.
/// Shared (`Rc<RefCell<..>>`) so that [`Element`] handles can be cloned and
/// held independently of one another, the same ownership shape the
/// teacher's `Node` uses over its `rctree`.
#[derive(Clone)]
pub struct Document {
    store: Rc<RefCell<Store>>,
    root: ElementId,
}

impl Document {
    pub fn new(store: Store, root: ElementId) -> Document {
        Document { store: Rc::new(RefCell::new(store)), root }
    }

    pub fn root(&self) -> Element {
        Element { document: self.clone_handle(), id: self.root }
    }

    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.store.borrow().contains(id).then(|| Element { document: self.clone_handle(), id })
    }

    /// Runs a selector string against every element in the document,
    /// depth-first in document order, returning every match. A plain
    /// linear scan, since this crate keeps no selector index.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, ParseError> {
        let list = parse_selector_list(selector)?;
        let mut matches = Vec::new();
        self.collect_matches(self.root, &list, &mut matches);
        Ok(matches)
    }

    /// Same as [`Self::query_selector_all`], returning only the first match
    /// in document order.
    pub fn query_selector(&self, selector: &str) -> Result<Option<Element>, ParseError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    fn collect_matches(&self, id: ElementId, list: &[crate::css::ComplexSelector], out: &mut Vec<Element>) {
        let cursor = crate::matcher::StoreElement::new(&self.store.borrow(), id);
        if matches_selector_list(list, &cursor).is_some() {
            out.push(Element { document: self.clone_handle(), id });
        }
        let children: Vec<ElementId> = self.store.borrow().children(id).collect();
        for child in children {
            self.collect_matches(child, list, out);
        }
    }

    fn clone_handle(&self) -> Document {
        self.clone()
    }

    pub fn with_store<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        f(&self.store.borrow())
    }

    pub fn with_store_mut<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        f(&mut self.store.borrow_mut())
    }
}

/// A handle to one element within a [`Document`]. Cloning an `Element` is
/// cheap: it shares the document's store, it does not copy the element's
/// data.
#[derive(Clone)]
pub struct Element {
    document: Document,
    id: ElementId,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn type_string(&self) -> String {
        self.document.with_store(|s| s.get(self.id).type_string().to_string())
    }

    pub fn element_id(&self) -> String {
        self.document.with_store(|s| s.get(self.id).id.as_str().to_string())
    }

    pub fn set_element_id(&self, value: &str) {
        self.document.with_store_mut(|s| s.get_mut(self.id).id = SharedString::from(value));
    }

    pub fn class_name(&self) -> String {
        self.document.with_store(|s| s.get(self.id).class.as_str().to_string())
    }

    pub fn set_class_name(&self, value: &str) {
        self.document.with_store_mut(|s| s.get_mut(self.id).class = SharedString::from(value));
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.document.with_store(|s| s.get(self.id).get_attribute(&(None, SharedString::from(name))).is_some())
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.document.with_store(|s| s.get(self.id).get_attribute(&(None, SharedString::from(name))).map(str::to_string))
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.document.with_store_mut(|s| {
            s.get_mut(self.id)
                .attributes
                .insert((None, SharedString::from(name)), SharedString::from(value));
        });
    }

    pub fn remove_attribute(&self, name: &str) {
        self.document
            .with_store_mut(|s| s.get_mut(self.id).attributes.remove(&(None, SharedString::from(name))));
    }

    /// Replaces the element's whole inline style, applying every
    /// declaration at [`crate::registry::Rank::InlineStyle`]. Malformed
    /// declarations are reported, not fatal.
    pub fn set_style(&self, style: &str) -> Vec<ParseError> {
        let (decls, mut errors) = crate::css::declaration::parse_declaration_list(style);
        self.document.with_store_mut(|s| {
            let registry = &mut s.get_mut(self.id).registry;
            for decl in &decls {
                if let Err(e) = registry.apply_declaration(decl, crate::registry::Rank::InlineStyle) {
                    errors.push(e);
                }
            }
        });
        errors
    }

    /// Tries to set a single presentation attribute by name:
    /// `Ok(true)` if `name` is a registry property and the value
    /// parsed, `Ok(false)` if `name` isn't a registry property at all (the
    /// caller should fall back to [`Self::set_attribute`]).
    pub fn try_set_presentation_attribute(&self, name: &str, value: &str) -> Result<bool, ParseError> {
        self.document
            .with_store_mut(|s| s.get_mut(self.id).registry.try_set_presentation_attribute(name, value))
    }

    pub fn get_computed_property(&self, name: PropertyName) -> PropertyValue {
        self.document.with_store(|s| get_computed(s, self.id, name))
    }

    pub fn parent(&self) -> Option<Element> {
        let parent = self.document.with_store(|s| s.links(self.id).parent)?;
        Some(Element { document: self.document.clone_handle(), id: parent })
    }

    pub fn children(&self) -> Vec<Element> {
        self.document
            .with_store(|s| s.children(self.id).collect::<Vec<_>>())
            .into_iter()
            .map(|id| Element { document: self.document.clone_handle(), id })
            .collect()
    }

    pub fn append_child(&self, child: &Element) -> Result<(), StoreError> {
        self.document.with_store_mut(|s| s.append_child(self.id, child.id))
    }

    pub fn insert_before(&self, new_node: &Element, reference: Option<&Element>) -> Result<(), StoreError> {
        self.document
            .with_store_mut(|s| s.insert_before(self.id, new_node.id, reference.map(|e| e.id)))
    }

    pub fn remove_child(&self, child: &Element) -> Result<(), StoreError> {
        self.document.with_store_mut(|s| s.remove_child(self.id, child.id))
    }

    pub fn matches(&self, selector: &str) -> Result<bool, ParseError> {
        let list = parse_selector_list(selector)?;
        Ok(self.document.with_store(|s| {
            let cursor = crate::matcher::StoreElement::new(s, self.id);
            matches_selector_list(&list, &cursor).is_some()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn doc_with_rect() -> (Document, Element) {
        let mut store = Store::new();
        let root = store.create(TypeTag::Svg);
        let rect = store.create(TypeTag::Rect);
        store.append_child(root, rect).unwrap();
        let document = Document::new(store, root);
        let rect_handle = document.element(rect).unwrap();
        (document, rect_handle)
    }

    #[test]
    fn set_and_get_attribute() {
        let (_doc, rect) = doc_with_rect();
        rect.set_attribute("data-note", "hello");
        assert_eq!(rect.get_attribute("data-note"), Some("hello".to_string()));
        rect.remove_attribute("data-note");
        assert_eq!(rect.get_attribute("data-note"), None);
    }

    #[test]
    fn presentation_attribute_and_computed_style() {
        let (_doc, rect) = doc_with_rect();
        assert!(rect.try_set_presentation_attribute("fill", "red").unwrap());
        assert_eq!(
            rect.get_computed_property(PropertyName::Fill),
            PropertyValue::Paint(crate::css::paint::Paint::Color(crate::css::color::Color::Rgba(
                crate::css::color::Rgba::new(255, 0, 0, 255)
            )))
        );
    }

    #[test]
    fn query_selector_finds_matching_descendant() {
        let (doc, _rect) = doc_with_rect();
        let found = doc.query_selector("rect").unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn element_matches_its_own_selector() {
        let (_doc, rect) = doc_with_rect();
        assert!(rect.matches("rect").unwrap());
        assert!(!rect.matches("circle").unwrap());
    }
}
