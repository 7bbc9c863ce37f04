//! The stylesheet applier: runs the CSS cascade over a whole document.
//!
//! For each `<style>` element's stylesheet, in document order, and for
//! each rule in that stylesheet in source order, every candidate element
//! in the store is tested against the rule's selector list via the
//! selector matcher; a match feeds every declaration in the rule into
//! that element's property registry at rank
//! `Stylesheet(specificity, rule.source_order)`. `!important` promotion
//! happens inside [`crate::registry::PropertyRegistry::apply_declaration`].
//!
//! Matches are collected across every stylesheet first, in an immutable
//! walk of the tree, then applied in a second, mutable pass — splitting
//! read from write this way keeps the whole cascade a two-pass borrow
//! over one shared tree instead of needing interior mutability per node.

use crate::css::rule::Stylesheet;
use crate::matcher::{matches_selector_list, StoreElement};
use crate::registry::Rank;
use crate::store::{ElementData, ElementId, Store};

fn collect_document_order(store: &Store, root: ElementId, out: &mut Vec<ElementId>) {
    out.push(root);
    for child in store.children(root) {
        collect_document_order(store, child, out);
    }
}

fn collect_stylesheets(store: &Store, elements: &[ElementId]) -> Vec<Stylesheet> {
    elements
        .iter()
        .filter_map(|&id| match &store.get(id).data {
            ElementData::Stylesheet(sheet) => Some(sheet.clone()),
            _ => None,
        })
        .collect()
}

struct PendingWrite {
    element: ElementId,
    declaration: crate::css::declaration::Declaration,
    rank: Rank,
}

/// Runs the cascade over the whole document rooted at `root`: every
/// `<style>` stylesheet, against every element, in document order.
pub fn apply_stylesheets(store: &mut Store, root: ElementId) {
    let elements = {
        let mut v = Vec::new();
        collect_document_order(store, root, &mut v);
        v
    };
    let stylesheets = collect_stylesheets(store, &elements);

    let mut pending = Vec::new();
    for sheet in &stylesheets {
        for rule in &sheet.rules {
            for &element in &elements {
                let cursor = StoreElement::new(store, element);
                if let Some(specificity) = matches_selector_list(&rule.selectors, &cursor) {
                    let rank = Rank::Stylesheet(specificity, rule.source_order);
                    for decl in &rule.declarations {
                        pending.push(PendingWrite { element, declaration: decl.clone(), rank });
                    }
                }
            }
        }
    }

    for write in pending {
        let registry = &mut store.get_mut(write.element).registry;
        if let Err(e) = registry.apply_declaration(&write.declaration, write.rank) {
            crate::style_log!("stylesheet declaration ignored: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::rule::parse_stylesheet;
    use crate::registry::{get_computed, PropertyName, PropertyValue};
    use crate::store::TypeTag;

    #[test]
    fn rule_applies_to_matching_element_only() {
        let mut store = Store::new();
        let root = store.create(TypeTag::Svg);
        let style_el = store.create(TypeTag::Style);
        let (sheet, _) = parse_stylesheet("circle { fill: blue; }");
        store.get_mut(style_el).data = ElementData::Stylesheet(sheet);
        store.append_child(root, style_el).unwrap();

        let circle = store.create(TypeTag::Circle);
        let rect = store.create(TypeTag::Rect);
        store.append_child(root, circle).unwrap();
        store.append_child(root, rect).unwrap();

        apply_stylesheets(&mut store, root);

        assert_eq!(
            get_computed(&store, circle, PropertyName::Fill),
            PropertyValue::Paint(crate::css::paint::Paint::Color(crate::css::color::Color::Rgba(
                crate::css::color::Rgba::new(0, 0, 255, 255)
            )))
        );
        assert_ne!(
            get_computed(&store, rect, PropertyName::Fill),
            PropertyValue::Paint(crate::css::paint::Paint::Color(crate::css::color::Color::Rgba(
                crate::css::color::Rgba::new(0, 0, 255, 255)
            )))
        );
    }

    #[test]
    fn inline_style_beats_stylesheet_and_presentation_attribute() {
        // An inline style declaration must win over both a stylesheet rule
        // and a presentation attribute on the same element.
        let mut store = Store::new();
        let root = store.create(TypeTag::Svg);
        let style_el = store.create(TypeTag::Style);
        let (sheet, _) = parse_stylesheet("circle { fill: blue; }");
        store.get_mut(style_el).data = ElementData::Stylesheet(sheet);
        store.append_child(root, style_el).unwrap();

        let circle = store.create(TypeTag::Circle);
        store.append_child(root, circle).unwrap();
        store.get_mut(circle).registry.try_set_presentation_attribute("fill", "green").unwrap();
        let (inline_decls, _) = crate::css::declaration::parse_declaration_list("fill:red");
        store
            .get_mut(circle)
            .registry
            .apply_declaration(&inline_decls[0], Rank::InlineStyle)
            .unwrap();

        apply_stylesheets(&mut store, root);

        assert_eq!(
            get_computed(&store, circle, PropertyName::Fill),
            PropertyValue::Paint(crate::css::paint::Paint::Color(crate::css::color::Color::Rgba(
                crate::css::color::Rgba::new(255, 0, 0, 255)
            )))
        );
    }
}
