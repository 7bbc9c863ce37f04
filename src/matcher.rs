//! The selector matcher.
//!
//! Matches a [`ComplexSelector`] against an element by walking its
//! compounds right to left, exactly as Selectors Level 4 §17.3 specifies.
//! The candidate sets between compounds — ancestors, the parent, the
//! previous sibling, previous siblings — are produced lazily by
//! [`Generator`], one element at a time, so a failing match short-circuits
//! without walking the whole subtree. Some CSS engines implement this
//! traversal as a coroutine that suspends between candidates; here it's a
//! plain Rust iterator instead, since Rust has no stable generator syntax
//! at this language level.
//!
//! The matcher never mutates the document (`ElementLike` only exposes
//! read-only tree/attribute accessors) and performs no allocation beyond
//! the generator's own small cursor state.

use crate::css::anb::AnbValue;
use crate::css::selector::{
    AttrMatcher, Combinator, ComplexSelector, CompoundSelector, PseudoClass, SimpleSelector,
    Specificity,
};
use crate::store::{ElementId, Store};

/// The abstract capability set the matcher needs from an element.
/// Implemented here for a `(Store, ElementId)` cursor; a future renderer
/// could implement it for its own node type instead of depending on this
/// crate's store directly.
pub trait ElementLike: Clone + PartialEq {
    fn parent(&self) -> Option<Self>;
    fn first_child(&self) -> Option<Self>;
    fn last_child(&self) -> Option<Self>;
    fn previous_sibling(&self) -> Option<Self>;
    fn next_sibling(&self) -> Option<Self>;
    fn type_string(&self) -> &str;
    fn id(&self) -> &str;
    fn class_name(&self) -> &str;
    fn get_attribute(&self, name: &str) -> Option<&str>;
}

/// A read-only cursor into a [`Store`], the concrete `ElementLike` this
/// crate matches selectors against.
#[derive(Clone, Copy)]
pub struct StoreElement<'a> {
    store: &'a Store,
    id: ElementId,
}

impl<'a> StoreElement<'a> {
    pub fn new(store: &'a Store, id: ElementId) -> StoreElement<'a> {
        StoreElement { store, id }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }
}

impl<'a> PartialEq for StoreElement<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<'a> ElementLike for StoreElement<'a> {
    fn parent(&self) -> Option<Self> {
        self.store.links(self.id).parent.map(|id| StoreElement { store: self.store, id })
    }

    fn first_child(&self) -> Option<Self> {
        self.store.links(self.id).first_child.map(|id| StoreElement { store: self.store, id })
    }

    fn last_child(&self) -> Option<Self> {
        self.store.links(self.id).last_child.map(|id| StoreElement { store: self.store, id })
    }

    fn previous_sibling(&self) -> Option<Self> {
        self.store.links(self.id).previous_sibling.map(|id| StoreElement { store: self.store, id })
    }

    fn next_sibling(&self) -> Option<Self> {
        self.store.links(self.id).next_sibling.map(|id| StoreElement { store: self.store, id })
    }

    fn type_string(&self) -> &str {
        self.store.get(self.id).type_string()
    }

    fn id(&self) -> &str {
        self.store.get(self.id).id.as_str()
    }

    fn class_name(&self) -> &str {
        self.store.get(self.id).class.as_str()
    }

    fn get_attribute(&self, name: &str) -> Option<&str> {
        let rec = self.store.get(self.id);
        rec.attributes.iter().find(|((_, local), _)| local.as_str() == name).map(|(_, v)| v.as_str())
    }
}

/// One traversal kind per combinator: descendant, child, next-sibling,
/// subsequent-sibling. `Column` has no traversal — it always fails to
/// match — so it has no generator variant at all.
enum Generator<T> {
    /// Yields `element`, if any (the starting candidate set for the
    /// rightmost compound).
    Single(Option<T>),
    /// Yields every ancestor of `current`, nearest first.
    Ancestors(Option<T>),
    /// Yields every previous sibling of `current`, nearest first.
    PreviousSiblings(Option<T>),
}

impl<T: ElementLike> Iterator for Generator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Generator::Single(slot) => slot.take(),
            Generator::Ancestors(current) => {
                let next = current.take()?.parent();
                *current = next.clone();
                next
            }
            Generator::PreviousSiblings(current) => {
                let next = current.take()?.previous_sibling();
                *current = next.clone();
                next
            }
        }
    }
}

/// Matches a full selector list (a comma-separated list of complex
/// selectors): the first complex selector that matches wins, and its
/// specificity is returned.
pub fn matches_selector_list<T: ElementLike>(
    list: &[ComplexSelector],
    element: &T,
) -> Option<Specificity> {
    list.iter().find_map(|complex| matches_complex(complex, element))
}

/// Matches one [`ComplexSelector`] against `element`, right to left.
pub fn matches_complex<T: ElementLike>(selector: &ComplexSelector, element: &T) -> Option<Specificity> {
    // Reconstruct the (combinator, compound) chain in right-to-left order:
    // the rightmost entry pairs the *last* compound with the combinator
    // that precedes it; the leftmost (first) compound carries no incoming
    // combinator and terminates the walk.
    let mut compounds: Vec<(Option<Combinator>, &CompoundSelector)> =
        vec![(None, &selector.first)];
    for (combinator, compound) in &selector.rest {
        compounds.push((Some(*combinator), compound));
    }

    let mut generator: Generator<T> = Generator::Single(Some(element.clone()));

    for (i, (combinator, compound)) in compounds.iter().enumerate().rev() {
        let mut matched: Option<T> = None;
        for candidate in generator {
            if compound_matches(compound, &candidate) {
                matched = Some(candidate);
                break;
            }
        }
        let Some(matched) = matched else { return None };

        if i == 0 {
            return Some(crate::css::selector::specificity_of_complex(selector));
        }

        generator = match combinator.expect("non-leftmost compound always has a combinator") {
            Combinator::Descendant => Generator::Ancestors(Some(matched)),
            Combinator::Child => Generator::Single(matched.parent()),
            Combinator::NextSibling => Generator::Single(matched.previous_sibling()),
            Combinator::SubsequentSibling => Generator::PreviousSiblings(Some(matched)),
            Combinator::Column => return None,
        };
    }

    None
}

fn compound_matches<T: ElementLike>(compound: &CompoundSelector, element: &T) -> bool {
    compound.simple_selectors.iter().all(|s| simple_matches(s, element))
}

fn simple_matches<T: ElementLike>(simple: &SimpleSelector, element: &T) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(name) => element.type_string().eq_ignore_ascii_case(name),
        SimpleSelector::Id(name) => element.id() == name,
        SimpleSelector::Class(name) => element.class_name().split_ascii_whitespace().any(|c| c == name),
        SimpleSelector::Attribute(attr) => match element.get_attribute(&attr.name) {
            None => false,
            Some(value) => attr_matches(attr, value),
        },
        SimpleSelector::PseudoClass(pc) => pseudo_class_matches(pc, element),
    }
}

fn attr_matches(attr: &crate::css::selector::AttributeSelector, value: &str) -> bool {
    if matches!(attr.matcher, AttrMatcher::Exists) {
        return true;
    }
    let (value, target): (std::borrow::Cow<str>, std::borrow::Cow<str>) = if attr.case_insensitive {
        (value.to_ascii_lowercase().into(), attr.value.to_ascii_lowercase().into())
    } else {
        (value.into(), attr.value.as_str().into())
    };
    match attr.matcher {
        AttrMatcher::Exists => true,
        AttrMatcher::Equals => value == target,
        AttrMatcher::Includes => value.split_ascii_whitespace().any(|w| w == target),
        AttrMatcher::DashMatch => {
            value == target || value.starts_with(&format!("{}-", target))
        }
        AttrMatcher::Prefix => value.starts_with(target.as_ref()),
        AttrMatcher::Suffix => value.ends_with(target.as_ref()),
        AttrMatcher::Substring => value.contains(target.as_ref()),
    }
}

fn pseudo_class_matches<T: ElementLike>(pc: &PseudoClass, element: &T) -> bool {
    match pc {
        PseudoClass::Root => element.parent().is_none(),
        PseudoClass::Empty => element.first_child().is_none(),
        PseudoClass::FirstChild => element.previous_sibling().is_none(),
        PseudoClass::LastChild => element.next_sibling().is_none(),
        PseudoClass::OnlyChild => element.previous_sibling().is_none() && element.next_sibling().is_none(),
        PseudoClass::FirstOfType => {
            index_of_type(element, false).map(|i| i == 1).unwrap_or(false)
        }
        PseudoClass::LastOfType => index_of_type(element, true).map(|i| i == 1).unwrap_or(false),
        PseudoClass::OnlyOfType => {
            index_of_type(element, false) == Some(1) && index_of_type(element, true) == Some(1)
        }
        PseudoClass::NthChild(anb, of) => nth_matches(element, anb, of.as_deref(), false),
        PseudoClass::NthLastChild(anb, of) => nth_matches(element, anb, of.as_deref(), true),
        PseudoClass::NthOfType(anb) => index_of_type(element, false)
            .map(|i| anb.matches(i as i32))
            .unwrap_or(false),
        PseudoClass::NthLastOfType(anb) => index_of_type(element, true)
            .map(|i| anb.matches(i as i32))
            .unwrap_or(false),
        PseudoClass::Not(list) => matches_selector_list(list, element).is_none(),
        PseudoClass::Is(list) | PseudoClass::Where(list) => matches_selector_list(list, element).is_some(),
    }
}

/// 1-based index of `element` among its parent's children, counting only
/// children that satisfy `filter` when present (the "of selector" restriction
/// on `:nth-child`/`:nth-last-child`). Returns `None` if `element` itself
/// doesn't pass `filter`, or has no parent.
fn indexed_siblings<T: ElementLike>(
    element: &T,
    from_end: bool,
    filter: &dyn Fn(&T) -> bool,
) -> Option<usize> {
    let parent = element.parent()?;
    let mut cursor = if from_end { parent.last_child() } else { parent.first_child() };
    let mut index = 1;
    while let Some(candidate) = cursor {
        if filter(&candidate) {
            if candidate == *element {
                return Some(index);
            }
            index += 1;
        }
        cursor = if from_end { candidate.previous_sibling() } else { candidate.next_sibling() };
    }
    None
}

fn index_of_type<T: ElementLike>(element: &T, from_end: bool) -> Option<usize> {
    let type_name = element.type_string().to_string();
    indexed_siblings(element, from_end, &|c: &T| c.type_string().eq_ignore_ascii_case(&type_name))
}

fn nth_matches<T: ElementLike>(
    element: &T,
    anb: &AnbValue,
    of: Option<&[ComplexSelector]>,
    from_end: bool,
) -> bool {
    if let Some(of) = of {
        if matches_selector_list(of, element).is_none() {
            return false;
        }
    }
    let filter: Box<dyn Fn(&T) -> bool> = match of {
        Some(of) => {
            let of = of.to_vec();
            Box::new(move |c: &T| matches_selector_list(&of, c).is_some())
        }
        None => Box::new(|_: &T| true),
    };
    match indexed_siblings(element, from_end, filter.as_ref()) {
        Some(index) => anb.matches(index as i32),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::selector::parse_selector_list;
    use crate::store::TypeTag;

    fn store_with_mid_and_ab_children() -> (Store, Vec<ElementId>) {
        let mut store = Store::new();
        let root = store.create(TypeTag::Svg);
        let mid = store.create(TypeTag::G);
        store.append_child(root, mid).unwrap();
        let mut kids = Vec::new();
        for i in 0..8 {
            let tag = if i % 2 == 0 { TypeTag::Circle } else { TypeTag::Rect };
            let child = store.create(tag);
            store.append_child(mid, child).unwrap();
            kids.push(child);
        }
        (store, kids)
    }

    #[test]
    fn type_and_class_match() {
        let mut store = Store::new();
        let e = store.create(TypeTag::Circle);
        store.get_mut(e).class = "foo bar".into();
        let sel = parse_selector_list("circle.foo").unwrap();
        let cur = StoreElement::new(&store, e);
        assert!(matches_selector_list(&sel, &cur).is_some());
    }

    #[test]
    fn descendant_combinator_walks_ancestors() {
        let mut store = Store::new();
        let root = store.create(TypeTag::Svg);
        let g = store.create(TypeTag::G);
        let c = store.create(TypeTag::Circle);
        store.append_child(root, g).unwrap();
        store.append_child(g, c).unwrap();
        let sel = parse_selector_list("svg circle").unwrap();
        let cur = StoreElement::new(&store, c);
        assert!(matches_selector_list(&sel, &cur).is_some());
    }

    #[test]
    fn child_combinator_rejects_grandparent() {
        let mut store = Store::new();
        let root = store.create(TypeTag::Svg);
        let g = store.create(TypeTag::G);
        let c = store.create(TypeTag::Circle);
        store.append_child(root, g).unwrap();
        store.append_child(g, c).unwrap();
        let sel = parse_selector_list("svg > circle").unwrap();
        let cur = StoreElement::new(&store, c);
        assert!(matches_selector_list(&sel, &cur).is_none());
    }

    #[test]
    fn nth_child_of_type_filters_then_indexes() {
        // `:nth-child(2n of a)` on
        // <a/><b/><a/><b/><a/><b/><a/><b/> matches the 2nd and 4th <a>.
        let (store, kids) = store_with_mid_and_ab_children();
        let sel = parse_selector_list(":nth-child(2n of circle)").unwrap();
        let matched: Vec<bool> = kids
            .iter()
            .map(|id| matches_selector_list(&sel, &StoreElement::new(&store, *id)).is_some())
            .collect();
        // circles are at indices 0,2,4,6 (1-based child positions among circles: 1,2,3,4)
        assert!(!matched[0]); // 1st circle
        assert!(matched[2]); // 2nd circle
        assert!(!matched[4]); // 3rd circle
        assert!(matched[6]); // 4th circle
        assert!(!matched[1] && !matched[3] && !matched[5] && !matched[7]); // rects never match
    }

    #[test]
    fn nth_child_zero_n_zero_matches_nothing() {
        let mut store = Store::new();
        let parent = store.create(TypeTag::G);
        let a = store.create(TypeTag::Rect);
        store.append_child(parent, a).unwrap();
        let sel = parse_selector_list(":nth-child(0n+0)").unwrap();
        assert!(matches_selector_list(&sel, &StoreElement::new(&store, a)).is_none());
    }

    #[test]
    fn root_pseudo_class() {
        let mut store = Store::new();
        let root = store.create(TypeTag::Svg);
        let sel = parse_selector_list(":root").unwrap();
        assert!(matches_selector_list(&sel, &StoreElement::new(&store, root)).is_some());
    }

    #[test]
    fn column_combinator_never_matches() {
        let mut store = Store::new();
        let root = store.create(TypeTag::Svg);
        let c = store.create(TypeTag::Circle);
        store.append_child(root, c).unwrap();
        let sel = parse_selector_list("svg || circle").unwrap();
        assert!(matches_selector_list(&sel, &StoreElement::new(&store, c)).is_none());
    }

    #[test]
    fn matching_is_pure_and_repeatable() {
        let mut store = Store::new();
        let e = store.create(TypeTag::Rect);
        let sel = parse_selector_list("rect").unwrap();
        let cur = StoreElement::new(&store, e);
        let a = matches_selector_list(&sel, &cur);
        let b = matches_selector_list(&sel, &cur);
        assert_eq!(a.is_some(), b.is_some());
    }
}
