//! A small reference-counted, copy-on-write string type.
//!
//! Attribute values and identifiers get copied around a lot while building
//! the element tree and the cascade (an id string is read by every selector
//! that has an id simple selector, a class string is split and scanned on
//! every class check, ...). Per the design note on reference-counted
//! strings, `SharedString` lets those copies share one allocation: cloning
//! bumps an `Rc` instead of copying bytes, and a substring view stays valid
//! as long as the owning buffer is alive.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

#[derive(Clone)]
pub struct SharedString {
    buf: Rc<str>,
    start: usize,
    end: usize,
}

impl SharedString {
    pub fn new(s: impl Into<Rc<str>>) -> SharedString {
        let buf: Rc<str> = s.into();
        let end = buf.len();
        SharedString { buf, start: 0, end }
    }

    /// Returns a view into `self`'s buffer for the given byte range.
    ///
    /// `start` and `end` are byte offsets relative to `self.as_str()`, and
    /// must land on UTF-8 boundaries.
    pub fn slice(&self, start: usize, end: usize) -> SharedString {
        assert!(start <= end && self.start + end <= self.end);
        SharedString {
            buf: self.buf.clone(),
            start: self.start + start,
            end: self.start + end,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf[self.start..self.end]
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Deref for SharedString {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for SharedString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for SharedString {
    fn from(s: &str) -> SharedString {
        SharedString::new(Rc::from(s))
    }
}

impl From<String> for SharedString {
    fn from(s: String) -> SharedString {
        SharedString::new(Rc::from(s.into_boxed_str()))
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl PartialEq for SharedString {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}
impl Eq for SharedString {}

impl PartialEq<str> for SharedString {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for SharedString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl std::hash::Hash for SharedString {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

/// Case-insensitive ASCII comparison, centralized here since selector unit
/// names, attribute `i` modifiers, and named colors all need it, and this
/// crate never needs full Unicode case folding.
pub fn ascii_ieq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

pub fn ascii_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_share_the_allocation() {
        let s = SharedString::from("hello world");
        let hello = s.slice(0, 5);
        let world = s.slice(6, 11);
        assert_eq!(hello.as_str(), "hello");
        assert_eq!(world.as_str(), "world");
        assert!(Rc::ptr_eq(&s.buf, &hello.buf));
    }

    #[test]
    fn ascii_ieq_ignores_case_only() {
        assert!(ascii_ieq("Px", "PX"));
        assert!(!ascii_ieq("a", "b"));
    }
}
