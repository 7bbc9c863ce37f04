//! Error and warning types.
//!
//! Tokenization failures never propagate as Rust errors — they become
//! `bad-*`/error tokens that flow through as warnings. Only
//! syntax/semantic failures inside a single declaration, rule, or
//! presentation attribute are represented here, and even those are
//! non-fatal: they invalidate one declaration, one rule, or one attribute,
//! never the whole parse. The only fatal error kind is [`LoadingError`],
//! returned when the XML itself is malformed or has no `<svg>` root.

use std::error;
use std::fmt;

use crate::offset::FileOffset;

/// A non-fatal parse error, tied to the offset of the first token that
/// could not be consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub reason: String,
    pub offset: FileOffset,
}

impl ParseError {
    pub fn new(reason: impl Into<String>, offset: FileOffset) -> ParseError {
        ParseError {
            reason: reason.into(),
            offset,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.reason, self.offset)
    }
}

impl error::Error for ParseError {}

/// A non-fatal diagnostic surfaced from an ingest or query entry point.
///
/// A warning carries a `reason`, plus a resolved line and column offset;
/// an error has the same shape. Line/column are resolved lazily by the caller from the
/// `FileOffset` using a `LineColLookup` over the original input, so
/// building a `Warning` never requires rescanning the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub reason: String,
    pub offset: FileOffset,
}

impl From<ParseError> for Warning {
    fn from(e: ParseError) -> Warning {
        Warning {
            reason: e.reason,
            offset: e.offset,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.reason, self.offset)
    }
}

/// Errors that can happen while loading an SVG document.
///
/// All of these are unrecoverable: they keep a document from being fully
/// ingested at all. Everything else (bad CSS, an invalid presentation
/// attribute, an unknown element) degrades to a [`Warning`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadingError {
    /// The XML itself was not well-formed.
    XmlParseError(String),
    /// The document root was missing, or was not an `<svg>` element in the
    /// SVG namespace.
    NoSvgRoot,
    /// I/O error while reading a resource.
    Io(String),
    /// A requested path escaped the resource loader's sandbox root.
    SandboxViolation,
    /// A requested resource does not exist.
    NotFound,
}

impl fmt::Display for LoadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadingError::XmlParseError(s) => write!(f, "XML parse error: {}", s),
            LoadingError::NoSvgRoot => write!(f, "document has no <svg> root"),
            LoadingError::Io(s) => write!(f, "I/O error: {}", s),
            LoadingError::SandboxViolation => write!(f, "path is outside the sandbox root"),
            LoadingError::NotFound => write!(f, "resource not found"),
        }
    }
}

impl error::Error for LoadingError {}

/// The result of a resource fetch through [`crate::resource::ResourceLoader`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    NotFound,
    SandboxViolation,
}

impl From<ResourceError> for LoadingError {
    fn from(e: ResourceError) -> LoadingError {
        match e {
            ResourceError::NotFound => LoadingError::NotFound,
            ResourceError::SandboxViolation => LoadingError::SandboxViolation,
        }
    }
}
