//! A styled SVG document core: XML ingest, the CSS cascade, and selector
//! matching over a flat, entity-indexed element tree.
//!
//! This crate does not render or rasterize anything; it owns the part of
//! an SVG engine between "bytes of markup" and "every element's final,
//! cascaded property values" — the part a renderer, a DOM-manipulation
//! tool, or a static analyzer all need in common.
//!
//! # Basic usage
//!
//! ```
//! use svg_style_core::{load, LoadOptions};
//!
//! let (document, warnings) = load(
//!     r#"<svg><style>circle { fill: blue; }</style><circle r="5"/></svg>"#,
//!     LoadOptions::default(),
//! ).unwrap();
//! assert!(warnings.is_empty());
//! let circle = document.query_selector("circle").unwrap().unwrap();
//! ```

#![warn(rust_2018_idioms)]

pub mod applier;
pub mod css;
pub mod dom;
pub mod error;
pub mod log;
pub mod matcher;
pub mod offset;
pub mod registry;
pub mod resource;
pub mod session;
pub mod store;
pub mod strings;
pub mod xml;

use std::rc::Rc;

pub use dom::{Document, Element};
pub use error::{LoadingError, ParseError, Warning};
pub use resource::ResourceLoader;
pub use xml::IngestOptions;

/// Ingest options plus a resource loader handle, the one configuration
/// object a caller builds before loading a document.
#[derive(Clone)]
pub struct LoadOptions {
    pub ingest: IngestOptions,
    pub resource_loader: Rc<dyn ResourceLoader>,
}

impl Default for LoadOptions {
    fn default() -> LoadOptions {
        LoadOptions { ingest: IngestOptions::default(), resource_loader: Rc::new(resource::NullResourceLoader) }
    }
}

/// Loads an SVG document end to end: XML ingest (C8) into a [`store::Store`],
/// then the cascade (C7) over every `<style>` stylesheet found in the tree,
/// wrapped in a [`Document`] facade (C9).
///
/// Returns every non-fatal [`Warning`] collected along the way; only
/// malformed XML or a missing/misnamespaced `<svg>` root is a hard
/// [`LoadingError`].
pub fn load(input: &str, options: LoadOptions) -> Result<(Document, Vec<Warning>), LoadingError> {
    let (mut store, root, warnings) = xml::parse_document(input, options.ingest)?;
    applier::apply_stylesheets(&mut store, root);
    Ok((Document::new(store, root), warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_cascades_a_minimal_document() {
        let (document, warnings) = load(
            r#"<svg><style>rect { fill: blue; }</style><rect fill="red" style="stroke: black"/></svg>"#,
            LoadOptions::default(),
        )
        .unwrap();
        assert!(warnings.is_empty());
        let rect = document.query_selector("rect").unwrap().unwrap();
        // stylesheet rank beats the presentation attribute.
        assert_eq!(
            rect.get_computed_property(registry::PropertyName::Fill),
            registry::PropertyValue::Paint(css::Paint::Color(css::Color::Rgba(css::color::Rgba::new(
                0, 0, 255, 255
            ))))
        );
    }

    #[test]
    fn malformed_xml_is_a_loading_error() {
        let result = load("<svg><rect", LoadOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn missing_svg_root_is_a_loading_error() {
        let result = load("<rect/>", LoadOptions::default());
        assert_eq!(result.unwrap_err(), LoadingError::NoSvgRoot);
    }
}
