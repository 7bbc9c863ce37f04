//! The CSS engine: tokenizer (C1), component-value builder (C2), and the
//! grammar built on top of it (C3) — lengths, colors, paints, selectors,
//! declarations, and stylesheets.

pub mod anb;
pub mod color;
pub mod component;
pub mod declaration;
pub mod length;
pub mod paint;
pub mod rule;
pub mod selector;
pub mod token;
pub mod value;

pub use anb::AnbValue;
pub use color::Color;
pub use component::ComponentValue;
pub use declaration::Declaration;
pub use length::{Length, LengthUnit};
pub use paint::Paint;
pub use rule::{StyleRule, Stylesheet};
pub use selector::{ComplexSelector, Specificity};
pub use token::{Token, TokenKind};
