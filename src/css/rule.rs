//! At-rule/qualified-rule parsing and the `Stylesheet` type. Only
//! qualified rules (`selector { declarations }`) carry through to the
//! cascade; at-rules (`@media`, `@import`, ...) are recognized only well
//! enough to be skipped without corrupting the rest of the sheet —
//! conditional/imported stylesheets are out of scope.

use crate::css::component::{BlockKind, ComponentValue, ComponentValueParser, SimpleBlock};
use crate::css::declaration::{parse_declaration_list_from_values, Declaration};
use crate::css::selector::{parse_selector_list_from_values, ComplexSelector};
use crate::css::token::TokenKind;
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selectors: Vec<ComplexSelector>,
    pub declarations: Vec<Declaration>,
    /// Position of this rule within the stylesheet, used as the cascade
    /// tie-breaker when specificity is equal.
    pub source_order: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    pub rules: Vec<StyleRule>,
}

/// Parses a full stylesheet (the contents of a `<style>` element), tolerating
/// unsupported at-rules and malformed rules by skipping them.
pub fn parse_stylesheet(input: &str) -> (Stylesheet, Vec<ParseError>) {
    let mut parser = ComponentValueParser::new(input);
    let mut rules = Vec::new();
    let mut errors = Vec::new();
    let mut prelude: Vec<ComponentValue> = Vec::new();

    while let Some(cv) = parser.next_component_value() {
        if matches!(cv, ComponentValue::Token(ref t) if matches!(t.kind, TokenKind::Cdo | TokenKind::Cdc)) {
            continue;
        }
        if prelude.is_empty()
            && matches!(cv, ComponentValue::Token(ref t) if matches!(t.kind, TokenKind::AtKeyword(_)))
        {
            discard_at_rule(&mut parser);
            continue;
        }
        match cv {
            ComponentValue::Block(ref b) if b.kind == BlockKind::Curly => {
                match build_style_rule(&prelude, b, rules.len()) {
                    Ok(rule) => rules.push(rule),
                    Err(e) => errors.push(e),
                }
                prelude.clear();
            }
            other => prelude.push(other),
        }
    }

    (Stylesheet { rules }, errors)
}

/// Consumes an at-rule's prelude and, if present, its `{}` block (or the
/// terminating `;` for a statement at-rule), discarding all of it.
fn discard_at_rule(parser: &mut ComponentValueParser) {
    loop {
        match parser.next_component_value() {
            None => break,
            Some(ComponentValue::Token(t)) if matches!(t.kind, TokenKind::Semicolon) => break,
            Some(ComponentValue::Block(b)) if b.kind == BlockKind::Curly => break,
            Some(_) => continue,
        }
    }
}

fn build_style_rule(
    prelude: &[ComponentValue],
    body: &SimpleBlock,
    source_order: usize,
) -> Result<StyleRule, ParseError> {
    let prelude_trimmed: Vec<ComponentValue> =
        prelude.iter().filter(|v| !v.is_whitespace()).cloned().collect();
    let selectors = parse_selector_list_from_values(&prelude_trimmed)?;
    let (declarations, _decl_errors) = parse_declaration_list_from_values(&body.values);
    Ok(StyleRule { selectors, declarations, source_order })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_qualified_rule() {
        let (sheet, errs) = parse_stylesheet("rect { fill: red; stroke-width: 2 }");
        assert!(errs.is_empty());
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].declarations.len(), 2);
    }

    #[test]
    fn multiple_rules_get_source_order() {
        let (sheet, _) = parse_stylesheet("rect { fill: red } circle { fill: blue }");
        assert_eq!(sheet.rules[0].source_order, 0);
        assert_eq!(sheet.rules[1].source_order, 1);
    }

    #[test]
    fn at_rule_is_skipped_without_corrupting_later_rules() {
        let (sheet, _) = parse_stylesheet("@media screen { rect { fill: red } } circle { fill: blue }");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].name, "fill");
    }

    #[test]
    fn statement_at_rule_is_skipped() {
        let (sheet, _) = parse_stylesheet("@import url(foo.css); rect { fill: red }");
        assert_eq!(sheet.rules.len(), 1);
    }

    #[test]
    fn malformed_selector_drops_only_that_rule() {
        let (sheet, errs) = parse_stylesheet("> bad { fill: red } circle { fill: blue }");
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn grouped_selector_list_in_one_rule() {
        let (sheet, _) = parse_stylesheet("rect, circle { fill: red }");
        assert_eq!(sheet.rules[0].selectors.len(), 2);
    }
}
