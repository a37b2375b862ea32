//! Tolerant stylesheet reader built on `cssparser`.
//!
//! Invalid rules and unsupported constructs (e.g. at-rules nested inside
//! at-rule blocks) are skipped rather than reported; the transform layer
//! owns diagnostics.

use crate::{AtRule, Declaration, Node, Position, Rule, Stylesheet};
use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::BasicParseErrorKind;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::StyleSheetParser;

/// Parse `!important` at the end of a value, returning (`value_without_important`, `important_flag`).
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    if let Some(pos) = trimmed.rfind("!important")
        && let Some(prefix) = trimmed.get(..pos)
    {
        let head = prefix.trim_end();
        return (head.to_owned(), true);
    }
    (trimmed.to_owned(), false)
}

/// A declaration parser that records property name and its raw value.
struct BodyDeclParser;

impl CssDeclarationParser<'_> for BodyDeclParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'input>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
        _decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'input, Self::Error>> {
        let start = input.position();
        // Consume until end of the declaration item.
        while input.next_including_whitespace_and_comments().is_ok() {}
        let raw = input.slice_from(start);
        let (value, important) = split_important_tail(raw);
        Ok(Declaration {
            name: name.to_ascii_lowercase(),
            value,
            important,
        })
    }
}

impl CssAtRuleParser<'_> for BodyDeclParser {
    type Prelude = ();
    type AtRule = Declaration; // Not produced
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        _name: CowRcStr<'input>,
        _input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Ok(())
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        // Not produced by this parser
        Err(input.new_error(BasicParseErrorKind::AtRuleBodyInvalid))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        Err(())
    }
}

impl CssQualifiedRuleParser<'_> for BodyDeclParser {
    type Prelude = ();
    type QualifiedRule = Declaration; // Not produced
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }
}

impl CssRuleBodyItemParser<'_, Declaration, ()> for BodyDeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Parse declarations from a rule block using the `cssparser` body parser.
fn parse_declarations_from_block(block: &mut Parser) -> Vec<Declaration> {
    let mut out: Vec<Declaration> = Vec::new();
    let mut body = BodyDeclParser;
    for decl in CssRuleBodyParser::new(block, &mut body).flatten() {
        out.push(decl);
    }
    out
}

/// A rule parser for the interior of an at-rule block: style rules only,
/// nested at-rules are rejected (and therefore skipped).
struct BlockRuleParser;

impl CssDeclarationParser<'_> for BlockRuleParser {
    type Declaration = Rule; // Not produced
    type Error = ();

    #[inline]
    fn parse_value<'input>(
        &mut self,
        _name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
        _decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'input, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }
}

impl CssAtRuleParser<'_> for BlockRuleParser {
    type Prelude = ();
    type AtRule = Rule; // Not produced
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        _name: CowRcStr<'input>,
        _input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Ok(())
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        // One nesting level only
        Err(input.new_error(BasicParseErrorKind::AtRuleBodyInvalid))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        Err(())
    }
}

impl CssQualifiedRuleParser<'_> for BlockRuleParser {
    type Prelude = (String, Position);
    type QualifiedRule = Rule;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        let position = Position::from(input.current_source_location());
        let start = input.state();
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok((
            input.slice_from(start.position()).trim().to_owned(),
            position,
        ))
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        let (selector, position) = prelude;
        Ok(Rule {
            selector,
            declarations: parse_declarations_from_block(input),
            position,
        })
    }
}

impl CssRuleBodyItemParser<'_, Rule, ()> for BlockRuleParser {
    fn parse_declarations(&self) -> bool {
        false
    }
    fn parse_qualified(&self) -> bool {
        true
    }
}

/// Parse the style rules inside an at-rule block.
fn parse_rules_from_block(block: &mut Parser) -> Vec<Rule> {
    let mut out: Vec<Rule> = Vec::new();
    let mut body = BlockRuleParser;
    for rule in CssRuleBodyParser::new(block, &mut body).flatten() {
        out.push(rule);
    }
    out
}

/// Top-level parser that builds `Node` items for qualified rules and at-rules.
struct TopLevelParser;

impl CssAtRuleParser<'_> for TopLevelParser {
    type Prelude = (String, String);
    type AtRule = Node;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        let start = input.state();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let params = input.slice_from(start.position()).trim().to_owned();
        Ok((name.to_ascii_lowercase(), params))
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        let (name, params) = prelude;
        Ok(Node::AtRule(AtRule {
            name,
            params,
            rules: parse_rules_from_block(input),
        }))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        let (name, params) = prelude;
        Ok(Node::AtRule(AtRule {
            name,
            params,
            rules: Vec::new(),
        }))
    }
}

impl CssQualifiedRuleParser<'_> for TopLevelParser {
    type Prelude = (String, Position); // raw selector plus its source position
    type QualifiedRule = Node;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        let position = Position::from(input.current_source_location());
        let start = input.state();
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok((
            input.slice_from(start.position()).trim().to_owned(),
            position,
        ))
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        let (selector, position) = prelude;
        Ok(Node::Rule(Rule {
            selector,
            declarations: parse_declarations_from_block(input),
            position,
        }))
    }
}

/// Parse a full stylesheet into a `Stylesheet` using cssparser.
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut top = TopLevelParser;
    let mut sheet = Stylesheet::default();
    for node in StyleSheetParser::new(&mut parser, &mut top).flatten() {
        sheet.nodes.push(node);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_rule(sheet: &Stylesheet) -> &Rule {
        match sheet.nodes.first() {
            Some(Node::Rule(rule)) => rule,
            other => panic!("expected a style rule, got {other:?}"),
        }
    }

    #[test]
    fn parses_selector_and_declarations() {
        let sheet = parse_stylesheet(".foo, .bar {\n  font-size: 16px;\n  color: red;\n}\n");
        let rule = only_rule(&sheet);
        assert_eq!(rule.selector, ".foo, .bar");
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[0].name, "font-size");
        assert_eq!(rule.declarations[0].value, "16px");
        assert!(!rule.declarations[0].important);
    }

    #[test]
    fn lowercases_names_and_splits_important() {
        let sheet = parse_stylesheet(".foo { FONT-SIZE: 16px !important }");
        let rule = only_rule(&sheet);
        assert_eq!(rule.declarations[0].name, "font-size");
        assert_eq!(rule.declarations[0].value, "16px");
        assert!(rule.declarations[0].important);
    }

    #[test]
    fn records_rule_positions() {
        let sheet = parse_stylesheet("html {\n  font-size: 20px;\n}\n\n.foo {\n  color: red;\n}\n");
        let positions: Vec<Position> = sheet
            .nodes
            .iter()
            .filter_map(|node| match node {
                Node::Rule(rule) => Some(rule.position),
                Node::AtRule(_) => None,
            })
            .collect();
        assert_eq!(
            positions,
            vec![
                Position { line: 1, column: 1 },
                Position { line: 5, column: 1 }
            ]
        );
    }

    #[test]
    fn parses_media_block_one_level_deep() {
        let css = "@media screen and (max-width: 420px) {\n  .foo {\n    font-size: 12px;\n  }\n}\n";
        let sheet = parse_stylesheet(css);
        let Some(Node::AtRule(media)) = sheet.nodes.first() else {
            panic!("expected an at-rule");
        };
        assert_eq!(media.name, "media");
        assert_eq!(media.params, "screen and (max-width: 420px)");
        assert_eq!(media.rules.len(), 1);
        assert_eq!(media.rules[0].selector, ".foo");
        assert_eq!(media.rules[0].declarations[0].value, "12px");
    }

    /// Serialization is the inverse of parsing for already-normalized text.
    #[test]
    fn serializes_back_to_normalized_text() {
        let css = ".foo {\n  font-size: 16px;\n}\n\n@media screen and (min-width: 1280px) {\n  .foo {\n    font-size: 21px;\n  }\n}\n";
        let sheet = parse_stylesheet(css);
        assert_eq!(sheet.to_css_string(), css);
    }

    #[test]
    fn normalizes_messy_whitespace() {
        let sheet = parse_stylesheet(".foo{color:red;font-size:16px}");
        assert_eq!(
            sheet.to_css_string(),
            ".foo {\n  color: red;\n  font-size: 16px;\n}\n"
        );
    }
}
