use crate::tokenizer::{Token, TokenType};
use squish_shared::byte_stream::Location;
use squish_shared::errors::{CssError, CssResult};

mod anplusb;
mod at_rule;
mod block;
mod declaration;
mod function;
mod selector;
mod stylesheet;
mod value;

/// Recursive-descent CSS parser over a pre-tokenized stream. The cursor
/// supports whitespace-skipping lookahead and a remember/restore stack for
/// backtracking productions.
pub struct CssParser {
    tokens: Vec<Token>,
    position: usize,
    saved: Vec<usize>,
    file_name: String,
}

impl CssParser {
    #[must_use]
    pub fn new(tokens: Vec<Token>, file_name: &str) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| &t.token_type),
            Some(TokenType::Eof)
        ));

        Self {
            tokens,
            position: 0,
            saved: Vec::new(),
            file_name: file_name.to_string(),
        }
    }

    /// The token under the cursor. Past the end this is the `Eof` token.
    pub(crate) fn current(&self) -> &Token {
        let idx = self.position.min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    /// One token ahead of the cursor
    pub(crate) fn next_token(&self) -> &Token {
        self.peek(1)
    }

    pub(crate) fn peek(&self, offset: usize) -> &Token {
        let idx = (self.position + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    /// The token before the cursor, used for whitespace-sensitive grammar
    /// like the attribute selector's `i` flag
    pub(crate) fn prev_token(&self) -> &Token {
        if self.position == 0 {
            return &self.tokens[self.tokens.len() - 1];
        }
        &self.tokens[self.position - 1]
    }

    /// Advances one token
    pub(crate) fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    /// Skips whitespace under the cursor
    pub(crate) fn skip_whitespace(&mut self) {
        while self.current().is_whitespace() {
            self.advance();
        }
    }

    /// Advances one token and skips any whitespace after it
    pub(crate) fn advance_skip_ws(&mut self) {
        self.advance();
        self.skip_whitespace();
    }

    /// Pushes the current position for later backtracking
    pub(crate) fn remember(&mut self) {
        self.saved.push(self.position);
    }

    /// Backtracks to the last remembered position
    pub(crate) fn restore(&mut self) {
        if let Some(position) = self.saved.pop() {
            self.position = position;
        }
    }

    /// Drops the last remembered position without backtracking
    pub(crate) fn forget(&mut self) {
        self.saved.pop();
    }

    pub(crate) fn current_location(&self) -> Location {
        self.current().location
    }

    /// A fatal parse error citing the unexpected token, its position and the
    /// file name
    pub(crate) fn parse_error(&self, message: &str) -> CssError {
        let token = self.current();

        let mut text = if token.is_eof() {
            "Parse error".to_string()
        } else {
            format!("Unexpected token '{token}'")
        };

        if !self.file_name.is_empty() {
            text.push_str(&format!(" in file '{}'", self.file_name));
        }
        if !message.is_empty() {
            text.push_str(&format!(". {message}"));
        }

        CssError::with_location(text.as_str(), token.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{
        BlockKind, CombinatorKind, IdentValue, Node, NodeType, SelectorKind,
    };
    use crate::tokenizer::{Tokenizer, TokenizerOptions};

    fn parser(input: &str) -> CssParser {
        let tokens =
            Tokenizer::tokenize_str(input, Location::default(), TokenizerOptions::default())
                .unwrap();
        CssParser::new(tokens, "test.css")
    }

    fn parse(input: &str) -> crate::node::Node {
        parser(input).parse_stylesheet().expect("parse error")
    }

    #[test]
    fn cursor_lookahead_and_backtracking() {
        let mut p = parser("a b c");

        assert!(p.current().has_content("a"));
        assert!(p.next_token().is_whitespace());

        p.remember();
        p.advance_skip_ws();
        assert!(p.current().has_content("b"));
        p.restore();
        assert!(p.current().has_content("a"));

        p.remember();
        p.advance_skip_ws();
        p.forget();
        assert!(p.current().has_content("b"));
    }

    #[test]
    fn cursor_stops_at_eof() {
        let mut p = parser("a");
        for _ in 0..10 {
            p.advance();
        }
        assert!(p.current().is_eof());
    }

    #[test]
    fn error_carries_token_and_file() {
        let p = parser("@media");
        let err = p.parse_error("Expected '{'");
        let text = err.to_string();

        assert!(text.contains("'@media'"));
        assert!(text.contains("test.css"));
        assert!(text.contains("Expected '{'"));
        assert!(text.contains("row 1 column 1"));
    }

    #[test]
    fn combinators_build_a_left_associative_tree() {
        let sheet = parse("a > b + c ~ d e { color: red; }");
        let (_, elements) = sheet.as_block();

        let NodeType::QualifiedRule { selectors, .. } = &*elements[0].node_type else {
            panic!("expected qualified rule");
        };
        assert_eq!(selectors.len(), 1);

        // Root-down: descendancy, subsequent-sibling, next-sibling, child
        let NodeType::SelectorCombinator { kind, left, .. } = &*selectors[0].node_type else {
            panic!("expected combinator");
        };
        assert_eq!(*kind, CombinatorKind::Descendancy);

        let NodeType::SelectorCombinator { kind, left, .. } = &*left.node_type else {
            panic!("expected combinator");
        };
        assert_eq!(*kind, CombinatorKind::SubsequentSibling);

        let NodeType::SelectorCombinator { kind, left, .. } = &*left.node_type else {
            panic!("expected combinator");
        };
        assert_eq!(*kind, CombinatorKind::NextSibling);

        let NodeType::SelectorCombinator { kind, left, right } = &*left.node_type else {
            panic!("expected combinator");
        };
        assert_eq!(*kind, CombinatorKind::Child);
        assert!(left.is_selector_chain());
        assert!(right.is_selector_chain());
    }

    #[test]
    fn compound_selectors_get_an_implicit_universal_head() {
        let sheet = parse(".btn#go:hover { color: red; }");
        let (_, elements) = sheet.as_block();

        let NodeType::QualifiedRule { selectors, .. } = &*elements[0].node_type else {
            panic!("expected qualified rule");
        };
        let NodeType::SelectorChain { parts } = &*selectors[0].node_type else {
            panic!("expected chain");
        };

        assert_eq!(parts.len(), 4);
        assert!(parts[0].is_selector_kind(SelectorKind::Universal));
        assert!(parts[1].is_selector_kind(SelectorKind::Class));
        assert!(parts[2].is_selector_kind(SelectorKind::Id));
        assert!(parts[3].is_selector_kind(SelectorKind::PseudoClass));
    }

    #[test]
    fn declarations_with_important_and_custom_properties() {
        let sheet = parse(":root { --pad: 4px; margin: 0 !important; width: 10px !ie; }");
        let (_, elements) = sheet.as_block();

        let NodeType::QualifiedRule { block: Some(block), .. } = &*elements[0].node_type else {
            panic!("expected rule with block");
        };
        let (_, declarations) = block.as_block();
        assert_eq!(declarations.len(), 3);

        let NodeType::Declaration { property, .. } = &*declarations[0].node_type else {
            panic!("expected declaration");
        };
        assert!(property.is_custom_property());

        let NodeType::Declaration { important, .. } = &*declarations[1].node_type else {
            panic!("expected declaration");
        };
        assert!(important);

        let NodeType::Declaration { hack, .. } = &*declarations[2].node_type else {
            panic!("expected declaration");
        };
        assert_eq!(hack.as_deref(), Some("ie"));
    }

    #[test]
    fn at_rules_parse_with_vendor_prefixes() {
        let sheet = parse("@-webkit-keyframes spin { from { left: 0; } }");
        let (_, elements) = sheet.as_block();

        let NodeType::AtRule { keyword, expressions, block } = &*elements[0].node_type else {
            panic!("expected at-rule");
        };
        assert_eq!(keyword, "-webkit-keyframes");
        assert!(expressions[0][0].is_ident_value("spin"));
        assert!(block.is_some());
    }

    #[test]
    fn nth_child_of_selector() {
        let sheet = parse("li:nth-child(2n+1 of .big) { color: red; }");
        let (_, elements) = sheet.as_block();

        let NodeType::QualifiedRule { selectors, .. } = &*elements[0].node_type else {
            panic!("expected qualified rule");
        };
        let NodeType::SelectorChain { parts } = &*selectors[0].node_type else {
            panic!("expected chain");
        };
        let NodeType::Selector { kind, subs, .. } = &*parts[1].node_type else {
            panic!("expected pseudo class");
        };
        assert_eq!(*kind, SelectorKind::PseudoClass);

        let NodeType::Selector { kind, name, subs } = &*subs[0].node_type else {
            panic!("expected An+B selector");
        };
        assert_eq!(*kind, SelectorKind::AnPlusB);
        assert_eq!(name, &IdentValue::literal("2n+1"));
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn attribute_selector_operations() {
        let sheet = parse("a[href^=\"https\" i][target] { color: red; }");
        let (_, elements) = sheet.as_block();

        let NodeType::QualifiedRule { selectors, .. } = &*elements[0].node_type else {
            panic!("expected qualified rule");
        };
        let NodeType::SelectorChain { parts } = &*selectors[0].node_type else {
            panic!("expected chain");
        };

        let NodeType::SelectorAttribute { name, value, operation, insensitive } =
            &*parts[1].node_type
        else {
            panic!("expected attribute selector");
        };
        assert_eq!(name, "href");
        assert_eq!(value, "https");
        assert_eq!(operation.as_str(), "^=");
        assert!(insensitive);

        let NodeType::SelectorAttribute { name, value, .. } = &*parts[2].node_type else {
            panic!("expected attribute selector");
        };
        assert_eq!(name, "target");
        assert!(value.is_empty());
    }

    #[test]
    fn style_attribute_mode_returns_declarations_only() {
        let mut p = parser("color: red; margin: 0");
        let sheet = p.parse_style_attribute().unwrap();

        let (kind, elements) = sheet.as_block();
        assert_eq!(*kind, BlockKind::Stylesheet);
        assert_eq!(elements.len(), 2);
        assert!(elements.iter().all(Node::is_declaration));
    }

    #[test]
    fn invalid_hex_color_is_fatal() {
        let err = parser("a { color: #ff00; }").parse_stylesheet().unwrap_err();
        assert!(err.message.contains("Invalid hex color"));

        let err = parser("a { color: #ggg; }").parse_stylesheet().unwrap_err();
        assert!(err.message.contains("Invalid hex color"));
    }

    #[test]
    fn unknown_at_rule_is_fatal() {
        assert!(parser("@frobnicate x { }").parse_stylesheet().is_err());
    }

    #[test]
    fn unexpected_token_reports_position() {
        let err = parser("a { color: red; }\n}").parse_stylesheet().unwrap_err();
        let location = err.location.expect("location");
        assert_eq!(location.line(), 2);
        assert_eq!(location.column(), 1);
    }

    #[test]
    fn filter_progid_is_preserved_verbatim() {
        let sheet = parse("a { filter: progid:DXImageTransform.Microsoft.gradient(enabled=false); }");
        let (_, elements) = sheet.as_block();

        let NodeType::QualifiedRule { block: Some(block), .. } = &*elements[0].node_type else {
            panic!("expected rule");
        };
        let (_, declarations) = block.as_block();
        let NodeType::Declaration { values, .. } = &*declarations[0].node_type else {
            panic!("expected declaration");
        };

        let effective = values[0][0].effective();
        assert!(effective.is_string());
        assert!(effective.as_string().starts_with("progid:"));
    }
}
