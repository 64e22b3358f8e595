use crate::node::{BlockKind, CommentKind, Node, NodeType};
use crate::parser::CssParser;
use crate::tokenizer::TokenType;
use squish_shared::errors::CssResult;

impl CssParser {
    /// Top-level loop: at-rules, qualified rules and comments until EOF.
    pub fn parse_stylesheet(&mut self) -> CssResult<Node> {
        log::trace!("parse_stylesheet");

        let loc = self.current_location();
        let mut elements = Vec::new();

        self.skip_whitespace();

        while !self.current().is_eof() {
            if let Some(comment) = self.parse_comment()? {
                elements.push(comment);
                continue;
            }
            if let Some(at_rule) = self.parse_at_rule()? {
                elements.push(at_rule);
                continue;
            }
            if let Some(rule) = self.parse_qualified_rule()? {
                elements.push(rule);
                continue;
            }

            return Err(self.parse_error(""));
        }

        Ok(Node::new(
            NodeType::Block {
                kind: BlockKind::Stylesheet,
                elements,
            },
            loc,
        ))
    }

    /// Parses the value of a `style="…"` attribute: a declaration list
    /// without surrounding braces, returned as a stylesheet block.
    pub fn parse_style_attribute(&mut self) -> CssResult<Node> {
        log::trace!("parse_style_attribute");

        let loc = self.current_location();

        self.skip_whitespace();
        let elements = self.parse_declaration_list()?.unwrap_or_default();

        if !self.current().is_eof() {
            return Err(self.parse_error(""));
        }

        Ok(Node::new(
            NodeType::Block {
                kind: BlockKind::Stylesheet,
                elements,
            },
            loc,
        ))
    }

    /// A selector list followed by a curly block.
    pub fn parse_qualified_rule(&mut self) -> CssResult<Option<Node>> {
        log::trace!("parse_qualified_rule");

        let loc = self.current_location();

        let Some(selectors) = self.parse_selector_list()? else {
            return Ok(None);
        };

        if !self.current().is_punctuator('{') {
            return Err(self.parse_error("Expected '{'"));
        }

        let Some(block) = self.parse_curly_block()? else {
            return Err(self.parse_error(""));
        };

        Ok(Some(Node::new(
            NodeType::QualifiedRule {
                selectors,
                block: Some(Box::new(block)),
            },
            loc,
        )))
    }

    /// A comment or CDATA marker kept by the tokenizer
    pub fn parse_comment(&mut self) -> CssResult<Option<Node>> {
        let token = self.current().clone();

        let node_type = match &token.token_type {
            TokenType::Comment(value) => NodeType::Comment {
                kind: CommentKind::Comment,
                value: value.clone(),
            },
            TokenType::CdataStart => NodeType::Comment {
                kind: CommentKind::CdataStart,
                value: String::new(),
            },
            TokenType::CdataEnd => NodeType::Comment {
                kind: CommentKind::CdataEnd,
                value: String::new(),
            },
            _ => return Ok(None),
        };

        self.advance_skip_ws();

        Ok(Some(Node::new(node_type, token.location)))
    }
}
