use crate::node::{BlockKind, Node, NodeType};
use crate::parser::CssParser;
use squish_shared::errors::CssResult;

impl CssParser {
    /// `{ … }` holding a declaration list or a value sequence
    pub fn parse_curly_block(&mut self) -> CssResult<Option<Node>> {
        log::trace!("parse_curly_block");

        if !self.current().is_punctuator('{') {
            return Ok(None);
        }

        let loc = self.current_location();
        self.advance_skip_ws();

        let elements = self.parse_block_elements()?;

        if !self.current().is_punctuator('}') {
            return Err(self.parse_error("Missing '}'"));
        }
        self.advance_skip_ws();

        Ok(Some(Node::new(
            NodeType::Block {
                kind: BlockKind::Curly,
                elements,
            },
            loc,
        )))
    }

    /// `( … )` as it occurs in media queries and supports conditions: either
    /// a single declaration (`(min-width: 600px)`), or nested blocks and
    /// values (`((a) or (b))`).
    pub fn parse_paren_block(&mut self) -> CssResult<Option<Node>> {
        log::trace!("parse_paren_block");

        if !self.current().is_punctuator('(') {
            return Ok(None);
        }

        let loc = self.current_location();
        self.advance_skip_ws();

        let mut elements = Vec::new();

        if let Some(declaration) = self.parse_declaration()? {
            elements.push(declaration);
        } else {
            loop {
                if let Some(block) = self.parse_paren_block()? {
                    elements.push(block);
                    continue;
                }
                if let Some(value) = self.parse_value()? {
                    elements.push(value);
                    continue;
                }
                break;
            }
        }

        if !self.current().is_punctuator(')') {
            return Err(self.parse_error("Missing ')'"));
        }
        self.advance_skip_ws();

        Ok(Some(Node::new(
            NodeType::Block {
                kind: BlockKind::Paren,
                elements,
            },
            loc,
        )))
    }

    /// `[ … ]` in a value position
    pub fn parse_square_block(&mut self) -> CssResult<Option<Node>> {
        log::trace!("parse_square_block");

        if !self.current().is_punctuator('[') {
            return Ok(None);
        }

        let loc = self.current_location();
        self.advance_skip_ws();

        let mut elements = Vec::new();
        while let Some(value) = self.parse_value()? {
            elements.push(value);
        }

        if !self.current().is_punctuator(']') {
            return Err(self.parse_error("Missing ']'"));
        }
        self.advance_skip_ws();

        Ok(Some(Node::new(
            NodeType::Block {
                kind: BlockKind::Square,
                elements,
            },
            loc,
        )))
    }

    /// The contents of a curly block: a declaration list when one is
    /// present, otherwise a plain value sequence.
    pub(crate) fn parse_block_elements(&mut self) -> CssResult<Vec<Node>> {
        if let Some(declarations) = self.parse_declaration_list()? {
            return Ok(declarations);
        }

        let mut elements = Vec::new();
        loop {
            if let Some(block) = self.parse_paren_block()? {
                elements.push(block);
                continue;
            }
            if let Some(value) = self.parse_value()? {
                elements.push(value);
                continue;
            }
            break;
        }

        Ok(elements)
    }
}
