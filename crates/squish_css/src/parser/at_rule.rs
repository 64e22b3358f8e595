use crate::node::{BlockKind, IdentValue, Node, NodeType, SelectorKind};
use crate::parser::CssParser;
use crate::vendor;
use squish_shared::errors::CssResult;

impl CssParser {
    /// Dispatches on the (possibly vendor-prefixed) at-keyword under the
    /// cursor. An unrecognized keyword is a fatal parse error.
    pub fn parse_at_rule(&mut self) -> CssResult<Option<Node>> {
        if !self.current().is_at_keyword() {
            return Ok(None);
        }

        log::trace!("parse_at_rule");

        let keyword = self.current().content();

        let node = match vendor::unprefixed(&keyword) {
            "charset" => self.parse_at_rule_charset(&keyword)?,
            "import" => self.parse_at_rule_import(&keyword)?,
            "namespace" => self.parse_at_rule_namespace(&keyword)?,
            "media" => self.parse_at_rule_media(&keyword)?,
            "supports" => self.parse_at_rule_supports(&keyword)?,
            "keyframes" => self.parse_at_rule_keyframes(&keyword)?,
            "font-face" | "viewport" => self.parse_at_rule_declaration_block(&keyword)?,
            "counter-style" => self.parse_at_rule_counter_style(&keyword)?,
            "page" => self.parse_at_rule_page(&keyword)?,
            "document" => self.parse_at_rule_document(&keyword)?,
            _ => return Err(self.parse_error("Unknown at-rule")),
        };

        Ok(Some(node))
    }

    /// `@charset "encoding";`
    fn parse_at_rule_charset(&mut self, keyword: &str) -> CssResult<Node> {
        log::trace!("parse_at_rule_charset");

        let loc = self.current_location();
        self.advance_skip_ws();

        if !self.current().is_string() {
            return Err(self.parse_error("Expected charset string"));
        }

        let charset = Node::new(
            NodeType::String {
                value: self.current().content(),
                unquoted: false,
            },
            self.current_location(),
        );
        self.advance_skip_ws();

        if self.current().is_punctuator(';') {
            self.advance_skip_ws();
        }

        Ok(Node::new(
            NodeType::AtRule {
                keyword: keyword.to_string(),
                expressions: vec![vec![charset]],
                block: None,
            },
            loc,
        ))
    }

    /// `@import <string|url()> [supports(…)] [media-query-list] ;`
    ///
    /// The first expression of the first list is the import target itself;
    /// everything after it belongs to the media query list.
    fn parse_at_rule_import(&mut self, keyword: &str) -> CssResult<Node> {
        log::trace!("parse_at_rule_import");

        let loc = self.current_location();
        self.advance_skip_ws();

        let mut expressions: Vec<Vec<Node>> = Vec::new();
        let mut list = Vec::new();

        loop {
            if let Some(condition) = self.parse_supports_condition()? {
                list.push(condition);
                continue;
            }
            if let Some(value) = self.parse_value()? {
                list.push(value);
                continue;
            }
            if let Some(block) = self.parse_paren_block()? {
                list.push(block);
                continue;
            }

            if self.current().is_punctuator(',') {
                expressions.push(std::mem::take(&mut list));
                self.advance_skip_ws();
                continue;
            }

            break;
        }
        expressions.push(list);

        if expressions[0].is_empty() {
            return Err(self.parse_error("Expected import target"));
        }

        if self.current().is_punctuator(';') {
            self.advance_skip_ws();
        }

        Ok(Node::new(
            NodeType::AtRule {
                keyword: keyword.to_string(),
                expressions,
                block: None,
            },
            loc,
        ))
    }

    /// `@namespace [prefix] <uri> ;`
    fn parse_at_rule_namespace(&mut self, keyword: &str) -> CssResult<Node> {
        log::trace!("parse_at_rule_namespace");

        let loc = self.current_location();
        self.advance_skip_ws();

        let mut list = Vec::new();
        loop {
            if let Some(function) = self.parse_function()? {
                list.push(function);
                continue;
            }
            if let Some(value) = self.parse_value()? {
                list.push(value);
                continue;
            }
            break;
        }
        let expressions = vec![list];

        if self.current().is_punctuator(';') {
            self.advance_skip_ws();
        }

        Ok(Node::new(
            NodeType::AtRule {
                keyword: keyword.to_string(),
                expressions,
                block: None,
            },
            loc,
        ))
    }

    /// `@media <query-list> { rules }`
    fn parse_at_rule_media(&mut self, keyword: &str) -> CssResult<Node> {
        log::trace!("parse_at_rule_media");

        let loc = self.current_location();
        self.advance_skip_ws();

        let mut expressions: Vec<Vec<Node>> = Vec::new();
        let mut list = Vec::new();
        loop {
            if let Some(value) = self.parse_value()? {
                list.push(value);
                continue;
            }
            if let Some(block) = self.parse_paren_block()? {
                list.push(block);
                continue;
            }
            if let Some(comment) = self.parse_comment()? {
                list.push(comment);
                continue;
            }

            if self.current().is_punctuator(',') {
                expressions.push(std::mem::take(&mut list));
                self.advance_skip_ws();
                continue;
            }

            break;
        }
        expressions.push(list);

        let block = self.parse_rule_block()?;

        Ok(Node::new(
            NodeType::AtRule {
                keyword: keyword.to_string(),
                expressions,
                block: Some(Box::new(block)),
            },
            loc,
        ))
    }

    /// `@supports <condition> { rules }`
    fn parse_at_rule_supports(&mut self, keyword: &str) -> CssResult<Node> {
        log::trace!("parse_at_rule_supports");

        let loc = self.current_location();
        self.advance_skip_ws();

        let mut expressions: Vec<Vec<Node>> = Vec::new();
        let mut list = Vec::new();
        loop {
            if let Some(condition) = self.parse_supports_condition()? {
                list.push(condition);
                continue;
            }
            if let Some(value) = self.parse_value()? {
                list.push(value);
                continue;
            }
            if let Some(block) = self.parse_paren_block()? {
                list.push(block);
                continue;
            }

            if self.current().is_punctuator(',') {
                expressions.push(std::mem::take(&mut list));
                self.advance_skip_ws();
                continue;
            }

            break;
        }
        expressions.push(list);

        let block = self.parse_rule_block()?;

        Ok(Node::new(
            NodeType::AtRule {
                keyword: keyword.to_string(),
                expressions,
                block: Some(Box::new(block)),
            },
            loc,
        ))
    }

    /// `@keyframes <name> { from/to/<pct> { declarations } … }`
    fn parse_at_rule_keyframes(&mut self, keyword: &str) -> CssResult<Node> {
        log::trace!("parse_at_rule_keyframes");

        let loc = self.current_location();
        self.advance_skip_ws();

        let Some(name) = self.parse_value()? else {
            return Err(self.parse_error("Expected keyframes name"));
        };

        if !self.current().is_punctuator('{') {
            return Err(self.parse_error("Expected '{'"));
        }
        self.advance_skip_ws();

        let mut rules = Vec::new();

        loop {
            let rule_loc = self.current_location();
            let mut selectors = Vec::new();

            loop {
                if self.current().is_ident()
                    && (self.current().has_content("from") || self.current().has_content("to"))
                {
                    selectors.push(Node::new(
                        NodeType::Selector {
                            kind: SelectorKind::Keyframes,
                            name: IdentValue::literal(&self.current().content()),
                            subs: Vec::new(),
                        },
                        self.current_location(),
                    ));
                    self.advance_skip_ws();
                } else if self.current().is_number() && self.next_token().is_punctuator('%') {
                    let name = format!("{}%", self.current().content());
                    selectors.push(Node::new(
                        NodeType::Selector {
                            kind: SelectorKind::Keyframes,
                            name: IdentValue::Literal(name),
                            subs: Vec::new(),
                        },
                        self.current_location(),
                    ));
                    self.advance();
                    self.advance_skip_ws();
                }

                if self.current().is_punctuator(',') {
                    self.advance_skip_ws();
                    continue;
                }
                break;
            }

            if selectors.is_empty() {
                break;
            }

            let Some(block) = self.parse_curly_block()? else {
                return Err(self.parse_error("Expected '{'"));
            };

            rules.push(Node::new(
                NodeType::QualifiedRule {
                    selectors,
                    block: Some(Box::new(block)),
                },
                rule_loc,
            ));
        }

        if !self.current().is_punctuator('}') {
            return Err(self.parse_error("Missing '}'"));
        }
        self.advance_skip_ws();

        let block = Node::new(
            NodeType::Block {
                kind: BlockKind::Curly,
                elements: rules,
            },
            loc,
        );

        Ok(Node::new(
            NodeType::AtRule {
                keyword: keyword.to_string(),
                expressions: vec![vec![name]],
                block: Some(Box::new(block)),
            },
            loc,
        ))
    }

    /// At-rules whose body is a plain declaration list: `@font-face`,
    /// `@viewport`
    fn parse_at_rule_declaration_block(&mut self, keyword: &str) -> CssResult<Node> {
        log::trace!("parse_at_rule_declaration_block");

        let loc = self.current_location();
        self.advance_skip_ws();

        let Some(block) = self.parse_curly_block()? else {
            return Err(self.parse_error("Expected '{'"));
        };

        Ok(Node::new(
            NodeType::AtRule {
                keyword: keyword.to_string(),
                expressions: Vec::new(),
                block: Some(Box::new(block)),
            },
            loc,
        ))
    }

    /// `@counter-style <name> { declarations }`
    fn parse_at_rule_counter_style(&mut self, keyword: &str) -> CssResult<Node> {
        log::trace!("parse_at_rule_counter_style");

        let loc = self.current_location();
        self.advance_skip_ws();

        let mut expressions: Vec<Vec<Node>> = Vec::new();
        let mut list = Vec::new();
        loop {
            if let Some(value) = self.parse_value()? {
                list.push(value);
                continue;
            }
            if let Some(block) = self.parse_paren_block()? {
                list.push(block);
                continue;
            }

            if self.current().is_punctuator(',') {
                expressions.push(std::mem::take(&mut list));
                self.advance_skip_ws();
                continue;
            }

            break;
        }
        expressions.push(list);

        let Some(block) = self.parse_curly_block()? else {
            return Err(self.parse_error("Expected '{'"));
        };

        Ok(Node::new(
            NodeType::AtRule {
                keyword: keyword.to_string(),
                expressions,
                block: Some(Box::new(block)),
            },
            loc,
        ))
    }

    /// `@page { declarations | rules }`
    fn parse_at_rule_page(&mut self, keyword: &str) -> CssResult<Node> {
        log::trace!("parse_at_rule_page");

        let loc = self.current_location();
        self.advance_skip_ws();

        if !self.current().is_punctuator('{') {
            return Err(self.parse_error("Expected '{'"));
        }

        let Some(block) = self.parse_curly_block()? else {
            return Err(self.parse_error(""));
        };

        Ok(Node::new(
            NodeType::AtRule {
                keyword: keyword.to_string(),
                expressions: Vec::new(),
                block: Some(Box::new(block)),
            },
            loc,
        ))
    }

    /// `@document <url-matching functions> { rules }`
    fn parse_at_rule_document(&mut self, keyword: &str) -> CssResult<Node> {
        log::trace!("parse_at_rule_document");

        let loc = self.current_location();
        self.advance_skip_ws();

        let mut expressions: Vec<Vec<Node>> = Vec::new();
        let mut list = Vec::new();
        loop {
            if let Some(function) = self.parse_function()? {
                list.push(function);
                continue;
            }

            if self.current().is_punctuator(',') {
                expressions.push(std::mem::take(&mut list));
                self.advance_skip_ws();
                continue;
            }

            break;
        }
        expressions.push(list);

        let block = self.parse_rule_block()?;

        Ok(Node::new(
            NodeType::AtRule {
                keyword: keyword.to_string(),
                expressions,
                block: Some(Box::new(block)),
            },
            loc,
        ))
    }

    /// A curly block holding qualified rules, nested at-rules and comments
    fn parse_rule_block(&mut self) -> CssResult<Node> {
        if !self.current().is_punctuator('{') {
            return Err(self.parse_error("Expected '{'"));
        }

        let loc = self.current_location();
        self.advance_skip_ws();

        let mut elements = Vec::new();
        loop {
            if let Some(comment) = self.parse_comment()? {
                elements.push(comment);
                continue;
            }
            if let Some(at_rule) = self.parse_at_rule()? {
                elements.push(at_rule);
                continue;
            }
            if self.current().is_punctuator('}') || self.current().is_eof() {
                break;
            }
            if let Some(rule) = self.parse_qualified_rule()? {
                elements.push(rule);
                continue;
            }
            break;
        }

        if !self.current().is_punctuator('}') {
            return Err(self.parse_error("Missing '}'"));
        }
        self.advance_skip_ws();

        Ok(Node::new(
            NodeType::Block {
                kind: BlockKind::Curly,
                elements,
            },
            loc,
        ))
    }
}
