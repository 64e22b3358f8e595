use crate::colors::is_predefined_color;
use crate::node::{ColorKind, IdentValue, Node, NodeType, NumberValue};
use crate::parser::CssParser;
use crate::tokenizer::TokenType;
use squish_shared::errors::CssResult;

impl CssParser {
    /// A single value inside a declaration, function parameter or at-rule
    /// prelude.
    pub fn parse_value(&mut self) -> CssResult<Option<Node>> {
        let token = self.current().clone();

        match &token.token_type {
            TokenType::Ident(content) => {
                if let Some(function) = self.parse_function()? {
                    return Ok(Some(function));
                }

                if let Some(name) = content.strip_prefix("--") {
                    let node = Node::new(
                        NodeType::CustomProperty {
                            name: IdentValue::literal(name),
                        },
                        token.location,
                    );
                    self.advance_skip_ws();
                    return Ok(Some(node));
                }

                if is_predefined_color(content) {
                    let node = Node::new(
                        NodeType::Color {
                            kind: ColorKind::PredefinedName,
                            value: content.clone(),
                        },
                        token.location,
                    );
                    self.advance_skip_ws();
                    return Ok(Some(node));
                }

                let node = Node::new(
                    NodeType::Ident {
                        value: IdentValue::literal(content),
                    },
                    token.location,
                );
                self.advance_skip_ws();
                Ok(Some(node))
            }
            TokenType::Escape(content) => {
                // A lone escape sequence is carried as an identifier value
                let node = Node::new(
                    NodeType::Ident {
                        value: IdentValue::literal(content),
                    },
                    token.location,
                );
                self.advance_skip_ws();
                Ok(Some(node))
            }
            TokenType::Number(_) => self.parse_number(),
            TokenType::QuotedString(content) => {
                let node = Node::new(
                    NodeType::String {
                        value: content.clone(),
                        unquoted: false,
                    },
                    token.location,
                );
                self.advance_skip_ws();
                Ok(Some(node))
            }
            TokenType::Hash(content) => {
                if !is_valid_hex_color(content) {
                    return Err(self.parse_error(&format!("Invalid hex color: '#{content}'")));
                }

                let node = Node::new(
                    NodeType::Color {
                        kind: ColorKind::HexLiteral,
                        value: content.to_lowercase(),
                    },
                    token.location,
                );
                self.advance_skip_ws();
                Ok(Some(node))
            }
            TokenType::UnicodeRange(content) => {
                let node = Node::new(
                    NodeType::UnicodeRange {
                        value: content.clone(),
                    },
                    token.location,
                );
                self.advance_skip_ws();
                Ok(Some(node))
            }
            // Grid line names and similar bracketed value groups
            TokenType::Punctuator('[') => self.parse_square_block(),
            TokenType::Punctuator('+' | '-') if self.next_token().is_number() => {
                self.parse_number()
            }
            TokenType::Punctuator(c @ ('+' | '-' | '*' | '/')) => {
                let node = Node::new(NodeType::Delimiter { value: *c }, token.location);
                self.advance_skip_ws();
                Ok(Some(node))
            }
            _ => Ok(None),
        }
    }

    /// A number with an optional sign, scientific postfix and unit or `%`.
    /// The sign is folded into the number's negative flag.
    pub fn parse_number(&mut self) -> CssResult<Option<Node>> {
        let mut negative = false;

        if self.current().is_any_punctuator(&['+', '-']) && self.next_token().is_number() {
            negative = self.current().is_punctuator('-');
            self.advance();
        }

        if !self.current().is_number() {
            return Ok(None);
        }

        let loc = self.current_location();
        let mut value = NumberValue::new(&self.current().content());
        value.negative = negative;
        self.advance();

        if self.current().is_scientific() {
            value.scientific = Some(self.current().content());
            self.advance();
        }

        let node = if self.current().is_unit() {
            let unit = self.current().content();
            self.advance_skip_ws();
            Node::new(NodeType::Dimension { value, unit }, loc)
        } else if self.current().is_punctuator('%') {
            self.advance_skip_ws();
            Node::new(NodeType::Percentage { value }, loc)
        } else {
            self.skip_whitespace();
            Node::new(NodeType::Number { value }, loc)
        };

        Ok(Some(node))
    }
}

/// Valid hex color literals are 3, 4, 6 or 8 hex digits
fn is_valid_hex_color(literal: &str) -> bool {
    matches!(literal.len(), 3 | 4 | 6 | 8) && literal.chars().all(|c| c.is_ascii_hexdigit())
}
