use crate::node::{BlockKind, Node, NodeType};
use crate::parser::CssParser;
use squish_shared::errors::CssResult;

const MATH_FUNCTIONS: &[&str] = &["calc", "min", "max", "clamp"];

impl CssParser {
    /// `name( params )`. Math functions and the IE `alpha()` filter get their
    /// own parsing modes; `supports(…)` belongs to at-rule preludes and is
    /// not a function.
    pub fn parse_function(&mut self) -> CssResult<Option<Node>> {
        if !self.current().is_ident()
            || !self.next_token().is_punctuator('(')
            || self.current().has_content("supports")
        {
            return Ok(None);
        }

        if let Some(node) = self.parse_math_function()? {
            return Ok(Some(node));
        }
        if let Some(node) = self.parse_alpha_function()? {
            return Ok(Some(node));
        }

        log::trace!("parse_function");

        let loc = self.current_location();
        let name = self.current().content();

        self.advance();
        self.advance_skip_ws();

        let mut parameters = Vec::new();
        loop {
            let mut list = Vec::new();
            while let Some(value) = self.parse_value()? {
                list.push(value);
            }
            parameters.push(list);

            if self.current().is_punctuator(',') {
                self.advance_skip_ws();
                continue;
            }
            break;
        }

        if !self.current().is_punctuator(')') {
            return Err(self.parse_error("Missing ')'"));
        }
        self.advance_skip_ws();

        Ok(Some(Node::new(NodeType::Function { name, parameters }, loc)))
    }

    /// `calc`, `min`, `max` and `clamp` keep their operators and parens as
    /// delimiters so nothing inside is reordered or evaluated.
    fn parse_math_function(&mut self) -> CssResult<Option<Node>> {
        if !MATH_FUNCTIONS.contains(&self.current().content().as_str()) {
            return Ok(None);
        }

        log::trace!("parse_math_function");

        let loc = self.current_location();
        let name = self.current().content();

        self.advance();
        self.advance_skip_ws();

        let mut depth: u32 = 1;
        let mut parameters = Vec::new();
        let mut list = Vec::new();

        loop {
            if self.current().is_whitespace() {
                self.skip_whitespace();
                continue;
            }

            if let Some(c) = self.current().punctuator() {
                if c == '-' && self.next_token().is_number() {
                    if let Some(number) = self.parse_number()? {
                        list.push(number);
                        continue;
                    }
                }

                match c {
                    '(' => {
                        depth += 1;
                        list.push(Node::new(
                            NodeType::Delimiter { value: c },
                            self.current_location(),
                        ));
                        self.advance_skip_ws();
                        continue;
                    }
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                        list.push(Node::new(
                            NodeType::Delimiter { value: c },
                            self.current_location(),
                        ));
                        self.advance_skip_ws();
                        continue;
                    }
                    '+' | '-' | '*' | '/' => {
                        list.push(Node::new(
                            NodeType::Delimiter { value: c },
                            self.current_location(),
                        ));
                        self.advance_skip_ws();
                        continue;
                    }
                    ',' => {
                        parameters.push(std::mem::take(&mut list));
                        self.advance_skip_ws();
                        continue;
                    }
                    _ => break,
                }
            }

            if self.current().is_number() {
                if let Some(number) = self.parse_number()? {
                    list.push(number);
                    continue;
                }
            }

            if self.current().is_ident() {
                if let Some(function) = self.parse_function()? {
                    list.push(function);
                    continue;
                }

                // Bare identifiers such as custom property references keep
                // their value form
                if let Some(value) = self.parse_value()? {
                    list.push(value);
                    continue;
                }
            }

            break;
        }

        parameters.push(list);

        if !self.current().is_punctuator(')') {
            return Err(self.parse_error("Missing ')'"));
        }
        self.advance_skip_ws();

        Ok(Some(Node::new(NodeType::Function { name, parameters }, loc)))
    }

    /// The IE `alpha(opacity=50)` filter argument is not CSS; it is captured
    /// verbatim as one unquoted string.
    fn parse_alpha_function(&mut self) -> CssResult<Option<Node>> {
        if !self.current().content().eq_ignore_ascii_case("alpha") {
            return Ok(None);
        }

        log::trace!("parse_alpha_function");

        let loc = self.current_location();

        self.advance();
        self.advance_skip_ws();

        let mut content = String::new();
        while !self.current().is_eof() && !self.current().is_punctuator(')') {
            if self.current().is_hash() {
                content.push('#');
            }
            content.push_str(&self.current().content());
            self.advance();
        }

        if !self.current().is_punctuator(')') {
            return Err(self.parse_error("Missing ')'"));
        }
        self.advance_skip_ws();

        let argument = Node::new(
            NodeType::String {
                value: content.trim().to_string(),
                unquoted: true,
            },
            loc,
        );

        Ok(Some(Node::new(
            NodeType::Function {
                name: "alpha".to_string(),
                parameters: vec![vec![argument]],
            },
            loc,
        )))
    }

    /// `supports( declaration )` inside `@import` and `@supports` preludes
    pub fn parse_supports_condition(&mut self) -> CssResult<Option<Node>> {
        if !self.current().has_content("supports") || !self.next_token().is_punctuator('(') {
            return Ok(None);
        }

        log::trace!("parse_supports_condition");

        let loc = self.current_location();

        self.advance();
        self.advance_skip_ws();

        let Some(declaration) = self.parse_declaration()? else {
            return Err(self.parse_error("Expected declaration"));
        };

        if !self.current().is_punctuator(')') {
            return Err(self.parse_error("Missing ')'"));
        }
        self.advance_skip_ws();

        let condition = Node::new(
            NodeType::Block {
                kind: BlockKind::Paren,
                elements: vec![declaration],
            },
            loc,
        );

        Ok(Some(Node::new(
            NodeType::SupportsCondition {
                condition: Box::new(condition),
            },
            loc,
        )))
    }

}
