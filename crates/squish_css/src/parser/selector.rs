use crate::node::{
    AttributeOperation, CombinatorKind, IdentValue, Node, NodeType, SelectorKind,
};
use crate::parser::CssParser;
use squish_shared::byte_stream::Location;
use squish_shared::errors::CssResult;

fn simple_selector(kind: SelectorKind, name: &str, loc: Location) -> Node {
    Node::new(
        NodeType::Selector {
            kind,
            name: IdentValue::literal(name),
            subs: Vec::new(),
        },
        loc,
    )
}

fn universal_chain(loc: Location) -> Node {
    Node::new(
        NodeType::SelectorChain {
            parts: vec![simple_selector(SelectorKind::Universal, "*", loc)],
        },
        loc,
    )
}

impl CssParser {
    /// A compound selector: adjacent simple selectors with an implicit
    /// universal head when the run does not begin with a type selector.
    pub fn parse_selector_chain(&mut self) -> CssResult<Option<Node>> {
        log::trace!("parse_selector_chain");

        let loc = self.current_location();
        let mut parts: Vec<Node> = Vec::new();

        loop {
            let token = self.current().clone();

            if token.is_punctuator('.') {
                if !self.next_token().is_ident() {
                    self.advance();
                    return Err(self.parse_error("Invalid class name"));
                }
                self.advance();
                parts.push(simple_selector(
                    SelectorKind::Class,
                    &self.current().content(),
                    token.location,
                ));
                self.advance();
                continue;
            }

            if token.is_punctuator(':') {
                let part = if self.next_token().is_punctuator(':') {
                    self.parse_pseudo_element()?
                } else {
                    self.parse_pseudo_class()?
                };

                match part {
                    Some(part) => {
                        parts.push(part);
                        continue;
                    }
                    None => return Err(self.parse_error("")),
                }
            }

            if token.is_punctuator('[') {
                if let Some(part) = self.parse_attribute_selector()? {
                    parts.push(part);
                    continue;
                }
                return Err(self.parse_error(""));
            }

            if token.is_punctuator('*') {
                parts.push(simple_selector(SelectorKind::Universal, "*", token.location));
                self.advance();
                continue;
            }

            if token.is_hash() {
                if token.content().is_empty() {
                    return Err(self.parse_error("Invalid id"));
                }
                parts.push(simple_selector(
                    SelectorKind::Id,
                    &token.content(),
                    token.location,
                ));
                self.advance();
                continue;
            }

            if token.is_ident() {
                parts.push(simple_selector(
                    SelectorKind::Type,
                    &token.content(),
                    token.location,
                ));
                self.advance();
                continue;
            }

            break;
        }

        if parts.is_empty() {
            return Ok(None);
        }

        // The head of an omitted leading type selector is an implicit `*`
        let head_is_typelike = matches!(
            &*parts[0].node_type,
            NodeType::Selector { kind: SelectorKind::Type | SelectorKind::Universal, .. }
        );
        if !head_is_typelike {
            parts.insert(0, simple_selector(SelectorKind::Universal, "*", loc));
        }

        Ok(Some(Node::new(NodeType::SelectorChain { parts }, loc)))
    }

    /// A left-associative tree of combinators over selector chains.
    /// Whitespace between two chains is a descendancy combinator.
    pub fn parse_selector_combination(&mut self) -> CssResult<Option<Node>> {
        log::trace!("parse_selector_combination");

        let mut left: Option<Node> = None;
        let mut right: Option<Node> = None;
        let mut combinator: Option<(CombinatorKind, Location)> = None;

        loop {
            // A complete left/combinator/right triple folds into the left
            // side of the next combinator
            if right.is_some() {
                let (Some(l), Some(r), Some((kind, loc))) =
                    (left.take(), right.take(), combinator.take())
                else {
                    return Ok(None);
                };

                left = Some(Node::new(
                    NodeType::SelectorCombinator {
                        kind,
                        left: Box::new(l),
                        right: Box::new(r),
                    },
                    loc,
                ));
            }

            if let Some(chain) = self.parse_selector_chain()? {
                if left.is_none() {
                    left = Some(chain);
                } else {
                    right = Some(chain);
                }
                continue;
            }

            // Whitespace before an explicit combinator, comma or block is
            // not a descendancy combinator
            if self.current().is_whitespace()
                && (self.next_token().is_any_punctuator(&['>', '+', '~', '{', ','])
                    || self.next_token().is_punctuator(')'))
            {
                self.skip_whitespace();
            }

            let loc = self.current_location();
            let kind = if self.current().is_whitespace() {
                Some(CombinatorKind::Descendancy)
            } else {
                match self.current().punctuator() {
                    Some('>') => Some(CombinatorKind::Child),
                    Some('+') => Some(CombinatorKind::NextSibling),
                    Some('~') => Some(CombinatorKind::SubsequentSibling),
                    _ => None,
                }
            };

            if let Some(kind) = kind {
                combinator = Some((kind, loc));
                if left.is_none() {
                    left = Some(universal_chain(loc));
                }
                self.advance_skip_ws();
                continue;
            }

            break;
        }

        match (left, right, combinator) {
            (Some(node), None, None) => Ok(Some(node)),
            (None, _, _) => Ok(None),
            // A dangling combinator: let the caller report the position
            _ => Ok(None),
        }
    }

    /// Comma separated selector combinations
    pub fn parse_selector_list(&mut self) -> CssResult<Option<Vec<Node>>> {
        log::trace!("parse_selector_list");

        let mut list = Vec::new();

        loop {
            self.skip_whitespace();

            if let Some(combination) = self.parse_selector_combination()? {
                list.push(combination);
            }

            if self.current().is_punctuator(',') {
                self.advance();
                continue;
            }
            break;
        }

        if list.is_empty() {
            return Ok(None);
        }

        Ok(Some(list))
    }

    /// `[name]`, `[name = value]`, `[name ^= value i]`, …
    pub fn parse_attribute_selector(&mut self) -> CssResult<Option<Node>> {
        log::trace!("parse_attribute_selector");

        if !self.current().is_punctuator('[') {
            return Ok(None);
        }

        let loc = self.current_location();
        self.advance_skip_ws();

        if !self.current().is_ident() {
            return Err(self.parse_error("Expected attribute name"));
        }

        let name = self.current().content();
        let mut operation = AttributeOperation::None;
        let mut value = String::new();
        let mut insensitive = false;

        self.advance_skip_ws();

        if self.current().is_any_punctuator(&['=', '~', '|', '^', '$', '*']) {
            if self.current().is_punctuator('=') {
                operation = AttributeOperation::Equal;
                self.advance_skip_ws();
            } else if self.next_token().is_punctuator('=') {
                operation = match self.current().punctuator() {
                    Some('~') => AttributeOperation::TildeEqual,
                    Some('|') => AttributeOperation::PipeEqual,
                    Some('^') => AttributeOperation::RoofEqual,
                    Some('$') => AttributeOperation::DollarEqual,
                    _ => AttributeOperation::AsteriskEqual,
                };
                self.advance();
                self.advance_skip_ws();
            } else {
                return Err(self.parse_error("Expected attribute operator"));
            }

            if self.current().is_ident() || self.current().is_string() {
                value = self.current().content();
                self.advance_skip_ws();
            }
        } else if !self.current().is_punctuator(']') {
            return Err(self.parse_error(""));
        }

        if self.current().has_content("i")
            && self.current().is_ident()
            && self.prev_token().is_whitespace()
        {
            insensitive = true;
            self.advance_skip_ws();
        }

        if !self.current().is_punctuator(']') {
            return Err(self.parse_error("Missing ']'"));
        }
        self.advance();

        Ok(Some(Node::new(
            NodeType::SelectorAttribute {
                name,
                value,
                operation,
                insensitive,
            },
            loc,
        )))
    }

    /// `:name`, `:is(…)`, `:nth-child(An+B of S)`, `:lang(id)`
    pub fn parse_pseudo_class(&mut self) -> CssResult<Option<Node>> {
        log::trace!("parse_pseudo_class");

        if !self.current().is_punctuator(':') || !self.next_token().is_ident() {
            return Ok(None);
        }

        let loc = self.current_location();
        self.advance();

        let name = self.current().content();
        let mut subs = Vec::new();

        let takes_selector_args = matches!(
            name.as_str(),
            "is" | "not" | "where" | "has" | "host" | "host-context"
        );
        let takes_anplusb = matches!(
            name.as_str(),
            "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" | "nth-col"
                | "nth-last-col"
        );
        let takes_language = matches!(name.as_str(), "lang" | "-ms-lang");

        if takes_selector_args && self.next_token().is_punctuator('(') {
            self.advance();
            self.advance_skip_ws();

            loop {
                let Some(combination) = self.parse_selector_combination()? else {
                    return Err(self.parse_error(""));
                };
                subs.push(combination);

                if self.current().is_punctuator(',') {
                    self.advance_skip_ws();
                    continue;
                }
                break;
            }

            if !self.current().is_punctuator(')') {
                return Err(self.parse_error("Missing ')'"));
            }
            self.advance();
        } else if takes_anplusb && self.next_token().is_punctuator('(') {
            self.advance();
            self.advance_skip_ws();

            let anb_loc = self.current_location();
            let content = if self.current().has_content("even") || self.current().has_content("odd")
            {
                let content = self.current().content();
                self.advance_skip_ws();
                content
            } else {
                let content = self.parse_anplusb_text()?;
                if content.is_empty() {
                    return Err(self.parse_error("Expected An+B expression"));
                }
                content
            };

            let mut anb = simple_selector(SelectorKind::AnPlusB, &content, anb_loc);

            if self.current().has_content("of") && self.current().is_ident() {
                self.advance_skip_ws();

                if let Some(combination) = self.parse_selector_combination()? {
                    if let NodeType::Selector { subs, .. } = &mut *anb.node_type {
                        subs.push(combination);
                    }
                }
            }

            subs.push(anb);

            if !self.current().is_punctuator(')') {
                return Err(self.parse_error("Missing ')'"));
            }
            self.advance();
        } else if takes_language && self.next_token().is_punctuator('(') {
            self.advance();
            self.advance_skip_ws();

            if !self.current().is_ident() {
                return Err(self.parse_error("Expected language identifier"));
            }

            subs.push(simple_selector(
                SelectorKind::None,
                &self.current().content(),
                self.current_location(),
            ));
            self.advance_skip_ws();

            if !self.current().is_punctuator(')') {
                return Err(self.parse_error("Missing ')'"));
            }
            self.advance();
        } else {
            self.advance();
        }

        Ok(Some(Node::new(
            NodeType::Selector {
                kind: SelectorKind::PseudoClass,
                name: IdentValue::literal(&name),
                subs,
            },
            loc,
        )))
    }

    /// `::name`
    pub fn parse_pseudo_element(&mut self) -> CssResult<Option<Node>> {
        log::trace!("parse_pseudo_element");

        if !self.current().is_punctuator(':')
            || !self.next_token().is_punctuator(':')
            || !self.peek(2).is_ident()
        {
            return Ok(None);
        }

        let loc = self.current_location();
        self.advance();
        self.advance();

        let name = self.current().content();
        self.advance();

        Ok(Some(simple_selector(SelectorKind::PseudoElement, &name, loc)))
    }
}
