use crate::node::{IdentValue, Node, NodeType};
use crate::parser::CssParser;
use squish_shared::errors::CssResult;

impl CssParser {
    /// `property: value-list (',' value-list)* ('!' (important | hack))?`
    ///
    /// A leading `*` (IE<=7 hack) is kept on the property name. A property
    /// name starting with `--` becomes a custom property definition.
    pub fn parse_declaration(&mut self) -> CssResult<Option<Node>> {
        log::trace!("parse_declaration");

        self.remember();

        let loc = self.current_location();
        let mut ie_hack = false;

        if self.current().is_punctuator('*') {
            ie_hack = true;
            self.advance();
        }

        if !self.current().is_ident() {
            self.restore();
            return Ok(None);
        }

        let name = self.current().content();
        let property = if let Some(custom) = name.strip_prefix("--") {
            Node::new(
                NodeType::CustomProperty {
                    name: IdentValue::literal(custom),
                },
                self.current_location(),
            )
        } else {
            let name = if ie_hack { format!("*{name}") } else { name };
            Node::new(
                NodeType::Ident {
                    value: IdentValue::Literal(name),
                },
                self.current_location(),
            )
        };

        self.advance_skip_ws();

        if !self.current().is_punctuator(':') {
            self.restore();
            return Ok(None);
        }
        self.advance_skip_ws();

        // Remembered for the verbatim re-read of IE filter values
        self.remember();

        let mut values: Vec<Vec<Node>> = Vec::new();
        let mut list = Vec::new();
        loop {
            if let Some(value) = self.parse_value()? {
                list.push(value);
                continue;
            }
            if let Some(comment) = self.parse_comment()? {
                list.push(comment);
                continue;
            }
            if self.current().is_punctuator(',') {
                values.push(std::mem::take(&mut list));
                self.advance_skip_ws();
                continue;
            }
            break;
        }
        values.push(list);

        self.reread_filter_progid(&property, &mut values)?;

        let mut important = false;
        let mut hack = None;

        if self.current().is_punctuator('!') {
            self.advance_skip_ws();

            if self.current().has_content("important") {
                important = true;
                self.advance_skip_ws();
            } else if self.current().is_ident() {
                hack = Some(self.current().content());
                self.advance_skip_ws();
            } else {
                return Err(self.parse_error("Expected identifier after '!'"));
            }
        }

        self.forget();

        Ok(Some(Node::new(
            NodeType::Declaration {
                property: Box::new(property),
                values,
                important,
                hack,
            },
            loc,
        )))
    }

    /// `filter: progid:…` is proprietary IE syntax; when detected, the value
    /// tokens are re-read verbatim into an unquoted string attached via the
    /// replacement pointer.
    fn reread_filter_progid(
        &mut self,
        property: &Node,
        values: &mut [Vec<Node>],
    ) -> CssResult<()> {
        let is_filter_progid = property.is_ident_value("filter")
            && values.len() == 1
            && values[0].len() == 1
            && values[0][0].is_ident_value("progid");

        if !is_filter_progid {
            self.forget();
            return Ok(());
        }

        self.restore();

        let loc = self.current_location();
        let mut content = String::new();

        while !self.current().is_eof() && !self.current().is_any_punctuator(&[';', '}']) {
            if self.current().is_hash() {
                content.push('#');
            }
            content.push_str(&self.current().content());
            self.advance();
        }

        values[0][0].set_replacement(Node::new(
            NodeType::String {
                value: content.trim().to_string(),
                unquoted: true,
            },
            loc,
        ));

        Ok(())
    }

    /// Semicolon separated declarations, with comments interleaved
    pub fn parse_declaration_list(&mut self) -> CssResult<Option<Vec<Node>>> {
        log::trace!("parse_declaration_list");

        self.remember();

        let mut elements = Vec::new();
        let mut found_declaration = false;

        loop {
            while let Some(comment) = self.parse_comment()? {
                elements.push(comment);
            }

            if let Some(declaration) = self.parse_declaration()? {
                elements.push(declaration);
                found_declaration = true;
            }

            if self.current().is_punctuator(';') {
                self.advance_skip_ws();
                continue;
            }
            break;
        }

        if !found_declaration {
            // A block may hold nothing but comments; those stay in place
            if elements.is_empty() {
                self.restore();
                return Ok(None);
            }

            self.forget();
            return Ok(Some(elements));
        }

        self.forget();
        Ok(Some(elements))
    }
}
