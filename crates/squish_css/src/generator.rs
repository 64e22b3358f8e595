use crate::node::{
    BlockKind, ColorKind, CommentKind, IdentValue, Node, NodeType, SelectorKind,
};
use crate::rename::RenameTables;

/// Comment placed at the start of every minified output file. It is stripped
/// again when it would make the output larger than the input.
pub const OUTPUT_FILE_HEADER: &str = "/* minified by squish */";

/// Functions whose parameters are emitted verbatim, without injected spaces
const RAW_PARAM_FUNCTIONS: &[&str] = &["calc", "min", "max", "clamp", "alpha"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Declaration,
    SelectorList,
    AtRuleExpressionList,
}

/// Walks the modified AST and appends bytes to the output buffer. Nodes with
/// a replacement pointer render their replacement; shared identifier cells
/// resolve through the rename tables.
pub struct Generator<'a> {
    tables: &'a RenameTables,
    beautify: bool,
    buffer: String,
    indent: usize,
    context: Vec<Context>,
}

impl<'a> Generator<'a> {
    #[must_use]
    pub fn new(tables: &'a RenameTables, beautify: bool) -> Self {
        Self {
            tables,
            beautify,
            buffer: String::new(),
            indent: 0,
            context: Vec::new(),
        }
    }

    /// Renders a complete tree
    #[must_use]
    pub fn generate(mut self, node: &Node) -> String {
        self.visit(node);
        self.buffer
    }

    /// Renders a single node to minified text, used for structural
    /// comparisons inside the modifier
    #[must_use]
    pub fn node_text(tables: &RenameTables, node: &Node) -> String {
        Generator::new(tables, false).generate(node)
    }

    fn in_context(&self, contexts: &[Context]) -> bool {
        self.context
            .last()
            .is_some_and(|current| contexts.contains(current))
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent {
            self.buffer.push('\t');
        }
    }

    fn visit(&mut self, node: &Node) {
        let node = node.effective();

        match &*node.node_type {
            NodeType::Block { kind, elements } => self.visit_block(*kind, elements),
            NodeType::AtRule { keyword, expressions, block } => {
                self.visit_at_rule(keyword, expressions, block.as_deref());
            }
            NodeType::QualifiedRule { selectors, block } => {
                self.visit_qualified_rule(selectors, block.as_deref());
            }
            NodeType::Declaration { property, values, important, hack } => {
                self.visit_declaration(property, values, *important, hack.as_deref());
            }
            NodeType::SelectorChain { parts } => self.visit_selector_chain(parts),
            NodeType::Selector { kind, name, subs } => self.visit_selector(*kind, name, subs),
            NodeType::SelectorAttribute { name, value, operation, insensitive } => {
                self.visit_attribute_selector(name, value, operation.as_str(), *insensitive);
            }
            NodeType::SelectorCombinator { kind, left, right } => {
                self.visit_combinator(*kind, left, right);
            }
            NodeType::Function { name, parameters } => self.visit_function(name, parameters),
            NodeType::Ident { value } => {
                let text = self.resolve(value, &self.tables.animations);
                self.buffer.push_str(&text);
            }
            NodeType::CustomProperty { name } => {
                let text = self.resolve(name, &self.tables.custom_properties);
                self.buffer.push_str("--");
                self.buffer.push_str(&text);
            }
            NodeType::Number { value } => self.buffer.push_str(&value.to_string()),
            NodeType::Percentage { value } => {
                self.buffer.push_str(&value.to_string());
                self.buffer.push('%');
            }
            NodeType::Dimension { value, unit } => {
                self.buffer.push_str(&value.to_string());
                self.buffer.push_str(unit);
            }
            NodeType::Color { kind, value } => {
                if *kind == ColorKind::HexLiteral {
                    self.buffer.push('#');
                }
                self.buffer.push_str(value);
            }
            NodeType::String { value, unquoted } => self.visit_string(value, *unquoted),
            NodeType::Delimiter { value } => self.visit_delimiter(*value),
            NodeType::UnicodeRange { value } => self.buffer.push_str(value),
            NodeType::SupportsCondition { condition } => {
                self.buffer.push_str("supports");
                self.visit(condition);
            }
            NodeType::Comment { kind, value } => self.visit_comment(*kind, value),
        }
    }

    fn resolve(&self, value: &IdentValue, table: &crate::rename::RenameTable) -> String {
        match value {
            IdentValue::Literal(text) => text.clone(),
            IdentValue::Shared(id) => table.resolve(*id).to_string(),
        }
    }

    fn visit_block(&mut self, kind: BlockKind, elements: &[Node]) {
        match kind {
            BlockKind::Stylesheet => {
                if !self.beautify {
                    self.buffer.push_str(OUTPUT_FILE_HEADER);
                    self.buffer.push('\n');
                }
            }
            BlockKind::Curly => {
                if self.beautify {
                    self.buffer.push(' ');
                }
                self.buffer.push('{');
                if self.beautify {
                    self.buffer.push('\n');
                    self.indent += 1;
                }
            }
            BlockKind::Square => self.buffer.push('['),
            BlockKind::Paren => self.buffer.push('('),
            BlockKind::Default => {}
        }

        let value_block = matches!(kind, BlockKind::Paren | BlockKind::Square | BlockKind::Default);

        fn rule_like(node: &Node) -> bool {
            let node = node.effective();
            node.is_qualified_rule() || node.is_at_rule() || node.is_declaration() || node.is_comment()
        }

        for (idx, element) in elements.iter().enumerate() {
            if self.beautify && kind == BlockKind::Curly {
                self.push_indent();
            }

            // Value sequences need separating spaces; structural elements
            // separate through braces and semicolons
            if value_block
                && idx > 0
                && !element.effective().is_any_delimiter()
                && !rule_like(element)
                && !rule_like(&elements[idx - 1])
            {
                self.buffer.push(' ');
            }

            self.visit(element);

            if idx + 1 < elements.len() && element.effective().is_declaration() {
                self.buffer.push(';');
            }

            if self.beautify && kind == BlockKind::Curly && !self.buffer.ends_with('\n') {
                self.buffer.push('\n');
            }
        }

        match kind {
            BlockKind::Stylesheet => {
                while self.buffer.ends_with('\n') {
                    self.buffer.pop();
                }
            }
            BlockKind::Curly => {
                if self.beautify {
                    self.indent -= 1;
                    self.push_indent();
                }
                self.buffer.push('}');
                if self.beautify {
                    self.buffer.push_str("\n\n");
                }
            }
            BlockKind::Square => self.buffer.push(']'),
            BlockKind::Paren => self.buffer.push(')'),
            BlockKind::Default => {}
        }
    }

    fn visit_at_rule(&mut self, keyword: &str, expressions: &[Vec<Node>], block: Option<&Node>) {
        self.buffer.push('@');
        self.buffer.push_str(keyword);

        self.context.push(Context::AtRuleExpressionList);

        for (list_idx, list) in expressions.iter().enumerate() {
            for element in list {
                self.buffer.push(' ');
                self.visit(element);
            }

            if list_idx + 1 < expressions.len() {
                self.buffer.push(',');
                if self.beautify {
                    self.buffer.push_str("\n      ");
                }
            }
        }

        self.context.pop();

        match block {
            Some(block) => self.visit(block),
            None => {
                self.buffer.push(';');
                if self.beautify {
                    self.buffer.push('\n');
                }
            }
        }
    }

    fn visit_qualified_rule(&mut self, selectors: &[Node], block: Option<&Node>) {
        self.context.push(Context::SelectorList);

        for (idx, selector) in selectors.iter().enumerate() {
            self.visit(selector);

            if idx + 1 < selectors.len() {
                self.buffer.push(',');
                if self.beautify {
                    self.buffer.push('\n');
                    self.push_indent();
                }
            }
        }

        self.context.pop();

        if let Some(block) = block {
            self.visit(block);
        }
    }

    fn visit_declaration(
        &mut self,
        property: &Node,
        values: &[Vec<Node>],
        important: bool,
        hack: Option<&str>,
    ) {
        self.context.push(Context::Declaration);

        self.visit(property);
        self.buffer.push(':');
        if self.beautify {
            self.buffer.push(' ');
        }

        for (list_idx, list) in values.iter().enumerate() {
            for (idx, value) in list.iter().enumerate() {
                self.visit(value);

                if idx + 1 < list.len() && !value.effective().is_any_delimiter() {
                    self.buffer.push(' ');
                }
            }

            if list_idx + 1 < values.len() {
                self.buffer.push(',');
            }
        }

        if important {
            if self.beautify {
                self.buffer.push(' ');
            }
            self.buffer.push_str("!important");
        } else if let Some(hack) = hack {
            if self.beautify {
                self.buffer.push(' ');
            }
            self.buffer.push('!');
            self.buffer.push_str(hack);
        }

        self.context.pop();
    }

    fn visit_selector_chain(&mut self, parts: &[Node]) {
        if parts.len() == 1 {
            self.visit(&parts[0]);
            return;
        }

        for part in parts {
            // The implicit universal head stays implicit in compounds
            if part.is_selector_kind(SelectorKind::Universal) {
                continue;
            }
            self.visit(part);
        }
    }

    fn visit_selector(&mut self, kind: SelectorKind, name: &IdentValue, subs: &[Node]) {
        match kind {
            SelectorKind::Id => self.buffer.push('#'),
            SelectorKind::Class => self.buffer.push('.'),
            SelectorKind::PseudoClass => self.buffer.push(':'),
            SelectorKind::PseudoElement => self.buffer.push_str("::"),
            SelectorKind::Universal => {
                self.buffer.push('*');
                return;
            }
            _ => {}
        }

        let table = match kind {
            SelectorKind::Id => &self.tables.ids,
            SelectorKind::Class => &self.tables.classes,
            _ => &self.tables.animations,
        };
        let text = self.resolve(name, table);
        self.buffer.push_str(&text);

        if kind == SelectorKind::PseudoClass && !subs.is_empty() {
            self.buffer.push('(');
            for (idx, sub) in subs.iter().enumerate() {
                self.visit(sub);
                if idx + 1 < subs.len() {
                    self.buffer.push(',');
                }
            }
            self.buffer.push(')');
        } else if kind == SelectorKind::AnPlusB && !subs.is_empty() {
            self.buffer.push_str(" of ");
            for sub in subs {
                self.visit(sub);
            }
        }
    }

    fn visit_attribute_selector(
        &mut self,
        name: &str,
        value: &str,
        operation: &str,
        insensitive: bool,
    ) {
        self.buffer.push('[');
        self.buffer.push_str(name);

        if !value.is_empty() {
            self.buffer.push_str(operation);

            let needs_quotes = value.contains(['"', '\'', '=', '<', '>', '`', ' '])
                || value.starts_with(|c: char| c.is_ascii_digit());

            if needs_quotes {
                self.buffer.push('"');
            }
            self.buffer.push_str(value);
            if needs_quotes {
                self.buffer.push('"');
            }
        }

        if insensitive {
            self.buffer.push_str(" i");
        }

        self.buffer.push(']');
    }

    fn visit_combinator(&mut self, kind: crate::node::CombinatorKind, left: &Node, right: &Node) {
        use crate::node::CombinatorKind::*;

        self.visit(left);

        match kind {
            Descendancy => self.buffer.push(' '),
            Child => self.push_combinator_char('>'),
            NextSibling => self.push_combinator_char('+'),
            SubsequentSibling => self.push_combinator_char('~'),
        }

        self.visit(right);
    }

    fn push_combinator_char(&mut self, c: char) {
        if self.beautify {
            self.buffer.push(' ');
        }
        self.buffer.push(c);
        if self.beautify {
            self.buffer.push(' ');
        }
    }

    fn visit_function(&mut self, name: &str, parameters: &[Vec<Node>]) {
        self.buffer.push_str(name);
        self.buffer.push('(');

        let raw = RAW_PARAM_FUNCTIONS.contains(&name);

        for (list_idx, list) in parameters.iter().enumerate() {
            for (idx, element) in list.iter().enumerate() {
                self.visit(element);

                if !raw && idx + 1 < list.len() && !element.effective().is_any_delimiter() {
                    self.buffer.push(' ');
                }
            }

            if list_idx + 1 < parameters.len() {
                self.buffer.push(',');
            }
        }

        self.buffer.push(')');
    }

    fn visit_string(&mut self, value: &str, unquoted: bool) {
        if unquoted {
            self.buffer.push_str(value);
            return;
        }

        let quote = if value.contains('"') { '\'' } else { '"' };
        self.buffer.push(quote);
        self.buffer.push_str(value);
        self.buffer.push(quote);
    }

    fn visit_delimiter(&mut self, value: char) {
        // A sign operator must stay separated from the preceding value
        if self.buffer.ends_with(char::is_whitespace) {
            self.buffer.pop();
        }

        if value == '+' || value == '-' {
            self.buffer.push(' ');
        }
        self.buffer.push(value);
        if value == '+' || value == '-' {
            self.buffer.push(' ');
        }
    }

    fn visit_comment(&mut self, kind: CommentKind, value: &str) {
        let structural = !self.in_context(&[
            Context::Declaration,
            Context::SelectorList,
            Context::AtRuleExpressionList,
        ]);

        if self.beautify
            && kind == CommentKind::Comment
            && structural
            && !self.buffer.is_empty()
            && !self.buffer.ends_with('\n')
        {
            self.buffer.push('\n');
        }

        match kind {
            CommentKind::Comment => {
                self.buffer.push_str("/*");
                self.buffer.push_str(value);
                self.buffer.push_str("*/");
            }
            CommentKind::CdataStart => self.buffer.push_str("<!--"),
            CommentKind::CdataEnd => self.buffer.push_str("-->"),
        }

        if self.beautify && kind == CommentKind::Comment && structural {
            self.buffer.push('\n');
        }
    }
}
