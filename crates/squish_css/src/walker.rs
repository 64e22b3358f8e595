use crate::node::{IdentValue, Node, NodeType};
use std::io::Write;

/// The walker prints the AST as an indented tree, one node per line. It is a
/// debugging aid, wired to the pipeline's debug logging.
pub struct Walker<'a> {
    root: &'a Node,
}

impl<'a> Walker<'a> {
    #[must_use]
    pub fn new(root: &'a Node) -> Self {
        Self { root }
    }

    pub fn walk_stdout(&self) {
        let _ = inner_walk(self.root, 0, &mut std::io::stdout());
    }

    #[must_use]
    pub fn walk_to_string(&self) -> String {
        let mut output: Vec<u8> = Vec::new();

        let _ = inner_walk(self.root, 0, &mut output);

        String::from_utf8_lossy(&output).to_string()
    }
}

fn ident_text(value: &IdentValue) -> String {
    match value {
        IdentValue::Literal(text) => text.clone(),
        IdentValue::Shared(_) => "<shared>".to_string(),
    }
}

fn inner_walk(node: &Node, depth: usize, f: &mut dyn Write) -> Result<(), std::io::Error> {
    let prefix = " ".repeat(depth * 2);

    if let Some(replacement) = &node.replacement {
        writeln!(f, "{prefix}[Replaced]")?;
        return inner_walk(replacement, depth + 1, f);
    }

    match &*node.node_type {
        NodeType::Block { kind, elements } => {
            writeln!(f, "{prefix}[Block {kind:?} ({})]", elements.len())?;
            for child in elements {
                inner_walk(child, depth + 1, f)?;
            }
        }
        NodeType::AtRule { keyword, expressions, block } => {
            writeln!(f, "{prefix}[AtRule] @{keyword}")?;
            for list in expressions {
                for child in list {
                    inner_walk(child, depth + 1, f)?;
                }
            }
            if let Some(block) = block {
                inner_walk(block, depth + 1, f)?;
            }
        }
        NodeType::QualifiedRule { selectors, block } => {
            writeln!(f, "{prefix}[QualifiedRule]")?;
            for selector in selectors {
                inner_walk(selector, depth + 1, f)?;
            }
            if let Some(block) = block {
                inner_walk(block, depth + 1, f)?;
            }
        }
        NodeType::Declaration { property, values, important, .. } => {
            writeln!(f, "{prefix}[Declaration] important: {important}")?;
            inner_walk(property, depth + 1, f)?;
            for list in values {
                for value in list {
                    inner_walk(value, depth + 1, f)?;
                }
            }
        }
        NodeType::Selector { kind, name, subs } => {
            writeln!(f, "{prefix}[Selector {kind:?}] {}", ident_text(name))?;
            for sub in subs {
                inner_walk(sub, depth + 1, f)?;
            }
        }
        NodeType::SelectorChain { parts } => {
            writeln!(f, "{prefix}[SelectorChain ({})]", parts.len())?;
            for part in parts {
                inner_walk(part, depth + 1, f)?;
            }
        }
        NodeType::SelectorAttribute { name, value, operation, .. } => {
            writeln!(f, "{prefix}[SelectorAttribute] {name}{}{value}", operation.as_str())?;
        }
        NodeType::SelectorCombinator { kind, left, right } => {
            writeln!(f, "{prefix}[Combinator {kind:?}]")?;
            inner_walk(left, depth + 1, f)?;
            inner_walk(right, depth + 1, f)?;
        }
        NodeType::Function { name, parameters } => {
            writeln!(f, "{prefix}[Function] {name}")?;
            for list in parameters {
                for child in list {
                    inner_walk(child, depth + 1, f)?;
                }
            }
        }
        NodeType::Ident { value } => {
            writeln!(f, "{prefix}[Ident] {}", ident_text(value))?;
        }
        NodeType::CustomProperty { name } => {
            writeln!(f, "{prefix}[CustomProperty] --{}", ident_text(name))?;
        }
        NodeType::Number { value } => {
            writeln!(f, "{prefix}[Number] {value}")?;
        }
        NodeType::Percentage { value } => {
            writeln!(f, "{prefix}[Percentage] {value}%")?;
        }
        NodeType::Dimension { value, unit } => {
            writeln!(f, "{prefix}[Dimension] {value}{unit}")?;
        }
        NodeType::Color { kind, value } => {
            writeln!(f, "{prefix}[Color {kind:?}] {value}")?;
        }
        NodeType::String { value, unquoted } => {
            writeln!(f, "{prefix}[String] '{value}' unquoted: {unquoted}")?;
        }
        NodeType::Delimiter { value } => {
            writeln!(f, "{prefix}[Delimiter] {value}")?;
        }
        NodeType::UnicodeRange { value } => {
            writeln!(f, "{prefix}[UnicodeRange] {value}")?;
        }
        NodeType::SupportsCondition { condition } => {
            writeln!(f, "{prefix}[SupportsCondition]")?;
            inner_walk(condition, depth + 1, f)?;
        }
        NodeType::Comment { kind, .. } => {
            writeln!(f, "{prefix}[Comment {kind:?}]")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CssParser;
    use crate::tokenizer::{Tokenizer, TokenizerOptions};
    use squish_shared::byte_stream::Location;

    #[test]
    fn walks_a_small_stylesheet() {
        let tokens = Tokenizer::tokenize_str(
            "a { color: red; }",
            Location::default(),
            TokenizerOptions::default(),
        )
        .unwrap();
        let sheet = CssParser::new(tokens, "").parse_stylesheet().unwrap();

        let dump = Walker::new(&sheet).walk_to_string();

        assert!(dump.contains("[Block Stylesheet (1)]"));
        assert!(dump.contains("[QualifiedRule]"));
        assert!(dump.contains("[Selector Type] a"));
        assert!(dump.contains("[Declaration] important: false"));
        assert!(dump.contains("[Color PredefinedName] red"));
    }
}
