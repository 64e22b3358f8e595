use crate::generator::Generator;
use crate::modifier::Modifier;
use crate::node::{Node, NodeType};

impl Modifier<'_> {
    /// Merges `@media` rules that are direct children of the top-level
    /// stylesheet when their query lists are structurally equal: the later
    /// rule's block elements move into the earlier rule.
    pub(super) fn merge_media_rules(&mut self, elements: &mut Vec<Node>) {
        let mut idx = 0;

        while idx < elements.len() {
            let Some(key) = self.media_query_key(&elements[idx]) else {
                idx += 1;
                continue;
            };

            let mut probe = idx + 1;
            while probe < elements.len() {
                let matches = self
                    .media_query_key(&elements[probe])
                    .is_some_and(|other| other == key);

                if !matches {
                    probe += 1;
                    continue;
                }

                let mut donor = elements.remove(probe);
                while let Some(replacement) = donor.replacement.take() {
                    donor = *replacement;
                }

                let mut donor_elements = match *donor.node_type {
                    NodeType::AtRule { block: Some(block), .. } => match *block.node_type {
                        NodeType::Block { elements, .. } => elements,
                        _ => Vec::new(),
                    },
                    _ => Vec::new(),
                };

                let target = elements[idx].effective_mut();
                if let NodeType::AtRule { block: Some(block), .. } = &mut *target.node_type {
                    if let NodeType::Block { elements, .. } = &mut *block.node_type {
                        elements.append(&mut donor_elements);
                    }
                }
            }

            idx += 1;
        }
    }

    /// A structural comparison key for a media query list: per comma branch,
    /// the set of sub-expressions split on `and`, each rendered to text.
    /// Branch and sub-expression order do not matter.
    pub(super) fn media_query_key(&self, node: &Node) -> Option<Vec<Vec<String>>> {
        let node = node.effective();

        if !node.is_at_rule_keyword("media") {
            return None;
        }

        let NodeType::AtRule { expressions, block, .. } = &*node.node_type else {
            return None;
        };

        block.as_ref()?;

        let mut key: Vec<Vec<String>> = expressions
            .iter()
            .map(|list| {
                let mut parts: Vec<String> = Vec::new();
                let mut current = String::new();

                for element in list {
                    if element.effective().is_ident_value("and") {
                        parts.push(std::mem::take(&mut current));
                        continue;
                    }

                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(&Generator::node_text(self.tables, element));
                }
                parts.push(current);

                parts.sort();
                parts
            })
            .collect();

        key.sort();

        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use crate::modifier::Modifier;
    use crate::node::Node;
    use crate::parser::CssParser;
    use crate::rename::RenameTables;
    use crate::tokenizer::{Tokenizer, TokenizerOptions};
    use squish_config::Config;
    use squish_shared::byte_stream::Location;

    fn first_rule(css: &str) -> Node {
        let tokens =
            Tokenizer::tokenize_str(css, Location::default(), TokenizerOptions::default())
                .unwrap();
        let sheet = CssParser::new(tokens, "").parse_stylesheet().unwrap();
        let (_, elements) = sheet.as_block();
        elements[0].clone()
    }

    #[test]
    fn media_keys_compare_structurally() {
        let cfg = Config::default();
        let mut tables = RenameTables::default();
        let modifier = Modifier::new(&cfg, &mut tables);

        let a = first_rule("@media screen and (min-width:600px){}");
        let b = first_rule("@media (min-width:600px) and screen{}");
        let c = first_rule("@media print{}");

        let key_a = modifier.media_query_key(&a).unwrap();
        let key_b = modifier.media_query_key(&b).unwrap();
        let key_c = modifier.media_query_key(&c).unwrap();

        assert_eq!(key_a, key_b);
        assert_ne!(key_a, key_c);
    }

    #[test]
    fn non_media_rules_have_no_key() {
        let cfg = Config::default();
        let mut tables = RenameTables::default();
        let modifier = Modifier::new(&cfg, &mut tables);

        let rule = first_rule("a{color:red}");
        assert!(modifier.media_query_key(&rule).is_none());

        let supports = first_rule("@supports (display:grid){}");
        assert!(modifier.media_query_key(&supports).is_none());
    }
}
