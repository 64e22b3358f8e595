use crate::rename::NameId;
use squish_shared::byte_stream::Location;
use std::fmt::{Display, Formatter};

/// The numeric payload shared by numbers, percentages and dimensions: the
/// digit text as written, the sign, and an optional scientific postfix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberValue {
    pub value: String,
    pub negative: bool,
    pub scientific: Option<String>,
}

impl NumberValue {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            negative: false,
            scientific: None,
        }
    }

    #[must_use]
    pub fn is(&self, value: &str) -> bool {
        !self.negative && self.scientific.is_none() && self.value == value
    }
}

impl Display for NumberValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "{}", self.value)?;
        if let Some(postfix) = &self.scientific {
            write!(f, "{postfix}")?;
        }
        Ok(())
    }
}

/// An identifier value: either plain text, or a shared cell in one of the
/// rename tables. Renaming writes the table cell once and every site holding
/// the id observes the new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentValue {
    Literal(String),
    Shared(NameId),
}

impl IdentValue {
    #[must_use]
    pub fn literal(value: &str) -> Self {
        IdentValue::Literal(value.to_string())
    }

    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            IdentValue::Literal(value) => Some(value),
            IdentValue::Shared(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Stylesheet,
    Curly,
    Square,
    Paren,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    None,
    Universal,
    Type,
    Id,
    Class,
    PseudoClass,
    AnPlusB,
    PseudoElement,
    Keyframes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorKind {
    Descendancy,
    Child,
    NextSibling,
    SubsequentSibling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperation {
    None,
    Equal,
    RoofEqual,
    DollarEqual,
    PipeEqual,
    TildeEqual,
    AsteriskEqual,
}

impl AttributeOperation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeOperation::None => "",
            AttributeOperation::Equal => "=",
            AttributeOperation::RoofEqual => "^=",
            AttributeOperation::DollarEqual => "$=",
            AttributeOperation::PipeEqual => "|=",
            AttributeOperation::TildeEqual => "~=",
            AttributeOperation::AsteriskEqual => "*=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKind {
    PredefinedName,
    HexLiteral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Comment,
    CdataStart,
    CdataEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    /// `@keyword prelude { block }` or `@keyword prelude;`. The keyword keeps
    /// its vendor prefix; the prelude is a list of comma separated expression
    /// lists.
    AtRule {
        keyword: String,
        expressions: Vec<Vec<Node>>,
        block: Option<Box<Node>>,
    },
    QualifiedRule {
        selectors: Vec<Node>,
        block: Option<Box<Node>>,
    },
    Block {
        kind: BlockKind,
        elements: Vec<Node>,
    },
    /// The property is an `Ident` or `CustomProperty` node; values are comma
    /// separated lists of space separated nodes. `hack` holds a non-standard
    /// `!<ident>` suffix.
    Declaration {
        property: Box<Node>,
        values: Vec<Vec<Node>>,
        important: bool,
        hack: Option<String>,
    },
    /// One simple selector. Pseudo-classes and An+B selectors carry their
    /// arguments in `subs`.
    Selector {
        kind: SelectorKind,
        name: IdentValue,
        subs: Vec<Node>,
    },
    /// A compound selector: an ordered run of simple selectors. An omitted
    /// leading type selector is an implicit universal head part.
    SelectorChain {
        parts: Vec<Node>,
    },
    SelectorAttribute {
        name: String,
        value: String,
        operation: AttributeOperation,
        insensitive: bool,
    },
    /// Left-associative combinator tree over chains
    SelectorCombinator {
        kind: CombinatorKind,
        left: Box<Node>,
        right: Box<Node>,
    },
    Function {
        name: String,
        parameters: Vec<Vec<Node>>,
    },
    Ident {
        value: IdentValue,
    },
    /// Stored without the leading `--`
    CustomProperty {
        name: IdentValue,
    },
    Number {
        value: NumberValue,
    },
    Percentage {
        value: NumberValue,
    },
    Dimension {
        value: NumberValue,
        unit: String,
    },
    /// Hex values are stored lowercase and without the `#` marker
    Color {
        kind: ColorKind,
        value: String,
    },
    String {
        value: String,
        unquoted: bool,
    },
    Delimiter {
        value: char,
    },
    UnicodeRange {
        value: String,
    },
    /// `supports(declaration)` inside an `@import`/`@supports` prelude
    SupportsCondition {
        condition: Box<Node>,
    },
    Comment {
        kind: CommentKind,
        value: String,
    },
}

/// A node is a single element in the AST. The optional replacement is a
/// rewrite-in-place marker: when present, later visitors use it instead of
/// the node itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub node_type: Box<NodeType>,
    pub location: Location,
    pub replacement: Option<Box<Node>>,
}

impl Node {
    #[must_use]
    pub fn new(node_type: NodeType, location: Location) -> Self {
        Self {
            node_type: Box::new(node_type),
            location,
            replacement: None,
        }
    }

    pub fn set_replacement(&mut self, node: Node) {
        self.replacement = Some(Box::new(node));
    }

    /// Resolves the replacement chain to the node that should be visited
    #[must_use]
    pub fn effective(&self) -> &Node {
        let mut node = self;
        while let Some(replacement) = &node.replacement {
            node = replacement;
        }
        node
    }

    /// Mutable access to the end of the replacement chain
    pub fn effective_mut(&mut self) -> &mut Node {
        if self.replacement.is_some() {
            let Some(replacement) = self.replacement.as_mut() else {
                unreachable!()
            };
            return replacement.effective_mut();
        }
        self
    }

    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(&*self.node_type, NodeType::Block { .. })
    }

    #[must_use]
    pub fn as_block(&self) -> (&BlockKind, &Vec<Node>) {
        match &*self.node_type {
            NodeType::Block { kind, elements } => (kind, elements),
            _ => panic!("Node is not a block"),
        }
    }

    #[must_use]
    pub fn is_stylesheet(&self) -> bool {
        matches!(&*self.node_type, NodeType::Block { kind: BlockKind::Stylesheet, .. })
    }

    #[must_use]
    pub fn is_at_rule(&self) -> bool {
        matches!(&*self.node_type, NodeType::AtRule { .. })
    }

    /// Returns true when this is an at-rule with the given unprefixed keyword
    #[must_use]
    pub fn is_at_rule_keyword(&self, unprefixed: &str) -> bool {
        match &*self.node_type {
            NodeType::AtRule { keyword, .. } => {
                crate::vendor::maybe_prefixed_keyword(keyword, unprefixed)
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_qualified_rule(&self) -> bool {
        matches!(&*self.node_type, NodeType::QualifiedRule { .. })
    }

    #[must_use]
    pub fn is_declaration(&self) -> bool {
        matches!(&*self.node_type, NodeType::Declaration { .. })
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(&*self.node_type, NodeType::Comment { .. })
    }

    #[must_use]
    pub fn is_ident(&self) -> bool {
        matches!(&*self.node_type, NodeType::Ident { .. })
    }

    /// Compares an identifier node against plain text
    #[must_use]
    pub fn is_ident_value(&self, value: &str) -> bool {
        match &*self.node_type {
            NodeType::Ident { value: IdentValue::Literal(v) } => v == value,
            _ => false,
        }
    }

    #[must_use]
    pub fn as_ident(&self) -> &IdentValue {
        match &*self.node_type {
            NodeType::Ident { value } => value,
            _ => panic!("Node is not an ident"),
        }
    }

    #[must_use]
    pub fn is_custom_property(&self) -> bool {
        matches!(&*self.node_type, NodeType::CustomProperty { .. })
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(&*self.node_type, NodeType::Number { .. })
    }

    #[must_use]
    pub fn as_number(&self) -> &NumberValue {
        match &*self.node_type {
            NodeType::Number { value } => value,
            _ => panic!("Node is not a number"),
        }
    }

    #[must_use]
    pub fn is_percentage(&self) -> bool {
        matches!(&*self.node_type, NodeType::Percentage { .. })
    }

    #[must_use]
    pub fn as_percentage(&self) -> &NumberValue {
        match &*self.node_type {
            NodeType::Percentage { value } => value,
            _ => panic!("Node is not a percentage"),
        }
    }

    #[must_use]
    pub fn is_dimension(&self) -> bool {
        matches!(&*self.node_type, NodeType::Dimension { .. })
    }

    #[must_use]
    pub fn as_dimension(&self) -> (&NumberValue, &String) {
        match &*self.node_type {
            NodeType::Dimension { value, unit } => (value, unit),
            _ => panic!("Node is not a dimension"),
        }
    }

    #[must_use]
    pub fn is_delimiter(&self, value: char) -> bool {
        matches!(&*self.node_type, NodeType::Delimiter { value: v } if *v == value)
    }

    #[must_use]
    pub fn is_any_delimiter(&self) -> bool {
        matches!(&*self.node_type, NodeType::Delimiter { .. })
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(&*self.node_type, NodeType::String { .. })
    }

    #[must_use]
    pub fn as_string(&self) -> &str {
        match &*self.node_type {
            NodeType::String { value, .. } => value,
            _ => panic!("Node is not a string"),
        }
    }

    #[must_use]
    pub fn is_function(&self) -> bool {
        matches!(&*self.node_type, NodeType::Function { .. })
    }

    /// Returns true when this is a function with the given name
    #[must_use]
    pub fn is_function_name(&self, name: &str) -> bool {
        matches!(&*self.node_type, NodeType::Function { name: n, .. } if n == name)
    }

    #[must_use]
    pub fn is_selector(&self) -> bool {
        matches!(&*self.node_type, NodeType::Selector { .. })
    }

    #[must_use]
    pub fn is_selector_kind(&self, kind: SelectorKind) -> bool {
        matches!(&*self.node_type, NodeType::Selector { kind: k, .. } if *k == kind)
    }

    #[must_use]
    pub fn is_selector_chain(&self) -> bool {
        matches!(&*self.node_type, NodeType::SelectorChain { .. })
    }

    #[must_use]
    pub fn is_combinator(&self) -> bool {
        matches!(&*self.node_type, NodeType::SelectorCombinator { .. })
    }

    #[must_use]
    pub fn is_color(&self) -> bool {
        matches!(&*self.node_type, NodeType::Color { .. })
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match &*self.node_type {
            NodeType::Ident { value: IdentValue::Literal(v) } => v.clone(),
            NodeType::Ident { .. } => String::from("<shared>"),
            NodeType::CustomProperty { name: IdentValue::Literal(v) } => format!("--{v}"),
            NodeType::CustomProperty { .. } => String::from("--<shared>"),
            NodeType::Number { value } => value.to_string(),
            NodeType::Percentage { value } => format!("{value}%"),
            NodeType::Dimension { value, unit } => format!("{value}{unit}"),
            NodeType::Color { kind: ColorKind::HexLiteral, value } => format!("#{value}"),
            NodeType::Color { value, .. } => value.clone(),
            NodeType::String { value, .. } => value.clone(),
            NodeType::Delimiter { value } => value.to_string(),
            NodeType::UnicodeRange { value } => value.clone(),
            NodeType::Function { name, .. } => format!("{name}(…)"),
            NodeType::AtRule { keyword, .. } => format!("@{keyword}"),
            _ => String::new(),
        };

        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_value_display() {
        let mut n = NumberValue::new("10");
        assert_eq!(n.to_string(), "10");

        n.negative = true;
        n.scientific = Some("e4".to_string());
        assert_eq!(n.to_string(), "-10e4");
    }

    #[test]
    fn effective_follows_replacement_chain() {
        let mut node = Node::new(
            NodeType::Number { value: NumberValue::new("1") },
            Location::default(),
        );
        assert!(std::ptr::eq(node.effective(), &node));

        node.set_replacement(Node::new(
            NodeType::Number { value: NumberValue::new("2") },
            Location::default(),
        ));
        assert_eq!(node.effective().as_number().value, "2");
    }

    #[test]
    fn at_rule_keyword_matches_prefixed() {
        let node = Node::new(
            NodeType::AtRule {
                keyword: "-webkit-keyframes".to_string(),
                expressions: vec![],
                block: None,
            },
            Location::default(),
        );

        assert!(node.is_at_rule_keyword("keyframes"));
        assert!(!node.is_at_rule_keyword("media"));
    }
}
