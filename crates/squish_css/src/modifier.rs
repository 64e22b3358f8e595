use crate::node::{
    BlockKind, IdentValue, Node, NodeType, SelectorKind,
};
use crate::rename::{RenameTables, ShortIdCounter};
use squish_config::Config;
use squish_shared::errors::CssResult;
use std::collections::HashSet;
use std::path::PathBuf;

mod color;
mod gradient;
mod import;
mod media;
mod number;

/// Ambient position of the visitor in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModContext {
    Stylesheet,
    FunctionUrl,
    KeyframesBlock,
    AtRuleImport,
    DefaultBlock,
    CurlyBlock,
    ParenBlock,
    SquareBlock,
    DeclarationPropertyValue,
}

/// Boolean switches snapshotted from the configuration when the modifier is
/// created.
#[derive(Debug, Clone)]
pub struct ModifierFlags {
    pub output_to_stdout: bool,
    pub use_utf8_bom: bool,
    pub include_external_stylesheets: bool,
    pub remove_empty_rules: bool,
    pub minify_ids: bool,
    pub minify_class_names: bool,
    pub minify_custom_properties: bool,
    pub minify_animation_names: bool,
    pub minify_numbers: bool,
    pub minify_colors: bool,
    pub rewrite_angles: bool,
    pub use_rgba_hex_notation: bool,
    pub rewrite_functions: bool,
    pub merge_media_rules: bool,
}

impl ModifierFlags {
    #[must_use]
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            output_to_stdout: cfg.output_to_stdout,
            use_utf8_bom: cfg.use_utf8_bom,
            include_external_stylesheets: cfg.include_external_stylesheets,
            remove_empty_rules: cfg.remove_empty_rules,
            minify_ids: cfg.minify_ids,
            minify_class_names: cfg.minify_class_names,
            minify_custom_properties: cfg.minify_custom_properties,
            minify_animation_names: cfg.minify_animation_names,
            minify_numbers: cfg.minify_numbers,
            minify_colors: cfg.minify_colors,
            rewrite_angles: cfg.rewrite_angles,
            use_rgba_hex_notation: cfg.use_rgba_hex_notation,
            rewrite_functions: cfg.rewrite_functions,
            merge_media_rules: cfg.merge_media_rules,
        }
    }
}

/// What to do with the node that was just visited
enum Visit {
    Keep,
    Remove,
    /// Attach a replacement and visit it
    Replace(Node),
    /// Attach a replacement that has already been visited
    ReplaceVisited(Node),
}

/// Length units where a zero value needs no unit
const ZERO_LENGTH_UNITS: &[&str] = &[
    "px", "em", "rem", "pt", "vw", "vh", "ex", "ch", "vmin", "vmax", "cm", "mm", "Q", "in", "pc",
];

/// The modifier walks the AST after parsing and mutates it in place: number
/// and color minification, function rewrites, identifier renaming, `@import`
/// inlining, `@media` merging and empty-rule removal. One instance serves a
/// top-level file and every stylesheet it imports.
pub struct Modifier<'a> {
    cfg: &'a Config,
    flags: ModifierFlags,
    tables: &'a mut RenameTables,
    context: Vec<ModContext>,
    stylesheet_depth: usize,
    import_depth: usize,
    import_seen: HashSet<PathBuf>,
    /// Parent directories of the file currently being visited
    dir_stack: Vec<PathBuf>,
    /// The property name of the declaration currently being visited
    current_property: Option<String>,
    use_bom: bool,
    /// Console diagnostics collected during the run
    pub notes: Vec<String>,
    /// Import files read and written in separate-file mode
    pub input_files: Vec<PathBuf>,
    pub output_files: Vec<PathBuf>,
}

impl<'a> Modifier<'a> {
    #[must_use]
    pub fn new(cfg: &'a Config, tables: &'a mut RenameTables) -> Self {
        let flags = ModifierFlags::from_config(cfg);
        let use_bom = flags.use_utf8_bom;

        Self {
            cfg,
            flags,
            tables,
            context: Vec::new(),
            stylesheet_depth: 0,
            import_depth: 0,
            import_seen: HashSet::new(),
            dir_stack: Vec::new(),
            current_property: None,
            use_bom,
            notes: Vec::new(),
            input_files: Vec::new(),
            output_files: Vec::new(),
        }
    }

    /// Runs the modifier over a parsed stylesheet. `input_path` is the file
    /// the stylesheet was read from; import targets resolve against its
    /// parent directory.
    pub fn run(&mut self, stylesheet: &mut Node, input_path: &std::path::Path) -> CssResult<()> {
        let parent = input_path.parent().unwrap_or_else(|| std::path::Path::new(""));
        self.dir_stack.push(parent.to_path_buf());
        self.import_seen.insert(import::clean_path(input_path));

        let kept = self.visit_node(stylesheet)?;
        debug_assert!(kept);

        self.dir_stack.pop();

        Ok(())
    }

    /// Whether the UTF-8 byte order mark should still be written. The
    /// interactive charset conflict can switch this off during the run.
    #[must_use]
    pub fn write_utf8_bom(&self) -> bool {
        self.use_bom
    }

    fn has_context(&self, context: ModContext) -> bool {
        self.context.contains(&context)
    }

    /// Visits one node; returns false when the parent should drop it
    fn visit_node(&mut self, node: &mut Node) -> CssResult<bool> {
        // A node that already got a replacement is represented by it
        if node.replacement.is_some() {
            let mut replacement = node.replacement.take().unwrap_or_else(|| unreachable!());
            self.visit_node(&mut replacement)?;
            node.replacement = Some(replacement);
            return Ok(true);
        }

        let outcome = match &mut *node.node_type {
            NodeType::Block { kind, elements } => {
                let kind = *kind;
                self.visit_block(kind, elements)?
            }
            NodeType::AtRule { keyword, expressions, block } => {
                let keyword = keyword.clone();
                self.visit_at_rule(&keyword, expressions, block)?
            }
            NodeType::QualifiedRule { selectors, block } => {
                self.visit_qualified_rule(selectors, block)?
            }
            NodeType::Declaration { property, values, .. } => {
                self.visit_declaration(property, values)?
            }
            NodeType::Number { value } | NodeType::Percentage { value } => {
                if self.flags.minify_numbers {
                    number::minify_number(value);
                }
                Visit::Keep
            }
            NodeType::Dimension { value, unit } => self.visit_dimension(value, unit),
            NodeType::Function { name, parameters } => {
                let name = name.clone();
                self.visit_function(&name, parameters)?
            }
            NodeType::Ident { .. } => Visit::Keep,
            NodeType::CustomProperty { name } => {
                if self.flags.minify_custom_properties {
                    if let IdentValue::Literal(text) = name.clone() {
                        let id = self.tables.custom_properties.intern(&text, false);
                        *name = IdentValue::Shared(id);
                    }
                }
                Visit::Keep
            }
            NodeType::Color { kind, value } => {
                self.visit_color(kind, value);
                Visit::Keep
            }
            NodeType::String { value, unquoted } => {
                self.visit_string(value, unquoted);
                Visit::Keep
            }
            NodeType::SelectorChain { parts } => {
                for part in parts {
                    self.visit_node(part)?;
                }
                Visit::Keep
            }
            NodeType::SelectorCombinator { left, right, .. } => {
                self.visit_node(left)?;
                self.visit_node(right)?;
                Visit::Keep
            }
            NodeType::Selector { kind, name, subs } => {
                let kind = *kind;
                self.visit_selector(kind, name)?;
                for sub in subs {
                    self.visit_node(sub)?;
                }
                Visit::Keep
            }
            NodeType::SelectorAttribute { .. }
            | NodeType::Delimiter { .. }
            | NodeType::UnicodeRange { .. }
            | NodeType::SupportsCondition { .. }
            | NodeType::Comment { .. } => Visit::Keep,
        };

        match outcome {
            Visit::Keep => Ok(true),
            Visit::Remove => Ok(false),
            Visit::Replace(replacement) => {
                node.set_replacement(replacement);
                let mut replacement = node.replacement.take().unwrap_or_else(|| unreachable!());
                self.visit_node(&mut replacement)?;
                node.replacement = Some(replacement);
                Ok(true)
            }
            Visit::ReplaceVisited(replacement) => {
                node.set_replacement(replacement);
                Ok(true)
            }
        }
    }

    fn visit_block(&mut self, kind: BlockKind, elements: &mut Vec<Node>) -> CssResult<Visit> {
        let context = match kind {
            BlockKind::Stylesheet => {
                self.stylesheet_depth += 1;
                ModContext::Stylesheet
            }
            BlockKind::Curly => ModContext::CurlyBlock,
            BlockKind::Paren => ModContext::ParenBlock,
            BlockKind::Square => ModContext::SquareBlock,
            BlockKind::Default => ModContext::DefaultBlock,
        };
        self.context.push(context);

        let mut idx = 0;
        while idx < elements.len() {
            if self.visit_node(&mut elements[idx])? {
                idx += 1;
            } else {
                elements.remove(idx);
            }
        }

        if kind == BlockKind::Stylesheet {
            if self.stylesheet_depth == 1 {
                self.finish_top_level(elements);
            }
            self.stylesheet_depth -= 1;
        }

        self.context.pop();

        Ok(Visit::Keep)
    }

    /// Post-order work on the top-level stylesheet: short-id generation,
    /// undeclared-name diagnostics, the found-counters summary and `@media`
    /// merging.
    fn finish_top_level(&mut self, elements: &mut Vec<Node>) {
        if self.flags.minify_ids {
            let mut counter = ShortIdCounter::new();
            self.tables.ids.generate(&mut counter);
        }
        if self.flags.minify_class_names {
            let mut counter = ShortIdCounter::new();
            self.tables.classes.generate(&mut counter);
        }
        if self.flags.minify_custom_properties {
            let mut counter = ShortIdCounter::new();
            self.tables.custom_properties.generate(&mut counter);

            for entry in self.tables.custom_properties.undeclared() {
                self.notes.push(format!(
                    "Undeclared custom property '--{}' has been renamed to '--{}'.",
                    entry.original, entry.replacement
                ));
            }
        }
        if self.flags.minify_animation_names {
            let mut counter = ShortIdCounter::new();
            self.tables.animations.generate(&mut counter);

            for entry in self.tables.animations.undeclared() {
                self.notes.push(format!(
                    "Undeclared animation '{}' has been renamed to '{}'.",
                    entry.original, entry.replacement
                ));
            }
        }

        if self.flags.merge_media_rules {
            self.merge_media_rules(elements);
        }
    }

    fn visit_at_rule(
        &mut self,
        keyword: &str,
        expressions: &mut Vec<Vec<Node>>,
        block: &mut Option<Box<Node>>,
    ) -> CssResult<Visit> {
        if crate::vendor::maybe_prefixed_keyword(keyword, "import") {
            self.context.push(ModContext::AtRuleImport);
            let outcome = self.import_stylesheet(expressions);
            self.context.pop();
            return outcome;
        }

        if crate::vendor::maybe_prefixed_keyword(keyword, "charset") {
            return self.visit_at_rule_charset(expressions);
        }

        let is_keyframes = crate::vendor::maybe_prefixed_keyword(keyword, "keyframes");

        if let Some(block_node) = block {
            let (_, elements) = block_node.as_block();

            if elements.is_empty() {
                if self.flags.remove_empty_rules {
                    return Ok(Visit::Remove);
                }
            } else {
                if is_keyframes {
                    self.intern_keyframes_name(expressions);
                    self.context.push(ModContext::KeyframesBlock);
                }

                self.visit_node(block_node)?;

                if is_keyframes {
                    self.context.pop();
                }

                // Removing empty rules inside may have drained the block
                let (_, elements) = block_node.as_block();
                if elements.is_empty() && self.flags.remove_empty_rules {
                    return Ok(Visit::Remove);
                }
            }
        }

        for list in expressions.iter_mut() {
            for element in list.iter_mut() {
                self.visit_node(element)?;
            }
        }

        Ok(Visit::Keep)
    }

    /// With the UTF-8 BOM enabled, a `@charset "utf-8"` rule is redundant and
    /// removed. Any other charset conflicts with the BOM and the user decides.
    fn visit_at_rule_charset(&mut self, expressions: &mut [Vec<Node>]) -> CssResult<Visit> {
        let Some(charset_node) = expressions.first_mut().and_then(|list| list.first_mut()) else {
            return Ok(Visit::Keep);
        };

        let NodeType::String { value, .. } = &mut *charset_node.node_type else {
            return Ok(Visit::Keep);
        };

        *value = value.to_lowercase();
        let charset = value.clone();

        if !self.use_bom {
            return Ok(Visit::Keep);
        }

        if charset == "utf-8" {
            return Ok(Visit::Remove);
        }

        let message = format!(
            "The configuration file says, the UTF8 byte order mark should be written,\n\
             but the document specifies another encoding using a @charset rule: {charset}\n\n\
             Please decide how to act:\n\
             1. Write UTF8 BOM and remove the @charset rule\n\
             2. Don't write UTF8 BOM to the current stylesheet and preserve the @charset rule"
        );

        match request_action(&message, 2) {
            1 => {
                self.notes
                    .push("UTF8 BOM has been written.\n@charset rule has been removed.".to_string());
                Ok(Visit::Remove)
            }
            _ => {
                self.use_bom = false;
                self.notes.push(
                    "UTF8 BOM has not been written.\n@charset rule has been preserved.".to_string(),
                );
                Ok(Visit::Keep)
            }
        }
    }

    /// `@keyframes <name>` defines the animation name
    fn intern_keyframes_name(&mut self, expressions: &mut [Vec<Node>]) {
        if !self.flags.minify_animation_names {
            return;
        }

        let Some(first) = expressions.first_mut().and_then(|list| list.first_mut()) else {
            return;
        };

        if let NodeType::Ident { value } = &mut *first.node_type {
            match value.clone() {
                IdentValue::Literal(text) => {
                    let id = self.tables.animations.intern(&text, true);
                    *value = IdentValue::Shared(id);
                }
                IdentValue::Shared(id) => {
                    let original = self.tables.animations.original(id).to_string();
                    self.tables.animations.intern(&original, true);
                }
            }
        }
    }

    fn visit_qualified_rule(
        &mut self,
        selectors: &mut Vec<Node>,
        block: &mut Option<Box<Node>>,
    ) -> CssResult<Visit> {
        if let Some(block) = block {
            self.visit_node(block)?;

            let (_, elements) = block.as_block();
            if elements.is_empty() && self.flags.remove_empty_rules {
                return Ok(Visit::Remove);
            }
        }

        for selector in selectors {
            self.visit_node(selector)?;
        }

        Ok(Visit::Keep)
    }

    fn visit_declaration(
        &mut self,
        property: &mut Node,
        values: &mut Vec<Vec<Node>>,
    ) -> CssResult<Visit> {
        // z-index expects an integer value, keep it untouched
        if property.is_ident_value("z-index") {
            return Ok(Visit::Keep);
        }

        let property_name = match &*property.node_type {
            NodeType::Ident { value: IdentValue::Literal(name) } => Some(name.clone()),
            _ => None,
        };

        self.current_property = property_name.clone();
        self.context.push(ModContext::DeclarationPropertyValue);

        for list in values.iter_mut() {
            let mut idx = 0;
            while idx < list.len() {
                if self.visit_node(&mut list[idx])? {
                    idx += 1;
                } else {
                    list.remove(idx);
                }
            }
        }

        self.context.pop();
        self.current_property = None;

        // A custom property declaration defines the name
        if property.is_custom_property() {
            if self.flags.minify_custom_properties {
                if let NodeType::CustomProperty { name } = &mut *property.node_type {
                    if let IdentValue::Literal(text) = name.clone() {
                        let id = self.tables.custom_properties.intern(&text, true);
                        *name = IdentValue::Shared(id);
                    } else if let IdentValue::Shared(id) = name {
                        // Interned through a prior reference; mark defined
                        let original = self.tables.custom_properties.original(*id).to_string();
                        self.tables.custom_properties.intern(&original, true);
                    }
                }
            }
        } else if matches!(property_name.as_deref(), Some("animation" | "animation-name")) {
            self.intern_animation_value(values);
        }

        if matches!(
            property_name.as_deref(),
            Some("margin" | "padding" | "border-width" | "border-radius")
        ) {
            self.collapse_shorthand(values);
        }

        Ok(Visit::Keep)
    }

    /// The first value of `animation`/`animation-name` is the animation name
    fn intern_animation_value(&mut self, values: &mut [Vec<Node>]) {
        if !self.flags.minify_animation_names {
            return;
        }

        let Some(first) = values.first_mut().and_then(|list| list.first_mut()) else {
            return;
        };

        if let NodeType::Ident { value } = &mut *first.node_type {
            if let IdentValue::Literal(text) = value.clone() {
                if text == "none" {
                    return;
                }
                let id = self.tables.animations.intern(&text, false);
                *value = IdentValue::Shared(id);
            }
        }
    }

    /// `margin: 10px 20px 10px 20px` and friends collapse by the CSS
    /// shorthand rules. Values compare by their minified text.
    fn collapse_shorthand(&mut self, values: &mut Vec<Vec<Node>>) {
        if values.len() != 1 {
            return;
        }

        let list = &mut values[0];
        let texts: Vec<String> = list
            .iter()
            .map(|v| crate::generator::Generator::node_text(self.tables, v))
            .collect();

        match texts.len() {
            2 => {
                if texts[0] == texts[1] {
                    list.truncate(1);
                }
            }
            3 => {
                if texts[0] == texts[2] {
                    if texts[0] == texts[1] {
                        list.truncate(1);
                    } else {
                        list.truncate(2);
                    }
                }
            }
            4 => {
                if texts[0] == texts[2] && texts[1] == texts[3] {
                    if texts[0] == texts[3] {
                        list.truncate(1);
                    } else {
                        list.truncate(2);
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_dimension(&mut self, value: &mut crate::node::NumberValue, unit: &mut String) -> Visit {
        if self.flags.minify_numbers {
            number::minify_number(value);
        }

        if self.has_context(ModContext::DeclarationPropertyValue) {
            // A zero length needs no unit
            if value.is("0") && ZERO_LENGTH_UNITS.contains(&unit.as_str()) {
                return Visit::Replace(Node::new(
                    NodeType::Number { value: value.clone() },
                    squish_shared::byte_stream::Location::default(),
                ));
            }

            // 100ms => .1s, 250ms => .25s
            if unit.as_str() == "ms" && value.scientific.is_none() {
                let digits = value.value.clone();
                if digits.len() == 3 && digits.ends_with('0') && !digits.starts_with('0') {
                    let mut new_number = String::from(".");
                    new_number.push(digits.as_bytes()[0] as char);
                    if digits.as_bytes()[1] != b'0' {
                        new_number.push(digits.as_bytes()[1] as char);
                    }

                    value.value = new_number;
                    *unit = "s".to_string();
                }
            }

            if self.flags.rewrite_angles {
                number::minify_angle(value, unit);
            }
        }

        Visit::Keep
    }

    fn visit_function(
        &mut self,
        name: &str,
        parameters: &mut Vec<Vec<Node>>,
    ) -> CssResult<Visit> {
        // Unquoted URL strings depend on knowing they are inside url()
        if name == "url" {
            self.context.push(ModContext::FunctionUrl);
        }

        for list in parameters.iter_mut() {
            for element in list.iter_mut() {
                self.visit_node(element)?;
            }
        }

        if name == "url" {
            self.context.pop();
        }

        if !self.flags.rewrite_functions {
            return Ok(Visit::Keep);
        }

        match name {
            "hsl" | "hsla" => Ok(self.rewrite_hsl_function(name, parameters)),
            "rgb" | "rgba" => Ok(self.rewrite_rgb_function(parameters)),
            "linear-gradient" => {
                self.rewrite_linear_gradient(parameters);
                Ok(Visit::Keep)
            }
            _ => Ok(Visit::Keep),
        }
    }

    fn visit_selector(&mut self, kind: SelectorKind, name: &mut IdentValue) -> CssResult<()> {
        // Keyframe selectors have two spellings each; use the short one
        if self.has_context(ModContext::KeyframesBlock) && kind == SelectorKind::Keyframes {
            if let IdentValue::Literal(text) = name {
                if text.as_str() == "from" {
                    *name = IdentValue::literal("0%");
                } else if text.as_str() == "100%" {
                    *name = IdentValue::literal("to");
                }
            }
        }

        match kind {
            SelectorKind::Id => {
                if let IdentValue::Literal(text) = name.clone() {
                    let id = self.tables.ids.intern(&text, true);
                    *name = IdentValue::Shared(id);
                }
            }
            SelectorKind::Class => {
                if let IdentValue::Literal(text) = name.clone() {
                    let id = self.tables.classes.intern(&text, true);
                    *name = IdentValue::Shared(id);
                }
            }
            SelectorKind::AnPlusB => {
                if let IdentValue::Literal(text) = name {
                    if text.as_str() == "even" {
                        *name = IdentValue::literal("2n");
                    } else if text.as_str() == "2n+1" {
                        *name = IdentValue::literal("odd");
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn visit_string(&mut self, value: &str, unquoted: &mut bool) {
        // Inside url() the quotes can go when the content stays unambiguous
        if self.has_context(ModContext::FunctionUrl) {
            *unquoted = !value.is_empty()
                && !value.chars().any(|c| {
                    matches!(c, '"' | '\'' | '(' | ')' | '\\') || c.is_whitespace()
                });
        }
    }
}

/// Interactive two-way prompt used for the charset/BOM conflict. Invalid
/// input re-prompts.
fn request_action(message: &str, number_of_choices: u8) -> u8 {
    use std::io::Write;

    println!("{message}");

    loop {
        let choices = (1..=number_of_choices)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("/");
        print!("Your choice ({choices}): ");
        let _ = std::io::stdout().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err() {
            return number_of_choices;
        }

        let choice: u8 = input.trim().parse().unwrap_or(0);
        if choice == 0 || choice > number_of_choices {
            println!("Invalid input: '{}'", input.trim());
            continue;
        }

        return choice;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_snapshot_matches_config() {
        let cfg = Config {
            minify_ids: true,
            rewrite_functions: true,
            ..Config::default()
        };

        let flags = ModifierFlags::from_config(&cfg);
        assert!(flags.minify_ids);
        assert!(flags.rewrite_functions);
        assert!(!flags.minify_class_names);
        assert!(flags.remove_empty_rules);
    }
}
