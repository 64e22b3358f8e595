use crate::generator::Generator;
use crate::modifier::{Modifier, Visit};
use crate::node::{BlockKind, Node, NodeType};
use crate::parser::CssParser;
use crate::tokenizer::{Tokenizer, TokenizerOptions};
use squish_shared::byte_stream::Location;
use squish_shared::errors::{CssError, CssResult, FileError};
use std::path::{Component, Path, PathBuf};

/// Bound on nested `@import` levels; a deeper graph is treated as runaway
const MAX_IMPORT_DEPTH: usize = 16;

/// Lexical path normalization: resolves `.` and `..` without touching the
/// filesystem.
pub(crate) fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }

    out
}

fn file_error(error: &FileError) -> CssError {
    CssError::new(&error.to_string())
}

impl Modifier<'_> {
    /// Handles one `@import` at-rule. Inline mode splices the imported
    /// stylesheet in place of the rule (wrapped in a synthetic `@media` when
    /// the import carries media expressions); separate-file mode writes the
    /// minified import next to the main output and keeps the rule.
    pub(super) fn import_stylesheet(
        &mut self,
        expressions: &mut [Vec<Node>],
    ) -> CssResult<Visit> {
        let Some(target) = import_target(expressions) else {
            return Ok(Visit::Keep);
        };

        if target.starts_with('/') {
            return Err(CssError::new(&format!(
                "Absolute @import path '{target}'. Consider using relative path."
            )));
        }

        let base = self.dir_stack.last().cloned().unwrap_or_default();
        let absolute = clean_path(&base.join(&target));

        if self.import_seen.contains(&absolute) {
            return Err(CssError::new(&format!(
                "Circular @import of '{}'",
                absolute.display()
            )));
        }

        if self.import_depth >= MAX_IMPORT_DEPTH {
            return Err(CssError::new(&format!(
                "More than {MAX_IMPORT_DEPTH} nested @import levels at '{target}'"
            )));
        }

        let base_name = absolute
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| target.clone());
        let indentation = "> ".repeat(self.import_depth + 1);

        if !self.flags.output_to_stdout {
            self.notes
                .push(format!("{indentation}Processing import file '{base_name}'"));
        }

        if !absolute.exists() {
            return Err(file_error(&FileError::Missing {
                path: absolute.display().to_string(),
            }));
        }

        let content = std::fs::read_to_string(&absolute).map_err(|source| {
            file_error(&FileError::Unreadable {
                path: absolute.display().to_string(),
                source,
            })
        })?;

        self.input_files.push(absolute.clone());

        let options = TokenizerOptions {
            remove_comments: self.cfg.remove_comments,
            comment_terms: self.cfg.comment_terms.clone(),
            tab_width: self.cfg.tab_width,
        };
        let tokens = Tokenizer::tokenize_str(&content, Location::default(), options)?;
        let mut ast = CssParser::new(tokens, &base_name).parse_stylesheet()?;

        self.import_depth += 1;
        self.import_seen.insert(absolute.clone());
        self.dir_stack.push(
            absolute
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .to_path_buf(),
        );

        let outcome = if self.flags.include_external_stylesheets {
            self.splice_import(expressions, ast)
        } else {
            self.write_import_file(&mut ast, &absolute, &base_name, &indentation)
        };

        self.dir_stack.pop();
        self.import_seen.remove(&absolute);
        self.import_depth -= 1;

        outcome
    }

    /// Inline mode: the imported tree replaces the at-rule. A media query on
    /// the import becomes a synthetic `@media` wrapper holding every media
    /// sub-expression (only the import target itself is left out).
    fn splice_import(&mut self, expressions: &[Vec<Node>], mut ast: Node) -> CssResult<Visit> {
        let mut media_expressions: Vec<Vec<Node>> = Vec::new();
        for (list_idx, list) in expressions.iter().enumerate() {
            let mut media_list = Vec::new();
            for (idx, element) in list.iter().enumerate() {
                // The first expression of the first list is the import
                // target, not a media query
                if list_idx == 0 && idx == 0 {
                    continue;
                }
                if matches!(&*element.node_type, NodeType::SupportsCondition { .. }) {
                    continue;
                }
                media_list.push(element.clone());
            }

            if !media_list.is_empty() {
                media_expressions.push(media_list);
            }
        }

        let mut replacement = if media_expressions.is_empty() {
            set_block_kind(&mut ast, BlockKind::Default);
            ast
        } else {
            set_block_kind(&mut ast, BlockKind::Curly);

            let location = ast.location;
            Node::new(
                NodeType::AtRule {
                    keyword: "media".to_string(),
                    expressions: media_expressions,
                    block: Some(Box::new(ast)),
                },
                location,
            )
        };

        self.visit_node(&mut replacement)?;

        Ok(Visit::ReplaceVisited(replacement))
    }

    /// Separate-file mode: the import is minified into its own output file
    /// mirroring the input layout, and the `@import` rule stays.
    fn write_import_file(
        &mut self,
        ast: &mut Node,
        absolute: &Path,
        base_name: &str,
        indentation: &str,
    ) -> CssResult<Visit> {
        self.visit_node(ast)?;

        let mut output = Generator::new(self.tables, self.cfg.beautify_output).generate(ast);
        if self.use_bom {
            output.insert_str(0, "\u{feff}");
        }

        let relative = if !self.cfg.input_working_directory.is_empty() {
            absolute
                .strip_prefix(&self.cfg.input_working_directory)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(base_name))
        } else {
            let top_parent = self.dir_stack.first().cloned().unwrap_or_default();
            absolute
                .strip_prefix(&top_parent)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(base_name))
        };

        let output_root = clean_path(Path::new(&self.cfg.output_path));
        let output_path = clean_path(&output_root.join(relative));

        if !output_path.starts_with(&output_root) {
            return Err(CssError::new(&format!(
                "The output path '{}' leaves the output directory.\n\
                 Consider to use input/output working directory to build the correct directory structure.\n\
                 See configuration file.",
                output_path.display()
            )));
        }

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| {
                file_error(&FileError::CreateFailed {
                    path: parent.display().to_string(),
                    source,
                })
            })?;
        }

        std::fs::write(&output_path, output).map_err(|source| {
            file_error(&FileError::Unwritable {
                path: output_path.display().to_string(),
                source,
            })
        })?;

        self.output_files.push(output_path);

        if !self.flags.output_to_stdout {
            self.notes
                .push(format!("{indentation}[Done] Processing import file '{base_name}'"));
        }

        Ok(Visit::Keep)
    }
}

/// The import target: a plain string or `url(...)` in the first expression
fn import_target(expressions: &[Vec<Node>]) -> Option<String> {
    let first = expressions.first()?.first()?;

    match &*first.node_type {
        NodeType::String { value, .. } => Some(value.clone()),
        NodeType::Function { name, parameters } if name == "url" => {
            let argument = parameters.first()?.first()?;
            match &*argument.node_type {
                NodeType::String { value, .. } => Some(value.clone()),
                _ => None,
            }
        }
        _ => None,
    }
}

fn set_block_kind(node: &mut Node, new_kind: BlockKind) {
    if let NodeType::Block { kind, .. } = &mut *node.node_type {
        *kind = new_kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_path_resolves_dots() {
        assert_eq!(
            clean_path(Path::new("/a/b/../c/./d.css")),
            PathBuf::from("/a/c/d.css")
        );
        assert_eq!(clean_path(Path::new("a/./b.css")), PathBuf::from("a/b.css"));
        assert_eq!(
            clean_path(Path::new("../x/y.css")),
            PathBuf::from("../x/y.css")
        );
    }
}
