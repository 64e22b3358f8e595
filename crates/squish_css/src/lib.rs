pub mod colors;
pub mod generator;
pub mod modifier;
pub mod node;
pub mod parser;
pub mod rename;
pub mod sidecar;
pub mod tokenizer;
pub mod vendor;
pub mod walker;

use crate::generator::{Generator, OUTPUT_FILE_HEADER};
use crate::modifier::Modifier;
use crate::parser::CssParser;
use crate::rename::RenameTables;
use crate::tokenizer::{Tokenizer, TokenizerOptions};
use squish_config::Config;
use squish_shared::byte_stream::Location;
use squish_shared::errors::CssResult;
use std::path::{Path, PathBuf};

/// The result of minifying one top-level stylesheet
#[derive(Debug)]
pub struct MinifyOutcome {
    /// The minified (or beautified) stylesheet text
    pub output: String,
    /// The four rename tables accumulated over the run
    pub tables: RenameTables,
    /// Console diagnostics collected along the way
    pub notes: Vec<String>,
    /// Import files read in separate-file mode
    pub input_files: Vec<PathBuf>,
    /// Import files written in separate-file mode
    pub output_files: Vec<PathBuf>,
}

/// The four-stage pipeline: tokenize, parse, modify, generate. One instance
/// serves one top-level input file.
pub struct CssMinifier<'a> {
    cfg: &'a Config,
}

impl<'a> CssMinifier<'a> {
    #[must_use]
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    /// Runs the pipeline over stylesheet text. `input_path` names the file
    /// the text came from; `@import` targets resolve against its parent
    /// directory.
    pub fn minify_str(&self, content: &str, input_path: &Path) -> CssResult<MinifyOutcome> {
        let file_name = input_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let options = TokenizerOptions {
            remove_comments: self.cfg.remove_comments,
            comment_terms: self.cfg.comment_terms.clone(),
            tab_width: self.cfg.tab_width,
        };

        let tokens = Tokenizer::tokenize_str(content, Location::default(), options)?;
        let mut ast = CssParser::new(tokens, &file_name).parse_stylesheet()?;

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("parse tree of {file_name}:\n{}", crate::walker::Walker::new(&ast).walk_to_string());
        }

        let mut tables = RenameTables::default();
        let mut modifier = Modifier::new(self.cfg, &mut tables);
        modifier.run(&mut ast, input_path)?;

        let write_bom = modifier.write_utf8_bom();
        let notes = std::mem::take(&mut modifier.notes);
        let input_files = std::mem::take(&mut modifier.input_files);
        let output_files = std::mem::take(&mut modifier.output_files);
        drop(modifier);

        let mut output = Generator::new(&tables, self.cfg.beautify_output).generate(&ast);

        // The output must never exceed the input; the header goes first
        if !self.cfg.beautify_output && output.len() > content.len() {
            if let Some(stripped) = output.strip_prefix(OUTPUT_FILE_HEADER) {
                output = stripped.strip_prefix('\n').unwrap_or(stripped).to_string();
            }
        }

        if write_bom {
            output.insert_str(0, "\u{feff}");
        }

        Ok(MinifyOutcome {
            output,
            tables,
            notes,
            input_files,
            output_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minify(content: &str) -> String {
        let cfg = Config::default();
        let outcome = CssMinifier::new(&cfg)
            .minify_str(content, Path::new("test.css"))
            .expect("pipeline error");
        outcome.output
    }

    fn body(output: &str) -> &str {
        output
            .strip_prefix(OUTPUT_FILE_HEADER)
            .map(|rest| rest.strip_prefix('\n').unwrap_or(rest))
            .unwrap_or(output)
    }

    #[test]
    fn pipeline_minifies_a_rule() {
        let out = minify("a {\n  color: #ffffff;\n  margin: 0px 0px 0px 0px;\n}\n");
        assert_eq!(body(&out), "a{color:#fff;margin:0}");
    }

    #[test]
    fn minification_is_idempotent() {
        let first = minify(".a { padding: 10px 20px 10px 20px; color: rgb(255, 0, 0); }");
        let second = minify(&first);
        assert_eq!(first, second);
    }

    #[test]
    fn header_is_stripped_when_output_would_grow() {
        // Tiny input: the header alone would make the output larger
        let out = minify("a{color:red}");
        assert_eq!(out, "a{color:red}");
    }
}
