mod errors;
mod file;

pub use errors::ConfigError;
pub use file::parse_config_str;

use std::fmt::Write as _;
use std::path::Path;

/// Effective configuration of one run. Boolean minification switches mirror
/// the `[css]` section of the configuration file, everything else the
/// `[general]` section. `output_to_stdout` has no file representation, it is
/// driven by the `--stdo` command line switch.
#[derive(Debug, Clone)]
pub struct Config {
    // [general]
    pub input_working_directory: String,
    pub output_working_directory: String,
    pub input_path: String,
    pub output_path: String,
    pub css_file_extensions: Vec<String>,
    pub beautify_output: bool,
    pub create_json_file: bool,
    pub json_id_object_name: String,
    pub json_class_object_name: String,
    pub json_cprop_object_name: String,
    pub json_animation_object_name: String,
    pub use_utf8_bom: bool,
    pub tab_width: u8,
    pub create_php_include_file: bool,
    pub php_id_array_name: String,
    pub php_class_array_name: String,
    pub php_cprop_array_name: String,
    pub php_animation_array_name: String,

    // [css]
    pub include_external_stylesheets: bool,
    pub remove_comments: bool,
    pub comment_terms: Vec<String>,
    pub minify_numbers: bool,
    pub minify_colors: bool,
    pub rewrite_angles: bool,
    pub use_rgba_hex_notation: bool,
    pub minify_ids: bool,
    pub minify_class_names: bool,
    pub minify_custom_properties: bool,
    pub minify_animation_names: bool,
    pub rewrite_functions: bool,
    pub remove_empty_rules: bool,
    pub merge_media_rules: bool,

    // runtime only
    pub output_to_stdout: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_working_directory: String::new(),
            output_working_directory: String::new(),
            input_path: String::new(),
            output_path: String::new(),
            css_file_extensions: vec![".css".to_string()],
            beautify_output: false,
            create_json_file: false,
            json_id_object_name: "ids".to_string(),
            json_class_object_name: "classes".to_string(),
            json_cprop_object_name: "cprops".to_string(),
            json_animation_object_name: "anims".to_string(),
            use_utf8_bom: false,
            tab_width: 4,
            create_php_include_file: false,
            php_id_array_name: String::new(),
            php_class_array_name: String::new(),
            php_cprop_array_name: String::new(),
            php_animation_array_name: String::new(),

            include_external_stylesheets: false,
            remove_comments: true,
            comment_terms: vec!["copyright".to_string(), "license".to_string()],
            minify_numbers: true,
            minify_colors: true,
            rewrite_angles: false,
            use_rgba_hex_notation: false,
            minify_ids: false,
            minify_class_names: false,
            minify_custom_properties: false,
            minify_animation_names: false,
            rewrite_functions: false,
            remove_empty_rules: true,
            merge_media_rules: false,

            output_to_stdout: false,
        }
    }
}

impl Config {
    /// Reads and applies a configuration file. A missing file leaves the
    /// defaults untouched; a present but malformed file is an error.
    pub fn read_file(&mut self, path: &str) -> Result<(), ConfigError> {
        if !Path::new(path).exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_string(),
            source,
        })?;

        parse_config_str(self, &content)?;
        self.validate_paths()
    }

    /// Working directories have to be absolute and are stored without a
    /// trailing separator.
    pub fn validate_paths(&mut self) -> Result<(), ConfigError> {
        for dir in [
            &mut self.input_working_directory,
            &mut self.output_working_directory,
        ] {
            if dir.is_empty() {
                continue;
            }

            if !Path::new(dir.as_str()).is_absolute() {
                return Err(ConfigError::Invalid(
                    "Working directories have to be absolute paths. See configuration file."
                        .to_string(),
                ));
            }

            while dir.len() > 1 && dir.ends_with('/') {
                dir.pop();
            }
        }

        Ok(())
    }

    /// Renders the effective configuration the way `--config-info` prints it.
    #[must_use]
    pub fn info(&self) -> String {
        fn fmt_str(value: &str) -> &str {
            if value.is_empty() {
                "[[empty]]"
            } else {
                value
            }
        }

        fn fmt_list(values: &[String]) -> String {
            if values.is_empty() {
                "[[empty]]".to_string()
            } else {
                values.join(" ")
            }
        }

        let mut out = String::from("Current configuration:\n\n[general]\n");
        let _ = writeln!(out, "css_file_extensions = {}", fmt_list(&self.css_file_extensions));
        let _ = writeln!(out, "input_working_directory = {}", fmt_str(&self.input_working_directory));
        let _ = writeln!(out, "output_working_directory = {}", fmt_str(&self.output_working_directory));
        let _ = writeln!(out, "input_path = {}", fmt_str(&self.input_path));
        let _ = writeln!(out, "output_path = {}", fmt_str(&self.output_path));
        let _ = writeln!(out, "json_id_object_name = {}", fmt_str(&self.json_id_object_name));
        let _ = writeln!(out, "json_class_object_name = {}", fmt_str(&self.json_class_object_name));
        let _ = writeln!(out, "json_cprop_object_name = {}", fmt_str(&self.json_cprop_object_name));
        let _ = writeln!(out, "json_animation_object_name = {}", fmt_str(&self.json_animation_object_name));
        let _ = writeln!(out, "php_id_array_name = {}", fmt_str(&self.php_id_array_name));
        let _ = writeln!(out, "php_class_array_name = {}", fmt_str(&self.php_class_array_name));
        let _ = writeln!(out, "php_cprop_array_name = {}", fmt_str(&self.php_cprop_array_name));
        let _ = writeln!(out, "php_animation_array_name = {}", fmt_str(&self.php_animation_array_name));
        let _ = writeln!(out, "tab_width = {}", self.tab_width);
        let _ = writeln!(out, "beautify_output = {}", self.beautify_output);
        let _ = writeln!(out, "create_json_file = {}", self.create_json_file);
        let _ = writeln!(out, "create_php_include_file = {}", self.create_php_include_file);
        let _ = writeln!(out, "use_utf8_bom = {}", self.use_utf8_bom);
        out.push_str("\n[css]\n");
        let _ = writeln!(out, "comment_terms = {}", fmt_list(&self.comment_terms));
        let _ = writeln!(out, "include_external_stylesheets = {}", self.include_external_stylesheets);
        let _ = writeln!(out, "remove_comments = {}", self.remove_comments);
        let _ = writeln!(out, "minify_numbers = {}", self.minify_numbers);
        let _ = writeln!(out, "minify_colors = {}", self.minify_colors);
        let _ = writeln!(out, "rewrite_angles = {}", self.rewrite_angles);
        let _ = writeln!(out, "use_rgba_hex_notation = {}", self.use_rgba_hex_notation);
        let _ = writeln!(out, "minify_ids = {}", self.minify_ids);
        let _ = writeln!(out, "minify_class_names = {}", self.minify_class_names);
        let _ = writeln!(out, "minify_custom_properties = {}", self.minify_custom_properties);
        let _ = writeln!(out, "minify_animation_names = {}", self.minify_animation_names);
        let _ = writeln!(out, "rewrite_functions = {}", self.rewrite_functions);
        let _ = writeln!(out, "remove_empty_rules = {}", self.remove_empty_rules);
        let _ = writeln!(out, "merge_media_rules = {}", self.merge_media_rules);
        out
    }

    /// The content written by `--create-config-file`.
    #[must_use]
    pub fn default_file_content() -> &'static str {
        DEFAULT_CONFIG_FILE
    }
}

const DEFAULT_CONFIG_FILE: &str = "\
# squish configuration file
#
# Boolean values are 'true' or 'false'.
# Lists are space separated.

[general]
# Absolute base directories. When set, -i and -o take relative paths.
input_working_directory =
output_working_directory =

# Default input file and output directory, used when -i/-o are not passed.
input_path =
output_path =

# Only files with one of these extensions are processed.
css_file_extensions = .css

beautify_output = false
use_utf8_bom = false
tab_width = 4

# Sidecar map with the renamed identifiers.
create_json_file = false
json_id_object_name = ids
json_class_object_name = classes
json_cprop_object_name = cprops
json_animation_object_name = anims

create_php_include_file = false
php_id_array_name =
php_class_array_name =
php_cprop_array_name =
php_animation_array_name =

[css]
include_external_stylesheets = false

remove_comments = true
# Comments containing one of these terms are kept.
comment_terms = copyright license

minify_numbers = true
minify_colors = true
rewrite_angles = false
use_rgba_hex_notation = false

minify_ids = false
minify_class_names = false
minify_custom_properties = false
minify_animation_names = false

rewrite_functions = false
remove_empty_rules = true
merge_media_rules = false
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert!(cfg.remove_comments);
        assert!(cfg.minify_numbers);
        assert!(cfg.minify_colors);
        assert!(cfg.remove_empty_rules);
        assert!(!cfg.minify_ids);
        assert_eq!(cfg.tab_width, 4);
        assert_eq!(cfg.css_file_extensions, vec![".css".to_string()]);
        assert_eq!(cfg.comment_terms, vec!["copyright".to_string(), "license".to_string()]);
    }

    #[test]
    fn default_file_parses_back_to_defaults() {
        let mut cfg = Config::default();
        parse_config_str(&mut cfg, Config::default_file_content()).unwrap();

        assert!(cfg.remove_comments);
        assert!(!cfg.beautify_output);
        assert_eq!(cfg.json_id_object_name, "ids");
        assert_eq!(cfg.tab_width, 4);
    }

    #[test]
    fn relative_working_directory_is_rejected() {
        let mut cfg = Config {
            input_working_directory: "projects/css".to_string(),
            ..Config::default()
        };
        assert!(cfg.validate_paths().is_err());
    }

    #[test]
    fn trailing_separator_is_trimmed() {
        let mut cfg = Config {
            output_working_directory: "/var/www/".to_string(),
            ..Config::default()
        };
        cfg.validate_paths().unwrap();
        assert_eq!(cfg.output_working_directory, "/var/www");
    }
}
