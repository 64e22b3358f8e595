use crate::{Config, ConfigError};

/// Parses an INI-style configuration file into `cfg`.
///
/// The format is line based: `[section]` headers, `key = value` pairs and
/// `#` comment lines. Three value types exist: booleans (`true`/`false`),
/// space separated lists and unsigned numbers. Every violation is fatal and
/// reported with its row and column.
pub fn parse_config_str(cfg: &mut Config, content: &str) -> Result<(), ConfigError> {
    let mut section = String::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_number = idx as u64 + 1;
        let line = raw_line;

        let Some(first) = line.find(|c: char| !c.is_whitespace()) else {
            continue;
        };
        let column = first as u64 + 1;
        let trimmed = line[first..].trim_end();

        if trimmed.starts_with('#') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let Some(end) = rest.find(']') else {
                return Err(ConfigError::parse(
                    "Unclosed header identificator.",
                    line_number,
                    column + 1,
                ));
            };

            let header = rest[..end].trim();
            if header.is_empty() {
                return Err(ConfigError::parse(
                    "Empty header not allowed.",
                    line_number,
                    column,
                ));
            }

            section = header.to_string();
            continue;
        }

        let key_start = trimmed.chars().next().unwrap_or(' ');
        if !key_start.is_ascii_lowercase() {
            return Err(ConfigError::parse(
                format!("Not allowed character '{key_start}'."),
                line_number,
                column,
            ));
        }

        let (key, value) = match trimmed.split_once('=') {
            Some((key, value)) => {
                // Strip a trailing comment from the value
                let value = value.split('#').next().unwrap_or("");
                (key.trim(), value.trim())
            }
            None => {
                let key = trimmed.split('#').next().unwrap_or("").trim();
                if key.contains(char::is_whitespace) {
                    return Err(ConfigError::parse("Expected '='.", line_number, column));
                }
                (key, "")
            }
        };

        apply(cfg, &section, key, value, line_number, column)?;
    }

    Ok(())
}

fn apply(
    cfg: &mut Config,
    section: &str,
    key: &str,
    value: &str,
    line: u64,
    column: u64,
) -> Result<(), ConfigError> {
    let string_slot: Option<&mut String> = match (section, key) {
        ("general", "input_working_directory") => Some(&mut cfg.input_working_directory),
        ("general", "output_working_directory") => Some(&mut cfg.output_working_directory),
        ("general", "input_path") => Some(&mut cfg.input_path),
        ("general", "output_path") => Some(&mut cfg.output_path),
        ("general", "json_id_object_name") => Some(&mut cfg.json_id_object_name),
        ("general", "json_class_object_name") => Some(&mut cfg.json_class_object_name),
        ("general", "json_cprop_object_name") => Some(&mut cfg.json_cprop_object_name),
        ("general", "json_animation_object_name") => Some(&mut cfg.json_animation_object_name),
        ("general", "php_id_array_name") => Some(&mut cfg.php_id_array_name),
        ("general", "php_class_array_name") => Some(&mut cfg.php_class_array_name),
        ("general", "php_cprop_array_name") => Some(&mut cfg.php_cprop_array_name),
        ("general", "php_animation_array_name") => Some(&mut cfg.php_animation_array_name),
        _ => None,
    };

    if let Some(slot) = string_slot {
        *slot = value.to_string();
        return Ok(());
    }

    let bool_slot: Option<&mut bool> = match (section, key) {
        ("general", "beautify_output") => Some(&mut cfg.beautify_output),
        ("general", "create_json_file") => Some(&mut cfg.create_json_file),
        ("general", "use_utf8_bom") => Some(&mut cfg.use_utf8_bom),
        ("general", "create_php_include_file") => Some(&mut cfg.create_php_include_file),
        ("css", "include_external_stylesheets") => Some(&mut cfg.include_external_stylesheets),
        ("css", "remove_comments") => Some(&mut cfg.remove_comments),
        ("css", "minify_numbers") => Some(&mut cfg.minify_numbers),
        ("css", "minify_colors") => Some(&mut cfg.minify_colors),
        ("css", "rewrite_angles") => Some(&mut cfg.rewrite_angles),
        ("css", "use_rgba_hex_notation") => Some(&mut cfg.use_rgba_hex_notation),
        ("css", "minify_ids") => Some(&mut cfg.minify_ids),
        ("css", "minify_class_names") => Some(&mut cfg.minify_class_names),
        ("css", "minify_custom_properties") => Some(&mut cfg.minify_custom_properties),
        ("css", "minify_animation_names") => Some(&mut cfg.minify_animation_names),
        ("css", "rewrite_functions") => Some(&mut cfg.rewrite_functions),
        ("css", "remove_empty_rules") => Some(&mut cfg.remove_empty_rules),
        ("css", "merge_media_rules") => Some(&mut cfg.merge_media_rules),
        _ => None,
    };

    if let Some(slot) = bool_slot {
        *slot = match value {
            "true" => true,
            "false" => false,
            _ => {
                return Err(ConfigError::parse(
                    format!(
                        "Parameter '{key}' in the [{section}] section\nmust be set either to 'true' or 'false'.\n{} found.",
                        if value.is_empty() {
                            "No value".to_string()
                        } else {
                            format!("'{value}'")
                        }
                    ),
                    line,
                    column,
                ));
            }
        };
        return Ok(());
    }

    let list_slot: Option<&mut Vec<String>> = match (section, key) {
        ("general", "css_file_extensions") => Some(&mut cfg.css_file_extensions),
        ("css", "comment_terms") => Some(&mut cfg.comment_terms),
        _ => None,
    };

    if let Some(slot) = list_slot {
        if !value.is_empty() {
            *slot = value.split_whitespace().map(str::to_string).collect();
        }
        return Ok(());
    }

    if (section, key) == ("general", "tab_width") {
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::parse(
                format!("Invalid value '{value}'"),
                line,
                column,
            ));
        }
        cfg.tab_width = value.parse().unwrap_or(4);
        return Ok(());
    }

    Err(ConfigError::parse(
        format!("Unknown setting '{key}'."),
        line,
        column,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Config, ConfigError> {
        let mut cfg = Config::default();
        parse_config_str(&mut cfg, content)?;
        Ok(cfg)
    }

    #[test]
    fn sections_and_values() {
        let cfg = parse(
            "[general]\n\
             tab_width = 8\n\
             use_utf8_bom = true\n\
             \n\
             [css]\n\
             minify_ids = true\n\
             comment_terms = legal copyright\n",
        )
        .unwrap();

        assert_eq!(cfg.tab_width, 8);
        assert!(cfg.use_utf8_bom);
        assert!(cfg.minify_ids);
        assert_eq!(cfg.comment_terms, vec!["legal".to_string(), "copyright".to_string()]);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let cfg = parse("# a comment\n\n[css]\nremove_comments = false # inline\n").unwrap();
        assert!(!cfg.remove_comments);
    }

    #[test]
    fn unknown_setting_is_fatal() {
        let err = parse("[css]\nshrink_rays = true\n").unwrap_err();
        let ConfigError::Parse { message, line, .. } = err else {
            panic!("expected parse error");
        };
        assert_eq!(line, 2);
        assert!(message.contains("Unknown setting 'shrink_rays'"));
    }

    #[test]
    fn malformed_bool_reports_row_and_column() {
        let err = parse("[css]\nminify_numbers = yes\n").unwrap_err();
        let ConfigError::Parse { message, line, column } = err else {
            panic!("expected parse error");
        };
        assert_eq!(line, 2);
        assert_eq!(column, 1);
        assert!(message.contains("'yes' found"));
    }

    #[test]
    fn unclosed_header_is_fatal() {
        assert!(parse("[general\n").is_err());
        assert!(parse("[  ]\n").is_err());
    }

    #[test]
    fn non_digit_tab_width_is_fatal() {
        assert!(parse("[general]\ntab_width = four\n").is_err());
    }
}
