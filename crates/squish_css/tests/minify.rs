use squish_config::Config;
use squish_css::generator::OUTPUT_FILE_HEADER;
use squish_css::CssMinifier;
use std::path::Path;

fn minify_with(cfg: &Config, content: &str) -> String {
    let outcome = CssMinifier::new(cfg)
        .minify_str(content, Path::new("input.css"))
        .expect("pipeline error");
    body(&outcome.output).to_string()
}

fn minify(content: &str) -> String {
    minify_with(&Config::default(), content)
}

/// The output without the fixed header comment (present only when the
/// minified result is smaller than the input)
fn body(output: &str) -> &str {
    output
        .strip_prefix(OUTPUT_FILE_HEADER)
        .map(|rest| rest.strip_prefix('\n').unwrap_or(rest))
        .unwrap_or(output)
}

#[test]
fn white_and_zero_margin() {
    assert_eq!(
        minify("a { color: #ffffff; margin: 0px 0px 0px 0px; }"),
        "a{color:#fff;margin:0}"
    );
}

#[test]
fn rgba_and_hsl_shortest_forms_are_equal() {
    let cfg = Config {
        rewrite_functions: true,
        ..Config::default()
    };

    assert_eq!(
        minify_with(
            &cfg,
            ".x { color: rgba(255,0,0,1); } .x { color: hsl(0,100%,50%); }"
        ),
        ".x{color:red}.x{color:red}"
    );
}

#[test]
fn custom_properties_rename_consistently() {
    let cfg = Config {
        minify_custom_properties: true,
        ..Config::default()
    };

    assert_eq!(
        minify_with(&cfg, ":root { --pad: 4px; } .a { padding: var(--pad); }"),
        ":root{--a:4px}.a{padding:var(--a)}"
    );
}

#[test]
fn empty_media_is_removed_and_equal_media_merges() {
    let cfg = Config {
        merge_media_rules: true,
        ..Config::default()
    };

    assert_eq!(
        minify_with(
            &cfg,
            "@media (min-width:600px){.a{}}@media (min-width:600px){.b{color:red}}"
        ),
        "@media (min-width:600px){.b{color:red}}"
    );
}

#[test]
fn equal_media_rules_merge_into_one() {
    let cfg = Config {
        merge_media_rules: true,
        remove_empty_rules: false,
        ..Config::default()
    };

    assert_eq!(
        minify_with(
            &cfg,
            "@media (min-width:600px){.a{color:red}}@media (min-width:600px){.b{color:blue}}"
        ),
        "@media (min-width:600px){.a{color:red}.b{color:blue}}"
    );
}

#[test]
fn media_merge_is_structural_not_identity_based() {
    let cfg = Config {
        merge_media_rules: true,
        ..Config::default()
    };

    // Same queries spelled apart merge; different queries do not
    assert_eq!(
        minify_with(
            &cfg,
            "@media screen and (min-width:600px){.a{color:red}}\
             @media (min-width:600px) and screen{.b{color:blue}}\
             @media print{.c{color:green}}"
        ),
        "@media screen and (min-width:600px){.a{color:red}.b{color:blue}}@media print{.c{color:green}}"
    );
}

#[test]
fn import_inlines_target_contents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.css"), ".x{color:red}").unwrap();

    let input = dir.path().join("main.css");
    std::fs::write(&input, "@import \"a.css\";").unwrap();

    let cfg = Config {
        include_external_stylesheets: true,
        ..Config::default()
    };

    let outcome = CssMinifier::new(&cfg)
        .minify_str("@import \"a.css\";", &input)
        .unwrap();

    assert_eq!(body(&outcome.output), ".x{color:red}");
}

#[test]
fn import_with_media_query_is_wrapped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.css"), ".x{color:red}").unwrap();

    let input = dir.path().join("main.css");
    let source = "@import \"a.css\" screen and (min-width:600px);";
    std::fs::write(&input, source).unwrap();

    let cfg = Config {
        include_external_stylesheets: true,
        ..Config::default()
    };

    let outcome = CssMinifier::new(&cfg).minify_str(source, &input).unwrap();

    assert_eq!(
        body(&outcome.output),
        "@media screen and (min-width:600px){.x{color:red}}"
    );
}

#[test]
fn import_without_inlining_writes_a_separate_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();

    std::fs::write(dir.path().join("a.css"), ".x { color: #ff0000; }").unwrap();

    let input = dir.path().join("main.css");
    let source = "@import \"a.css\";\nbody { margin: 0px; }";
    std::fs::write(&input, source).unwrap();

    let cfg = Config {
        include_external_stylesheets: false,
        output_path: out_dir.path().to_string_lossy().to_string(),
        ..Config::default()
    };

    let outcome = CssMinifier::new(&cfg).minify_str(source, &input).unwrap();

    // The at-rule survives and the import landed as its own minified file
    assert_eq!(body(&outcome.output), "@import \"a.css\";body{margin:0}");

    let written = out_dir.path().join("a.css");
    let written_content = std::fs::read_to_string(written).unwrap();
    assert_eq!(body(&written_content), ".x{color:red}");
}

#[test]
fn absolute_import_path_is_fatal() {
    let cfg = Config {
        include_external_stylesheets: true,
        ..Config::default()
    };

    let result = CssMinifier::new(&cfg).minify_str(
        "@import \"/etc/styles.css\";",
        Path::new("input.css"),
    );

    assert!(result.is_err());
    assert!(result.unwrap_err().message.contains("Absolute @import path"));
}

#[test]
fn circular_import_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.css");
    let b = dir.path().join("b.css");
    std::fs::write(&a, "@import \"b.css\";").unwrap();
    std::fs::write(&b, "@import \"a.css\";").unwrap();

    let cfg = Config {
        include_external_stylesheets: true,
        ..Config::default()
    };

    let result = CssMinifier::new(&cfg).minify_str("@import \"b.css\";", &a);

    assert!(result.is_err());
    assert!(result.unwrap_err().message.contains("Circular @import"));
}

#[test]
fn charset_utf8_is_dropped_when_bom_is_written() {
    let cfg = Config {
        use_utf8_bom: true,
        ..Config::default()
    };

    let outcome = CssMinifier::new(&cfg)
        .minify_str("@charset \"UTF-8\";\na { color: #ffffff; }", Path::new("x.css"))
        .unwrap();

    assert!(outcome.output.starts_with('\u{feff}'));
    assert!(!outcome.output.contains("@charset"));
    assert!(outcome.output.contains("a{color:#fff}"));
}

#[test]
fn ids_and_classes_share_cells_across_rules() {
    let cfg = Config {
        minify_ids: true,
        minify_class_names: true,
        ..Config::default()
    };

    let out = minify_with(
        &cfg,
        ".navigation { color: red; } .navigation { margin: 0px; } #main-header { color: blue; }",
    );

    assert_eq!(out, ".a{color:red}.a{margin:0}#a{color:blue}");
}

#[test]
fn animation_names_rename_at_definition_and_use() {
    let cfg = Config {
        minify_animation_names: true,
        ..Config::default()
    };

    let out = minify_with(
        &cfg,
        "@keyframes slide-in { from { left: 0px; } to { left: 100px; } }\n\
         .a { animation-name: slide-in; }",
    );

    assert_eq!(
        out,
        "@keyframes a{0%{left:0}to{left:100px}}.a{animation-name:a}"
    );
}

#[test]
fn structure_survives_with_everything_disabled() {
    let cfg = Config {
        remove_comments: false,
        minify_numbers: false,
        minify_colors: false,
        remove_empty_rules: false,
        ..Config::default()
    };

    let out = minify_with(
        &cfg,
        "a > b { color: #ffffff; margin: 5px 10px; }\n.empty {}\n",
    );

    assert_eq!(out, "a>b{color:#ffffff;margin:5px 10px}.empty{}");
}

#[test]
fn beautified_output_is_indented() {
    let cfg = Config {
        beautify_output: true,
        ..Config::default()
    };

    let outcome = CssMinifier::new(&cfg)
        .minify_str("a{color:red;margin:0}", Path::new("x.css"))
        .unwrap();

    let text = outcome.output;
    assert!(text.contains("a {\n"));
    assert!(text.contains("\tcolor: red;\n"));
    assert!(text.contains("\tmargin: 0\n"));
    assert!(text.trim_end().ends_with('}'));
}

#[test]
fn ms_to_seconds_and_zero_units() {
    assert_eq!(
        minify("a { transition-duration: 100ms; width: 0px; height: 0em; }"),
        "a{transition-duration:.1s;width:0;height:0}"
    );

    // 050ms starts with a zero and is left alone (aside from zero stripping)
    assert_eq!(minify("a { transition-duration: 050ms; }"), "a{transition-duration:50ms}");
}

#[test]
fn selector_structure_is_preserved() {
    assert_eq!(
        minify("a > b + c ~ d e { color: red; }"),
        "a>b+c~d e{color:red}"
    );
}

#[test]
fn nth_child_canonical_forms() {
    assert_eq!(
        minify("li:nth-child(even) { color: red; } li:nth-child(2n+1) { color: blue; }"),
        "li:nth-child(2n){color:red}li:nth-child(odd){color:blue}"
    );
}

#[test]
fn unquoted_urls_and_preserved_strings() {
    assert_eq!(
        minify("a { background: url(\"img/bg.png\"); content: \"a b\"; }"),
        "a{background:url(img/bg.png);content:\"a b\"}"
    );

    // A URL with parens keeps its quotes
    assert_eq!(
        minify("a { background: url(\"img/(x).png\"); }"),
        "a{background:url(\"img/(x).png\")}"
    );
}

#[test]
fn important_and_hacks_survive() {
    assert_eq!(
        minify("a { color: red !important; *zoom: 1; filter: alpha(opacity=50); }"),
        "a{color:red!important;*zoom:1;filter:alpha(opacity=50)}"
    );
}

#[test]
fn calc_spacing_is_preserved() {
    assert_eq!(
        minify("a { width: calc(100% - 80px); height: calc(100%/3); }"),
        "a{width:calc(100% - 80px);height:calc(100%/3)}"
    );
}

#[test]
fn shorthand_collapse_variants() {
    assert_eq!(minify("a{margin:10px 10px}"), "a{margin:10px}");
    assert_eq!(minify("a{margin:10px 20px 10px}"), "a{margin:10px 20px}");
    assert_eq!(minify("a{margin:10px 20px 10px 20px}"), "a{margin:10px 20px}");
    assert_eq!(minify("a{margin:10px 10px 10px 10px}"), "a{margin:10px}");
    assert_eq!(minify("a{margin:10px 20px 30px 40px}"), "a{margin:10px 20px 30px 40px}");
}

#[test]
fn z_index_is_not_minified() {
    assert_eq!(minify("a{z-index:10000}"), "a{z-index:10000}");
    assert_eq!(minify("a{width:10000px}"), "a{width:1e4px}");
}

#[test]
fn hex_color_rewrites() {
    assert_eq!(
        minify("a{color:#ffffff;border-color:#00000000;outline-color:#0055aaff}"),
        "a{color:#fff;border-color:#0000;outline-color:#05af}"
    );
}

#[test]
fn rgb_functions_become_colors() {
    let cfg = Config {
        rewrite_functions: true,
        ..Config::default()
    };

    assert_eq!(
        minify_with(&cfg, "a{color:rgb(255,0,0);background:rgba(0,0,0,0)}"),
        "a{color:red;background:transparent}"
    );

    let cfg = Config {
        rewrite_functions: true,
        use_rgba_hex_notation: true,
        ..Config::default()
    };

    assert_eq!(
        minify_with(&cfg, "a{color:rgba(0,0,0,0);border-color:rgba(255,0,0,.5)}"),
        "a{color:#0000;border-color:#ff000080}"
    );
}

#[test]
fn angles_normalize_when_enabled() {
    let cfg = Config {
        rewrite_angles: true,
        ..Config::default()
    };

    assert_eq!(
        minify_with(&cfg, "a { transform: rotate(100grad); }"),
        "a{transform:rotate(90deg)}"
    );
    assert_eq!(
        minify_with(&cfg, "a { transform: rotate(355deg); }"),
        "a{transform:rotate(-5deg)}"
    );
    assert_eq!(
        minify_with(&cfg, "a { transform: rotate(.5turn); }"),
        "a{transform:rotate(180deg)}"
    );

    // Disabled by default
    assert_eq!(
        minify("a { transform: rotate(100grad); }"),
        "a{transform:rotate(100grad)}"
    );
}

#[test]
fn gradient_directions_become_angles() {
    let cfg = Config {
        rewrite_functions: true,
        ..Config::default()
    };

    assert_eq!(
        minify_with(&cfg, "a { background: linear-gradient(to right, red, blue); }"),
        "a{background:linear-gradient(90deg,red,blue)}"
    );
}

#[test]
fn gradient_reverses_when_the_opposite_angle_is_shorter() {
    let cfg = Config {
        rewrite_functions: true,
        ..Config::default()
    };

    assert_eq!(
        minify_with(&cfg, "a { background: linear-gradient(270deg, red 20%, blue); }"),
        "a{background:linear-gradient(90deg,blue,red 80%)}"
    );
}

#[test]
fn gradient_endpoint_positions_are_dropped() {
    let cfg = Config {
        rewrite_functions: true,
        ..Config::default()
    };

    assert_eq!(
        minify_with(&cfg, "a { background: linear-gradient(90deg, red 0%, blue 100%); }"),
        "a{background:linear-gradient(90deg,red,blue)}"
    );

    // An out-of-range stop blocks the endpoint cleanup
    assert_eq!(
        minify_with(&cfg, "a { background: linear-gradient(90deg, red 0%, blue 110%); }"),
        "a{background:linear-gradient(90deg,red 0%,blue 110%)}"
    );
}

#[test]
fn hsl_stays_when_rgba_would_be_longer() {
    let cfg = Config {
        rewrite_functions: true,
        ..Config::default()
    };

    assert_eq!(
        minify_with(&cfg, "a { color: hsla(1, 9%, 9%, .5); }"),
        "a{color:hsla(1,9%,9%,.5)}"
    );
}

#[test]
fn preserved_comments_survive_minification() {
    assert_eq!(
        minify("/*! Copyright 2019 */\na { color: red; }"),
        "/*! Copyright 2019 */a{color:red}"
    );
}

#[test]
fn supports_and_font_face_pass_through() {
    assert_eq!(
        minify("@supports (display: grid) { a { color: red; } }"),
        "@supports (display:grid){a{color:red}}"
    );

    assert_eq!(
        minify("@font-face { font-family: \"X\"; src: url(x.woff2); unicode-range: U+20-7F; }"),
        "@font-face{font-family:\"X\";src:url(x.woff2);unicode-range:u+20-7f}"
    );
}

#[test]
fn namespace_rule_passes_through() {
    assert_eq!(
        minify("@namespace svg url(http://www.w3.org/2000/svg);"),
        "@namespace svg url(http://www.w3.org/2000/svg);"
    );
}

#[test]
fn scientific_numbers_round_trip() {
    assert_eq!(minify("a { width: 2e3px; }"), "a{width:2e3px}");
}

#[test]
fn undeclared_custom_property_is_reported() {
    let cfg = Config {
        minify_custom_properties: true,
        ..Config::default()
    };

    let outcome = CssMinifier::new(&cfg)
        .minify_str("a { color: var(--ghost); }", Path::new("x.css"))
        .unwrap();

    assert!(outcome
        .notes
        .iter()
        .any(|note| note.contains("Undeclared custom property '--ghost'")));
}

#[test]
fn sidecar_tables_come_out_of_the_pipeline() {
    let cfg = Config {
        minify_class_names: true,
        ..Config::default()
    };

    let outcome = CssMinifier::new(&cfg)
        .minify_str(".first { color: red; } .second { color: blue; }", Path::new("x.css"))
        .unwrap();

    let json = squish_css::sidecar::json_sidecar(&cfg, &outcome.tables).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["classes"]["first"], "a");
    assert_eq!(value["classes"]["second"], "b");
}

#[test]
fn minification_is_idempotent_over_a_mixed_sheet() {
    let cfg = Config {
        rewrite_functions: true,
        merge_media_rules: true,
        ..Config::default()
    };

    let source = "\
        @media (min-width: 600px) { .a { margin: 10px 10px; } }\n\
        @media (min-width: 600px) { .b { color: hsl(0, 100%, 50%); } }\n\
        a > b { transition: all 100ms; width: calc(100% - 10px); }\n";

    let first = minify_with(&cfg, source);
    let second = minify_with(&cfg, &first);
    assert_eq!(first, second);
}
