use anyhow::Result;
use simple_logger::SimpleLogger;
use squish_config::Config;
use squish_css::{sidecar, CssMinifier, MinifyOutcome};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::exit;
use std::time::Instant;

const APP_NAME: &str = "squish";
const CONFIG_FILE_PATH: &str = "squish.conf";

fn bail(message: &str) -> ! {
    println!("{message}\n\nAbort.");
    exit(1);
}

fn main() -> Result<()> {
    let matches = clap::Command::new(APP_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("CSS optimizer and minifier")
        .after_help(
            "The input and output paths must differ.\n\
             The full output path will be created, if it does not already exist.\n\
             If the output file already exists, it will be overwritten.",
        )
        .arg(
            clap::Arg::new("input")
                .help("Input file path")
                .short('i')
                .value_name("PATH"),
        )
        .arg(
            clap::Arg::new("output")
                .help("Output directory path")
                .short('o')
                .value_name("PATH"),
        )
        .arg(
            clap::Arg::new("stdo")
                .help("Use standard output instead of a file")
                .long("stdo")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("config-file")
                .help("Set the configuration file path")
                .long("config-file")
                .value_name("PATH"),
        )
        .arg(
            clap::Arg::new("config-info")
                .help("Show current configuration")
                .long("config-info")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("create-config-file")
                .help("Create configuration file with default settings")
                .long("create-config-file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("debug")
                .help("Enable debug logging")
                .short('d')
                .long("debug")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("debug") {
        SimpleLogger::new().init()?;
    }

    let config_path = match matches.get_one::<String>("config-file") {
        Some(path) => {
            if path.is_empty() || !Path::new(path).is_absolute() {
                bail("Expected absolute file path after argument '--config-file'");
            }
            if !Path::new(path).exists() {
                bail("Passed config file does not exist.");
            }
            path.clone()
        }
        None => CONFIG_FILE_PATH.to_string(),
    };

    if matches.get_flag("create-config-file") {
        create_config_file();
        exit(0);
    }

    let mut cfg = Config::default();
    if let Err(error) = cfg.read_file(&config_path) {
        bail(&error.to_string());
    }

    if matches.get_flag("config-info") {
        print!("{}", cfg.info());
        exit(0);
    }

    prepare(&matches, &mut cfg);

    process(&cfg);

    Ok(())
}

/// Writes the default configuration file, prompting before an overwrite
fn create_config_file() {
    if !Path::new(CONFIG_FILE_PATH).exists() {
        if std::fs::write(CONFIG_FILE_PATH, Config::default_file_content()).is_err() {
            bail(&format!("Could not write configuration file '{CONFIG_FILE_PATH}'"));
        }
        println!("Configuration file '{CONFIG_FILE_PATH}' has been created.");
        return;
    }

    loop {
        print!("Configuration file already exists. Overwrite with defaults? (y/N): ");
        let _ = std::io::stdout().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err() {
            return;
        }
        let answer = input.trim().to_lowercase();

        match answer.as_str() {
            "" | "n" => {
                println!("\nKept existing configuration file.");
                return;
            }
            "y" => {
                if std::fs::write(CONFIG_FILE_PATH, Config::default_file_content()).is_err() {
                    bail(&format!("Could not write configuration file '{CONFIG_FILE_PATH}'"));
                }
                println!("\nConfiguration file has been reset to defaults.");
                return;
            }
            _ => println!("Invalid input: {answer}"),
        }
    }
}

/// Validates the command line against the configuration and resolves the
/// effective input and output paths.
fn prepare(matches: &clap::ArgMatches, cfg: &mut Config) {
    if matches.get_flag("stdo") {
        if matches.contains_id("output") {
            bail("Use either '-o' or '--stdo'. This arguments cannot be combined.");
        }

        cfg.output_to_stdout = true;
        // Imported stylesheets cannot land in separate files on stdout
        cfg.include_external_stylesheets = true;
    }

    if !cfg.output_to_stdout && cfg.create_php_include_file {
        let names = [
            ("php_id_array_name", &cfg.php_id_array_name),
            ("php_class_array_name", &cfg.php_class_array_name),
            ("php_cprop_array_name", &cfg.php_cprop_array_name),
            ("php_animation_array_name", &cfg.php_animation_array_name),
        ];

        for (setting, value) in names {
            if value.is_empty() {
                bail(&format!(
                    "'create_php_include_file' is enabled, but '{setting}' value is empty.\n\n\
                     Check configuration file."
                ));
            }
        }
    }

    // Input path: from -i or from the configuration file, absolute unless an
    // input working directory is set
    let input_arg = matches.get_one::<String>("input").cloned();
    let input_path = match input_arg {
        Some(path) if !path.is_empty() => resolve_path(
            &path,
            &cfg.input_working_directory,
            "input",
        ),
        _ => {
            if cfg.input_path.is_empty() {
                bail("The input path is not specified.");
            }
            let path = cfg.input_path.clone();
            resolve_path(&path, &cfg.input_working_directory, "input")
        }
    };

    if !Path::new(&input_path).exists() {
        bail("The specified input file does not exist.");
    }
    if !Path::new(&input_path).is_file() {
        bail("The specified input is not a file.");
    }

    cfg.input_path = input_path;

    if cfg.output_to_stdout {
        return;
    }

    let output_arg = matches.get_one::<String>("output").cloned();
    let output_path = match output_arg {
        Some(path) if !path.is_empty() => resolve_path(
            &path,
            &cfg.output_working_directory,
            "output",
        ),
        _ => {
            if cfg.output_path.is_empty() && cfg.output_working_directory.is_empty() {
                bail("The output path is not specified.");
            }
            if cfg.output_path.is_empty() {
                cfg.output_working_directory.clone()
            } else {
                let path = cfg.output_path.clone();
                resolve_path(&path, &cfg.output_working_directory, "output")
            }
        }
    };

    if Path::new(&cfg.input_path).parent() == Some(Path::new(&output_path)) {
        bail("Input and output path must differ.");
    }

    cfg.output_path = output_path;
}

/// Applies the absolute/relative path rules: paths are absolute, unless the
/// matching working directory is set, then they are relative to it.
fn resolve_path(path: &str, working_directory: &str, what: &str) -> String {
    let is_absolute = Path::new(path).is_absolute();

    if working_directory.is_empty() {
        if !is_absolute {
            bail(&format!(
                "Expected absolute {what} path, when {what} working directory is not set."
            ));
        }
        return path.to_string();
    }

    if is_absolute {
        bail(&format!(
            "Expected relative {what} path, when {what} working directory is set."
        ));
    }

    Path::new(working_directory)
        .join(path)
        .to_string_lossy()
        .to_string()
}

fn process(cfg: &Config) {
    let input_path = PathBuf::from(&cfg.input_path);
    let file_name = input_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let known_extension = cfg
        .css_file_extensions
        .iter()
        .any(|extension| cfg.input_path.ends_with(extension.as_str()));
    if !known_extension {
        bail("Unknown input file extension.");
    }

    let content = match std::fs::read_to_string(&input_path) {
        Ok(content) => content,
        Err(_) => bail(&format!(
            "File\n{}\nis not readable.\n\nCheck permissions.",
            input_path.display()
        )),
    };

    let quiet = cfg.output_to_stdout;

    if !quiet {
        let banner = format!("{APP_NAME} v{} - CSS optimizer and minifier", env!("CARGO_PKG_VERSION"));
        println!("{}", "-".repeat(banner.len()));
        println!("{banner}");
        println!("{}", "-".repeat(banner.len()));
        println!();
        println!("Input  file: {}", cfg.input_path);
        println!("Output path: {}\n", cfg.output_path);
        println!("Processing input file '{file_name}'");
    }

    let started = Instant::now();

    let outcome = match CssMinifier::new(cfg).minify_str(&content, &input_path) {
        Ok(outcome) => outcome,
        Err(error) => bail(&error.to_string()),
    };

    for note in &outcome.notes {
        println!("{note}");
    }

    if quiet {
        println!("{}", outcome.output);
        return;
    }

    let output_file = output_file_path(cfg, &input_path);
    if let Some(parent) = output_file.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            bail(&format!(
                "Could not create path\n{}\n\nCheck permissions.",
                parent.display()
            ));
        }
    }

    if std::fs::write(&output_file, &outcome.output).is_err() {
        bail(&format!(
            "Could not write file\n{}\n\nCheck permissions.",
            output_file.display()
        ));
    }

    write_sidecars(cfg, &outcome);

    println!("[Done] Processing input file '{file_name}'");

    print_found_summary(&outcome);
    print_size_difference(cfg, &content, &outcome);

    let elapsed = started.elapsed();
    let (duration, unit) = if elapsed.as_millis() > 1000 {
        (elapsed.as_secs() as u128, "s")
    } else if elapsed.as_micros() > 1000 {
        (elapsed.as_millis(), "ms")
    } else {
        (elapsed.as_micros(), "µs")
    };
    println!("Operation took: {duration}{unit}\n");
}

/// The main output file mirrors the input layout below the working
/// directory, or lands directly in the output directory.
fn output_file_path(cfg: &Config, input_path: &Path) -> PathBuf {
    let output_root = Path::new(&cfg.output_path);

    if !cfg.input_working_directory.is_empty() {
        if let Ok(relative) = input_path.strip_prefix(&cfg.input_working_directory) {
            return output_root.join(relative);
        }
    }

    match input_path.file_name() {
        Some(name) => output_root.join(name),
        None => output_root.to_path_buf(),
    }
}

fn write_sidecars(cfg: &Config, outcome: &MinifyOutcome) {
    if cfg.create_json_file {
        if let Some(json) = sidecar::json_sidecar(cfg, &outcome.tables) {
            let path = Path::new(&cfg.output_path).join(format!("{APP_NAME}.json"));
            if std::fs::write(&path, json).is_err() {
                bail(&format!(
                    "Could not write file\n{}\n\nCheck permissions.",
                    path.display()
                ));
            }
        }
    }

    if cfg.create_php_include_file {
        if let Some(php) = sidecar::php_sidecar(cfg, &outcome.tables) {
            let path = Path::new(&cfg.output_path).join(format!("{APP_NAME}.php"));
            if std::fs::write(&path, php).is_err() {
                bail(&format!(
                    "Could not write file\n{}\n\nCheck permissions.",
                    path.display()
                ));
            }
        }
    }
}

fn print_found_summary(outcome: &MinifyOutcome) {
    let counters = [
        (outcome.tables.ids.len(), "ids"),
        (outcome.tables.classes.len(), "classes"),
        (outcome.tables.custom_properties.len(), "custom properties"),
        (outcome.tables.animations.len(), "animation names"),
    ];

    let width = counters
        .iter()
        .map(|(count, _)| count.to_string().len())
        .max()
        .unwrap_or(1);

    let line = "-".repeat(width + 18);

    println!("\n{line}");
    println!("Found:");
    println!("{line}");
    for (count, label) in counters {
        println!("{count:>width$} {label}");
    }
    println!("{line}\n");
}

fn print_size_difference(cfg: &Config, input: &str, outcome: &MinifyOutcome) {
    let mut input_size = input.len() as u64;
    let mut output_size = outcome.output.len() as u64;

    // Separate-file imports count towards the totals
    for path in &outcome.input_files {
        input_size += std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    }
    for path in &outcome.output_files {
        output_size += std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    }

    if !outcome.input_files.is_empty() {
        println!("All done!\n\nSummary:");
    }

    let saved = input_size.saturating_sub(output_size);
    let percent = if input_size > 0 {
        (1.0 - output_size as f64 / input_size as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Input  size: {}{}",
        file_size_format(input_size),
        if input_size > 1000 { format!(" ({input_size} bytes)") } else { String::new() }
    );
    println!(
        "Output size: {}{} [-{saved} bytes] [-{percent:.2}%]\n",
        file_size_format(output_size),
        if output_size > 1000 { format!(" ({output_size} bytes)") } else { String::new() }
    );
}

fn file_size_format(size: u64) -> String {
    let size = size as f64;

    if size > 1e12 {
        format!("{:.2}TB", size / 1e12)
    } else if size > 1e9 {
        format!("{:.2}GB", size / 1e9)
    } else if size > 1e6 {
        format!("{:.2}MB", size / 1e6)
    } else if size > 1e3 {
        format!("{:.2}kB", size / 1e3)
    } else {
        format!("{size} bytes")
    }
}
