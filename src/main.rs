//! theme-json CLI
//!
//! Entry point for the `theme-json` command-line tool.

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::process;
use theme_json::config::{default_host_config_path, DEFAULT_PROJECT_CONFIG};
use theme_json::{
    detect_version, migrate_with, read_document, EffectiveConfig, StylesheetSection, ThemeJson,
    VariantPolicy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "theme-json")]
#[command(about = "Migrate, merge and compile theme.json documents", version)]
struct Cli {
    /// Path to project config file (default: theme-json.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// How v0 settings variants are collapsed (intersect, last-wins)
    #[arg(long, global = true, value_parser = parse_variant_policy)]
    variant_policy: Option<VariantPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the detected schema version of a document
    Version {
        /// theme.json file
        file: PathBuf,
    },

    /// Print a document migrated to the current schema version
    Migrate {
        /// theme.json file
        file: PathBuf,

        /// Skip sanitizing against the known vocabulary
        #[arg(long)]
        raw: bool,
    },

    /// Merge documents in order and print the resulting settings
    Settings {
        /// theme.json files, lowest precedence first
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Merge documents in order and print the compiled stylesheet
    Stylesheet {
        /// theme.json files, lowest precedence first
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Sections to emit (comma-separated: variables,styles,presets)
        #[arg(long, short = 's', value_delimiter = ',')]
        sections: Option<Vec<StylesheetSection>>,
    },

    /// Print the effective configuration with its sources
    Config,
}

fn parse_variant_policy(value: &str) -> Result<VariantPolicy, String> {
    VariantPolicy::parse(value).ok_or_else(|| format!("unknown variant policy '{}'", value))
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let sections = match &cli.command {
        Commands::Stylesheet { sections, .. } => sections.clone(),
        _ => None,
    };
    let config = load_config(cli.config.as_deref(), cli.variant_policy, sections);

    match cli.command {
        Commands::Version { file } => run_version(&file),
        Commands::Migrate { file, raw } => run_migrate(&config, &file, raw),
        Commands::Settings { files } => run_settings(&config, &files),
        Commands::Stylesheet { files, .. } => run_stylesheet(&config, &files),
        Commands::Config => run_config(&config),
    }
}

fn load_config(
    config_path: Option<&Path>,
    variant_policy: Option<VariantPolicy>,
    sections: Option<Vec<StylesheetSection>>,
) -> EffectiveConfig {
    let host_path = default_host_config_path();
    let project_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_CONFIG));

    if config_path.is_some() && !project_path.exists() {
        eprintln!("Config file not found: {}", project_path.display());
        process::exit(1);
    }

    let mut overrides = Map::new();
    if let Some(policy) = variant_policy {
        overrides.insert("migration".to_string(), json!({"variant_policy": policy.as_str()}));
    }
    if let Some(sections) = sections {
        let names: Vec<&str> = sections.iter().map(StylesheetSection::as_str).collect();
        overrides.insert("stylesheet".to_string(), json!({"sections": names}));
    }
    let cli_overrides = (!overrides.is_empty()).then_some(Value::Object(overrides));

    match EffectiveConfig::build(host_path.as_deref(), Some(&project_path), cli_overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn load_themes(config: &EffectiveConfig, files: &[PathBuf]) -> Vec<ThemeJson> {
    let options = config.migrate_options();
    let mut themes = Vec::with_capacity(files.len());
    for file in files {
        match ThemeJson::from_file(file, &options) {
            Ok(theme) => themes.push(theme),
            Err(e) => {
                eprintln!("Error loading document: {}", e);
                process::exit(1);
            }
        }
    }
    themes
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_version(file: &Path) {
    match read_document(file) {
        Ok(document) => println!("{}", detect_version(&document)),
        Err(e) => {
            eprintln!("Error loading document: {}", e);
            process::exit(1);
        }
    }
}

fn run_migrate(config: &EffectiveConfig, file: &Path, raw: bool) {
    if raw {
        let document = match read_document(file) {
            Ok(document) => document,
            Err(e) => {
                eprintln!("Error loading document: {}", e);
                process::exit(1);
            }
        };
        print_json(&migrate_with(&document, &config.migrate_options()));
    } else {
        match ThemeJson::from_file(file, &config.migrate_options()) {
            Ok(theme) => print_json(theme.raw_data()),
            Err(e) => {
                eprintln!("Error loading document: {}", e);
                process::exit(1);
            }
        }
    }
}

fn run_settings(config: &EffectiveConfig, files: &[PathBuf]) {
    let themes = load_themes(config, files);
    print_json(&ThemeJson::merge_all(&themes).settings());
}

fn run_stylesheet(config: &EffectiveConfig, files: &[PathBuf]) {
    let themes = load_themes(config, files);
    let merged = ThemeJson::merge_all(&themes);
    let sections = config.sections();
    println!("{}", merged.stylesheet_with(Some(sections.as_slice()), &config.compile_options()));
}

fn run_config(config: &EffectiveConfig) {
    match config.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            process::exit(1);
        }
    }
}
