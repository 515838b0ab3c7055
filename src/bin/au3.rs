//! Command-line interface for au3
//! Parses AutoIt scripts and prints the syntax tree in one of the registered formats.
//!
//! Usage:
//!   au3 parse `<path>` [--format `<format>`] [--config `<file>`] [--line-numbers]
//!   au3 expr `<expression>` [--format `<format>`]
//!   au3 list-formats

use au3::au3::config::{Au3Config, Loader};
use au3::au3::formats::{FormatError, FormatRegistry, TreevizFormatter, TreevizOptions};
use au3::au3::parsing::{parse_expression_with, parse_script_with, ExpressionOptions, ParseError};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::process::ExitCode;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "AU3_LOG";

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("error[{}]: {}", .error.kind, .error.message)]
    Parse {
        error: ParseError,
        source_text: String,
    },
}

fn build_cli() -> Command {
    let format_arg = Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format (see list-formats); defaults to the configured format");

    Command::new("au3")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse AutoIt scripts and inspect their syntax tree")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Log parser activity to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a script file")
                .arg(Arg::new("path").help("Path to the .au3 file").required(true).index(1))
                .arg(format_arg.clone())
                .arg(
                    Arg::new("line-numbers")
                        .long("line-numbers")
                        .help("Prefix treeviz nodes with their source line")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("expr")
                .about("Parse a single expression")
                .arg(
                    Arg::new("expression")
                        .help("Expression text, e.g. '1 + 2 * 3'")
                        .required(true)
                        .index(1),
                )
                .arg(format_arg),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<Au3Config, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    Ok(loader.build()?)
}

/// Registry whose treeviz formatter follows the configured output settings.
fn registry_for(config: &Au3Config, line_numbers: bool) -> FormatRegistry {
    let mut options = TreevizOptions::from(&config.output);
    options.show_line_numbers |= line_numbers;
    let mut registry = FormatRegistry::with_defaults();
    registry.register(TreevizFormatter::new(options));
    registry
}

fn selected_format<'m>(matches: &'m ArgMatches, config: &'m Au3Config) -> &'m str {
    matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or(&config.output.default_format)
}

fn handle_parse(matches: &ArgMatches, config: &Au3Config) -> Result<String, CliError> {
    let Some(path) = matches.get_one::<String>("path") else {
        return Ok(String::new());
    };
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path, bytes = source.len(), "read script");

    let script = parse_script_with(&source, &config.parser).map_err(|error| CliError::Parse {
        error,
        source_text: source.clone(),
    })?;
    let registry = registry_for(config, matches.get_flag("line-numbers"));
    Ok(registry.serialize(&script, selected_format(matches, config))?)
}

fn handle_expr(matches: &ArgMatches, config: &Au3Config) -> Result<String, CliError> {
    let Some(text) = matches.get_one::<String>("expression") else {
        return Ok(String::new());
    };
    let (expression, _) = parse_expression_with(text, ExpressionOptions::default(), &config.parser)
        .map_err(|error| CliError::Parse {
            error,
            source_text: text.clone(),
        })?;
    let registry = registry_for(config, false);
    let mut output = registry.serialize_expression(&expression, selected_format(matches, config))?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn handle_list_formats() -> String {
    let registry = FormatRegistry::with_defaults();
    let mut output = String::from("Available formats:\n\n");
    for name in registry.list_formats() {
        let description = registry.get(&name).map(|f| f.description()).unwrap_or("");
        output.push_str(&format!("  {name:<10} {description}\n"));
    }
    output
}

fn run(matches: &ArgMatches) -> Result<String, CliError> {
    let config = load_config(matches)?;
    match matches.subcommand() {
        Some(("parse", sub)) => handle_parse(sub, &config),
        Some(("expr", sub)) => handle_expr(sub, &config),
        Some(("list-formats", _)) => Ok(handle_list_formats()),
        _ => Ok(String::new()),
    }
}

fn report(err: &CliError) {
    eprintln!("{err}");
    if let CliError::Parse { error, source_text } = err {
        let location = error.location.to_string();
        if !location.is_empty() {
            eprintln!("  -->{location}");
        }
        if let Some(context) = error.source_context(source_text) {
            eprintln!();
            eprint!("{context}");
        }
    }
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}
