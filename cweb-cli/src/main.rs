//! Command-line interface for CWEB
//! Classifies CWEB sources the same way the language server does, for inspection and scripting.
//!
//! Usage:
//!   cweb tokens `<path>` [--format `<format>`]   - Print the classified tokens of a file
//!   cweb legend                                 - Print the token legend
//!
//! Every command accepts `--config <file>` to layer a TOML file over the built-in defaults.

mod error;
mod output;

use clap::{Arg, ArgMatches, Command};
use cweb_config::{CwebConfig, Loader, OutputFormat};
use cweb_parser::{classify_all, Legend};
use error::CliError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("cweb")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting the highlighting of CWEB files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .subcommand(
            Command::new("tokens")
                .about("Classify a CWEB file and print its tokens")
                .arg(
                    Arg::new("path")
                        .help("Path to the CWEB file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (default from configuration: simple)")
                        .value_parser(["simple", "json", "lsp"]),
                ),
        )
        .subcommand(Command::new("legend").about("Print token types and modifiers with their indices"))
}

fn main() {
    let matches = cli().get_matches();
    if let Err(err) = run(&matches) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    match matches.subcommand() {
        Some(("tokens", sub)) => {
            let config = load_config(matches, sub.get_one::<String>("format"))?;
            init_logging(&config);
            let path = sub
                .get_one::<String>("path")
                .map(PathBuf::from)
                .unwrap_or_default();
            handle_tokens_command(&path, config.cli.format)
        }
        Some(("legend", _)) => {
            let config = load_config(matches, None)?;
            init_logging(&config);
            print!("{}", output::render_legend(Legend::standard()));
            Ok(())
        }
        _ => Ok(()),
    }
}

fn load_config(matches: &ArgMatches, format: Option<&String>) -> Result<CwebConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = format {
        loader = loader.set_override("cli.format", format.as_str())?;
    }
    Ok(loader.build()?)
}

fn init_logging(config: &CwebConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Handle the tokens command
fn handle_tokens_command(path: &Path, format: OutputFormat) -> Result<(), CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let tokens = classify_all(&text);
    debug!(path = %path.display(), tokens = tokens.len(), %format, "classified");

    let rendered = match format {
        OutputFormat::Simple => output::render_simple(&tokens),
        OutputFormat::Json => output::render_json(&tokens)? + "\n",
        OutputFormat::Lsp => output::render_lsp(&tokens, Legend::standard())? + "\n",
    };
    print!("{}", rendered);
    Ok(())
}
