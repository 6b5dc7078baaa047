// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! table2atomese
//!
//! Prints the Atomese similarity graph of a headered, delimited table.
//!
//! # Usage
//! ```text
//! table2atomese [OPTIONS] <FILE>
//! ```
//!
//! Exits with `0` on success and `1` on any failure, including a wrong
//! number of arguments. Only the serialized graph goes to stdout; logs go to
//! stderr (`RUST_LOG` or `-v` to raise the level).

mod fs_config;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use atomese_graph::Handle;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser, ValueEnum};
use table_atomese::config::OptionsConfig;
use table_atomese::{ConvertOptions, RowTokenizer, TableLoader};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use crate::fs_config::DirStore;

#[derive(Parser, Debug)]
#[command(name = "table2atomese", version, about, long_about = None)]
struct Cli {
    /// Table file to convert (first data line is the header)
    file: PathBuf,

    /// Output form
    #[arg(long, value_enum, default_value_t = Format::Sexpr)]
    format: Format,

    /// Field delimiter: one ASCII character, or `tab` / `space`
    #[arg(long, value_parser = parse_delimiter)]
    delimiter: Option<char>,

    /// Comment markers; a line whose first non-blank character is one of these is skipped
    #[arg(long)]
    comment: Option<String>,

    /// Keep whitespace around fields
    #[arg(long)]
    no_trim: bool,

    /// Fail when a row's field count differs from the header's
    #[arg(long)]
    strict_arity: bool,

    /// Fail when a value does not parse as a number
    #[arg(long)]
    strict_numeric: bool,

    /// Directory holding `convert.json` (defaults to the platform config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Persist the effective options to the config directory
    #[arg(long)]
    save_config: bool,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Multi-line Atomese s-expression
    Sexpr,
    /// Single-line Atomese s-expression
    Compact,
    /// JSON tree
    Json,
    /// BLAKE3 hash of the canonical encoding
    Hash,
}

impl Cli {
    /// Layer command-line overrides on top of stored options.
    fn apply(&self, mut options: ConvertOptions) -> ConvertOptions {
        if let Some(delimiter) = self.delimiter {
            options.tokenizer.delimiter = delimiter;
        }
        if let Some(markers) = &self.comment {
            options.tokenizer.comment_markers = markers.chars().collect();
        }
        if self.no_trim {
            options.tokenizer.trim = false;
        }
        options.validation.arity |= self.strict_arity;
        options.validation.numeric |= self.strict_numeric;
        options
    }
}

fn parse_delimiter(raw: &str) -> Result<char, String> {
    match raw {
        "tab" | "\\t" => Ok('\t'),
        "space" => Ok(' '),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("expected a single character, got {raw:?}")),
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_config(dir: Option<&PathBuf>) -> Option<OptionsConfig<DirStore>> {
    let store = match dir {
        Some(dir) => DirStore::at(dir),
        None => DirStore::platform()
            .map_err(|err| warn!(%err, "config directory unavailable"))
            .ok()?,
    };
    Some(OptionsConfig::new(store))
}

fn render(root: &Handle, format: Format) -> Result<String> {
    Ok(match format {
        Format::Sexpr => root.to_string(),
        Format::Compact => root.to_short_string(),
        Format::Json => serde_json::to_string_pretty(root)?,
        Format::Hash => root.content_hash()?.to_string(),
    })
}

fn run(cli: &Cli) -> Result<()> {
    let config = open_config(cli.config_dir.as_ref());

    let stored = config
        .as_ref()
        .map(OptionsConfig::load_or_default)
        .unwrap_or_default();
    let options = cli.apply(stored);

    if cli.save_config {
        let Some(cfg) = &config else {
            bail!("no config directory available to save into");
        };
        // Unusable options would break every later run that loads them.
        RowTokenizer::new(&options.tokenizer).context("refusing to save config")?;
        cfg.save(&options).context("failed to save config")?;
    }

    let graph = TableLoader::new(options)
        .load(&cli.file)
        .with_context(|| format!("failed to convert {}", cli.file.display()))?;
    let rendered = render(graph.root(), cli.format)?;

    let mut out = io::stdout().lock();
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            // Nowhere left to report a failed usage write.
            err.print().ok();
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn delimiter_names_and_single_chars() {
        assert_eq!(parse_delimiter("tab"), Ok('\t'));
        assert_eq!(parse_delimiter("\\t"), Ok('\t'));
        assert_eq!(parse_delimiter("space"), Ok(' '));
        assert_eq!(parse_delimiter(";"), Ok(';'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(",,").is_err());
    }

    #[test]
    fn flags_override_stored_options() {
        let cli = Cli::try_parse_from([
            "table2atomese",
            "data.csv",
            "--delimiter",
            "tab",
            "--comment",
            "%",
            "--no-trim",
            "--strict-arity",
        ])
        .unwrap();
        let options = cli.apply(ConvertOptions::default());
        assert_eq!(options.tokenizer.delimiter, '\t');
        assert_eq!(options.tokenizer.comment_markers, vec!['%']);
        assert!(!options.tokenizer.trim);
        assert!(options.validation.arity);
        assert!(!options.validation.numeric);
    }

    #[test]
    fn stored_strictness_survives_absent_flags() {
        let cli = Cli::try_parse_from(["table2atomese", "data.csv"]).unwrap();
        let mut stored = ConvertOptions::default();
        stored.validation.numeric = true;
        assert!(cli.apply(stored).validation.numeric);
    }

    #[test]
    fn exactly_one_positional() {
        assert!(Cli::try_parse_from(["table2atomese"]).is_err());
        assert!(Cli::try_parse_from(["table2atomese", "a.csv", "b.csv"]).is_err());
    }
}
