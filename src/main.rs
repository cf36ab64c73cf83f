use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ini::{Charset, Ini, IniOptions};

/// Read an INI file and write it back out, normalized.
#[derive(Parser)]
#[command(name = "ini", version)]
struct Cli {
    /// File to read.
    input: PathBuf,

    /// File to write.
    output: PathBuf,

    /// Encoding of both files (default: detected from a byte order mark, else UTF-8).
    #[arg(long, value_enum)]
    charset: Option<CharsetArg>,

    /// Accept repeated sections and options.
    #[arg(long)]
    allow_duplicates: bool,

    /// Accept keys without a value.
    #[arg(long)]
    allow_no_value: bool,

    /// Leave `${...}` references unexpanded.
    #[arg(long)]
    no_interpolation: bool,

    /// End multi-line values at the first blank line.
    #[arg(long)]
    no_empty_lines_in_values: bool,

    /// Write `key=value` instead of `key = value`.
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CharsetArg {
    #[value(name = "utf-8")]
    Utf8,
    #[value(name = "utf-16le")]
    Utf16Le,
}

impl From<CharsetArg> for Charset {
    fn from(value: CharsetArg) -> Self {
        match value {
            CharsetArg::Utf8 => Charset::Utf8,
            CharsetArg::Utf16Le => Charset::Utf16Le,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let options = IniOptions::default()
        .with_allow_duplicates(cli.allow_duplicates)
        .with_allow_no_value(cli.allow_no_value)
        .with_interpolation(!cli.no_interpolation)
        .with_empty_lines_in_values(!cli.no_empty_lines_in_values)
        .with_space_around_delimiters(!cli.compact);

    let data = fs::read(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let charset = cli
        .charset
        .map_or_else(|| Charset::sniff(&data), Charset::from);

    let ini = Ini::from_reader(&mut data.as_slice(), charset, options)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;

    ini.write_to_path(&cli.output, charset)
        .with_context(|| format!("failed to save {}", cli.output.display()))?;

    info!(
        sections = ini.sections().count(),
        output = %cli.output.display(),
        "wrote round-tripped copy"
    );

    Ok(())
}
