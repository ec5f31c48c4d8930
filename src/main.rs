mod config;
mod engine;
mod metrics;
mod proof;
mod session;
mod utils;

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{AppConfig, DEFAULT_CONFIG_FILE};
use engine::config::{TieBreak, TrailingBits};
use metrics::CodingStats;
use session::{CodingSession, SessionReport};

#[derive(Parser)]
#[command(name = "huffline")]
#[command(about = "Huffman-code one line of text and verify the round trip")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, global = true, help = "Config file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Output as JSON")]
    json: bool,

    #[arg(long, global = true, value_enum, help = "Merge order for equal weights (overrides config)")]
    tie_break: Option<TieBreak>,

    #[arg(long, global = true, value_enum, help = "Incomplete trailing code handling (overrides config)")]
    trailing: Option<TrailingBits>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print codes, encoded digits and decoded text (default)
    Run {
        #[arg(long, help = "Text to encode instead of reading stdin")]
        text: Option<String>,
    },
    /// Print the Huffman tree structure
    Tree {
        #[arg(long)]
        text: Option<String>,
    },
    /// Print compression statistics
    Stats {
        #[arg(long)]
        text: Option<String>,
    },
    /// Decode digits against the tree built from a reference text
    Decode {
        #[arg(long, help = "Encoded digits, e.g. 0110")]
        bits: String,
        #[arg(long, help = "Reference text the digits were encoded from")]
        text: Option<String>,
    },
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("huffline=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let load = || -> Result<(AppConfig, CodingSession)> {
        let mut config = AppConfig::load(cli.config.as_deref())?;
        if let Some(tie_break) = cli.tie_break {
            config.engine.tie_break = tie_break;
        }
        if let Some(trailing) = cli.trailing {
            config.engine.trailing_bits = trailing;
        }
        let session = CodingSession::new(config.engine.clone());
        Ok((config, session))
    };
    let mut stdout = io::stdout().lock();

    match cli.command.unwrap_or(Commands::Run { text: None }) {
        Commands::Run { text } => {
            let (config, session) = load()?;
            let text = read_input(text)?;
            let report = session.run(&text)?;
            if cli.json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                write_report(&mut stdout, &report)?;
                if config.output.show_tree {
                    if let Some(tree) = &report.tree {
                        writeln!(stdout)?;
                        write!(stdout, "{}", tree)?;
                    }
                }
                if config.output.show_stats {
                    writeln!(stdout)?;
                    write_stats(&mut stdout, &report.stats)?;
                }
            }
        }
        Commands::Tree { text } => {
            let (_, session) = load()?;
            let text = read_input(text)?;
            match session.prepare(&text).tree {
                Some(tree) => {
                    info!(leaves = tree.leaf_count(), weight = tree.weight(), "rendering tree");
                    write!(stdout, "{}", tree)?;
                }
                None => writeln!(stdout, "(empty input, no tree)")?,
            }
        }
        Commands::Stats { text } => {
            let (_, session) = load()?;
            let text = read_input(text)?;
            let book = session.prepare(&text);
            let stats = CodingStats::collect(&text, &book.frequencies, &book.codes);
            if cli.json {
                writeln!(stdout, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                write_stats(&mut stdout, &stats)?;
            }
        }
        Commands::Decode { bits, text } => {
            let (_, session) = load()?;
            let text = read_input(text)?;
            let decoded = session.decode_with(&text, &bits)?;
            if cli.json {
                writeln!(stdout, "{}", serde_json::json!({"decoded": decoded}))?;
            } else {
                writeln!(stdout, "Decoded: {}", decoded)?;
            }
        }
        // Never loads the existing file, so a broken one can be regenerated.
        Commands::GenerateConfig { output } => {
            AppConfig::write_default(&output)?;
            info!("Wrote default config to {}", output);
            writeln!(stdout, "✅ Configuration written to {}", output)?;
        }
    }

    Ok(())
}

/// `--text` wins; otherwise one line from stdin.
fn read_input(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Enter text: ");
        io::stderr().flush()?;
    }

    read_line(&mut stdin.lock())
}

/// One line without its line ending. Symbols are chars, so the line must be UTF-8.
fn read_line(reader: &mut impl BufRead) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_until(b'\n', &mut bytes)?;
    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    String::from_utf8(bytes).context("input line is not valid UTF-8")
}

fn write_report(out: &mut impl Write, report: &SessionReport) -> io::Result<()> {
    writeln!(out, "Huffman codes:")?;
    for (symbol, code) in report.codes.iter() {
        writeln!(out, "{}: {}", symbol, code)?;
    }
    writeln!(out)?;
    writeln!(out, "Encoded: {}", report.encoded)?;
    writeln!(out, "Decoded: {}", report.decoded)
}

fn write_stats(out: &mut impl Write, stats: &CodingStats) -> io::Result<()> {
    writeln!(out, "Symbols:          {} ({} distinct)", stats.total_symbols, stats.distinct_symbols)?;
    writeln!(out, "Encoded bits:     {}", stats.encoded_bits)?;
    writeln!(out, "Baseline bits:    {}", stats.baseline_bits)?;
    writeln!(out, "Ratio:            {:.3}", stats.compression_ratio)?;
    writeln!(out, "Avg code length:  {:.3} bits", stats.average_code_length)?;
    writeln!(out, "Entropy:          {:.3} bits/symbol", stats.entropy_bits)?;
    writeln!(out, "Max code length:  {}", stats.max_code_length)
}
