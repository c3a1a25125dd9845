use anyhow::Context;
use clap::Parser;
use logmentor::analysis::analysis_prompt;
use logmentor::config::{self, Config};
use logmentor::session::LogSession;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "logmentor", version, about = "Structure raw log text into records and analysis chunks")]
struct Cli {
    /// Input files (`-` for stdin). May be repeated.
    #[arg(required = false)]
    input: Vec<String>,

    /// JSON config file; `LOGMENTOR_*` environment variables override it
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Keep only raw lines mentioning this level (INFO, DEBUG, WARNING, ERROR or All)
    #[arg(long = "level")]
    level: Option<String>,

    /// Records per chunk
    #[arg(long = "chunk-size")]
    chunk_size: Option<usize>,

    /// Treat JSON lines as plain text
    #[arg(long = "no-json", default_value_t = false)]
    no_json: bool,

    /// Drop lines that appear before the first record header
    #[arg(long = "drop-orphans", default_value_t = false)]
    drop_orphans: bool,

    /// Print only a specific section: records | chunks | prompts
    #[arg(long = "only")]
    only: Option<String>,

    /// Output format: json | text (text without --only prints the chunks)
    #[arg(long = "format", default_value = "json")]
    format: String,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Concatenates all inputs, decoding invalid UTF-8 lossily.
fn read_input(paths: &[String]) -> anyhow::Result<String> {
    let mut bytes = Vec::new();
    for p in paths {
        if !bytes.is_empty() && !bytes.ends_with(b"\n") {
            bytes.push(b'\n');
        }
        if p == "-" {
            io::stdin().lock().read_to_end(&mut bytes).context("failed to read stdin")?;
        } else {
            File::open(p)
                .and_then(|mut f| f.read_to_end(&mut bytes))
                .with_context(|| format!("failed to read {p}"))?;
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => config::load(path)?,
        None => config::from_env()?,
    };
    if let Some(level) = &cli.level {
        cfg.level = level.clone();
    }
    if let Some(size) = cli.chunk_size {
        cfg.chunk_size = size;
    }
    if cli.no_json {
        cfg.parser.accept_json = false;
    }
    if cli.drop_orphans {
        cfg.parser.keep_unmatched_as_unknown = false;
    }
    cfg.validate()?;
    Ok(cfg)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    All,
    Records,
    Chunks,
    Prompts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

fn parse_section(only: Option<&str>) -> anyhow::Result<Section> {
    match only {
        None => Ok(Section::All),
        Some("records") => Ok(Section::Records),
        Some("chunks") => Ok(Section::Chunks),
        Some("prompts") => Ok(Section::Prompts),
        Some(other) => anyhow::bail!("unknown section {other:?}; expected records, chunks or prompts"),
    }
}

fn parse_format(format: &str) -> anyhow::Result<OutputFormat> {
    match format {
        "json" => Ok(OutputFormat::Json),
        "text" => Ok(OutputFormat::Text),
        other => anyhow::bail!("unknown format {other:?}; expected json or text"),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let section = parse_section(cli.only.as_deref())?;
    let format = parse_format(&cli.format)?;
    let cfg = resolve_config(&cli)?;

    let input_files = if cli.input.is_empty() {
        vec!["-".to_string()]
    } else {
        cli.input.clone()
    };
    let raw = read_input(&input_files)?;
    let session = LogSession::ingest(&raw, &cfg)?;

    match (section, format) {
        (Section::Records, OutputFormat::Text) => {
            for r in &session.records {
                println!("{r}");
            }
        }
        (Section::Records, OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&session.records)?);
        }
        // chunks already carry every record
        (Section::Chunks | Section::All, OutputFormat::Text) => {
            print_sections("Chunk", session.chunks.iter().map(|c| c.text.clone()));
        }
        (Section::Chunks, OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&session.chunks)?);
        }
        (Section::Prompts, _) => {
            let prompts: Vec<String> = session.chunks.iter().map(|c| analysis_prompt(&c.text)).collect();
            if format == OutputFormat::Text {
                print_sections("Prompt", prompts.into_iter());
            } else {
                println!("{}", serde_json::to_string_pretty(&prompts)?);
            }
        }
        (Section::All, OutputFormat::Json) => {
            let out = serde_json::json!({
                "records": session.records,
                "chunks": session.chunks,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

fn print_sections(label: &str, items: impl Iterator<Item = String>) {
    for (i, item) in items.enumerate() {
        if i > 0 {
            println!();
        }
        println!("# {label} {}", i + 1);
        println!("{item}");
    }
}
