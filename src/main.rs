//! CLI entry point: read strings, build the index, serve queries.

use std::fs::File;
use std::io::{BufReader, Read};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use neardex::ingest::{self, InputFormat};
use neardex::metric::MetricKind;
use neardex::normalize::NormalForm;
use neardex::server::{self, AppState};
use neardex::vptree::VpTree;

#[derive(Parser)]
#[command(name = "neardex")]
#[command(about = "k-nearest-neighbor search server for string collections")]
struct Args {
    /// Bind the HTTP server to this address
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Verbose logging to stderr
    #[arg(long)]
    debug: bool,

    /// Input format: lines or json
    #[arg(long, default_value = "lines")]
    format: String,

    /// String distance metric: levenshtein, levenshtein_bytes,
    /// damerau_levenshtein or jaccard_trigrams
    #[arg(long, default_value = "levenshtein")]
    metric: String,

    /// Unicode normalization: NFC, NFD, NFKC, NFKD or empty for none
    #[arg(long, default_value = "")]
    normalize: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Input file; "-" or no argument reads stdin
    input: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let format: InputFormat = args.format.parse()?;
    let metric: MetricKind = args.metric.parse()?;
    let norm = NormalForm::parse(&args.normalize)?;

    let mut strings = match args.input.as_deref() {
        None | Some("-") => read_input(std::io::stdin(), format)?,
        Some(path) => {
            let file = File::open(path).with_context(|| format!("cannot open {path}"))?;
            read_input(file, format)?
        }
    };
    if let Some(form) = norm {
        for s in &mut strings {
            *s = form.apply(s);
        }
    }

    tracing::debug!(count = strings.len(), "building index");
    let start = Instant::now();
    let tree = tokio::task::spawn_blocking(move || VpTree::build(metric, strings)).await??;
    tracing::info!(size = tree.len(), elapsed = ?start.elapsed(), "index ready");

    let state = AppState {
        tree,
        metric,
        norm,
        timeout: Duration::from_secs(args.timeout),
    };
    server::serve(&args.addr, state).await
}

fn read_input<R: Read>(reader: R, format: InputFormat) -> anyhow::Result<Vec<String>> {
    ingest::read_strings(BufReader::new(reader), format).context("cannot read input")
}
