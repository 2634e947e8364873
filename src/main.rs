use clap::{Parser, Subcommand};
use iiif_gallery::config::{self, GalleryConfig};
use iiif_gallery::gallery::Gallery;
use iiif_gallery::ingest::{self, HttpFetcher, Ingested};
use iiif_gallery::session::Session;
use iiif_gallery::{collection, generate, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Where the session's manifests come from.
#[derive(clap::Args, Clone)]
struct SessionArgs {
    /// IIIF manifest URLs; each argument may be a comma-separated list
    urls: Vec<String>,

    /// Exported collection to load first (replaces the session)
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "iiif-gallery")]
#[command(about = "Curate IIIF manifests into an image gallery")]
#[command(long_about = "\
Curate IIIF manifests into an image gallery

Manifests are fetched in the order given and every canvas with an image
service becomes a card. Card fields take the first available value:

  Title:       manifest label → canvas label → \"No title\"
  Author:      canvas \"Author\" → manifest \"Author\" → \"Unknown\"
  Date:        canvas \"Date\" → manifest \"Date\" → \"Unknown\"
  Collection:  canvas \"Collection\" → manifest \"Collection\" → \"Unknown\"
  Item link:   related → Identifier → Item Url → canvas @id

The curated set can be exported as a single IIIF collection and loaded
again later with --load.

Run 'iiif-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect manifests and list their gallery cards
    Cards {
        #[command(flatten)]
        session: SessionArgs,

        /// Print the cards as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save the collected manifests as one IIIF collection
    Export {
        #[command(flatten)]
        session: SessionArgs,

        /// Collection name; also the file name
        #[arg(long)]
        name: String,

        /// Directory for <NAME>.json
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Render the card gallery as a static HTML page
    Render {
        #[command(flatten)]
        session: SessionArgs,

        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,

        /// Page title
        #[arg(long, default_value = "IIIF Gallery")]
        title: String,

        /// Move the card at FROM onto position TO (1-based, repeatable)
        #[arg(long = "move", value_name = "FROM:TO", value_parser = parse_move)]
        moves: Vec<(usize, usize)>,

        /// Hide the card at POS after moves are applied (1-based, repeatable)
        #[arg(long, value_name = "POS")]
        hide: Vec<usize>,
    },
    /// Summarise an exported collection file
    Inspect {
        /// Collection JSON file
        file: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Cards { session, json } => {
            let config = load_config(cli.config.as_deref())?;
            let (session, ingested) = collect(&session, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&session.cards())?);
            } else {
                output::print_ingest_summary(&ingested);
            }
        }
        Command::Export {
            session,
            name,
            out_dir,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let (session, _) = collect(&session, &config)?;
            let combined = collection::export_with_id_base(
                &name,
                session.manifests(),
                &config.collection.id_base,
            )?;
            let path = collection::write_collection(&out_dir, &combined)?;
            println!("{}", output::format_export(&path, &combined));
        }
        Command::Render {
            session,
            output: output_dir,
            title,
            moves,
            hide,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let (session, _) = collect(&session, &config)?;
            let gallery = arrange(Gallery::from_session(&session), &moves, &hide);
            let path = generate::generate(&gallery, &title, &config, &output_dir)?;
            println!("{}", output::format_render(&path, gallery.len()));
        }
        Command::Inspect { file } => {
            let combined = collection::read_collection(&file)?;
            output::print_collection(&combined);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only command output.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GalleryConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

/// Build the session: `--load` first, then every URL in order.
///
/// A URL that fails is reported and skipped; a collection file that cannot
/// be loaded aborts the command.
fn collect(
    args: &SessionArgs,
    config: &GalleryConfig,
) -> Result<(Session, Vec<Ingested>), Box<dyn std::error::Error>> {
    let mut session = Session::new();
    let mut ingested = Vec::new();

    if let Some(path) = &args.load {
        ingested = ingest::ingest_from_file(&mut session, path)?;
    }

    let urls: Vec<String> = args
        .urls
        .iter()
        .flat_map(|arg| ingest::split_urls(arg))
        .collect();
    if !urls.is_empty() {
        let fetcher = HttpFetcher::new(&config.fetch);
        for outcome in ingest::ingest_urls(&mut session, &fetcher, &urls) {
            match outcome.result {
                Ok(item) => ingested.push(item),
                Err(err) => {
                    output::print_alert(&output::format_fetch_failure(&outcome.url, &err))
                }
            }
        }
    }

    Ok((session, ingested))
}

/// Apply 1-based moves in order, then hide cards by 1-based position.
fn arrange(mut gallery: Gallery, moves: &[(usize, usize)], hide: &[usize]) -> Gallery {
    for &(from, to) in moves {
        if !gallery.move_card(from.wrapping_sub(1), to.wrapping_sub(1)) {
            tracing::warn!(from, to, "ignoring card move outside the gallery");
        }
    }

    let mut hide: Vec<usize> = hide.iter().filter(|&&pos| pos > 0).map(|pos| pos - 1).collect();
    hide.sort_unstable();
    hide.dedup();
    for index in hide.into_iter().rev() {
        if gallery.remove_card(index).is_none() {
            tracing::warn!(position = index + 1, "ignoring hide outside the gallery");
        }
    }
    gallery
}

fn parse_move(raw: &str) -> Result<(usize, usize), String> {
    let (from, to) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{raw}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid position '{s}': {e}"))
    };
    Ok((parse(from)?, parse(to)?))
}
