//! postsync CLI — keeps a JSON post index and post frontmatter in sync
//!
//! Commands: new, relink, info, last, watch, completions

mod prompt;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::Serialize;

use postsync_core::{SyncConfig, SyncError};
use postsync_vault::{
    FixedTitle, IndexEvent, IndexWatcher, PostInfo, RelinkReport, SyncEngine, TitleProvider,
};

use crate::prompt::{ConsolePrompt, DialogPrompt, PromptKind, Prompter, DATE_MESSAGE, TAGS_MESSAGE};

#[derive(Parser)]
#[command(name = "postsync")]
#[command(version)]
#[command(about = "Keep a JSON post index and post frontmatter in sync")]
struct Cli {
    /// Project root; paths in the config resolve against it
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to <root>/postsync.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log every document processed
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a new post and add it to the index
    #[command(alias = "create")]
    New {
        /// Post title; asked for when omitted and --prompt is given
        title: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Post date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Ask for whichever of title, tags and date were not given
        #[arg(long, value_enum)]
        prompt: Option<PromptKind>,
    },
    /// Rewrite prev/next links in every post from the index order
    Relink,
    /// Show a post by id
    Info {
        #[arg(long)]
        id: u64,
    },
    /// Show the post with the highest id
    Last,
    /// Relink now and again whenever the index changes
    Watch,
    /// Print a shell completion script
    Completions { shell: clap_complete::Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "postsync", &mut io::stdout());
        return Ok(());
    }

    let config = SyncConfig::load(&cli.root, cli.config.as_deref())
        .context("failed to load configuration")?;
    let engine = SyncEngine::new(config);

    match cli.command {
        Commands::New {
            title,
            tags,
            date,
            prompt,
        } => {
            let info =
                create_post(&engine, title, tags, date, prompt).context("failed to create post")?;
            if cli.json {
                print_json(&info)?;
            } else {
                println!(
                    "Created {} (id: {})",
                    info.document_path.display(),
                    info.entry.id
                );
                println!("Updated {}", engine.store().path().display());
            }
        }
        Commands::Relink => {
            let report = engine.relink_all().context("failed to relink posts")?;
            print_report(&report, cli.json)?;
        }
        Commands::Info { id } => match engine.post_info(id)? {
            Some(info) => print_info(&info, cli.json)?,
            None => bail!("no post found with id {id}"),
        },
        Commands::Last => match engine.last_post()? {
            Some(info) => print_info(&info, cli.json)?,
            None if cli.json => println!("null"),
            None => println!("No posts found."),
        },
        Commands::Watch => watch(&engine, cli.json)?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn create_post(
    engine: &SyncEngine,
    title: Option<String>,
    tags: Option<String>,
    date: Option<NaiveDate>,
    prompt: Option<PromptKind>,
) -> Result<PostInfo> {
    match (title, prompt) {
        (title, Some(PromptKind::Console)) => {
            let mut console = ConsolePrompt::new(io::BufReader::new(io::stdin()), io::stderr());
            create_interactively(engine, &mut console, title, tags, date)
        }
        (title, Some(PromptKind::Dialog)) => {
            create_interactively(engine, &mut DialogPrompt, title, tags, date)
        }
        (Some(title), None) => {
            let tags = tags.as_deref().map(parse_tags).unwrap_or_default();
            Ok(engine.create_post_from(&mut FixedTitle(title), tags, date)?)
        }
        (None, None) => bail!("a title is required (pass one, or use --prompt console|dialog)"),
    }
}

/// Asks for whatever the command line left out. A cancelled title aborts;
/// blank tags and date keep their defaults.
fn create_interactively<P: Prompter + TitleProvider>(
    engine: &SyncEngine,
    prompter: &mut P,
    title: Option<String>,
    tags: Option<String>,
    date: Option<NaiveDate>,
) -> Result<PostInfo> {
    let title = match title {
        Some(title) => Some(title),
        None => prompter.title()?,
    };
    let Some(title) = title else {
        return Err(SyncError::InvalidTitle.into());
    };
    let tags = match tags {
        Some(raw) => parse_tags(&raw),
        None => prompter
            .ask(TAGS_MESSAGE)?
            .as_deref()
            .map(parse_tags)
            .unwrap_or_default(),
    };
    let date = match date {
        Some(date) => Some(date),
        None => prompter
            .ask(DATE_MESSAGE)?
            .map(|raw| {
                raw.parse::<NaiveDate>()
                    .with_context(|| format!("invalid date {raw:?}, expected YYYY-MM-DD"))
            })
            .transpose()?,
    };
    Ok(engine.create_post_from(&mut FixedTitle(title), tags, date)?)
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_info(info: &PostInfo, json: bool) -> Result<()> {
    if json {
        return print_json(info);
    }
    println!("ID:    {}", info.entry.id);
    println!("Title: {}", info.entry.title);
    println!("Date:  {}", info.entry.date);
    if !info.entry.tags.is_empty() {
        println!("Tags:  {}", info.entry.tags.join(", "));
    }
    let missing = if info.document_exists { "" } else { " (missing)" };
    println!("File:  {}{missing}", info.document_path.display());
    Ok(())
}

fn print_report(report: &RelinkReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    for skipped in &report.skipped {
        println!("skipped {}: {}", skipped.slug, skipped.reason);
    }
    println!(
        "Relinked posts: {} updated, {} unchanged, {} skipped ({} missing, {} malformed, {} failed)",
        report.updated,
        report.unchanged,
        report.skipped.len(),
        report.missing(),
        report.malformed(),
        report.failed()
    );
    Ok(())
}

fn watch(engine: &SyncEngine, json: bool) -> Result<()> {
    let report = engine.relink_all().context("failed to relink posts")?;
    print_report(&report, json)?;

    let index_path: &Path = engine.store().path();
    let watcher = IndexWatcher::start(index_path).context("failed to watch the index")?;
    eprintln!("Watching {} for changes (Ctrl-C to stop)", index_path.display());

    loop {
        match watcher.recv_timeout(Duration::from_secs(1)) {
            Some(IndexEvent::Changed(_)) => {
                watcher.settle(Duration::from_millis(200));
                match engine.relink_all() {
                    Ok(report) => print_report(&report, json)?,
                    // A half-written index is common mid-save; wait for the next event.
                    Err(e) => tracing::warn!(error = %e, "relink failed"),
                }
            }
            Some(IndexEvent::Removed(path)) => {
                tracing::warn!(path = %path.display(), "index removed");
            }
            None => {}
        }
    }
}
