//! codenote command-line front end.
//!
//! # Responsibility
//! - Load configuration, start logging and open the note store.
//! - Map subcommands onto storage, tree, session and import operations.
//!
//! # Invariants
//! - Startup failures exit with code 2; command failures exit with code 1.
//! - Every document edit goes through a `DocumentSession`, so buffers are
//!   persisted before the process exits.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codenote_core::{init_logging, CoreConfig, NoteStore};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod editor;
mod output;

use output::Output;

#[derive(Parser)]
#[command(name = "codenote")]
#[command(about = "Categorized code snippets and notes")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Use this database file instead of the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage categories
    #[command(alias = "cat")]
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage documents
    Doc {
        #[command(subcommand)]
        command: DocCommands,
    },
    /// Search titles and content (case-insensitive)
    Search {
        query: String,
    },
    /// Print the category tree
    Tree {
        /// Only show documents matching this text, and their ancestors
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Show resolved configuration paths
    Config,
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories in display order
    #[command(alias = "ls")]
    List,
    /// Add a category ("New Category" when no name is given)
    Add {
        name: Option<String>,
        /// Parent category id (full UUID or prefix)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Rename a category
    Rename { id: String, name: String },
    /// Re-parent and/or reorder a category
    Move {
        id: String,
        /// New parent id; omit to move to the top level
        #[arg(short, long)]
        parent: Option<String>,
        /// Zero-based position among the new siblings; omit to append
        #[arg(long)]
        position: Option<usize>,
    },
    /// Delete a category, its sub-categories and all their documents
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand)]
enum DocCommands {
    /// List documents, optionally of one category
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Create a document
    New {
        /// Category id (full UUID or prefix)
        category: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Syntax language, e.g. "C#", "Python", "MarkDown"
        #[arg(short, long)]
        language: Option<String>,
        /// Initial content (empty when omitted)
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Print one document
    Show { id: String },
    /// Edit the content in $EDITOR
    Edit { id: String },
    /// Change the title
    Title { id: String, title: String },
    /// Change the syntax language
    Lang { id: String, language: String },
    /// Move to another category
    Move { id: String, category: String },
    /// Delete a document
    #[command(alias = "rm")]
    Delete { id: String },
    /// Import files as documents; language follows the extension
    Import {
        category: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Write a document to a directory as `<title>.<ext>`
    Export { id: String, dir: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(cli.json);

    let (config, store) = match startup(cli.db.clone()) {
        Ok(ready) => ready,
        Err(err) => {
            eprintln!("codenote: failed to start: {err:#}");
            return ExitCode::from(2);
        }
    };

    match run(cli.command, &config, &store, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err}");
            eprintln!("codenote: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn startup(db_override: Option<PathBuf>) -> Result<(CoreConfig, NoteStore)> {
    let config = CoreConfig::load().context("failed to load configuration")?;
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("codenote: logging disabled: {err}");
    }

    let db_path = db_override.unwrap_or_else(|| config.database_path());
    let store = NoteStore::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    Ok((config, store))
}

fn run(command: Commands, config: &CoreConfig, store: &NoteStore, output: &Output) -> Result<()> {
    match command {
        Commands::Category { command } => match command {
            CategoryCommands::List => commands::category::list(store, output),
            CategoryCommands::Add { name, parent } => {
                commands::category::add(store, name, parent, output)
            }
            CategoryCommands::Rename { id, name } => {
                commands::category::rename(store, &id, &name, output)
            }
            CategoryCommands::Move {
                id,
                parent,
                position,
            } => commands::category::move_to(store, &id, parent, position, output),
            CategoryCommands::Delete { id } => commands::category::delete(store, &id, output),
        },
        Commands::Doc { command } => match command {
            DocCommands::List { category } => commands::doc::list(store, category, output),
            DocCommands::New {
                category,
                title,
                language,
                content,
            } => commands::doc::create(store, &category, title, language, content, output),
            DocCommands::Show { id } => commands::doc::show(store, &id, output),
            DocCommands::Edit { id } => commands::doc::edit(store, config, &id, output),
            DocCommands::Title { id, title } => {
                commands::doc::set_title(store, config, &id, title, output)
            }
            DocCommands::Lang { id, language } => {
                commands::doc::set_language(store, config, &id, &language, output)
            }
            DocCommands::Move { id, category } => {
                commands::doc::move_to(store, &id, &category, output)
            }
            DocCommands::Delete { id } => commands::doc::delete(store, &id, output),
            DocCommands::Import { category, paths } => {
                commands::doc::import(store, &category, &paths, output)
            }
            DocCommands::Export { id, dir } => commands::doc::export(store, &id, &dir, output),
        },
        Commands::Search { query } => commands::doc::search(store, &query, output),
        Commands::Tree { filter } => commands::tree::show(store, filter.as_deref(), output),
        Commands::Config => {
            output.print_config(config);
            Ok(())
        }
    }
}
