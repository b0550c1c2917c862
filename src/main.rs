//! # tagsync CLI (`tks`)
//!
//! Drives the synchronization engine against a live tagged key-value
//! store from the command line. One-shot commands map to the engine's
//! operations; `repl` runs an interactive search loop with debounced
//! input.
//!
//! ## Usage
//!
//! ```bash
//! tks --config ./config/tks.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tks search [TAGS...]` | Search items by tag (`*` or nothing for all) |
//! | `tks create <KEY> <VALUE>` | Create a new item |
//! | `tks tag <KEY> <TAG>` | Attach a tag to an item |
//! | `tks untag <KEY> <TAG>` | Detach a tag from an item |
//! | `tks delete <KEY>` | Delete an item (prompts unless `--yes`) |
//! | `tks repl` | Interactive debounced search loop |
//! | `tks completions <SHELL>` | Generate shell completions |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

use tagsync::config::{load_config, Config};
use tagsync::item::{AutoConfirm, ConfirmAction, ItemController};
use tagsync::list::ListModel;
use tagsync::models::Item;
use tagsync::search::SearchController;
use tagsync::store::{HttpStore, Store};
use tagsync::view::ListView;

/// tagsync CLI: keep a tagged key-value listing in sync from the
/// command line.
#[derive(Parser)]
#[command(
    name = "tks",
    about = "tagsync: client-side search and synchronization for tagged key-value stores",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Defaults apply when the file
    /// does not exist.
    #[arg(long, global = true, default_value = "./config/tks.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search items by tag. No tags (or `*`) lists everything.
    Search {
        /// Tags to match; an item must carry all of them.
        tags: Vec<String>,
    },

    /// Create a new item.
    Create { key: String, value: String },

    /// Attach a tag to an item.
    Tag { key: String, tag: String },

    /// Detach a tag from an item.
    Untag { key: String, tag: String },

    /// Delete an item.
    Delete {
        key: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Interactive search loop. Each input line is a query; rapid lines
    /// are debounced into one request. Ctrl-D or `:quit` exits.
    Repl,

    /// Generate shell completions.
    Completions { shell: Shell },
}

/// Line-oriented render sink.
///
/// A terminal cannot patch a printed line in place, so only full list
/// renders and error notifications produce output; single-item patches
/// are reported by the command arms instead.
struct ConsoleView;

fn render_item(item: &Item) -> String {
    if item.tags.is_empty() {
        format!("{}  {}", item.key, item.value)
    } else {
        format!("{}  {}  [{}]", item.key, item.value, item.tags.join(" "))
    }
}

impl ListView for ConsoleView {
    fn replace_all(&self, items: &[Item]) {
        if items.is_empty() {
            println!("No items.");
            return;
        }
        for item in items {
            println!("{}", render_item(item));
        }
    }

    fn prepend(&self, _item: &Item) {}
    fn update_item(&self, _item: &Item) {}
    fn remove_item(&self, _key: &str) {}
    fn clear(&self) {}

    fn notify_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// Interactive confirmation for deletes.
struct PromptConfirm;

impl ConfirmAction for PromptConfirm {
    fn confirm(&self, key: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(format!("Delete `{key}`?"))
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

struct Session {
    store: Arc<dyn Store>,
    model: Arc<ListModel>,
    search: SearchController,
    items: ItemController,
}

fn build_session(config: &Config, confirm: Arc<dyn ConfirmAction>) -> Result<Session> {
    let store: Arc<dyn Store> =
        Arc::new(HttpStore::new(&config.store).context("cannot build store client")?);
    let model = Arc::new(ListModel::new());
    let view: Arc<dyn ListView> = Arc::new(ConsoleView);

    let search = SearchController::new(
        store.clone(),
        model.clone(),
        view.clone(),
        Duration::from_millis(config.search.debounce_ms),
    );
    let items = ItemController::new(
        store.clone(),
        model.clone(),
        view,
        confirm,
        config.rollback,
    );

    Ok(Session {
        store,
        model,
        search,
        items,
    })
}

impl Session {
    /// Load the current match-all listing so item operations can validate
    /// against, and patch, a populated projection.
    async fn preload(&self) -> Result<()> {
        let items = self
            .store
            .search(&[])
            .await
            .context("cannot list items from store")?;
        self.model.replace(items);
        Ok(())
    }
}

async fn run_repl(session: &Session, debounce_ms: u64) -> Result<()> {
    println!("Type tags to search (`*` for all), `:quit` to exit.");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim() == ":quit" {
            break;
        }
        session.search.submit(&line, false).await;
    }

    // Let a still-pending debounced search land before exiting.
    tokio::time::sleep(Duration::from_millis(debounce_ms + 100)).await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "tks", &mut std::io::stdout());
        return Ok(());
    }

    let config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        tracing::debug!(path = %cli.config.display(), "config file not found, using defaults");
        Config::default()
    };

    match cli.command {
        Commands::Search { tags } => {
            let session = build_session(&config, Arc::new(AutoConfirm))?;
            let raw = if tags.is_empty() {
                "*".to_string()
            } else {
                tags.join(" ")
            };
            session.search.submit(&raw, true).await;
        }

        Commands::Create { key, value } => {
            let session = build_session(&config, Arc::new(AutoConfirm))?;
            let created = session
                .items
                .create(&key, &value)
                .await
                .with_context(|| format!("cannot create `{key}`"))?;
            println!("created {}", render_item(&created));
        }

        Commands::Tag { key, tag } => {
            let session = build_session(&config, Arc::new(AutoConfirm))?;
            session.preload().await?;
            session
                .items
                .add_tag(&key, &tag)
                .await
                .with_context(|| format!("cannot tag `{key}`"))?;
            println!("tagged {key} with {tag}");
        }

        Commands::Untag { key, tag } => {
            let session = build_session(&config, Arc::new(AutoConfirm))?;
            session.preload().await?;
            session
                .items
                .remove_tag(&key, &tag)
                .await
                .with_context(|| format!("cannot untag `{key}`"))?;
            println!("untagged {key} from {tag}");
        }

        Commands::Delete { key, yes } => {
            let confirm: Arc<dyn ConfirmAction> = if yes {
                Arc::new(AutoConfirm)
            } else {
                Arc::new(PromptConfirm)
            };
            let session = build_session(&config, confirm)?;
            session.preload().await?;
            let deleted = session
                .items
                .delete(&key)
                .await
                .with_context(|| format!("cannot delete `{key}`"))?;
            if deleted {
                println!("deleted {key}");
            } else {
                println!("cancelled");
            }
        }

        Commands::Repl => {
            let session = build_session(&config, Arc::new(AutoConfirm))?;
            run_repl(&session, config.search.debounce_ms).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
