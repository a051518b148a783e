//! CollectionBar command line.
//!
//! Runs the background controller's operations once against the local stores:
//! initialize, sync, reset, show the bookmark tree, and edit settings.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use collectionbar::app::App;
use collectionbar::services::notifications::NotificationService;
use collectionbar::types::bookmark::{BookmarkNode, BrowserLayout};
use collectionbar::types::settings::SettingsUpdate;

#[derive(Parser, Debug)]
#[command(name = "collectionbar", version, about = "Mirror remote link collections into the bookmark bar")]
struct Args {
    /// Directory holding the bookmark store and settings (defaults to the platform directories).
    #[arg(long, env = "COLLECTIONBAR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Default folder layout of a new bookmark store: chromium or firefox.
    #[arg(long, env = "COLLECTIONBAR_BROWSER", default_value = "chromium")]
    browser: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Back up the bookmark bar and mark the extension initialized.
    Init,
    /// Fetch collections and mirror them into the bookmark bar.
    Sync,
    /// Restore the original bookmark bar and clear all settings.
    Reset,
    /// Print the bookmark tree.
    Tree,
    /// Show or change settings.
    Config {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        /// UI language tag such as `en` or `fr`; an empty value restores system detection.
        #[arg(long)]
        language: Option<String>,
    },
}

fn print_tree(node: &BookmarkNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match &node.url {
        Some(url) => println!("{}- {} <{}>", indent, node.title, url),
        None => println!("{}+ {} [{}]", indent, node.title, node.id),
    }
    for child in node.child_nodes() {
        print_tree(child, depth + 1);
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}…", visible)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let layout = BrowserLayout::parse(&args.browser)
        .ok_or_else(|| format!("unknown browser layout: {}", args.browser))?;
    let app = App::open(args.data_dir.as_deref(), layout, NotificationService::default())?;

    match args.command {
        Command::Init => {
            if app.get_settings()?.is_initialized {
                println!("Already initialized");
            } else if app.initialize().await? {
                println!("Initialized; bookmark bar moved to backup");
            } else {
                println!("Initialized; nothing to back up");
            }
        }
        Command::Sync => {
            let collections = app.sync_and_notify().await?;
            println!("Synced {} collections", collections.len());
        }
        Command::Reset => {
            let restored = app.reset().await?;
            println!("Reset complete; restored {} bookmarks", restored);
        }
        Command::Tree => {
            let tree = app.bookmarks().get_tree().await?;
            print_tree(&tree, 0);
        }
        Command::Config {
            base_url,
            api_key,
            language,
        } => {
            let settings = if base_url.is_none() && api_key.is_none() && language.is_none() {
                app.get_settings()?
            } else {
                app.update_settings(SettingsUpdate {
                    base_url,
                    api_key,
                    language,
                    ..Default::default()
                })?
            };
            println!("base url:    {}", settings.base_url);
            println!("api key:     {}", mask(&settings.api_key));
            println!("language:    {}", settings.language.as_deref().unwrap_or("(system)"));
            println!("initialized: {}", settings.is_initialized);
            println!(
                "last sync:   {}",
                if settings.last_sync.is_empty() { "never" } else { settings.last_sync.as_str() }
            );
        }
    }
    Ok(())
}
