//! Favorites commands over the server's JSON state file.

use std::path::Path;
use std::sync::Arc;

use clap::Subcommand;
use vitrine_server::favorites::FavoritesStore;
use vitrine_server::storage::JsonFileStore;

/// Sub-commands available under `favorites`.
#[derive(Debug, Subcommand)]
pub enum FavoritesCommands {
    /// List favorited titles in the order they were added
    List,
    /// Add the title if absent, remove it if present
    Toggle {
        /// Exact product title
        title: String,
    },
    /// Remove every favorite
    Clear,
}

/// # Errors
///
/// Returns an error if the state file cannot be written.
pub(crate) fn run_favorites(state: &Path, command: &FavoritesCommands) -> anyhow::Result<()> {
    let favorites = FavoritesStore::new(Arc::new(JsonFileStore::new(state)));
    for line in apply(&favorites, command)? {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn apply(
    favorites: &FavoritesStore,
    command: &FavoritesCommands,
) -> anyhow::Result<Vec<String>> {
    let lines = match command {
        FavoritesCommands::List => {
            let titles = favorites.titles();
            if titles.is_empty() {
                vec!["no favorites".to_owned()]
            } else {
                titles
            }
        }
        FavoritesCommands::Toggle { title } => {
            let added = favorites.toggle(title)?;
            let verb = if added { "added" } else { "removed" };
            vec![format!("{verb}: {title} ({} total)", favorites.count())]
        }
        FavoritesCommands::Clear => {
            favorites.clear()?;
            vec!["favorites cleared".to_owned()]
        }
    };
    Ok(lines)
}
