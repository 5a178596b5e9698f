mod catalog;
mod favorites;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use vitrine_server::filter::FilterQuery;

use crate::favorites::FavoritesCommands;

#[derive(Debug, Parser)]
#[command(name = "vitrine-cli")]
#[command(about = "Vitrine storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the published sheet and print the normalized records
    Catalog {
        /// Published-to-web CSV URL of the sheet
        #[arg(long, env = "VITRINE_SHEET_URL", default_value = vitrine_core::DEFAULT_SHEET_URL)]
        url: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Print the fallback catalog instead of failing when the sheet is unusable
        #[arg(long)]
        allow_fallback: bool,
        #[arg(long, default_value = "15")]
        timeout_secs: u64,
    },
    /// Render the storefront page once using the server configuration
    Render {
        /// Write the page here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Search text
        #[arg(long)]
        q: Option<String>,
        /// Store slug, `favorites` or `all`
        #[arg(long)]
        store: Option<String>,
        /// Category slug or `all`
        #[arg(long)]
        category: Option<String>,
    },
    /// Inspect or edit the persisted favorites
    Favorites {
        /// JSON state file shared with the server
        #[arg(long, env = "VITRINE_STATE_PATH", default_value = "./data/state.json")]
        state: PathBuf,
        #[command(subcommand)]
        command: FavoritesCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Catalog {
            url,
            format,
            allow_fallback,
            timeout_secs,
        }) => catalog::run_catalog(&url, format, allow_fallback, timeout_secs).await?,
        Some(Commands::Render {
            out,
            q,
            store,
            category,
        }) => {
            let filter = FilterQuery { q, store, category };
            catalog::run_render(&filter, out.as_deref()).await?;
        }
        Some(Commands::Favorites { state, command }) => {
            favorites::run_favorites(&state, &command)?;
        }
        None => println!("vitrine-cli: pass --help to list commands"),
    }

    Ok(())
}
