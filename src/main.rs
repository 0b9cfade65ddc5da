use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use mood2music::{Config, ResolutionEngine};

#[derive(Parser, Debug)]
#[command(name = "mood2music")]
#[command(version, about = "Music recommendations by mood")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available themes
    Themes,

    /// List the genres behind a theme
    Genres { theme: String },

    /// Smart search: free text, theme, or both
    Resolve {
        /// Search text; omit for theme picks or popular tracks
        #[arg(default_value = "")]
        query: String,

        #[arg(short, long)]
        theme: Option<String>,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Most popular tracks of a theme
    Theme {
        theme: String,

        #[arg(long, default_value_t = 2)]
        per_genre: usize,

        #[arg(long, default_value_t = 10)]
        max: usize,
    },

    /// One page of a theme, drawn from all of its genres
    Extended {
        theme: String,

        #[arg(long, default_value_t = 0)]
        offset: usize,

        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Resolve queries read from stdin, one per line, sharing one cache
    Interactive {
        #[arg(short, long)]
        theme: Option<String>,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Autocomplete suggestions for a partial query
    Suggest {
        partial: String,

        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializar logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mood2music=debug".parse()?)
                .add_directive("reqwest=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    info!("🎵 Starting mood2music v{}", env!("CARGO_PKG_VERSION"));

    // Cargar configuración
    let config = Config::load()?;
    info!("{}", config.summary());

    let engine = Arc::new(ResolutionEngine::from_config(&config)?);

    match cli.command {
        Command::Themes => print_json(&engine.themes())?,
        Command::Genres { theme } => print_json(&engine.genres_for(&theme))?,
        Command::Resolve {
            query,
            theme,
            limit,
        } => {
            let limit = limit.unwrap_or(config.default_limit);
            let response = engine.resolve(&query, theme.as_deref(), limit).await;
            print_json(&response)?;
        }
        Command::Theme {
            theme,
            per_genre,
            max,
        } => print_json(&engine.songs_by_theme(&theme, per_genre, max).await?)?,
        Command::Extended {
            theme,
            offset,
            limit,
        } => print_json(&engine.extended_songs_by_theme(&theme, offset, limit).await?)?,
        Command::Interactive { theme, limit } => {
            let limit = limit.unwrap_or(config.default_limit);
            let maintenance = ResolutionEngine::spawn_maintenance(&engine, engine.cache().ttl());
            info!("⌨️ Reading queries from stdin, one per line");

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let response = engine.resolve(line.trim(), theme.as_deref(), limit).await;
                print_json(&response)?;
            }

            maintenance.abort();
        }
        Command::Suggest { partial, limit } => {
            print_json(&engine.search_suggestions(&partial, limit).await)?
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
