//! `flixscrape` CLI - browse the catalog and resolve stream sources as JSON

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use flixscrape::{Catalog, Config, MediaType};

#[derive(Parser)]
#[command(name = "flixscrape")]
#[command(about = "Catalog scraper and stream resolver for FlixHQ-style sites")]
#[command(version)]
struct Cli {
    /// Override the catalog base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trending and latest sections of the landing page
    Home,

    /// List movies
    Movies {
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// List TV shows
    Tv {
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Top IMDB-rated titles
    Top {
        /// all, movie or tv
        #[arg(short = 't', long = "type", default_value = "all")]
        kind: String,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// List titles by genre, country, year or quality
    Filter {
        /// Filter kind (genre, country, year, quality)
        kind: String,

        /// Filter value (e.g. action, US, 2024, HD)
        value: String,

        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Search titles
    Search {
        /// Free-text query
        query: String,
    },

    /// Detail page for a slug (e.g. movie/watch-dune-19722)
    Details {
        slug: String,
    },

    /// Seasons of a TV show slug
    Seasons {
        slug: String,
    },

    /// Episodes of a season id
    Episodes {
        season_id: String,
    },

    /// Servers for a movie id or TV episode id
    Servers {
        content_id: String,

        /// movie or tv
        #[arg(short = 't', long = "type", default_value = "tv")]
        kind: MediaType,
    },

    /// Resolve a server id to a playable source
    Source {
        server_id: String,
    },

    /// Genres, countries, years and qualities
    Filters,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = Config::load()?.with_overrides(cli.base_url, None);
    let catalog = Catalog::from_config(&config)?;

    match cli.command {
        Commands::Home => print_json(&catalog.fetch_home().await)?,
        Commands::Movies { page } => print_json(&catalog.fetch_movies(page).await)?,
        Commands::Tv { page } => print_json(&catalog.fetch_tv_shows(page).await)?,
        Commands::Top { kind, page } => print_json(&catalog.fetch_top_imdb(&kind, page).await)?,
        Commands::Filter { kind, value, page } => {
            print_json(&catalog.filter(&kind, &value, page).await)?;
        }
        Commands::Search { query } => print_json(&catalog.search(&query).await)?,
        Commands::Details { slug } => print_json(&catalog.get_details(&slug).await)?,
        Commands::Seasons { slug } => print_json(&catalog.get_seasons(&slug).await)?,
        Commands::Episodes { season_id } => print_json(&catalog.get_episodes(&season_id).await)?,
        Commands::Servers { content_id, kind } => {
            print_json(&catalog.get_servers(&content_id, kind).await)?;
        }
        Commands::Source { server_id } => {
            // Surface the precise failure reason on the CLI
            let source = catalog.resolver().resolve(&server_id).await?;
            print_json(&source)?;
        }
        Commands::Filters => print_json(&catalog.fetch_filters().await)?,
    }

    Ok(())
}
