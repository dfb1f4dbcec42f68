//! Command line front end for the movie ranker
//!
//! Searches for movies, adds them with a category, walks the user through
//! the follow-up comparison, and prints the current rankings.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use movie_ranker::config::AppConfig;
use movie_ranker::search::{suggestions, MovieSearchProvider, TmdbClient};
use movie_ranker::{Category, Item, OutcomeSummary, Ranker};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// Movie Ranker - rank movies by comparing them two at a time
#[derive(Parser)]
#[command(
    name = "movie-ranker",
    version,
    about = "Rank movies by comparing them two at a time",
    long_about = "Movie Ranker keeps a personal ranking of movies. Each new movie gets a \
                 category (good, okay, bad) and is then compared with the closest-rated movie \
                 already ranked; an adaptive Elo rating turns those comparisons into a score."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Data file override
    #[arg(long, value_name = "PATH", help = "Override the JSON file holding the rankings")]
    data_file: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search TMDB for movies matching a query
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Show TMDB details for a movie id
    Details { id: u64 },
    /// Add a movie with a category and compare it with its closest rival
    Add {
        title: String,
        #[arg(short, long, help = "good, okay or bad")]
        category: Category,
        #[arg(long, value_enum, help = "Answer the comparison without prompting")]
        winner: Option<AddWinner>,
    },
    /// Compare two ranked movies by title
    Compare {
        first: String,
        second: String,
        #[arg(long, value_enum)]
        winner: Side,
    },
    /// Print the rankings, best first
    Rankings {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
    /// Delete every ranked movie
    DeleteAll {
        #[arg(long, help = "Confirm the deletion")]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AddWinner {
    New,
    Existing,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    First,
    Second,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file/environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(data_file) = &args.data_file {
        config.storage.data_file = data_file.clone();
    }

    movie_ranker::config::validate_config(&config)?;
    Ok(config)
}

fn format_ranking_line(position: usize, item: &Item) -> String {
    format!(
        "{:>3}. {:<30} Score: {:>4.1}  Elo: {:>4}  ({}-{})",
        position,
        item.title,
        item.visible_score,
        item.rating as i64,
        item.wins,
        item.losses
    )
}

fn print_outcome(ranker: &Ranker, summary: &OutcomeSummary) {
    let title = |id| {
        ranker
            .get(id)
            .map(|item| item.title.clone())
            .unwrap_or_default()
    };

    println!(
        "'{}' wins the comparison! ({:.1} -> {:.1}, '{}' {:.1} -> {:.1})",
        title(summary.winner.item_id),
        summary.winner.old_visible_score,
        summary.winner.new_visible_score,
        title(summary.loser.item_id),
        summary.loser.old_visible_score,
        summary.loser.new_visible_score
    );
}

/// Ask which of two movies is better. `None` on end of input.
fn prompt_for_winner(new_item: &Item, opponent: &Item) -> Result<Option<bool>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("Select the better movie:");
        println!("  [1] {}", new_item.title);
        println!("  [2] {}", opponent.title);
        print!("> ");
        io::stdout().flush()?;

        match lines.next() {
            Some(line) => match line?.trim() {
                "1" => return Ok(Some(true)),
                "2" => return Ok(Some(false)),
                other => println!("Please answer 1 or 2 (got '{}')", other),
            },
            None => return Ok(None),
        }
    }
}

fn find_id(ranker: &Ranker, title: &str) -> Result<movie_ranker::ItemId> {
    ranker
        .find_by_title(title)
        .map(|item| item.id)
        .ok_or_else(|| {
            movie_ranker::RankingError::ItemNotFound {
                item_id: title.to_string(),
            }
            .into()
        })
}

async fn run_search(config: &AppConfig, query: &str) -> Result<()> {
    let client = TmdbClient::new(&config.search)?;
    let results = suggestions(&client, query, config.search.min_query_length).await;

    if results.is_empty() {
        println!("No movies found.");
    }
    for result in results {
        println!("{:>8}  {}", result.id, result.display_label());
    }
    Ok(())
}

async fn run_details(config: &AppConfig, id: u64) -> Result<()> {
    let client = TmdbClient::new(&config.search)?;

    match client.details(id).await {
        Some(details) => {
            println!("{} ({})", details.title, details.release_date.unwrap_or_default());
            if let Some(runtime) = details.runtime_minutes {
                println!("Runtime: {} min", runtime);
            }
            if !details.genres.is_empty() {
                println!("Genres: {}", details.genres.join(", "));
            }
            if let Some(overview) = details.overview {
                println!("\n{}", overview);
            }
        }
        None => println!("Movie {} not found.", id),
    }
    Ok(())
}

fn run_add(ranker: &mut Ranker, title: &str, category: Category, winner: Option<AddWinner>) -> Result<()> {
    let Some(opponent) = ranker.add_item(title, category)? else {
        println!("Added '{}'. No other movie to compare it with yet.", title.trim());
        return Ok(());
    };
    debug!("Pending comparison against {}", opponent);

    let new_item_wins = match winner {
        Some(AddWinner::New) => Some(true),
        Some(AddWinner::Existing) => Some(false),
        None => {
            let (new_item, opponent) = ranker
                .pending_comparison()
                .ok_or_else(|| anyhow!("comparison went missing"))?;
            prompt_for_winner(new_item, opponent)?
        }
    };

    match new_item_wins {
        Some(new_item_wins) => {
            let summary = ranker.report_outcome(new_item_wins)?;
            print_outcome(ranker, &summary);
        }
        None => println!("No answer given; '{}' was added without a comparison.", title.trim()),
    }
    Ok(())
}

fn run_compare(ranker: &mut Ranker, first: &str, second: &str, winner: Side) -> Result<()> {
    let first = find_id(ranker, first)?;
    let second = find_id(ranker, second)?;

    let summary = ranker.compare(first, second, matches!(winner, Side::First))?;
    print_outcome(ranker, &summary);
    Ok(())
}

fn run_rankings(ranker: &Ranker, json: bool) -> Result<()> {
    let rankings = ranker.rankings();

    if json {
        println!("{}", serde_json::to_string_pretty(&rankings)?);
        return Ok(());
    }

    if rankings.is_empty() {
        println!("No movies ranked yet.");
    }
    for (i, item) in rankings.iter().enumerate() {
        println!("{}", format_ranking_line(i + 1, item));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "{} v{} using {}",
        config.service.name,
        movie_ranker::VERSION,
        config.storage.data_file.display()
    );

    match args.command {
        Command::Search { query } => run_search(&config, &query.join(" ")).await,
        Command::Details { id } => run_details(&config, id).await,
        Command::Add {
            title,
            category,
            winner,
        } => {
            let mut ranker = Ranker::from_config(&config)?;
            run_add(&mut ranker, &title, category, winner)
        }
        Command::Compare {
            first,
            second,
            winner,
        } => {
            let mut ranker = Ranker::from_config(&config)?;
            run_compare(&mut ranker, &first, &second, winner)
        }
        Command::Rankings { json } => {
            let ranker = Ranker::from_config(&config)?;
            run_rankings(&ranker, json)
        }
        Command::DeleteAll { yes } => {
            if !yes {
                println!("This deletes every ranked movie and cannot be undone. Re-run with --yes.");
                return Ok(());
            }
            let mut ranker = Ranker::from_config(&config)?;
            if ranker.delete_all() {
                println!("All movies have been deleted.");
                Ok(())
            } else {
                Err(anyhow!("Failed to delete movies"))
            }
        }
    }
}
