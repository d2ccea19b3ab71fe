use clap::{Parser, Subcommand};
use log::{debug, info};
use pantry_finder::discovery::{self, MOODS, QUICK_PICKS};
use pantry_finder::{
    JsonFileStore, MealDbClient, MealDetail, MealSource, MealSummary, PantryConfig, Preferences,
    Resolver, ResolverState, SearchSession,
};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const LONG_ABOUT: &str = "\
Find something to cook from what is in the fridge.

Type one or more ingredients (space or comma separated) and pantry lists the
recipes that use all of them. When nothing uses every ingredient, the input
is searched as a dish name instead, so \"biryani\" or \"lasagna\" work too.

Favorites, recent searches and the last query are kept in a small JSON file.";

const AFTER_HELP: &str = "\
EXAMPLES:
    Recipes with chicken and rice:
        $ pantry search chicken, rice

    Open a recipe:
        $ pantry show 52772

    Let the chef decide:
        $ pantry random

    Search as you type (one line per keystroke state):
        $ pantry watch

CONFIGURATION:
    pantry.toml in the current directory, or PANTRY__* environment variables,
    e.g. PANTRY__DEBOUNCE_MS=500. Set RUST_LOG=debug for request logs.";

#[derive(Parser)]
#[command(name = "pantry")]
#[command(version)]
#[command(about = "Find recipes by ingredients or dish name")]
#[command(long_about = LONG_ABOUT)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Preferences file (overrides the configured store_path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search by ingredients, falling back to dish name
    Search {
        /// Ingredients or a dish name
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Show the full recipe for an id
    Show { id: String },
    /// Chef's choice, or several random recipes with --count
    Random {
        #[arg(long)]
        count: Option<usize>,
    },
    /// Add or remove a favorite
    Fav { id: String },
    /// List favorite recipes
    Favorites,
    /// Show recent searches
    History {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },
    /// List quick picks and moods
    Picks,
    /// Search using a mood or quick pick label
    Mood { label: String },
    /// Read queries from stdin and search as they settle
    Watch,
}

type Prefs = Preferences<JsonFileStore>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = PantryConfig::load()?;
    let store_path = cli.store.clone().unwrap_or_else(|| config.store_path.clone());
    debug!("Using store {}", store_path.display());

    let prefs = Preferences::with_history_limit(
        JsonFileStore::open(&store_path)?,
        config.history_limit,
    );
    let client: Arc<dyn MealSource> = Arc::new(MealDbClient::from_config(&config)?);

    match cli.command {
        None => welcome(client.as_ref(), &prefs, &config).await?,
        Some(Commands::Search { query }) => {
            run_search(client, &prefs, &query.join(" ")).await?;
        }
        Some(Commands::Show { id }) => match client.lookup(&id).await? {
            Some(meal) => print_detail(&meal, prefs.is_favorite(&meal.id)?),
            None => println!("No recipe with id {}", id),
        },
        Some(Commands::Random { count: None }) => {
            match discovery::chefs_choice(client.as_ref()).await? {
                Some(meal) => print_detail(&meal, prefs.is_favorite(&meal.id)?),
                None => println!("The chef is out of ideas, try again."),
            }
        }
        Some(Commands::Random { count: Some(count) }) => {
            let meals = discovery::random_meals(client.as_ref(), count).await;
            print_cards(&meals, &prefs)?;
        }
        Some(Commands::Fav { id }) => {
            if prefs.toggle_favorite(&id)? {
                println!("★ Added {} to favorites", id);
            } else {
                println!("Removed {} from favorites", id);
            }
        }
        Some(Commands::Favorites) => list_favorites(client.as_ref(), &prefs).await?,
        Some(Commands::History { clear: true }) => {
            prefs.clear_history()?;
            println!("History cleared");
        }
        Some(Commands::History { clear: false }) => {
            for query in prefs.history()? {
                println!("{}", query);
            }
        }
        Some(Commands::Picks) => {
            println!("Moods:");
            for chip in MOODS {
                println!("  {:<14} {}", chip.label, chip.query);
            }
            println!("Quick picks:");
            for chip in QUICK_PICKS {
                println!("  {:<14} {}", chip.label, chip.query);
            }
        }
        Some(Commands::Mood { label }) => {
            let chip = discovery::find_chip(&label)
                .ok_or_else(|| format!("Unknown mood or quick pick: {}", label))?;
            run_search(client, &prefs, chip.query).await?;
        }
        Some(Commands::Watch) => watch(client, &prefs, &config).await?,
    }

    Ok(())
}

/// First visit shows a handful of random recipes, later visits the last search
async fn welcome(
    client: &dyn MealSource,
    prefs: &Prefs,
    config: &PantryConfig,
) -> Result<(), Box<dyn Error>> {
    if !prefs.has_visited()? {
        println!("Welcome! A few ideas to get you started:");
        let meals = discovery::random_meals(client, config.random_count).await;
        print_cards(&meals, prefs)?;
        prefs.mark_visited()?;
        return Ok(());
    }

    let history = prefs.history()?;
    if !history.is_empty() {
        println!("Recent searches: {}", history.join(", "));
    }
    let favorites = prefs.favorites()?;
    if !favorites.is_empty() {
        println!("{} favorite(s), see `pantry favorites`", favorites.len());
    }
    println!("Run `pantry --help` to get started.");
    Ok(())
}

async fn run_search(
    client: Arc<dyn MealSource>,
    prefs: &Prefs,
    query: &str,
) -> Result<(), Box<dyn Error>> {
    let query = query.trim();
    prefs.set_last_query(query)?;

    let state = Resolver::new(client).resolve(query).await;
    print_state(&state, prefs)?;
    prefs.record_search(query)?;
    Ok(())
}

async fn watch(
    client: Arc<dyn MealSource>,
    prefs: &Prefs,
    config: &PantryConfig,
) -> Result<(), Box<dyn Error>> {
    let session = SearchSession::new(Resolver::new(client), config.debounce());
    let mut updates = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut printed = 0;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    prefs.set_last_query(line.trim())?;
                    session.submit(line);
                }
                None => break,
            },
            Ok(()) = updates.changed() => {
                let snapshot = updates.borrow_and_update().clone();
                if !snapshot.state.loading {
                    printed = snapshot.generation;
                    print_state(&snapshot.state, prefs)?;
                    prefs.record_search(snapshot.query.trim())?;
                }
            }
        }
    }

    let generation = session.generation();
    if generation > printed {
        let state = session.settled().await;
        print_state(&state, prefs)?;
        prefs.record_search(updates.borrow().query.trim())?;
    }
    info!("Watched {} inputs", generation);
    Ok(())
}

async fn list_favorites(client: &dyn MealSource, prefs: &Prefs) -> Result<(), Box<dyn Error>> {
    let ids = prefs.favorites()?;
    if ids.is_empty() {
        println!("No favorites yet. Add one with `pantry fav <id>`.");
        return Ok(());
    }

    let lookups = futures::future::join_all(ids.iter().map(|id| client.lookup(id))).await;
    for (id, lookup) in ids.iter().zip(lookups) {
        match lookup {
            Ok(Some(meal)) => print_card(&MealSummary::from(meal), true),
            Ok(None) => println!("★ {:<8} (no longer available)", id),
            Err(e) => println!("★ {:<8} (could not load: {})", id, e),
        }
    }
    Ok(())
}

fn print_state(state: &ResolverState, prefs: &Prefs) -> Result<(), Box<dyn Error>> {
    if let Some(error) = &state.error {
        println!("Error: {}", error);
        return Ok(());
    }
    if let Some(note) = discovery::mode_note(state.mode) {
        println!("{}", note);
    }
    if state.mode != pantry_finder::ResolutionMode::None && state.meals().is_empty() {
        println!("No recipes found. Try another ingredient or a dish name.");
        return Ok(());
    }
    print_cards(state.meals(), prefs)
}

fn print_cards(meals: &[MealSummary], prefs: &Prefs) -> Result<(), Box<dyn Error>> {
    for meal in meals {
        print_card(meal, prefs.is_favorite(&meal.id)?);
    }
    Ok(())
}

fn print_card(meal: &MealSummary, favorite: bool) {
    let star = if favorite { "★" } else { " " };
    println!("{} {:<8} {}", star, meal.id, meal.title);
}

fn print_detail(meal: &MealDetail, favorite: bool) {
    let star = if favorite { " ★" } else { "" };
    println!("{}{}", meal.title, star);
    println!("Category: {}", meal.category.as_deref().unwrap_or("-"));
    println!("Cuisine:  {}", meal.area.as_deref().unwrap_or("-"));
    if let Some(thumbnail) = &meal.thumbnail {
        println!("Image:    {}", thumbnail);
    }

    println!("\nIngredients");
    for line in &meal.ingredients {
        println!("  • {}", line);
    }

    if let Some(instructions) = &meal.instructions {
        println!("\nInstructions\n{}", instructions);
    }
    if let Some(youtube) = &meal.youtube {
        println!("\nWatch on YouTube: {}", youtube);
    }
}
