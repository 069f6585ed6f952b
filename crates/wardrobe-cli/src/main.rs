// ============================================================================
// wardrobe — terminal front end for the paper-doll outfit composer
// ============================================================================
// Usage:
//   wardrobe list [--category hat]...           List catalog items
//   wardrobe show                               Show the equipped outfit
//   wardrobe equip <asset> [--category C]       Equip an item
//   wardrobe toggle <asset> [--category C]      Equip or unequip an item
//   wardrobe unequip <category>                 Empty a slot
//   wardrobe reset | randomize [--seed N]       Clear or shuffle the outfit
//   wardrobe layers                             Asset names, back-to-front
//   wardrobe export --format json               Export the outfit as JSON
//   wardrobe hints --container H --content H --offset O
// ============================================================================

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;
use wardrobe_core::{
    display_label, Catalog, Category, EquipPolicy, Item, OutfitStore, ViewportTracker,
    WardrobeConfig, WardrobeDb, WardrobeError,
};

/// Paper-doll outfit composer
#[derive(Parser)]
#[command(name = "wardrobe", version, about = "Dress the paper doll from the terminal")]
struct Cli {
    /// Path to the outfit database (default: ~/.wardrobe/outfit.redb)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// JSON catalog file (default: built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog items, optionally restricted to some categories
    List {
        /// Category to include (repeatable): top, bottom, hat, hair, shoes, accessory
        #[arg(long = "category", short = 'c')]
        categories: Vec<String>,
    },

    /// Show the equipped outfit slot by slot
    Show,

    /// Print equipped asset names in compositing order
    Layers,

    /// Equip an item, replacing the current occupant of its slot
    Equip {
        asset: String,

        /// Disambiguate assets that exist in several categories
        #[arg(long)]
        category: Option<String>,
    },

    /// Equip the item, or unequip it if already worn
    Toggle {
        asset: String,

        #[arg(long)]
        category: Option<String>,
    },

    /// Empty one slot
    Unequip { category: String },

    /// Empty every slot
    Reset,

    /// Replace the outfit with a random one
    Randomize {
        /// Seed for a reproducible outfit
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Export the equipped outfit
    Export {
        /// Output format (currently only json is supported)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Compute scroll hints for a list viewport
    Hints {
        #[arg(long)]
        container: f64,

        #[arg(long)]
        content: f64,

        #[arg(long, default_value = "0")]
        offset: f64,
    },
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wardrobe_core=warn,wardrobe=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // A missing .env is fine; settings then come from the process environment
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let mut config = WardrobeConfig::from_env();
    if cli.db_path.is_some() {
        config.db_path = cli.db_path;
    }
    if cli.catalog.is_some() {
        config.catalog_path = cli.catalog;
    }

    // Hints is pure arithmetic, no database needed
    if let Commands::Hints {
        container,
        content,
        offset,
    } = cli.command
    {
        return cmd_hints(&config, container, content, offset);
    }

    let db = WardrobeDb::open_with(&config)?;
    let mut store = OutfitStore::from_config(&config, db)?;

    match cli.command {
        Commands::List { categories } => cmd_list(&store, &categories),
        Commands::Show => cmd_show(&store),
        Commands::Layers => cmd_layers(&store),
        Commands::Equip { asset, category } => {
            let item = resolve_item(&store, &asset, category.as_deref())?;
            store.equip(&item)?;
            println!("Equipped {} ({})", item.display_name(), item.category);
            Ok(())
        }
        Commands::Toggle { asset, category } => {
            let item = resolve_item(&store, &asset, category.as_deref())?;
            let worn = store.toggle(&item)?;
            let verb = if worn { "Equipped" } else { "Unequipped" };
            println!("{} {} ({})", verb, item.display_name(), item.category);
            Ok(())
        }
        Commands::Unequip { category } => {
            let category = store.catalog().scheme().resolve(category.parse::<Category>()?);
            store.unequip(category);
            println!("Emptied {} slot", category);
            Ok(())
        }
        Commands::Reset => {
            store.reset();
            println!("Outfit cleared");
            Ok(())
        }
        Commands::Randomize { seed } => {
            match seed {
                Some(seed) => store.randomize_with(&mut StdRng::seed_from_u64(seed)),
                None => store.randomize(),
            }
            cmd_show(&store)
        }
        Commands::Export { format } => cmd_export(&store, &format),
        Commands::Hints { .. } => Ok(()),
    }
}

/// Look an asset up in the catalog. Under the permissive policy an explicit
/// category lets callers equip assets the catalog doesn't list.
fn resolve_item(
    store: &OutfitStore<WardrobeDb>,
    asset: &str,
    category: Option<&str>,
) -> Result<Item> {
    let catalog = store.catalog();
    match category {
        Some(raw) => {
            let category = catalog.scheme().resolve(raw.parse::<Category>()?);
            if let Some(item) = catalog.find(category, asset) {
                return Ok(item.clone());
            }
            if store.policy() == EquipPolicy::Permissive {
                info!("'{}' is not in the catalog, equipping it as-is", asset);
                return Ok(Item::new(asset, category));
            }
            Err(WardrobeError::NotInCatalog(asset.to_string()).into())
        }
        None => catalog
            .find_asset(asset)
            .cloned()
            .ok_or_else(|| anyhow!(WardrobeError::UnknownItem(asset.to_string()))),
    }
}

fn cmd_list(store: &OutfitStore<WardrobeDb>, categories: &[String]) -> Result<()> {
    let catalog: &Catalog = store.catalog();
    let wanted: Vec<Category> = if categories.is_empty() {
        catalog.scheme().slots().to_vec()
    } else {
        categories
            .iter()
            .map(|raw| raw.parse::<Category>().map(|c| catalog.scheme().resolve(c)))
            .collect::<Result<_, _>>()?
    };

    let items = store.items_for(wanted);
    if items.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    println!("{:<3}  {:<10}  {:<24}  {}", "", "CATEGORY", "ASSET", "LABEL");
    println!("{}", "-".repeat(60));
    for item in &items {
        let marker = if store.is_equipped(item) { "*" } else { "" };
        println!(
            "{:<3}  {:<10}  {:<24}  {}",
            marker,
            item.category.as_str(),
            item.asset_name,
            item.display_name()
        );
    }

    println!("\nTotal: {} items", items.len());
    Ok(())
}

fn cmd_show(store: &OutfitStore<WardrobeDb>) -> Result<()> {
    println!("=== Outfit ===");
    for &category in store.catalog().scheme().slots() {
        match store.equipped_in(category) {
            Some(item) => println!(
                "  {:<10} {} ({})",
                category.as_str(),
                item.display_name(),
                item.asset_name
            ),
            None => println!("  {:<10} -", category.as_str()),
        }
    }
    Ok(())
}

fn cmd_layers(store: &OutfitStore<WardrobeDb>) -> Result<()> {
    for asset in store.layers() {
        println!("{}", asset);
    }
    Ok(())
}

fn cmd_export(store: &OutfitStore<WardrobeDb>, format: &str) -> Result<()> {
    if format != "json" {
        anyhow::bail!("Unsupported format '{}'. Only 'json' is supported.", format);
    }

    let labels: Vec<String> = store.layers().iter().map(|a| display_label(a)).collect();
    let export = serde_json::json!({
        "exported_at": Utc::now().to_rfc3339(),
        "database": store.storage().path().display().to_string(),
        "scheme": store.catalog().scheme(),
        "outfit": store.equipped().to_record(),
        "layers": store.layers(),
        "labels": labels,
    });

    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}

fn cmd_hints(config: &WardrobeConfig, container: f64, content: f64, offset: f64) -> Result<()> {
    let mut tracker = ViewportTracker::with_threshold(config.scroll_threshold);
    tracker.set_container_height(container);
    tracker.set_content_height(content);
    tracker.set_scroll_offset(offset);

    let hints = tracker.affordances();
    println!("{}", serde_json::to_string(&hints)?);
    Ok(())
}
