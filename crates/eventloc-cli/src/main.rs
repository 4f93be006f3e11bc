mod lookup;
mod store;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eventloc-cli")]
#[command(about = "Event location picker and store command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search addresses as the picker would after typing settles
    Search {
        /// Address text (at least the picker's minimum query length)
        query: String,
    },
    /// Resolve a place id into a canonical location
    Resolve {
        /// Provider place id, as printed by `search`
        place_id: String,
    },
    /// Reverse geocode a point, keeping the given coordinates
    #[command(allow_negative_numbers = true)]
    Reverse {
        latitude: f64,
        longitude: f64,
    },
    /// Build a location from hand-typed address fields
    Manual(ManualArgs),
    /// List stored events with their locations
    Events,
    /// List stored locations, most recently updated first
    Locations {
        /// Case-insensitive filter on name, city or country
        #[arg(long)]
        query: Option<String>,
    },
}

#[derive(Debug, clap::Args)]
struct ManualArgs {
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    /// Latitude as typed; blank means none
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    lat: String,
    /// Longitude as typed; blank means none
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    lng: String,
}

impl From<ManualArgs> for eventloc_core::ManualLocationInput {
    fn from(args: ManualArgs) -> Self {
        Self {
            address: eventloc_core::ManualAddress {
                name: args.name,
                street_address: args.street,
                city: args.city,
                region: args.region,
                country: args.country,
                postal_code: args.postal_code,
            },
            latitude: args.lat,
            longitude: args.lng,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("eventloc-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = eventloc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Search { query } => lookup::run_search(&config, &query).await,
        Commands::Resolve { place_id } => lookup::run_resolve(&config, &place_id).await,
        Commands::Reverse {
            latitude,
            longitude,
        } => lookup::run_reverse(&config, latitude, longitude).await,
        Commands::Manual(args) => lookup::run_manual(&config, args.into()),
        Commands::Events => {
            let pool = connect(&config).await?;
            store::run_events(&pool).await
        }
        Commands::Locations { query } => {
            let pool = connect(&config).await?;
            store::run_locations(&pool, query.as_deref()).await
        }
    }
}

async fn connect(config: &eventloc_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = eventloc_db::PoolConfig::from_app_config(config);
    let pool = eventloc_db::connect_pool(&config.database_url, pool_config).await?;
    eventloc_db::run_migrations(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests;
