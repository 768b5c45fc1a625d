use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use wayfare::utils::{logger, validation::Validate};
use wayfare::{
    CliConfig, CountryResolver, NewTravelPlan, PlanId, RestCountriesClient, SqliteCountryStore,
    SqliteTravelPlanStore, TravelPlanner,
};

#[derive(Debug, Parser)]
#[command(name = "wayfare")]
#[command(about = "Country reference cache and travel plan tool")]
struct Cli {
    #[command(flatten)]
    config: CliConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up and manage cached countries
    #[command(subcommand)]
    Countries(CountriesCommand),
    /// Create and inspect travel plans
    #[command(subcommand)]
    Plans(PlansCommand),
}

#[derive(Debug, Subcommand)]
enum CountriesCommand {
    /// List every cached country
    List,
    /// Resolve a country by its 3-letter code, caching it on first use
    Get { code: String },
    /// Drop a country from the cache
    Delete { code: String },
}

#[derive(Debug, Subcommand)]
enum PlansCommand {
    /// List all travel plans
    List,
    /// Show one travel plan
    Get { id: String },
    /// Create a travel plan for a country
    Create {
        #[arg(long)]
        country_code: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        start_date: NaiveDate,
        #[arg(long)]
        end_date: NaiveDate,
        #[arg(long = "note")]
        notes: Vec<String>,
    },
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.config.verbose);
    tracing::info!("Starting wayfare CLI");
    if cli.config.verbose {
        tracing::debug!("CLI config: {:?}", cli.config);
    }

    if let Err(e) = cli.config.validate() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let country_store = SqliteCountryStore::new(&cli.config.db_path)?;
    let plan_store = SqliteTravelPlanStore::new(&cli.config.db_path)?;
    let lookup = RestCountriesClient::new(
        cli.config.api_base_url.clone(),
        Duration::from_secs(cli.config.request_timeout_secs),
    )?;
    let planner = TravelPlanner::new(plan_store, CountryResolver::new(country_store, lookup));

    match cli.command {
        Command::Countries(CountriesCommand::List) => {
            print_json(&planner.countries().find_all().await?)?;
        }
        Command::Countries(CountriesCommand::Get { code }) => {
            print_json(&planner.countries().find_by_code(&code).await?)?;
        }
        Command::Countries(CountriesCommand::Delete { code }) => {
            planner.countries().delete_by_code(&code).await?;
            println!("✅ Country {} removed from cache", code.to_uppercase());
        }
        Command::Plans(PlansCommand::List) => {
            print_json(&planner.find_all().await?)?;
        }
        Command::Plans(PlansCommand::Get { id }) => {
            print_json(&planner.find_by_id(&PlanId(id)).await?)?;
        }
        Command::Plans(PlansCommand::Create {
            country_code,
            title,
            start_date,
            end_date,
            notes,
        }) => {
            let view = planner
                .create(NewTravelPlan {
                    country_code,
                    title,
                    start_date,
                    end_date,
                    notes: if notes.is_empty() { None } else { Some(notes) },
                })
                .await?;
            print_json(&view)?;
        }
    }

    Ok(())
}
