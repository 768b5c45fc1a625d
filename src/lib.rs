pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::rest_countries::RestCountriesClient;
pub use adapters::sqlite::{SqliteCountryStore, SqliteTravelPlanStore};
pub use config::CliConfig;
pub use core::planner::TravelPlanner;
pub use core::resolver::CountryResolver;
pub use domain::model::{
    Country, CountryApiData, CountryId, CountryWithSource, NewTravelPlan, PlanId, Source,
    TravelPlanView,
};
pub use domain::ports::{CountryLookup, CountryStore, TravelPlanStore};
pub use utils::error::{Result, WayfareError};
