pub mod planner;
pub mod resolver;

pub use crate::domain::model::{
    Country, CountryApiData, CountryId, CountryWithSource, NewTravelPlan, PlanId, Source,
    TravelPlanRecord, TravelPlanView,
};
pub use crate::domain::ports::{CountryLookup, CountryStore, TravelPlanStore};
pub use crate::utils::error::Result;
