use crate::core::resolver::CountryResolver;
use crate::domain::model::{NewTravelPlan, PlanId, TravelPlanRecord, TravelPlanView};
use crate::domain::ports::{CountryLookup, CountryStore, TravelPlanStore};
use crate::utils::error::{Result, WayfareError};
use crate::utils::validation::{validate_date_order, validate_non_empty_string};

/// Creates and reads travel plans. A plan always references a durably
/// stored country: creation goes through the resolver's ensure-exists
/// step before anything is written.
pub struct TravelPlanner<P, S, L>
where
    P: TravelPlanStore,
    S: CountryStore,
    L: CountryLookup,
{
    plans: P,
    countries: CountryResolver<S, L>,
}

impl<P, S, L> TravelPlanner<P, S, L>
where
    P: TravelPlanStore,
    S: CountryStore,
    L: CountryLookup,
{
    pub fn new(plans: P, countries: CountryResolver<S, L>) -> Self {
        Self { plans, countries }
    }

    pub fn countries(&self) -> &CountryResolver<S, L> {
        &self.countries
    }

    /// Validates the request, resolves (and caches if needed) the country,
    /// persists the plan, and returns it re-read with the country expanded.
    /// Any failure before the insert leaves the plan store untouched.
    pub async fn create(&self, request: NewTravelPlan) -> Result<TravelPlanView> {
        tracing::info!(title = %request.title, "Creating travel plan");

        validate_non_empty_string("title", &request.title)?;
        validate_date_order(request.start_date, request.end_date)?;

        let country_id = self
            .countries
            .ensure_exists_and_get_id(&request.country_code)
            .await?;

        let record = TravelPlanRecord {
            country_id,
            title: request.title,
            start_date: request.start_date,
            end_date: request.end_date,
            notes: request.notes.unwrap_or_default(),
        };

        let id = self.plans.insert(&record).await?;
        tracing::info!(id = %id, "Travel plan created");

        self.find_by_id(&id).await
    }

    pub async fn find_all(&self) -> Result<Vec<TravelPlanView>> {
        tracing::debug!("Fetching all travel plans");
        self.plans.find_all().await
    }

    pub async fn find_by_id(&self, id: &PlanId) -> Result<TravelPlanView> {
        tracing::debug!(id = %id, "Fetching travel plan");
        self.plans
            .find_by_id(id)
            .await?
            .ok_or_else(|| WayfareError::PlanNotFound { id: id.to_string() })
    }
}
