use crate::domain::model::{
    Country, CountryApiData, CountryId, PlanId, TravelPlanRecord, TravelPlanView,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable persistence of country records, keyed by the normalized
/// 3-letter code. The store enforces uniqueness on the code; that
/// constraint is the only guard against concurrent write-back races.
#[async_trait]
pub trait CountryStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Country>>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Country>>;
    async fn find_by_id(&self, id: &CountryId) -> Result<Option<Country>>;
    /// Inserts a freshly fetched country. Must tolerate a concurrent
    /// insert of the same code: on conflict the existing row wins and
    /// the call still succeeds.
    async fn insert(&self, country: &CountryApiData) -> Result<()>;
    /// Returns true if a record was removed.
    async fn delete_by_code(&self, code: &str) -> Result<bool>;
}

/// Read-only lookup of country data from an external provider.
#[async_trait]
pub trait CountryLookup: Send + Sync {
    /// Returns `None` when the provider affirmatively reports the code as
    /// unknown. Transport or payload failures are errors, never `None`;
    /// callers depend on that distinction to avoid caching absence.
    async fn get_country_by_code(&self, code: &str) -> Result<Option<CountryApiData>>;
}

/// Durable persistence of travel plans. Reads expand the country
/// reference into the full stored record.
#[async_trait]
pub trait TravelPlanStore: Send + Sync {
    async fn insert(&self, plan: &TravelPlanRecord) -> Result<PlanId>;
    async fn find_all(&self) -> Result<Vec<TravelPlanView>>;
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<TravelPlanView>>;
}
