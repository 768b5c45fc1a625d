use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned identity of a persisted country. Opaque to callers;
/// travel plans reference countries through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryId(pub String);

impl std::fmt::Display for CountryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(pub String);

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A country as persisted in the store. The code is unique and always
/// uppercase; timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: CountryId,
    pub code: String,
    pub name: String,
    pub region: String,
    pub subregion: String,
    pub capital: String,
    pub population: u64,
    pub flag_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// External source payload, already mapped into the internal field names
/// and with defaults applied. Carries no identity or timestamps; those
/// exist only once the record is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryApiData {
    pub code: String,
    pub name: String,
    pub region: String,
    pub subregion: String,
    pub capital: String,
    pub population: u64,
    pub flag_url: String,
}

/// Provenance tag: where a resolved country came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Cache,
    ExternalApi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryWithSource {
    pub data: Country,
    pub source: Source,
}

/// Request shape for creating a travel plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTravelPlan {
    pub country_code: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<Vec<String>>,
}

/// Fields the planner hands to the store once the country identity is
/// resolved and the dates are validated.
#[derive(Debug, Clone)]
pub struct TravelPlanRecord {
    pub country_id: CountryId,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Vec<String>,
}

/// A travel plan read back with its country reference expanded into the
/// full stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlanView {
    pub id: PlanId,
    pub country: Country,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
