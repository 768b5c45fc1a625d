use crate::domain::model::CountryApiData;
use crate::domain::ports::CountryLookup;
use crate::utils::error::{Result, WayfareError};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Field projection requested from the provider. With `fields` set the
/// API returns a single object instead of an array.
const FIELDS: &str = "cca3,name,region,subregion,capital,population,flags";

/// Provider response shape, restricted to the projected fields.
#[derive(Debug, Deserialize)]
struct RestCountryPayload {
    cca3: String,
    name: RestCountryName,
    region: String,
    subregion: Option<String>,
    capital: Option<Vec<String>>,
    population: u64,
    flags: RestCountryFlags,
}

#[derive(Debug, Deserialize)]
struct RestCountryName {
    common: String,
}

#[derive(Debug, Deserialize)]
struct RestCountryFlags {
    png: Option<String>,
    svg: Option<String>,
}

impl RestCountryPayload {
    fn into_api_data(self) -> Result<CountryApiData> {
        let flag_url = self
            .flags
            .png
            .or(self.flags.svg)
            .ok_or_else(|| WayfareError::SourcePayload("response carries no flag URL".into()))?;

        Ok(CountryApiData {
            code: self.cca3,
            name: self.name.common,
            region: self.region,
            subregion: self.subregion.unwrap_or_else(|| "N/A".to_string()),
            capital: self
                .capital
                .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
                .unwrap_or_else(|| "N/A".to_string()),
            population: self.population,
            flag_url,
        })
    }
}

/// Country lookup backed by the RestCountries v3.1 HTTP API.
pub struct RestCountriesClient {
    client: Client,
    base_url: String,
}

impl RestCountriesClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        validate_url("api_base_url", &base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl CountryLookup for RestCountriesClient {
    async fn get_country_by_code(&self, code: &str) -> Result<Option<CountryApiData>> {
        let url = format!("{}/alpha/{}", self.base_url, code.to_ascii_uppercase());
        tracing::debug!(code = %code, url = %url, "Fetching country from RestCountries");

        let response = self
            .client
            .get(&url)
            .query(&[("fields", FIELDS)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!(code = %code, "RestCountries reports no such country");
            return Ok(None);
        }

        let payload: RestCountryPayload = response.error_for_status()?.json().await?;
        payload.into_api_data().map(Some)
    }
}
