use crate::domain::model::{Country, CountryId, CountryWithSource, Source};
use crate::domain::ports::{CountryLookup, CountryStore};
use crate::utils::error::{Result, WayfareError};
use crate::utils::validation::normalize_country_code;

/// Cache-aside resolution of country data: the store is consulted first,
/// the external source only on miss, and a fetched record is written back
/// before being served.
pub struct CountryResolver<S: CountryStore, L: CountryLookup> {
    store: S,
    lookup: L,
}

impl<S: CountryStore, L: CountryLookup> CountryResolver<S, L> {
    pub fn new(store: S, lookup: L) -> Self {
        Self { store, lookup }
    }

    /// Every stored country, in the store's natural iteration order.
    /// Callers must not depend on the ordering.
    pub async fn find_all(&self) -> Result<Vec<Country>> {
        tracing::debug!("Fetching all countries from store");
        self.store.find_all().await
    }

    /// Resolves a country by code, tagging the result with its provenance.
    ///
    /// A store hit is served as `cache`. On miss the external source is
    /// consulted; an affirmative "unknown code" becomes `CountryNotFound`,
    /// while transport failures propagate unmodified so absence is never
    /// cached by mistake. A fetched record is persisted with a
    /// conflict-tolerant insert and then re-read, so concurrent first
    /// misses on the same code converge on a single stored row.
    pub async fn find_by_code(&self, code: &str) -> Result<CountryWithSource> {
        let code = normalize_country_code(code)?;
        tracing::info!(code = %code, "Looking up country");

        if let Some(country) = self.store.find_by_code(&code).await? {
            tracing::info!(code = %code, "Country found in cache");
            return Ok(CountryWithSource {
                data: country,
                source: Source::Cache,
            });
        }

        tracing::info!(code = %code, "Country not in cache, fetching from external source");
        let api_data = self
            .lookup
            .get_country_by_code(&code)
            .await?
            .ok_or_else(|| WayfareError::CountryNotFound { code: code.clone() })?;

        self.store.insert(&api_data).await?;
        tracing::info!(code = %code, "Country saved to cache");

        // Re-read so the caller sees the store-assigned identity and
        // timestamps, and so a lost insert race still yields the row the
        // winning writer persisted.
        let country = self.store.find_by_code(&code).await?.ok_or_else(|| {
            WayfareError::store(format!("country {} missing immediately after insert", code))
        })?;

        Ok(CountryWithSource {
            data: country,
            source: Source::ExternalApi,
        })
    }

    /// Guarantees a country with this code is persisted and returns its
    /// store identity. Resolution and identity lookup are deliberately two
    /// reads: `find_by_code` shapes a response, this re-queries the store
    /// for the durable id that dependents may reference.
    pub async fn ensure_exists_and_get_id(&self, code: &str) -> Result<CountryId> {
        self.find_by_code(code).await?;

        let code = normalize_country_code(code)?;
        let country = self
            .store
            .find_by_code(&code)
            .await?
            .ok_or_else(|| WayfareError::CountryNotFound { code: code.clone() })?;

        Ok(country.id)
    }

    /// Removes a cached country. Does not touch the external source; the
    /// next lookup for this code will fetch and re-cache it.
    pub async fn delete_by_code(&self, code: &str) -> Result<()> {
        let code = normalize_country_code(code)?;
        tracing::info!(code = %code, "Deleting country from cache");

        if !self.store.delete_by_code(&code).await? {
            return Err(WayfareError::CountryNotFound { code });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CountryApiData;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryCountryStore {
        countries: Mutex<HashMap<String, Country>>,
    }

    #[async_trait]
    impl CountryStore for MemoryCountryStore {
        async fn find_all(&self) -> Result<Vec<Country>> {
            Ok(self.countries.lock().unwrap().values().cloned().collect())
        }

        async fn find_by_code(&self, code: &str) -> Result<Option<Country>> {
            Ok(self.countries.lock().unwrap().get(code).cloned())
        }

        async fn find_by_id(&self, id: &CountryId) -> Result<Option<Country>> {
            Ok(self
                .countries
                .lock()
                .unwrap()
                .values()
                .find(|c| &c.id == id)
                .cloned())
        }

        async fn insert(&self, country: &CountryApiData) -> Result<()> {
            let mut countries = self.countries.lock().unwrap();
            // First writer wins, as the sqlite UNIQUE(code) constraint does.
            countries
                .entry(country.code.clone())
                .or_insert_with(|| Country {
                    id: CountryId(format!("id-{}", country.code)),
                    code: country.code.clone(),
                    name: country.name.clone(),
                    region: country.region.clone(),
                    subregion: country.subregion.clone(),
                    capital: country.capital.clone(),
                    population: country.population,
                    flag_url: country.flag_url.clone(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                });
            Ok(())
        }

        async fn delete_by_code(&self, code: &str) -> Result<bool> {
            Ok(self.countries.lock().unwrap().remove(code).is_some())
        }
    }

    struct FakeLookup {
        countries: HashMap<String, CountryApiData>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeLookup {
        fn with(countries: Vec<CountryApiData>) -> Self {
            Self {
                countries: countries.into_iter().map(|c| (c.code.clone(), c)).collect(),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                countries: HashMap::new(),
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CountryLookup for FakeLookup {
        async fn get_country_by_code(&self, code: &str) -> Result<Option<CountryApiData>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WayfareError::SourcePayload(
                    "simulated provider outage".to_string(),
                ));
            }
            Ok(self.countries.get(code).cloned())
        }
    }

    fn colombia() -> CountryApiData {
        CountryApiData {
            code: "COL".to_string(),
            name: "Colombia".to_string(),
            region: "Americas".to_string(),
            subregion: "South America".to_string(),
            capital: "Bogotá".to_string(),
            population: 50_882_884,
            flag_url: "https://flagcdn.com/w320/co.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_lookup_hits_source_second_hits_cache() {
        let resolver = CountryResolver::new(
            MemoryCountryStore::default(),
            FakeLookup::with(vec![colombia()]),
        );

        let first = resolver.find_by_code("COL").await.unwrap();
        assert_eq!(first.source, Source::ExternalApi);
        assert_eq!(first.data.name, "Colombia");
        assert_eq!(first.data.capital, "Bogotá");

        let second = resolver.find_by_code("COL").await.unwrap();
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.data, first.data);
        assert_eq!(resolver.lookup.call_count(), 1);
    }

    #[tokio::test]
    async fn test_code_is_normalized_before_resolution() {
        let resolver = CountryResolver::new(
            MemoryCountryStore::default(),
            FakeLookup::with(vec![colombia()]),
        );

        let resolved = resolver.find_by_code("col").await.unwrap();
        assert_eq!(resolved.data.code, "COL");

        // The mixed-case retry must hit the cache, not the source again.
        let again = resolver.find_by_code("CoL").await.unwrap();
        assert_eq!(again.source, Source::Cache);
        assert_eq!(resolver.lookup.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_code_is_rejected_without_io() {
        let resolver = CountryResolver::new(MemoryCountryStore::default(), FakeLookup::with(vec![]));

        let err = resolver.find_by_code("C0L").await.unwrap_err();
        assert!(matches!(err, WayfareError::Validation { .. }));
        assert_eq!(resolver.lookup.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found_and_nothing_is_stored() {
        let resolver = CountryResolver::new(MemoryCountryStore::default(), FakeLookup::with(vec![]));

        let err = resolver.find_by_code("XXX").await.unwrap_err();
        assert!(matches!(err, WayfareError::CountryNotFound { ref code } if code == "XXX"));
        assert!(resolver.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_source_failure_propagates_and_is_not_masked_as_not_found() {
        let resolver = CountryResolver::new(MemoryCountryStore::default(), FakeLookup::failing());

        let err = resolver.find_by_code("COL").await.unwrap_err();
        assert!(matches!(err, WayfareError::SourcePayload(_)));
        assert!(resolver.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_exists_and_get_id_is_idempotent() {
        let resolver = CountryResolver::new(
            MemoryCountryStore::default(),
            FakeLookup::with(vec![colombia()]),
        );

        let first = resolver.ensure_exists_and_get_id("COL").await.unwrap();
        let second = resolver.ensure_exists_and_get_id("col").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.lookup.call_count(), 1);
        assert_eq!(resolver.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_by_code_removes_cached_record() {
        let resolver = CountryResolver::new(
            MemoryCountryStore::default(),
            FakeLookup::with(vec![colombia()]),
        );

        resolver.find_by_code("COL").await.unwrap();
        resolver.delete_by_code("COL").await.unwrap();

        let err = resolver.delete_by_code("COL").await.unwrap_err();
        assert!(matches!(err, WayfareError::CountryNotFound { .. }));

        // A later lookup re-fetches from the source.
        let resolved = resolver.find_by_code("COL").await.unwrap();
        assert_eq!(resolved.source, Source::ExternalApi);
        assert_eq!(resolver.lookup.call_count(), 2);
    }
}
