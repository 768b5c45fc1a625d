use crate::adapters::rest_countries::DEFAULT_BASE_URL;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use clap::Args;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct CliConfig {
    /// SQLite database file holding countries and travel plans
    #[arg(long, default_value = "./wayfare.db")]
    pub db_path: String,

    /// Base URL of the RestCountries-compatible API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Upper bound on a single external lookup, in seconds
    #[arg(long, default_value = "10")]
    pub request_timeout_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("db_path", &self.db_path)?;
        validate_url("api_base_url", &self.api_base_url)?;
        validate_positive_number("request_timeout_secs", self.request_timeout_secs, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig {
            db_path: "./wayfare.db".to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            verbose: false,
        }
    }

    #[test]
    fn test_default_shape_is_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = base_config();
        config.api_base_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.db_path = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
