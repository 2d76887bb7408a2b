use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    Config, WeatherError,
    model::{LocationQuery, WeatherResult},
    provider::weatherapi::WeatherApiProvider,
};

pub mod weatherapi;

/// Source of current conditions for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &LocationQuery) -> Result<WeatherResult, WeatherError>;
}

/// Construct the weatherapi.com provider from config.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn WeatherProvider>, WeatherError> {
    let api_key = config.api_key().ok_or_else(|| {
        WeatherError::Config(
            "No API key configured for weatherapi.com.\n\
             Hint: run `weather configure` and enter your API key."
                .to_string(),
        )
    })?;

    let provider = WeatherApiProvider::with_base_url(api_key.to_owned(), &config.base_url)?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
        assert!(err.user_message().contains("weather configure"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
