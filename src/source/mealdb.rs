use crate::config::{PantryConfig, DEFAULT_BASE_URL};
use crate::model::{MealDetail, MealSummary, MealsEnvelope};
use crate::source::MealSource;
use crate::PantryError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; PantryFinder/0.1)";

/// HTTP client for TheMealDB v1 JSON API
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    /// Client against the public API with default settings
    pub fn new() -> Result<Self, PantryError> {
        Self::builder().build()
    }

    pub fn builder() -> MealDbClientBuilder {
        MealDbClientBuilder::default()
    }

    pub fn from_config(config: &PantryConfig) -> Result<Self, PantryError> {
        Self::builder()
            .base_url(&config.base_url)
            .timeout(config.request_timeout())
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_meals<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, PantryError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PantryError::StatusError(status.as_u16()));
        }

        let body = response.text().await?;
        let envelope: MealsEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| PantryError::ParseError(format!("{}: {}", endpoint, e)))?;
        Ok(envelope.into_vec())
    }
}

#[async_trait]
impl MealSource for MealDbClient {
    async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<Vec<MealSummary>, PantryError> {
        self.get_meals("filter.php", &[("i", ingredient)]).await
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<MealSummary>, PantryError> {
        self.get_meals("search.php", &[("s", query)]).await
    }

    async fn lookup(&self, id: &str) -> Result<Option<MealDetail>, PantryError> {
        let meals: Vec<MealDetail> = self.get_meals("lookup.php", &[("i", id)]).await?;
        Ok(meals.into_iter().next())
    }

    async fn random(&self) -> Result<Option<MealDetail>, PantryError> {
        let meals: Vec<MealDetail> = self.get_meals("random.php", &[]).await?;
        Ok(meals.into_iter().next())
    }
}

/// Builder for [`MealDbClient`]
#[derive(Debug, Default)]
pub struct MealDbClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl MealDbClientBuilder {
    /// Point the client at another API root (a mirror or a test server)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request deadline, 30 seconds when unset
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<MealDbClient, PantryError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            return Err(PantryError::BuilderError(
                "base URL must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(30)))
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .build()
            .map_err(|e| PantryError::BuilderError(e.to_string()))?;

        Ok(MealDbClient { client, base_url })
    }
}
