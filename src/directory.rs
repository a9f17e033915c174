use std::time::Duration;

use serde::Deserialize;

use crate::{
    error::DirectoryError,
    recipe::{DirectoryMeal, RecipeRecord},
};

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    meals: Option<Vec<DirectoryMeal>>,
}

/// Client for the third-party recipe directory search endpoint.
#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    search_url: String,
}

impl DirectoryClient {
    pub fn new(search_url: impl Into<String>, timeout: Duration) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            search_url: search_url.into(),
        })
    }

    /// Looks up recipes by name, in directory order. No matches is `Ok(vec![])`.
    pub async fn search(&self, query: &str) -> Result<Vec<RecipeRecord>, DirectoryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DirectoryError::EmptyQuery);
        }

        log::debug!("Searching directory for {query:?}");
        let response = self
            .http
            .get(&self.search_url)
            .query(&[("s", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let recipes = parse_search_response(&body)?;
        log::debug!("Directory returned {} recipes for {query:?}", recipes.len());
        Ok(recipes)
    }
}

/// Normalizes a raw directory response. A missing or null `meals` list means no matches.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<RecipeRecord>, DirectoryError> {
    let response: SearchResponse = serde_json::from_slice(body)?;
    Ok(response
        .meals
        .unwrap_or_default()
        .into_iter()
        .map(RecipeRecord::from)
        .collect())
}

/// Orders recipes by how few ingredients they need. Ties keep their original order.
pub fn sort_by_ingredient_count(mut recipes: Vec<RecipeRecord>) -> Vec<RecipeRecord> {
    recipes.sort_by_key(RecipeRecord::ingredient_count);
    recipes
}
