use std::time::Duration;

use reqwest::Response;
use serde_json::Value;

use crate::{
    error::StoreClientError,
    recipe::RecipeRecord,
    server::{SAVED_RECIPES_PATH, SAVE_RECIPE_PATH},
};

/// HTTP client for the `recipe-store` backend.
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn save_recipe(&self, record: &RecipeRecord) -> Result<(), StoreClientError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, SAVE_RECIPE_PATH))
            .json(record)
            .send()
            .await?;
        check_status(response).await?;
        log::info!("Recipe {:?} saved", record.name);
        Ok(())
    }

    pub async fn list_saved(&self) -> Result<Vec<RecipeRecord>, StoreClientError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, SAVED_RECIPES_PATH))
            .send()
            .await?;
        let body = check_status(response).await?.bytes().await?;
        let documents: Vec<Value> = serde_json::from_slice(&body)?;

        let recipes: Vec<RecipeRecord> = documents
            .into_iter()
            .filter_map(|doc| match RecipeRecord::from_document(doc) {
                Ok(recipe) => Some(recipe),
                Err(e) => {
                    log::warn!("Skipping unreadable saved recipe: {e}");
                    None
                }
            })
            .collect();
        log::debug!("Fetched {} saved recipes", recipes.len());
        Ok(recipes)
    }
}

async fn check_status(response: Response) -> Result<Response, StoreClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);
    Err(StoreClientError::Status {
        status: status.as_u16(),
        message,
    })
}
