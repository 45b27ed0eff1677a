use crate::store::traits::RecordStore;
use crate::store::types::{Properties, RecordId, StoreError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DEFAULT_API_URL: &str = "https://api.notion.com";
const NOTION_VERSION: &str = "2022-06-28";

#[derive(Serialize)]
struct CreatePageRequest<'a> {
    parent: Parent<'a>,
    properties: &'a Properties,
}

#[derive(Serialize)]
struct Parent<'a> {
    database_id: &'a str,
}

#[derive(Deserialize)]
struct CreatePageResponse {
    id: Option<String>,
}

/// Notion pages API client
pub struct NotionClient {
    client: Client,
    base_url: String,
    token: String,
}

impl NotionClient {
    /// Create a client against a custom API root
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("enquiry-handler/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    async fn create_record(
        &self,
        database_id: &str,
        properties: &Properties,
    ) -> Result<RecordId, StoreError> {
        let url = format!("{}/v1/pages", self.base_url);
        debug!("Creating page in database {} via {}", database_id, url);

        let request = CreatePageRequest {
            parent: Parent { database_id },
            properties,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Notion returned status: {}", status);
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let page: CreatePageResponse = response.json().await?;
        let id = page.id.filter(|id| !id.is_empty()).ok_or(StoreError::MissingId)?;

        info!("Created Notion page {}", id);
        Ok(RecordId(id))
    }

    fn store_name(&self) -> &'static str {
        "Notion"
    }
}
