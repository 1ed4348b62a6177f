use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{PlantQuery, PlantRecord, SpeciesListResponse};

use super::PlantCatalog;

const SERVICE: &str = "Perenual";

/// Results per lookup. Only page 1 is ever requested.
pub const PAGE_SIZE: usize = 12;

/// Perenual species-list client
pub struct PerenualClient {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl PerenualClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            api_key: config.perenual_api_key.clone(),
            base_url: config.perenual_base_url.trim_end_matches('/').to_string(),
            client: config.http_client()?,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch(&self, query: &PlantQuery) -> Result<Vec<PlantRecord>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(Error::MissingCredential(crate::config::PERENUAL_KEY_VAR))?;

        let url = self.api_url("/species-list");
        let page_size = PAGE_SIZE.to_string();

        log::info!("🔎 Searching Perenual for '{}'", query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", api_key),
                ("q", query.as_str()),
                ("page", "1"),
                ("per_page", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|source| Error::transport(SERVICE, source))?;

        let status = response.status();
        log::debug!("📥 Perenual response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|source| Error::transport(SERVICE, source))?;

        if !status.is_success() {
            return Err(Error::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        log::debug!("📄 Raw Perenual response size: {} bytes", body.len());

        let parsed: SpeciesListResponse = serde_json::from_str(&body)
            .map_err(|source| Error::Decode { service: SERVICE, source })?;

        let records: Vec<PlantRecord> = parsed
            .data
            .unwrap_or_default()
            .into_iter()
            .take(PAGE_SIZE)
            .map(PlantRecord::from)
            .collect();

        log::info!("🌿 Perenual returned {} plant(s) for '{}'", records.len(), query);
        Ok(records)
    }
}

#[async_trait::async_trait]
impl PlantCatalog for PerenualClient {
    async fn search(&self, query: &str) -> Result<Vec<PlantRecord>> {
        match PlantQuery::parse(query) {
            Some(query) => self.fetch(&query).await,
            None => {
                log::debug!("Blank plant query, skipping lookup");
                Ok(Vec::new())
            }
        }
    }
}
