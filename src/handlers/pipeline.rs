use serde::Serialize;
use std::sync::Arc;

use crate::error::Diagnostic;
use crate::models::{ImageInput, PlantQuery, PlantRecord};
use crate::services::{PlantCatalog, PlantIdentifier};

/// Result of a typed-in plant search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found {
        query: String,
        records: Vec<PlantRecord>,
    },
    NoResults {
        query: String,
    },
    Failed {
        query: String,
        diagnostic: Diagnostic,
    },
}

/// Result of identifying a photo and looking the name up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IdentificationOutcome {
    /// No name could be obtained; the lookup was never attempted.
    IdentificationFailed { diagnostic: Diagnostic },
    /// The first lookup result for the identified name.
    Resolved { name: String, record: PlantRecord },
    /// Identified, but the reference service knows nothing by that name.
    NoCareDetails { name: String },
    /// Identified, but the lookup itself broke.
    LookupFailed { name: String, diagnostic: Diagnostic },
}

impl IdentificationOutcome {
    pub fn identified_name(&self) -> Option<&str> {
        match self {
            IdentificationOutcome::IdentificationFailed { .. } => None,
            IdentificationOutcome::Resolved { name, .. }
            | IdentificationOutcome::NoCareDetails { name }
            | IdentificationOutcome::LookupFailed { name, .. } => Some(name),
        }
    }
}

pub struct PlantPipeline {
    catalog: Arc<dyn PlantCatalog>,
    identifier: Arc<dyn PlantIdentifier>,
}

impl PlantPipeline {
    pub fn new(catalog: Arc<dyn PlantCatalog>, identifier: Arc<dyn PlantIdentifier>) -> Self {
        Self {
            catalog,
            identifier,
        }
    }

    pub async fn search_by_name(&self, query: &str) -> SearchOutcome {
        let query = match PlantQuery::parse(query) {
            Some(query) => query,
            None => {
                return SearchOutcome::NoResults {
                    query: query.trim().to_string(),
                }
            }
        };

        log::info!("📨 Plant search: '{}'", query);

        match self.catalog.search(query.as_str()).await {
            Ok(records) if records.is_empty() => {
                log::info!("🤷 No plants found for '{}'", query);
                SearchOutcome::NoResults {
                    query: query.to_string(),
                }
            }
            Ok(records) => SearchOutcome::Found {
                query: query.to_string(),
                records,
            },
            Err(e) => {
                log::error!("❌ Plant search for '{}' failed: {}", query, e);
                SearchOutcome::Failed {
                    query: query.to_string(),
                    diagnostic: Diagnostic::from(&e),
                }
            }
        }
    }

    pub async fn identify_and_resolve(&self, image: &ImageInput) -> IdentificationOutcome {
        log::info!(
            "📸 Identifying plant from {:?} image ({} bytes)",
            image.source,
            image.bytes.len()
        );

        let name = match self.identifier.try_identify(image).await {
            Ok(result) => result.into_name(),
            Err(e) => {
                log::error!("❌ Plant identification failed: {}", e);
                return IdentificationOutcome::IdentificationFailed {
                    diagnostic: Diagnostic::from(&e),
                };
            }
        };

        match self.catalog.search(&name).await {
            Ok(records) => match records.into_iter().next() {
                Some(record) => {
                    log::info!("✅ '{}' resolved to {}", name, record.common_name);
                    IdentificationOutcome::Resolved { name, record }
                }
                None => {
                    log::warn!("⚠️ Identified '{}' but found no care details", name);
                    IdentificationOutcome::NoCareDetails { name }
                }
            },
            Err(e) => {
                log::error!("❌ Lookup for identified plant '{}' failed: {}", name, e);
                IdentificationOutcome::LookupFailed {
                    name,
                    diagnostic: Diagnostic::from(&e),
                }
            }
        }
    }
}
