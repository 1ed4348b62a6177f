pub mod openrouter; // Vision inference (plant identification)
pub mod perenual; // Perenual plant reference lookup

pub use openrouter::{AttemptState, OpenRouterIdentifier};
pub use perenual::PerenualClient;

use crate::error::Result;
use crate::models::{IdentificationResult, ImageInput, PlantRecord};

/// Name → plant records, via an external reference service.
#[async_trait::async_trait]
pub trait PlantCatalog: Send + Sync {
    /// Typed lookup. Blank queries succeed with no records and no network call.
    async fn search(&self, query: &str) -> Result<Vec<PlantRecord>>;

    /// Fail-open lookup: any error is logged and becomes an empty list.
    async fn resolve(&self, query: &str) -> Vec<PlantRecord> {
        match self.search(query).await {
            Ok(records) => records,
            Err(e) => {
                log::error!("❌ Plant lookup for '{}' failed ({:?}): {}", query, e.kind(), e);
                Vec::new()
            }
        }
    }
}

/// Image → best-effort plant name, via a vision inference service.
#[async_trait::async_trait]
pub trait PlantIdentifier: Send + Sync {
    async fn try_identify(&self, image: &ImageInput) -> Result<IdentificationResult>;

    /// Fail-open identification: any error is logged and becomes `None`.
    async fn identify(&self, image: &ImageInput) -> Option<IdentificationResult> {
        match self.try_identify(image).await {
            Ok(result) => Some(result),
            Err(e) => {
                log::error!("❌ Plant identification failed ({:?}): {}", e.kind(), e);
                None
            }
        }
    }
}
