//! Plant identification and care-detail lookup.
//!
//! [`services::PlantCatalog`] resolves a plant name against the Perenual reference
//! service, [`services::PlantIdentifier`] turns a photo into a plant name with a
//! vision model, and [`handlers::PlantPipeline`] chains the two.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod server;

pub use config::Config;
pub use error::{Diagnostic, Error, ErrorKind, Result};
pub use handlers::{IdentificationOutcome, PlantPipeline, SearchOutcome};
pub use models::{
    IdentificationResult, ImageInput, ImageSource, PlantQuery, PlantRecord, SunlightLevel,
    WateringLevel,
};
pub use services::{OpenRouterIdentifier, PerenualClient, PlantCatalog, PlantIdentifier};
