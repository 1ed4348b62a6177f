pub mod pipeline;

pub use pipeline::{IdentificationOutcome, PlantPipeline, SearchOutcome};
