//! Dataset source abstraction for Site Atlas.
//!
//! The [`DatasetSource`] trait is the single asynchronous boundary of the
//! engine: one fetch of the raw `FeatureCollection`, performed once per
//! session. Backends live outside the core (the application reads a file
//! from disk); [`memory::InMemorySource`] serves tests and embedders that
//! already hold the document.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::geojson::FeatureCollection;
use crate::models::Dataset;
use crate::sanitize::sanitize_dataset;

/// Where the raw dataset comes from.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`describe`](DatasetSource::describe) | Human-readable origin, for logs and errors |
/// | [`fetch`](DatasetSource::fetch) | Read and parse the raw document |
#[async_trait]
pub trait DatasetSource: Send + Sync {
    fn describe(&self) -> String;

    /// Read and parse the raw document. Called at most once per session.
    async fn fetch(&self) -> Result<FeatureCollection, LoadError>;
}

/// Fetch from `source` and sanitize into the canonical dataset.
///
/// Either the whole dataset is returned or an error; never a partial one.
pub async fn fetch_canonical<S>(source: &S) -> Result<Dataset, LoadError>
where
    S: DatasetSource + ?Sized,
{
    let outcome = match source.fetch().await {
        Ok(raw) => sanitize_dataset(&raw),
        Err(e) => Err(e),
    };
    match &outcome {
        Ok(dataset) => info!(
            source = %source.describe(),
            sites = dataset.site_count(),
            buildings = dataset.building_count(),
            "dataset loaded"
        ),
        Err(e) => warn!(source = %source.describe(), error = %e, "dataset load failed"),
    }
    outcome
}
