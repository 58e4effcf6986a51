//! In-memory [`DatasetSource`] for tests and embedders.

use async_trait::async_trait;

use crate::error::LoadError;
use crate::geojson::FeatureCollection;

use super::DatasetSource;

enum Payload {
    Text(String),
    Parsed(FeatureCollection),
}

/// Serves a document that is already in memory.
pub struct InMemorySource {
    payload: Payload,
}

impl InMemorySource {
    /// Source backed by raw JSON text; parsing happens on fetch.
    pub fn from_json(text: impl Into<String>) -> Self {
        Self {
            payload: Payload::Text(text.into()),
        }
    }

    pub fn from_collection(collection: FeatureCollection) -> Self {
        Self {
            payload: Payload::Parsed(collection),
        }
    }
}

#[async_trait]
impl DatasetSource for InMemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn fetch(&self) -> Result<FeatureCollection, LoadError> {
        match &self.payload {
            Payload::Text(text) => Ok(FeatureCollection::from_json(text)?),
            Payload::Parsed(collection) => Ok(collection.clone()),
        }
    }
}
