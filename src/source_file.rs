//! Filesystem [`DatasetSource`]: reads the GeoJSON file named in
//! `[data].path`.

use std::path::PathBuf;

use async_trait::async_trait;
use site_atlas_core::error::LoadError;
use site_atlas_core::geojson::FeatureCollection;
use site_atlas_core::source::DatasetSource;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<FeatureCollection, LoadError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LoadError::Fetch {
                source_name: self.describe(),
                message: e.to_string(),
            })?;
        Ok(FeatureCollection::from_json(&text)?)
    }
}
