//! GeoJSON wire types.
//!
//! Input: the raw `FeatureCollection` exactly as received, one `Point`
//! feature per site whose properties carry `site` and `buildings`. Values
//! that the sanitizer must inspect (attribute arrays, identifiers) are kept
//! as [`serde_json::Value`] so shape problems surface as a
//! [`LoadError`](crate::error::LoadError) with a useful message instead of
//! a bare serde error.
//!
//! Output: [`render`] turns a (derived) [`Dataset`] back into a
//! `FeatureCollection` for the map surface, together with a SHA-256
//! fingerprint of the rendered document.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use crate::models::{Attribute, Building, Dataset};

/// Raw top-level document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Parse a raw document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Raw feature: one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: RawSite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

/// Raw site properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSite {
    pub site: String,
    pub buildings: Vec<RawBuilding>,
}

/// Raw building record, unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBuilding {
    #[serde(default)]
    pub doc_id: Value,
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub order: Value,
    #[serde(default)]
    pub morphology: Value,
    #[serde(default)]
    pub age: Value,
    #[serde(default)]
    pub date: Value,
    #[serde(default)]
    pub style_evidence: Option<String>,
    #[serde(default)]
    pub date_evidence: Option<String>,
    #[serde(default)]
    pub url: Value,
}

/// A dataset rendered for the map surface.
#[derive(Debug, Clone)]
pub struct RenderedView {
    pub document: Value,
    /// Lowercase hex SHA-256 of the serialized document.
    pub fingerprint: String,
}

/// Render a dataset as a GeoJSON `FeatureCollection`.
///
/// Sites keep their input order; each feature carries only the buildings
/// present in `dataset`.
pub fn render(dataset: &Dataset) -> RenderedView {
    let features: Vec<Value> = dataset
        .sites()
        .iter()
        .map(|site| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [site.location.longitude, site.location.latitude],
                },
                "properties": {
                    "site": site.site,
                    "buildings": site.buildings.iter().map(building_json).collect::<Vec<_>>(),
                },
            })
        })
        .collect();

    let document = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    let fingerprint = fingerprint(&document);

    RenderedView {
        document,
        fingerprint,
    }
}

/// Building properties for the map surface. Optional fields are omitted
/// when absent.
fn building_json(building: &Building) -> Value {
    let mut props = Map::new();
    props.insert("doc_id".to_string(), json!(building.doc_id));
    props.insert("id".to_string(), json!(building.id));
    for attribute in Attribute::ALL {
        props.insert(attribute.as_str().to_string(), json!(building.tags(attribute)));
    }
    if let Some(evidence) = &building.style_evidence {
        props.insert("style_evidence".to_string(), json!(evidence));
    }
    if let Some(evidence) = &building.date_evidence {
        props.insert("date_evidence".to_string(), json!(evidence));
    }
    if let Some(url) = &building.url {
        props.insert("url".to_string(), url.clone());
    }
    Value::Object(props)
}

fn fingerprint(document: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
