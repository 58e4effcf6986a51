//! Record sanitizer: raw `FeatureCollection` → canonical [`Dataset`].
//!
//! Runs once per session, at load time. The raw document is borrowed and
//! never modified; every canonical value is freshly built.
//!
//! # Rules
//!
//! For each building and each [`Attribute`]:
//!
//! 1. A missing or `null` attribute becomes an empty tag list. Any other
//!    non-array value rejects the whole dataset.
//! 2. Array elements: strings are trimmed and kept, numbers are rendered
//!    to their decimal form, `null` is dropped. Booleans, objects and
//!    nested arrays reject the dataset.
//! 3. Empty tags, tags equal to `undetermined` (any case) and the literal
//!    missing-value marker `NaN` are dropped.
//!
//! Scalar fields (`url`, evidence text) pass through unchanged.
//!
//! Structural problems (wrong geometry, missing `doc_id`, duplicate site
//! names or `doc_id`s) fail fast with [`LoadError::Invalid`]; no partial
//! dataset is ever returned.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::LoadError;
use crate::geojson::{Feature, FeatureCollection, RawBuilding};
use crate::models::{Attribute, Building, Dataset, GeoPoint, Site};

/// Placeholder written by surveyors when an attribute could not be
/// determined. Compared case-insensitively.
pub const UNDETERMINED: &str = "undetermined";

/// Literal missing-value marker left behind by the export pipeline.
pub const MISSING_MARKER: &str = "NaN";

/// True if `tag` carries no information and must be dropped.
pub fn is_placeholder(tag: &str) -> bool {
    let tag = tag.trim();
    tag.is_empty() || tag == MISSING_MARKER || tag.eq_ignore_ascii_case(UNDETERMINED)
}

/// Clean a tag sequence, preserving the order of surviving tags.
pub fn clean_tags<'a, I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .filter(|t| !is_placeholder(t))
        .map(|t| t.trim().to_string())
        .collect()
}

/// Re-apply the tag rules to an already-built building.
///
/// Sanitizing a canonical building returns an identical building.
pub fn sanitize_building(building: &Building) -> Building {
    let mut cleaned = building.clone();
    for attribute in Attribute::ALL {
        let tags = clean_tags(building.tags(attribute).iter().map(String::as_str));
        *cleaned.tags_mut(attribute) = tags;
    }
    cleaned
}

/// Validate and sanitize the raw document into the canonical dataset.
pub fn sanitize_dataset(raw: &FeatureCollection) -> Result<Dataset, LoadError> {
    if raw.kind != "FeatureCollection" {
        return Err(LoadError::invalid(format!(
            "expected a FeatureCollection, found '{}'",
            raw.kind
        )));
    }

    let mut site_names: HashSet<&str> = HashSet::new();
    let mut doc_ids: HashSet<String> = HashSet::new();
    let mut sites = Vec::with_capacity(raw.features.len());

    for (index, feature) in raw.features.iter().enumerate() {
        let site = sanitize_feature(index, feature)?;
        if !site_names.insert(feature.properties.site.trim()) {
            return Err(LoadError::invalid(format!(
                "duplicate site name '{}'",
                site.site
            )));
        }
        for building in &site.buildings {
            if !doc_ids.insert(building.doc_id.clone()) {
                return Err(LoadError::invalid(format!(
                    "duplicate doc_id '{}' (site '{}')",
                    building.doc_id, site.site
                )));
            }
        }
        sites.push(site);
    }

    Ok(Dataset::new(sites))
}

fn sanitize_feature(index: usize, feature: &Feature) -> Result<Site, LoadError> {
    let name = feature.properties.site.trim();
    if name.is_empty() {
        return Err(LoadError::invalid(format!(
            "feature {} has an empty site name",
            index
        )));
    }
    if feature.kind != "Feature" {
        return Err(LoadError::invalid(format!(
            "site '{}': expected a Feature, found '{}'",
            name, feature.kind
        )));
    }

    let location = point(name, &feature.geometry.kind, &feature.geometry.coordinates)?;

    let buildings = feature
        .properties
        .buildings
        .iter()
        .map(|raw| sanitize_raw_building(name, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Site {
        site: name.to_string(),
        location,
        buildings,
    })
}

fn point(site: &str, kind: &str, coordinates: &[f64]) -> Result<GeoPoint, LoadError> {
    if kind != "Point" {
        return Err(LoadError::invalid(format!(
            "site '{}': geometry must be a Point, found '{}'",
            site, kind
        )));
    }
    match coordinates {
        [longitude, latitude, ..] if coordinates.len() <= 3 => {
            if !longitude.is_finite() || !latitude.is_finite() {
                return Err(LoadError::invalid(format!(
                    "site '{}': coordinates must be finite",
                    site
                )));
            }
            Ok(GeoPoint {
                longitude: *longitude,
                latitude: *latitude,
            })
        }
        _ => Err(LoadError::invalid(format!(
            "site '{}': a Point needs two or three coordinates, found {}",
            site,
            coordinates.len()
        ))),
    }
}

fn sanitize_raw_building(site: &str, raw: &RawBuilding) -> Result<Building, LoadError> {
    let doc_id = scalar_text(&raw.doc_id)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            LoadError::invalid(format!(
                "site '{}': building without a usable doc_id ({})",
                site, raw.doc_id
            ))
        })?;
    let id = scalar_text(&raw.id)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| doc_id.clone());

    let mut building = Building {
        doc_id,
        id,
        order: Vec::new(),
        morphology: Vec::new(),
        age: Vec::new(),
        date: Vec::new(),
        style_evidence: raw.style_evidence.clone(),
        date_evidence: raw.date_evidence.clone(),
        url: match &raw.url {
            Value::Null => None,
            other => Some(other.clone()),
        },
    };

    for attribute in Attribute::ALL {
        let value = match attribute {
            Attribute::Order => &raw.order,
            Attribute::Morphology => &raw.morphology,
            Attribute::Age => &raw.age,
            Attribute::Date => &raw.date,
        };
        *building.tags_mut(attribute) = raw_tags(site, &building.doc_id, attribute, value)?;
    }

    Ok(building)
}

fn raw_tags(
    site: &str,
    doc_id: &str,
    attribute: Attribute,
    value: &Value,
) -> Result<Vec<String>, LoadError> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(LoadError::invalid(format!(
                "site '{}', building '{}': '{}' must be an array, found {}",
                site,
                doc_id,
                attribute,
                kind_of(other)
            )))
        }
    };

    let mut texts: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Null => {}
            Value::String(s) => texts.push(s.clone()),
            Value::Number(n) => texts.push(n.to_string()),
            other => {
                return Err(LoadError::invalid(format!(
                    "site '{}', building '{}': '{}' contains a {} tag",
                    site,
                    doc_id,
                    attribute,
                    kind_of(other)
                )))
            }
        }
    }

    Ok(clean_tags(texts.iter().map(String::as_str)))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
