//! Core data models used throughout Site Atlas.
//!
//! These types represent the canonical (sanitized) dataset: sites, the
//! buildings they own, and the filterable attributes carried by each
//! building. Raw, unvalidated input lives in [`crate::geojson`] and only
//! becomes a [`Dataset`] through [`crate::sanitize::sanitize_dataset`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownAttribute;

/// A filterable building attribute.
///
/// `Morphology` is presented to users as "Typology".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Order,
    Morphology,
    Age,
    Date,
}

impl Attribute {
    /// Every attribute, in presentation order.
    pub const ALL: [Attribute; 4] = [
        Attribute::Order,
        Attribute::Morphology,
        Attribute::Age,
        Attribute::Date,
    ];

    /// Field name used on the wire and in the input file.
    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::Order => "order",
            Attribute::Morphology => "morphology",
            Attribute::Age => "age",
            Attribute::Date => "date",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Order => "Order",
            Attribute::Morphology => "Typology",
            Attribute::Age => "Age",
            Attribute::Date => "Date",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = UnknownAttribute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "order" => Ok(Attribute::Order),
            "morphology" | "typology" => Ok(Attribute::Morphology),
            "age" => Ok(Attribute::Age),
            "date" => Ok(Attribute::Date),
            _ => Err(UnknownAttribute(s.to_string())),
        }
    }
}

/// WGS84 point, longitude first as in GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// A sanitized building record.
///
/// `doc_id` is the stable identity; `id` is a display label and is not
/// guaranteed to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub doc_id: String,
    pub id: String,
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub morphology: Vec<String>,
    #[serde(default)]
    pub age: Vec<String>,
    #[serde(default)]
    pub date: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<serde_json::Value>,
}

impl Building {
    /// Tags carried for one attribute, in input order.
    pub fn tags(&self, attribute: Attribute) -> &[String] {
        match attribute {
            Attribute::Order => &self.order,
            Attribute::Morphology => &self.morphology,
            Attribute::Age => &self.age,
            Attribute::Date => &self.date,
        }
    }

    pub(crate) fn tags_mut(&mut self, attribute: Attribute) -> &mut Vec<String> {
        match attribute {
            Attribute::Order => &mut self.order,
            Attribute::Morphology => &mut self.morphology,
            Attribute::Age => &mut self.age,
            Attribute::Date => &mut self.date,
        }
    }
}

/// A site and the buildings it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub site: String,
    pub location: GeoPoint,
    pub buildings: Vec<Building>,
}

impl Site {
    pub fn building(&self, doc_id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.doc_id == doc_id)
    }
}

/// An ordered sequence of sites.
///
/// Used both for the canonical dataset and for every derived view the
/// filter engine produces. Derived views are always rebuilt, never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    sites: Vec<Site>,
}

impl Dataset {
    pub fn new(sites: Vec<Site>) -> Self {
        Self { sites }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn building_count(&self) -> usize {
        self.sites.iter().map(|s| s.buildings.len()).sum()
    }

    pub fn site(&self, name: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.site == name)
    }

    /// Every building paired with the name of the site that owns it.
    pub fn buildings(&self) -> impl Iterator<Item = (&str, &Building)> {
        self.sites
            .iter()
            .flat_map(|s| s.buildings.iter().map(move |b| (s.site.as_str(), b)))
    }

    /// Look up a building by `doc_id`, restricted to `site` when given.
    pub fn find_building(&self, doc_id: &str, site: Option<&str>) -> Option<&Building> {
        match site {
            Some(name) => self.site(name).and_then(|s| s.building(doc_id)),
            None => self
                .buildings()
                .map(|(_, b)| b)
                .find(|b| b.doc_id == doc_id),
        }
    }
}

impl From<Vec<Site>> for Dataset {
    fn from(sites: Vec<Site>) -> Self {
        Self::new(sites)
    }
}
