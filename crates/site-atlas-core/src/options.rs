//! Option index: the values a user can pick from, per attribute.
//!
//! Built once from the canonical dataset. Each attribute's options are the
//! distinct tags found across every building of every site, sorted
//! lexicographically. Morphology ("Typology") options are further limited
//! to [`TYPOLOGY_ALLOW_LIST`]; other morphology tags stay on their
//! buildings and still take part in filtering, they are just not offered
//! as options.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::{Attribute, Dataset};

/// Recognized typology terms.
pub const TYPOLOGY_ALLOW_LIST: &[&str] = &[
    "amphiprostyle",
    "apsidal",
    "circular",
    "decastyle",
    "dipteral",
    "distyle in antis",
    "double in antis",
    "hexastyle",
    "in antis",
    "monopteral",
    "octastyle",
    "peripteral",
    "prostyle",
    "pseudodipteral",
    "pseudoperipteral",
    "tetrastyle",
    "tholos",
];

/// One selectable value and the number of canonical buildings carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionValue {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionIndex {
    options: BTreeMap<Attribute, Vec<OptionValue>>,
}

impl OptionIndex {
    pub fn build(dataset: &Dataset) -> Self {
        let mut options = BTreeMap::new();
        for attribute in Attribute::ALL {
            options.insert(attribute, collect(dataset, attribute));
        }
        Self { options }
    }

    pub fn options(&self, attribute: Attribute) -> &[OptionValue] {
        self.options
            .get(&attribute)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sorted option values for one attribute.
    pub fn values(&self, attribute: Attribute) -> Vec<&str> {
        self.options(attribute)
            .iter()
            .map(|o| o.value.as_str())
            .collect()
    }

    pub fn contains(&self, attribute: Attribute, value: &str) -> bool {
        self.options(attribute)
            .binary_search_by(|o| o.value.as_str().cmp(value))
            .is_ok()
    }
}

fn collect(dataset: &Dataset, attribute: Attribute) -> Vec<OptionValue> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, building) in dataset.buildings() {
        let distinct: BTreeSet<&str> = building
            .tags(attribute)
            .iter()
            .map(String::as_str)
            .filter(|t| attribute != Attribute::Morphology || TYPOLOGY_ALLOW_LIST.contains(t))
            .collect();
        for tag in distinct {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(value, count)| OptionValue {
            value: value.to_string(),
            count,
        })
        .collect()
}
