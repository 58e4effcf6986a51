//! Filter state and the filter engine.
//!
//! [`apply`] is a pure function of (canonical dataset, [`FilterState`],
//! [`PeriodTable`]). A building passes when:
//!
//! 1. for every attribute with a non-empty selection, at least one of the
//!    building's tags for that attribute is selected (OR within an
//!    attribute, AND across attributes), and
//! 2. if a period is selected, at least one of the building's `age` tags
//!    is among that period's labels.
//!
//! A site is kept only if at least one of its buildings passes, and then
//! carries only the passing buildings. Output order mirrors input order.
//! All four attributes, `date` included, take part in step 1.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::{Attribute, Building, Dataset, Site};
use crate::periods::{PeriodId, PeriodTable};

/// The user's current filter selection.
///
/// An empty set for an attribute means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    selected: BTreeMap<Attribute, BTreeSet<String>>,
    #[serde(default)]
    period: Option<PeriodId>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper: select `values` for `attribute`.
    pub fn with_values<I, S>(mut self, attribute: Attribute, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.insert(attribute, value);
        }
        self
    }

    /// Builder-style helper: select a period.
    pub fn with_period(mut self, period: PeriodId) -> Self {
        self.period = Some(period);
        self
    }

    /// Selected values for one attribute.
    pub fn selected(&self, attribute: Attribute) -> impl Iterator<Item = &str> {
        self.selected
            .get(&attribute)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn is_selected(&self, attribute: Attribute, value: &str) -> bool {
        self.selected
            .get(&attribute)
            .is_some_and(|set| set.contains(value))
    }

    pub fn period(&self) -> Option<PeriodId> {
        self.period
    }

    /// True when no attribute is constrained and no period is selected.
    pub fn is_empty(&self) -> bool {
        self.period.is_none() && self.selected.values().all(BTreeSet::is_empty)
    }

    /// Flip membership of `value` in the attribute's selection.
    ///
    /// Returns whether the value is selected afterwards. Toggling the same
    /// value twice restores the previous state.
    pub fn toggle(&mut self, attribute: Attribute, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.is_selected(attribute, &value) {
            self.remove(attribute, &value);
            false
        } else {
            self.insert(attribute, value);
            true
        }
    }

    pub fn insert(&mut self, attribute: Attribute, value: impl Into<String>) {
        self.selected
            .entry(attribute)
            .or_default()
            .insert(value.into());
    }

    pub fn remove(&mut self, attribute: Attribute, value: &str) {
        if let Some(set) = self.selected.get_mut(&attribute) {
            set.remove(value);
            if set.is_empty() {
                self.selected.remove(&attribute);
            }
        }
    }

    /// Drop every attribute selection. The selected period is kept.
    pub fn clear_filters(&mut self) {
        self.selected.clear();
    }

    pub fn select_period(&mut self, period: Option<PeriodId>) {
        self.period = period;
    }
}

/// Whether one building passes every active filter.
pub fn building_matches(building: &Building, state: &FilterState, table: &PeriodTable) -> bool {
    let attributes_pass = state
        .selected
        .iter()
        .filter(|(_, wanted)| !wanted.is_empty())
        .all(|(attribute, wanted)| {
            building
                .tags(*attribute)
                .iter()
                .any(|tag| wanted.contains(tag))
        });
    if !attributes_pass {
        return false;
    }

    match state.period {
        Some(period) => table.get(period).matches_any(&building.age),
        None => true,
    }
}

/// Build the derived dataset for `state`.
pub fn apply(canonical: &Dataset, state: &FilterState, table: &PeriodTable) -> Dataset {
    if state.is_empty() {
        return canonical.clone();
    }

    let sites: Vec<Site> = canonical
        .sites()
        .iter()
        .filter_map(|site| {
            let buildings: Vec<Building> = site
                .buildings
                .iter()
                .filter(|b| building_matches(b, state, table))
                .cloned()
                .collect();
            if buildings.is_empty() {
                None
            } else {
                Some(Site {
                    site: site.site.clone(),
                    location: site.location,
                    buildings,
                })
            }
        })
        .collect();

    Dataset::new(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn building(doc_id: &str) -> Building {
        Building {
            doc_id: doc_id.to_string(),
            id: doc_id.to_string(),
            order: Vec::new(),
            morphology: Vec::new(),
            age: Vec::new(),
            date: Vec::new(),
            style_evidence: None,
            date_evidence: None,
            url: None,
        }
    }

    fn site(name: &str, buildings: Vec<Building>) -> Site {
        Site {
            site: name.to_string(),
            location: GeoPoint {
                longitude: 22.5,
                latitude: 38.48,
            },
            buildings,
        }
    }

    fn delphi() -> Dataset {
        let mut b1 = building("B1");
        b1.order = strings(&["Doric"]);
        b1.age = strings(&["Classical"]);
        let mut b2 = building("B2");
        b2.order = strings(&["Ionic"]);
        b2.age = strings(&["Archaic"]);
        Dataset::new(vec![site("Delphi", vec![b1, b2])])
    }

    fn mixed() -> Dataset {
        let mut doric_ionic = building("B1");
        doric_ionic.order = strings(&["Doric", "Ionic"]);
        doric_ionic.morphology = strings(&["peripteral"]);
        doric_ionic.age = strings(&["Archaic"]);
        doric_ionic.date = strings(&["6th c. BCE"]);

        let mut corinthian = building("B2");
        corinthian.order = strings(&["Corinthian"]);
        corinthian.morphology = strings(&["tholos"]);
        corinthian.age = strings(&["Augustan"]);
        corinthian.date = strings(&["1st c. BCE"]);

        let mut doric = building("B3");
        doric.order = strings(&["Doric"]);
        doric.morphology = strings(&["prostyle"]);
        doric.age = strings(&["Late Classical"]);

        let bare = building("B4");

        Dataset::new(vec![
            site("Delphi", vec![doric_ionic, corinthian]),
            site("Nemea", vec![doric]),
            site("Tegea", vec![bare]),
        ])
    }

    fn doc_ids(ds: &Dataset) -> Vec<&str> {
        ds.buildings().map(|(_, b)| b.doc_id.as_str()).collect()
    }

    fn table() -> &'static PeriodTable {
        PeriodTable::standard()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let ds = mixed();
        assert_eq!(apply(&ds, &FilterState::new(), table()), ds);
    }

    #[test]
    fn test_or_within_attribute() {
        let ds = mixed();
        let state = FilterState::new().with_values(Attribute::Order, ["Ionic", "Corinthian"]);
        assert_eq!(doc_ids(&apply(&ds, &state, table())), vec!["B1", "B2"]);
    }

    #[test]
    fn test_conjunction_disjunction_law() {
        let mut b = building("B");
        b.order = strings(&["Doric", "Ionic"]);
        let t = table();

        let doric = FilterState::new().with_values(Attribute::Order, ["Doric"]);
        assert!(building_matches(&b, &doric, t));

        let corinthian = FilterState::new().with_values(Attribute::Order, ["Corinthian"]);
        assert!(!building_matches(&b, &corinthian, t));

        let both = doric
            .clone()
            .with_values(Attribute::Morphology, ["peripteral"]);
        assert!(!building_matches(&b, &both, t));
        b.morphology = strings(&["peripteral"]);
        assert!(building_matches(&b, &both, t));
    }

    #[test]
    fn test_date_participates() {
        let ds = mixed();
        let state = FilterState::new().with_values(Attribute::Date, ["1st c. BCE"]);
        assert_eq!(doc_ids(&apply(&ds, &state, table())), vec!["B2"]);
    }

    #[test]
    fn test_period_gating() {
        let mut archaic = building("A");
        archaic.age = strings(&["Archaic"]);
        let mut classical = building("C");
        classical.age = strings(&["Classical"]);

        let state = FilterState::new().with_period(PeriodId::Archaic);
        assert!(building_matches(&archaic, &state, table()));
        assert!(!building_matches(&classical, &state, table()));
    }

    #[test]
    fn test_period_without_age_tags_excludes() {
        let ds = mixed();
        let state = FilterState::new().with_period(PeriodId::Classical);
        let derived = apply(&ds, &state, table());
        assert_eq!(doc_ids(&derived), vec!["B3"]);
    }

    #[test]
    fn test_site_pruning() {
        let ds = mixed();
        let state = FilterState::new().with_values(Attribute::Order, ["Doric"]);
        let derived = apply(&ds, &state, table());
        let names: Vec<&str> = derived.sites().iter().map(|s| s.site.as_str()).collect();
        assert_eq!(names, vec!["Delphi", "Nemea"]);
        assert!(derived.site("Tegea").is_none());
        assert_eq!(derived.site("Delphi").unwrap().buildings.len(), 1);
    }

    #[test]
    fn test_delphi_scenario() {
        let ds = delphi();
        let mut state = FilterState::new();
        state.select_period(Some(PeriodId::Classical));
        let derived = apply(&ds, &state, table());
        assert_eq!(derived.site_count(), 1);
        assert_eq!(doc_ids(&derived), vec!["B1"]);

        state.toggle(Attribute::Order, "Ionic");
        let derived = apply(&ds, &state, table());
        assert!(derived.is_empty());
    }

    fn visible(ds: &Dataset, state: &FilterState) -> BTreeSet<String> {
        doc_ids(&apply(ds, state, table()))
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_constraining_an_attribute_never_grows_the_view() {
        let ds = mixed();
        let picks: [(Attribute, &str); 6] = [
            (Attribute::Order, "Doric"),
            (Attribute::Order, "Ionic"),
            (Attribute::Morphology, "peripteral"),
            (Attribute::Morphology, "tholos"),
            (Attribute::Age, "Archaic"),
            (Attribute::Date, "6th c. BCE"),
        ];
        let bases = [
            FilterState::new(),
            FilterState::new().with_values(Attribute::Order, ["Corinthian"]),
            FilterState::new().with_period(PeriodId::Archaic),
        ];

        for base in &bases {
            for (attribute, value) in picks {
                if base.selected(attribute).next().is_some() {
                    continue;
                }
                let before = visible(&ds, base);
                let after = visible(&ds, &base.clone().with_values(attribute, [value]));
                assert!(
                    after.is_subset(&before),
                    "selecting {}={} grew the view",
                    attribute,
                    value
                );
            }
        }
    }

    #[test]
    fn test_widening_within_an_attribute_never_shrinks_the_view() {
        let ds = mixed();
        let doric = FilterState::new().with_values(Attribute::Order, ["Doric"]);
        let doric_or_corinthian = doric.clone().with_values(Attribute::Order, ["Corinthian"]);
        assert!(visible(&ds, &doric).is_subset(&visible(&ds, &doric_or_corinthian)));
    }

    #[test]
    fn test_removing_a_constraint_never_shrinks_the_view() {
        let ds = mixed();
        let mut state = FilterState::new()
            .with_values(Attribute::Order, ["Doric"])
            .with_period(PeriodId::Classical);
        let before = visible(&ds, &state);
        state.select_period(None);
        let middle = visible(&ds, &state);
        state.toggle(Attribute::Order, "Doric");
        let after = visible(&ds, &state);
        assert!(before.is_subset(&middle));
        assert!(middle.is_subset(&after));
        assert_eq!(after.len(), ds.building_count());
    }

    #[test]
    fn test_adding_constraint_shrinks() {
        let ds = mixed();
        let base = FilterState::new().with_values(Attribute::Order, ["Doric", "Ionic"]);
        let narrowed = base.clone().with_values(Attribute::Age, ["Archaic"]);
        let wide = visible(&ds, &base);
        let narrow = visible(&ds, &narrowed);
        assert!(narrow.is_subset(&wide));
        assert!(narrow.len() < wide.len());
    }

    #[test]
    fn test_toggle_is_involution() {
        let original = FilterState::new()
            .with_values(Attribute::Order, ["Doric"])
            .with_period(PeriodId::Hellenistic);
        let mut state = original.clone();
        assert!(state.toggle(Attribute::Age, "Archaic"));
        assert!(!state.toggle(Attribute::Age, "Archaic"));
        assert_eq!(state, original);

        assert!(!state.toggle(Attribute::Order, "Doric"));
        assert!(state.toggle(Attribute::Order, "Doric"));
        assert_eq!(state, original);
    }

    #[test]
    fn test_clear_filters_keeps_period() {
        let mut state = FilterState::new()
            .with_values(Attribute::Order, ["Doric"])
            .with_values(Attribute::Date, ["500 BCE"])
            .with_period(PeriodId::Archaic);
        state.clear_filters();
        assert_eq!(state.selected(Attribute::Order).count(), 0);
        assert_eq!(state.period(), Some(PeriodId::Archaic));
        assert!(!state.is_empty());
        state.select_period(None);
        assert!(state.is_empty());
    }

    #[test]
    fn test_output_order_mirrors_input() {
        let ds = mixed();
        let state = FilterState::new().with_values(Attribute::Order, ["Corinthian", "Doric"]);
        assert_eq!(doc_ids(&apply(&ds, &state, table())), vec!["B1", "B2", "B3"]);
    }
}
