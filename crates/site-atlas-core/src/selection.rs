//! Selection consistency manager.
//!
//! Tracks the selected site and the selected building (by `doc_id`) and
//! keeps them valid against the current derived dataset:
//!
//! - selecting a site always succeeds and drops the building selection;
//! - a building can only be selected while it is visible under the
//!   selected site;
//! - after every recomputation, a selected building that is no longer
//!   visible is cleared, while the site selection is left alone.

use serde::Serialize;
use tracing::debug;

use crate::models::Dataset;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    site: Option<String>,
    building: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    /// `doc_id` of the selected building.
    pub fn building(&self) -> Option<&str> {
        self.building.as_deref()
    }

    /// Select a site, clearing any building selection.
    pub fn select_site(&mut self, site: &str) {
        self.site = Some(site.to_string());
        self.building = None;
    }

    /// Select a building visible under the selected site.
    ///
    /// Returns `false` (and changes nothing) when no site is selected or
    /// the building is filtered out.
    pub fn select_building(&mut self, derived: &Dataset, doc_id: &str) -> bool {
        let Some(site) = self.site.as_deref() else {
            debug!(doc_id, "ignoring building selection without a selected site");
            return false;
        };
        if derived.find_building(doc_id, Some(site)).is_none() {
            debug!(doc_id, site, "ignoring selection of a building that is not visible");
            return false;
        }
        self.building = Some(doc_id.to_string());
        true
    }

    /// Clear both the site and the building.
    pub fn exit_site(&mut self) {
        self.site = None;
        self.building = None;
    }

    /// Drop the building selection if `derived` no longer shows it.
    ///
    /// The lookup is scoped to the selected site when there is one. Returns
    /// `true` if the building selection was cleared.
    pub fn reconcile(&mut self, derived: &Dataset) -> bool {
        let Some(doc_id) = self.building.as_deref() else {
            return false;
        };
        if derived.find_building(doc_id, self.site.as_deref()).is_some() {
            return false;
        }
        debug!(doc_id, "clearing stale building selection");
        self.building = None;
        true
    }
}
