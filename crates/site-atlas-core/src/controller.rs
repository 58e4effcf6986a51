//! The single owner of filter and selection state.
//!
//! A [`Controller`] is created from the canonical dataset once loading has
//! finished. It applies [`ControlEvent`]s one at a time; every event that
//! changes the filter state rebuilds the derived dataset and reconciles
//! the selection before [`Controller::handle`] returns, so callers never
//! observe a derived view and a selection that disagree.
//!
//! Dropdown open/closed flags and hover state are presentation concerns
//! and are not modelled here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filter::{self, FilterState};
use crate::geojson::{self, RenderedView};
use crate::models::{Attribute, Dataset};
use crate::options::OptionIndex;
use crate::periods::{PeriodId, PeriodTable};
use crate::selection::Selection;

/// A discrete input from the map surface or the filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlEvent {
    ToggleFilter { attribute: Attribute, value: String },
    ClearFilters,
    SelectPeriod {
        #[serde(default)]
        period: Option<PeriodId>,
    },
    SelectSite { site: String },
    SelectBuilding { doc_id: String },
    ExitSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    Applied,
    /// The event referred to something not currently visible.
    Rejected,
}

/// Serializable summary of the controller state.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub filters: FilterState,
    pub selection: Selection,
    pub visible_sites: usize,
    pub visible_buildings: usize,
    pub total_sites: usize,
    pub total_buildings: usize,
    pub loaded_at: String,
}

pub struct Controller {
    canonical: Arc<Dataset>,
    options: OptionIndex,
    periods: &'static PeriodTable,
    filters: FilterState,
    selection: Selection,
    derived: Dataset,
    loaded_at: DateTime<Utc>,
}

impl Controller {
    pub fn new(canonical: Dataset) -> Self {
        let canonical = Arc::new(canonical);
        let options = OptionIndex::build(&canonical);
        let derived = (*canonical).clone();
        Self {
            canonical,
            options,
            periods: PeriodTable::standard(),
            filters: FilterState::new(),
            selection: Selection::new(),
            derived,
            loaded_at: Utc::now(),
        }
    }

    pub fn canonical(&self) -> &Arc<Dataset> {
        &self.canonical
    }

    pub fn derived(&self) -> &Dataset {
        &self.derived
    }

    pub fn options(&self) -> &OptionIndex {
        &self.options
    }

    pub fn periods(&self) -> &'static PeriodTable {
        self.periods
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Apply one event and bring derived state up to date.
    pub fn handle(&mut self, event: ControlEvent) -> EventOutcome {
        debug!(?event, "control event");
        let outcome = match event {
            ControlEvent::ToggleFilter { attribute, value } => {
                self.filters.toggle(attribute, value);
                self.recompute();
                EventOutcome::Applied
            }
            ControlEvent::ClearFilters => {
                self.filters.clear_filters();
                self.recompute();
                EventOutcome::Applied
            }
            ControlEvent::SelectPeriod { period } => {
                self.filters.select_period(period);
                self.recompute();
                EventOutcome::Applied
            }
            ControlEvent::SelectSite { site } => {
                self.selection.select_site(&site);
                EventOutcome::Applied
            }
            ControlEvent::SelectBuilding { doc_id } => {
                outcome_of(self.selection.select_building(&self.derived, &doc_id))
            }
            ControlEvent::ExitSite => {
                self.selection.exit_site();
                EventOutcome::Applied
            }
        };
        if outcome == EventOutcome::Rejected {
            debug!("control event rejected: target not visible");
        }
        outcome
    }

    /// Convenience wrapper for a sequence of events; returns the last outcome.
    pub fn handle_all<I>(&mut self, events: I) -> Option<EventOutcome>
    where
        I: IntoIterator<Item = ControlEvent>,
    {
        events.into_iter().map(|e| self.handle(e)).last()
    }

    fn recompute(&mut self) {
        self.derived = filter::apply(&self.canonical, &self.filters, self.periods);
        let cleared = self.selection.reconcile(&self.derived);
        debug!(
            sites = self.derived.site_count(),
            buildings = self.derived.building_count(),
            cleared_selection = cleared,
            "derived dataset rebuilt"
        );
    }

    /// Derived dataset rendered for the map surface.
    pub fn render(&self) -> RenderedView {
        geojson::render(&self.derived)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            filters: self.filters.clone(),
            selection: self.selection.clone(),
            visible_sites: self.derived.site_count(),
            visible_buildings: self.derived.building_count(),
            total_sites: self.canonical.site_count(),
            total_buildings: self.canonical.building_count(),
            loaded_at: self.loaded_at.to_rfc3339(),
        }
    }
}

fn outcome_of(applied: bool) -> EventOutcome {
    if applied {
        EventOutcome::Applied
    } else {
        EventOutcome::Rejected
    }
}
