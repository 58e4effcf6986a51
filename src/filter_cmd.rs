//! `atlas filter`: apply filters from the command line and print the
//! derived view.
//!
//! Each flag value is fed to the controller as a toggle event, so the
//! command sees exactly the semantics the HTTP surface does.

use anyhow::{Context, Result};
use site_atlas_core::controller::ControlEvent;
use site_atlas_core::models::{Attribute, Dataset};
use site_atlas_core::periods::PeriodId;
use site_atlas_core::session::Session;
use tracing::warn;

use crate::config::Config;
use crate::source_file::FileSource;

/// Filters requested on the command line.
#[derive(Debug, Default, Clone)]
pub struct FilterRequest {
    pub values: Vec<(Attribute, String)>,
    pub period: Option<PeriodId>,
    /// Print the derived view as GeoJSON instead of a listing.
    pub json: bool,
}

pub async fn run_filter(config: &Config, request: FilterRequest) -> Result<()> {
    let source = FileSource::new(config.data.path.clone());
    let mut session = Session::new();
    let controller = session
        .load(&source)
        .await
        .with_context(|| format!("Failed to load dataset: {}", config.data.path.display()))?;

    let mut events = Vec::with_capacity(request.values.len() + 1);
    for (attribute, value) in request.values {
        if !controller.options().contains(attribute, &value) {
            warn!(attribute = %attribute, value = %value, "value is not offered by the option index");
        }
        events.push(ControlEvent::ToggleFilter { attribute, value });
    }
    if request.period.is_some() {
        events.push(ControlEvent::SelectPeriod {
            period: request.period,
        });
    }
    controller.handle_all(events);

    if request.json {
        let view = controller.render();
        println!("{}", serde_json::to_string_pretty(&view.document)?);
        return Ok(());
    }

    print_listing(controller.derived());
    let canonical = controller.canonical();
    println!();
    println!(
        "{} sites, {} buildings visible (of {} sites, {} buildings)",
        controller.derived().site_count(),
        controller.derived().building_count(),
        canonical.site_count(),
        canonical.building_count()
    );

    Ok(())
}

fn print_listing(derived: &Dataset) {
    if derived.is_empty() {
        println!("No sites match.");
        return;
    }
    for site in derived.sites() {
        println!(
            "{} ({:.3}, {:.3})",
            site.site, site.location.latitude, site.location.longitude
        );
        for building in &site.buildings {
            let tags: Vec<String> = Attribute::ALL
                .iter()
                .filter(|a| !building.tags(**a).is_empty())
                .map(|a| format!("{}: {}", a.as_str(), building.tags(*a).join(", ")))
                .collect();
            println!("  {:<8} {}", building.doc_id, building.id);
            if !tags.is_empty() {
                println!("           {}", tags.join("; "));
            }
        }
    }
}
