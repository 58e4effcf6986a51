//! `atlas check`: load the configured dataset and summarise it.
//!
//! Useful for validating a dataset file before serving it: a file that
//! fails shape validation makes the command exit non-zero with the
//! reason.

use anyhow::{Context, Result};
use site_atlas_core::models::Attribute;
use site_atlas_core::session::Session;

use crate::config::Config;
use crate::source_file::FileSource;

pub async fn run_check(config: &Config) -> Result<()> {
    let source = FileSource::new(config.data.path.clone());
    let mut session = Session::new();
    let controller = session
        .load(&source)
        .await
        .with_context(|| format!("Failed to load dataset: {}", config.data.path.display()))?;

    let dataset = controller.canonical();
    println!("Site Atlas — Dataset Check");
    println!("==========================");
    println!();
    println!("  Dataset:     {}", config.data.path.display());
    println!("  Sites:       {}", dataset.site_count());
    println!("  Buildings:   {}", dataset.building_count());

    for attribute in Attribute::ALL {
        let options = controller.options().options(attribute);
        println!();
        println!("  {} ({} values)", attribute.label(), options.len());
        for option in options {
            println!("    {:<28} {:>5}", option.value, option.count);
        }
    }

    Ok(())
}
