//! `atlas periods`: print the period table and timeline extent.

use site_atlas_core::periods::PeriodTable;

pub fn run_periods() {
    let table = PeriodTable::standard();

    println!("{:<14} {:<20} {:>6} {:>6}  TAGS", "ID", "LABEL", "START", "END");
    for segment in table.segments() {
        println!(
            "{:<14} {:<20} {:>6} {:>6}  {}",
            segment.id.as_str(),
            segment.label,
            segment.start,
            segment.end,
            segment.tags.join(", ")
        );
    }
    println!();
    println!(
        "Timeline: {} to {} ({} years)",
        table.min_start(),
        table.max_end(),
        table.total_span()
    );
}
