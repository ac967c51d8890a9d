//! Plain-text listing of a watch result.

use std::io::{self, Write};

use sitewatch_recon::model::WatchResult;

const RULE: &str = "#############################################";

pub fn write_report<W: Write>(out: &mut W, result: &WatchResult) -> io::Result<()> {
    let meta = &result.meta;

    writeln!(out, "Program executed at {}", meta.run_at)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{}", meta.config_name)?;
    writeln!(
        out,
        "{} - {}",
        meta.window_start.format("%d/%m/%Y"),
        meta.window_end.format("%d/%m/%Y")
    )?;
    writeln!(out, "{RULE}")?;

    if result.matches.is_empty() {
        writeln!(out, "\nNo exposure sites on the watched dates.")?;
    }

    for m in &result.matches {
        let r = &m.record;
        writeln!(out)?;
        writeln!(
            out,
            "A {}-risk exposure in {} occurred on {}.",
            r.risk, r.location, r.exposure_period
        )?;
        writeln!(out, "The location was at/on {}.", r.site)?;
        if !r.notes.is_empty() {
            writeln!(out, "Exposure note: {}.", r.notes.trim_end_matches('.'))?;
        }
        writeln!(out, "Matched watch date: {}", m.matched_date.format("%d/%m/%Y"))?;
    }

    if !result.failures.is_empty() {
        writeln!(out, "\nSkipped (could not read the date):")?;
        for f in &result.failures {
            writeln!(
                out,
                "  {} row {}: \"{}\" ({})",
                f.risk,
                f.row + 1,
                f.exposure_period,
                f.reason
            )?;
        }
    }

    Ok(())
}
