use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use umathyoi_game::{FacilitySummary, StatType};

use super::RunReport;
use crate::common::report_timestamp;

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    generated_at: String,
    runs: &'a [RunReport],
}

fn facility_means(facility: &FacilitySummary) -> Vec<String> {
    StatType::ALL
        .iter()
        .map(|stat| format!("{:.2}", facility.stat(*stat).mean))
        .collect()
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    reports: &[RunReport],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Deck Efficiency Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;
    writeln!(out, "Runs: {}", reports.len())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for report in reports {
        let seed = report.seed_label.as_ref().map_or_else(
            || report.seed.to_string(),
            |label| format!("{label} ({})", report.seed),
        );
        writeln!(
            out,
            "{} seed {} on {} - {} turns in {} ms",
            "▶".green(),
            seed.bold(),
            report.scenario,
            report.summary.turn_count,
            report.elapsed_ms
        )?;
        for entry in &report.deck {
            writeln!(
                out,
                "   {} {} (LB{}, Lv{})",
                entry.id, entry.name, entry.limit_break, entry.level
            )?;
        }
        writeln!(
            out,
            "   {:<8} {:>7} {:>8} {:>8} {:>8} {:>8} {:>8} {:>7} {:>7}",
            "facility", "trained", "speed", "stamina", "power", "guts", "wit", "sp", "energy"
        )?;
        for facility in &report.summary.facilities {
            let means = facility_means(facility);
            writeln!(
                out,
                "   {:<8} {:>7} {:>8} {:>8} {:>8} {:>8} {:>8} {:>7.2} {:>7.2}",
                facility.facility.as_str(),
                facility.turns_trained,
                means[0],
                means[1],
                means[2],
                means[3],
                means[4],
                facility.skill_points.mean,
                facility.energy.mean
            )?;
        }
        let totals: Vec<String> = StatType::ALL
            .iter()
            .map(|stat| format!("{stat} {}", report.summary.stat_total(*stat).total))
            .collect();
        writeln!(out, "   Totals: {}", totals.join(", "))?;
        writeln!(
            out,
            "   Skill points: {}, energy: {}",
            report.summary.skill_points.total, report.summary.energy.total
        )?;
        if !report.warnings.is_empty() {
            writeln!(out, "   Warnings:")?;
            for warning in &report.warnings {
                writeln!(out, "     • {}", warning.yellow())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, reports: &[RunReport]) -> Result<()> {
    let envelope = JsonEnvelope {
        generated_at: report_timestamp(),
        runs: reports,
    };
    serde_json::to_writer_pretty(&mut *out, &envelope)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    reports: &[RunReport],
) -> Result<()> {
    writeln!(out, "# Umathyoi Deck Report\n")?;
    writeln!(out, "_Generated {}_\n", report_timestamp())?;

    for report in reports {
        writeln!(out, "## Seed {}\n", report.seed)?;
        if let Some(label) = &report.seed_label {
            writeln!(out, "- **Seed phrase**: {label}")?;
        }
        writeln!(out, "- **Scenario**: {}", report.scenario)?;
        writeln!(out, "- **Turns**: {}", report.summary.turn_count)?;
        let deck: Vec<String> = report
            .deck
            .iter()
            .map(|entry| format!("{} (LB{})", entry.name, entry.limit_break))
            .collect();
        writeln!(out, "- **Deck**: {}\n", deck.join(", "))?;

        writeln!(
            out,
            "| Facility | Trained | Speed | Stamina | Power | Guts | Wit | SP | Energy |"
        )?;
        writeln!(out, "|---|---|---|---|---|---|---|---|---|")?;
        for facility in &report.summary.facilities {
            writeln!(
                out,
                "| {} | {} | {} | {:.2} | {:.2} |",
                facility.facility,
                facility.turns_trained,
                facility_means(facility).join(" | "),
                facility.skill_points.mean,
                facility.energy.mean
            )?;
        }
        writeln!(out)?;

        if !report.warnings.is_empty() {
            writeln!(out, "### Warnings\n")?;
            for warning in &report.warnings {
                writeln!(out, "- {warning}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
