// src/report/console.rs
//! Colored console summary printed after an analysis run.

use colored::Colorize;

use super::ReportData;
use crate::model::Severity;

/// Prints risks grouped by requirement followed by the ranking and the
/// run summary.
pub fn print_report(data: &ReportData<'_>) {
    if !data.outcome.risks.is_empty() {
        print_risks(data);
        print_ranking(data);
    }
    print_summary(data);
}

fn print_risks(data: &ReportData<'_>) {
    // Group by requirement; batch risks arrive after the per-requirement
    // pass, so list adjacency is not enough.
    for requirement in data.requirements {
        let entries = data.risks_for(&requirement.id);
        if entries.is_empty() {
            continue;
        }
        println!();
        println!(
            "{} {}",
            format!("{} (line {})", requirement.id, requirement.line_number).bold(),
            requirement.text.dimmed()
        );
        for (risk, label) in entries {
            let header = format!(
                "  [{}] {} {}: {}",
                label,
                risk.severity.label(),
                risk.category.as_str(),
                risk.message
            );
            match risk.severity {
                Severity::Blocker | Severity::Critical => println!("{}", header.red().bold()),
                Severity::High => println!("{}", header.red()),
                Severity::Medium => println!("{}", header.yellow()),
                Severity::Low => println!("{}", header.dimmed()),
            }
            println!("      evidence: \"{}\"", risk.evidence);
            if let Some(suggestion) = &risk.suggestion {
                println!("      {} {}", "suggestion:".green(), suggestion);
            }
        }
    }
}

fn print_ranking(data: &ReportData<'_>) {
    println!();
    println!("{}", "Top riskiest requirements".bold());
    for (rank, entry) in data.outcome.ranking.iter().enumerate() {
        println!(
            "  {}. {} score {} ({} {}, avg {:.2})",
            rank + 1,
            entry.requirement_id.bold(),
            entry.total_score,
            entry.risk_count,
            pluralize(entry.risk_count, "risk"),
            entry.avg_severity
        );
    }
}

fn print_summary(data: &ReportData<'_>) {
    let summary = &data.outcome.summary;
    println!();
    if summary.risk_count == 0 {
        println!(
            "{} {} requirements analyzed, no risks found ({} ms)",
            "OK".green().bold(),
            summary.requirement_count,
            summary.duration_ms
        );
    } else {
        println!(
            "{} {} {} across {} requirements ({} ms)",
            "FOUND".red().bold(),
            summary.risk_count,
            pluralize(summary.risk_count, "risk"),
            summary.requirement_count,
            summary.duration_ms
        );
    }
    if summary.detector_error_count > 0 {
        println!(
            "{} {} detector {} were isolated",
            "WARN".yellow().bold(),
            summary.detector_error_count,
            pluralize(summary.detector_error_count, "failure")
        );
    }
}

fn pluralize(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
