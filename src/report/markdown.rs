// src/report/markdown.rs
//! Markdown report: summary, risks grouped by requirement, top-N table.

use std::fmt::Write as _;

use super::ReportData;

#[must_use]
pub fn render(data: &ReportData<'_>) -> String {
    let mut out = String::new();
    let summary = &data.outcome.summary;

    out.push_str("# Requirements Risk Report\n\n");
    out.push_str("## Summary\n\n");
    let _ = writeln!(out, "- Requirements analyzed: {}", summary.requirement_count);
    let _ = writeln!(out, "- Risks found: {}", summary.risk_count);
    let _ = writeln!(out, "- Detector errors: {}", summary.detector_error_count);
    let _ = writeln!(out, "- Duration: {} ms", summary.duration_ms);
    out.push('\n');

    out.push_str("## Risks by requirement\n\n");
    if data.outcome.risks.is_empty() {
        out.push_str("No risks detected.\n\n");
    } else {
        // Batch detectors append risks after the per-requirement pass, so
        // group by requirement instead of trusting list adjacency.
        for requirement in data.requirements {
            let entries = data.risks_for(&requirement.id);
            if entries.is_empty() {
                continue;
            }
            let _ = writeln!(
                out,
                "### {} (line {})\n\n> {}\n",
                requirement.id, requirement.line_number, requirement.text
            );
            for (risk, label) in entries {
                let _ = writeln!(
                    out,
                    "- **{}** [{}] `{}`: {}",
                    risk.severity.label(),
                    label,
                    risk.category.as_str(),
                    risk.message
                );
                let _ = writeln!(out, "  - Evidence: \"{}\"", risk.evidence);
                if let Some(suggestion) = &risk.suggestion {
                    let _ = writeln!(out, "  - Suggestion: {suggestion}");
                }
            }
        }
        out.push('\n');
    }

    out.push_str("## Top riskiest requirements\n\n");
    if data.outcome.ranking.is_empty() {
        out.push_str("No requirements carry risks.\n");
    } else {
        out.push_str("| Rank | Requirement | Total score | Risks | Avg severity |\n");
        out.push_str("|------|-------------|-------------|-------|--------------|\n");
        for (rank, entry) in data.outcome.ranking.iter().enumerate() {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {:.2} |",
                rank + 1,
                entry.requirement_id,
                entry.total_score,
                entry.risk_count,
                entry.avg_severity
            );
        }
    }

    out
}
