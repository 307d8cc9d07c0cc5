// src/report/csv.rs
//! CSV report, one row per risk.

use std::fmt::Write as _;

use super::ReportData;

const HEADER: &str = "risk_id,requirement_id,line_number,category,severity,message,evidence,suggestion";

#[must_use]
pub fn render(data: &ReportData<'_>) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    for (risk, label) in data.outcome.risks.iter().zip(&data.labels) {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            escape(label),
            escape(&risk.requirement_id),
            risk.line_number,
            risk.category.as_str(),
            risk.severity.label(),
            escape(&risk.message),
            escape(&risk.evidence),
            escape(risk.suggestion.as_deref().unwrap_or(""))
        );
    }
    out
}

/// Quotes a field when it contains a delimiter, quote, or newline.
fn escape(field: &str) -> String {
    if field.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalysisOutcome, RunState, RunSummary};
    use crate::model::{Requirement, Risk, RiskCategory, Severity};
    use crate::report::ReportData;

    #[test]
    fn test_csv_escapes_embedded_delimiters() {
        let requirements = vec![Requirement::new("R001", 1, "text").unwrap()];
        let outcome = AnalysisOutcome {
            risks: vec![Risk {
                requirement_id: "R001".to_string(),
                line_number: 1,
                category: RiskCategory::Conflict,
                severity: Severity::High,
                message: "Contradiction: \"always\" vs \"never\"".to_string(),
                evidence: "always, never".to_string(),
                suggestion: None,
            }],
            scores: Vec::new(),
            ranking: Vec::new(),
            errors: Vec::new(),
            summary: RunSummary {
                state: RunState::Completed,
                requirement_count: 1,
                risk_count: 1,
                detector_error_count: 0,
                duration_ms: 0,
                cancelled: false,
            },
        };
        let data = ReportData::new(&requirements, &outcome);
        let csv = render(&data);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), HEADER);
        let row = lines.next().unwrap();
        assert!(row.starts_with("R001-CON-001,R001,1,conflict,HIGH,"));
        assert!(row.contains("\"Contradiction: \"\"always\"\" vs \"\"never\"\"\""));
        assert!(row.contains("\"always, never\""));
    }
}
