// src/report/mod.rs
//! Report generation over a finished analysis.
//!
//! Reporters consume the finalized outcome without mutating it. Risk
//! labels (`R001-AMB-001`) are assigned here, at presentation time, so
//! detection output stays free of presentation concerns.

pub mod console;
pub mod csv;
pub mod json;
pub mod markdown;

use clap::ValueEnum;

use crate::analyzer::AnalysisOutcome;
use crate::error::Result;
use crate::model::{risk_labels, Requirement, Risk};

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Md,
    Json,
    Csv,
}

impl ReportFormat {
    #[must_use]
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Md => "report.md",
            Self::Json => "report.json",
            Self::Csv => "report.csv",
        }
    }
}

/// Everything a reporter needs, borrowed from the run that produced it.
pub struct ReportData<'a> {
    pub requirements: &'a [Requirement],
    pub outcome: &'a AnalysisOutcome,
    /// Risk labels, parallel to `outcome.risks`.
    pub labels: Vec<String>,
}

impl<'a> ReportData<'a> {
    #[must_use]
    pub fn new(requirements: &'a [Requirement], outcome: &'a AnalysisOutcome) -> Self {
        let labels = risk_labels(&outcome.risks);
        Self {
            requirements,
            outcome,
            labels,
        }
    }

    /// Risks attributed to one requirement, paired with their labels, in
    /// detection order. Used by the grouped renderers.
    pub(crate) fn risks_for(&self, requirement_id: &str) -> Vec<(&Risk, &str)> {
        self.outcome
            .risks
            .iter()
            .zip(self.labels.iter().map(String::as_str))
            .filter(|(risk, _)| risk.requirement_id == requirement_id)
            .collect()
    }
}

/// Renders the report in `format`.
///
/// # Errors
/// Fails only when JSON serialization fails.
pub fn render(format: ReportFormat, data: &ReportData<'_>) -> Result<String> {
    match format {
        ReportFormat::Md => Ok(markdown::render(data)),
        ReportFormat::Json => json::render(data),
        ReportFormat::Csv => Ok(csv::render(data)),
    }
}
