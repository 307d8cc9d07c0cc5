// src/report/json.rs
//! JSON report, machine-readable.

use serde::Serialize;

use super::ReportData;
use crate::analyzer::{DetectorError, RunSummary};
use crate::error::Result;
use crate::model::{Requirement, Risk};
use crate::scoring::RankedRequirement;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a RunSummary,
    requirements: &'a [Requirement],
    risks: Vec<JsonRisk<'a>>,
    ranking: &'a [RankedRequirement],
    errors: &'a [DetectorError],
}

/// A risk with its presentation label attached.
#[derive(Serialize)]
struct JsonRisk<'a> {
    id: &'a str,
    #[serde(flatten)]
    risk: &'a Risk,
}

/// # Errors
/// Fails when serialization fails.
pub fn render(data: &ReportData<'_>) -> Result<String> {
    let report = JsonReport {
        summary: &data.outcome.summary,
        requirements: data.requirements,
        risks: data
            .outcome
            .risks
            .iter()
            .zip(&data.labels)
            .map(|(risk, label)| JsonRisk {
                id: label.as_str(),
                risk,
            })
            .collect(),
        ranking: &data.outcome.ranking,
        errors: &data.outcome.errors,
    };
    let mut rendered = serde_json::to_string_pretty(&report)?;
    rendered.push('\n');
    Ok(rendered)
}
