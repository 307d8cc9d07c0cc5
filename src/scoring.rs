// src/scoring.rs
//! Scoring engine: severity weights summed per requirement, ranked, top-N.

use serde::Serialize;

use crate::model::{Requirement, Risk};

/// Derived score for one requirement, recomputed per analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRequirement {
    pub requirement_id: String,
    /// Sum of the severity weights of the requirement's risks.
    pub total_score: u32,
    /// Mean severity weight, rounded to 2 decimal places; 0 when risk-free.
    pub avg_severity: f64,
    pub risk_count: usize,
}

/// Computes scores for every requirement, in input order. Requirements
/// without risks get a zero score here and are excluded from ranking by
/// [`top_riskiest`].
#[must_use]
pub fn score_requirements(requirements: &[Requirement], risks: &[Risk]) -> Vec<RankedRequirement> {
    requirements
        .iter()
        .map(|req| {
            let weights: Vec<u32> = risks
                .iter()
                .filter(|r| r.requirement_id == req.id)
                .map(|r| r.severity.weight())
                .collect();
            let total_score: u32 = weights.iter().sum();
            let risk_count = weights.len();
            let avg_severity = if risk_count == 0 {
                0.0
            } else {
                round2(f64::from(total_score) / risk_count as f64)
            };
            RankedRequirement {
                requirement_id: req.id.clone(),
                total_score,
                avg_severity,
                risk_count,
            }
        })
        .collect()
}

/// Selects the top-N riskiest requirements.
///
/// Ordering: total score descending, then risk count descending, then
/// requirement id ascending for deterministic output. Requirements with no
/// risks are never included; if fewer than `top_n` requirements have risks,
/// all of them are returned.
#[must_use]
pub fn top_riskiest(scores: &[RankedRequirement], top_n: usize) -> Vec<RankedRequirement> {
    let mut ranked: Vec<RankedRequirement> = scores
        .iter()
        .filter(|s| s.risk_count > 0)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then(b.risk_count.cmp(&a.risk_count))
            .then(a.requirement_id.cmp(&b.requirement_id))
    });
    ranked.truncate(top_n);
    ranked
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskCategory, Severity};

    fn req(id: &str) -> Requirement {
        Requirement::new(id, 1, "text").unwrap()
    }

    fn risk(req: &str, severity: Severity) -> Risk {
        Risk {
            requirement_id: req.to_string(),
            line_number: 1,
            category: RiskCategory::Ambiguity,
            severity,
            message: "m".to_string(),
            evidence: "e".to_string(),
            suggestion: None,
        }
    }

    #[test]
    fn test_total_is_sum_of_weights() {
        let reqs = vec![req("R001")];
        let risks = vec![risk("R001", Severity::High), risk("R001", Severity::High)];
        let scores = score_requirements(&reqs, &risks);
        assert_eq!(scores[0].total_score, 6);
        assert_eq!(scores[0].risk_count, 2);
        assert!((scores[0].avg_severity - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_risk_requirement_scores_zero() {
        let scores = score_requirements(&[req("R001")], &[]);
        assert_eq!(scores[0].total_score, 0);
        assert!((scores[0].avg_severity).abs() < f64::EPSILON);
    }

    #[test]
    fn test_avg_severity_rounded() {
        let reqs = vec![req("R001")];
        let risks = vec![
            risk("R001", Severity::Low),
            risk("R001", Severity::Low),
            risk("R001", Severity::Medium),
        ];
        // 4 / 3 = 1.333... -> 1.33
        let scores = score_requirements(&reqs, &risks);
        assert!((scores[0].avg_severity - 1.33).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ranking_order_and_tie_breaks() {
        let reqs = vec![req("R001"), req("R002"), req("R003"), req("R004")];
        let risks = vec![
            // R001: total 4 via two risks
            risk("R001", Severity::Medium),
            risk("R001", Severity::Medium),
            // R002: total 4 via one risk
            risk("R002", Severity::Critical),
            // R003: total 4 via two risks -> ties with R001, id breaks it
            risk("R003", Severity::Medium),
            risk("R003", Severity::Medium),
            // R004: total 6, ranks first
            risk("R004", Severity::High),
            risk("R004", Severity::High),
        ];
        let ranking = top_riskiest(&score_requirements(&reqs, &risks), 5);
        let ids: Vec<&str> = ranking.iter().map(|r| r.requirement_id.as_str()).collect();
        assert_eq!(ids, vec!["R004", "R001", "R003", "R002"]);
    }

    #[test]
    fn test_top_n_never_pads_with_zero_risk() {
        let reqs = vec![req("R001"), req("R002")];
        let risks = vec![risk("R002", Severity::Low)];
        let ranking = top_riskiest(&score_requirements(&reqs, &risks), 5);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].requirement_id, "R002");
        assert_eq!(ranking[0].total_score, 1);
        assert_eq!(ranking[0].risk_count, 1);
    }

    #[test]
    fn test_top_n_truncates() {
        let reqs: Vec<Requirement> = (1..=8).map(|i| req(&format!("R{i:03}"))).collect();
        let risks: Vec<Risk> = (1..=8)
            .map(|i| risk(&format!("R{i:03}"), Severity::Low))
            .collect();
        let ranking = top_riskiest(&score_requirements(&reqs, &risks), 5);
        assert_eq!(ranking.len(), 5);
    }
}
