//! Analysis pipeline behavior over small hand-built rule sets: exact risk
//! and score expectations, ranking selection, and failure isolation
//! against healthy detectors.

use reqsentry_core::analyzer::Analyzer;
use reqsentry_core::detect::{build_detectors, Detector, DetectorSet};
use reqsentry_core::filter::FilterChain;
use reqsentry_core::model::{Requirement, Risk, RiskCategory, Severity};
use reqsentry_core::rules::RuleSet;
use reqsentry_core::{ReqsentryError, Result};

fn rules_allow_and_system() -> RuleSet {
    let json = r#"{
        "detectors": {
            "ambiguity": {
                "enabled": true,
                "rules": [
                    {
                        "name": "permissive_language",
                        "severity": "high",
                        "message": "Permissive term '{evidence}' found",
                        "kind": "keywords",
                        "keywords": ["allow"]
                    }
                ]
            },
            "missing_detail": {
                "enabled": true,
                "rules": [
                    {
                        "name": "unspecified_actor",
                        "severity": "high",
                        "message": "Unspecified actor '{evidence}'",
                        "kind": "keywords",
                        "keywords": ["system"]
                    }
                ]
            }
        }
    }"#;
    RuleSet::from_json_str(json).unwrap()
}

fn analyzer_for(rules: &RuleSet) -> Analyzer<'static> {
    Analyzer::new(build_detectors(rules).unwrap(), FilterChain::new())
}

#[test]
fn two_high_rules_yield_two_risks_and_score_six() {
    let rules = rules_allow_and_system();
    let requirements =
        vec![Requirement::new("R001", 1, "The system shall allow users to login").unwrap()];

    let outcome = analyzer_for(&rules).run(&requirements).unwrap();

    assert_eq!(outcome.risks.len(), 2);
    assert!(outcome
        .risks
        .iter()
        .all(|r| r.severity == Severity::High && r.requirement_id == "R001"));
    let categories: Vec<RiskCategory> = outcome.risks.iter().map(|r| r.category).collect();
    assert!(categories.contains(&RiskCategory::Ambiguity));
    assert!(categories.contains(&RiskCategory::MissingDetail));
    assert_eq!(outcome.scores[0].total_score, 6);
}

#[test]
fn ranking_skips_clean_requirements() {
    let json = r#"{
        "detectors": {
            "ambiguity": {
                "enabled": true,
                "rules": [
                    {
                        "name": "hedging",
                        "severity": "low",
                        "message": "Hedge '{evidence}'",
                        "kind": "keywords",
                        "keywords": ["possibly"]
                    }
                ]
            }
        }
    }"#;
    let rules = RuleSet::from_json_str(json).unwrap();
    let requirements = vec![
        Requirement::new("R001", 1, "The database stores records.").unwrap(),
        Requirement::new("R002", 2, "The export possibly includes headers.").unwrap(),
    ];

    let outcome = analyzer_for(&rules).run(&requirements).unwrap();

    assert_eq!(outcome.ranking.len(), 1);
    assert_eq!(outcome.ranking[0].requirement_id, "R002");
    assert_eq!(outcome.ranking[0].risk_count, 1);
    assert_eq!(outcome.ranking[0].total_score, 1);
}

struct PanickyByError;

impl Detector for PanickyByError {
    fn category(&self) -> RiskCategory {
        RiskCategory::Performance
    }

    fn detect(&self, _requirement: &Requirement) -> Result<Vec<Risk>> {
        Err(ReqsentryError::Config("synthetic detector failure".to_string()))
    }
}

#[test]
fn injected_failing_detector_leaves_other_output_unchanged() {
    let rules = rules_allow_and_system();
    let requirements =
        vec![Requirement::new("R001", 1, "The system shall allow users to login").unwrap()];

    let baseline = analyzer_for(&rules).run(&requirements).unwrap();

    let mut detectors: DetectorSet = build_detectors(&rules).unwrap();
    detectors.per_requirement.push(Box::new(PanickyByError));
    let outcome = Analyzer::new(detectors, FilterChain::new())
        .run(&requirements)
        .unwrap();

    assert_eq!(outcome.risks, baseline.risks);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].category, RiskCategory::Performance);
    assert_eq!(outcome.errors[0].requirement_id.as_deref(), Some("R001"));
}

#[test]
fn repeated_runs_are_identical() {
    let rules = RuleSet::builtin();
    let requirements: Vec<Requirement> = (1..=40)
        .map(|i| {
            Requirement::new(
                &format!("R{i:03}"),
                i,
                "The system should quickly allow users to login and handle data appropriately",
            )
            .unwrap()
        })
        .collect();

    let first = analyzer_for(&rules).run(&requirements).unwrap();
    let second = analyzer_for(&rules).run(&requirements).unwrap();

    assert_eq!(first.risks, second.risks);
    assert_eq!(first.ranking, second.ranking);
}
