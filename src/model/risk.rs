// src/model/risk.rs
use std::collections::HashMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Severity of a detected risk. The numeric weights feed the scoring engine
/// and are fixed: downstream scores are compared across report formats.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
    Blocker = 5,
}

impl Severity {
    /// Integer weight used for scoring (LOW=1 .. BLOCKER=5).
    #[must_use]
    pub const fn weight(self) -> u32 {
        self as u32
    }

    /// Upper-case label shown in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
            Self::Blocker => "BLOCKER",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The fixed set of risk categories, one per detector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Ambiguity,
    MissingDetail,
    Security,
    Conflict,
    Performance,
    Availability,
    Traceability,
    Scope,
}

impl RiskCategory {
    /// Snake-case name used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ambiguity => "ambiguity",
            Self::MissingDetail => "missing_detail",
            Self::Security => "security",
            Self::Conflict => "conflict",
            Self::Performance => "performance",
            Self::Availability => "availability",
            Self::Traceability => "traceability",
            Self::Scope => "scope",
        }
    }

    /// Three-letter tag used in risk labels (e.g. `AMB` in `R001-AMB-001`).
    #[must_use]
    pub fn tag(self) -> String {
        self.as_str()[..3].to_uppercase()
    }

    /// Parses a configuration-file category name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ambiguity" => Some(Self::Ambiguity),
            "missing_detail" => Some(Self::MissingDetail),
            "security" => Some(Self::Security),
            "conflict" => Some(Self::Conflict),
            "performance" => Some(Self::Performance),
            "availability" => Some(Self::Availability),
            "traceability" => Some(Self::Traceability),
            "scope" => Some(Self::Scope),
            _ => None,
        }
    }

    /// All known categories, in registry order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Ambiguity,
            Self::MissingDetail,
            Self::Security,
            Self::Conflict,
            Self::Performance,
            Self::Availability,
            Self::Traceability,
            Self::Scope,
        ]
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected issue, attributed to a requirement.
///
/// Created only by detectors and never mutated afterwards. `requirement_id`
/// is a reference into the same analysis run, not ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Risk {
    pub requirement_id: String,
    pub line_number: usize,
    pub category: RiskCategory,
    pub severity: Severity,
    /// Human-readable explanation, rendered from the rule's message template.
    pub message: String,
    /// Literal substring of the requirement text that triggered the rule.
    pub evidence: String,
    /// Optional remediation hint.
    pub suggestion: Option<String>,
}

/// Assigns display labels of the form `R001-AMB-001` to a finalized risk
/// list, counting per (requirement, category) in list order. Labels are a
/// reporting concern; the risks themselves stay untouched.
#[must_use]
pub fn risk_labels(risks: &[Risk]) -> Vec<String> {
    let mut counters: HashMap<(&str, RiskCategory), u32> = HashMap::new();
    risks
        .iter()
        .map(|risk| {
            let counter = counters
                .entry((risk.requirement_id.as_str(), risk.category))
                .or_insert(0);
            *counter += 1;
            format!("{}-{}-{:03}", risk.requirement_id, risk.category.tag(), counter)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::Low.weight(), 1);
        assert_eq!(Severity::Medium.weight(), 2);
        assert_eq!(Severity::High.weight(), 3);
        assert_eq!(Severity::Critical.weight(), 4);
        assert_eq!(Severity::Blocker.weight(), 5);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Critical < Severity::Blocker);
    }

    #[test]
    fn test_category_roundtrip() {
        for cat in RiskCategory::all() {
            assert_eq!(RiskCategory::parse(cat.as_str()), Some(*cat));
        }
        assert_eq!(RiskCategory::parse("telepathy"), None);
    }

    #[test]
    fn test_category_tags() {
        assert_eq!(RiskCategory::Ambiguity.tag(), "AMB");
        assert_eq!(RiskCategory::MissingDetail.tag(), "MIS");
        assert_eq!(RiskCategory::Conflict.tag(), "CON");
    }

    #[test]
    fn test_risk_labels_count_per_requirement_and_category() {
        let risk = |req: &str, cat: RiskCategory| Risk {
            requirement_id: req.to_string(),
            line_number: 1,
            category: cat,
            severity: Severity::Medium,
            message: "m".to_string(),
            evidence: "e".to_string(),
            suggestion: None,
        };
        let risks = vec![
            risk("R001", RiskCategory::Ambiguity),
            risk("R001", RiskCategory::Ambiguity),
            risk("R001", RiskCategory::Security),
            risk("R002", RiskCategory::Ambiguity),
        ];
        let labels = risk_labels(&risks);
        assert_eq!(
            labels,
            vec!["R001-AMB-001", "R001-AMB-002", "R001-SEC-001", "R002-AMB-001"]
        );
    }
}
