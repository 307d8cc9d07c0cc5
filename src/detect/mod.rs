// src/detect/mod.rs
//! Detector framework: the detection traits, the generic rule-driven
//! detector, and the batch-shaped duplicate detector.
//!
//! Concrete categories are rule tables plus one shared matching algorithm,
//! not behaviorally distinct types. Detectors are pure functions of the
//! requirement text and their immutable compiled rules; they never observe
//! each other's output.

pub mod matcher;
pub mod registry;

use regex::Regex;

use crate::error::Result;
use crate::model::{Requirement, Risk, RiskCategory, Severity};
use crate::rules::DetectionRule;

pub use registry::{build_detectors, DetectorSet};

/// Per-requirement detection capability.
pub trait Detector: Send + Sync {
    fn category(&self) -> RiskCategory;

    /// Evaluates one requirement against this detector's rules.
    ///
    /// # Errors
    /// A failure here is isolated by the analyzer: it is recorded as a
    /// non-fatal detector error and excluded from the risk output.
    fn detect(&self, requirement: &Requirement) -> Result<Vec<Risk>>;
}

/// Cross-requirement detection capability. Batch detectors see the full
/// ordered requirement sequence and must key risks to every requirement
/// implicated in a finding.
pub trait BatchDetector: Send + Sync {
    fn category(&self) -> RiskCategory;

    /// Evaluates the complete requirement sequence.
    ///
    /// # Errors
    /// Isolated by the analyzer like per-requirement failures.
    fn detect_batch(&self, requirements: &[Requirement]) -> Result<Vec<Risk>>;
}

/// A rule compiled for matching. Regex-based shapes are compiled at
/// registry-build time so malformed patterns fail before any requirement
/// is processed.
pub struct CompiledRule {
    pub name: String,
    pub severity: Severity,
    pub message: String,
    pub suggestion: Option<String>,
    pub matcher: CompiledPattern,
}

pub enum CompiledPattern {
    Keywords(Vec<String>),
    Regex(Regex),
    TriggerWithout {
        triggers: Vec<String>,
        required_with: Vec<String>,
    },
    ContradictoryPairs(Vec<(String, String)>),
    MissingSignal(Vec<Regex>),
}

impl CompiledRule {
    /// Compiles a declarative rule. Returns `None` for batch-shaped rules,
    /// which are handled by [`DuplicateDetector`].
    ///
    /// # Errors
    /// Invalid regex patterns fail here, at build time.
    pub fn compile(rule: &DetectionRule) -> Result<Option<Self>> {
        use crate::rules::RulePattern;

        let matcher = match &rule.pattern {
            RulePattern::Keywords { keywords } => CompiledPattern::Keywords(keywords.clone()),
            RulePattern::Regex { pattern } => {
                CompiledPattern::Regex(case_insensitive(pattern)?)
            }
            RulePattern::TriggerWithout {
                triggers,
                required_with,
            } => CompiledPattern::TriggerWithout {
                triggers: triggers.clone(),
                required_with: required_with.clone(),
            },
            RulePattern::ContradictoryPairs { pairs } => {
                CompiledPattern::ContradictoryPairs(pairs.clone())
            }
            RulePattern::MissingSignal { signals } => CompiledPattern::MissingSignal(
                signals
                    .iter()
                    .map(|s| case_insensitive(s))
                    .collect::<Result<Vec<_>>>()?,
            ),
            RulePattern::DuplicateSimilarity { .. } => return Ok(None),
        };

        Ok(Some(Self {
            name: rule.name.clone(),
            severity: rule.severity,
            message: rule.message.clone(),
            suggestion: rule.suggestion.clone(),
            matcher,
        }))
    }

    /// Applies this rule to one requirement text. First-match-wins: at most
    /// one finding per rule regardless of how often the pattern matches.
    /// Returns `(evidence, other)` where `other` is the counterpart term
    /// for contradictory pairs.
    fn apply<'a>(&self, text: &'a str) -> Option<(&'a str, Option<&str>)> {
        match &self.matcher {
            CompiledPattern::Keywords(keywords) => keywords
                .iter()
                .find_map(|k| matcher::find_term(text, k))
                .map(|evidence| (evidence, None)),
            CompiledPattern::Regex(re) => {
                re.find(text).map(|m| (m.as_str(), None))
            }
            CompiledPattern::TriggerWithout {
                triggers,
                required_with,
            } => {
                if matcher::contains_any(text, required_with) {
                    return None;
                }
                triggers
                    .iter()
                    .find_map(|t| matcher::find_term(text, t))
                    .map(|evidence| (evidence, None))
            }
            CompiledPattern::ContradictoryPairs(pairs) => pairs.iter().find_map(|(a, b)| {
                let hit_a = matcher::find_term(text, a)?;
                matcher::find_term(text, b)?;
                Some((hit_a, Some(b.as_str())))
            }),
            CompiledPattern::MissingSignal(signals) => {
                if signals.iter().any(|re| re.is_match(text)) {
                    None
                } else {
                    Some((text, None))
                }
            }
        }
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()?)
}

/// Generic detector for one category: an immutable compiled rule table and
/// the shared matching algorithm.
pub struct RuleDetector {
    category: RiskCategory,
    rules: Vec<CompiledRule>,
}

impl RuleDetector {
    #[must_use]
    pub fn new(category: RiskCategory, rules: Vec<CompiledRule>) -> Self {
        Self { category, rules }
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Detector for RuleDetector {
    fn category(&self) -> RiskCategory {
        self.category
    }

    fn detect(&self, requirement: &Requirement) -> Result<Vec<Risk>> {
        let mut risks = Vec::new();
        for rule in &self.rules {
            if let Some((evidence, other)) = rule.apply(&requirement.text) {
                risks.push(Risk {
                    requirement_id: requirement.id.clone(),
                    line_number: requirement.line_number,
                    category: self.category,
                    severity: rule.severity,
                    message: matcher::render_message(&rule.message, evidence, other),
                    evidence: evidence.to_string(),
                    suggestion: rule
                        .suggestion
                        .as_ref()
                        .map(|s| matcher::render_message(s, evidence, other)),
                });
            }
        }
        Ok(risks)
    }
}

/// Batch detector flagging near-duplicate requirement pairs. Emits one risk
/// for each requirement in an implicated pair.
pub struct DuplicateDetector {
    severity: Severity,
    message: String,
    suggestion: Option<String>,
    threshold: f64,
}

impl DuplicateDetector {
    #[must_use]
    pub fn new(rule: &DetectionRule, threshold: f64) -> Self {
        Self {
            severity: rule.severity,
            message: rule.message.clone(),
            suggestion: rule.suggestion.clone(),
            threshold,
        }
    }
}

impl BatchDetector for DuplicateDetector {
    fn category(&self) -> RiskCategory {
        RiskCategory::Conflict
    }

    fn detect_batch(&self, requirements: &[Requirement]) -> Result<Vec<Risk>> {
        let mut risks = Vec::new();
        for (i, first) in requirements.iter().enumerate() {
            for second in &requirements[i + 1..] {
                let score = matcher::similarity(&first.text, &second.text);
                if score >= self.threshold {
                    risks.push(self.pair_risk(first, second));
                    risks.push(self.pair_risk(second, first));
                }
            }
        }
        Ok(risks)
    }
}

impl DuplicateDetector {
    fn pair_risk(&self, subject: &Requirement, other: &Requirement) -> Risk {
        Risk {
            requirement_id: subject.id.clone(),
            line_number: subject.line_number,
            category: RiskCategory::Conflict,
            severity: self.severity,
            message: matcher::render_message(&self.message, &subject.text, Some(&other.id)),
            evidence: subject.text.clone(),
            suggestion: self
                .suggestion
                .as_ref()
                .map(|s| matcher::render_message(s, &subject.text, Some(&other.id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RulePattern;

    fn rule(name: &str, severity: Severity, pattern: RulePattern) -> DetectionRule {
        DetectionRule {
            name: name.to_string(),
            enabled: true,
            severity,
            message: format!("{name}: '{{evidence}}'"),
            suggestion: None,
            pattern,
        }
    }

    fn req(id: &str, text: &str) -> Requirement {
        Requirement::new(id, 1, text).unwrap()
    }

    fn detector(category: RiskCategory, rules: &[DetectionRule]) -> RuleDetector {
        let compiled = rules
            .iter()
            .filter_map(|r| CompiledRule::compile(r).unwrap())
            .collect();
        RuleDetector::new(category, compiled)
    }

    #[test]
    fn test_keyword_rule_fires_once_per_rule() {
        let d = detector(
            RiskCategory::Ambiguity,
            &[rule(
                "vague",
                Severity::Medium,
                RulePattern::Keywords {
                    keywords: vec!["should".to_string(), "might".to_string()],
                },
            )],
        );
        // Both keywords present, and "should" appears twice: still one risk.
        let risks = d
            .detect(&req("R001", "It should work and might should help"))
            .unwrap();
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].evidence, "should");
    }

    #[test]
    fn test_multiple_rules_in_category_stack() {
        let d = detector(
            RiskCategory::Ambiguity,
            &[
                rule(
                    "vague",
                    Severity::Medium,
                    RulePattern::Keywords {
                        keywords: vec!["should".to_string()],
                    },
                ),
                rule(
                    "quantifier",
                    Severity::Medium,
                    RulePattern::Keywords {
                        keywords: vec!["fast".to_string()],
                    },
                ),
            ],
        );
        let risks = d.detect(&req("R001", "It should be fast")).unwrap();
        assert_eq!(risks.len(), 2);
    }

    #[test]
    fn test_trigger_without_suppressed_by_safeguard() {
        let pattern = RulePattern::TriggerWithout {
            triggers: vec!["login".to_string()],
            required_with: vec!["password".to_string()],
        };
        let d = detector(
            RiskCategory::Security,
            &[rule("auth", Severity::High, pattern)],
        );

        let flagged = d.detect(&req("R001", "Users can login")).unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].evidence, "login");

        let clean = d
            .detect(&req("R002", "Users can login with a password"))
            .unwrap();
        assert!(clean.is_empty());
    }

    #[test]
    fn test_contradictory_pairs_need_both_terms() {
        let pattern = RulePattern::ContradictoryPairs {
            pairs: vec![("always".to_string(), "never".to_string())],
        };
        let d = detector(
            RiskCategory::Conflict,
            &[rule("contradiction", Severity::High, pattern)],
        );

        assert!(d.detect(&req("R001", "Logs are always kept")).unwrap().is_empty());
        let risks = d
            .detect(&req("R002", "Logs are always kept and never kept"))
            .unwrap();
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].evidence, "always");
    }

    #[test]
    fn test_missing_signal_fires_on_absence() {
        let pattern = RulePattern::MissingSignal {
            signals: vec![r"\bTC-\d+\b".to_string()],
        };
        let d = detector(
            RiskCategory::Traceability,
            &[rule("test_ref", Severity::Medium, pattern)],
        );

        let flagged = d.detect(&req("R001", "The system shall start")).unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].evidence, "The system shall start");

        assert!(d
            .detect(&req("R002", "The system shall start, see TC-12"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_regex_evidence_is_literal_substring() {
        let pattern = RulePattern::Regex {
            pattern: r"\btbd\b".to_string(),
        };
        let d = detector(
            RiskCategory::MissingDetail,
            &[rule("tbd", Severity::High, pattern)],
        );
        let risks = d.detect(&req("R001", "Retention period is TBD")).unwrap();
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].evidence, "TBD");
    }

    #[test]
    fn test_invalid_regex_fails_at_compile() {
        let bad = rule(
            "broken",
            Severity::Low,
            RulePattern::Regex {
                pattern: "([unclosed".to_string(),
            },
        );
        assert!(CompiledRule::compile(&bad).is_err());
    }

    #[test]
    fn test_duplicate_detector_flags_both_requirements() {
        let rule = rule(
            "duplicate_requirements",
            Severity::High,
            RulePattern::DuplicateSimilarity { threshold: 0.8 },
        );
        let d = DuplicateDetector::new(&rule, 0.8);
        let reqs = vec![
            req("R001", "The system shall send email notifications to users"),
            req("R002", "Accounts lock after five failed attempts"),
            req("R003", "The system shall send email notifications to users"),
        ];
        let risks = d.detect_batch(&reqs).unwrap();
        assert_eq!(risks.len(), 2);
        assert_eq!(risks[0].requirement_id, "R001");
        assert_eq!(risks[1].requirement_id, "R003");
    }
}
