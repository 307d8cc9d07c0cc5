// src/rules/builtin.rs
//! Compiled-in default rule tables, one block per detector category.
//!
//! These mirror what ships in a `rules.json`; an external file loaded with
//! [`RuleSet::from_path`](super::RuleSet::from_path) replaces them entirely.

use std::collections::BTreeMap;

use crate::model::{RiskCategory, Severity};

use super::{CategoryRules, DetectionRule, GlobalSettings, RulePattern, RuleSet};

struct BuiltinRule {
    name: &'static str,
    severity: Severity,
    message: &'static str,
    suggestion: Option<&'static str>,
    pattern: BuiltinPattern,
}

enum BuiltinPattern {
    Keywords(&'static [&'static str]),
    TriggerWithout {
        triggers: &'static [&'static str],
        required_with: &'static [&'static str],
    },
    Pairs(&'static [(&'static str, &'static str)]),
    MissingSignal(&'static [&'static str]),
    DuplicateSimilarity(f64),
}

const AMBIGUITY: &[BuiltinRule] = &[
    BuiltinRule {
        name: "vague_terms",
        severity: Severity::Medium,
        message: "Vague term '{evidence}' found - consider using more precise language",
        suggestion: Some("Replace '{evidence}' with definitive language such as 'shall' or 'must'"),
        pattern: BuiltinPattern::Keywords(&[
            "should", "could", "might", "may", "possibly", "perhaps", "optionally",
        ]),
    },
    BuiltinRule {
        name: "imprecise_quantifiers",
        severity: Severity::Medium,
        message: "Imprecise quantifier '{evidence}' found - specify exact values or criteria",
        suggestion: Some(
            "Replace '{evidence}' with a measurable value (e.g. 'at least 5', 'within 2 seconds')",
        ),
        pattern: BuiltinPattern::Keywords(&[
            "some",
            "many",
            "few",
            "several",
            "fast",
            "slow",
            "quickly",
            "soon",
            "user-friendly",
            "efficient",
            "appropriate",
            "reasonable",
            "adequate",
        ]),
    },
    BuiltinRule {
        name: "weak_requirements",
        severity: Severity::Medium,
        message: "Weak requirement language '{evidence}' found - requirements should be definitive",
        suggestion: Some("State the behavior unconditionally or move it to a stated assumption"),
        pattern: BuiltinPattern::Keywords(&[
            "preferably",
            "ideally",
            "if possible",
            "as appropriate",
            "where applicable",
            "to the extent possible",
        ]),
    },
];

const MISSING_DETAIL: &[BuiltinRule] = &[
    BuiltinRule {
        name: "unspecified_actors",
        severity: Severity::Medium,
        message: "Actor '{evidence}' is unspecified or ambiguous",
        suggestion: Some("Name the concrete role (e.g. 'registered customer', 'billing admin')"),
        pattern: BuiltinPattern::Keywords(&["someone", "somebody", "anybody", "anyone", "people"]),
    },
    BuiltinRule {
        name: "missing_specifications",
        severity: Severity::Medium,
        message: "Action '{evidence}' lacks sufficient detail about how it should be performed",
        suggestion: Some("Add measurable criteria (counts, time limits, formats, protocols)"),
        pattern: BuiltinPattern::TriggerWithout {
            triggers: &["process", "handle", "manage", "validate", "backup", "archive"],
            required_with: &[
                "within", "at least", "at most", "per second", "per minute", "second", "seconds",
                "minute", "minutes", "hour", "hours", "daily", "weekly", "%",
            ],
        },
    },
];

const SECURITY: &[BuiltinRule] = &[
    BuiltinRule {
        name: "missing_authentication",
        severity: Severity::High,
        message: "User access feature '{evidence}' mentioned without authentication requirements",
        suggestion: Some("Specify the authentication mechanism (credentials, MFA, SSO)"),
        pattern: BuiltinPattern::TriggerWithout {
            triggers: &["login", "log in", "sign in", "register", "user account"],
            required_with: &[
                "password",
                "authentication",
                "authenticate",
                "credentials",
                "mfa",
                "two-factor",
                "oauth",
                "sso",
            ],
        },
    },
    BuiltinRule {
        name: "missing_authorization",
        severity: Severity::High,
        message: "Administrative action '{evidence}' mentioned without authorization requirements",
        suggestion: Some("State who is permitted and under which role or permission"),
        pattern: BuiltinPattern::TriggerWithout {
            triggers: &["admin", "administrator", "delete", "configure", "manage users"],
            required_with: &[
                "authorization",
                "authorized",
                "permission",
                "role",
                "access control",
                "rbac",
            ],
        },
    },
    BuiltinRule {
        name: "missing_data_protection",
        severity: Severity::Critical,
        message: "Data storage '{evidence}' mentioned without protection requirements",
        suggestion: Some("Specify encryption at rest, hashing, or anonymization"),
        pattern: BuiltinPattern::TriggerWithout {
            triggers: &["store", "stores", "save", "persist", "database", "record"],
            required_with: &[
                "encrypt",
                "encrypted",
                "encryption",
                "hash",
                "hashed",
                "anonymize",
                "anonymized",
            ],
        },
    },
    BuiltinRule {
        name: "insecure_communication",
        severity: Severity::High,
        message: "Data transmission '{evidence}' mentioned without transport security",
        suggestion: Some("Require HTTPS/TLS or an equivalent secure channel"),
        pattern: BuiltinPattern::TriggerWithout {
            triggers: &["send", "transmit", "transfer", "upload", "download"],
            required_with: &["https", "tls", "ssl", "encrypted", "secure channel"],
        },
    },
];

const CONFLICT: &[BuiltinRule] = &[
    BuiltinRule {
        name: "contradictory_terms",
        severity: Severity::High,
        message: "Contradictory terms found: '{evidence}' and '{other}'",
        suggestion: Some("Clarify the requirement - it cannot demand both"),
        pattern: BuiltinPattern::Pairs(&[
            ("must", "must not"),
            ("shall", "shall not"),
            ("always", "never"),
            ("enable", "disable"),
            ("allow", "deny"),
            ("online", "offline"),
        ]),
    },
    BuiltinRule {
        name: "duplicate_requirements",
        severity: Severity::High,
        message: "Duplicate requirement detected - highly similar to {other}",
        suggestion: Some("Merge the requirements or state how they differ"),
        pattern: BuiltinPattern::DuplicateSimilarity(0.8),
    },
];

const PERFORMANCE: &[BuiltinRule] = &[BuiltinRule {
    name: "missing_performance_specs",
    severity: Severity::Medium,
    message: "Performance-related feature '{evidence}' without measurable performance specification",
    suggestion: Some("Add a latency, throughput, or capacity target"),
    pattern: BuiltinPattern::TriggerWithout {
        triggers: &[
            "performance",
            "response time",
            "throughput",
            "concurrent",
            "scale",
            "load",
        ],
        required_with: &[
            "within", "under", "ms", "millisecond", "milliseconds", "second", "seconds",
            "per second", "rps", "latency",
        ],
    },
}];

const AVAILABILITY: &[BuiltinRule] = &[BuiltinRule {
    name: "missing_uptime_specs",
    severity: Severity::Medium,
    message: "Service mention '{evidence}' without availability or uptime specification",
    suggestion: Some("State an uptime target (e.g. 99.9%) or an SLA reference"),
    pattern: BuiltinPattern::TriggerWithout {
        triggers: &["available", "availability", "uptime", "always on", "24/7"],
        required_with: &["%", "sla", "failover", "recovery", "rto", "rpo"],
    },
}];

const TRACEABILITY: &[BuiltinRule] = &[
    BuiltinRule {
        name: "missing_requirement_id",
        severity: Severity::Medium,
        message: "Missing requirement ID (e.g. R001, REQ-123, ABC-123)",
        suggestion: Some("Add a stable identifier (R###, REQ-#, US-#, FR-#, or ABC-123)"),
        pattern: BuiltinPattern::MissingSignal(&[
            r"\bR\d{3}\b",
            r"\bREQ-\d+\b",
            r"\bUS-\d+\b",
            r"\bFR-\d+\b",
            r"\b[A-Z]{2,5}-\d+\b",
        ]),
    },
    BuiltinRule {
        name: "missing_acceptance_criteria",
        severity: Severity::Medium,
        message: "Missing acceptance criteria (e.g. Given/When/Then)",
        suggestion: Some("Add acceptance criteria as Given/When/Then or a short checklist"),
        pattern: BuiltinPattern::MissingSignal(&[
            r"(?s)\bgiven\b.*\bwhen\b.*\bthen\b",
            r"acceptance criteria",
        ]),
    },
    BuiltinRule {
        name: "missing_test_reference",
        severity: Severity::Medium,
        message: "Missing test reference (e.g. TC-123, 'test case', 'verified by')",
        suggestion: Some("Reference a test artifact (TC-###) or note how it will be verified"),
        pattern: BuiltinPattern::MissingSignal(&[
            r"\bTC-\d+\b",
            r"test case",
            r"validated by",
            r"verified by",
        ]),
    },
];

const SCOPE: &[BuiltinRule] = &[
    BuiltinRule {
        name: "scope_creep_terms",
        severity: Severity::Medium,
        message: "Potential scope creep term '{evidence}' detected",
        suggestion: Some("Constrain scope with explicit platforms, versions, or providers"),
        pattern: BuiltinPattern::Keywords(&[
            "etc",
            "and so on",
            "and more",
            "everything",
            "future-proof",
            "as needed",
        ]),
    },
    BuiltinRule {
        name: "unbounded_scope",
        severity: Severity::High,
        message: "Unbounded scope term '{evidence}' detected",
        suggestion: Some("Enumerate the supported platforms, providers, or versions"),
        pattern: BuiltinPattern::Keywords(&[
            "any api",
            "all platforms",
            "every browser",
            "all providers",
            "support everything",
        ]),
    },
    BuiltinRule {
        name: "third_party_without_spec",
        severity: Severity::High,
        message: "Third-party integration '{evidence}' without provider, version, or protocol",
        suggestion: Some("Add constraints: provider, supported versions, protocol, SLA"),
        pattern: BuiltinPattern::TriggerWithout {
            triggers: &[
                "third-party",
                "third party",
                "external service",
                "payment provider",
                "sms gateway",
            ],
            required_with: &["version", "provider", "protocol", "sla", "contract"],
        },
    },
];

fn convert(rules: &[BuiltinRule]) -> CategoryRules {
    let rules = rules
        .iter()
        .map(|r| DetectionRule {
            name: r.name.to_string(),
            enabled: true,
            severity: r.severity,
            message: r.message.to_string(),
            suggestion: r.suggestion.map(str::to_string),
            pattern: match &r.pattern {
                BuiltinPattern::Keywords(words) => RulePattern::Keywords {
                    keywords: words.iter().map(|w| (*w).to_string()).collect(),
                },
                BuiltinPattern::TriggerWithout {
                    triggers,
                    required_with,
                } => RulePattern::TriggerWithout {
                    triggers: triggers.iter().map(|t| (*t).to_string()).collect(),
                    required_with: required_with.iter().map(|t| (*t).to_string()).collect(),
                },
                BuiltinPattern::Pairs(pairs) => RulePattern::ContradictoryPairs {
                    pairs: pairs
                        .iter()
                        .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
                        .collect(),
                },
                BuiltinPattern::MissingSignal(signals) => RulePattern::MissingSignal {
                    signals: signals.iter().map(|s| (*s).to_string()).collect(),
                },
                BuiltinPattern::DuplicateSimilarity(threshold) => {
                    RulePattern::DuplicateSimilarity {
                        threshold: *threshold,
                    }
                }
            },
        })
        .collect();
    CategoryRules {
        enabled: true,
        rules,
    }
}

/// Assembles the default [`RuleSet`].
#[must_use]
pub fn builtin_rule_set() -> RuleSet {
    let mut categories = BTreeMap::new();
    categories.insert(RiskCategory::Ambiguity, convert(AMBIGUITY));
    categories.insert(
        RiskCategory::MissingDetail,
        convert(MISSING_DETAIL),
    );
    categories.insert(RiskCategory::Security, convert(SECURITY));
    categories.insert(RiskCategory::Conflict, convert(CONFLICT));
    categories.insert(
        RiskCategory::Performance,
        convert(PERFORMANCE),
    );
    categories.insert(
        RiskCategory::Availability,
        convert(AVAILABILITY),
    );
    categories.insert(
        RiskCategory::Traceability,
        convert(TRACEABILITY),
    );
    categories.insert(RiskCategory::Scope, convert(SCOPE));
    RuleSet {
        categories,
        settings: GlobalSettings::default(),
    }
}
