// src/rules/mod.rs
//! Declarative detection rules and the configuration they are loaded from.
//!
//! A [`RuleSet`] is immutable for the lifetime of every run that references
//! it; reloading configuration builds a new value and never mutates an
//! in-flight one. Configuration problems (unknown category, bad severity,
//! invalid regex) surface here or at registry-build time, before any
//! requirement is processed.

pub mod builtin;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReqsentryError, Result};
use crate::model::{RiskCategory, Severity};

/// Predicate shape a rule matches with. Keyword and trigger terms are
/// matched whole-word and case-insensitively; regex patterns are compiled
/// case-insensitive at registry-build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RulePattern {
    /// Fires on the first keyword present in the text.
    Keywords { keywords: Vec<String> },
    /// Fires on the first regex match in the text.
    Regex { pattern: String },
    /// Fires when a trigger term is present and none of the safeguard
    /// terms are. Evidence is the trigger occurrence.
    TriggerWithout {
        triggers: Vec<String>,
        required_with: Vec<String>,
    },
    /// Fires when both halves of a contradictory pair are present.
    ContradictoryPairs { pairs: Vec<(String, String)> },
    /// Fires when none of the signal regexes match. Evidence is the full
    /// requirement text.
    MissingSignal { signals: Vec<String> },
    /// Batch-shaped: flags requirement pairs whose normalized texts are at
    /// least `threshold` similar. Both requirements get a risk.
    DuplicateSimilarity { threshold: f64 },
}

/// One declarative detection rule, loaded from configuration and immutable
/// for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRule {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub severity: Severity,
    /// Message template; `{evidence}` and `{other}` are interpolated.
    #[serde(alias = "message_template")]
    pub message: String,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(flatten)]
    pub pattern: RulePattern,
}

/// Per-category configuration block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRules {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub rules: Vec<DetectionRule>,
}

const fn default_true() -> bool {
    true
}

/// Global analysis settings carried alongside the rule tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Minimum severity kept by the default filter chain; `None` keeps all.
    #[serde(default, alias = "min_severity_filter")]
    pub min_severity: Option<Severity>,
    /// Fraction of detector invocations allowed to fail before the run is
    /// escalated to a run-level failure.
    #[serde(default = "default_max_failure_rate")]
    pub max_failure_rate: f64,
}

const fn default_top_n() -> usize {
    5
}

const fn default_max_failure_rate() -> f64 {
    0.5
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            min_severity: None,
            max_failure_rate: default_max_failure_rate(),
        }
    }
}

/// The complete, validated rule configuration for one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    pub categories: BTreeMap<RiskCategory, CategoryRules>,
    pub settings: GlobalSettings,
}

/// Raw on-disk shape: category names are free strings until validated.
#[derive(Debug, Deserialize)]
struct RawRuleSet {
    #[serde(default)]
    detectors: BTreeMap<String, CategoryRules>,
    #[serde(default)]
    settings: GlobalSettings,
}

impl RuleSet {
    /// The compiled-in default rule tables.
    #[must_use]
    pub fn builtin() -> Self {
        builtin::builtin_rule_set()
    }

    /// Parses a rule configuration from JSON, rejecting unknown categories.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or a category name outside the
    /// known set.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawRuleSet = serde_json::from_str(content)?;
        let mut categories = BTreeMap::new();
        for (name, rules) in raw.detectors {
            let category = RiskCategory::parse(&name)
                .ok_or_else(|| ReqsentryError::UnknownCategory(name.clone()))?;
            categories.insert(category, rules);
        }
        Ok(Self {
            categories,
            settings: raw.settings,
        })
    }

    /// Loads and validates a rule configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or fails validation.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ReqsentryError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        Self::from_json_str(&content)
    }

    /// Enabled rules for one category; empty when the category is disabled.
    #[must_use]
    pub fn enabled_rules(&self, category: RiskCategory) -> Vec<&DetectionRule> {
        self.categories
            .get(&category)
            .filter(|c| c.enabled)
            .map(|c| c.rules.iter().filter(|r| r.enabled).collect())
            .unwrap_or_default()
    }

    /// Categories with at least one enabled rule, in stable order.
    #[must_use]
    pub fn active_categories(&self) -> Vec<RiskCategory> {
        RiskCategory::all()
            .iter()
            .copied()
            .filter(|c| !self.enabled_rules(*c).is_empty())
            .collect()
    }
}
