// src/detect/registry.rs
//! Builds the active detector set from a rule configuration.
//!
//! A pure function from configuration to detector instances: a category's
//! detector is instantiated only if it has at least one enabled rule, and
//! every regex is compiled here so malformed rules fail before any
//! requirement is processed.

use crate::error::Result;
use crate::model::RiskCategory;
use crate::rules::{RulePattern, RuleSet};

use super::{BatchDetector, CompiledRule, Detector, DuplicateDetector, RuleDetector};

/// The detectors active for one analysis run.
pub struct DetectorSet {
    pub per_requirement: Vec<Box<dyn Detector>>,
    pub batch: Vec<Box<dyn BatchDetector>>,
}

impl DetectorSet {
    /// Total number of detector instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.per_requirement.len() + self.batch.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.per_requirement.is_empty() && self.batch.is_empty()
    }
}

/// Builds detectors for every category with at least one enabled rule.
///
/// # Errors
/// Fails fast on an invalid rule pattern; nothing runs with a partially
/// built set.
pub fn build_detectors(rules: &RuleSet) -> Result<DetectorSet> {
    let mut per_requirement: Vec<Box<dyn Detector>> = Vec::new();
    let mut batch: Vec<Box<dyn BatchDetector>> = Vec::new();

    for category in RiskCategory::all() {
        let enabled = rules.enabled_rules(*category);
        if enabled.is_empty() {
            continue;
        }

        let mut compiled = Vec::new();
        for rule in &enabled {
            if let RulePattern::DuplicateSimilarity { threshold } = rule.pattern {
                batch.push(Box::new(DuplicateDetector::new(rule, threshold)));
            } else if let Some(rule) = CompiledRule::compile(rule)? {
                compiled.push(rule);
            }
        }

        if !compiled.is_empty() {
            per_requirement.push(Box::new(RuleDetector::new(*category, compiled)));
        }
    }

    Ok(DetectorSet {
        per_requirement,
        batch,
    })
}
