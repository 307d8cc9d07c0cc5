// src/filter.rs
//! Composable post-detection risk filters.
//!
//! Each filter is a pure set-reduction `Vec<Risk> -> Vec<Risk>`; a chain
//! applies its filters left to right. An empty chain is the identity
//! transform, and every standard filter is idempotent.

use std::collections::{BTreeSet, HashSet};

use crate::model::{Risk, RiskCategory, Severity};

/// One post-detection filter.
#[derive(Debug, Clone)]
pub enum RiskFilter {
    /// Drops risks below the minimum severity.
    SeverityThreshold(Severity),
    /// Drops exact duplicates (same requirement, category, and evidence),
    /// first occurrence wins.
    Duplicate,
    /// Allow/deny list over categories. `allow: None` allows all.
    Category {
        allow: Option<BTreeSet<RiskCategory>>,
        deny: BTreeSet<RiskCategory>,
    },
}

impl RiskFilter {
    /// Applies this filter, preserving input order.
    #[must_use]
    pub fn apply(&self, risks: Vec<Risk>) -> Vec<Risk> {
        match self {
            Self::SeverityThreshold(min) => {
                risks.into_iter().filter(|r| r.severity >= *min).collect()
            }
            Self::Duplicate => {
                let mut seen = HashSet::new();
                risks
                    .into_iter()
                    .filter(|r| {
                        seen.insert((
                            r.requirement_id.clone(),
                            r.category,
                            r.evidence.clone(),
                        ))
                    })
                    .collect()
            }
            Self::Category { allow, deny } => risks
                .into_iter()
                .filter(|r| {
                    allow.as_ref().map_or(true, |set| set.contains(&r.category))
                        && !deny.contains(&r.category)
                })
                .collect(),
        }
    }
}

/// An ordered sequence of filters applied by left-to-right reduction.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<RiskFilter>,
}

impl FilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, filter: RiskFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: RiskFilter) {
        self.filters.push(filter);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Runs the chain. An empty chain returns its input unchanged.
    #[must_use]
    pub fn apply(&self, risks: Vec<Risk>) -> Vec<Risk> {
        self.filters
            .iter()
            .fold(risks, |acc, filter| filter.apply(acc))
    }
}
