// src/service.rs
//! End-to-end analysis service: load, parse rules, detect, score, render.
//!
//! This is the entry point the CLI drives. Library users who want finer
//! control can compose the loader, registry, analyzer, and reporters
//! directly.

use std::path::{Path, PathBuf};

use crate::analyzer::{AnalysisOutcome, Analyzer, CancelToken, ProgressObserver, Stage};
use crate::detect::build_detectors;
use crate::error::Result;
use crate::filter::{FilterChain, RiskFilter};
use crate::loader;
use crate::model::{Requirement, RiskCategory, Severity};
use crate::report::{self, ReportData, ReportFormat};
use crate::rules::RuleSet;

/// Knobs exposed by the CLI. Anything left `None` falls back to the rule
/// set's global settings.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// External rule file; `None` uses the built-in rule set.
    pub rules_path: Option<PathBuf>,
    pub format: ReportFormat,
    pub min_severity: Option<Severity>,
    /// Restrict output to these categories; empty means all.
    pub categories: Vec<RiskCategory>,
    /// Exact-duplicate risk suppression, on by default.
    pub dedup: bool,
    pub top_n: Option<usize>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            rules_path: None,
            format: ReportFormat::Md,
            min_severity: None,
            categories: Vec::new(),
            dedup: true,
            top_n: None,
        }
    }
}

/// Result of one service invocation.
pub struct AnalysisRun {
    pub requirements: Vec<Requirement>,
    pub outcome: AnalysisOutcome,
    /// Report rendered in the requested format.
    pub rendered: String,
}

pub struct AnalysisService {
    options: AnalysisOptions,
    cancel: CancelToken,
}

impl AnalysisService {
    #[must_use]
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            cancel: CancelToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Runs the full pipeline over the file or directory at `input`.
    ///
    /// # Errors
    /// Configuration problems (unreadable input, bad rule file) fail
    /// before detection starts. Detector failures are isolated; the run
    /// itself fails only past the configured failure-rate threshold or on
    /// cancellation.
    pub fn run(
        &self,
        input: &Path,
        observers: &[&dyn ProgressObserver],
    ) -> Result<AnalysisRun> {
        self.notify_stage(observers, Stage::Loading);
        let requirements = loader::load(input)?;

        self.notify_stage(observers, Stage::Parsing);
        let rules = match &self.options.rules_path {
            Some(path) => RuleSet::from_path(path)?,
            None => RuleSet::builtin(),
        };
        let detectors = build_detectors(&rules)?;

        let mut analyzer = Analyzer::new(detectors, self.filters(&rules))
            .with_max_failure_rate(rules.settings.max_failure_rate)
            .with_top_n(self.options.top_n.unwrap_or(rules.settings.top_n))
            .with_cancel_token(self.cancel.clone());
        for observer in observers {
            analyzer = analyzer.with_observer(*observer);
        }
        let outcome = analyzer.run(&requirements)?;

        self.notify_stage(observers, Stage::Generating);
        let data = ReportData::new(&requirements, &outcome);
        let rendered = report::render(self.options.format, &data)?;

        Ok(AnalysisRun {
            requirements,
            outcome,
            rendered,
        })
    }

    fn filters(&self, rules: &RuleSet) -> FilterChain {
        let mut chain = FilterChain::new();
        if self.options.dedup {
            chain.push(RiskFilter::Duplicate);
        }
        if let Some(min) = self.options.min_severity.or(rules.settings.min_severity) {
            chain.push(RiskFilter::SeverityThreshold(min));
        }
        if !self.options.categories.is_empty() {
            chain.push(RiskFilter::Category {
                allow: Some(self.options.categories.iter().copied().collect()),
                deny: Default::default(),
            });
        }
        chain
    }

    fn notify_stage(&self, observers: &[&dyn ProgressObserver], stage: Stage) {
        for observer in observers {
            observer.on_stage(stage);
        }
    }
}
