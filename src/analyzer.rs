// src/analyzer.rs
//! Analysis run orchestration.
//!
//! One run walks the ordered requirement sequence through every enabled
//! detector, isolates individual detector failures, applies the filter
//! chain, and scores the survivors. Per-requirement detection runs in
//! parallel with rayon; output order is independent of scheduling because
//! results are collected positionally and flattened in requirement order
//! with each requirement's risks in detector registration order.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::detect::DetectorSet;
use crate::error::{ReqsentryError, Result};
use crate::filter::FilterChain;
use crate::model::{Requirement, Risk, RiskCategory};
use crate::scoring::{score_requirements, top_riskiest, RankedRequirement};

/// Pipeline stage announcements, for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Loading,
    Parsing,
    Detecting,
    Scoring,
    Generating,
}

impl Stage {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Parsing => "Parsing",
            Self::Detecting => "Detecting",
            Self::Scoring => "Scoring",
            Self::Generating => "Generating",
        }
    }
}

/// Terminal state of an analysis run. `run` is synchronous, so these are
/// the only states a caller can observe; intermediate progress is surfaced
/// through [`Stage`] and `on_progress` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Completed,
    Failed,
}

/// A detector failure that was isolated instead of aborting the run.
#[derive(Debug, Clone, Serialize)]
pub struct DetectorError {
    pub category: RiskCategory,
    /// `None` for batch detectors, which fail for the whole sequence.
    pub requirement_id: Option<String>,
    pub message: String,
}

/// Aggregate facts about a finished (or failed) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub state: RunState,
    pub requirement_count: usize,
    pub risk_count: usize,
    pub detector_error_count: usize,
    pub duration_ms: u128,
    pub cancelled: bool,
}

/// Full result of a successful run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Filtered risks, in requirement order.
    pub risks: Vec<Risk>,
    /// Per-requirement scores, in input order (zero-risk included).
    pub scores: Vec<RankedRequirement>,
    /// Top-N riskiest requirements.
    pub ranking: Vec<RankedRequirement>,
    pub errors: Vec<DetectorError>,
    pub summary: RunSummary,
}

/// Cooperative cancellation handle. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Run progress and outcome notifications. All methods default to no-ops
/// so observers implement only what they care about. Called from worker
/// threads, hence `Sync`.
pub trait ProgressObserver: Sync {
    fn on_stage(&self, stage: Stage) {
        let _ = stage;
    }

    /// `fraction` is completed requirements over total, in `0.0..=1.0`.
    fn on_progress(&self, fraction: f64, requirement_id: &str, message: &str) {
        let _ = (fraction, requirement_id, message);
    }

    fn on_error(&self, error: &DetectorError) {
        let _ = error;
    }

    fn on_complete(&self, summary: &RunSummary) {
        let _ = summary;
    }
}

/// Orchestrates detection, filtering, and scoring for one rule set.
pub struct Analyzer<'a> {
    detectors: DetectorSet,
    filters: FilterChain,
    /// Detector failures above this fraction of invocations fail the run.
    max_failure_rate: f64,
    top_n: usize,
    observers: Vec<&'a dyn ProgressObserver>,
    cancel: CancelToken,
}

impl<'a> Analyzer<'a> {
    #[must_use]
    pub fn new(detectors: DetectorSet, filters: FilterChain) -> Self {
        Self {
            detectors,
            filters,
            max_failure_rate: 0.5,
            top_n: 5,
            observers: Vec::new(),
            cancel: CancelToken::new(),
        }
    }

    #[must_use]
    pub fn with_max_failure_rate(mut self, rate: f64) -> Self {
        self.max_failure_rate = rate;
        self
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observers.push(observer);
        self
    }

    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Runs the full pipeline over `requirements`.
    ///
    /// Individual detector failures are isolated and reported through the
    /// outcome; the run itself fails only when the failure rate exceeds
    /// the configured threshold or cancellation is requested.
    ///
    /// # Errors
    /// Returns [`ReqsentryError::RunFailed`] on cancellation or when too
    /// many detector invocations failed.
    pub fn run(&self, requirements: &[Requirement]) -> Result<AnalysisOutcome> {
        let started = Instant::now();
        let total = requirements.len();
        let completed = AtomicUsize::new(0);
        self.notify_stage(Stage::Detecting);

        // Positional collect keeps requirement order regardless of which
        // worker finishes first.
        let per_req: Vec<(Vec<Risk>, Vec<DetectorError>)> = requirements
            .par_iter()
            .map(|req| self.detect_one(req, total, &completed))
            .collect();

        let mut risks = Vec::new();
        let mut errors = Vec::new();
        for (req_risks, req_errors) in per_req {
            risks.extend(req_risks);
            errors.extend(req_errors);
        }

        if self.cancel.is_cancelled() {
            return self.fail(started, total, errors, "analysis cancelled");
        }

        // Batch detectors see the whole sequence and run after the
        // per-requirement pass, sequentially.
        for detector in &self.detectors.batch {
            match detector.detect_batch(requirements) {
                Ok(batch_risks) => risks.extend(batch_risks),
                Err(err) => {
                    let error = DetectorError {
                        category: detector.category(),
                        requirement_id: None,
                        message: err.to_string(),
                    };
                    self.notify_error(&error);
                    errors.push(error);
                }
            }
        }

        let invocations = self.detectors.per_requirement.len() * total + self.detectors.batch.len();
        if invocations > 0 {
            let rate = errors.len() as f64 / invocations as f64;
            if rate > self.max_failure_rate {
                let message = format!(
                    "{} of {} detector invocations failed (threshold {:.0}%)",
                    errors.len(),
                    invocations,
                    self.max_failure_rate * 100.0
                );
                return self.fail(started, total, errors, &message);
            }
        }

        self.notify_stage(Stage::Scoring);
        let risks = self.filters.apply(risks);
        let scores = score_requirements(requirements, &risks);
        let ranking = top_riskiest(&scores, self.top_n);

        let summary = RunSummary {
            state: RunState::Completed,
            requirement_count: total,
            risk_count: risks.len(),
            detector_error_count: errors.len(),
            duration_ms: started.elapsed().as_millis(),
            cancelled: false,
        };
        for observer in &self.observers {
            observer.on_complete(&summary);
        }

        Ok(AnalysisOutcome {
            risks,
            scores,
            ranking,
            errors,
            summary,
        })
    }

    fn detect_one(
        &self,
        requirement: &Requirement,
        total: usize,
        completed: &AtomicUsize,
    ) -> (Vec<Risk>, Vec<DetectorError>) {
        if self.cancel.is_cancelled() {
            return (Vec::new(), Vec::new());
        }

        let mut risks = Vec::new();
        let mut errors = Vec::new();
        for detector in &self.detectors.per_requirement {
            match detector.detect(requirement) {
                Ok(found) => risks.extend(found),
                Err(err) => {
                    let error = DetectorError {
                        category: detector.category(),
                        requirement_id: Some(requirement.id.clone()),
                        message: err.to_string(),
                    };
                    self.notify_error(&error);
                    errors.push(error);
                }
            }
        }

        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        let fraction = done as f64 / total as f64;
        let message = format!("analyzed {done}/{total}");
        for observer in &self.observers {
            observer.on_progress(fraction, &requirement.id, &message);
        }

        (risks, errors)
    }

    fn notify_stage(&self, stage: Stage) {
        for observer in &self.observers {
            observer.on_stage(stage);
        }
    }

    fn notify_error(&self, error: &DetectorError) {
        for observer in &self.observers {
            observer.on_error(error);
        }
    }

    fn fail(
        &self,
        started: Instant,
        total: usize,
        errors: Vec<DetectorError>,
        message: &str,
    ) -> Result<AnalysisOutcome> {
        let summary = RunSummary {
            state: RunState::Failed,
            requirement_count: total,
            risk_count: 0,
            detector_error_count: errors.len(),
            duration_ms: started.elapsed().as_millis(),
            cancelled: self.cancel.is_cancelled(),
        };
        for observer in &self.observers {
            observer.on_complete(&summary);
        }
        Err(ReqsentryError::RunFailed(message.to_string()))
    }
}
