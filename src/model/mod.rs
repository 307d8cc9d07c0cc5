// src/model/mod.rs
//! Core data records: requirements on the way in, risks on the way out.

mod requirement;
mod risk;

pub use requirement::Requirement;
pub use risk::{risk_labels, Risk, RiskCategory, Severity};
