pub mod analyzer;
pub mod cli;
pub mod detect;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod report;
pub mod rules;
pub mod scoring;
pub mod service;

pub use error::{ReqsentryError, Result};
