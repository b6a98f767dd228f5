//! # hh-probe-core
//!
//! Smoke-test checks for the hh.ru vacancies API:
//! - configuration read once from the environment
//! - zeroize-on-drop API key handling
//! - a thin HTTP client over the `vacancies` endpoint
//! - success predicates over (status, body) and a catalog of named checks
//! - a sequential runner producing a printable report

pub mod checks;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod expect;
pub mod report;
mod runner;

pub use checks::{catalog, select, Check, CheckKind, FoundRelation};
pub use client::{ApiResponse, HhClient, VacancyQuery};
pub use config::ProbeConfig;
pub use credential::ApiKey;
pub use error::{ProbeError, Result};
pub use expect::{BodyAssertion, Expectation, FailureKind, Mismatch};
pub use report::{CheckOutcome, CheckResult, Report};
pub use runner::Runner;
