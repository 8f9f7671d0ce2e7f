//! Backport orchestration engine
//!
//! Request parsing, the per-version attempt state machine, the sequential
//! runner with its conflict-recovery sub-protocol, and pull request
//! synthesis.

pub mod attempt;
pub mod request;
pub mod runner;
pub mod synthesizer;

pub use attempt::{branch_name, AttemptState, BackportAttempt};
pub use request::{BackportRequest, FormPayload, RequestError};
pub use runner::BackportRunner;
pub use synthesizer::{
    api_endpoint_for, compose_title, CrossCoverageTemplate, PrError, PullRequestData,
    PullRequestSynthesizer,
};
