#![deny(missing_docs)]
#![doc = "Assembly and validation of hubverse quantile submissions from projected trajectories."]

/// Quantile table to submission assembly.
pub mod assemble;
/// YAML submission configuration.
pub mod config;
/// Per time point submission metadata.
pub mod metadata;
/// Submission rows, writers and validation.
pub mod submission;

pub use assemble::{assemble, assemble_with, AssembleOptions, LocationPolicy};
pub use config::{load_config, SubmissionConfig};
pub use metadata::{SubmissionMetadata, TimePointMeta};
pub use submission::{validate_submission, SubmissionRow, SubmissionTable};
