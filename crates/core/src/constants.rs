//! Constants used throughout the intake core crate.
//!
//! This module contains path and filename constants to ensure consistency
//! across the codebase and make maintenance easier.

/// Directory name for risk-assessment records storage.
pub const ASSESSMENTS_DIR_NAME: &str = "assessments";

/// Default directory for intake data storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "intake_data";

/// Filename for the stored assessment record within a record directory.
pub const ASSESSMENT_FILE_NAME: &str = "assessment.yaml";

/// Product codes that require an approved risk assessment when no explicit
/// list is configured.
pub const DEFAULT_GATED_PRODUCTS: &[&str] = &["mounjaro"];
