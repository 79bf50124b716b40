//! # Intake Core
//!
//! Core business logic for the intake risk-assessment service.
//!
//! This crate contains the questionnaire engine and pure data operations:
//! - The fixed question catalog with declarative visibility rules
//! - Visibility/navigation resolution and progress computation
//! - Physical-info capture with imperial/metric conversion
//! - The form wizard step state machine
//! - Submission records, admin review and sharded YAML storage
//!
//! **No API concerns**: HTTP servers, wire formats or service interfaces
//! belong in `api-rest` and `api-shared`.

pub mod answers;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod repositories;
pub mod resolver;
pub mod submission;
pub mod units;
pub mod uuid;
pub mod wizard;

pub use answers::{AnswerSet, AnswerValue};
pub use catalog::{Catalog, Question, QuestionKind, QuestionOption, RuleOperator, VisibilityRule};
pub use config::{gated_products_from_env_value, CoreConfig};
pub use constants::DEFAULT_DATA_DIR;
pub use error::{AssessmentError, AssessmentResult};
pub use intake_types::{EmailAddress, NonEmptyText};
pub use repositories::assessments::{AssessmentService, Initialised, Uninitialised};
pub use resolver::Resolver;
pub use submission::{
    AssessmentDraft, AssessmentRecord, PatientIdentity, ReviewDecision, ReviewStatus,
};
pub use units::{BmiCategory, PhysicalInfo, UnitSystem};
pub use uuid::ShardableUuid;
pub use wizard::{StepAdvance, Wizard, WizardError, WizardStep};
