//! Risk-assessment record storage.
//!
//! This module provides submission, retrieval, review and listing of
//! risk-assessment records. It handles:
//!
//! - Creation of new records with unique identifiers
//! - Storage in a sharded directory structure under `<data_dir>/assessments/`
//! - Admin review updates with server-assigned review timestamps
//!
//! ## Storage Layout
//!
//! Records are stored as YAML files in a sharded structure:
//!
//! ```text
//! assessments/
//!   <s1>/
//!     <s2>/
//!       <uuid>/
//!         assessment.yaml
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the record id,
//! keeping directory fan-out bounded as the record count grows.
//!
//! ## Pure Data Operations
//!
//! This module contains **only** data operations — no HTTP, authentication
//! or wire-format concerns. API-level logic belongs in `api-rest` and
//! `api-shared`.

use crate::catalog::Catalog;
use crate::config::CoreConfig;
use crate::constants::ASSESSMENT_FILE_NAME;
use crate::error::{AssessmentError, AssessmentResult};
use crate::submission::{AssessmentDraft, AssessmentRecord, ReviewDecision};
use crate::uuid::ShardableUuid;
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;

// ============================================================================
// TYPE-STATE MARKERS
// ============================================================================

/// Marker type: no record is bound to this service yet.
///
/// Only `submit()` (and the state-independent `list()`) can be called in
/// this state.
#[derive(Clone, Copy, Debug)]
pub struct Uninitialised;

/// Marker type: the service is bound to an existing record id.
#[derive(Clone, Debug)]
pub struct Initialised {
    assessment_id: ShardableUuid,
}

// ============================================================================
// ASSESSMENT SERVICE
// ============================================================================

/// Service for risk-assessment record operations.
///
/// Uses the type-state pattern to enforce correct usage at compile time:
/// `submit()` consumes an `Uninitialised` service and returns an
/// `Initialised` one, so a single service value cannot submit twice, and
/// record operations require a bound id.
#[derive(Clone, Debug)]
pub struct AssessmentService<S> {
    cfg: Arc<CoreConfig>,
    state: S,
}

impl AssessmentService<Uninitialised> {
    /// Creates a new assessment service with no bound record.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            state: Uninitialised,
        }
    }

    /// Validates and stores a completed questionnaire.
    ///
    /// The draft is validated against `catalog` (required visible questions
    /// answered, physical info complete and in bounds), hidden-question
    /// answers are scrubbed, and the record is written with a fresh id,
    /// status `Pending` and purchase authorization off.
    ///
    /// **This method consumes `self`** and returns an
    /// `AssessmentService<Initialised>` bound to the new record; use
    /// [`assessment_id()`](AssessmentService::assessment_id) for the id.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError` if:
    /// - the draft fails validation ([`AssessmentError::InvalidInput`])
    /// - the record directory cannot be created
    /// - the record cannot be serialized or written
    pub fn submit(
        self,
        catalog: &Catalog,
        draft: AssessmentDraft,
    ) -> AssessmentResult<AssessmentService<Initialised>> {
        let assessment_id = ShardableUuid::new();
        let record =
            AssessmentRecord::from_draft(assessment_id.clone(), draft, catalog, Utc::now())?;

        let record_dir = assessment_id.sharded_dir(&self.cfg.assessments_dir());
        fs::create_dir_all(&record_dir).map_err(AssessmentError::RecordDirCreation)?;

        let yaml = serde_yaml::to_string(&record).map_err(AssessmentError::YamlSerialization)?;
        fs::write(record_dir.join(ASSESSMENT_FILE_NAME), yaml)
            .map_err(AssessmentError::FileWrite)?;

        tracing::info!("stored risk assessment {}", assessment_id);

        Ok(AssessmentService {
            cfg: self.cfg,
            state: Initialised { assessment_id },
        })
    }
}

impl AssessmentService<Initialised> {
    /// Creates a service bound to an existing record id.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::InvalidInput`] if `assessment_id` is not
    /// in canonical form. Existence is checked on first access, not here.
    pub fn with_id(cfg: Arc<CoreConfig>, assessment_id: &str) -> AssessmentResult<Self> {
        let assessment_id = ShardableUuid::parse(assessment_id)?;
        Ok(Self {
            cfg,
            state: Initialised { assessment_id },
        })
    }

    /// Returns the bound record id.
    pub fn assessment_id(&self) -> &ShardableUuid {
        &self.state.assessment_id
    }

    fn record_path(&self) -> std::path::PathBuf {
        self.assessment_id()
            .sharded_dir(&self.cfg.assessments_dir())
            .join(ASSESSMENT_FILE_NAME)
    }

    /// Loads the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::NotFound`] if no record exists under the
    /// bound id, or a read/deserialization error for a damaged record.
    pub fn load(&self) -> AssessmentResult<AssessmentRecord> {
        let path = self.record_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AssessmentError::NotFound(self.assessment_id().to_string()));
            }
            Err(e) => return Err(AssessmentError::FileRead(e)),
        };
        serde_yaml::from_str(&contents).map_err(AssessmentError::YamlDeserialization)
    }

    /// Applies an admin review decision and persists the updated record.
    ///
    /// The review timestamp is assigned here from the server clock; client
    /// input never sets it. The decision's status arrives already parsed,
    /// so an out-of-range status string has been rejected before this point
    /// and the stored record is untouched by invalid requests.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::NotFound`] if the record does not exist,
    /// or a storage error if rewriting the file fails.
    pub fn save_review(&self, decision: ReviewDecision) -> AssessmentResult<AssessmentRecord> {
        let mut record = self.load()?;
        record.apply_review(decision, Utc::now());

        let yaml = serde_yaml::to_string(&record).map_err(AssessmentError::YamlSerialization)?;
        fs::write(self.record_path(), yaml).map_err(AssessmentError::FileWrite)?;

        tracing::info!(
            "review saved for assessment {} (status: {})",
            self.assessment_id(),
            record.status
        );

        Ok(record)
    }
}

// ============================================================================
// SHARED OPERATIONS (AVAILABLE ON BOTH STATES)
// ============================================================================

impl<S> AssessmentService<S> {
    /// Lists all stored assessment records.
    ///
    /// Traverses the sharded directory structure under
    /// `<data_dir>/assessments/` and reads every `assessment.yaml`.
    /// Individual files that cannot be parsed are logged as warnings and
    /// skipped; a missing assessments directory yields an empty list.
    pub fn list(&self) -> Vec<AssessmentRecord> {
        let assessments_dir = self.cfg.assessments_dir();

        let mut records = Vec::new();

        let s1_iter = match fs::read_dir(&assessments_dir) {
            Ok(it) => it,
            Err(_) => return records,
        };
        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let id_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };

                for id_ent in id_iter.flatten() {
                    let id_path = id_ent.path();
                    if !id_path.is_dir() {
                        continue;
                    }

                    let record_path = id_path.join(ASSESSMENT_FILE_NAME);
                    if !record_path.is_file() {
                        continue;
                    }

                    if let Ok(contents) = fs::read_to_string(&record_path) {
                        match serde_yaml::from_str::<AssessmentRecord>(&contents) {
                            Ok(record) => records.push(record),
                            Err(e) => {
                                tracing::warn!(
                                    "failed to parse assessment: {} - {}",
                                    record_path.display(),
                                    e
                                );
                            }
                        }
                    }
                }
            }
        }

        records
    }
}
