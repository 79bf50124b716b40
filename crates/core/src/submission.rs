//! Submission records and admin review.
//!
//! An [`AssessmentDraft`] is the validated output of a completed
//! questionnaire: patient identity, physical info and the answer set. A
//! draft becomes an [`AssessmentRecord`] at submission time — the record is
//! what is stored, reviewed and consulted by downstream purchase checks.
//!
//! Answers for questions hidden under the final answer set are scrubbed
//! before storage: the stored payload only ever contains answers the
//! patient could see when they submitted.

use crate::answers::AnswerSet;
use crate::catalog::Catalog;
use crate::error::{AssessmentError, AssessmentResult};
use crate::resolver::Resolver;
use crate::units::PhysicalInfo;
use crate::uuid::ShardableUuid;
use chrono::{DateTime, Utc};
use intake_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identity and contact details of the submitting patient.
///
/// These come from the account/auth collaborator, not from the
/// questionnaire itself; the engine treats a valid identity as a
/// precondition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientIdentity {
    pub name: NonEmptyText,
    pub email: EmailAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<NonEmptyText>,
}

/// Review state of a stored assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Pending,
    Reviewed,
    Approved,
    Rejected,
    #[serde(rename = "Requires-Followup")]
    RequiresFollowup,
}

impl ReviewStatus {
    /// The accepted wire spellings, in declaration order.
    pub const ALLOWED: [&'static str; 5] = [
        "Pending",
        "Reviewed",
        "Approved",
        "Rejected",
        "Requires-Followup",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::Reviewed => "Reviewed",
            ReviewStatus::Approved => "Approved",
            ReviewStatus::Rejected => "Rejected",
            ReviewStatus::RequiresFollowup => "Requires-Followup",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = AssessmentError;

    /// Parses one of the enumerated statuses. Anything else — including
    /// case variants — is a validation error, surfaced before any record
    /// mutation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ReviewStatus::Pending),
            "Reviewed" => Ok(ReviewStatus::Reviewed),
            "Approved" => Ok(ReviewStatus::Approved),
            "Rejected" => Ok(ReviewStatus::Rejected),
            "Requires-Followup" => Ok(ReviewStatus::RequiresFollowup),
            other => Err(AssessmentError::InvalidStatus {
                input: other.to_string(),
            }),
        }
    }
}

/// A completed, not-yet-stored questionnaire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub patient: PatientIdentity,
    pub physical_info: PhysicalInfo,
    pub responses: AnswerSet,
}

impl AssessmentDraft {
    /// Validates the draft against the catalog: physical info must be
    /// complete and every *visible* required question answered. Stale
    /// answers of hidden questions never block validation.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::InvalidInput`] naming the first failing
    /// requirement.
    pub fn validate(&self, catalog: &Catalog) -> AssessmentResult<()> {
        if !self.physical_info.is_complete() {
            return Err(AssessmentError::InvalidInput(
                "physical information is incomplete or out of bounds".into(),
            ));
        }

        let resolver = Resolver::new(catalog);
        for question in resolver.visible_questions(&self.responses) {
            if !question.required {
                continue;
            }
            let answered = self
                .responses
                .get(question.id)
                .is_some_and(|answer| !answer.is_empty());
            if !answered {
                return Err(AssessmentError::InvalidInput(format!(
                    "required question '{}' is unanswered",
                    question.id
                )));
            }
        }

        Ok(())
    }

    /// The responses with hidden-question answers scrubbed: only entries
    /// for questions visible under this draft's own answer set survive.
    pub fn scrubbed_responses(&self, catalog: &Catalog) -> AnswerSet {
        let resolver = Resolver::new(catalog);
        let visible = resolver.visible_questions(&self.responses);
        self.responses
            .iter()
            .filter(|(id, _)| visible.iter().any(|q| q.id == id.as_str()))
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect()
    }
}

/// A decision recorded by an admin reviewer.
///
/// `None` fields leave the stored value unchanged. The authorization
/// expiry is only applied together with a change to the purchase flag:
/// granting or revoking authorization replaces the expiry with the value
/// provided (absent meaning indefinite).
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewDecision {
    pub status: ReviewStatus,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<NonEmptyText>,
    pub can_purchase_restricted_product: Option<bool>,
    pub authorization_expiry: Option<DateTime<Utc>>,
}

/// The stored risk-assessment record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: ShardableUuid,
    pub patient: PatientIdentity,
    pub physical_info: PhysicalInfo,
    /// Normalised height, centimetres.
    pub height_cm: f64,
    /// Normalised weight, kilograms.
    pub weight_kg: f64,
    /// BMI at submission time, one decimal place.
    pub bmi: f64,
    pub responses: AnswerSet,
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub can_purchase_restricted_product: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AssessmentRecord {
    /// Builds the stored record from a validated draft.
    ///
    /// Validation runs here as well, so records created outside the wizard
    /// (API submissions, CLI files) meet the same bar. Responses are
    /// scrubbed, measurements normalised to metric, and the record starts
    /// as `Pending` with purchase authorization off.
    pub fn from_draft(
        id: ShardableUuid,
        draft: AssessmentDraft,
        catalog: &Catalog,
        created_at: DateTime<Utc>,
    ) -> AssessmentResult<Self> {
        draft.validate(catalog)?;

        // validate() guarantees completeness, so these are present.
        let height_cm = draft.physical_info.height_cm().ok_or_else(|| {
            AssessmentError::InvalidInput("height is missing after validation".into())
        })?;
        let weight_kg = draft.physical_info.weight_kg().ok_or_else(|| {
            AssessmentError::InvalidInput("weight is missing after validation".into())
        })?;
        let bmi = draft.physical_info.bmi().ok_or_else(|| {
            AssessmentError::InvalidInput("BMI is not computable after validation".into())
        })?;

        let responses = draft.scrubbed_responses(catalog);

        Ok(Self {
            id,
            patient: draft.patient,
            physical_info: draft.physical_info,
            height_cm,
            weight_kg,
            bmi,
            responses,
            status: ReviewStatus::Pending,
            admin_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            can_purchase_restricted_product: false,
            authorization_expiry: None,
            created_at,
        })
    }

    /// Applies an admin review decision.
    ///
    /// `reviewed_at` is assigned by the caller holding the clock (the
    /// repository stamps it with the current server time), never taken from
    /// client input.
    pub fn apply_review(&mut self, decision: ReviewDecision, reviewed_at: DateTime<Utc>) {
        self.status = decision.status;
        self.reviewed_at = Some(reviewed_at);

        if let Some(notes) = decision.admin_notes {
            self.admin_notes = Some(notes);
        }
        if let Some(reviewer) = decision.reviewed_by {
            self.reviewed_by = Some(reviewer.as_str().to_owned());
        }
        if let Some(flag) = decision.can_purchase_restricted_product {
            self.can_purchase_restricted_product = flag;
            self.authorization_expiry = decision.authorization_expiry;
        }
    }

    /// True while the purchase authorization is in force at `now`.
    ///
    /// The gate stores the expiry without enforcing it at write time;
    /// purchase-time consumers call this to honour it. A `None` expiry
    /// means indefinite authorization.
    pub fn authorization_active(&self, now: DateTime<Utc>) -> bool {
        if !self.can_purchase_restricted_product {
            return false;
        }
        match self.authorization_expiry {
            None => true,
            Some(expiry) => now <= expiry,
        }
    }
}
