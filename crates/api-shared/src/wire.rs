//! Wire types for the intake REST API.
//!
//! These are the JSON request/response bodies (camelCase on the wire),
//! shared by the server in `api-rest` and the HTTP client in
//! [`crate::client`]. Conversions into core types live here too, so both
//! sides agree on parsing and validation.

use chrono::{DateTime, Utc};
use intake_core::{
    AnswerSet, AnswerValue, AssessmentDraft, AssessmentError, AssessmentRecord, AssessmentResult,
    PatientIdentity, PhysicalInfo, ReviewDecision, ReviewStatus, UnitSystem,
};
use intake_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// One answer value on the wire: a string, or a list of option values for
/// multi-select questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AnswerValueDto {
    Single(String),
    Multiple(Vec<String>),
}

impl From<AnswerValueDto> for AnswerValue {
    fn from(dto: AnswerValueDto) -> Self {
        match dto {
            AnswerValueDto::Single(text) => AnswerValue::Single(text),
            AnswerValueDto::Multiple(values) => AnswerValue::Multiple(values),
        }
    }
}

impl From<AnswerValue> for AnswerValueDto {
    fn from(value: AnswerValue) -> Self {
        match value {
            AnswerValue::Single(text) => AnswerValueDto::Single(text),
            AnswerValue::Multiple(values) => AnswerValueDto::Multiple(values),
        }
    }
}

/// Patient identity block, provided by the authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body of `POST /risk-assessments`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentReq {
    pub patient: PatientDto,
    /// `"imperial"` or `"metric"`; decides which measurement fields apply.
    pub unit_system: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_feet: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_inches: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_stone: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_pounds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub responses: BTreeMap<String, AnswerValueDto>,
}

impl SubmitAssessmentReq {
    /// Converts the request into a core draft.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::InvalidInput`] for an unknown unit
    /// system or malformed identity fields. Questionnaire-level validation
    /// (required questions, bounds) happens in the core on submission.
    pub fn into_draft(self) -> AssessmentResult<AssessmentDraft> {
        let unit_system: UnitSystem = self
            .unit_system
            .parse()
            .map_err(AssessmentError::InvalidInput)?;

        let physical_info = match unit_system {
            UnitSystem::Imperial => PhysicalInfo::imperial(
                self.height_feet,
                self.height_inches,
                self.weight_stone,
                self.weight_pounds,
            ),
            UnitSystem::Metric => PhysicalInfo::metric(self.height_cm, self.weight_kg),
        };

        let name = NonEmptyText::new(&self.patient.name)
            .map_err(|_| AssessmentError::InvalidInput("patient name cannot be empty".into()))?;
        let email = EmailAddress::parse(&self.patient.email)
            .map_err(|e| AssessmentError::InvalidInput(e.to_string()))?;
        let phone = match self.patient.phone {
            Some(phone) => Some(NonEmptyText::new(&phone).map_err(|_| {
                AssessmentError::InvalidInput("patient phone cannot be empty when given".into())
            })?),
            None => None,
        };

        let responses: AnswerSet = self
            .responses
            .into_iter()
            .map(|(id, value)| (id, value.into()))
            .collect();

        Ok(AssessmentDraft {
            patient: PatientIdentity { name, email, phone },
            physical_info,
            responses,
        })
    }
}

/// Response of `POST /risk-assessments`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentRes {
    pub id: String,
}

/// A stored assessment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRes {
    pub id: String,
    pub patient: PatientDto,
    pub unit_system: String,
    /// Normalised height, centimetres.
    pub height_cm: f64,
    /// Normalised weight, kilograms.
    pub weight_kg: f64,
    pub bmi: f64,
    pub bmi_category: String,
    pub responses: BTreeMap<String, AnswerValueDto>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
    pub can_purchase_restricted_product: bool,
    #[serde(default)]
    pub authorization_expiry: Option<String>,
    pub created_at: String,
}

impl From<&AssessmentRecord> for AssessmentRes {
    fn from(record: &AssessmentRecord) -> Self {
        let unit_system = match record.physical_info.unit_system() {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        };

        Self {
            id: record.id.to_string(),
            patient: PatientDto {
                name: record.patient.name.as_str().to_owned(),
                email: record.patient.email.as_str().to_owned(),
                phone: record.patient.phone.as_ref().map(|p| p.as_str().to_owned()),
            },
            unit_system: unit_system.to_owned(),
            height_cm: record.height_cm,
            weight_kg: record.weight_kg,
            bmi: record.bmi,
            bmi_category: intake_core::BmiCategory::from_bmi(record.bmi).to_string(),
            responses: record
                .responses
                .iter()
                .map(|(id, value)| (id.clone(), value.clone().into()))
                .collect(),
            status: record.status.to_string(),
            admin_notes: record.admin_notes.clone(),
            reviewed_by: record.reviewed_by.clone(),
            reviewed_at: record.reviewed_at.map(|at| at.to_rfc3339()),
            can_purchase_restricted_product: record.can_purchase_restricted_product,
            authorization_expiry: record.authorization_expiry.map(|at| at.to_rfc3339()),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Response of `GET /risk-assessments`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListAssessmentsRes {
    pub assessments: Vec<AssessmentRes>,
}

/// Body of `PATCH /risk-assessments/:id`.
///
/// `canPurchaseMounjaro` is the wire name of the stored
/// `canPurchaseRestrictedProduct` flag; absent means "leave the
/// authorization unchanged", while setting it replaces the expiry with the
/// provided `authorizationExpiry` (absent or null meaning indefinite).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReq {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_purchase_mounjaro: Option<bool>,
    #[serde(default)]
    pub authorization_expiry: Option<String>,
}

impl ReviewReq {
    /// Converts the request into a core review decision.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::InvalidStatus`] for a status outside the
    /// enumerated set, or [`AssessmentError::InvalidInput`] for a malformed
    /// expiry timestamp or blank reviewer — all before any record mutation.
    pub fn into_decision(self) -> AssessmentResult<ReviewDecision> {
        let status: ReviewStatus = self.status.parse()?;

        let reviewed_by = match self.reviewed_by {
            Some(reviewer) => Some(NonEmptyText::new(&reviewer).map_err(|_| {
                AssessmentError::InvalidInput("reviewer cannot be empty when given".into())
            })?),
            None => None,
        };

        let authorization_expiry = match self.authorization_expiry {
            Some(raw) => {
                let parsed = DateTime::parse_from_rfc3339(&raw).map_err(|e| {
                    AssessmentError::InvalidInput(format!(
                        "authorizationExpiry must be an RFC 3339 timestamp: {}",
                        e
                    ))
                })?;
                Some(parsed.with_timezone(&Utc))
            }
            None => None,
        };

        Ok(ReviewDecision {
            status,
            admin_notes: self.admin_notes,
            reviewed_by,
            can_purchase_restricted_product: self.can_purchase_mounjaro,
            authorization_expiry,
        })
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRes {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric_request() -> SubmitAssessmentReq {
        serde_json::from_value(serde_json::json!({
            "patient": {
                "name": "Jane Doe",
                "email": "jane@example.com"
            },
            "unitSystem": "metric",
            "heightCm": 170.0,
            "weightKg": 85.0,
            "responses": {
                "weight-loss-surgery": "no",
                "medical-conditions": ["none"]
            }
        }))
        .expect("request should deserialize")
    }

    #[test]
    fn submit_request_uses_camel_case_field_names() {
        let request = metric_request();
        assert_eq!(request.unit_system, "metric");
        assert_eq!(request.height_cm, Some(170.0));
        assert_eq!(request.height_feet, None);
    }

    #[test]
    fn untagged_answers_deserialize_both_shapes() {
        let request = metric_request();
        assert_eq!(
            request.responses.get("weight-loss-surgery"),
            Some(&AnswerValueDto::Single("no".into()))
        );
        assert_eq!(
            request.responses.get("medical-conditions"),
            Some(&AnswerValueDto::Multiple(vec!["none".into()]))
        );
    }

    #[test]
    fn into_draft_builds_metric_physical_info() {
        let draft = metric_request().into_draft().expect("should convert");
        assert_eq!(draft.physical_info.height_cm(), Some(170.0));
        assert_eq!(draft.physical_info.weight_kg(), Some(85.0));
        assert_eq!(draft.patient.name.as_str(), "Jane Doe");
    }

    #[test]
    fn into_draft_rejects_unknown_unit_system() {
        let mut request = metric_request();
        request.unit_system = "nautical".into();
        let err = request.into_draft().expect_err("should reject");
        assert!(matches!(err, AssessmentError::InvalidInput(_)));
    }

    #[test]
    fn into_draft_rejects_bad_email() {
        let mut request = metric_request();
        request.patient.email = "not-an-email".into();
        let err = request.into_draft().expect_err("should reject");
        assert!(matches!(err, AssessmentError::InvalidInput(_)));
    }

    #[test]
    fn review_request_parses_status_before_anything_else() {
        let request = ReviewReq {
            status: "Definitely-Fine".into(),
            admin_notes: None,
            reviewed_by: None,
            can_purchase_mounjaro: None,
            authorization_expiry: None,
        };
        let err = request.into_decision().expect_err("should reject");
        assert!(matches!(err, AssessmentError::InvalidStatus { .. }));
    }

    #[test]
    fn review_request_parses_expiry_timestamp() {
        let request = ReviewReq {
            status: "Approved".into(),
            admin_notes: None,
            reviewed_by: Some("dr-smith".into()),
            can_purchase_mounjaro: Some(true),
            authorization_expiry: Some("2026-12-01T00:00:00Z".into()),
        };
        let decision = request.into_decision().expect("should convert");
        assert_eq!(decision.status, ReviewStatus::Approved);
        assert_eq!(decision.can_purchase_restricted_product, Some(true));
        assert!(decision.authorization_expiry.is_some());
    }

    #[test]
    fn review_request_rejects_malformed_expiry() {
        let request = ReviewReq {
            status: "Approved".into(),
            admin_notes: None,
            reviewed_by: None,
            can_purchase_mounjaro: Some(true),
            authorization_expiry: Some("next tuesday".into()),
        };
        let err = request.into_decision().expect_err("should reject");
        assert!(matches!(err, AssessmentError::InvalidInput(_)));
    }

    #[test]
    fn review_wire_names_include_can_purchase_mounjaro() {
        let json = serde_json::to_value(ReviewReq {
            status: "Approved".into(),
            admin_notes: None,
            reviewed_by: None,
            can_purchase_mounjaro: Some(true),
            authorization_expiry: None,
        })
        .expect("should serialize");
        assert_eq!(json["canPurchaseMounjaro"], serde_json::json!(true));
        assert_eq!(json["status"], serde_json::json!("Approved"));
    }
}
