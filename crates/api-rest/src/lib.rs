//! # API REST
//!
//! REST API implementation for the intake risk-assessment service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status mapping, CORS)
//!
//! Uses `api-shared` for wire types and `intake-core` for everything else.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::wire::{
    AnswerValueDto, AssessmentRes, ErrorRes, HealthRes, ListAssessmentsRes, PatientDto, ReviewReq,
    SubmitAssessmentReq, SubmitAssessmentRes,
};
use api_shared::HealthService;
use intake_core::{AssessmentError, AssessmentService, Catalog, CoreConfig};

/// Application state shared across REST API handlers.
///
/// Holds the startup-resolved configuration and the fixed question catalog;
/// handlers construct short-lived assessment services from these.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            catalog: Arc::new(Catalog::standard()),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_assessments,
        submit_assessment,
        get_assessment,
        review_assessment,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        AnswerValueDto,
        PatientDto,
        SubmitAssessmentReq,
        SubmitAssessmentRes,
        AssessmentRes,
        ListAssessmentsRes,
        ReviewReq,
    ))
)]
pub struct ApiDoc;

type ApiError = (StatusCode, Json<ErrorRes>);

/// Maps a core error onto an HTTP status and error body.
///
/// Validation problems are the caller's to fix (400), absent records are
/// 404, and storage failures are logged server-side and surfaced as an
/// opaque 500.
fn error_response(err: AssessmentError) -> ApiError {
    let (status, message) = match &err {
        AssessmentError::InvalidInput(_) | AssessmentError::InvalidStatus { .. } => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        AssessmentError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        _ => {
            tracing::error!("assessment storage error: {:?}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
        }
    };
    (status, Json(ErrorRes { message }))
}

/// Builds the service router with all routes, Swagger UI and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/risk-assessments", get(list_assessments))
        .route("/risk-assessments", post(submit_assessment))
        .route("/risk-assessments/:id", get(get_assessment))
        .route("/risk-assessments/:id", patch(review_assessment))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/risk-assessments",
    responses(
        (status = 200, description = "List of stored assessments", body = ListAssessmentsRes)
    )
)]
/// Lists all stored risk assessments for the admin back-office.
///
/// Records that fail to parse are logged and skipped by the underlying
/// service; this endpoint never fails outright for a damaged record.
#[axum::debug_handler]
async fn list_assessments(State(state): State<AppState>) -> Json<ListAssessmentsRes> {
    let records = AssessmentService::new(state.cfg.clone()).list();
    Json(ListAssessmentsRes {
        assessments: records.iter().map(AssessmentRes::from).collect(),
    })
}

#[utoipa::path(
    post,
    path = "/risk-assessments",
    request_body = SubmitAssessmentReq,
    responses(
        (status = 201, description = "Assessment stored", body = SubmitAssessmentRes),
        (status = 400, description = "Validation failure", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Stores a completed questionnaire.
///
/// The request is validated against the question catalog: required visible
/// questions must be answered and the physical info must be complete and
/// in bounds. Hidden-question answers are scrubbed before storage. On
/// success the new record starts as `Pending` with purchase authorization
/// off.
///
/// # Errors
///
/// Returns `400 Bad Request` for validation failures and `500` if the
/// record cannot be written.
#[axum::debug_handler]
async fn submit_assessment(
    State(state): State<AppState>,
    Json(req): Json<SubmitAssessmentReq>,
) -> Result<(StatusCode, Json<SubmitAssessmentRes>), ApiError> {
    let draft = req.into_draft().map_err(error_response)?;

    let service = AssessmentService::new(state.cfg.clone())
        .submit(&state.catalog, draft)
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitAssessmentRes {
            id: service.assessment_id().to_string(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/risk-assessments/{id}",
    responses(
        (status = 200, description = "The stored assessment", body = AssessmentRes),
        (status = 400, description = "Malformed id", body = ErrorRes),
        (status = 404, description = "No such assessment", body = ErrorRes)
    )
)]
/// Fetches one stored assessment, including responses, review status and
/// authorization fields.
///
/// # Errors
///
/// Returns `400 Bad Request` for a non-canonical id and `404 Not Found`
/// when no record exists under it.
#[axum::debug_handler]
async fn get_assessment(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<AssessmentRes>, ApiError> {
    let service = AssessmentService::with_id(state.cfg.clone(), &id).map_err(error_response)?;
    let record = service.load().map_err(error_response)?;
    Ok(Json(AssessmentRes::from(&record)))
}

#[utoipa::path(
    patch,
    path = "/risk-assessments/{id}",
    request_body = ReviewReq,
    responses(
        (status = 200, description = "The updated assessment", body = AssessmentRes),
        (status = 400, description = "Invalid status or malformed request", body = ErrorRes),
        (status = 404, description = "No such assessment", body = ErrorRes)
    )
)]
/// Records an admin review decision.
///
/// The status must be one of the enumerated review statuses; anything else
/// is rejected before the stored record is touched. The review timestamp
/// is assigned server-side. Setting `canPurchaseMounjaro` replaces the
/// authorization expiry with the provided value (absent meaning
/// indefinite); omitting it leaves the authorization unchanged.
///
/// # Errors
///
/// Returns `400 Bad Request` for an invalid status, reviewer or expiry,
/// and `404 Not Found` when no record exists under the id.
#[axum::debug_handler]
async fn review_assessment(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<ReviewReq>,
) -> Result<Json<AssessmentRes>, ApiError> {
    let decision = req.into_decision().map_err(error_response)?;

    let service = AssessmentService::with_id(state.cfg.clone(), &id).map_err(error_response)?;
    let record = service.save_review(decision).map_err(error_response)?;
    Ok(Json(AssessmentRes::from(&record)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_state(data_dir: &Path) -> AppState {
        let cfg = CoreConfig::new(data_dir.to_path_buf(), vec!["mounjaro".to_string()])
            .expect("CoreConfig::new should succeed");
        AppState::new(Arc::new(cfg))
    }

    fn metric_submit_request() -> SubmitAssessmentReq {
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
                "medical-conditions": ["none"],
                "family-history-mtc": "no",
                "pregnant-or-breastfeeding": "no",
                "eating-disorder-history": "no",
                "previous-glp1": "no"
            }
        }))
        .expect("request should deserialize")
    }

    #[test]
    fn validation_errors_map_to_400() {
        let (status, body) =
            error_response(AssessmentError::InvalidInput("missing answer".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.0.message.contains("missing answer"));
    }

    #[test]
    fn not_found_maps_to_404() {
        let (status, _) = error_response(AssessmentError::NotFound("abc".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_errors_map_to_opaque_500() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let (status, body) = error_response(AssessmentError::FileWrite(io));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0.message, "Internal error");
    }

    #[tokio::test]
    async fn submit_then_fetch_round_trips() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = test_state(temp_dir.path());

        let (status, Json(created)) =
            submit_assessment(State(state.clone()), Json(metric_submit_request()))
                .await
                .expect("submit should succeed");
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_assessment(State(state), AxumPath(created.id.clone()))
            .await
            .expect("fetch should succeed");

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.status, "Pending");
        assert!(!fetched.can_purchase_restricted_product);
        assert_eq!(fetched.unit_system, "metric");
        assert!((fetched.height_cm - 170.0).abs() < 1e-9);
        assert!((fetched.bmi - 29.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn submit_rejects_unanswered_required_question() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = test_state(temp_dir.path());

        let mut req = metric_submit_request();
        req.responses.remove("previous-glp1");

        let (status, Json(body)) =
            submit_assessment(State(state), Json(req))
                .await
                .expect_err("submit should fail");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.message.contains("previous-glp1"));
    }

    #[tokio::test]
    async fn review_approves_and_fetch_reflects_authorization() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = test_state(temp_dir.path());

        let (_, Json(created)) =
            submit_assessment(State(state.clone()), Json(metric_submit_request()))
                .await
                .expect("submit should succeed");

        let review: ReviewReq = serde_json::from_value(serde_json::json!({
            "status": "Approved",
            "reviewedBy": "dr-smith",
            "canPurchaseMounjaro": true
        }))
        .expect("review should deserialize");

        let Json(updated) = review_assessment(
            State(state.clone()),
            AxumPath(created.id.clone()),
            Json(review),
        )
        .await
        .expect("review should succeed");

        assert_eq!(updated.status, "Approved");
        assert!(updated.can_purchase_restricted_product);
        assert_eq!(updated.authorization_expiry, None);
        assert!(updated.reviewed_at.is_some());

        let Json(fetched) = get_assessment(State(state), AxumPath(created.id))
            .await
            .expect("fetch should succeed");
        assert!(fetched.can_purchase_restricted_product);
        assert_eq!(fetched.authorization_expiry, None);
    }

    #[tokio::test]
    async fn review_with_invalid_status_leaves_record_untouched() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = test_state(temp_dir.path());

        let (_, Json(created)) =
            submit_assessment(State(state.clone()), Json(metric_submit_request()))
                .await
                .expect("submit should succeed");

        let review: ReviewReq = serde_json::from_value(serde_json::json!({
            "status": "Sounds-Good"
        }))
        .expect("review should deserialize");

        let (status, _) = review_assessment(
            State(state.clone()),
            AxumPath(created.id.clone()),
            Json(review),
        )
        .await
        .expect_err("review should fail");
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let Json(fetched) = get_assessment(State(state), AxumPath(created.id))
            .await
            .expect("fetch should succeed");
        assert_eq!(fetched.status, "Pending");
        assert_eq!(fetched.reviewed_at, None);
    }

    #[tokio::test]
    async fn get_unknown_id_is_404_and_malformed_id_is_400() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = test_state(temp_dir.path());

        let missing = intake_core::ShardableUuid::new().to_string();
        let (status, _) = get_assessment(State(state.clone()), AxumPath(missing))
            .await
            .expect_err("fetch should fail");
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_assessment(State(state), AxumPath("so-wrong".to_string()))
            .await
            .expect_err("fetch should fail");
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_returns_submitted_assessments() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state = test_state(temp_dir.path());

        submit_assessment(State(state.clone()), Json(metric_submit_request()))
            .await
            .expect("submit should succeed");

        let Json(listing) = list_assessments(State(state)).await;
        assert_eq!(listing.assessments.len(), 1);
        assert_eq!(listing.assessments[0].patient.name, "Jane Doe");
    }
}
