//! Blocking HTTP client for the intake REST API.
//!
//! Used by the CLI's remote mode to drive a running intake service. The
//! error type keeps the transport/validation/server distinction callers
//! need to choose between "retry" and "fix and resubmit".

use crate::wire::{
    AssessmentRes, HealthRes, ListAssessmentsRes, ReviewReq, SubmitAssessmentReq,
    SubmitAssessmentRes,
};

/// Failures talking to a remote intake service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The service could not be reached at all. Worth retrying.
    #[error("transport failure reaching the intake service: {0}")]
    Network(Box<ureq::Error>),
    /// The service rejected the request as invalid. Retrying the same
    /// payload will not help; the input needs correcting.
    #[error("the intake service rejected the request as invalid")]
    Validation,
    /// No assessment exists under the requested id.
    #[error("assessment not found")]
    NotFound,
    /// The service accepted the request shape but failed to process it.
    #[error("intake service error (HTTP {0})")]
    Server(u16),
    /// The response body did not match the expected wire shape.
    #[error("failed to decode response from the intake service: {0}")]
    Decode(Box<ureq::Error>),
}

/// Maps an HTTP status to the matching error kind.
fn error_from_status(status: u16) -> ClientError {
    match status {
        400 => ClientError::Validation,
        404 => ClientError::NotFound,
        other => ClientError::Server(other),
    }
}

fn convert(err: ureq::Error) -> ClientError {
    match err {
        ureq::Error::StatusCode(status) => error_from_status(status),
        other => ClientError::Network(Box::new(other)),
    }
}

/// A client bound to one service base URL.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /health`
    pub fn health(&self) -> Result<HealthRes, ClientError> {
        self.agent
            .get(&self.url("/health"))
            .call()
            .map_err(convert)?
            .into_body()
            .read_json()
            .map_err(|e| ClientError::Decode(Box::new(e)))
    }

    /// `POST /risk-assessments`
    pub fn submit(&self, req: &SubmitAssessmentReq) -> Result<SubmitAssessmentRes, ClientError> {
        self.agent
            .post(&self.url("/risk-assessments"))
            .send_json(req)
            .map_err(convert)?
            .into_body()
            .read_json()
            .map_err(|e| ClientError::Decode(Box::new(e)))
    }

    /// `GET /risk-assessments/:id`
    pub fn fetch(&self, id: &str) -> Result<AssessmentRes, ClientError> {
        self.agent
            .get(&self.url(&format!("/risk-assessments/{}", id)))
            .call()
            .map_err(convert)?
            .into_body()
            .read_json()
            .map_err(|e| ClientError::Decode(Box::new(e)))
    }

    /// `GET /risk-assessments`
    pub fn list(&self) -> Result<ListAssessmentsRes, ClientError> {
        self.agent
            .get(&self.url("/risk-assessments"))
            .call()
            .map_err(convert)?
            .into_body()
            .read_json()
            .map_err(|e| ClientError::Decode(Box::new(e)))
    }

    /// `PATCH /risk-assessments/:id`
    pub fn review(&self, id: &str, req: &ReviewReq) -> Result<AssessmentRes, ClientError> {
        self.agent
            .patch(&self.url(&format!("/risk-assessments/{}", id)))
            .send_json(req)
            .map_err(convert)?
            .into_body()
            .read_json()
            .map_err(|e| ClientError::Decode(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_400_maps_to_validation() {
        assert!(matches!(error_from_status(400), ClientError::Validation));
    }

    #[test]
    fn status_404_maps_to_not_found() {
        assert!(matches!(error_from_status(404), ClientError::NotFound));
    }

    #[test]
    fn other_statuses_map_to_server() {
        assert!(matches!(error_from_status(500), ClientError::Server(500)));
        assert!(matches!(error_from_status(422), ClientError::Server(422)));
    }

    #[test]
    fn base_url_trailing_slash_is_normalised() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.url("/health"), "http://localhost:3000/health");
    }
}
