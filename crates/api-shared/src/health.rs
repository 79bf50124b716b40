use crate::wire::HealthRes;

/// Simple health service shared by the REST server and the runner binary.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Static health check — no instance required.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "intake service is alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_reports_ok() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert!(!res.message.is_empty());
    }
}
